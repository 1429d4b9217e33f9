//! Album track ordering from an external metadata provider.

use std::collections::HashMap;

use async_trait::async_trait;

/// Maps external track IDs to their 1-based position within one album.
///
/// Built fresh for every ranking call and never shared across albums.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackOrderMap {
    positions: HashMap<String, u32>,
}

impl TrackOrderMap {
    /// Position given to tracks that are not part of the map.
    pub const UNMAPPED: u32 = u32::MAX;

    /// Build a map from an album listing in its natural order.
    ///
    /// The first item gets position 1. If an ID repeats, its first
    /// position is kept so positions stay unique. Empty IDs hold their
    /// position in the listing but are not mapped.
    pub fn from_listing<I, S>(track_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut positions = HashMap::new();
        for (idx, id) in track_ids.into_iter().enumerate() {
            let id: String = id.into();
            if id.is_empty() {
                continue;
            }
            let position = u32::try_from(idx + 1).unwrap_or(Self::UNMAPPED - 1);
            positions.entry(id).or_insert(position);
        }
        Self { positions }
    }

    #[must_use]
    pub fn position(&self, track_id: &str) -> Option<u32> {
        self.positions.get(track_id).copied()
    }

    /// Position for sorting: unmapped or missing IDs sort after every
    /// mapped one.
    #[must_use]
    pub fn sort_position(&self, track_id: Option<&str>) -> u32 {
        track_id
            .and_then(|id| self.position(id))
            .unwrap_or(Self::UNMAPPED)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Source of authoritative album track order.
///
/// Implementations resolve the album that `seed_track_id` belongs to and
/// return its track positions. Failures are not errors here: an
/// implementation that cannot resolve the order returns an empty map and
/// callers fall back to their own ordering.
#[async_trait]
pub trait TrackOrderSource: Send + Sync {
    async fn album_order(&self, seed_track_id: &str) -> TrackOrderMap;
}

#[async_trait]
impl<T: TrackOrderSource> TrackOrderSource for Option<T> {
    async fn album_order(&self, seed_track_id: &str) -> TrackOrderMap {
        match self {
            Some(source) => source.album_order(seed_track_id).await,
            None => TrackOrderMap::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct FixedOrder(Vec<&'static str>);

    #[async_trait]
    impl TrackOrderSource for FixedOrder {
        async fn album_order(&self, _seed_track_id: &str) -> TrackOrderMap {
            TrackOrderMap::from_listing(self.0.iter().copied())
        }
    }

    #[test]
    fn test_listing_positions_are_one_based() {
        let map = TrackOrderMap::from_listing(["a", "b", "c"]);
        assert_eq!(map.position("a"), Some(1));
        assert_eq!(map.position("b"), Some(2));
        assert_eq!(map.position("c"), Some(3));
        assert_eq!(map.position("d"), None);
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_repeated_id_keeps_first_position() {
        let map = TrackOrderMap::from_listing(["a", "b", "a"]);
        assert_eq!(map.position("a"), Some(1));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_empty_ids_keep_their_slot() {
        let map = TrackOrderMap::from_listing(["a", "", "c"]);
        assert_eq!(map.position("c"), Some(3));
        assert_eq!(map.position(""), None);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_sort_position_sentinel() {
        let map = TrackOrderMap::from_listing(["a"]);
        assert_eq!(map.sort_position(Some("a")), 1);
        assert_eq!(map.sort_position(Some("zzz")), TrackOrderMap::UNMAPPED);
        assert_eq!(map.sort_position(None), TrackOrderMap::UNMAPPED);
    }

    #[tokio::test]
    async fn test_absent_source_yields_empty_map() {
        let source: Option<FixedOrder> = None;
        assert!(source.album_order("seed").await.is_empty());
    }

    #[tokio::test]
    async fn test_present_source_is_consulted() {
        let source = Some(FixedOrder(vec!["x", "y"]));
        let map = source.album_order("seed").await;
        assert_eq!(map.position("y"), Some(2));
    }
}
