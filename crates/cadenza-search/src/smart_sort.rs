//! Smart sort: reorders raw catalog results for display.
//!
//! Two strategies are available:
//!
//! - **Album order**: when more than [`ALBUM_MATCH_THRESHOLD`] results belong
//!   to an album matching the query, the album's tracks are put in the order
//!   reported by a [`TrackOrderSource`] and the remaining results follow
//!   unchanged.
//! - **Grouped duplicates**: results are grouped by identity key (Spotify
//!   track ID, else lowercased song name). Groups keep first-seen order;
//!   inside a group, unapproved performances come before approved ones and
//!   newer recordings (higher `video_no`) come first.
//!
//! When album order cannot be resolved, grouped duplicates is applied to the
//! whole result list, not just the album matches.

use std::collections::HashMap;
use std::fmt;

use cadenza_core::{Performance, TrackOrderMap, TrackOrderSource};

/// Album order is only attempted above this many album matches.
pub const ALBUM_MATCH_THRESHOLD: usize = 3;

/// Which strategy produced a ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortStrategy {
    /// Album matches ordered by external track position.
    AlbumOrder,
    /// Results grouped by identity key.
    GroupedDuplicates,
    /// Album order was attempted but unavailable; results grouped instead.
    AlbumOrderFallback,
}

impl fmt::Display for SortStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::AlbumOrder => "album order",
            Self::GroupedDuplicates => "grouped duplicates",
            Self::AlbumOrderFallback => "grouped duplicates (album order unavailable)",
        };
        f.write_str(label)
    }
}

/// A ranked result list and the strategy that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct SmartSorted {
    pub performances: Vec<Performance>,
    pub strategy: SortStrategy,
}

/// Rank `results` for `query`, consulting `resolver` for album order.
///
/// Never fails and never drops or duplicates a performance.
pub async fn rank<R>(results: Vec<Performance>, query: &str, resolver: &R) -> Vec<Performance>
where
    R: TrackOrderSource + ?Sized,
{
    smart_sort(results, query, resolver).await.performances
}

/// Like [`rank`], but also reports which strategy was used.
pub async fn smart_sort<R>(results: Vec<Performance>, query: &str, resolver: &R) -> SmartSorted
where
    R: TrackOrderSource + ?Sized,
{
    let needle = query.trim().to_lowercase();
    let album_matches = results.iter().filter(|p| p.album_contains(&needle)).count();

    if album_matches <= ALBUM_MATCH_THRESHOLD {
        return SmartSorted {
            performances: group_duplicates(results),
            strategy: SortStrategy::GroupedDuplicates,
        };
    }

    let seed = results
        .iter()
        .filter(|p| p.album_contains(&needle))
        .find_map(Performance::spotify_track_id)
        .map(str::to_string);

    let order = match seed {
        Some(seed) => resolver.album_order(&seed).await,
        None => {
            log::debug!("No album match for {:?} has a Spotify ID", needle);
            TrackOrderMap::default()
        }
    };

    if order.is_empty() {
        log::debug!(
            "Album order unavailable for {:?}; grouping {} results",
            needle,
            results.len()
        );
        return SmartSorted {
            performances: group_duplicates(results),
            strategy: SortStrategy::AlbumOrderFallback,
        };
    }

    let (mut on_album, rest): (Vec<_>, Vec<_>) =
        results.into_iter().partition(|p| p.album_contains(&needle));
    on_album.sort_by_key(|p| order.sort_position(p.spotify_track_id()));
    on_album.extend(rest);

    SmartSorted {
        performances: on_album,
        strategy: SortStrategy::AlbumOrder,
    }
}

/// Group by identity key, groups in first-seen order, each group sorted
/// unapproved-first then newest-first.
#[must_use]
pub fn group_duplicates(performances: Vec<Performance>) -> Vec<Performance> {
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<Vec<Performance>> = Vec::new();

    for perf in performances {
        let key = perf.identity_key();
        let slot = *slots.entry(key).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push(perf);
    }

    groups
        .into_iter()
        .flat_map(|mut group| {
            group.sort_by(|a, b| {
                a.approved
                    .cmp(&b.approved)
                    .then_with(|| b.video_no.cmp(&a.video_no))
            });
            group
        })
        .collect()
}
