//! Label sets derived from a bulk catalog snapshot.

use std::collections::BTreeSet;

use cadenza_core::{Performance, SuggestionKind};

/// Unique artist, song, album, and genre labels from the catalog.
///
/// Labels are stored verbatim. Empty labels are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorpusIndex {
    artists: BTreeSet<String>,
    songs: BTreeSet<String>,
    albums: BTreeSet<String>,
    genres: BTreeSet<String>,
}

impl CorpusIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold every performance's labels into a fresh index.
    pub fn from_performances<'a, I>(performances: I) -> Self
    where
        I: IntoIterator<Item = &'a Performance>,
    {
        let mut index = Self::new();
        for perf in performances {
            index.insert(SuggestionKind::Artist, &perf.artist_name);
            index.insert(SuggestionKind::Song, &perf.song_name);
            index.insert(SuggestionKind::Album, &perf.album_name);
            for genre in perf.genre_names() {
                index.insert(SuggestionKind::Genre, genre);
            }
        }
        index
    }

    /// Add a label. Returns `false` for empty or already-known labels.
    pub fn insert(&mut self, kind: SuggestionKind, label: &str) -> bool {
        if label.is_empty() {
            return false;
        }
        self.set_mut(kind).insert(label.to_string())
    }

    #[must_use]
    pub fn labels(&self, kind: SuggestionKind) -> &BTreeSet<String> {
        match kind {
            SuggestionKind::Artist => &self.artists,
            SuggestionKind::Song => &self.songs,
            SuggestionKind::Album => &self.albums,
            SuggestionKind::Genre => &self.genres,
        }
    }

    /// Exact, case-sensitive membership test.
    #[must_use]
    pub fn contains(&self, kind: SuggestionKind, label: &str) -> bool {
        self.labels(kind).contains(label)
    }

    /// Total number of labels across all four sets.
    #[must_use]
    pub fn len(&self) -> usize {
        SuggestionKind::ALL
            .iter()
            .map(|kind| self.labels(*kind).len())
            .sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn set_mut(&mut self, kind: SuggestionKind) -> &mut BTreeSet<String> {
        match kind {
            SuggestionKind::Artist => &mut self.artists,
            SuggestionKind::Song => &mut self.songs,
            SuggestionKind::Album => &mut self.albums,
            SuggestionKind::Genre => &mut self.genres,
        }
    }
}
