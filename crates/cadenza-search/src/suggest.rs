//! Autocomplete over the corpus label sets.

use cadenza_core::{SuggestionKind, SuggestionOption};

use crate::corpus::CorpusIndex;

/// Queries shorter than this (in characters) produce no suggestions.
pub const MIN_QUERY_CHARS: usize = 2;

/// Maximum number of suggestions returned.
pub const MAX_SUGGESTIONS: usize = 5;

/// Suggest labels that contain `query`, case-insensitively.
///
/// Every matching label in every set becomes one option, so a label that
/// is both a song and an album appears twice with different kinds.
/// Labels starting with the query come first; each group is ordered by
/// value. At most [`MAX_SUGGESTIONS`] options are returned.
#[must_use]
pub fn suggest(query: &str, index: &CorpusIndex) -> Vec<SuggestionOption> {
    if query.chars().count() < MIN_QUERY_CHARS {
        return Vec::new();
    }

    let needle = query.to_lowercase();
    let mut matches: Vec<(bool, SuggestionOption)> = Vec::new();

    for kind in SuggestionKind::ALL {
        for label in index.labels(kind) {
            let lowered = label.to_lowercase();
            if lowered.contains(&needle) {
                let not_prefix = !lowered.starts_with(&needle);
                matches.push((not_prefix, SuggestionOption::new(label.clone(), kind)));
            }
        }
    }

    // Stable: equal values keep the artist/song/album/genre order.
    matches.sort_by(|(a_rest, a), (b_rest, b)| {
        a_rest.cmp(b_rest).then_with(|| a.value.cmp(&b.value))
    });
    matches.truncate(MAX_SUGGESTIONS);
    matches.into_iter().map(|(_, option)| option).collect()
}

/// The rotating "displayed suggestion" over a suggestion list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuggestionCycle {
    options: Vec<SuggestionOption>,
    index: usize,
}

impl SuggestionCycle {
    #[must_use]
    pub fn new(options: Vec<SuggestionOption>) -> Self {
        Self { options, index: 0 }
    }

    #[must_use]
    pub fn options(&self) -> &[SuggestionOption] {
        &self.options
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// The option currently on display.
    #[must_use]
    pub fn current(&self) -> Option<&SuggestionOption> {
        self.options.get(self.index)
    }

    /// Move to the next option, wrapping to the first after the last.
    pub fn advance(&mut self) -> Option<&SuggestionOption> {
        if self.options.is_empty() {
            return None;
        }
        self.index = (self.index + 1) % self.options.len();
        self.current()
    }
}
