//! Friendly messages for searches that come back empty.

use std::fmt;

use cadenza_core::SuggestionKind;

use crate::corpus::CorpusIndex;

/// How many related artists to mention at most.
const MAX_SIMILAR_ARTISTS: usize = 2;

/// Explains an empty result list in terms of what the corpus knows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmptyResultHint {
    /// The query names a known artist. `similar` lists related artists
    /// that do have performances.
    KnownArtist { artist: String, similar: Vec<String> },
    /// The query names a known song.
    KnownSong { song: String },
    /// The query matches nothing the corpus knows about.
    Unknown { query: String },
}

/// Build a hint for a search on `query` that returned nothing.
///
/// Matching against the corpus is exact (case-sensitive), because the
/// query usually comes from an accepted suggestion.
#[must_use]
pub fn empty_result_hint(query: &str, index: &CorpusIndex) -> EmptyResultHint {
    if index.contains(SuggestionKind::Artist, query) {
        return EmptyResultHint::KnownArtist {
            artist: query.to_string(),
            similar: similar_artists(query, index),
        };
    }
    if index.contains(SuggestionKind::Song, query) {
        return EmptyResultHint::KnownSong {
            song: query.to_string(),
        };
    }
    EmptyResultHint::Unknown {
        query: query.to_string(),
    }
}

/// Artists sharing a first word with `artist`, in either direction.
fn similar_artists(artist: &str, index: &CorpusIndex) -> Vec<String> {
    let lowered = artist.to_lowercase();
    let head = first_word(&lowered);

    index
        .labels(SuggestionKind::Artist)
        .iter()
        .filter(|candidate| candidate.as_str() != artist)
        .filter(|candidate| {
            let candidate = candidate.to_lowercase();
            candidate.contains(head) || lowered.contains(first_word(&candidate))
        })
        .take(MAX_SIMILAR_ARTISTS)
        .cloned()
        .collect()
}

fn first_word(s: &str) -> &str {
    s.split(' ').next().unwrap_or_default()
}

impl fmt::Display for EmptyResultHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KnownArtist { artist, similar } if similar.is_empty() => write!(
                f,
                "No {artist} performances yet. Maybe suggest it for a future cover?"
            ),
            Self::KnownArtist { artist, similar } => write!(
                f,
                "No {artist} performances yet, but there are some by {}!",
                similar.join(" and ")
            ),
            Self::KnownSong { .. } => write!(
                f,
                "That song hasn't been performed yet. Try searching for the artist instead!"
            ),
            Self::Unknown { query } => write!(
                f,
                "Hmm, looks like \"{query}\" isn't in the repertoire yet. Try an artist or genre!"
            ),
        }
    }
}
