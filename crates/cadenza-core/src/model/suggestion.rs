use serde::{Deserialize, Serialize};
use std::fmt;

/// Which label set an autocomplete suggestion came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Artist,
    Song,
    Album,
    Genre,
}

impl SuggestionKind {
    /// Every kind, in the order suggestions are collected.
    pub const ALL: [Self; 4] = [Self::Artist, Self::Song, Self::Album, Self::Genre];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Artist => "artist",
            Self::Song => "song",
            Self::Album => "album",
            Self::Genre => "genre",
        }
    }
}

impl fmt::Display for SuggestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An autocomplete suggestion.
///
/// `value` is taken verbatim from a performance field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SuggestionOption {
    pub value: String,
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
}

impl SuggestionOption {
    #[must_use]
    pub fn new(value: impl Into<String>, kind: SuggestionKind) -> Self {
        Self {
            value: value.into(),
            kind,
        }
    }
}

impl fmt::Display for SuggestionOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.value, self.kind)
    }
}
