use serde::{Deserialize, Serialize};

use crate::model::null_as_default;

/// A genre label from the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Genre {
    /// Catalog genre ID. Called `genre` on the wire.
    #[serde(rename = "genre", default, deserialize_with = "null_as_default")]
    pub id: String,

    /// Display name (e.g., "Film Score").
    #[serde(rename = "genreName", default, deserialize_with = "null_as_default")]
    pub name: String,
}

impl Genre {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Links a performance to one of its genres.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreAssociation {
    #[serde(rename = "genreId", default, deserialize_with = "null_as_default")]
    pub genre_id: String,

    #[serde(rename = "performanceId", default, deserialize_with = "null_as_default")]
    pub performance_id: String,

    #[serde(rename = "Genre", default, deserialize_with = "null_as_default")]
    pub genre: Genre,
}

impl GenreAssociation {
    #[must_use]
    pub fn new(performance_id: impl Into<String>, genre: Genre) -> Self {
        Self {
            genre_id: genre.id.clone(),
            performance_id: performance_id.into(),
            genre,
        }
    }
}
