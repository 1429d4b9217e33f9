use serde::{Deserialize, Serialize};

use crate::model::genre::GenreAssociation;
use crate::model::null_as_default;

/// A single recorded performance in the catalog.
///
/// Field names follow the catalog's JSON wire format. The catalog is not
/// strict about nulls, so string fields that arrive as `null` or are missing
/// entirely deserialize to the empty string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Performance {
    pub id: String,

    /// Ordinal of the recording. Higher numbers are more recent.
    #[serde(default, deserialize_with = "null_as_default")]
    pub video_no: i64,

    /// Link to the recorded video.
    #[serde(rename = "tiktokVideoLink", default, deserialize_with = "null_as_default")]
    pub video_link: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub song_name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub artist_name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub album_name: String,

    /// Spotify track ID of the song being performed.
    #[serde(default)]
    pub spotify_id: Option<String>,

    /// Video length in seconds.
    #[serde(default)]
    pub video_length: Option<f64>,

    /// Vetted/featured flag. Called `YesNo` on the wire.
    #[serde(rename = "YesNo", default, deserialize_with = "null_as_default")]
    pub approved: bool,

    #[serde(default, deserialize_with = "null_as_default")]
    pub song_genres: Vec<GenreAssociation>,
}

impl Performance {
    #[must_use]
    pub fn new(id: impl Into<String>, song_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            video_no: 0,
            video_link: String::new(),
            song_name: song_name.into(),
            artist_name: String::new(),
            album_name: String::new(),
            spotify_id: None,
            video_length: None,
            approved: false,
            song_genres: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_video_no(mut self, video_no: i64) -> Self {
        self.video_no = video_no;
        self
    }

    #[must_use]
    pub fn with_artist(mut self, artist_name: impl Into<String>) -> Self {
        self.artist_name = artist_name.into();
        self
    }

    #[must_use]
    pub fn with_album(mut self, album_name: impl Into<String>) -> Self {
        self.album_name = album_name.into();
        self
    }

    #[must_use]
    pub fn with_spotify_id(mut self, spotify_id: impl Into<String>) -> Self {
        self.spotify_id = Some(spotify_id.into());
        self
    }

    #[must_use]
    pub fn with_approved(mut self, approved: bool) -> Self {
        self.approved = approved;
        self
    }

    #[must_use]
    pub fn with_genre(mut self, association: GenreAssociation) -> Self {
        self.song_genres.push(association);
        self
    }

    /// The Spotify track ID, if present and non-empty.
    #[must_use]
    pub fn spotify_track_id(&self) -> Option<&str> {
        self.spotify_id.as_deref().filter(|id| !id.is_empty())
    }

    /// Key used to group re-recordings of the same song.
    ///
    /// The Spotify track ID when known, otherwise the lowercased song name.
    #[must_use]
    pub fn identity_key(&self) -> String {
        self.spotify_track_id()
            .map_or_else(|| self.song_name.to_lowercase(), str::to_string)
    }

    /// Case-insensitive album match. `needle` must already be lowercased.
    #[must_use]
    pub fn album_contains(&self, needle: &str) -> bool {
        self.album_name.to_lowercase().contains(needle)
    }

    pub fn genre_names(&self) -> impl Iterator<Item = &str> {
        self.song_genres.iter().map(|sg| sg.genre.name.as_str())
    }

    /// Video length rendered as `m:ss`, if known.
    #[must_use]
    pub fn formatted_length(&self) -> Option<String> {
        let secs = self.video_length.filter(|l| l.is_finite() && *l >= 0.0)?;
        let total = secs.round() as u64;
        Some(format!("{}:{:02}", total / 60, total % 60))
    }
}
