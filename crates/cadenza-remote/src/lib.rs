//! Remote services and runtime state for cadenza.
//!
//! Clients for the performance catalog and for Spotify album track order,
//! the shared autocomplete corpus, the rotating suggestion ticker, and the
//! [`Explorer`] that ties them to the ranking functions in `cadenza-search`.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod catalog;
pub mod config;
pub mod corpus;
pub mod error;
pub mod explorer;
pub mod spotify;
pub mod ticker;

pub use catalog::{CatalogClient, CatalogSource};
pub use config::Config;
pub use corpus::CorpusCache;
pub use error::{RemoteError, RemoteResult};
pub use explorer::{Explorer, SearchState, SUGGESTION_INTERVAL};
pub use spotify::{BearerToken, SpotifyClient, SpotifyCredentials, SpotifyTrackOrder, TokenCache};
pub use ticker::SuggestionTicker;
