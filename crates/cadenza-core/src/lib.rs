//! Core domain model for cadenza.
//!
//! This crate defines the catalog's performance records, autocomplete
//! suggestion types, and the track-order port that the ranking layer
//! uses to ask an external provider for album track positions.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod model;
pub mod track_order;

pub use model::{Genre, GenreAssociation, Performance, SuggestionKind, SuggestionOption};
pub use track_order::{TrackOrderMap, TrackOrderSource};
