//! Autocomplete and result ranking for cadenza.
//!
//! Everything here is a pure function of its inputs. Network access is
//! injected through [`cadenza_core::TrackOrderSource`], so the ranking
//! logic can be tested without a provider.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod corpus;
pub mod hint;
pub mod smart_sort;
pub mod suggest;

pub use corpus::CorpusIndex;
pub use hint::{empty_result_hint, EmptyResultHint};
pub use smart_sort::{rank, smart_sort, SmartSorted, SortStrategy};
pub use suggest::{suggest, SuggestionCycle, MAX_SUGGESTIONS};
