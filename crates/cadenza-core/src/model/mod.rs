pub mod genre;
pub mod performance;
pub mod suggestion;

use serde::{Deserialize, Deserializer};

pub use genre::{Genre, GenreAssociation};
pub use performance::Performance;
pub use suggestion::{SuggestionKind, SuggestionOption};

/// Deserialize `null` the same as a missing field.
///
/// The catalog sends `null` for absent values; `#[serde(default)]` alone
/// only covers missing keys.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
