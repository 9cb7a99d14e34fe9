//! Data models
//!
//! Row shapes exchanged with the hosted backend. Field names on the wire are
//! camelCase (`firstName`, `userID`, `imageURL`); backend metadata such as the
//! row id travels as `$id`.

pub mod club;
pub mod event;
pub mod identity;
pub mod member;

// Re-exports
pub use club::*;
pub use event::*;
pub use identity::*;
pub use member::*;

use serde::{Deserialize, Deserializer};

/// Treats an explicit `null` the same as a missing field.
///
/// Older member rows were written with `email: null` and empty phones.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Wraps whatever is present, so an explicit `null` reads as `Some(None)`.
///
/// Paired with `#[serde(default)]`, a missing field stays `None`.
pub(crate) fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}
