//! Identity Model

use serde::{Deserialize, Serialize};

/// Authenticated account as known to the backend
///
/// Only the fields the client reads are modelled; the account payload carries
/// many more (preferences, registration date, verification flags) which are
/// ignored on deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

impl Identity {
    /// Splits the display name into first and last name on a single space.
    ///
    /// Only the first two pieces are used; missing pieces are empty.
    pub fn split_name(&self) -> (String, String) {
        let mut parts = self.name.split(' ');
        let first = parts.next().unwrap_or_default().to_string();
        let last = parts.next().unwrap_or_default().to_string();
        (first, last)
    }
}
