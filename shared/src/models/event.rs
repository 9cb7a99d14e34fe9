//! Event Model

use serde::{Deserialize, Serialize};

/// Club event row (read-only for this client)
///
/// `date` is the backend's sort key; rows arrive ordered by it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "$id")]
    pub row_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub date: String,
    #[serde(default)]
    pub time: String,
    /// Owning club, free text (not enforced against the club enum)
    #[serde(default)]
    pub club: String,
    #[serde(default)]
    pub location: String,
}
