//! Row list envelope
//!
//! The backend answers every list-rows call with the matching row count and
//! the rows themselves:
//! ```json
//! { "total": 2, "rows": [ { "$id": "...", ... }, ... ] }
//! ```

use serde::{Deserialize, Serialize};

/// One page of rows returned by a list-rows query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowList<T> {
    /// Total number of rows matching the query (may exceed `rows.len()` when limited)
    #[serde(default)]
    pub total: u64,
    pub rows: Vec<T>,
}

impl<T> RowList<T> {
    /// First row, if any
    pub fn into_first(self) -> Option<T> {
        self.rows.into_iter().next()
    }
}

impl<T> Default for RowList<T> {
    fn default() -> Self {
        Self {
            total: 0,
            rows: Vec::new(),
        }
    }
}
