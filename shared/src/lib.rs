//! Shared types for the club directory client
//!
//! Wire models for the hosted backend (identities, member rows, event rows),
//! the closed enums those rows carry, and the row query predicates the
//! backend understands.

pub mod models;
pub mod query;
pub mod response;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use models::{
    Classification, Club, Event, Identity, Member, MemberCreate, MemberOverrides, MemberUpdate,
    ParseEnumError, RelationshipStatus,
};
pub use query::Query;
pub use response::RowList;
