//! Club client - directory and events client for the hosted backend
//!
//! Typed access to accounts, member rows and event rows, the session context
//! the screens share, and the state behind the directory and events views.

pub mod backend;
pub mod config;
pub mod directory;
pub mod error;
pub mod events;
pub mod remote;
pub mod session;
pub mod storage;
pub mod task;

pub use backend::BackendClient;
pub use config::ClientConfig;
pub use directory::{DirectoryView, ProfileCard, fetch_directory, filter_members};
pub use error::{ClientError, ClientResult, RemoteError, RemoteResult};
pub use events::EventsView;
pub use remote::{AppwriteRemote, MemoryRemote, Remote};
pub use session::{OperationKind, Registration, SessionContext, SessionState};
pub use storage::{SessionStorage, StoredSession};
pub use task::ViewTask;

// Re-export shared types for convenience
pub use shared::{
    Classification, Club, Event, Identity, Member, MemberOverrides, MemberUpdate, Query,
    RelationshipStatus,
};
