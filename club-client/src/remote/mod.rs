//! Backend primitives
//!
//! [`Remote`] mirrors the account and row endpoints one call per method and
//! speaks raw JSON. Typing, defaults and error conversion live one level up in
//! [`BackendClient`](crate::BackendClient).

mod appwrite;
mod memory;

pub use appwrite::AppwriteRemote;
pub use memory::MemoryRemote;

use async_trait::async_trait;
use serde_json::Value;
use shared::{Query, RowList};

use crate::error::RemoteResult;

#[async_trait]
pub trait Remote: Send + Sync {
    /// Create an account; returns the account payload
    async fn create_account(
        &self,
        user_id: &str,
        email: &str,
        password: &str,
        name: &str,
    ) -> RemoteResult<Value>;

    /// Start an email/password session on this device
    async fn create_email_session(&self, email: &str, password: &str) -> RemoteResult<Value>;

    /// Account of the current session
    async fn get_account(&self) -> RemoteResult<Value>;

    /// End the current session
    async fn delete_current_session(&self) -> RemoteResult<()>;

    async fn list_rows(&self, table_id: &str, queries: &[Query]) -> RemoteResult<RowList<Value>>;

    async fn create_row(&self, table_id: &str, row_id: &str, data: Value) -> RemoteResult<Value>;

    /// Partial update; fields absent from `data` keep their values
    async fn update_row(&self, table_id: &str, row_id: &str, data: Value) -> RemoteResult<Value>;
}
