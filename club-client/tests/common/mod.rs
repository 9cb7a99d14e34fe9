// club-client/tests/common/mod.rs
// Fixtures shared by the integration tests

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use club_client::{BackendClient, ClientConfig, MemoryRemote, Query, Remote, RemoteResult};
use serde_json::{Value, json};
use shared::RowList;
use tokio::sync::Semaphore;

pub fn member_row(id: i64, first: &str, last: &str, club: &str, user_id: Option<&str>) -> Value {
    json!({
        "$id": format!("row-{id}"),
        "id": id,
        "firstName": first,
        "lastName": last,
        "relationshipStatus": "Single",
        "classification": "Sophomore",
        "club": club,
        "userID": user_id,
        "phone": "555-0100",
        "email": format!("{}@example.com", first.to_lowercase()),
        "showEmail": true,
        "showPhone": true,
        "officer": null,
        "imageURL": "https://img.example/p.png"
    })
}

pub fn event_row(title: &str, date: &str) -> Value {
    json!({
        "title": title,
        "description": format!("{title} description"),
        "date": date,
        "time": "7:00 PM",
        "club": "Omega Chi",
        "location": "Student Center"
    })
}

pub fn backend(remote: MemoryRemote) -> Arc<BackendClient<MemoryRemote>> {
    Arc::new(BackendClient::new(remote, &ClientConfig::default()))
}

/// Remote whose session creation waits for a permit, to hold a login open
pub struct GatedRemote {
    pub inner: MemoryRemote,
    pub gate: Arc<Semaphore>,
}

impl GatedRemote {
    pub fn new(inner: MemoryRemote) -> Self {
        Self {
            inner,
            gate: Arc::new(Semaphore::new(0)),
        }
    }
}

#[async_trait]
impl Remote for GatedRemote {
    async fn create_account(
        &self,
        user_id: &str,
        email: &str,
        password: &str,
        name: &str,
    ) -> RemoteResult<Value> {
        self.inner.create_account(user_id, email, password, name).await
    }

    async fn create_email_session(&self, email: &str, password: &str) -> RemoteResult<Value> {
        let permit = self.gate.acquire().await;
        drop(permit);
        self.inner.create_email_session(email, password).await
    }

    async fn get_account(&self) -> RemoteResult<Value> {
        self.inner.get_account().await
    }

    async fn delete_current_session(&self) -> RemoteResult<()> {
        self.inner.delete_current_session().await
    }

    async fn list_rows(&self, table_id: &str, queries: &[Query]) -> RemoteResult<RowList<Value>> {
        self.inner.list_rows(table_id, queries).await
    }

    async fn create_row(&self, table_id: &str, row_id: &str, data: Value) -> RemoteResult<Value> {
        self.inner.create_row(table_id, row_id, data).await
    }

    async fn update_row(&self, table_id: &str, row_id: &str, data: Value) -> RemoteResult<Value> {
        self.inner.update_row(table_id, row_id, data).await
    }
}
