//! HTTP remote for the hosted backend

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde_json::{Value, json};
use shared::{Query, RowList};

use super::Remote;
use crate::config::ClientConfig;
use crate::error::{ClientError, RemoteError, RemoteResult};
use crate::storage::{SessionStorage, StoredSession};

/// Response format the row endpoints are written against
const RESPONSE_FORMAT: &str = "1.8.0";

/// Session cookie header for clients without a cookie jar
const FALLBACK_COOKIES: &str = "X-Fallback-Cookies";

/// Error body returned by the backend
#[derive(serde::Deserialize)]
struct ApiErrorResponse {
    message: String,
    #[serde(default)]
    code: u16,
    #[serde(rename = "type", default)]
    kind: String,
}

/// Network remote
#[derive(Debug)]
pub struct AppwriteRemote {
    client: Client,
    base_url: String,
    project_id: String,
    origin: String,
    database_id: String,
    /// Fallback cookie of the current session
    session: Mutex<Option<String>>,
    storage: Option<SessionStorage>,
}

impl AppwriteRemote {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()
            .map_err(|e| ClientError::Config(e.to_string()))?;

        let storage = config.session_file.clone().map(SessionStorage::new);
        let session = storage
            .as_ref()
            .and_then(|s| s.load_for(&config.project_id));
        if session.is_some() {
            tracing::debug!("Restored stored session cookie");
        }

        Ok(Self {
            client,
            base_url: config.base_url().to_string(),
            project_id: config.project_id.clone(),
            origin: format!("appwrite-android://{}", config.platform),
            database_id: config.database_id.clone(),
            session: Mutex::new(session),
            storage,
        })
    }

    /// Base URL of the API
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether a session cookie is held
    pub fn has_session(&self) -> bool {
        self.cookie().is_some()
    }

    fn cookie(&self) -> Option<String> {
        match self.session.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn set_cookie(&self, cookie: Option<String>) {
        match self.session.lock() {
            Ok(mut guard) => *guard = cookie.clone(),
            Err(poisoned) => *poisoned.into_inner() = cookie.clone(),
        }

        let Some(storage) = &self.storage else {
            return;
        };
        let result = match cookie {
            Some(cookie) => storage.save(&StoredSession::new(&self.project_id, cookie)),
            None => storage.delete(),
        };
        if let Err(e) = result {
            tracing::warn!(path = %storage.path().display(), "Failed to persist session: {}", e);
        }
    }

    fn rows_path(&self, table_id: &str) -> String {
        format!("tablesdb/{}/tables/{}/rows", self.database_id, table_id)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, path);
        let mut req = self
            .client
            .request(method, &url)
            .header("X-Appwrite-Project", &self.project_id)
            .header("X-Appwrite-Response-Format", RESPONSE_FORMAT)
            .header(reqwest::header::ORIGIN, &self.origin);
        if let Some(cookie) = self.cookie() {
            req = req.header(FALLBACK_COOKIES, cookie);
        }
        req
    }

    async fn send(&self, req: RequestBuilder) -> RemoteResult<Value> {
        let response = req.send().await?;
        let status = response.status();

        if let Some(cookie) = response
            .headers()
            .get(FALLBACK_COOKIES)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty() && *v != "[]")
        {
            self.set_cookie(Some(cookie.to_string()));
        }

        let text = response.text().await?;
        if !status.is_success() {
            return Err(Self::api_error(status, &text));
        }
        if status == StatusCode::NO_CONTENT || text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }

    fn api_error(status: StatusCode, body: &str) -> RemoteError {
        match serde_json::from_str::<ApiErrorResponse>(body) {
            Ok(err) => {
                let code = if err.code == 0 { status.as_u16() } else { err.code };
                RemoteError::api(code, err.kind, err.message)
            }
            Err(_) => RemoteError::api(
                status.as_u16(),
                "unknown",
                status.canonical_reason().unwrap_or("Unknown error"),
            ),
        }
    }
}

#[async_trait]
impl Remote for AppwriteRemote {
    async fn create_account(
        &self,
        user_id: &str,
        email: &str,
        password: &str,
        name: &str,
    ) -> RemoteResult<Value> {
        let body = json!({ "userId": user_id, "email": email, "password": password, "name": name });
        self.send(self.request(Method::POST, "account").json(&body))
            .await
    }

    async fn create_email_session(&self, email: &str, password: &str) -> RemoteResult<Value> {
        let body = json!({ "email": email, "password": password });
        self.send(self.request(Method::POST, "account/sessions/email").json(&body))
            .await
    }

    async fn get_account(&self) -> RemoteResult<Value> {
        self.send(self.request(Method::GET, "account")).await
    }

    async fn delete_current_session(&self) -> RemoteResult<()> {
        let result = self
            .send(self.request(Method::DELETE, "account/sessions/current"))
            .await;
        match result {
            Ok(_) => {
                self.set_cookie(None);
                Ok(())
            }
            // Server no longer knows the session; forget it locally as well
            Err(e) if e.is_unauthorized() => {
                self.set_cookie(None);
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    async fn list_rows(&self, table_id: &str, queries: &[Query]) -> RemoteResult<RowList<Value>> {
        let params: Vec<(&str, String)> = queries.iter().map(|q| ("queries[]", q.to_wire())).collect();
        tracing::debug!(table = table_id, queries = queries.len(), "List rows");
        let value = self
            .send(self.request(Method::GET, &self.rows_path(table_id)).query(&params))
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn create_row(&self, table_id: &str, row_id: &str, data: Value) -> RemoteResult<Value> {
        tracing::debug!(table = table_id, row = row_id, "Create row");
        let body = json!({ "rowId": row_id, "data": data });
        self.send(self.request(Method::POST, &self.rows_path(table_id)).json(&body))
            .await
    }

    async fn update_row(&self, table_id: &str, row_id: &str, data: Value) -> RemoteResult<Value> {
        tracing::debug!(table = table_id, row = row_id, "Update row");
        let path = format!("{}/{}", self.rows_path(table_id), row_id);
        let body = json!({ "data": data });
        self.send(self.request(Method::PATCH, &path).json(&body)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_api_error_body() {
        let body = r#"{"message":"Invalid credentials.","code":401,"type":"user_invalid_credentials","version":"1.8.0"}"#;
        let err = AppwriteRemote::api_error(StatusCode::UNAUTHORIZED, body);
        assert!(err.is_unauthorized());
        match err {
            RemoteError::Api { kind, message, .. } => {
                assert_eq!(kind, "user_invalid_credentials");
                assert_eq!(message, "Invalid credentials.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_api_error_without_body() {
        let err = AppwriteRemote::api_error(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>");
        assert_eq!(err.status(), Some(502));
    }

    #[test]
    fn test_restores_stored_session() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        let config = ClientConfig::new("http://localhost:9/v1")
            .with_project("proj")
            .with_session_file(&path);

        SessionStorage::new(&path)
            .save(&StoredSession::new("proj", "cookie-value"))
            .unwrap();

        let remote = AppwriteRemote::new(&config).unwrap();
        assert!(remote.has_session());

        remote.set_cookie(None);
        assert!(!remote.has_session());
        assert!(!path.exists());
    }

    #[test]
    fn test_rows_path() {
        let config = ClientConfig::new("http://localhost:9/v1/")
            .with_platform("edu.example.club")
            .with_database("db1");
        let remote = AppwriteRemote::new(&config).unwrap();
        assert_eq!(remote.base_url(), "http://localhost:9/v1");
        assert_eq!(remote.origin, "appwrite-android://edu.example.club");
        assert_eq!(remote.rows_path("members"), "tablesdb/db1/tables/members/rows");
    }
}
