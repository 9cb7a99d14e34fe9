//! In-process remote
//!
//! Keeps accounts, one device session and table rows in memory and evaluates
//! row queries the way the hosted backend does. Every list-rows call is
//! recorded so callers can check which predicates were actually requested.
//! Used by tests and for running the front end without a backend.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Map, Value, json};
use shared::{Query, RowList};

use super::Remote;
use crate::error::{RemoteError, RemoteResult};

const MIN_PASSWORD_LEN: usize = 8;

/// Rows per page when a list-rows call carries no limit
pub const DEFAULT_PAGE_SIZE: usize = 25;

#[derive(Debug, Clone)]
struct Account {
    id: String,
    email: String,
    password: String,
    name: String,
}

impl Account {
    fn to_value(&self) -> Value {
        json!({ "$id": self.id, "name": self.name, "email": self.email })
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    accounts: Vec<Account>,
    /// Account id of the current session
    current: Option<String>,
    /// Rows per table, in insertion order
    tables: HashMap<String, Vec<Value>>,
    query_log: Vec<(String, Vec<Query>)>,
    offline: bool,
}

/// In-memory remote
#[derive(Debug, Default)]
pub struct MemoryRemote {
    inner: Mutex<MemoryState>,
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed rows into a table; rows without `$id` get one
    pub fn with_rows(self, table_id: &str, rows: impl IntoIterator<Item = Value>) -> Self {
        for row in rows {
            self.insert_row(table_id, row);
        }
        self
    }

    /// Seed an account without starting a session
    pub fn with_account(self, email: &str, password: &str, name: &str) -> Self {
        {
            let mut state = self.lock();
            let id = format!("user-{}", state.accounts.len() + 1);
            state.accounts.push(Account {
                id,
                email: email.to_string(),
                password: password.to_string(),
                name: name.to_string(),
            });
        }
        self
    }

    pub fn insert_row(&self, table_id: &str, mut row: Value) {
        let mut state = self.lock();
        let rows = state.tables.entry(table_id.to_string()).or_default();
        if let Value::Object(map) = &mut row
            && !map.contains_key("$id")
        {
            map.insert("$id".into(), Value::String(format!("row-{}", rows.len() + 1)));
        }
        rows.push(row);
    }

    /// All rows of a table in insertion order
    pub fn rows(&self, table_id: &str) -> Vec<Value> {
        self.lock().tables.get(table_id).cloned().unwrap_or_default()
    }

    /// Predicates of every list-rows call made against a table
    pub fn queries_for(&self, table_id: &str) -> Vec<Vec<Query>> {
        self.lock()
            .query_log
            .iter()
            .filter(|(table, _)| table == table_id)
            .map(|(_, queries)| queries.clone())
            .collect()
    }

    /// Id of the account holding the current session
    pub fn current_account_id(&self) -> Option<String> {
        self.lock().current.clone()
    }

    /// Makes every call fail with a transport error
    pub fn set_offline(&self, offline: bool) {
        self.lock().offline = offline;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Locks the state, failing when offline
    fn online(&self) -> RemoteResult<std::sync::MutexGuard<'_, MemoryState>> {
        let state = self.lock();
        if state.offline {
            return Err(RemoteError::Transport("network is unreachable".into()));
        }
        Ok(state)
    }
}

fn unauthorized() -> RemoteError {
    RemoteError::api(
        401,
        "general_unauthorized_scope",
        "User (role: guests) missing scopes ([\"account\"])",
    )
}

fn row_not_found() -> RemoteError {
    RemoteError::api(404, "row_not_found", "Row with the requested ID could not be found.")
}

/// Orders JSON scalars: numbers numerically, everything else by string form
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (None | Some(Value::Null), None | Some(Value::Null)) => Ordering::Equal,
        (None | Some(Value::Null), _) => Ordering::Less,
        (_, None | Some(Value::Null)) => Ordering::Greater,
        (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
    }
}

fn evaluate(rows: &[Value], queries: &[Query]) -> RowList<Value> {
    let mut matched: Vec<Value> = rows
        .iter()
        .filter(|row| {
            queries.iter().all(|q| match q {
                Query::Equal(attr, values) => row.get(attr).is_some_and(|v| values.contains(v)),
                _ => true,
            })
        })
        .cloned()
        .collect();

    // Stable sorts applied last-to-first make the first order clause primary
    for q in queries.iter().rev() {
        match q {
            Query::OrderAsc(attr) => matched.sort_by(|a, b| compare_values(a.get(attr), b.get(attr))),
            Query::OrderDesc(attr) => matched.sort_by(|a, b| compare_values(b.get(attr), a.get(attr))),
            _ => {}
        }
    }

    let total = matched.len() as u64;
    let limit = queries
        .iter()
        .find_map(|q| match q {
            Query::Limit(n) => Some(*n as usize),
            _ => None,
        })
        .unwrap_or(DEFAULT_PAGE_SIZE);
    let offset = queries
        .iter()
        .find_map(|q| match q {
            Query::Offset(n) => Some(*n as usize),
            _ => None,
        })
        .unwrap_or(0);

    RowList {
        total,
        rows: matched.into_iter().skip(offset).take(limit).collect(),
    }
}

#[async_trait]
impl Remote for MemoryRemote {
    async fn create_account(
        &self,
        user_id: &str,
        email: &str,
        password: &str,
        name: &str,
    ) -> RemoteResult<Value> {
        let mut state = self.online()?;
        if password.len() < MIN_PASSWORD_LEN {
            return Err(RemoteError::api(
                400,
                "general_argument_invalid",
                "Invalid `password` param: Password must be between 8 and 256 characters long.",
            ));
        }
        if state
            .accounts
            .iter()
            .any(|a| a.id == user_id || a.email.eq_ignore_ascii_case(email))
        {
            return Err(RemoteError::api(
                409,
                "user_already_exists",
                "A user with the same id, email, or phone already exists in this project.",
            ));
        }

        let account = Account {
            id: user_id.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            name: name.to_string(),
        };
        let value = account.to_value();
        state.accounts.push(account);
        Ok(value)
    }

    async fn create_email_session(&self, email: &str, password: &str) -> RemoteResult<Value> {
        let mut state = self.online()?;
        let account_id = state
            .accounts
            .iter()
            .find(|a| a.email.eq_ignore_ascii_case(email) && a.password == password)
            .map(|a| a.id.clone())
            .ok_or_else(|| {
                RemoteError::api(
                    401,
                    "user_invalid_credentials",
                    "Invalid credentials. Please check the email and password.",
                )
            })?;

        state.current = Some(account_id.clone());
        Ok(json!({ "$id": "current", "userId": account_id }))
    }

    async fn get_account(&self) -> RemoteResult<Value> {
        let state = self.online()?;
        let current = state.current.as_deref().ok_or_else(unauthorized)?;
        state
            .accounts
            .iter()
            .find(|a| a.id == current)
            .map(Account::to_value)
            .ok_or_else(unauthorized)
    }

    async fn delete_current_session(&self) -> RemoteResult<()> {
        let mut state = self.online()?;
        match state.current.take() {
            Some(_) => Ok(()),
            None => Err(unauthorized()),
        }
    }

    async fn list_rows(&self, table_id: &str, queries: &[Query]) -> RemoteResult<RowList<Value>> {
        let mut state = self.online()?;
        state
            .query_log
            .push((table_id.to_string(), queries.to_vec()));
        let rows = state.tables.get(table_id).map(Vec::as_slice).unwrap_or_default();
        Ok(evaluate(rows, queries))
    }

    async fn create_row(&self, table_id: &str, row_id: &str, data: Value) -> RemoteResult<Value> {
        let mut state = self.online()?;
        let Value::Object(mut map) = data else {
            return Err(RemoteError::api(400, "row_invalid_structure", "Row data must be an object."));
        };

        let rows = state.tables.entry(table_id.to_string()).or_default();
        if rows.iter().any(|r| r.get("$id").and_then(Value::as_str) == Some(row_id)) {
            return Err(RemoteError::api(
                409,
                "row_already_exists",
                "Row with the requested ID already exists.",
            ));
        }

        map.insert("$id".into(), Value::String(row_id.to_string()));
        map.insert("$tableId".into(), Value::String(table_id.to_string()));
        let row = Value::Object(map);
        rows.push(row.clone());
        Ok(row)
    }

    async fn update_row(&self, table_id: &str, row_id: &str, data: Value) -> RemoteResult<Value> {
        let mut state = self.online()?;
        let row = state
            .tables
            .get_mut(table_id)
            .and_then(|rows| {
                rows.iter_mut()
                    .find(|r| r.get("$id").and_then(Value::as_str) == Some(row_id))
            })
            .ok_or_else(row_not_found)?;

        let patch = match data {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        if let Value::Object(fields) = &mut *row {
            for (key, value) in patch {
                fields.insert(key, value);
            }
        }
        Ok(row.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote_with_events() -> MemoryRemote {
        MemoryRemote::new().with_rows(
            "events",
            [
                json!({ "title": "Formal", "date": "2025-12-05" }),
                json!({ "title": "Mixer", "date": "2025-11-14" }),
                json!({ "title": "Retreat", "date": "2026-01-20" }),
            ],
        )
    }

    fn titles(list: &RowList<Value>) -> Vec<&str> {
        list.rows.iter().filter_map(|r| r["title"].as_str()).collect()
    }

    #[tokio::test]
    async fn test_order_and_limit() {
        let remote = remote_with_events();

        let asc = remote.list_rows("events", &[Query::order_asc("date")]).await.unwrap();
        assert_eq!(titles(&asc), ["Mixer", "Formal", "Retreat"]);

        let desc = remote
            .list_rows("events", &[Query::order_desc("date"), Query::limit(2)])
            .await
            .unwrap();
        assert_eq!(titles(&desc), ["Retreat", "Formal"]);
        assert_eq!(desc.total, 3);

        assert_eq!(remote.queries_for("events").len(), 2);
        assert!(remote.queries_for("members").is_empty());
    }

    #[tokio::test]
    async fn test_unlimited_list_returns_one_page() {
        let remote = MemoryRemote::new().with_rows(
            "events",
            (0..30).map(|i| json!({ "title": format!("Event {i}"), "n": i })),
        );

        let first = remote.list_rows("events", &[]).await.unwrap();
        assert_eq!(first.rows.len(), DEFAULT_PAGE_SIZE);
        assert_eq!(first.total, 30);

        let rest = remote
            .list_rows("events", &[Query::limit(25), Query::offset(25)])
            .await
            .unwrap();
        assert_eq!(rest.rows.len(), 5);
        assert_eq!(rest.rows[0]["n"], 25);
        assert_eq!(rest.total, 30);
    }

    #[tokio::test]
    async fn test_equal_filter() {
        let remote = remote_with_events();
        let list = remote
            .list_rows("events", &[Query::equal("title", "Formal")])
            .await
            .unwrap();
        assert_eq!(titles(&list), ["Formal"]);

        let empty = remote.list_rows("missing", &[]).await.unwrap();
        assert!(empty.rows.is_empty());
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let remote = MemoryRemote::new();
        assert!(remote.get_account().await.unwrap_err().is_unauthorized());

        remote
            .create_account("u1", "ada@example.com", "password123", "Ada Lovelace")
            .await
            .unwrap();
        let dup = remote
            .create_account("u2", "ADA@example.com", "password123", "Other")
            .await
            .unwrap_err();
        assert_eq!(dup.status(), Some(409));

        let bad = remote
            .create_email_session("ada@example.com", "wrong")
            .await
            .unwrap_err();
        assert!(bad.is_unauthorized());

        remote
            .create_email_session("ada@example.com", "password123")
            .await
            .unwrap();
        assert_eq!(remote.get_account().await.unwrap()["$id"], "u1");

        remote.delete_current_session().await.unwrap();
        assert!(remote.delete_current_session().await.unwrap_err().is_unauthorized());
    }

    #[tokio::test]
    async fn test_update_missing_row() {
        let remote = MemoryRemote::new();
        let err = remote
            .update_row("members", "nope", json!({ "phone": "555" }))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_offline() {
        let remote = remote_with_events();
        remote.set_offline(true);
        let err = remote.list_rows("events", &[]).await.unwrap_err();
        assert!(matches!(err, RemoteError::Transport(_)));
    }
}
