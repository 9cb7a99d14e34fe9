//! Backend client facade
//!
//! Typed operations over a [`Remote`]. This is the boundary where raw JSON is
//! validated against the shared models and [`RemoteError`]s are converted into
//! the [`ClientError`] taxonomy.

use rand::Rng;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::models::{DEFAULT_PHONE, PLACEHOLDER_IMAGE_URL};
use shared::{
    Classification, Club, Event, Identity, Member, MemberCreate, MemberOverrides, MemberUpdate,
    Query, RelationshipStatus,
};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult, RemoteError};
use crate::remote::{AppwriteRemote, Remote};

/// Rows requested per list-rows page
pub const PAGE_SIZE: u32 = 100;

/// Range member numbers are drawn from
const MEMBER_ID_RANGE: std::ops::Range<i64> = 1000..100_000;

/// Fresh unique id for accounts and rows
fn unique_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

fn decode<T: DeserializeOwned>(value: Value, what: &str) -> ClientResult<T> {
    serde_json::from_value(value).map_err(|e| ClientError::InvalidResponse(format!("{what}: {e}")))
}

/// Backend client
#[derive(Debug)]
pub struct BackendClient<R: Remote> {
    remote: R,
    members_table: String,
    events_table: String,
}

impl BackendClient<AppwriteRemote> {
    /// Network client from configuration
    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        Ok(Self::new(AppwriteRemote::new(config)?, config))
    }
}

impl<R: Remote> BackendClient<R> {
    pub fn new(remote: R, config: &ClientConfig) -> Self {
        Self {
            remote,
            members_table: config.members_table_id.clone(),
            events_table: config.events_table_id.clone(),
        }
    }

    /// Underlying remote
    pub fn remote(&self) -> &R {
        &self.remote
    }

    // ========== Account API ==========

    /// Create an account and immediately sign it in on this device
    pub async fn create_account_and_session(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> ClientResult<Identity> {
        self.remote
            .create_account(&unique_id(), email, password, name)
            .await
            .map_err(ClientError::from_auth)?;
        self.start_session(email, password).await
    }

    /// Sign in an existing account
    pub async fn start_session(&self, email: &str, password: &str) -> ClientResult<Identity> {
        self.remote
            .create_email_session(email, password)
            .await
            .map_err(ClientError::from_auth)?;
        let account = self
            .remote
            .get_account()
            .await
            .map_err(ClientError::from_auth)?;
        decode(account, "account")
    }

    /// Identity of the current session, `None` when signed out.
    ///
    /// Never fails: a missing session is the normal signed-out state and any
    /// other failure is logged and reported the same way.
    pub async fn current_identity(&self) -> Option<Identity> {
        let account = match self.remote.get_account().await {
            Ok(account) => account,
            Err(e) if e.is_unauthorized() => return None,
            Err(e) => {
                tracing::warn!("Could not load current account: {}", e);
                return None;
            }
        };
        match decode::<Identity>(account, "account") {
            Ok(identity) => Some(identity),
            Err(e) => {
                tracing::warn!("{}", e);
                None
            }
        }
    }

    /// End the current session; ending an absent session succeeds
    pub async fn end_session(&self) -> ClientResult<()> {
        match self.remote.delete_current_session().await {
            Ok(()) => Ok(()),
            Err(e) if e.is_unauthorized() || e.is_not_found() => {
                tracing::debug!("No session to end");
                Ok(())
            }
            Err(e) => Err(ClientError::from_auth(e)),
        }
    }

    // ========== Member API ==========

    /// Every row matching `queries`, fetched page by page until `total` is reached
    async fn list_all<T: DeserializeOwned>(
        &self,
        table_id: &str,
        queries: &[Query],
        what: &str,
    ) -> ClientResult<Vec<T>> {
        let mut items = Vec::new();
        loop {
            let offset = u32::try_from(items.len())
                .map_err(|_| ClientError::InvalidResponse(format!("too many {what}s")))?;
            let mut page_queries = queries.to_vec();
            page_queries.push(Query::limit(PAGE_SIZE));
            page_queries.push(Query::offset(offset));

            let page = self.remote.list_rows(table_id, &page_queries).await?;
            if page.rows.is_empty() {
                break;
            }
            for row in page.rows {
                items.push(decode(row, what)?);
            }
            if items.len() as u64 >= page.total {
                break;
            }
        }
        tracing::debug!(table = table_id, rows = items.len(), "Listed all rows");
        Ok(items)
    }

    /// All members of a club, in backend order
    pub async fn list_members(&self, club: Club) -> ClientResult<Vec<Member>> {
        let queries = [Query::equal("club", club.as_str())];
        self.list_all(&self.members_table, &queries, "member row")
            .await
    }

    /// Member row linked to an identity, if any
    pub async fn get_member(&self, identity_id: &str) -> ClientResult<Option<Member>> {
        let queries = [Query::equal("userID", identity_id), Query::limit(1)];
        match self.remote.list_rows(&self.members_table, &queries).await {
            Ok(list) => list
                .into_first()
                .map(|row| decode(row, "member row"))
                .transpose(),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Insert a member row for an identity.
    ///
    /// Names come from the identity's display name unless overridden; every
    /// other column gets the registration defaults.
    pub async fn create_member(
        &self,
        identity: &Identity,
        overrides: MemberOverrides,
    ) -> ClientResult<Member> {
        let (first_name, last_name) = identity.split_name();
        let email = if identity.email.is_empty() {
            overrides.email.unwrap_or_default()
        } else {
            identity.email.clone()
        };

        let create = MemberCreate {
            id: rand::thread_rng().gen_range(MEMBER_ID_RANGE),
            first_name: overrides.first_name.unwrap_or(first_name),
            last_name: overrides.last_name.unwrap_or(last_name),
            relationship_status: RelationshipStatus::Single,
            classification: Classification::Freshman,
            club: overrides.club.unwrap_or_default(),
            user_id: Some(identity.id.clone()),
            phone: overrides
                .phone
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| DEFAULT_PHONE.to_string()),
            email,
            show_email: true,
            show_phone: true,
            officer: None,
            image_url: PLACEHOLDER_IMAGE_URL.to_string(),
        };

        let data = serde_json::to_value(&create)
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;
        let row_id = unique_id();
        self.remote
            .create_row(&self.members_table, &row_id, data)
            .await?;

        tracing::info!(identity = %identity.id, club = %create.club, "Created member row");
        Ok(create.into_member(row_id))
    }

    /// Existing member row of an identity, created if missing
    pub async fn ensure_member(
        &self,
        identity: &Identity,
        overrides: MemberOverrides,
    ) -> ClientResult<Member> {
        match self.get_member(&identity.id).await? {
            Some(member) => Ok(member),
            None => self.create_member(identity, overrides).await,
        }
    }

    /// Partial update of a member row
    pub async fn update_member(&self, row_id: &str, update: &MemberUpdate) -> ClientResult<Member> {
        let data = serde_json::to_value(update)
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;
        let row = self
            .remote
            .update_row(&self.members_table, row_id, data)
            .await
            .map_err(|e| match e {
                RemoteError::Api { code: 404, .. } => {
                    ClientError::NotFound(format!("member row {row_id}"))
                }
                other => other.into(),
            })?;
        decode(row, "member row")
    }

    // ========== Event API ==========

    /// All events ordered by date ascending
    pub async fn list_events(&self) -> ClientResult<Vec<Event>> {
        let queries = [Query::order_asc("date")];
        self.list_all(&self.events_table, &queries, "event row")
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::MemoryRemote;
    use serde_json::json;

    fn backend(remote: MemoryRemote) -> BackendClient<MemoryRemote> {
        BackendClient::new(remote, &ClientConfig::default())
    }

    fn identity() -> Identity {
        Identity {
            id: "u-1".to_string(),
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_member_defaults() {
        let client = backend(MemoryRemote::new());
        let member = client
            .create_member(&identity(), MemberOverrides::default())
            .await
            .unwrap();

        assert_eq!(member.first_name, "Ada");
        assert_eq!(member.last_name, "Lovelace");
        assert_eq!(member.club, Club::ChiBetaChi);
        assert_eq!(member.phone, DEFAULT_PHONE);
        assert_eq!(member.email, "ada@example.com");
        assert!(member.show_email && member.show_phone);
        assert!(member.officer.is_none());
        assert!(MEMBER_ID_RANGE.contains(&member.id));
        assert_eq!(member.user_id.as_deref(), Some("u-1"));
    }

    #[tokio::test]
    async fn test_create_member_overrides() {
        let client = backend(MemoryRemote::new());
        let overrides = MemberOverrides {
            first_name: Some("Augusta".to_string()),
            club: Some(Club::SigmaRho),
            phone: Some("555-0100".to_string()),
            ..Default::default()
        };
        let member = client.create_member(&identity(), overrides).await.unwrap();
        assert_eq!(member.first_name, "Augusta");
        assert_eq!(member.last_name, "Lovelace");
        assert_eq!(member.club, Club::SigmaRho);
        assert_eq!(member.phone, "555-0100");
    }

    #[tokio::test]
    async fn test_ensure_member_does_not_duplicate() {
        let client = backend(MemoryRemote::new());
        let first = client
            .ensure_member(&identity(), MemberOverrides::default())
            .await
            .unwrap();
        let second = client
            .ensure_member(&identity(), MemberOverrides::default())
            .await
            .unwrap();
        assert_eq!(first.row_id, second.row_id);
        assert_eq!(client.remote().rows("members").len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_row_is_rejected() {
        let remote = MemoryRemote::new().with_rows(
            "members",
            [json!({
                "id": 1, "firstName": "X", "lastName": "Y",
                "relationshipStatus": "Single", "classification": "Graduate",
                "club": "Omega Chi", "showEmail": true, "showPhone": true
            })],
        );
        let err = backend(remote).list_members(Club::OmegaChi).await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidResponse(_)));
    }

    fn member_row(n: i64, club: &str) -> serde_json::Value {
        json!({
            "id": n, "firstName": format!("M{n}"), "lastName": "Row",
            "relationshipStatus": "Single", "classification": "Senior",
            "club": club, "showEmail": false, "showPhone": false
        })
    }

    #[tokio::test]
    async fn test_list_members_pages_past_total() {
        let remote = MemoryRemote::new()
            .with_rows("members", (0..230).map(|n| member_row(n, "Omega Chi")))
            .with_rows("members", (230..240).map(|n| member_row(n, "Sigma Rho")));
        let client = backend(remote);

        let members = client.list_members(Club::OmegaChi).await.unwrap();
        assert_eq!(members.len(), 230);
        assert_eq!(members.last().map(|m| m.id), Some(229));

        let offsets: Vec<Option<u32>> = client
            .remote()
            .queries_for("members")
            .iter()
            .map(|page| {
                page.iter().find_map(|q| match q {
                    Query::Offset(n) => Some(*n),
                    _ => None,
                })
            })
            .collect();
        assert_eq!(offsets, [Some(0), Some(100), Some(200)]);
    }

    #[tokio::test]
    async fn test_current_identity_swallows_errors() {
        let remote = MemoryRemote::new();
        remote.set_offline(true);
        assert!(backend(remote).current_identity().await.is_none());
    }

    #[tokio::test]
    async fn test_bad_credentials() {
        let client = backend(MemoryRemote::new().with_account("a@b.c", "password1", "A B"));
        let err = client.start_session("a@b.c", "nope").await.unwrap_err();
        assert!(matches!(err, ClientError::Auth(_)));
    }

    #[tokio::test]
    async fn test_weak_password() {
        let client = backend(MemoryRemote::new());
        let err = client
            .create_account_and_session("a@b.c", "short", "A B")
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Auth(_)));
    }
}
