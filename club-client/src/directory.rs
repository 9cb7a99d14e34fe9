//! Member directory view
//!
//! Lists the members of the signed-in member's club, narrows them with a
//! free-text name search and opens a profile card for one member.

use std::sync::{Arc, Mutex};

use shared::{Classification, Identity, Member, RelationshipStatus};

use crate::backend::BackendClient;
use crate::error::{ClientError, ClientResult};
use crate::remote::Remote;
use crate::task::{ViewTask, lock};

/// Members whose first or last name contains the query, case-insensitively.
///
/// The query is trimmed and lower-cased first; an empty query keeps every
/// member. Order is preserved.
pub fn filter_members(members: &[Member], query: &str) -> Vec<Member> {
    filter_indices(members, query)
        .into_iter()
        .map(|i| members[i].clone())
        .collect()
}

fn filter_indices(members: &[Member], query: &str) -> Vec<usize> {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return (0..members.len()).collect();
    }
    members
        .iter()
        .enumerate()
        .filter(|(_, m)| {
            m.first_name.to_lowercase().contains(&q) || m.last_name.to_lowercase().contains(&q)
        })
        .map(|(i, _)| i)
        .collect()
}

/// Fetches the directory of the identity's club.
///
/// Looks up the identity's own member row to learn the club, then lists that
/// club. An identity without a member row has an empty directory.
pub async fn fetch_directory<R: Remote>(
    backend: &BackendClient<R>,
    identity: &Identity,
) -> ClientResult<Vec<Member>> {
    let Some(own) = backend.get_member(&identity.id).await? else {
        tracing::info!(identity = %identity.id, "No member row, directory is empty");
        return Ok(Vec::new());
    };
    backend.list_members(own.club).await
}

/// Detail overlay for one member
///
/// Contact details are only present when the member chose to show them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileCard {
    pub name: String,
    pub officer: Option<String>,
    pub classification: Classification,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub relationship_status: RelationshipStatus,
    pub image_url: String,
}

impl From<&Member> for ProfileCard {
    fn from(member: &Member) -> Self {
        Self {
            name: member.full_name(),
            officer: member.officer.clone(),
            classification: member.classification,
            email: member.show_email.then(|| member.email.clone()),
            phone: member.show_phone.then(|| member.phone.clone()),
            relationship_status: member.relationship_status,
            image_url: member.image_url.clone(),
        }
    }
}

/// Filter result cached per (query, member list generation)
#[derive(Debug, Default)]
struct Memo {
    query: String,
    generation: u64,
    indices: Vec<usize>,
}

/// Directory view state
#[derive(Debug, Default)]
pub struct DirectoryView {
    members: Vec<Member>,
    /// Bumped whenever `members` is replaced
    generation: u64,
    query: String,
    selected: Option<i64>,
    signed_in: bool,
    loading: bool,
    error: Option<String>,
    memo: Option<Memo>,
}

impl DirectoryView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts the fetch for a freshly shown view.
    ///
    /// Without an identity the view stays in the signed-out state and nothing
    /// is fetched. Dropping the returned task discards its result.
    pub fn mount<R: Remote + 'static>(
        view: &Arc<Mutex<DirectoryView>>,
        backend: Arc<BackendClient<R>>,
        identity: Option<Identity>,
    ) -> Option<ViewTask> {
        {
            let mut v = lock(view);
            v.signed_in = identity.is_some();
            v.loading = identity.is_some();
            v.error = None;
        }

        let identity = identity?;
        Some(ViewTask::spawn(
            Arc::clone(view),
            async move { fetch_directory(&backend, &identity).await },
            DirectoryView::apply,
        ))
    }

    /// Stores a finished fetch
    pub fn apply(&mut self, result: ClientResult<Vec<Member>>) {
        self.loading = false;
        match result {
            Ok(members) => {
                self.error = None;
                self.set_members(members);
            }
            Err(e) => {
                tracing::warn!("Directory fetch failed: {}", e);
                self.error = Some(e.user_message());
            }
        }
    }

    pub fn set_members(&mut self, members: Vec<Member>) {
        self.members = members;
        self.generation += 1;
        if let Some(id) = self.selected
            && !self.members.iter().any(|m| m.id == id)
        {
            self.selected = None;
        }
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Members matching the current query
    pub fn visible(&mut self) -> Vec<&Member> {
        let stale = self
            .memo
            .as_ref()
            .is_none_or(|m| m.generation != self.generation || m.query != self.query);
        if stale {
            self.memo = Some(Memo {
                query: self.query.clone(),
                generation: self.generation,
                indices: filter_indices(&self.members, &self.query),
            });
        }

        match &self.memo {
            Some(memo) => memo.indices.iter().map(|&i| &self.members[i]).collect(),
            None => Vec::new(),
        }
    }

    /// Message for an empty filtered list
    pub fn empty_message(&self) -> String {
        format!("No students match \u{201c}{}\u{201d}.", self.query)
    }

    pub fn is_signed_in(&self) -> bool {
        self.signed_in
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Opens the profile of a listed member; unknown ids are ignored
    pub fn select(&mut self, member_id: i64) -> Option<ProfileCard> {
        let card = self
            .members
            .iter()
            .find(|m| m.id == member_id)
            .map(ProfileCard::from)?;
        self.selected = Some(member_id);
        Some(card)
    }

    pub fn close_profile(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<ProfileCard> {
        let id = self.selected?;
        self.members
            .iter()
            .find(|m| m.id == id)
            .map(ProfileCard::from)
    }

    /// Fails with [`ClientError::NotAuthenticated`] in the signed-out state
    pub fn require_signed_in(&self) -> ClientResult<()> {
        if self.signed_in {
            Ok(())
        } else {
            Err(ClientError::NotAuthenticated)
        }
    }
}
