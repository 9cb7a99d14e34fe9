//! Identity/session context
//!
//! Holds who is signed in on this device and their member row. The context is
//! an ordinary value shared through an `Arc`; views read snapshots or
//! subscribe to changes, and all mutation goes through its commands.
//!
//! Commands are serialized through one FIFO lock, so their effects land in the
//! order they were issued rather than the order their network calls return. A
//! second command of a kind that is already queued or running is rejected with
//! [`ClientError::InFlight`] instead of being queued behind it.

use std::collections::HashSet;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex};

use shared::{Club, Identity, Member, MemberOverrides, MemberUpdate};
use tokio::sync::watch;

use crate::backend::BackendClient;
use crate::error::{ClientError, ClientResult};
use crate::remote::Remote;

/// Kind of session command, the single-flight key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Bootstrap,
    Refresh,
    Login,
    Register,
    Logout,
    UpdateMember,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperationKind::Bootstrap => "bootstrap",
            OperationKind::Refresh => "refresh",
            OperationKind::Login => "login",
            OperationKind::Register => "register",
            OperationKind::Logout => "logout",
            OperationKind::UpdateMember => "member update",
        };
        f.write_str(name)
    }
}

/// Snapshot of the session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub identity: Option<Identity>,
    pub member: Option<Member>,
    /// True until the stored session has been checked
    pub loading: bool,
}

impl SessionState {
    pub fn is_signed_in(&self) -> bool {
        self.identity.is_some()
    }
}

/// Registration form input
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub name: String,
    pub phone: String,
    pub club: Club,
}

/// Removes its kind from the in-flight set when dropped
struct FlightGuard<'a> {
    in_flight: &'a Mutex<HashSet<OperationKind>>,
    kind: OperationKind,
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        let mut set = match self.in_flight.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        set.remove(&self.kind);
    }
}

/// Session context
pub struct SessionContext<R: Remote> {
    backend: Arc<BackendClient<R>>,
    state: watch::Sender<SessionState>,
    /// FIFO command queue
    commands: tokio::sync::Mutex<()>,
    in_flight: Mutex<HashSet<OperationKind>>,
}

impl<R: Remote> SessionContext<R> {
    /// New context in the loading state; call [`bootstrap`](Self::bootstrap) next
    pub fn new(backend: Arc<BackendClient<R>>) -> Self {
        let (state, _) = watch::channel(SessionState {
            identity: None,
            member: None,
            loading: true,
        });
        Self {
            backend,
            state,
            commands: tokio::sync::Mutex::new(()),
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    pub fn backend(&self) -> &Arc<BackendClient<R>> {
        &self.backend
    }

    /// Current snapshot
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn identity(&self) -> Option<Identity> {
        self.state.borrow().identity.clone()
    }

    pub fn member(&self) -> Option<Member> {
        self.state.borrow().member.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    /// Receiver notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    fn claim(&self, kind: OperationKind) -> ClientResult<FlightGuard<'_>> {
        let mut set = match self.in_flight.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if !set.insert(kind) {
            tracing::debug!(%kind, "Rejected duplicate session command");
            return Err(ClientError::InFlight(kind));
        }
        Ok(FlightGuard {
            in_flight: &self.in_flight,
            kind,
        })
    }

    /// Runs one command: single-flight per kind, then FIFO behind earlier commands
    async fn run<T, F, Fut>(&self, kind: OperationKind, command: F) -> ClientResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ClientResult<T>>,
    {
        let _flight = self.claim(kind)?;
        let _queue = self.commands.lock().await;
        command().await
    }

    /// Checks for an existing session on this device.
    ///
    /// Sets the identity and clears `loading`; the member row is not fetched
    /// here (see [`refresh`](Self::refresh)).
    pub async fn bootstrap(&self) -> ClientResult<()> {
        self.run(OperationKind::Bootstrap, move || async move {
            let identity = self.backend.current_identity().await;
            tracing::info!(signed_in = identity.is_some(), "Session bootstrapped");
            self.state.send_modify(|s| {
                s.identity = identity;
                s.loading = false;
            });
            Ok(())
        })
        .await
    }

    /// Re-reads the identity and its member row
    pub async fn refresh(&self) -> ClientResult<()> {
        self.run(OperationKind::Refresh, move || async move {
            self.state.send_modify(|s| s.loading = true);

            let identity = self.backend.current_identity().await;
            let member = match &identity {
                Some(identity) => self.backend.get_member(&identity.id).await,
                None => Ok(None),
            };

            self.state.send_modify(|s| {
                s.loading = false;
                if let Ok(member) = &member {
                    s.identity = identity;
                    s.member = member.clone();
                }
            });
            member.map(|_| ())
        })
        .await
    }

    /// Signs in and loads the member row
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<()> {
        self.run(OperationKind::Login, move || async move {
            let identity = self.backend.start_session(email, password).await?;
            tracing::info!(identity = %identity.id, "Logged in");

            let member = match self.backend.get_member(&identity.id).await {
                Ok(member) => member,
                Err(e) => {
                    tracing::warn!("Signed in but member row could not be loaded: {}", e);
                    None
                }
            };

            self.state.send_modify(|s| {
                s.identity = Some(identity);
                s.member = member;
                s.loading = false;
            });
            Ok(())
        })
        .await
    }

    /// Creates an account, signs it in and makes sure it has a member row.
    ///
    /// If the member row cannot be written after the account was created, the
    /// identity is still recorded (the session exists remotely) and the error
    /// is returned.
    pub async fn register(&self, registration: Registration) -> ClientResult<()> {
        self.run(OperationKind::Register, move || async move {
            let identity = self
                .backend
                .create_account_and_session(
                    &registration.email,
                    &registration.password,
                    &registration.name,
                )
                .await?;
            tracing::info!(identity = %identity.id, club = %registration.club, "Registered");

            let overrides = MemberOverrides {
                club: Some(registration.club),
                phone: Some(registration.phone.clone()),
                email: Some(registration.email.clone()),
                ..Default::default()
            };
            let member = self.backend.ensure_member(&identity, overrides).await;

            self.state.send_modify(|s| {
                s.identity = Some(identity);
                s.member = member.as_ref().ok().cloned();
                s.loading = false;
            });
            member.map(|_| ())
        })
        .await
    }

    /// Ends the session and forgets identity and member
    pub async fn logout(&self) -> ClientResult<()> {
        self.run(OperationKind::Logout, move || async move {
            self.backend.end_session().await?;
            tracing::info!("Logged out");
            self.state.send_modify(|s| {
                s.identity = None;
                s.member = None;
            });
            Ok(())
        })
        .await
    }

    /// Updates the signed-in member's row and stores the result
    pub async fn update_member(&self, update: MemberUpdate) -> ClientResult<Member> {
        self.run(OperationKind::UpdateMember, move || async move {
            let row_id = self
                .member()
                .map(|m| m.row_id)
                .ok_or(ClientError::NotAuthenticated)?;
            let member = self.backend.update_member(&row_id, &update).await?;
            self.state.send_modify(|s| s.member = Some(member.clone()));
            Ok(member)
        })
        .await
    }
}

impl Registration {
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        name: impl Into<String>,
        phone: impl Into<String>,
        club: Club,
    ) -> Self {
        Self {
            email: email.into().trim().to_string(),
            password: password.into(),
            name: name.into().trim().to_string(),
            phone: phone.into().trim().to_string(),
            club,
        }
    }
}
