// club-client/tests/session_flow.rs
// Session context against the in-memory backend

mod common;

use std::sync::Arc;

use club_client::{
    BackendClient, ClientConfig, ClientError, Classification, Club, MemberUpdate, MemoryRemote,
    OperationKind, Registration, RelationshipStatus, SessionContext,
};
use common::{GatedRemote, backend, member_row};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("club_client=debug"))
        .with_test_writer()
        .try_init();
}

fn registration(club: Club) -> Registration {
    Registration::new(
        " ada@example.com ",
        "correct-horse",
        "Ada Lovelace",
        "555-0199",
        club,
    )
}

#[tokio::test]
async fn test_bootstrap_without_session() {
    init_tracing();
    let session = SessionContext::new(backend(MemoryRemote::new()));
    assert!(session.is_loading());

    session.bootstrap().await.unwrap();
    let state = session.state();
    assert!(!state.loading);
    assert!(state.identity.is_none());
    assert!(state.member.is_none());
}

#[tokio::test]
async fn test_register_creates_member_with_defaults() {
    init_tracing();
    let backend = backend(MemoryRemote::new());
    let session = SessionContext::new(Arc::clone(&backend));
    session.bootstrap().await.unwrap();

    session.register(registration(Club::SigmaRho)).await.unwrap();

    let identity = session.identity().expect("signed in after register");
    assert_eq!(identity.email, "ada@example.com");

    let member = backend
        .get_member(&identity.id)
        .await
        .unwrap()
        .expect("member row created");
    assert_eq!(member.club, Club::SigmaRho);
    assert_eq!(member.relationship_status, RelationshipStatus::Single);
    assert_eq!(member.classification, Classification::Freshman);
    assert!(member.officer.is_none());
    assert_eq!(member.phone, "555-0199");
    assert_eq!(member.first_name, "Ada");
    assert_eq!(member.last_name, "Lovelace");

    assert_eq!(session.member(), Some(member));
}

#[tokio::test]
async fn test_register_duplicate_email_is_auth_error() {
    let remote = MemoryRemote::new().with_account("ada@example.com", "password1", "Ada");
    let session = SessionContext::new(backend(remote));

    let err = session
        .register(registration(Club::OmegaChi))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Auth(_)));
    assert!(session.identity().is_none());
}

#[tokio::test]
async fn test_login_loads_member() {
    let remote = MemoryRemote::new()
        .with_account("dan@example.com", "password1", "Dan Anderson")
        .with_rows(
            "members",
            [member_row(42, "Dan", "Anderson", "Omega Chi", Some("user-1"))],
        );
    let session = SessionContext::new(backend(remote));

    session.login("dan@example.com", "password1").await.unwrap();
    let state = session.state();
    assert_eq!(state.identity.unwrap().id, "user-1");
    assert_eq!(state.member.unwrap().id, 42);
}

#[tokio::test]
async fn test_login_bad_password_leaves_state_untouched() {
    let remote = MemoryRemote::new().with_account("dan@example.com", "password1", "Dan");
    let session = SessionContext::new(backend(remote));
    session.bootstrap().await.unwrap();

    let err = session.login("dan@example.com", "wrong").await.unwrap_err();
    assert!(matches!(err, ClientError::Auth(_)));
    assert!(!session.state().is_signed_in());
}

#[tokio::test]
async fn test_logout_clears_identity() {
    let backend = backend(MemoryRemote::new());
    let session = SessionContext::new(Arc::clone(&backend));
    session.register(registration(Club::XiChiDelta)).await.unwrap();
    assert_eq!(
        backend.remote().current_account_id(),
        session.identity().map(|i| i.id)
    );

    session.logout().await.unwrap();
    assert!(backend.remote().current_account_id().is_none());
    assert!(backend.current_identity().await.is_none());
    assert!(session.identity().is_none());
    assert!(session.member().is_none());

    // Ending an absent session is fine
    session.logout().await.unwrap();
}

#[tokio::test]
async fn test_bootstrap_restores_existing_session() {
    let backend = backend(MemoryRemote::new());
    backend
        .create_account_and_session("kim@example.com", "password1", "Kim Park")
        .await
        .unwrap();

    let session = SessionContext::new(Arc::clone(&backend));
    session.bootstrap().await.unwrap();
    assert_eq!(session.identity().unwrap().name, "Kim Park");
    // Member is only loaded on refresh
    assert!(session.member().is_none());
}

#[tokio::test]
async fn test_refresh_loads_member() {
    let backend = backend(MemoryRemote::new());
    let identity = backend
        .create_account_and_session("kim@example.com", "password1", "Kim Park")
        .await
        .unwrap();
    backend
        .ensure_member(&identity, Default::default())
        .await
        .unwrap();

    let session = SessionContext::new(Arc::clone(&backend));
    session.refresh().await.unwrap();
    let state = session.state();
    assert!(!state.loading);
    assert_eq!(state.member.unwrap().user_id.as_deref(), Some(identity.id.as_str()));
}

#[tokio::test]
async fn test_update_member_requires_member() {
    let session = SessionContext::new(backend(MemoryRemote::new()));
    let err = session
        .update_member(MemberUpdate::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::NotAuthenticated));
}

#[tokio::test]
async fn test_update_member_stores_result() {
    let session = SessionContext::new(backend(MemoryRemote::new()));
    session.register(registration(Club::ChiBetaChi)).await.unwrap();

    let mut subscriber = session.subscribe();
    subscriber.mark_unchanged();

    let update = MemberUpdate {
        relationship_status: Some(RelationshipStatus::Taken),
        show_phone: Some(false),
        ..Default::default()
    };
    let member = session.update_member(update).await.unwrap();
    assert_eq!(member.relationship_status, RelationshipStatus::Taken);
    assert!(!member.show_phone);
    assert!(subscriber.has_changed().unwrap());
    assert_eq!(session.member(), Some(member));
}

#[tokio::test]
async fn test_duplicate_login_is_rejected_while_in_flight() {
    let remote = GatedRemote::new(
        MemoryRemote::new().with_account("dan@example.com", "password1", "Dan"),
    );
    let gate = Arc::clone(&remote.gate);
    let session = SessionContext::new(Arc::new(BackendClient::new(
        remote,
        &ClientConfig::default(),
    )));

    let (first, second, _) = tokio::join!(
        session.login("dan@example.com", "password1"),
        session.login("dan@example.com", "password1"),
        async {
            tokio::task::yield_now().await;
            gate.add_permits(1);
        }
    );

    first.unwrap();
    assert!(matches!(
        second.unwrap_err(),
        ClientError::InFlight(OperationKind::Login)
    ));
    assert!(session.identity().is_some());
}

#[tokio::test]
async fn test_commands_apply_in_invocation_order() {
    let remote = GatedRemote::new(
        MemoryRemote::new().with_account("dan@example.com", "password1", "Dan"),
    );
    let gate = Arc::clone(&remote.gate);
    let session = SessionContext::new(Arc::new(BackendClient::new(
        remote,
        &ClientConfig::default(),
    )));

    // The login is held at the backend while the logout is issued; the logout
    // must still take effect after it.
    let (login, logout, _) = tokio::join!(
        session.login("dan@example.com", "password1"),
        session.logout(),
        async {
            tokio::task::yield_now().await;
            gate.add_permits(1);
        }
    );

    login.unwrap();
    logout.unwrap();
    assert!(session.identity().is_none());
    assert!(session.backend().current_identity().await.is_none());
}
