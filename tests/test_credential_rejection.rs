mod common;
use common::*;

use bugtrack::sync::payload::LoginRequest;

#[tokio::test]
async fn test_rejected_credential_logs_out() -> anyhow::Result<()> {
    let client =
        client(ScriptedTransport::new().respond(401, input_errors("jwToken", "Token expired")));
    let mut store = logged_in_store(&client, &[project(1)], &[bug(1, 1)]).await?;

    let outcome = client.retrieve_account(&mut store).await;

    assert_eq!(outcome, SyncOutcome::LoggedOut);
    let state = store.state();
    assert_eq!(state.session.token(), None);
    assert_eq!(state.session.claims(), None);
    assert!(state.general.components_display.login);
    assert!(state.auth_view_is_exclusive());
    assert!(state.project.list.is_empty());
    assert_eq!(client.storage().load().await?, None);

    // The rejection is still shown to the user.
    assert!(state.general.backend_errors.is_credential_rejected());
    assert_eq!(state.general.backend_errors.get("jwToken"), Some("Token expired"));

    Ok(())
}

#[tokio::test]
async fn test_rejection_applies_to_every_authenticated_route() -> anyhow::Result<()> {
    let client = client(
        ScriptedTransport::new().respond(401, input_errors("jwToken", "Token invalid")),
    );
    let mut store = logged_in_store(&client, &[project(1)], &[]).await?;

    let outcome = client.delete_project(&mut store, project(1).id).await;

    assert_eq!(outcome, SyncOutcome::LoggedOut);
    assert!(!store.state().is_authenticated());

    Ok(())
}

#[tokio::test]
async fn test_unauthenticated_routes_never_log_out() -> anyhow::Result<()> {
    let client = client(ScriptedTransport::new().respond(400, input_errors("jwToken", "odd")));
    let mut store = Store::new();

    let outcome = client
        .login(
            &mut store,
            &LoginRequest {
                email: TEST_EMAIL.to_string(),
                password: "x".to_string(),
            },
        )
        .await;

    assert_eq!(outcome, SyncOutcome::Failed);
    assert!(store.state().general.backend_errors.is_credential_rejected());

    Ok(())
}

#[tokio::test]
async fn test_missing_credential_is_treated_as_rejected() -> anyhow::Result<()> {
    let client = client(ScriptedTransport::new());
    let mut store = Store::new();
    store.dispatch(GeneralAction::ShowAuthView(AuthView::Home));

    let outcome = client.retrieve_everything(&mut store).await;

    assert_eq!(outcome, SyncOutcome::LoggedOut);
    assert!(client.transport().requests().is_empty());
    assert!(store.state().general.components_display.login);
    assert!(store.state().general.backend_errors.has_kind(ErrorKind::CredentialRejected));

    Ok(())
}

#[tokio::test]
async fn test_other_errors_keep_the_session() -> anyhow::Result<()> {
    let client = client(
        ScriptedTransport::new()
            .fail_connection()
            .respond(500, serde_json::json!({}))
            .respond(400, input_errors("serverAccount", "Email already in use")),
    );
    let mut store = logged_in_store(&client, &[], &[]).await?;

    assert_eq!(client.retrieve_account(&mut store).await, SyncOutcome::Failed);
    assert!(store.state().general.backend_errors.has_kind(ErrorKind::ServerConnection));

    assert_eq!(client.retrieve_account(&mut store).await, SyncOutcome::Failed);
    assert!(store.state().general.backend_errors.has_kind(ErrorKind::ServerConnection));

    assert_eq!(client.retrieve_account(&mut store).await, SyncOutcome::Failed);
    assert!(store.state().general.backend_errors.has_kind(ErrorKind::ServerState));

    assert!(store.state().is_authenticated());
    assert!(store.state().general.components_display.home);
    assert!(client.storage().load().await?.is_some());

    Ok(())
}

#[tokio::test]
async fn test_proxy_error_page_is_a_connection_error() -> anyhow::Result<()> {
    let client = client(
        ScriptedTransport::new()
            .respond_text(502, "<html>502 Bad Gateway</html>")
            .respond_text(503, "Service Unavailable"),
    );
    let mut store = logged_in_store(&client, &[], &[]).await?;

    for _ in 0..2 {
        assert_eq!(client.retrieve_account(&mut store).await, SyncOutcome::Failed);
        let errors = &store.state().general.backend_errors;
        assert_eq!(errors, &BackendErrors::server_connection());
        assert!(!errors.has_kind(ErrorKind::ServerState));
    }
    assert!(store.state().is_authenticated());

    Ok(())
}
