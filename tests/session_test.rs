mod common;

use chrono::Duration;
use circulation_desk::domain::{ClientError, TokenStore, TOKEN_KEY};
use circulation_desk::models::Role;
use circulation_desk::routes::{Access, Route};
use circulation_desk::services::{Notifier, SessionManager, ToastKind};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn notifier() -> Notifier {
    Notifier::new(std::time::Duration::from_secs(60))
}

#[tokio::test]
async fn test_admin_login_lands_on_admin_dashboard() {
    let server = MockServer::start().await;
    let (api, store) = common::client(&server.uri());
    let token = common::token("A1", "admin", Duration::hours(1));

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": token})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/me"))
        .and(header("authorization", format!("Bearer {}", token).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::user_json(1, "admin")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/dashboard/summary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"pending_loans": 4})))
        .mount(&server)
        .await;

    let notes = notifier();
    let session = SessionManager::new(api, notes.clone());
    let landing = session.login("A1", "pw").await.expect("Login failed");

    assert_eq!(landing, Route::AdminDashboard);
    assert_eq!(store.get(TOKEN_KEY).unwrap(), Some(token));
    assert_eq!(session.current_user().await.map(|u| u.role), Some(Role::Admin));
    assert_eq!(session.pending_loan_count().await, 4);
    assert_eq!(notes.toasts()[0].kind, ToastKind::Success);
    assert_eq!(session.authorize(&Route::ValidateLoan).await, Access::Allow);
}

#[tokio::test]
async fn test_bad_credentials_toast_server_message() {
    let server = MockServer::start().await;
    let (api, store) = common::client(&server.uri());

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"detail": "Incorrect matric number or password"})),
        )
        .mount(&server)
        .await;

    let notes = notifier();
    let session = SessionManager::new(api, notes.clone());
    let err = session.login("M123", "wrong").await.unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
    let toasts = notes.toasts();
    assert_eq!(toasts[0].kind, ToastKind::Error);
    assert_eq!(toasts[0].message, "Incorrect matric number or password");
}

#[tokio::test]
async fn test_failed_profile_fetch_after_login_logs_out() {
    let server = MockServer::start().await;
    let (api, store) = common::client(&server.uri());

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "tok"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/me"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let session = SessionManager::new(api, notifier());
    let err = session.login("M123", "pw").await.unwrap_err();

    assert_eq!(
        err,
        ClientError::Unauthorized("Failed to fetch user details after authentication.".into())
    );
    assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
    assert!(session.current_user().await.is_none());
}

#[tokio::test]
async fn test_hydrate_restores_live_token() {
    let server = MockServer::start().await;
    let (api, store) = common::client(&server.uri());
    common::store_token(&store, &common::token("M123", "student", Duration::hours(1)));

    Mock::given(method("GET"))
        .and(path("/users/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::user_json(3, "student")))
        .expect(1)
        .mount(&server)
        .await;

    let session = SessionManager::new(api, notifier());
    let user = session.hydrate().await.expect("Session should be restored");

    assert_eq!(user.id, 3);
    assert_eq!(session.pending_loan_count().await, 0);
    assert_eq!(
        session.authorize(&Route::ValidateLoan).await,
        Access::Redirect(Route::StudentDashboard)
    );
}

#[tokio::test]
async fn test_hydrate_drops_expired_token_without_server_call() {
    let server = MockServer::start().await;
    let (api, store) = common::client(&server.uri());
    common::store_token(&store, &common::token("M123", "student", Duration::hours(-1)));

    Mock::given(method("GET"))
        .and(path("/users/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::user_json(3, "student")))
        .expect(0)
        .mount(&server)
        .await;

    let session = SessionManager::new(api, notifier());
    assert!(session.hydrate().await.is_none());
    assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
    assert_eq!(
        session.authorize(&Route::Books).await,
        Access::Redirect(Route::Login)
    );
}

#[tokio::test]
async fn test_unauthorized_action_forces_logout() {
    let server = MockServer::start().await;
    let (api, store) = common::client(&server.uri());
    common::store_token(&store, &common::token("M123", "student", Duration::hours(1)));

    Mock::given(method("GET"))
        .and(path("/users/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::user_json(3, "student")))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/loans/request"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "Token expired"})))
        .mount(&server)
        .await;

    let session = SessionManager::new(api, notifier());
    session.hydrate().await.expect("Session should be restored");

    let err = session.api().request_loan(2).await.unwrap_err();
    assert_eq!(session.handle_failure(&err).await, Some(Route::Login));
    assert!(session.current_user().await.is_none());
    assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
}

#[tokio::test]
async fn test_business_failure_keeps_session() {
    let server = MockServer::start().await;
    let (api, _) = common::client(&server.uri());

    let notes = notifier();
    let session = SessionManager::new(api, notes.clone());
    let err = ClientError::Api {
        status: 400,
        message: "Already borrowed".into(),
    };

    assert_eq!(session.handle_failure(&err).await, None);
    assert_eq!(notes.toasts()[0].message, "Already borrowed");
}

#[tokio::test]
async fn test_password_mismatch_never_reaches_server() {
    let server = MockServer::start().await;
    let (api, _) = common::client(&server.uri());

    Mock::given(method("POST"))
        .and(path("/users/me/password"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let session = SessionManager::new(api, notifier());
    let err = session.change_password("old", "newpass", "newpas").await.unwrap_err();
    assert_eq!(err, ClientError::Validation("New passwords do not match.".into()));
}
