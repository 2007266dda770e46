mod common;

use chrono::Duration;
use circulation_desk::api::{ApiResponse, RequestBody};
use circulation_desk::domain::ClientError;
use circulation_desk::models::LoanStatus;
use reqwest::Method;
use serde_json::json;
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_bearer_token_and_cover_urls() {
    let server = MockServer::start().await;
    let (api, store) = common::client(&server.uri());
    let token = common::token("M123", "student", Duration::hours(1));
    common::store_token(&store, &token);

    Mock::given(method("GET"))
        .and(path("/books/"))
        .and(header("authorization", format!("Bearer {}", token).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "title": "Relative", "author": "A", "isbn": "1", "quantity": 2,
             "available_quantity": 5, "cover_image_url": "static\\covers\\a.jpg"},
            {"id": 2, "title": "Absolute", "author": "B", "isbn": "2", "quantity": 1,
             "available_quantity": 1, "cover_image_url": "https://cdn.example.org/b.jpg"},
            {"id": 3, "title": "Missing", "author": "C", "isbn": "3", "quantity": 1,
             "available_quantity": 0, "cover_image_url": null}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let books = api.get_books().await.expect("Failed to fetch books");
    assert_eq!(books.len(), 3);
    assert_eq!(
        books[0].cover_image_url.as_deref(),
        Some(format!("{}/static/covers/a.jpg", server.uri()).as_str())
    );
    // available clamped to quantity
    assert_eq!(books[0].available_quantity, 2);
    assert_eq!(books[1].cover_image_url.as_deref(), Some("https://cdn.example.org/b.jpg"));
    assert_eq!(books[2].cover_image_url, None);
}

#[tokio::test]
async fn test_no_content_is_a_bare_success() {
    let server = MockServer::start().await;
    let (api, _) = common::client(&server.uri());

    Mock::given(method("POST"))
        .and(path("/loans/5/approve"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let receipt = api.approve_loan(5).await.expect("204 should succeed");
    assert_eq!(receipt.detail, "");
    assert_eq!(receipt.fine, None);
}

#[tokio::test]
async fn test_zero_length_json_is_a_bare_success() {
    let server = MockServer::start().await;
    let (api, _) = common::client(&server.uri());

    Mock::given(method("POST"))
        .and(path("/loans/return"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(Vec::<u8>::new(), "application/json"))
        .mount(&server)
        .await;

    let receipt = api.return_book(3).await.expect("empty JSON body should succeed");
    assert_eq!(receipt.detail, "");
    assert_eq!(receipt.fine, None);

    let response = api
        .send(Method::POST, "/loans/return", RequestBody::None)
        .await
        .expect("empty JSON body should succeed");
    assert!(matches!(response, ApiResponse::Empty));
}

#[tokio::test]
async fn test_business_rule_message_is_verbatim() {
    let server = MockServer::start().await;
    let (api, _) = common::client(&server.uri());

    Mock::given(method("POST"))
        .and(path("/loans/request"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"detail": "Book unavailable"})),
        )
        .mount(&server)
        .await;

    let err = api.request_loan(9).await.unwrap_err();
    assert_eq!(
        err,
        ClientError::Api {
            status: 400,
            message: "Book unavailable".into()
        }
    );
    assert_eq!(err.user_message(), "Book unavailable");
}

#[tokio::test]
async fn test_generic_message_without_detail() {
    let server = MockServer::start().await;
    let (api, _) = common::client(&server.uri());

    Mock::given(method("DELETE"))
        .and(path("/books/4"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    match api.delete_book(4).await {
        Err(ClientError::Api { status, message }) => {
            assert_eq!(status, 500);
            assert!(message.contains("500"));
        }
        other => panic!("expected API error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unauthorized_is_distinguished() {
    let server = MockServer::start().await;
    let (api, _) = common::client(&server.uri());

    Mock::given(method("GET"))
        .and(path("/users/me"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"detail": "Could not validate credentials"})),
        )
        .mount(&server)
        .await;

    let err = api.get_me().await.unwrap_err();
    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn test_login_uses_urlencoded_form() {
    let server = MockServer::start().await;
    let (api, _) = common::client(&server.uri());

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string("username=M123&password=s3cret"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"access_token": "abc", "token_type": "bearer"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let response = api.login("M123", "s3cret").await.expect("Login failed");
    assert_eq!(response.access_token, "abc");
}

#[tokio::test]
async fn test_loans_accept_legacy_field_names() {
    let server = MockServer::start().await;
    let (api, _) = common::client(&server.uri());

    Mock::given(method("GET"))
        .and(path("/loans/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "user_id": 2, "book_id": 3, "status": "approved",
             "borrowed_on": "2024-06-01T10:00:00", "due_date": "2024-06-15"},
            {"id": 2, "user_id": 2, "book_id": 4, "status": "approved",
             "returned": true, "returned_on": "2024-06-03T09:30:00Z"}
        ])))
        .mount(&server)
        .await;

    let loans = api.get_loans().await.expect("Failed to fetch loans");
    assert_eq!(loans[0].request_date, loans[0].approval_date);
    assert!(loans[0].due_date.is_some());
    assert!(loans[0].is_active());
    assert_eq!(loans[1].status, LoanStatus::Returned);
    assert!(loans[1].return_date.is_some());
}

#[tokio::test]
async fn test_non_array_list_is_empty() {
    let server = MockServer::start().await;
    let (api, _) = common::client(&server.uri());

    Mock::given(method("GET"))
        .and(path("/users/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"detail": "none"})))
        .mount(&server)
        .await;

    assert!(api.get_users().await.expect("Should not fail").is_empty());
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    let (api, _) = common::client("http://127.0.0.1:9");
    let err = api.get_books().await.unwrap_err();
    assert!(matches!(err, ClientError::Network(_)));
    assert_eq!(err.user_message(), "Could not reach the library server.");
}
