mod common;

use chrono::NaiveDate;
use circulation_desk::domain::ClientError;
use circulation_desk::services::activity::load_recent_activity;
use circulation_desk::services::circulation::{LoanDesk, StudentDesk};
use circulation_desk::services::loan_status::{derive_buckets, LoanAlert, DEFAULT_DUE_SOON_DAYS};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount(server: &MockServer, route: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

fn books() -> serde_json::Value {
    json!([
        {"id": 1, "title": "Arrow of God", "author": "Achebe", "isbn": "1", "quantity": 2, "available_quantity": 1},
        {"id": 2, "title": "Purple Hibiscus", "author": "Adichie", "isbn": "2", "quantity": 1, "available_quantity": 1},
        {"id": 3, "title": "Weep Not, Child", "author": "Ngugi", "isbn": "3", "quantity": 1, "available_quantity": 0}
    ])
}

fn loans() -> serde_json::Value {
    json!([
        {"id": 7, "user_id": 1, "book_id": 1, "status": "approved",
         "request_date": "2024-05-20", "approval_date": "2024-05-21", "due_date": "2024-06-09"},
        {"id": 8, "user_id": 1, "book_id": 2, "status": "returned",
         "request_date": "2024-05-01", "return_date": "2024-06-10T14:00:00"},
        {"id": 9, "user_id": 2, "book_id": 2, "status": "pending",
         "request_date": "2024-06-10T09:00:00"}
    ])
}

#[tokio::test]
async fn test_student_desk_joins_and_buckets() {
    let server = MockServer::start().await;
    mount(&server, "/books/", books()).await;
    mount(&server, "/loans/", loans()).await;
    mount(&server, "/users/me", common::user_json(1, "student")).await;
    let (api, _) = common::client(&server.uri());

    let me = api.get_me().await.expect("Failed to fetch user");
    let desk = StudentDesk::load(&api, &me).await.expect("Failed to load desk");

    let ids: Vec<i64> = desk.my_loans.iter().map(|l| l.loan.id).collect();
    assert_eq!(ids, vec![7, 8]);
    assert_eq!(desk.my_loans[0].book_title, "Arrow of God");

    // book 1 is out with loan 7, book 3 has no copies left
    let requestable: Vec<i64> = desk.requestable().iter().map(|b| b.id).collect();
    assert_eq!(requestable, vec![2]);
    assert_eq!(desk.returnable().len(), 1);

    let today = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
    let buckets = derive_buckets(&desk.my_loans, today, DEFAULT_DUE_SOON_DAYS);
    assert_eq!(buckets.alert(), LoanAlert::Overdue(1));
    assert_eq!(buckets.history[0].loan.id, 8);
}

#[tokio::test]
async fn test_admin_desk_fails_as_a_whole() {
    let server = MockServer::start().await;
    mount(&server, "/books/", books()).await;
    mount(&server, "/loans/", loans()).await;
    Mock::given(method("GET"))
        .and(path("/users/"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({"detail": "Admins only"})))
        .mount(&server)
        .await;
    let (api, _) = common::client(&server.uri());

    let err = LoanDesk::load(&api).await.unwrap_err();
    assert_eq!(
        err,
        ClientError::Api {
            status: 403,
            message: "Admins only".into()
        }
    );
}

#[tokio::test]
async fn test_recent_activity_for_today() {
    let server = MockServer::start().await;
    mount(&server, "/books/", books()).await;
    mount(&server, "/loans/", loans()).await;
    mount(&server, "/users/", json!([common::user_json(1, "student")])).await;
    let (api, _) = common::client(&server.uri());

    let today = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
    let feed = load_recent_activity(&api, today).await.expect("Failed to load feed");

    let ids: Vec<&str> = feed.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["loan-8-ret", "loan-9-req"]);
    assert!(feed[1].text.starts_with("Unknown User"));
}
