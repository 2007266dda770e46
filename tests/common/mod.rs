#![allow(dead_code)]

use chrono::{Duration, Utc};
use circulation_desk::api::ApiClient;
use circulation_desk::domain::{TokenStore, TOKEN_KEY};
use circulation_desk::infrastructure::MemoryTokenStore;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;
use std::sync::Arc;

// Helper to create a client pointed at a mock server
pub fn client(base_url: &str) -> (ApiClient, Arc<MemoryTokenStore>) {
    circulation_desk::logging::init_tracing();
    let store = Arc::new(MemoryTokenStore::new());
    let api = ApiClient::new(base_url, std::time::Duration::from_secs(5), store.clone())
        .expect("Failed to build client");
    (api, store)
}

// Helper to mint a session token; the client never checks the signature
pub fn token(sub: &str, role: &str, valid_for: Duration) -> String {
    let claims = json!({
        "sub": sub,
        "role": role,
        "exp": (Utc::now() + valid_for).timestamp(),
    });
    encode(&Header::default(), &claims, &EncodingKey::from_secret(b"server-secret"))
        .expect("Failed to create token")
}

pub fn store_token(store: &MemoryTokenStore, value: &str) {
    store.set(TOKEN_KEY, value).expect("Failed to store token");
}

pub fn user_json(id: i64, role: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": "Ada Obi",
        "email": "ada@example.org",
        "matric_no": "M123",
        "department": "Physics",
        "role": role,
        "profile_picture_url": null
    })
}
