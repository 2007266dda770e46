//! REST adapter for the circulation API
//!
//! `ApiClient` owns the transport concerns shared by every endpoint: base URL,
//! bearer token, body encoding, and the translation of HTTP failures into
//! `ClientError`. Resource-specific calls live in the submodules.

pub mod auth;
pub mod books;
pub mod dashboard;
pub mod loan;
pub mod user;

use reqwest::{header, Method, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::domain::{ClientError, TokenStore, TOKEN_KEY};
use crate::models::ActionReceipt;

/// Request body variants the API accepts.
pub enum RequestBody {
    None,
    Json(serde_json::Value),
    /// `application/x-www-form-urlencoded`, used by the login endpoint only
    Form(Vec<(String, String)>),
    Multipart(reqwest::multipart::Form),
}

/// Successful response: either a JSON document or a bare success signal
/// (204, zero content-length, or a non-JSON body).
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    Json(serde_json::Value),
    Empty,
}

impl ApiResponse {
    pub fn into_json<T: DeserializeOwned>(self) -> Result<T, ClientError> {
        match self {
            ApiResponse::Json(value) => Ok(serde_json::from_value(value)?),
            ApiResponse::Empty => Err(ClientError::Decode(
                "Expected a JSON body but the response was empty".to_string(),
            )),
        }
    }

    /// Action endpoints may answer with a `{detail}` document or nothing.
    pub fn into_receipt(self) -> Result<ActionReceipt, ClientError> {
        match self {
            ApiResponse::Json(value) => Ok(serde_json::from_value(value).unwrap_or_default()),
            ApiResponse::Empty => Ok(ActionReceipt::default()),
        }
    }
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenStore>,
}

impl ApiClient {
    pub fn new(
        base_url: &str,
        timeout: Duration,
        tokens: Arc<dyn TokenStore>,
    ) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Network(format!("Failed to build client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            tokens,
        })
    }

    pub fn from_config(config: &Config, tokens: Arc<dyn TokenStore>) -> Result<Self, ClientError> {
        Self::new(&config.api_base_url, config.request_timeout, tokens)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    /// Send one request. Never retries.
    pub async fn send(
        &self,
        method: Method,
        endpoint: &str,
        body: RequestBody,
    ) -> Result<ApiResponse, ClientError> {
        let url = format!("{}{}", self.base_url, endpoint);
        tracing::debug!("API {} {}", method, endpoint);

        let mut request = self.http.request(method.clone(), &url);

        if let Some(token) = self.tokens.get(TOKEN_KEY)? {
            request = request.bearer_auth(token);
        }

        request = match body {
            RequestBody::None => request,
            RequestBody::Json(value) => request.json(&value),
            RequestBody::Form(fields) => request.form(&fields),
            RequestBody::Multipart(form) => request.multipart(form),
        };

        let response = request.send().await.map_err(|e| {
            tracing::warn!("API {} {} failed to send: {}", method, endpoint, e);
            ClientError::Network(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = error_message(status, &body);
            tracing::warn!("API {} {} -> {}: {}", method, endpoint, status, message);
            return Err(if status == StatusCode::UNAUTHORIZED {
                ClientError::Unauthorized(message)
            } else {
                ClientError::Api {
                    status: status.as_u16(),
                    message,
                }
            });
        }

        if status == StatusCode::NO_CONTENT || has_zero_length(response.headers()) {
            return Ok(ApiResponse::Empty);
        }

        let is_json = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("application/json"));
        if !is_json {
            return Ok(ApiResponse::Empty);
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Ok(ApiResponse::Empty);
        }
        Ok(ApiResponse::Json(serde_json::from_slice(&bytes)?))
    }

    pub async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ClientError> {
        self.send(Method::GET, endpoint, RequestBody::None)
            .await?
            .into_json()
    }

    pub async fn post_action(
        &self,
        endpoint: &str,
        body: RequestBody,
    ) -> Result<ActionReceipt, ClientError> {
        self.send(Method::POST, endpoint, body).await?.into_receipt()
    }

    /// Lists degrade to empty when the server answers with something that
    /// is not an array.
    pub async fn get_list<T: DeserializeOwned>(&self, endpoint: &str) -> Result<Vec<T>, ClientError> {
        match self.send(Method::GET, endpoint, RequestBody::None).await? {
            ApiResponse::Json(serde_json::Value::Array(items)) => items
                .into_iter()
                .map(|item| serde_json::from_value(item).map_err(ClientError::from))
                .collect(),
            _ => Ok(Vec::new()),
        }
    }
}

fn has_zero_length(headers: &header::HeaderMap) -> bool {
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.trim() == "0")
}

/// Prefer the server's `detail`; FastAPI validation errors carry a list of
/// `{msg}` objects instead of a string.
fn error_message(status: StatusCode, body: &str) -> String {
    let detail = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("detail").cloned());

    match detail {
        Some(serde_json::Value::String(msg)) if !msg.is_empty() => msg,
        Some(serde_json::Value::Array(items)) => items
            .first()
            .and_then(|i| i.get("msg"))
            .and_then(|m| m.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| generic_message(status)),
        _ => generic_message(status),
    }
}

fn generic_message(status: StatusCode) -> String {
    format!("API request failed with status {}", status.as_u16())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_string_is_used_verbatim() {
        assert_eq!(
            error_message(StatusCode::BAD_REQUEST, r#"{"detail":"Book unavailable"}"#),
            "Book unavailable"
        );
    }

    #[test]
    fn validation_list_uses_first_msg() {
        let body = r#"{"detail":[{"loc":["body","book_id"],"msg":"field required"}]}"#;
        assert_eq!(
            error_message(StatusCode::UNPROCESSABLE_ENTITY, body),
            "field required"
        );
    }

    #[test]
    fn non_json_body_gets_generic_message() {
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, "<html>oops</html>"),
            "API request failed with status 502"
        );
        assert_eq!(
            error_message(StatusCode::NOT_FOUND, r#"{"error":"x"}"#),
            "API request failed with status 404"
        );
    }

    #[test]
    fn empty_response_is_a_default_receipt() {
        assert_eq!(
            ApiResponse::Empty.into_receipt().unwrap(),
            ActionReceipt::default()
        );
        assert!(ApiResponse::Empty.into_json::<serde_json::Value>().is_err());
    }
}
