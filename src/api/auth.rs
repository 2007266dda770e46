use reqwest::Method;
use serde_json::json;

use super::{ApiClient, RequestBody};
use crate::domain::ClientError;
use crate::models::user::UserWire;
use crate::models::{ActionReceipt, TokenResponse, User, UserRegistration};

impl ApiClient {
    /// `POST /auth/login`. The backend reads the matric number from the
    /// OAuth2 `username` form field.
    pub async fn login(&self, matric_no: &str, password: &str) -> Result<TokenResponse, ClientError> {
        tracing::info!("Login attempt for matric: {}", matric_no);
        let form = vec![
            ("username".to_string(), matric_no.to_string()),
            ("password".to_string(), password.to_string()),
        ];
        self.send(Method::POST, "/auth/login", RequestBody::Form(form))
            .await?
            .into_json()
    }

    pub async fn register(&self, registration: &UserRegistration) -> Result<TokenResponse, ClientError> {
        tracing::info!(
            "Registering {} account for matric: {}",
            registration.role,
            registration.matric_no
        );
        let body = serde_json::to_value(registration)?;
        self.send(Method::POST, "/auth/register", RequestBody::Json(body))
            .await?
            .into_json()
    }

    pub async fn get_me(&self) -> Result<User, ClientError> {
        let wire: UserWire = self.get_json("/users/me").await?;
        Ok(wire.into_user(self.base_url()))
    }

    pub async fn forgot_password(&self, email: &str) -> Result<ActionReceipt, ClientError> {
        self.post_action(
            "/auth/forgot-password",
            RequestBody::Json(json!({ "email": email })),
        )
        .await
    }

    pub async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<ActionReceipt, ClientError> {
        self.post_action(
            "/auth/reset-password",
            RequestBody::Json(json!({ "token": token, "new_password": new_password })),
        )
        .await
    }
}
