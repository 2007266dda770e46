//! Session context
//!
//! Holds the signed-in user and the token lifecycle. Views receive a shared
//! `SessionManager` instead of reaching for globals; `hydrate` is the init
//! step, `logout` the teardown.

use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::api::ApiClient;
use crate::auth::is_token_expired;
use crate::domain::{ClientError, TokenStore, TOKEN_KEY};
use crate::models::{
    ActionReceipt, ChangePassword, FileUpload, ProfileUpdate, User, UserRegistration,
};
use crate::routes::{guard, Access, Route};
use crate::services::notifications::Notifier;

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Default, Clone)]
struct SessionState {
    user: Option<User>,
    pending_loan_count: u64,
}

pub struct SessionManager {
    api: ApiClient,
    tokens: Arc<dyn TokenStore>,
    notifier: Notifier,
    state: RwLock<SessionState>,
}

impl SessionManager {
    pub fn new(api: ApiClient, notifier: Notifier) -> Self {
        let tokens = api.tokens().clone();
        Self {
            api,
            tokens,
            notifier,
            state: RwLock::new(SessionState::default()),
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub async fn current_user(&self) -> Option<User> {
        self.state.read().await.user.clone()
    }

    pub async fn pending_loan_count(&self) -> u64 {
        self.state.read().await.pending_loan_count
    }

    /// Restore the session from the token store.
    ///
    /// A stored token that is expired, unreadable, or rejected by `/users/me`
    /// ends in a logout. No token at all leaves the session signed out.
    pub async fn hydrate(&self) -> Option<User> {
        let token = match self.tokens.get(TOKEN_KEY) {
            Ok(token) => token,
            Err(e) => {
                tracing::error!("Failed to read session token: {}", e);
                None
            }
        };

        let Some(token) = token else {
            tracing::debug!("No stored session");
            return None;
        };

        if is_token_expired(&token, Utc::now()) {
            tracing::info!("Stored session token expired, logging out");
            self.logout().await;
            return None;
        }

        match self.api.get_me().await {
            Ok(user) => {
                tracing::info!("Session restored for {}", user.matric_no);
                self.set_user(user.clone()).await;
                if user.is_admin() {
                    self.fetch_pending_loan_count().await;
                }
                Some(user)
            }
            Err(e) => {
                tracing::warn!("Could not restore session: {}", e);
                self.logout().await;
                None
            }
        }
    }

    /// Sign in and return the landing page for the user's role.
    pub async fn login(&self, matric_no: &str, password: &str) -> Result<Route, ClientError> {
        let result = self.try_login(matric_no, password).await;
        if let Err(e) = &result {
            self.notifier.report_error(e);
        }
        result
    }

    async fn try_login(&self, matric_no: &str, password: &str) -> Result<Route, ClientError> {
        let response = self.api.login(matric_no, password).await?;
        self.complete_auth(&response.access_token, "Login successful!")
            .await
    }

    /// Create an account and sign straight in.
    pub async fn register(
        &self,
        registration: &UserRegistration,
        confirm_password: &str,
    ) -> Result<Route, ClientError> {
        let result = self.try_register(registration, confirm_password).await;
        if let Err(e) = &result {
            self.notifier.report_error(e);
        }
        result
    }

    async fn try_register(
        &self,
        registration: &UserRegistration,
        confirm_password: &str,
    ) -> Result<Route, ClientError> {
        check_passwords_match(
            &registration.password,
            confirm_password,
            "Passwords do not match.",
        )?;
        let response = self.api.register(registration).await?;
        self.complete_auth(
            &response.access_token,
            "Registration successful! Logging you in...",
        )
        .await
    }

    async fn complete_auth(&self, token: &str, success_message: &str) -> Result<Route, ClientError> {
        self.tokens.set(TOKEN_KEY, token)?;

        match self.api.get_me().await {
            Ok(user) => {
                tracing::info!("Signed in as {} ({})", user.matric_no, user.role);
                let landing = Route::dashboard_for(user.role);
                let is_admin = user.is_admin();
                self.set_user(user).await;
                self.notifier.success(success_message);
                if is_admin {
                    self.fetch_pending_loan_count().await;
                }
                Ok(landing)
            }
            Err(e) => {
                tracing::warn!("Token accepted but /users/me failed: {}", e);
                self.logout().await;
                Err(ClientError::Unauthorized(
                    "Failed to fetch user details after authentication.".to_string(),
                ))
            }
        }
    }

    /// Clear the user, the badge count and the stored token.
    pub async fn logout(&self) -> Route {
        {
            let mut state = self.state.write().await;
            state.user = None;
            state.pending_loan_count = 0;
        }
        if let Err(e) = self.tokens.remove(TOKEN_KEY) {
            tracing::error!("Failed to clear session token: {}", e);
        }
        tracing::info!("Session closed");
        Route::Login
    }

    /// Re-fetch the current user, e.g. after a profile edit elsewhere.
    pub async fn refresh_user(&self) -> Result<(), ClientError> {
        let has_live_token = self
            .tokens
            .get(TOKEN_KEY)?
            .is_some_and(|t| !is_token_expired(&t, Utc::now()));
        if !has_live_token {
            return Ok(());
        }

        match self.api.get_me().await {
            Ok(user) => {
                let is_admin = user.is_admin();
                self.set_user(user).await;
                if is_admin {
                    self.fetch_pending_loan_count().await;
                }
                Ok(())
            }
            Err(e) => {
                self.notifier.error("Could not refresh user data.");
                self.logout().await;
                Err(e)
            }
        }
    }

    /// Sidebar badge for admins. Students and failures read as zero.
    pub async fn fetch_pending_loan_count(&self) -> u64 {
        let is_admin = self
            .state
            .read()
            .await
            .user
            .as_ref()
            .is_some_and(User::is_admin);

        let count = if is_admin {
            match self.api.get_dashboard_stats().await {
                Ok(stats) => stats.pending_loans,
                Err(e) => {
                    tracing::warn!("Could not fetch pending loan count: {}", e);
                    0
                }
            }
        } else {
            0
        };

        self.state.write().await.pending_loan_count = count;
        count
    }

    /// Route guard for the page about to mount
    pub async fn authorize(&self, route: &Route) -> Access {
        let role = self.state.read().await.user.as_ref().map(|u| u.role);
        guard(route, role)
    }

    /// Central failure hook for view actions: shows the toast and, for an
    /// expired or rejected session, forces a logout and returns the login
    /// route to navigate to.
    pub async fn handle_failure(&self, err: &ClientError) -> Option<Route> {
        self.notifier.report_error(err);
        if err.is_unauthorized() {
            tracing::info!("Session rejected by server, forcing logout");
            return Some(self.logout().await);
        }
        None
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ClientError> {
        let user = self.api.update_profile(update).await?;
        self.set_user(user.clone()).await;
        self.notifier.success("Profile updated successfully!");
        Ok(user)
    }

    pub async fn upload_profile_picture(&self, picture: Option<&FileUpload>) -> Result<User, ClientError> {
        let Some(picture) = picture else {
            self.notifier.info("Please select a picture to upload.");
            return Err(ClientError::Validation(
                "Please select a picture to upload.".to_string(),
            ));
        };
        let user = self.api.upload_profile_picture(picture).await?;
        self.set_user(user.clone()).await;
        self.notifier.success("Profile picture updated!");
        Ok(user)
    }

    pub async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<ActionReceipt, ClientError> {
        check_passwords_match(new_password, confirm_password, "New passwords do not match.")?;
        let receipt = self
            .api
            .change_password(&ChangePassword {
                current_password: current_password.to_string(),
                new_password: new_password.to_string(),
            })
            .await?;
        self.notifier.success("Password changed successfully!");
        Ok(receipt)
    }

    pub async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<ActionReceipt, ClientError> {
        validate_password_reset(token, new_password, confirm_password)?;
        let receipt = self.api.reset_password(token, new_password).await?;
        self.notifier.success("Password has been reset successfully!");
        Ok(receipt)
    }

    async fn set_user(&self, user: User) {
        self.state.write().await.user = Some(user);
    }
}

fn check_passwords_match(password: &str, confirm: &str, message: &str) -> Result<(), ClientError> {
    if password != confirm {
        return Err(ClientError::Validation(message.to_string()));
    }
    Ok(())
}

/// Form checks for the reset-password page, in the order the page runs them.
pub fn validate_password_reset(token: &str, password: &str, confirm: &str) -> Result<(), ClientError> {
    check_passwords_match(password, confirm, "Passwords do not match.")?;
    if token.trim().is_empty() {
        return Err(ClientError::Validation(
            "Invalid or missing reset token. Please request a new link.".to_string(),
        ));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ClientError::Validation(format!(
            "Password must be at least {} characters long.",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}
