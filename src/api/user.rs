use reqwest::multipart::{Form, Part};
use reqwest::Method;

use super::{ApiClient, RequestBody};
use crate::domain::ClientError;
use crate::models::user::{UserDetailsWire, UserWire};
use crate::models::{
    ActionReceipt, ChangePassword, FileUpload, ProfileUpdate, User, UserDetails,
};

impl ApiClient {
    pub async fn get_users(&self) -> Result<Vec<User>, ClientError> {
        let users: Vec<UserWire> = self.get_list("/users/").await?;
        Ok(users
            .into_iter()
            .map(|u| u.into_user(self.base_url()))
            .collect())
    }

    pub async fn get_user_details(&self, id: i64) -> Result<UserDetails, ClientError> {
        let wire: UserDetailsWire = self.get_json(&format!("/users/{}/details", id)).await?;
        Ok(wire.into_details(self.base_url()))
    }

    pub async fn delete_user(&self, id: i64) -> Result<ActionReceipt, ClientError> {
        tracing::info!("Deleting user {}", id);
        self.send(Method::DELETE, &format!("/users/{}", id), RequestBody::None)
            .await?
            .into_receipt()
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ClientError> {
        let wire: UserWire = self
            .send(
                Method::PUT,
                "/users/me",
                RequestBody::Json(serde_json::to_value(update)?),
            )
            .await?
            .into_json()?;
        Ok(wire.into_user(self.base_url()))
    }

    pub async fn change_password(&self, data: &ChangePassword) -> Result<ActionReceipt, ClientError> {
        self.post_action(
            "/users/me/password",
            RequestBody::Json(serde_json::to_value(data)?),
        )
        .await
    }

    pub async fn upload_profile_picture(&self, picture: &FileUpload) -> Result<User, ClientError> {
        let part = Part::bytes(picture.bytes.clone())
            .file_name(picture.file_name.clone())
            .mime_str(&picture.mime_type)
            .map_err(|e| ClientError::Validation(format!("Invalid picture type: {}", e)))?;
        let form = Form::new().part("file", part);

        let wire: UserWire = self
            .send(Method::POST, "/users/me/picture", RequestBody::Multipart(form))
            .await?
            .into_json()?;
        Ok(wire.into_user(self.base_url()))
    }
}
