use serde::{Deserialize, Serialize};
use std::fmt;

use super::loan::{LoanWire, LoanWithDetails};
use crate::utils::urls::resolve_resource_url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Student,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => f.write_str("admin"),
            Role::Student => f.write_str("student"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub matric_no: String,
    pub department: String,
    pub role: Role,
    pub profile_picture_url: Option<String>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Debug, Deserialize)]
pub struct UserWire {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub matric_no: String,
    #[serde(default)]
    pub department: String,
    pub role: Role,
    #[serde(default)]
    pub profile_picture_url: Option<String>,
}

impl UserWire {
    pub fn into_user(self, base_url: &str) -> User {
        User {
            id: self.id,
            name: self.name,
            email: self.email,
            matric_no: self.matric_no,
            department: self.department,
            role: self.role,
            profile_picture_url: resolve_resource_url(base_url, self.profile_picture_url.as_deref()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRecord {
    pub timestamp: String,
    pub ip_address: String,
}

/// Admin view of one user with their loans and sign-in history.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetails {
    pub user: User,
    pub loans: Vec<LoanWithDetails>,
    pub login_history: Vec<LoginRecord>,
}

#[derive(Debug, Deserialize)]
pub struct UserDetailsWire {
    #[serde(flatten)]
    pub user: UserWire,
    #[serde(default)]
    pub loans: Vec<LoanWire>,
    #[serde(default)]
    pub login_history: Vec<LoginRecord>,
}

impl UserDetailsWire {
    pub fn into_details(self, base_url: &str) -> UserDetails {
        let user = self.user.into_user(base_url);
        let loans = self
            .loans
            .into_iter()
            .map(|loan| {
                let mut detailed = loan.into_detailed(user.id);
                detailed.user_name = Some(user.name.clone());
                detailed.user_matric = Some(user.matric_no.clone());
                detailed
            })
            .collect();
        UserDetails {
            user,
            loans,
            login_history: self.login_history,
        }
    }
}

/// Registration form body, sent as JSON.
#[derive(Debug, Clone, Serialize)]
pub struct UserRegistration {
    pub name: String,
    pub matric_no: String,
    pub department: String,
    pub password: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_code: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChangePassword {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn details_fill_nested_loans_with_owner() {
        let wire: UserDetailsWire = serde_json::from_value(serde_json::json!({
            "id": 5,
            "name": "Ada",
            "email": "ada@example.org",
            "matric_no": "M001",
            "department": "CS",
            "role": "student",
            "profile_picture_url": null,
            "loans": [
                {"id": 1, "book_id": 2, "book_title": "SICP", "status": "pending", "request_date": "2024-05-01"}
            ],
            "login_history": [{"timestamp": "2024-05-01T10:00:00", "ip_address": "10.0.0.1"}]
        }))
        .unwrap();
        let details = wire.into_details("https://api.example.org");
        assert_eq!(details.user.profile_picture_url, None);
        assert_eq!(details.loans.len(), 1);
        assert_eq!(details.loans[0].loan.user_id, 5);
        assert_eq!(details.loans[0].user_matric.as_deref(), Some("M001"));
        assert_eq!(details.login_history.len(), 1);
    }

    #[test]
    fn registration_omits_missing_admin_code() {
        let reg = UserRegistration {
            name: "N".into(),
            matric_no: "M".into(),
            department: "D".into(),
            password: "secret1".into(),
            role: Role::Student,
            admin_code: None,
        };
        let json = serde_json::to_value(&reg).unwrap();
        assert!(json.get("admin_code").is_none());
        assert_eq!(json["role"], "student");
    }
}
