use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::dates::deserialize_opt_datetime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoanStatus {
    Pending,
    Approved,
    Rejected,
    Returned,
    OnHold,
    /// Any status this client does not know. Such loans are listed but
    /// count as neither active nor closed
    #[serde(other)]
    Unknown,
}

impl LoanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Pending => "pending",
            LoanStatus::Approved => "approved",
            LoanStatus::Rejected => "rejected",
            LoanStatus::Returned => "returned",
            LoanStatus::OnHold => "on-hold",
            LoanStatus::Unknown => "unknown",
        }
    }

    /// Closed loans show up in the history list
    pub fn is_closed(&self) -> bool {
        matches!(self, LoanStatus::Returned | LoanStatus::Rejected)
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One borrow transaction, as held by the client.
///
/// The server owns the record; this is a transient copy fetched per view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    pub id: i64,
    pub user_id: i64,
    pub book_id: i64,
    pub request_date: Option<NaiveDateTime>,
    pub approval_date: Option<NaiveDateTime>,
    pub due_date: Option<NaiveDateTime>,
    pub return_date: Option<NaiveDateTime>,
    pub status: LoanStatus,
}

impl Loan {
    /// Approved and still out
    pub fn is_active(&self) -> bool {
        self.status == LoanStatus::Approved && self.return_date.is_none()
    }
}

/// Loan joined with display names for UI lists.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanWithDetails {
    #[serde(flatten)]
    pub loan: Loan,
    pub book_title: String,
    pub user_name: Option<String>,
    pub user_matric: Option<String>,
}

/// Loan as the API sends it.
///
/// Field names drifted across backend versions (`borrowed_on` vs
/// `request_date`, `returned_on` vs `return_date`), so both are accepted.
#[derive(Debug, Deserialize)]
pub struct LoanWire {
    pub id: i64,
    #[serde(default)]
    pub user_id: Option<i64>,
    pub book_id: i64,
    #[serde(default)]
    pub book_title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_datetime")]
    pub request_date: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "deserialize_opt_datetime")]
    pub approval_date: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "deserialize_opt_datetime")]
    pub borrowed_on: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "deserialize_opt_datetime")]
    pub due_date: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "deserialize_opt_datetime")]
    pub return_date: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "deserialize_opt_datetime")]
    pub returned_on: Option<NaiveDateTime>,
    pub status: LoanStatus,
    #[serde(default)]
    pub returned: Option<bool>,
}

impl LoanWire {
    /// Normalize into the client shape. `owner_id` fills in `user_id` for
    /// payloads nested under a user, where the server omits it.
    pub fn into_loan(self, owner_id: Option<i64>) -> Loan {
        let mut status = self.status;
        if self.returned == Some(true) {
            status = LoanStatus::Returned;
        }

        Loan {
            id: self.id,
            user_id: self.user_id.or(owner_id).unwrap_or_default(),
            book_id: self.book_id,
            request_date: self.request_date.or(self.borrowed_on),
            approval_date: self.approval_date.or(self.borrowed_on),
            due_date: self.due_date,
            return_date: self.return_date.or(self.returned_on),
            status,
        }
    }

    pub fn into_detailed(self, owner_id: i64) -> LoanWithDetails {
        let book_title = self
            .book_title
            .clone()
            .unwrap_or_else(|| "Unknown Book".to_string());
        LoanWithDetails {
            loan: self.into_loan(Some(owner_id)),
            book_title,
            user_name: None,
            user_matric: None,
        }
    }
}
