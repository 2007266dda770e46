pub mod book;
pub mod dashboard;
pub mod loan;
pub mod user;

use serde::{Deserialize, Serialize};

pub use book::{Book, BookForm, FileUpload};
pub use dashboard::DashboardStats;
pub use loan::{Loan, LoanStatus, LoanWithDetails};
pub use user::{
    ChangePassword, LoginRecord, ProfileUpdate, Role, User, UserDetails, UserRegistration,
};

/// Acknowledgement returned by action endpoints (request, return, approve...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionReceipt {
    #[serde(default)]
    pub detail: String,
    #[serde(default)]
    pub fine: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
}
