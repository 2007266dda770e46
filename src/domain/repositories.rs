//! Seam trait definitions
//!
//! These traits define the contract for the client's data sources.
//! Implementations live in the infrastructure layer and in `api`.

use async_trait::async_trait;

use super::ClientError;
use crate::models::Loan;

/// Key under which the session token is persisted.
pub const TOKEN_KEY: &str = "token";

/// Browser local-storage analogue: a flat string key/value store.
pub trait TokenStore: Send + Sync {
    /// Read a value, `None` when the key was never set
    fn get(&self, key: &str) -> Result<Option<String>, ClientError>;

    /// Write a value, replacing any previous one
    fn set(&self, key: &str, value: &str) -> Result<(), ClientError>;

    /// Remove a value; removing a missing key is not an error
    fn remove(&self, key: &str) -> Result<(), ClientError>;
}

/// Read access to the authoritative loan list.
#[async_trait]
pub trait LoanSource: Send + Sync {
    /// Fetch every loan visible to the current session
    async fn fetch_loans(&self) -> Result<Vec<Loan>, ClientError>;
}
