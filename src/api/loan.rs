use async_trait::async_trait;
use serde_json::json;

use super::{ApiClient, RequestBody};
use crate::domain::{ClientError, LoanSource};
use crate::models::loan::LoanWire;
use crate::models::{ActionReceipt, Loan};

impl ApiClient {
    pub async fn get_loans(&self) -> Result<Vec<Loan>, ClientError> {
        let loans: Vec<LoanWire> = self.get_list("/loans/").await?;
        tracing::debug!("Fetched {} loans", loans.len());
        Ok(loans.into_iter().map(|l| l.into_loan(None)).collect())
    }

    pub async fn request_loan(&self, book_id: i64) -> Result<ActionReceipt, ClientError> {
        tracing::info!("Requesting loan for book {}", book_id);
        self.post_action(
            "/loans/request",
            RequestBody::Json(json!({ "book_id": book_id })),
        )
        .await
    }

    /// Return the caller's copy of a book. The receipt may carry a fine.
    pub async fn return_book(&self, book_id: i64) -> Result<ActionReceipt, ClientError> {
        tracing::info!("Returning book {}", book_id);
        self.post_action(
            "/loans/return",
            RequestBody::Json(json!({ "book_id": book_id })),
        )
        .await
    }

    pub async fn approve_loan(&self, loan_id: i64) -> Result<ActionReceipt, ClientError> {
        tracing::info!("Approving loan {}", loan_id);
        self.post_action(&format!("/loans/{}/approve", loan_id), RequestBody::None)
            .await
    }

    pub async fn reject_loan(&self, loan_id: i64) -> Result<ActionReceipt, ClientError> {
        tracing::info!("Rejecting loan {}", loan_id);
        self.post_action(&format!("/loans/{}/reject", loan_id), RequestBody::None)
            .await
    }
}

#[async_trait]
impl LoanSource for ApiClient {
    async fn fetch_loans(&self) -> Result<Vec<Loan>, ClientError> {
        self.get_loans().await
    }
}
