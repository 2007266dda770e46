use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::LoanWithDetails;
use crate::modules::scanner::InvalidReason;
use crate::utils::dates::format_display_date;

/// What a pickup code carries. Built when a student downloads the code for
/// an approved loan; only `loanId` and `matricNo` are trusted on the way back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrPayload {
    pub loan_id: i64,
    pub student_name: String,
    pub matric_no: String,
    pub book_title: String,
    pub approved_on: String,
    pub due_date: String,
}

impl QrPayload {
    pub fn for_loan(loan: &LoanWithDetails) -> Self {
        Self {
            loan_id: loan.loan.id,
            student_name: loan.user_name.clone().unwrap_or_default(),
            matric_no: loan.user_matric.clone().unwrap_or_default(),
            book_title: loan.book_title.clone(),
            approved_on: format_display_date(loan.loan.approval_date),
            due_date: format_display_date(loan.loan.due_date),
        }
    }

    /// Pretty-printed JSON, the exact text stored in the code
    pub fn to_text(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// A decoded code that passed the shape check. Display fields are optional
/// since codes printed by older builds may lack them.
#[derive(Debug, Clone, PartialEq)]
pub struct ScannedLoan {
    pub loan_id: i64,
    pub matric_no: String,
    pub student_name: Option<String>,
    pub book_title: Option<String>,
    pub approved_on: Option<String>,
    pub due_date: Option<String>,
}

/// Shape-check decoded text. Anything without a numeric, non-zero `loanId`
/// and a non-empty `matricNo` is rejected before any server lookup.
pub fn parse_scanned(text: &str) -> Result<ScannedLoan, InvalidReason> {
    let value: Value = serde_json::from_str(text).map_err(|e| {
        tracing::debug!("Scanned text is not JSON: {}", e);
        InvalidReason::MalformedPayload
    })?;

    let loan_id = value
        .get("loanId")
        .and_then(Value::as_i64)
        .filter(|id| *id != 0)
        .ok_or(InvalidReason::MalformedPayload)?;

    let matric_no = value
        .get("matricNo")
        .and_then(Value::as_str)
        .filter(|m| !m.trim().is_empty())
        .ok_or(InvalidReason::MalformedPayload)?
        .to_string();

    let text_field = |key: &str| value.get(key).and_then(Value::as_str).map(str::to_string);

    Ok(ScannedLoan {
        loan_id,
        matric_no,
        student_name: text_field("studentName"),
        book_title: text_field("bookTitle"),
        approved_on: text_field("approvedOn"),
        due_date: text_field("dueDate"),
    })
}
