//! Loan status derivation
//!
//! Buckets a flat loan list for dashboard display. There is no server
//! endpoint for this; the classification is computed client-side from the
//! loans and a reference day.

use chrono::{NaiveDate, TimeDelta};

use crate::models::{Loan, LoanStatus};

pub const DEFAULT_DUE_SOON_DAYS: i64 = 3;

/// Anything with a loan inside it can be bucketed, so detailed rows
/// (with titles) keep their extra fields through derivation.
pub trait AsLoan {
    fn as_loan(&self) -> &Loan;
}

impl AsLoan for Loan {
    fn as_loan(&self) -> &Loan {
        self
    }
}

impl AsLoan for crate::models::LoanWithDetails {
    fn as_loan(&self) -> &Loan {
        &self.loan
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoanBuckets<T> {
    /// Approved and not yet returned
    pub active: Vec<T>,
    pub pending: Vec<T>,
    /// Active with a due date before today
    pub overdue: Vec<T>,
    /// Active and due within the window; left empty while anything is overdue
    pub due_soon: Vec<T>,
    /// Returned or rejected, most recent request first
    pub history: Vec<T>,
}

/// Which banner the dashboard shows. One category at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanAlert {
    Overdue(usize),
    DueSoon(usize),
    None,
}

impl<T> LoanBuckets<T> {
    pub fn alert(&self) -> LoanAlert {
        if !self.overdue.is_empty() {
            LoanAlert::Overdue(self.overdue.len())
        } else if !self.due_soon.is_empty() {
            LoanAlert::DueSoon(self.due_soon.len())
        } else {
            LoanAlert::None
        }
    }
}

/// Partition `loans` relative to `today`.
///
/// A loan can sit in `active` and in one of `overdue`/`due_soon` at the same
/// time; `pending` and `history` never overlap with the active buckets.
/// Loans are tracked by id, so two loans of the same book stay separate.
pub fn derive_buckets<T: AsLoan + Clone>(
    loans: &[T],
    today: NaiveDate,
    due_soon_days: i64,
) -> LoanBuckets<T> {
    // Oversized windows saturate instead of overflowing the calendar
    let window_end = TimeDelta::try_days(due_soon_days)
        .and_then(|window| today.checked_add_signed(window))
        .unwrap_or(if due_soon_days < 0 { today } else { NaiveDate::MAX });

    let active: Vec<T> = loans
        .iter()
        .filter(|l| l.as_loan().is_active())
        .cloned()
        .collect();

    let pending: Vec<T> = loans
        .iter()
        .filter(|l| l.as_loan().status == LoanStatus::Pending)
        .cloned()
        .collect();

    let overdue: Vec<T> = active
        .iter()
        .filter(|l| {
            l.as_loan()
                .due_date
                .is_some_and(|due| due.date() < today)
        })
        .cloned()
        .collect();

    let due_soon = if overdue.is_empty() {
        active
            .iter()
            .filter(|l| {
                l.as_loan().due_date.is_some_and(|due| {
                    let due = due.date();
                    due >= today && due <= window_end
                })
            })
            .cloned()
            .collect()
    } else {
        Vec::new()
    };

    let mut history: Vec<T> = loans
        .iter()
        .filter(|l| l.as_loan().status.is_closed())
        .cloned()
        .collect();
    // Stable sort: ties keep server order; undated requests sink to the end
    history.sort_by(|a, b| b.as_loan().request_date.cmp(&a.as_loan().request_date));

    tracing::debug!(
        "Derived loan buckets: active={} pending={} overdue={} due_soon={} history={}",
        active.len(),
        pending.len(),
        overdue.len(),
        due_soon.len(),
        history.len()
    );

    LoanBuckets {
        active,
        pending,
        overdue,
        due_soon,
        history,
    }
}
