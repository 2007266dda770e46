//! Admin dashboard "today" feed
//!
//! The API has no activity endpoint and no creation timestamps for books or
//! users, so the feed is rebuilt from loan dates on every load.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::collections::HashMap;

use crate::api::ApiClient;
use crate::domain::ClientError;
use crate::models::{Book, Loan, LoanStatus, User};
use crate::services::circulation::{UNKNOWN_BOOK, UNKNOWN_USER};

pub const MAX_ACTIVITIES: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    LoanRequest,
    LoanApproved,
    LoanRejected,
    BookReturned,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Activity {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub timestamp: NaiveDateTime,
    pub text: String,
}

/// Fetch loans, books and users together and build today's feed.
pub async fn load_recent_activity(api: &ApiClient, today: NaiveDate) -> Result<Vec<Activity>, ClientError> {
    let (loans, books, users) =
        futures::try_join!(api.get_loans(), api.get_books(), api.get_users())?;
    Ok(build_activity_feed(&loans, &books, &users, today))
}

/// Loans requested, decided or returned on `today`, newest first, capped
/// at [`MAX_ACTIVITIES`].
pub fn build_activity_feed(
    loans: &[Loan],
    books: &[Book],
    users: &[User],
    today: NaiveDate,
) -> Vec<Activity> {
    let titles: HashMap<i64, &str> = books.iter().map(|b| (b.id, b.title.as_str())).collect();
    let names: HashMap<i64, &str> = users.iter().map(|u| (u.id, u.name.as_str())).collect();
    let on_today = |at: Option<NaiveDateTime>| at.filter(|t| t.date() == today);

    let mut feed = Vec::new();
    for loan in loans {
        let book = titles.get(&loan.book_id).copied().unwrap_or(UNKNOWN_BOOK);
        let user = names.get(&loan.user_id).copied().unwrap_or(UNKNOWN_USER);

        if let Some(at) = on_today(loan.request_date) {
            feed.push(Activity {
                id: format!("loan-{}-req", loan.id),
                kind: ActivityKind::LoanRequest,
                timestamp: at,
                text: format!("{} requested \"{}\".", user, book),
            });
        }

        if let Some(at) = on_today(loan.approval_date) {
            let (kind, verb) = if loan.status == LoanStatus::Rejected {
                (ActivityKind::LoanRejected, "rejected")
            } else {
                (ActivityKind::LoanApproved, "approved")
            };
            feed.push(Activity {
                id: format!("loan-{}-appr", loan.id),
                kind,
                timestamp: at,
                text: format!("Loan of \"{}\" for {} was {}.", book, user, verb),
            });
        }

        if let Some(at) = on_today(loan.return_date) {
            feed.push(Activity {
                id: format!("loan-{}-ret", loan.id),
                kind: ActivityKind::BookReturned,
                timestamp: at,
                text: format!("{} returned \"{}\".", user, book),
            });
        }
    }

    feed.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    feed.truncate(MAX_ACTIVITIES);
    feed
}
