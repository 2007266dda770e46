//! Circulation desk helpers
//!
//! Joins loans with book titles and user names, and computes the pick lists
//! of the request/return screens. Data for a screen is fetched with an
//! all-succeed-or-fail join: if any call fails, nothing is applied.

use std::collections::{HashMap, HashSet};

use crate::api::ApiClient;
use crate::domain::ClientError;
use crate::models::{ActionReceipt, Book, Loan, LoanStatus, LoanWithDetails, User};
use crate::services::loan_status::AsLoan;

pub const UNKNOWN_BOOK: &str = "Unknown Book";
pub const UNKNOWN_USER: &str = "Unknown User";

/// Join loans with book titles; `owner` fills in the user columns for a
/// student's own list.
pub fn attach_details(loans: &[Loan], books: &[Book], owner: Option<&User>) -> Vec<LoanWithDetails> {
    let titles: HashMap<i64, &str> = books.iter().map(|b| (b.id, b.title.as_str())).collect();
    loans
        .iter()
        .map(|loan| LoanWithDetails {
            loan: loan.clone(),
            book_title: titles
                .get(&loan.book_id)
                .copied()
                .unwrap_or(UNKNOWN_BOOK)
                .to_string(),
            user_name: owner.map(|u| u.name.clone()),
            user_matric: owner.map(|u| u.matric_no.clone()),
        })
        .collect()
}

/// Admin variant: user columns come from the full user list.
pub fn attach_details_with_users(
    loans: &[Loan],
    books: &[Book],
    users: &[User],
) -> Vec<LoanWithDetails> {
    let people: HashMap<i64, &User> = users.iter().map(|u| (u.id, u)).collect();
    let mut detailed = attach_details(loans, books, None);
    for row in &mut detailed {
        let user = people.get(&row.loan.user_id);
        row.user_name = Some(
            user.map(|u| u.name.clone())
                .unwrap_or_else(|| UNKNOWN_USER.to_string()),
        );
        row.user_matric = user.map(|u| u.matric_no.clone());
    }
    detailed
}

/// Books a student may request: copies on the shelf, and no open
/// (pending or approved) loan of that title already.
pub fn requestable_books<'a>(books: &'a [Book], my_loans: &[Loan]) -> Vec<&'a Book> {
    let open: HashSet<i64> = my_loans
        .iter()
        .filter(|l| matches!(l.status, LoanStatus::Pending | LoanStatus::Approved))
        .map(|l| l.book_id)
        .collect();
    books
        .iter()
        .filter(|b| b.is_available() && !open.contains(&b.id))
        .collect()
}

/// Loans a return can be filed against: approved and still out
pub fn returnable_loans<T: AsLoan>(loans: &[T]) -> Vec<&T> {
    loans.iter().filter(|l| l.as_loan().is_active()).collect()
}

fn matches_term(term: &str, fields: &[&str]) -> bool {
    let term = term.to_lowercase();
    fields.iter().any(|f| f.to_lowercase().contains(&term))
}

pub fn search_history<'a>(history: &'a [LoanWithDetails], term: &str) -> Vec<&'a LoanWithDetails> {
    history
        .iter()
        .filter(|l| matches_term(term, &[&l.book_title]))
        .collect()
}

/// Catalog search box: title, author or ISBN
pub fn filter_books<'a>(books: &'a [Book], term: &str) -> Vec<&'a Book> {
    books
        .iter()
        .filter(|b| matches_term(term, &[&b.title, &b.author, &b.isbn]))
        .collect()
}

/// User list search box: name, matric number or department
pub fn filter_users<'a>(users: &'a [User], term: &str) -> Vec<&'a User> {
    users
        .iter()
        .filter(|u| matches_term(term, &[&u.name, &u.matric_no, &u.department]))
        .collect()
}

/// Toast text after a return; mentions the fine when one was charged.
pub fn return_message(receipt: &ActionReceipt) -> String {
    let mut message = receipt.detail.clone();
    if let Some(fine) = receipt.fine.filter(|f| *f > 0.0) {
        if !message.is_empty() {
            message.push(' ');
        }
        message.push_str(&format!("A fine of {} has been applied.", fine));
    }
    message
}

/// Everything the student request/return screen shows.
#[derive(Debug, Clone)]
pub struct StudentDesk {
    pub books: Vec<Book>,
    /// The student's own loans, newest request first
    pub my_loans: Vec<LoanWithDetails>,
}

impl StudentDesk {
    pub async fn load(api: &ApiClient, user: &User) -> Result<Self, ClientError> {
        let (books, loans) = futures::try_join!(api.get_books(), api.get_loans())?;

        let mine: Vec<Loan> = loans.into_iter().filter(|l| l.user_id == user.id).collect();
        let mut my_loans = attach_details(&mine, &books, Some(user));
        my_loans.sort_by(|a, b| b.loan.request_date.cmp(&a.loan.request_date));

        Ok(Self { books, my_loans })
    }

    pub fn requestable(&self) -> Vec<&Book> {
        let loans: Vec<Loan> = self.my_loans.iter().map(|l| l.loan.clone()).collect();
        requestable_books(&self.books, &loans)
    }

    pub fn returnable(&self) -> Vec<&LoanWithDetails> {
        returnable_loans(&self.my_loans)
    }
}

/// Everything the admin loan-management screen shows.
#[derive(Debug, Clone)]
pub struct LoanDesk {
    pub loans: Vec<LoanWithDetails>,
}

impl LoanDesk {
    pub async fn load(api: &ApiClient) -> Result<Self, ClientError> {
        let (books, loans, users) =
            futures::try_join!(api.get_books(), api.get_loans(), api.get_users())?;
        Ok(Self {
            loans: attach_details_with_users(&loans, &books, &users),
        })
    }

    pub fn pending(&self) -> Vec<&LoanWithDetails> {
        self.loans
            .iter()
            .filter(|l| l.loan.status == LoanStatus::Pending)
            .collect()
    }

    pub fn active(&self) -> Vec<&LoanWithDetails> {
        returnable_loans(&self.loans)
    }

    pub fn history(&self) -> Vec<&LoanWithDetails> {
        self.loans
            .iter()
            .filter(|l| l.loan.status.is_closed())
            .collect()
    }
}
