use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_books: u64,
    pub borrowed_books: u64,
    pub overdue_books: u64,
    pub total_students: u64,
    pub returned_books: u64,
    pub pending_loans: u64,
}

// Counters missing from the summary payload count as zero
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DashboardStatsWire {
    pub total_books: Option<u64>,
    pub borrowed_books: Option<u64>,
    pub overdue_books: Option<u64>,
    pub total_students: Option<u64>,
    pub returned_books: Option<u64>,
    pub pending_loans: Option<u64>,
}

impl From<DashboardStatsWire> for DashboardStats {
    fn from(wire: DashboardStatsWire) -> Self {
        Self {
            total_books: wire.total_books.unwrap_or(0),
            borrowed_books: wire.borrowed_books.unwrap_or(0),
            overdue_books: wire.overdue_books.unwrap_or(0),
            total_students: wire.total_students.unwrap_or(0),
            returned_books: wire.returned_books.unwrap_or(0),
            pending_loans: wire.pending_loans.unwrap_or(0),
        }
    }
}
