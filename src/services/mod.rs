//! Services Layer
//!
//! Client-side logic that sits between the API adapter and the views:
//! session lifecycle, notifications, loan derivations and desk helpers.

pub mod activity;
pub mod circulation;
pub mod loan_status;
pub mod notifications;
pub mod session;

// Re-export for convenience
pub use loan_status::{derive_buckets, LoanAlert, LoanBuckets};
pub use notifications::{Notifier, Toast, ToastKind};
pub use session::SessionManager;
