//! Pickup validation at the front desk
//!
//! An admin scans the code a student brings and the validator cross-checks
//! it against the live loan list. Nothing is written back: handing over the
//! book and the return bookkeeping happen through the loan endpoints.

pub mod camera;
pub mod validator;

pub use camera::{Camera, CameraFeed, ScannerSession};
pub use validator::{InvalidReason, LoanValidator, ValidationState};
