//! Domain layer - Pure client abstractions
//!
//! This layer contains NO transport details (no reqwest, no files).
//! Only trait definitions and the error taxonomy.

pub mod errors;
pub mod repositories;

pub use errors::ClientError;
pub use repositories::*;
