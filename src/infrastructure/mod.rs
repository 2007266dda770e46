//! Infrastructure layer - Framework implementations
//!
//! This layer contains the token store implementations (repositories).

pub mod repositories;

pub use repositories::*;
