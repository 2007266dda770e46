//! Storage implementations behind the domain seams

pub mod token_store;

pub use token_store::{FileTokenStore, MemoryTokenStore};
