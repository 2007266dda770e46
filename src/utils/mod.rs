pub mod dates;
pub mod urls;
