pub mod api;
pub mod auth;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod logging;
pub mod models;
pub mod modules;
pub mod routes;
pub mod services;
pub mod utils;

pub use api::ApiClient;
pub use config::Config;
pub use domain::ClientError;
