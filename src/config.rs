use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "https://fastapilibrary.onrender.com";
pub const DEFAULT_DUE_SOON_DAYS: i64 = 3;
/// Longest due-soon window accepted from the environment
pub const MAX_DUE_SOON_DAYS: i64 = 365;

#[derive(Clone, Debug)]
pub struct Config {
    pub api_base_url: String,
    pub token_store_path: PathBuf,
    pub request_timeout: Duration,
    pub toast_timeout: Duration,
    pub due_soon_days: i64,
    pub profile: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let profile = env::var("PROFILE").unwrap_or_else(|_| "default".to_string());

        let api_base_url = env::var("API_BASE_URL")
            .ok()
            .filter(|u| url::Url::parse(u).is_ok())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let token_store_path = env::var("TOKEN_STORE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_store_path(&profile));

        Self {
            api_base_url,
            token_store_path,
            request_timeout: Duration::from_secs(parse_var("REQUEST_TIMEOUT_SECS").unwrap_or(30)),
            toast_timeout: Duration::from_millis(parse_var("TOAST_TIMEOUT_MS").unwrap_or(5000)),
            due_soon_days: parse_var("DUE_SOON_DAYS")
                .filter(|days| (0..=MAX_DUE_SOON_DAYS).contains(days))
                .unwrap_or(DEFAULT_DUE_SOON_DAYS),
            profile,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            token_store_path: default_store_path("default"),
            request_timeout: Duration::from_secs(30),
            toast_timeout: Duration::from_millis(5000),
            due_soon_days: DEFAULT_DUE_SOON_DAYS,
            profile: "default".to_string(),
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

/// On Linux/macOS: ~/.cache/circulation-desk/local_storage.json
/// On Windows: %LOCALAPPDATA%\circulation-desk\local_storage.json
fn default_store_path(profile: &str) -> PathBuf {
    let filename = if profile == "default" {
        "local_storage.json".to_string()
    } else {
        format!("local_storage_{}.json", profile)
    };

    let root = if cfg!(target_os = "windows") {
        env::var("LOCALAPPDATA").map(PathBuf::from)
    } else {
        env::var("HOME").map(|home| PathBuf::from(home).join(".cache"))
    };

    root.unwrap_or_else(|_| env::temp_dir())
        .join("circulation-desk")
        .join(filename)
}
