use std::env;
use std::path::PathBuf;

#[derive(Clone)]
pub struct Config {
    pub port: u16,
    pub notes_dir: PathBuf,
    pub static_dir: String,
    pub cache_budget_bytes: u64,
    pub debounce_secs: u64,
    pub sync_interval_secs: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("PORT must be a valid number"),
            notes_dir: PathBuf::from(env::var("NOTES_DIR").unwrap_or_else(|_| "./db".to_string())),
            static_dir: env::var("STATIC_DIR").unwrap_or_else(|_| "./static".to_string()),
            cache_budget_bytes: env::var("NOTES_CACHE_BUDGET_BYTES")
                .unwrap_or_else(|_| (8 * 1024 * 1024).to_string())
                .parse()
                .expect("NOTES_CACHE_BUDGET_BYTES must be a valid number"),
            debounce_secs: env::var("SYNC_DEBOUNCE_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .expect("SYNC_DEBOUNCE_SECS must be a valid number"),
            sync_interval_secs: env::var("SYNC_INTERVAL_SECS")
                .unwrap_or_else(|_| "300".to_string())
                .parse()
                .expect("SYNC_INTERVAL_SECS must be a valid number"),
        }
    }
}
