//! Runtime configuration
//!
//! Everything comes from the environment; there is no config file.

use std::path::PathBuf;

/// Environment variable holding the SQLite database path
pub const DATABASE_PATH_VAR: &str = "CALDIARY_DATABASE_PATH";

/// Environment variable that enables catalog seeding at startup
pub const SEED_CATALOG_VAR: &str = "CALDIARY_SEED_CATALOG";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub seed_catalog: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            database_path: database_path(),
            seed_catalog: std::env::var(SEED_CATALOG_VAR)
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
        }
    }
}

/// Database path from the environment, or `<project root>/data/caldiary.db`
pub fn database_path() -> PathBuf {
    std::env::var(DATABASE_PATH_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let mut path = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()))
                .unwrap_or_else(|| PathBuf::from("."));

            // Step out of target/release or target/debug
            if path.ends_with("release") || path.ends_with("debug") {
                if let Some(root) = path.parent().and_then(|p| p.parent()) {
                    path = root.to_path_buf();
                }
            }

            path.push("data");
            path.push("caldiary.db");
            path
        })
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
