use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::llm_client::{DEFAULT_API_BASE, DEFAULT_MODEL};

/// Application configuration loaded from environment variables.
/// Every key has a default; the Gemini key may also be supplied per request.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub gemini_api_base: String,
    pub default_model: String,
    pub rendercv_bin: String,
    pub data_dir: PathBuf,
    pub applications_db: PathBuf,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: optional_env("GEMINI_API_KEY"),
            gemini_api_base: env_or("GEMINI_API_BASE", DEFAULT_API_BASE),
            default_model: env_or("DEFAULT_MODEL", DEFAULT_MODEL),
            rendercv_bin: env_or("RENDERCV_BIN", "rendercv"),
            data_dir: PathBuf::from(env_or("DATA_DIR", "data")),
            applications_db: PathBuf::from(env_or("APPLICATIONS_DB", "applications_db.json")),
            port: env_or("PORT", "8000")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }

    /// Directory holding saved résumé versions.
    pub fn versions_dir(&self) -> PathBuf {
        self.data_dir.join("versions")
    }

    /// SQLite file for usage analytics.
    pub fn analytics_db(&self) -> PathBuf {
        self.data_dir.join("analytics.db")
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    optional_env(key).unwrap_or_else(|| default.to_string())
}
