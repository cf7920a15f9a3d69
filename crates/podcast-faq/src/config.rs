use std::path::{Path, PathBuf};

use crate::error::AppError;

/// Application configuration loaded explicitly from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Redis connection URL (e.g. "redis://127.0.0.1:6379"). `None` disables the search cache.
    pub redis_url: Option<String>,
    /// FAQ dataset JSON file. `None` serves the embedded podcast FAQ.
    pub data_path: Option<String>,
    /// Serve MCP over TCP on this address instead of stdio.
    pub tcp_listen_addr: Option<String>,
}

impl Config {
    /// Optional:
    /// - `PODCAST_FAQ_DATA_PATH`: dataset JSON file (must exist when set)
    /// - `REDIS_URL`: Redis connection string
    /// - `MCP_TCP_LISTEN_ADDR`: e.g. "127.0.0.1:7410"
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let non_empty = |name: &str| var(name).filter(|v| !v.trim().is_empty());

        let data_path = non_empty("PODCAST_FAQ_DATA_PATH");
        if let Some(path) = &data_path {
            if !Path::new(path).is_file() {
                return Err(AppError::Config(format!(
                    "PODCAST_FAQ_DATA_PATH does not point to a file: {path}"
                )));
            }
        }

        Ok(Self {
            redis_url: non_empty("REDIS_URL"),
            data_path,
            tcp_listen_addr: non_empty("MCP_TCP_LISTEN_ADDR"),
        })
    }

    pub fn data_path(&self) -> Option<PathBuf> {
        self.data_path.as_deref().map(PathBuf::from)
    }

    /// Label for the dataset source used in logs and tool responses.
    pub fn source_label(&self) -> String {
        self.data_path.clone().unwrap_or_else(|| "embedded".to_string())
    }
}
