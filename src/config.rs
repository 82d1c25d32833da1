use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use crate::http::parser::DEFAULT_MAX_HEAD_SIZE;

/// Environment variable naming an optional YAML config file.
pub const CONFIG_ENV: &str = "HTTPFROMTCP_CONFIG";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
    /// Upper bound on request-line plus header bytes per request.
    pub max_head_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:42069".to_string(),
            max_head_size: DEFAULT_MAX_HEAD_SIZE,
        }
    }
}

impl Config {
    /// Defaults, overlaid by the file named in `HTTPFROMTCP_CONFIG` and then
    /// by `LISTEN`.
    pub fn load() -> Self {
        let mut cfg = match std::env::var(CONFIG_ENV) {
            Ok(path) => Self::from_file(&path).unwrap_or_else(|e| {
                tracing::warn!(path = %path, error = %e, "ignoring config file");
                Self::default()
            }),
            Err(_) => Self::default(),
        };

        if let Ok(listen_addr) = std::env::var("LISTEN") {
            cfg.server.listen_addr = listen_addr;
        }
        cfg
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_yaml(&raw)
    }

    pub fn from_yaml(raw: &str) -> anyhow::Result<Self> {
        let cfg = serde_yaml::from_str(raw).context("invalid config")?;
        Ok(cfg)
    }
}
