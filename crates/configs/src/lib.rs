use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

pub const INDEX_COLUMN: &str = "Index";
pub const NAME_COLUMN: &str = "Artist Name";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port(), worker_threads: Some(4) }
    }
}

/// Where the artist dataset lives and which header it is written with.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
    /// Declared header. Empty means "keep the file's header and append new keys".
    #[serde(default)]
    pub columns: Vec<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { path: default_store_path(), columns: Vec::new() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// `compact` or `json`
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { format: default_log_format() }
    }
}

fn default_host() -> String { "127.0.0.1".into() }
fn default_port() -> u16 { 8000 }
fn default_store_path() -> PathBuf { PathBuf::from("spotify_artist_data.csv") }
fn default_log_format() -> String { "compact".into() }

/// `CONFIG_PATH`, or `config.toml` in the working directory.
pub fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    load_from_str(&content)
}

pub fn load_from_str(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load `config.toml` (or `CONFIG_PATH`), falling back to defaults when the file is absent.
    /// A file that exists but does not parse or validate is an error.
    pub fn load_and_validate() -> Result<Self> {
        Self::load_or_default(&config_path())
    }

    /// Same as [`AppConfig::load_and_validate`] for an explicit path.
    pub fn load_or_default(path: &str) -> Result<Self> {
        let mut cfg = match std::fs::metadata(path) {
            Ok(_) => load_from_file(path).map_err(|e| anyhow!("{path}: {e}"))?,
            Err(_) => AppConfig::default(),
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.store.normalize_and_validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl StoreConfig {
    pub fn normalize_and_validate(&mut self) -> Result<()> {
        if self.path.as_os_str().is_empty() {
            return Err(anyhow!("store.path is empty"));
        }
        for c in self.columns.iter_mut() {
            *c = c.trim().to_string();
        }
        if self.columns.is_empty() {
            return Ok(());
        }
        let mut seen = HashSet::new();
        for c in &self.columns {
            if c.is_empty() {
                return Err(anyhow!("store.columns contains an empty column name"));
            }
            if !seen.insert(c.as_str()) {
                return Err(anyhow!("store.columns declares '{c}' twice"));
            }
        }
        for required in [INDEX_COLUMN, NAME_COLUMN] {
            if !seen.contains(required) {
                return Err(anyhow!("store.columns must include '{required}'"));
            }
        }
        Ok(())
    }

    /// Declared header, if any.
    pub fn declared_columns(&self) -> Option<&[String]> {
        if self.columns.is_empty() { None } else { Some(&self.columns) }
    }
}
