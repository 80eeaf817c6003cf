//! Configuration loading and resolution
//!
//! Each setting is resolved in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! Arguments and environment variables are both parsed by the binary (clap
//! `env` support) and arrive here merged as [`ConfigOverrides`].

use crate::{Error, Result};
use serde::Deserialize;
use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BUCKET: &str = "segments";
pub const DEFAULT_TABLE: &str = "segment_images";
pub const DEFAULT_EXPORT_PATH: &str = "segments.xlsx";
pub const DEFAULT_BIND: &str = "127.0.0.1:5000";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Config file name searched in the working directory
const LOCAL_CONFIG_FILE: &str = "labeler.toml";

/// Settings supplied on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_path: Option<PathBuf>,
    pub store_url: Option<String>,
    pub store_key: Option<String>,
    pub bucket: Option<String>,
    pub table: Option<String>,
    pub export_path: Option<PathBuf>,
    pub bind: Option<String>,
    pub http_timeout_secs: Option<u64>,
    pub log_level: Option<String>,
}

/// Contents of the TOML config file; every key is optional
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub store_url: Option<String>,
    pub store_key: Option<String>,
    pub bucket: Option<String>,
    pub table: Option<String>,
    pub export_path: Option<PathBuf>,
    pub bind: Option<String>,
    pub http_timeout_secs: Option<u64>,
    pub log_level: Option<String>,
}

impl FileConfig {
    /// Parse a config file from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}

/// Fully resolved labeler configuration, read once at startup
#[derive(Clone)]
pub struct LabelerConfig {
    /// Base URL of the hosted table service (e.g. https://xyz.supabase.co)
    pub store_url: String,
    /// Access key sent as `apikey` and bearer token
    pub store_key: String,
    /// Storage bucket holding the referenced segment images
    pub bucket: String,
    /// Table holding segment rows
    pub table: String,
    /// Spreadsheet regenerated on every commit
    pub export_path: PathBuf,
    pub bind: SocketAddr,
    pub http_timeout: Duration,
    pub log_level: String,
    /// Config file that contributed settings, if any
    pub config_file: Option<PathBuf>,
}

impl fmt::Debug for LabelerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LabelerConfig")
            .field("store_url", &self.store_url)
            .field("store_key", &"<redacted>")
            .field("bucket", &self.bucket)
            .field("table", &self.table)
            .field("export_path", &self.export_path)
            .field("bind", &self.bind)
            .field("http_timeout", &self.http_timeout)
            .field("log_level", &self.log_level)
            .field("config_file", &self.config_file)
            .finish()
    }
}

impl LabelerConfig {
    /// Resolve configuration from overrides, the config file and defaults
    ///
    /// An explicitly named config file must exist; the implicit locations are
    /// skipped when absent.
    pub fn resolve(overrides: ConfigOverrides) -> Result<Self> {
        let config_file = match &overrides.config_path {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                Some(path.clone())
            }
            None => find_config_file(),
        };

        let file = match &config_file {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };

        Self::merge(overrides, file, config_file)
    }

    /// Merge overrides over file settings over compiled defaults
    pub fn merge(
        overrides: ConfigOverrides,
        file: FileConfig,
        config_file: Option<PathBuf>,
    ) -> Result<Self> {
        let store_url = non_empty(overrides.store_url.or(file.store_url)).ok_or_else(|| {
            Error::Config("store URL is required (--store-url or SUPABASE_URL)".to_string())
        })?;
        let store_key = non_empty(overrides.store_key.or(file.store_key)).ok_or_else(|| {
            Error::Config("store key is required (--store-key or SUPABASE_KEY)".to_string())
        })?;

        let bind_str = overrides
            .bind
            .or(file.bind)
            .unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind = bind_str
            .parse::<SocketAddr>()
            .map_err(|e| Error::Config(format!("Invalid bind address '{}': {}", bind_str, e)))?;

        let timeout_secs = overrides
            .http_timeout_secs
            .or(file.http_timeout_secs)
            .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(Error::Config("HTTP timeout must be at least 1 second".to_string()));
        }

        Ok(Self {
            store_url: store_url.trim_end_matches('/').to_string(),
            store_key,
            bucket: non_empty(overrides.bucket.or(file.bucket))
                .unwrap_or_else(|| DEFAULT_BUCKET.to_string()),
            table: non_empty(overrides.table.or(file.table))
                .unwrap_or_else(|| DEFAULT_TABLE.to_string()),
            export_path: overrides
                .export_path
                .or(file.export_path)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_PATH)),
            bind,
            http_timeout: Duration::from_secs(timeout_secs),
            log_level: non_empty(overrides.log_level.or(file.log_level))
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            config_file,
        })
    }
}

/// Look for a config file in the platform config dir, then the working directory
fn find_config_file() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("labeler").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.exists() {
        return Some(local);
    }

    None
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
