//! Command-line arguments
//!
//! Every option can also come from the environment; the store settings use
//! the same variable names as the hosted project's dashboard
//! (`SUPABASE_URL`, `SUPABASE_KEY`, `SUPABASE_BUCKET`).

use clap::Parser;
use labeler_common::config::ConfigOverrides;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "labeler-web", version, about = "Segment labeling web service")]
pub struct Cli {
    /// TOML config file
    #[arg(long, env = "LABELER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Base URL of the hosted segment store
    #[arg(long, env = "SUPABASE_URL")]
    pub store_url: Option<String>,

    /// Access key for the segment store
    #[arg(long, env = "SUPABASE_KEY", hide_env_values = true)]
    pub store_key: Option<String>,

    /// Storage bucket holding the segment images
    #[arg(long, env = "SUPABASE_BUCKET")]
    pub bucket: Option<String>,

    /// Table holding segment rows
    #[arg(long, env = "LABELER_TABLE")]
    pub table: Option<String>,

    /// Spreadsheet written on every commit
    #[arg(long, env = "LABELER_EXPORT_PATH")]
    pub export_path: Option<PathBuf>,

    /// Listen address, e.g. 127.0.0.1:5000
    #[arg(long, env = "LABELER_BIND")]
    pub bind: Option<String>,

    /// Timeout for store requests, in seconds
    #[arg(long, env = "LABELER_HTTP_TIMEOUT_SECS")]
    pub http_timeout_secs: Option<u64>,

    /// Default log filter when RUST_LOG is unset
    #[arg(long, env = "LABELER_LOG_LEVEL")]
    pub log_level: Option<String>,
}

impl From<Cli> for ConfigOverrides {
    fn from(cli: Cli) -> Self {
        ConfigOverrides {
            config_path: cli.config,
            store_url: cli.store_url,
            store_key: cli.store_key,
            bucket: cli.bucket,
            table: cli.table,
            export_path: cli.export_path,
            bind: cli.bind,
            http_timeout_secs: cli.http_timeout_secs,
            log_level: cli.log_level,
        }
    }
}
