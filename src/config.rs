//! Runtime configuration shared by the loader, writer and URL fetcher.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Top-level configuration. Every field has a default, so a partial JSON
/// document (or `{}`) is a valid configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub csv: CsvOptions,
    pub xlsx: XlsxOptions,
    pub http: HttpConfig,
    /// Parent directory for per-call scratch directories. Defaults to the system temp dir.
    pub scratch_dir: Option<PathBuf>,
}

impl Config {
    /// Parse a configuration from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("[config] Failed to parse configuration JSON")
    }
}

/// CSV parsing and serialization options.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CsvOptions {
    pub separator: char,
    pub has_header: bool,
    /// Rows scanned to infer column types; `None` scans the whole file.
    pub infer_schema_length: Option<usize>,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self { separator: ',', has_header: true, infer_schema_length: Some(100) }
    }
}

impl CsvOptions {
    /// The separator as a single byte, as the CSV reader/writer expect.
    pub(crate) fn separator_byte(&self) -> Result<u8> {
        u8::try_from(self.separator)
            .ok()
            .filter(u8::is_ascii)
            .with_context(|| format!("[config] CSV separator must be ASCII, got {:?}", self.separator))
    }
}

/// Spreadsheet options.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct XlsxOptions {
    /// Worksheet to read; the first sheet when unset.
    pub sheet: Option<String>,
}

/// HTTP session options.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub user_agent: String,
    pub timeout_secs: u64,
    pub max_redirects: usize,
    /// Explicit proxy for all requests.
    pub proxy: Option<String>,
    /// Honour `HTTP_PROXY`/`HTTPS_PROXY`/`NO_PROXY` from the environment.
    pub use_env_proxies: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("blobframe/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 120,
            max_redirects: 10,
            proxy: None,
            use_env_proxies: true,
        }
    }
}
