//! CLI configuration file.
//!
//! A TOML file with every field optional; anything missing falls back to
//! the SDK defaults. Command-line flags and environment variables are
//! applied on top by `main`.
//!
//! ```toml
//! node_url = "http://127.0.0.1:30001"
//! chain_id = 1024
//! key_dir = "/home/me/.iwallet"
//!
//! [poll]
//! interval_ms = 1000
//! max_retries = 90
//! wait_irreversible = false
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use iost_sdk::client::PollConfig;
use iost_sdk::config::{
    DEFAULT_CHAIN_ID, DEFAULT_EXPIRATION_SECS, DEFAULT_GAS_LIMIT, DEFAULT_GAS_RATIO,
    DEFAULT_MAX_POLL_RETRIES, DEFAULT_NODE_URL, DEFAULT_POLL_INTERVAL,
};

/// Key directory name under the user's home.
const KEY_DIR_NAME: &str = ".iwallet";

/// Gas ratio bounds accepted by the node.
const GAS_RATIO_RANGE: std::ops::RangeInclusive<f64> = 1.0..=100.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub node_url: String,
    pub chain_id: u32,
    pub key_dir: PathBuf,
    pub gas_ratio: f64,
    pub gas_limit: f64,
    pub expiration_secs: i64,
    pub poll: PollSection,
}

/// `[poll]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollSection {
    pub interval_ms: u64,
    pub max_retries: u32,
    pub wait_irreversible: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            node_url: DEFAULT_NODE_URL.to_string(),
            chain_id: DEFAULT_CHAIN_ID,
            key_dir: default_key_dir(),
            gas_ratio: DEFAULT_GAS_RATIO,
            gas_limit: DEFAULT_GAS_LIMIT,
            expiration_secs: DEFAULT_EXPIRATION_SECS,
            poll: PollSection::default(),
        }
    }
}

impl Default for PollSection {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_POLL_INTERVAL.as_millis() as u64,
            max_retries: DEFAULT_MAX_POLL_RETRIES,
            wait_irreversible: false,
        }
    }
}

impl CliConfig {
    /// Loads and validates a config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config: CliConfig = toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path` when given, otherwise the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.node_url.starts_with("http://") || self.node_url.starts_with("https://")) {
            bail!("node_url must be an http(s) URL, got {:?}", self.node_url);
        }
        if !GAS_RATIO_RANGE.contains(&self.gas_ratio) {
            bail!(
                "gas_ratio must be between {} and {}, got {}",
                GAS_RATIO_RANGE.start(),
                GAS_RATIO_RANGE.end(),
                self.gas_ratio
            );
        }
        if !(self.gas_limit.is_finite() && self.gas_limit > 0.0) {
            bail!("gas_limit must be positive, got {}", self.gas_limit);
        }
        if self.expiration_secs <= 0 {
            bail!("expiration_secs must be positive, got {}", self.expiration_secs);
        }
        if self.poll.interval_ms == 0 {
            bail!("poll.interval_ms must be positive");
        }
        if self.poll.max_retries == 0 {
            bail!("poll.max_retries must be positive");
        }
        Ok(())
    }

    pub fn poll_config(&self) -> PollConfig {
        PollConfig {
            interval: Duration::from_millis(self.poll.interval_ms),
            max_retries: self.poll.max_retries,
            wait_irreversible: self.poll.wait_irreversible,
        }
    }
}

fn default_key_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(KEY_DIR_NAME)
}
