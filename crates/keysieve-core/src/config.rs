use crate::error::{KeysieveError, KeysieveResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Worker count used when neither the config file nor the CLI sets one.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Tunables for one passphrase search.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SearchConfig {
    /// Maximum number of unlock attempts in flight at once.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// How often the progress reporter samples the attempted-count.
    #[serde(default = "default_progress_interval_ms")]
    pub progress_interval_ms: u64,

    /// Optional wall-clock budget; the search is cancelled once it elapses.
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    #[serde(default)]
    pub wordlist: WordlistCfg,

    #[serde(skip)]
    pub path: Option<PathBuf>,
}

/// Controls how wordlist lines become candidates.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct WordlistCfg {
    /// Drop empty lines instead of trying the empty passphrase.
    #[serde(default)]
    pub skip_blank_lines: bool,

    /// Strip surrounding whitespace. Line terminators (`\n`, `\r\n`) are
    /// always removed.
    #[serde(default)]
    pub trim_lines: bool,
}

fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}

fn default_progress_interval_ms() -> u64 {
    250
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            progress_interval_ms: default_progress_interval_ms(),
            timeout_secs: None,
            wordlist: WordlistCfg::default(),
            path: None,
        }
    }
}

impl SearchConfig {
    /// Load a config file. `.toml` files are parsed as TOML, everything else
    /// as YAML.
    pub fn load<P: AsRef<Path>>(path: P) -> KeysieveResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let is_toml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

        let mut cfg = if is_toml {
            toml::from_str::<Self>(&contents)?
        } else {
            serde_yaml::from_str::<Self>(&contents)?
        };
        cfg.path = Some(path.to_path_buf());

        let issues = cfg.validate();
        if !issues.is_empty() {
            return Err(KeysieveError::InvalidConfig(issues.join("; ")));
        }

        Ok(cfg)
    }

    /// Collect every problem with the current values instead of stopping at
    /// the first one.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if self.concurrency == 0 {
            issues.push("concurrency must be at least 1".to_string());
        }
        if self.progress_interval_ms == 0 {
            issues.push("progress_interval_ms must be greater than 0".to_string());
        }
        if self.timeout_secs == Some(0) {
            issues.push("timeout_secs must be greater than 0 when set".to_string());
        }
        issues
    }

    pub fn progress_interval(&self) -> Duration {
        Duration::from_millis(self.progress_interval_ms.max(1))
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
