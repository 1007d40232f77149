use std::path::PathBuf;
use thiserror::Error;

/// Result alias for core operations.
pub type KeysieveResult<T> = Result<T, KeysieveError>;

#[derive(Error, Debug)]
pub enum KeysieveError {
    #[error("[KS1000] io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("[KS1001] toml config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("[KS1002] yaml config parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("[KS1100] configuration error: {0}")]
    InvalidConfig(String),

    #[error("[KS1200] failed to load key material from {path}: {reason}")]
    KeyLoad { path: PathBuf, reason: String },

    #[error("[KS1300] failed to read wordlist {path}: {reason}")]
    Wordlist { path: PathBuf, reason: String },

    #[error("[KS2000] unlock fault on key `{key}`: {reason}")]
    UnlockFault { key: String, reason: String },

    #[error("[KS3000] worker task failed: {0}")]
    Worker(String),
}

impl KeysieveError {
    pub fn code(&self) -> &'static str {
        match self {
            KeysieveError::Io(_) => "KS1000",
            KeysieveError::Toml(_) => "KS1001",
            KeysieveError::Yaml(_) => "KS1002",
            KeysieveError::InvalidConfig(_) => "KS1100",
            KeysieveError::KeyLoad { .. } => "KS1200",
            KeysieveError::Wordlist { .. } => "KS1300",
            KeysieveError::UnlockFault { .. } => "KS2000",
            KeysieveError::Worker(_) => "KS3000",
        }
    }
}
