//! Raw key file reading shared by the key-format crates.

use crate::error::{KeysieveError, KeysieveResult};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use zeroize::Zeroizing;

/// Bytes of one key file plus its SHA-256 fingerprint for log lines.
pub struct KeyFile {
    pub path: PathBuf,
    pub contents: Zeroizing<Vec<u8>>,
    pub sha256: String,
}

impl KeyFile {
    /// Short label: file name plus the first 8 hex digits of the digest.
    pub fn label(&self) -> String {
        let name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string());
        format!("{name} ({})", &self.sha256[..8])
    }

    /// Key files are armored text; anything else is rejected at load time.
    pub fn as_text(&self) -> KeysieveResult<&str> {
        std::str::from_utf8(&self.contents)
            .map_err(|_| key_load_error(&self.path, "key file is not valid UTF-8 text"))
    }
}

/// Read a key file, rejecting empty input.
pub fn read_key_file(path: &Path) -> KeysieveResult<KeyFile> {
    let contents = Zeroizing::new(
        fs::read(path).map_err(|err| key_load_error(path, format!("read failed: {err}")))?,
    );
    if contents.iter().all(u8::is_ascii_whitespace) {
        return Err(key_load_error(path, "file is empty"));
    }

    let sha256 = hex::encode(Sha256::digest(contents.as_slice()));
    Ok(KeyFile {
        path: path.to_path_buf(),
        contents,
        sha256,
    })
}

pub fn key_load_error(path: &Path, reason: impl Into<String>) -> KeysieveError {
    KeysieveError::KeyLoad {
        path: PathBuf::from(path),
        reason: reason.into(),
    }
}
