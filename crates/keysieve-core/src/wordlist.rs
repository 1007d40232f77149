//! Wordlist loading: one candidate passphrase per line, in file order.

use crate::config::WordlistCfg;
use crate::error::{KeysieveError, KeysieveResult};
use log::{debug, info, warn};
use std::fs;
use std::path::Path;
use zeroize::Zeroizing;

/// Read `path` into an ordered candidate list.
pub fn read_wordlist(path: &Path, cfg: &WordlistCfg) -> KeysieveResult<Vec<String>> {
    let raw = Zeroizing::new(fs::read(path).map_err(|err| KeysieveError::Wordlist {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })?);
    let candidates = parse_wordlist(&raw, cfg);
    debug!(
        "loaded {} candidates from {}",
        candidates.len(),
        path.display()
    );
    Ok(candidates)
}

/// Split raw bytes into candidates. Lines that are not valid UTF-8 are
/// skipped with a warning; duplicates are kept.
pub fn parse_wordlist(raw: &[u8], cfg: &WordlistCfg) -> Vec<String> {
    let mut candidates = Vec::new();
    if raw.is_empty() {
        return candidates;
    }
    let mut skipped = 0usize;
    let mut blank = 0usize;

    for (lineno, line) in raw.split(|b| *b == b'\n').enumerate() {
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        let Ok(text) = std::str::from_utf8(line) else {
            skipped += 1;
            debug!("skipping non UTF-8 line {}", lineno + 1);
            continue;
        };
        let text = if cfg.trim_lines { text.trim() } else { text };
        if text.is_empty() && cfg.skip_blank_lines {
            blank += 1;
            continue;
        }
        candidates.push(text.to_string());
    }

    // `split` yields a trailing empty slice after the final newline.
    if !cfg.skip_blank_lines && raw.ends_with(b"\n") {
        candidates.pop();
    }

    // The empty slice after a final newline is not a blank line.
    if cfg.skip_blank_lines && raw.ends_with(b"\n") {
        blank -= 1;
    }
    if blank > 0 {
        info!("skipped {blank} blank wordlist line(s); the empty passphrase is not tried");
    }
    if skipped > 0 {
        warn!("skipped {skipped} wordlist line(s) that are not valid UTF-8");
    }
    candidates
}
