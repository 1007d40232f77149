//! The unlock capability and the key handles it operates on.

use std::fmt;
use std::slice;

/// Result of probing one key with one passphrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnlockAttempt {
    /// The passphrase decrypted the key material.
    Unlocked,
    /// Ordinary wrong passphrase.
    Rejected,
    /// The key could not be tried at all (corrupt material, unsupported
    /// algorithm). Aborts the whole search.
    Fault(String),
}

/// Abstraction over a key format's passphrase check.
///
/// Implementations must be safe to call concurrently against the same key:
/// probing never mutates the loaded material, so every worker shares one
/// `KeySet` by reference.
pub trait KeyUnlocker: Send + Sync + 'static {
    /// Loaded, immutable key material.
    type Key: Send + Sync + 'static;

    /// Try `passphrase` against `key`.
    fn unlock(&self, key: &Self::Key, passphrase: &str) -> UnlockAttempt;
}

/// One loaded key plus a human-readable label used in logs and errors.
pub struct KeyHandle<K> {
    label: String,
    material: K,
}

impl<K> KeyHandle<K> {
    pub fn new(label: impl Into<String>, material: K) -> Self {
        Self {
            label: label.into(),
            material,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn material(&self) -> &K {
        &self.material
    }
}

impl<K> fmt::Debug for KeyHandle<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyHandle")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// Ordered keys that must all unlock under the same passphrase.
///
/// Order is fixed once built; the first handle is always tried first.
#[derive(Debug)]
pub struct KeySet<K> {
    handles: Vec<KeyHandle<K>>,
}

impl<K> KeySet<K> {
    pub fn new(handles: Vec<KeyHandle<K>>) -> Self {
        Self { handles }
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, KeyHandle<K>> {
        self.handles.iter()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.handles.iter().map(KeyHandle::label).collect()
    }
}

impl<K> FromIterator<KeyHandle<K>> for KeySet<K> {
    fn from_iter<I: IntoIterator<Item = KeyHandle<K>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a, K> IntoIterator for &'a KeySet<K> {
    type Item = &'a KeyHandle<K>;
    type IntoIter = slice::Iter<'a, KeyHandle<K>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
