#![allow(dead_code)]

use keysieve_core::{KeyHandle, KeySet, KeyUnlocker, UnlockAttempt};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Behaviour of one mock key.
#[derive(Debug, Clone)]
pub enum MockKey {
    /// Unlocks under any of these passphrases.
    Accepts(Vec<String>),
    /// Cannot be tried at all.
    Corrupt,
    /// Panics when tried with `trigger`, unlocks under `accepts`.
    PanicsOn { trigger: String, accepts: Vec<String> },
}

/// Counters shared between a test and the unlocker it handed away.
#[derive(Debug, Default)]
pub struct Tally {
    pub calls: AtomicUsize,
    pub in_flight: AtomicUsize,
    pub peak: AtomicUsize,
    pub started: AtomicUsize,
}

impl Tally {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }
}

pub struct MockUnlocker {
    pub tally: Arc<Tally>,
    delay: Duration,
    hold: Option<Arc<AtomicBool>>,
}

impl MockUnlocker {
    pub fn new() -> (Self, Arc<Tally>) {
        Self::build(Duration::ZERO, None)
    }

    pub fn with_delay(delay: Duration) -> (Self, Arc<Tally>) {
        Self::build(delay, None)
    }

    /// Every attempt blocks until `release` flips to `true`.
    pub fn held(release: Arc<AtomicBool>) -> (Self, Arc<Tally>) {
        Self::build(Duration::ZERO, Some(release))
    }

    fn build(delay: Duration, hold: Option<Arc<AtomicBool>>) -> (Self, Arc<Tally>) {
        let tally = Arc::new(Tally::default());
        (
            Self {
                tally: Arc::clone(&tally),
                delay,
                hold,
            },
            tally,
        )
    }
}

impl KeyUnlocker for MockUnlocker {
    type Key = MockKey;

    fn unlock(&self, key: &MockKey, passphrase: &str) -> UnlockAttempt {
        let tally = &self.tally;
        tally.started.fetch_add(1, Ordering::SeqCst);
        let now = tally.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        tally.peak.fetch_max(now, Ordering::SeqCst);

        if let Some(release) = &self.hold {
            while !release.load(Ordering::SeqCst) {
                thread::sleep(Duration::from_millis(2));
            }
        }
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }

        tally.calls.fetch_add(1, Ordering::SeqCst);
        tally.in_flight.fetch_sub(1, Ordering::SeqCst);

        match key {
            MockKey::Accepts(phrases) if phrases.iter().any(|p| p == passphrase) => {
                UnlockAttempt::Unlocked
            }
            MockKey::Accepts(_) => UnlockAttempt::Rejected,
            MockKey::Corrupt => UnlockAttempt::Fault("malformed secret key packet".into()),
            MockKey::PanicsOn { trigger, .. } if trigger == passphrase => {
                panic!("mock unlocker exploded")
            }
            MockKey::PanicsOn { accepts, .. } if accepts.iter().any(|p| p == passphrase) => {
                UnlockAttempt::Unlocked
            }
            MockKey::PanicsOn { .. } => UnlockAttempt::Rejected,
        }
    }
}

pub fn accepts(phrases: &[&str]) -> MockKey {
    MockKey::Accepts(phrases.iter().map(|p| p.to_string()).collect())
}

pub fn panics_on(trigger: &str, accepts: &[&str]) -> MockKey {
    MockKey::PanicsOn {
        trigger: trigger.to_string(),
        accepts: accepts.iter().map(|p| p.to_string()).collect(),
    }
}

pub fn key_set(keys: Vec<MockKey>) -> KeySet<MockKey> {
    keys.into_iter()
        .enumerate()
        .map(|(idx, key)| KeyHandle::new(format!("K{}", idx + 1), key))
        .collect()
}

pub fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}
