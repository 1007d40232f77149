use crate::unlocker::{KeySet, KeyUnlocker, UnlockAttempt};

/// Outcome of checking one candidate against the whole key set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Every key unlocked.
    Match,
    /// At least one key rejected the candidate.
    Mismatch,
    /// A key could not be tried; carries that key's label.
    Fault { key: String, reason: String },
}

/// Try `candidate` against every key in order, stopping at the first key
/// that does not unlock.
pub fn verify<U: KeyUnlocker>(unlocker: &U, keys: &KeySet<U::Key>, candidate: &str) -> Verdict {
    if keys.is_empty() {
        // Rejected by the coordinator before dispatch; nothing to unlock.
        return Verdict::Mismatch;
    }

    for handle in keys {
        match unlocker.unlock(handle.material(), candidate) {
            UnlockAttempt::Unlocked => continue,
            UnlockAttempt::Rejected => return Verdict::Mismatch,
            UnlockAttempt::Fault(reason) => {
                return Verdict::Fault {
                    key: handle.label().to_string(),
                    reason,
                }
            }
        }
    }

    Verdict::Match
}
