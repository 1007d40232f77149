//! Shared bookkeeping for a single search run.
//!
//! Workers only ever touch the search through this type: an atomic attempt
//! counter, a cancellation flag, and write-once slots for the winner and for
//! the first unlock fault. A `SearchState` belongs to one run and is never
//! reused.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::OnceLock;

/// Why dispatch stopped before the candidate source ran dry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Found,
    Interrupted,
    Deadline,
    Fault,
    /// A worker panicked or its task was lost.
    WorkerFailed,
}

/// The candidate that unlocked every key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Winner {
    /// Position of the candidate in the source list.
    pub index: usize,
    pub passphrase: String,
}

/// First fault reported by the unlock capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnlockFault {
    pub key: String,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct SearchState {
    attempted: AtomicU64,
    dispatched: AtomicU64,
    cancelled: AtomicBool,
    reason: OnceLock<StopReason>,
    winner: OnceLock<Winner>,
    fault: OnceLock<UnlockFault>,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Completed unlock attempts, successful or not.
    pub fn attempted(&self) -> u64 {
        self.attempted.load(Ordering::Acquire)
    }

    /// Candidates handed to a worker so far.
    pub fn dispatched(&self) -> u64 {
        self.dispatched.load(Ordering::Acquire)
    }

    pub(crate) fn record_dispatch(&self) {
        self.dispatched.fetch_add(1, Ordering::AcqRel);
    }

    pub(crate) fn record_attempt(&self) {
        self.attempted.fetch_add(1, Ordering::AcqRel);
    }

    /// Store the winner unless one is already recorded. Returns `true` for
    /// the call that won the slot; that call also raises cancellation.
    pub fn offer_winner(&self, index: usize, passphrase: String) -> bool {
        let won = self.winner.set(Winner { index, passphrase }).is_ok();
        if won {
            self.cancel(StopReason::Found);
        }
        won
    }

    pub fn winner(&self) -> Option<&Winner> {
        self.winner.get()
    }

    /// Record an unlock fault (first one wins) and stop dispatch.
    pub fn record_fault(&self, key: String, reason: String) -> bool {
        let first = self.fault.set(UnlockFault { key, reason }).is_ok();
        if first {
            self.cancel(StopReason::Fault);
        }
        first
    }

    pub fn fault(&self) -> Option<&UnlockFault> {
        self.fault.get()
    }

    /// Ask the dispatch loop to stop. In-flight attempts still finish.
    ///
    /// Returns `true` if this call was the one that cancelled the search;
    /// the first reason sticks.
    pub fn cancel(&self, reason: StopReason) -> bool {
        let _ = self.reason.set(reason);
        !self.cancelled.swap(true, Ordering::AcqRel)
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    pub fn stop_reason(&self) -> Option<StopReason> {
        self.reason.get().copied()
    }
}
