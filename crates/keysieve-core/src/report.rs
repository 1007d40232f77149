//! Search results and the progress reporting seam.

use crate::state::{SearchState, StopReason};
use log::{debug, info};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

/// Final answer of a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Found(String),
    /// No candidate unlocked every key. `interrupted` is set when the search
    /// was stopped early by an operator interrupt or a deadline.
    NotFound { interrupted: bool },
}

impl Outcome {
    pub fn is_found(&self) -> bool {
        matches!(self, Outcome::Found(_))
    }

    pub fn passphrase(&self) -> Option<&str> {
        match self {
            Outcome::Found(passphrase) => Some(passphrase),
            Outcome::NotFound { .. } => None,
        }
    }
}

/// Outcome plus the accounting gathered while producing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchReport {
    pub outcome: Outcome,
    /// Position of the winning candidate in the source list.
    pub winner_index: Option<usize>,
    pub attempted: u64,
    pub total: u64,
    pub elapsed: Duration,
    pub stop_reason: Option<StopReason>,
}

impl SearchReport {
    pub fn interrupted(&self) -> bool {
        matches!(
            self.stop_reason,
            Some(StopReason::Interrupted) | Some(StopReason::Deadline)
        )
    }

    /// Attempts per second over the whole run.
    pub fn rate(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.attempted as f64 / secs
        } else {
            0.0
        }
    }
}

/// Receives progress samples and the final report for display.
///
/// Reporters never influence the search: they are fed from a separate
/// polling task, so a slow or missing reporter only delays its own updates.
pub trait Reporter: Send + Sync {
    fn progress(&self, attempted: u64, total: u64);

    fn finish(&self, _report: &SearchReport) {}
}

/// Reporter that writes through the `log` facade.
#[derive(Debug, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn progress(&self, attempted: u64, total: u64) {
        debug!("attempted {attempted}/{total} candidates");
    }

    fn finish(&self, report: &SearchReport) {
        match &report.outcome {
            Outcome::Found(_) => info!(
                "passphrase found after {} attempts in {:?}",
                report.attempted, report.elapsed
            ),
            Outcome::NotFound { interrupted } => info!(
                "passphrase not found after {} of {} attempts in {:?} (interrupted: {})",
                report.attempted, report.total, report.elapsed, interrupted
            ),
        }
    }
}

/// Sample the attempted-count every `period` and forward it to `reporter`.
/// The returned task runs until aborted.
pub(crate) fn spawn_progress(
    state: Arc<SearchState>,
    total: u64,
    reporter: Arc<dyn Reporter>,
    period: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            reporter.progress(state.attempted(), total);
        }
    })
}
