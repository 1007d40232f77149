//! Bounded-concurrency passphrase search.
//!
//! The dispatch loop pulls candidates in list order, takes one admission
//! permit per candidate and hands it to a blocking worker together with the
//! shared key set. Permits are the only thing the loop ever waits on. Once a
//! worker records a winner (or the search is cancelled) no further candidate
//! is dispatched; the loop then reclaims every permit, which means every
//! dispatched worker has finished, before the report is built.

use crate::candidate::CandidateSource;
use crate::config::SearchConfig;
use crate::error::{KeysieveError, KeysieveResult};
use crate::report::{spawn_progress, Outcome, Reporter, SearchReport};
use crate::state::{SearchState, StopReason};
use crate::unlocker::{KeySet, KeyUnlocker};
use crate::verifier::{verify, Verdict};
use log::{debug, info, warn};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinHandle, JoinSet};

/// Runtime knobs for a [`SearchCoordinator`].
#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub concurrency: usize,
    pub timeout: Option<Duration>,
    pub progress_interval: Duration,
}

impl Default for SearchOptions {
    fn default() -> Self {
        SearchOptions::from(&SearchConfig::default())
    }
}

impl From<&SearchConfig> for SearchOptions {
    fn from(cfg: &SearchConfig) -> Self {
        Self {
            concurrency: cfg.concurrency,
            timeout: cfg.timeout(),
            progress_interval: cfg.progress_interval(),
        }
    }
}

impl SearchOptions {
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Owns the key set and unlock capability for one or more searches.
pub struct SearchCoordinator<U: KeyUnlocker> {
    unlocker: Arc<U>,
    keys: Arc<KeySet<U::Key>>,
    options: SearchOptions,
    reporter: Option<Arc<dyn Reporter>>,
}

impl<U: KeyUnlocker> SearchCoordinator<U> {
    /// Validate the request up front; nothing is dispatched for an empty key
    /// set or a zero concurrency.
    pub fn new(unlocker: U, keys: KeySet<U::Key>, options: SearchOptions) -> KeysieveResult<Self> {
        if keys.is_empty() {
            return Err(KeysieveError::InvalidConfig(
                "at least one key is required".to_string(),
            ));
        }
        if options.concurrency == 0 {
            return Err(KeysieveError::InvalidConfig(
                "concurrency must be at least 1".to_string(),
            ));
        }
        if options.concurrency > Semaphore::MAX_PERMITS
            || u32::try_from(options.concurrency).is_err()
        {
            return Err(KeysieveError::InvalidConfig(format!(
                "concurrency {} is too large",
                options.concurrency
            )));
        }

        Ok(Self {
            unlocker: Arc::new(unlocker),
            keys: Arc::new(keys),
            options,
            reporter: None,
        })
    }

    /// Attach a reporter fed from a separate polling task.
    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    /// Run a search with fresh state.
    pub async fn search(&self, candidates: CandidateSource) -> KeysieveResult<SearchReport> {
        self.search_with_state(candidates, Arc::new(SearchState::new()))
            .await
    }

    /// Run a search against caller-owned state. Keep a clone of `state` to
    /// cancel from outside (operator interrupt) or to sample progress.
    pub async fn search_with_state(
        &self,
        mut candidates: CandidateSource,
        state: Arc<SearchState>,
    ) -> KeysieveResult<SearchReport> {
        let started = Instant::now();
        let total = candidates.total() as u64;
        let concurrency = self.options.concurrency;

        info!(
            "searching {total} candidates against {} key(s) with concurrency {concurrency}",
            self.keys.len()
        );

        let gate = Arc::new(Semaphore::new(concurrency));
        let mut workers = JoinSet::new();
        let mut failures = Vec::new();

        let deadline = self
            .options
            .timeout
            .map(|timeout| spawn_deadline(Arc::clone(&state), timeout));
        let progress = self.reporter.as_ref().map(|reporter| {
            spawn_progress(
                Arc::clone(&state),
                total,
                Arc::clone(reporter),
                self.options.progress_interval,
            )
        });

        while !state.is_cancelled() {
            let Some((index, candidate)) = candidates.next_indexed() else {
                break;
            };

            // The gate is never closed, so acquiring only ever waits.
            let Ok(permit) = Arc::clone(&gate).acquire_owned().await else {
                break;
            };
            if state.is_cancelled() {
                break;
            }

            state.record_dispatch();
            let unlocker = Arc::clone(&self.unlocker);
            let keys = Arc::clone(&self.keys);
            let worker_state = Arc::clone(&state);
            workers.spawn_blocking(move || {
                let _permit = permit;
                // Dropped before the permit, so a panicking attempt stops
                // dispatch before its slot is handed out again.
                let _guard = PanicGuard(&worker_state);
                attempt(&*unlocker, &keys, &worker_state, index, candidate);
            });

            while let Some(joined) = workers.try_join_next() {
                collect_failure(joined, &state, &mut failures);
            }
        }

        // Every dispatched worker holds a permit until it returns.
        let _drained = gate.acquire_many(concurrency as u32).await;
        while let Some(joined) = workers.join_next().await {
            collect_failure(joined, &state, &mut failures);
        }

        stop(deadline);
        stop(progress);

        let report = self.build_report(&state, &failures, total, started.elapsed())?;
        if let Some(reporter) = &self.reporter {
            reporter.progress(report.attempted, total);
            reporter.finish(&report);
        }
        Ok(report)
    }

    fn build_report(
        &self,
        state: &SearchState,
        failures: &[String],
        total: u64,
        elapsed: Duration,
    ) -> KeysieveResult<SearchReport> {
        let stop_reason = state.stop_reason();
        let attempted = state.attempted();

        // A winner unlocked every key, so it outranks failures seen elsewhere.
        let (outcome, winner_index) = match state.winner() {
            Some(winner) => {
                debug!("winning candidate at list index {}", winner.index);
                if !failures.is_empty() {
                    warn!("ignoring worker failures after a match: {}", failures.join("; "));
                }
                (Outcome::Found(winner.passphrase.clone()), Some(winner.index))
            }
            None => {
                if !failures.is_empty() {
                    return Err(KeysieveError::Worker(failures.join("; ")));
                }
                if let Some(fault) = state.fault() {
                    return Err(KeysieveError::UnlockFault {
                        key: fault.key.clone(),
                        reason: fault.reason.clone(),
                    });
                }
                let interrupted = matches!(
                    stop_reason,
                    Some(StopReason::Interrupted) | Some(StopReason::Deadline)
                );
                (Outcome::NotFound { interrupted }, None)
            }
        };

        info!(
            "search finished: {attempted}/{total} attempted in {elapsed:?}, found: {}",
            outcome.is_found()
        );

        Ok(SearchReport {
            outcome,
            winner_index,
            attempted,
            total,
            elapsed,
            stop_reason,
        })
    }
}

/// Body of one worker: verify, publish a win or fault, count the attempt.
fn attempt<U: KeyUnlocker>(
    unlocker: &U,
    keys: &KeySet<U::Key>,
    state: &SearchState,
    index: usize,
    candidate: String,
) {
    match verify(unlocker, keys, &candidate) {
        Verdict::Match => {
            if !state.offer_winner(index, candidate) {
                debug!("candidate {index} also matched; keeping the earlier winner");
            }
        }
        Verdict::Mismatch => {}
        Verdict::Fault { key, reason } => {
            warn!("unlock fault on key {key} at candidate {index}: {reason}");
            state.record_fault(key, reason);
        }
    }
    state.record_attempt();
}

/// Cancels dispatch if the worker holding it unwinds.
struct PanicGuard<'a>(&'a SearchState);

impl Drop for PanicGuard<'_> {
    fn drop(&mut self) {
        if thread::panicking() {
            self.0.cancel(StopReason::WorkerFailed);
        }
    }
}

fn collect_failure(
    joined: Result<(), JoinError>,
    state: &SearchState,
    failures: &mut Vec<String>,
) {
    if let Err(err) = joined {
        state.cancel(StopReason::WorkerFailed);
        failures.push(if err.is_panic() {
            "worker panicked".to_string()
        } else {
            err.to_string()
        });
    }
}

fn spawn_deadline(state: Arc<SearchState>, timeout: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(timeout).await;
        if state.cancel(StopReason::Deadline) {
            warn!("search deadline of {timeout:?} reached; draining in-flight attempts");
        }
    })
}

fn stop(task: Option<JoinHandle<()>>) {
    if let Some(task) = task {
        task.abort();
    }
}

/// One-shot search over `candidates` with default timing options.
pub async fn run_search<U: KeyUnlocker>(
    unlocker: U,
    candidates: Vec<String>,
    keys: KeySet<U::Key>,
    concurrency: usize,
) -> KeysieveResult<Outcome> {
    let options = SearchOptions::default().with_concurrency(concurrency);
    let coordinator = SearchCoordinator::new(unlocker, keys, options)?;
    let report = coordinator.search(CandidateSource::new(candidates)).await?;
    Ok(report.outcome)
}
