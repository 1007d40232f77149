//! Passphrase recovery engine: trial-unlock a set of keys against an ordered
//! candidate list with bounded concurrency, stopping at the first candidate
//! that opens every key.

pub mod candidate;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod keyfile;
pub mod logging;
pub mod report;
pub mod state;
pub mod unlocker;
pub mod verifier;
pub mod wordlist;

pub use candidate::CandidateSource;
pub use config::{SearchConfig, WordlistCfg, DEFAULT_CONCURRENCY};
pub use coordinator::{run_search, SearchCoordinator, SearchOptions};
pub use error::{KeysieveError, KeysieveResult};
pub use report::{LogReporter, Outcome, Reporter, SearchReport};
pub use state::{SearchState, StopReason, Winner};
pub use unlocker::{KeyHandle, KeySet, KeyUnlocker, UnlockAttempt};
pub use verifier::{verify, Verdict};
