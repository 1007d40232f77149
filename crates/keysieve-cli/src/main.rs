//! keysieve command-line interface: recover the passphrase shared by one or
//! more OpenPGP secret keys from a wordlist.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use keysieve_core::{
    logging, wordlist, CandidateSource, Outcome, SearchConfig, SearchCoordinator, SearchOptions,
    SearchReport, SearchState, StopReason,
};
use keysieve_pgp::{load_key_set, PgpKeyUnlocker};
use log::{info, warn};
use schemars::schema_for;
use serde_json::to_string_pretty;
use std::path::{Path, PathBuf};
use std::sync::Arc;

mod progress;

use progress::BarReporter;

/// Top-level command-line options.
#[derive(Parser, Debug)]
#[command(
    name = "keysieve",
    version,
    about = "Recover the passphrase of OpenPGP secret keys from a wordlist."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Try every wordlist entry until one unlocks all given keys.
    Crack {
        /// Wordlist file, one candidate passphrase per line.
        #[arg(short = 'w', long = "words")]
        wordlist: PathBuf,

        /// Number of concurrent unlock attempts (overrides the config file).
        #[arg(short = 'c', long)]
        concurrency: Option<usize>,

        /// Optional TOML or YAML config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Give up after this many seconds (overrides the config file).
        #[arg(long)]
        timeout: Option<u64>,

        /// Hide the progress bar.
        #[arg(long)]
        no_progress: bool,

        /// Armored secret key files; all must share the passphrase.
        #[arg(required = true)]
        keys: Vec<PathBuf>,
    },

    /// Validate a configuration file or emit the config schema.
    Validate {
        /// Path to the configuration file to validate.
        #[arg(short = 'f', long)]
        file: Option<PathBuf>,

        /// Output the JSON schema instead of validating a file.
        #[arg(long)]
        schema: bool,
    },
}

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    match run().await {
        Ok(true) => {}
        Ok(false) => std::process::exit(2),
        Err(err) => {
            eprintln!("error: {err:#}");
            std::process::exit(1);
        }
    }
}

/// Returns whether the command succeeded in its goal (a passphrase was found
/// or the config is valid).
async fn run() -> Result<bool> {
    logging::init("warn");
    let cli = Cli::parse();

    match cli.command {
        Commands::Crack {
            wordlist,
            concurrency,
            config,
            timeout,
            no_progress,
            keys,
        } => {
            let mut cfg = match &config {
                Some(path) => SearchConfig::load(path).with_context(|| {
                    format!("failed to load configuration from {}", path.display())
                })?,
                None => SearchConfig::default(),
            };
            if let Some(concurrency) = concurrency {
                cfg.concurrency = concurrency;
            }
            if timeout.is_some() {
                cfg.timeout_secs = timeout;
            }
            crack(&cfg, &wordlist, &keys, !no_progress).await
        }
        Commands::Validate { file, schema } => {
            if schema {
                let schema = schema_for!(SearchConfig);
                println!("{}", to_string_pretty(&schema)?);
                return Ok(true);
            }

            let Some(file) = file else {
                anyhow::bail!("pass --file <path> or --schema");
            };
            let cfg = SearchConfig::load(&file).with_context(|| {
                format!("failed to load configuration from {}", file.display())
            })?;
            println!(
                "Configuration valid (concurrency {}, timeout {}).",
                cfg.concurrency,
                cfg.timeout_secs
                    .map(|secs| format!("{secs}s"))
                    .unwrap_or_else(|| "none".to_string())
            );
            Ok(true)
        }
    }
}

async fn crack(
    cfg: &SearchConfig,
    wordlist_path: &Path,
    key_paths: &[PathBuf],
    show_progress: bool,
) -> Result<bool> {
    let keys = load_key_set(key_paths).context("failed to load secret keys")?;
    let candidates = wordlist::read_wordlist(wordlist_path, &cfg.wordlist)
        .context("failed to read wordlist")?;
    let total = candidates.len() as u64;

    let reporter = Arc::new(BarReporter::new(total, show_progress));
    let coordinator = SearchCoordinator::new(PgpKeyUnlocker, keys, SearchOptions::from(cfg))
        .context("invalid search request")?
        .with_reporter(reporter);
    info!(
        "trying {total} candidates against {} key(s)",
        coordinator.key_count()
    );

    let state = Arc::new(SearchState::new());
    let interrupt = tokio::spawn(watch_interrupt(Arc::clone(&state)));

    let report = coordinator
        .search_with_state(CandidateSource::new(candidates), state)
        .await;
    interrupt.abort();

    let report = report?;
    print_report(&report);
    Ok(report.outcome.is_found())
}

/// Cancel the search on ctrl-c or SIGTERM. In-flight attempts still finish.
async fn watch_interrupt(state: Arc<SearchState>) {
    wait_for_signal().await;
    if state.cancel(StopReason::Interrupted) {
        warn!("interrupt received; waiting for in-flight attempts");
        eprintln!("Exiting...");
    }
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut term) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = term.recv() => {}
            }
        }
        Err(err) => {
            warn!("cannot listen for SIGTERM: {err}");
            let _ = tokio::signal::ctrl_c().await;
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn print_report(report: &SearchReport) {
    match &report.outcome {
        Outcome::Found(passphrase) => println!("Found password: {passphrase}"),
        Outcome::NotFound { interrupted: true } => println!("Password not found (interrupted)"),
        Outcome::NotFound { interrupted: false } => println!("Password not found"),
    }
    println!(
        "Attempted {}/{} candidates in {:.2?} ({:.1}/s)",
        report.attempted,
        report.total,
        report.elapsed,
        report.rate()
    );
    info!("stop reason: {:?}", report.stop_reason);
}
