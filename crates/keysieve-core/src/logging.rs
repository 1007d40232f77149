//! Logger bootstrap for the keysieve binaries.
//!
//! Output goes to stderr so it never interleaves with the progress bar or the
//! final report on stdout.

use env_logger::{Builder, Env, Target};
use serde_json::json;
use std::env;
use std::io::Write;
use std::sync::OnceLock;

static INIT: OnceLock<()> = OnceLock::new();

const FORMAT_ENV: &str = "KEYSIEVE_LOG_FORMAT";
const LEVEL_ENV: &str = "KEYSIEVE_LOG_LEVEL";

/// Line format selected through `KEYSIEVE_LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Plain,
}

impl LogFormat {
    /// Anything other than `plain` keeps the JSON default.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("plain") {
            LogFormat::Plain
        } else {
            LogFormat::Json
        }
    }
}

/// Install the global logger. Only the first call has any effect.
///
/// `RUST_LOG` wins when set; otherwise `KEYSIEVE_LOG_LEVEL`, then
/// `default_level`.
pub fn init(default_level: &str) {
    let _ = INIT.get_or_init(|| configure(default_level));
}

fn configure(default_level: &str) {
    let level = env::var(LEVEL_ENV).unwrap_or_else(|_| default_level.to_string());
    let format = env::var(FORMAT_ENV)
        .map(|value| LogFormat::parse(&value))
        .unwrap_or(LogFormat::Json);

    let mut builder = Builder::from_env(Env::default().default_filter_or(level));
    builder.target(Target::Stderr);
    match format {
        LogFormat::Json => {
            builder.format(|buf, record| {
                let payload = json!({
                    "timestamp": buf.timestamp().to_string(),
                    "level": record.level().to_string().to_lowercase(),
                    "target": record.target(),
                    "message": record.args().to_string(),
                });
                writeln!(buf, "{payload}")
            });
        }
        LogFormat::Plain => {
            builder.format(|buf, record| {
                writeln!(
                    buf,
                    "{} {:<5} {} - {}",
                    buf.timestamp(),
                    record.level(),
                    record.target(),
                    record.args()
                )
            });
        }
    }

    if let Err(err) = builder.try_init() {
        eprintln!("failed to initialize logger: {err}");
    }
}
