//! Optional state-machine tracing using `tracing` + `tracing-subscriber`.
//!
//! Off unless `SETSID_LOG` names a level ("error", "warn", "info", "debug",
//! "trace"). Output goes to stderr. The variable only controls verbosity and
//! is handed to the target command untouched. An unrecognised value leaves
//! logging off and prints nothing.

use anyhow::{anyhow, Result};
use tracing_subscriber::fmt;

pub const LOG_ENV: &str = "SETSID_LOG";

/// Install the global subscriber if `SETSID_LOG` asks for one.
///
/// Call once at startup, before any fork.
pub fn init_logging() -> Result<()> {
    let Some(raw) = std::env::var_os(LOG_ENV) else {
        return Ok(());
    };
    let Some(level) = parse_level_str(&raw.to_string_lossy()) else {
        return Ok(());
    };

    fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("could not install log subscriber: {e}"))
}

fn parse_level_str(s: &str) -> Option<tracing::Level> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(tracing::Level::ERROR),
        "warn" | "warning" => Some(tracing::Level::WARN),
        "info" => Some(tracing::Level::INFO),
        "debug" => Some(tracing::Level::DEBUG),
        "trace" => Some(tracing::Level::TRACE),
        _ => None,
    }
}
