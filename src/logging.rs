//! Logger bootstrap for the CLI.
//!
//! Diagnostics go to stderr so stdout stays reserved for command output.
//! `RUST_LOG` overrides the level picked from `--verbose`.

use anyhow::{Context, Result};
use flexi_logger::{Logger, LoggerHandle};

pub fn init(verbose: bool) -> Result<LoggerHandle> {
    let level = if verbose { "debug" } else { "warn" };

    Logger::try_with_env_or_str(level)
        .with_context(|| format!("invalid log level `{level}`"))?
        .log_to_stderr()
        .format(flexi_logger::default_format)
        .start()
        .context("failed to start logger")
}
