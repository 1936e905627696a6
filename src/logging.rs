#![cfg(feature = "std")]

//! Diagnostics for the `broadside` and `sim` binaries.
//!
//! Game output goes to stdout (boards, prompts, `sim`'s JSON), so log lines
//! are written to stderr as `LEVEL - message`. The level comes from
//! [`LOG_ENV`].

use std::env;

use log::{LevelFilter, Log, Metadata, Record};

/// Name of the environment variable holding the log level.
pub const LOG_ENV: &str = "BROADSIDE_LOG";

struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("{} - {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

/// Install the stderr logger at the level named by `BROADSIDE_LOG`, or
/// `info` when it is unset or not a level name.
pub fn init_logging() {
    init_logging_with(LevelFilter::Info);
}

/// Like [`init_logging`], falling back to `default`. Only the first call in
/// a process installs the logger.
pub fn init_logging_with(default: LevelFilter) {
    let requested = env::var(LOG_ENV).ok();
    let level = requested
        .as_deref()
        .and_then(|name| name.parse().ok())
        .unwrap_or(default);
    if log::set_logger(&LOGGER).is_err() {
        return;
    }
    log::set_max_level(level);
    if let Some(name) = requested.filter(|name| name.parse::<LevelFilter>().is_err()) {
        log::warn!("ignoring {}={:?}, using {}", LOG_ENV, name, level);
    }
}
