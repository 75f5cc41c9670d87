//! Minimal stderr logger for the CLI.
//!
//! The library reports data-quality signals (verse-set mismatches, skipped
//! books) through the `log` facade; the binary routes them to stderr so the
//! JSON artifacts on stdout/disk stay clean. Level comes from the
//! `VERSEDIFF_LOG` environment variable when set (`error`, `warn`, `info`,
//! `debug`, `trace`, `off`), otherwise from the default the caller passes.

use log::{LevelFilter, Metadata, Record};

struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

/// Install the stderr logger. Safe to call once at startup; a second call is
/// a no-op because the facade rejects re-registration.
pub fn init(default_level: LevelFilter) {
    let level = std::env::var("VERSEDIFF_LOG")
        .ok()
        .and_then(|v| v.parse::<LevelFilter>().ok())
        .unwrap_or(default_level);

    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}
