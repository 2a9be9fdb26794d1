// SPDX-License-Identifier: MIT

//! Logger writing to standard error.
//!
//! Standard output carries the random bytes, so diagnostics never go
//! there.
use log::{LevelFilter, Metadata, Record};
use std::io::Write;

struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        // Nothing sensible to do if stderr is gone.
        let _ = writeln!(
            std::io::stderr().lock(),
            "kcapi-rng: {:5} {} - {}",
            record.level(),
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: StderrLogger = StderrLogger;

/// Map the number of `-v` flags to a level filter.
pub fn level_filter(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Install the logger. Calling this more than once only adjusts the
/// level.
pub fn init(verbosity: u8) {
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level_filter(verbosity));
}
