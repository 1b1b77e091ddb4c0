//! Logger setup.
//!
//! Verbosity is configured as a syslog priority and mapped onto `log`
//! levels. `RUST_LOG`, when set, wins over the configured level.

use log::LevelFilter;
use std::fs::OpenOptions;
use std::io;

use crate::config::Config;
use crate::Result;

/// Map a syslog priority (0 = emerg .. 7 = debug) to a level filter.
pub fn level_filter(priority: u8) -> LevelFilter {
    match priority {
        0..=3 => LevelFilter::Error,
        4 => LevelFilter::Warn,
        5 | 6 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    }
}

/// Build an `env_logger` for the given config.
///
/// Logs go to stderr, or are appended to `log_file` when one is set. If the
/// log file cannot be opened the builder keeps logging to stderr and the
/// open error is handed back for reporting.
pub fn builder(config: &Config) -> (env_logger::Builder, Option<io::Error>) {
    let level = level_filter(config.log_level);
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level.as_str()));

    let mut open_error = None;
    if let Some(path) = &config.log_file {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            Err(e) => open_error = Some(e),
        }
    }

    (builder, open_error)
}

/// Install the global logger.
pub fn init(config: &Config) -> Result<()> {
    let (mut builder, open_error) = builder(config);
    builder.try_init()?;

    if let (Some(path), Some(e)) = (&config.log_file, open_error) {
        log::warn!("Unable to log to {:?} ({}), redirecting to stderr", path, e);
    }
    Ok(())
}
