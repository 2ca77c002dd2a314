//! Log backend for the binary: stderr plus an optional append-only file.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use log::{LevelFilter, Log, Metadata, Record};
use parking_lot::Mutex;

use crate::error::{Error, Result};

/// Level for the `-v` count and `-q` flag.
pub fn level_for(verbose: u8, quiet: bool) -> LevelFilter {
    match (quiet, verbose) {
        (true, _) => LevelFilter::Warn,
        (false, 0) => LevelFilter::Info,
        (false, 1) => LevelFilter::Debug,
        (false, _) => LevelFilter::Trace,
    }
}

/// Writes `LEVEL target: message` lines.
pub struct Logger {
    level: LevelFilter,
    stderr: bool,
    file: Option<Mutex<File>>,
}

impl Logger {
    pub fn new(level: LevelFilter, stderr: bool, file: Option<File>) -> Self {
        Self {
            level,
            stderr,
            file: file.map(Mutex::new),
        }
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!("{:<5} {}: {}", record.level(), record.target(), record.args());
        if self.stderr {
            eprintln!("{line}");
        }
        if let Some(file) = &self.file {
            let _ = writeln!(file.lock(), "{line}");
        }
    }

    fn flush(&self) {
        if let Some(file) = &self.file {
            let _ = file.lock().flush();
        }
    }
}

/// Install the global logger. A second call keeps the first logger.
pub fn init(level: LevelFilter, log_file: Option<&Path>) -> Result<()> {
    let file = log_file
        .map(|path| {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| Error::io(path, e))
        })
        .transpose()?;
    if log::set_boxed_logger(Box::new(Logger::new(level, true, file))).is_ok() {
        log::set_max_level(level);
    }
    Ok(())
}
