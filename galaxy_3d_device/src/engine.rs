/// Process-wide services shared by every graphics device
///
/// Devices are created per surface and owned by the application; the only
/// global state is the log sink the `engine_*!` macros write to.

use std::sync::{OnceLock, RwLock};
use std::time::SystemTime;
use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};

static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

fn sink() -> &'static RwLock<Box<dyn Logger>> {
    LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger::new())))
}

fn install(logger: Box<dyn Logger>) {
    if let Ok(mut slot) = sink().write() {
        *slot = logger;
    }
}

fn emit(entry: LogEntry) {
    if let Ok(logger) = sink().read() {
        logger.log(&entry);
    }
}

pub struct Engine;

impl Engine {
    /// Route every device log entry to `logger_impl`
    ///
    /// # Example
    ///
    /// ```no_run
    /// use galaxy_3d_device::galaxy3d::{Engine, log::{DefaultLogger, LogSeverity}};
    ///
    /// // Keep lifecycle messages, drop per-frame debug output
    /// Engine::set_logger(DefaultLogger::with_min_severity(LogSeverity::Info));
    /// ```
    pub fn set_logger<L: Logger + 'static>(logger_impl: L) {
        install(Box::new(logger_impl));
    }

    /// Go back to an unfiltered console `DefaultLogger`
    pub fn reset_logger() {
        install(Box::new(DefaultLogger::new()));
    }

    /// Entry point of engine_trace!, engine_debug!, engine_info! and engine_warn!
    pub fn log(severity: LogSeverity, source: &str, message: String) {
        emit(LogEntry {
            severity,
            timestamp: SystemTime::now(),
            source: source.to_string(),
            message,
            file: None,
            line: None,
        });
    }

    /// Entry point of engine_error!, engine_err! and engine_bail!, which add the call site
    pub fn log_detailed(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: &'static str,
        line: u32,
    ) {
        emit(LogEntry {
            severity,
            timestamp: SystemTime::now(),
            source: source.to_string(),
            message,
            file: Some(file),
            line: Some(line),
        });
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
