//! Log sink of the device layer
//!
//! Every message has a severity and a source such as `galaxy3d::Device`.
//! Errors also carry the file and line they were raised from.
//!
//! Messages are emitted with the `engine_*!` macros, which route through
//! [`Engine::log`](crate::galaxy3d::Engine::log). The sink is a [`DefaultLogger`]
//! until [`Engine::set_logger`](crate::galaxy3d::Engine::set_logger) installs another.

use colored::*;
use std::time::SystemTime;
use chrono::{DateTime, Local};

/// Destination of device log entries
///
/// Implementations must be thread-safe: the sink is global and any device may
/// log from any thread.
///
/// ```no_run
/// use galaxy_3d_device::galaxy3d::log::{Logger, LogEntry, LogSeverity};
///
/// /// Forwards device errors to a crash reporter
/// struct CrashReporter;
///
/// impl Logger for CrashReporter {
///     fn log(&self, entry: &LogEntry) {
///         if entry.severity == LogSeverity::Error {
///             // report entry.source / entry.message ...
///         }
///     }
/// }
/// ```
pub trait Logger: Send + Sync {
    fn log(&self, entry: &LogEntry);
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub severity: LogSeverity,
    pub timestamp: SystemTime,
    /// Emitting component, e.g. `galaxy3d::Device` or `galaxy3d::AttributeValidator`
    pub source: String,
    pub message: String,
    /// Call site, set by `engine_error!` / `engine_err!` / `engine_bail!`
    pub file: Option<&'static str>,
    pub line: Option<u32>,
}

/// Ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogSeverity {
    /// Per-draw and per-resource detail
    Trace,
    /// Texture traces, back buffer changes
    Debug,
    /// Device creation, destruction and restore
    Info,
    /// Context loss, unbalanced frames and markers
    Warn,
    /// Invalid arguments, attribute mismatches
    Error,
}

/// Console logger installed until `Engine::set_logger` replaces it
///
/// Entries below `min_severity` are dropped. Warnings and errors go to
/// stderr, everything else to stdout. See [`format_entry`] for the layout.
#[derive(Debug, Clone, Copy)]
pub struct DefaultLogger {
    min_severity: LogSeverity,
}

impl DefaultLogger {
    /// Log everything
    pub const fn new() -> Self {
        Self { min_severity: LogSeverity::Trace }
    }

    /// Drop entries less severe than `min_severity`
    ///
    /// Per-draw tracing is noisy; `with_min_severity(LogSeverity::Info)` keeps
    /// device lifecycle messages only.
    pub const fn with_min_severity(min_severity: LogSeverity) -> Self {
        Self { min_severity }
    }

    pub fn min_severity(&self) -> LogSeverity {
        self.min_severity
    }

    pub fn accepts(&self, severity: LogSeverity) -> bool {
        severity >= self.min_severity
    }
}

impl Default for DefaultLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger for DefaultLogger {
    fn log(&self, entry: &LogEntry) {
        if !self.accepts(entry.severity) {
            return;
        }
        let line = format_entry(entry);
        if entry.severity >= LogSeverity::Warn {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }
}

/// Console line for `entry`
///
/// `[timestamp] [SEVERITY] [source] message`, followed by ` (file:line)` when
/// the entry carries a location.
pub fn format_entry(entry: &LogEntry) -> String {
    let datetime: DateTime<Local> = entry.timestamp.into();
    let timestamp = datetime.format("%H:%M:%S%.3f");

    let severity = match entry.severity {
        LogSeverity::Trace => "TRACE".bright_black(),
        LogSeverity::Debug => "DEBUG".cyan(),
        LogSeverity::Info => "INFO ".green(),
        LogSeverity::Warn => "WARN ".yellow(),
        LogSeverity::Error => "ERROR".red().bold(),
    };

    let mut line = format!("[{}] [{}] [{}] {}", timestamp, severity, entry.source.bright_blue(), entry.message);
    if let (Some(file), Some(line_number)) = (entry.file, entry.line) {
        line.push_str(&format!(" ({}:{})", file, line_number));
    }
    line
}

// ===== LOGGING MACROS =====

/// Shared body of the location-less macros
#[doc(hidden)]
#[macro_export]
macro_rules! __engine_log {
    ($severity:ident, $source:expr, $($arg:tt)*) => {
        $crate::galaxy3d::Engine::log(
            $crate::galaxy3d::log::LogSeverity::$severity,
            $source,
            format!($($arg)*),
        )
    };
}

/// ```ignore
/// engine_trace!("galaxy3d::Device", "draw {} vertices", count);
/// ```
#[macro_export]
macro_rules! engine_trace {
    ($source:expr, $($arg:tt)*) => { $crate::__engine_log!(Trace, $source, $($arg)*) };
}

#[macro_export]
macro_rules! engine_debug {
    ($source:expr, $($arg:tt)*) => { $crate::__engine_log!(Debug, $source, $($arg)*) };
}

#[macro_export]
macro_rules! engine_info {
    ($source:expr, $($arg:tt)*) => { $crate::__engine_log!(Info, $source, $($arg)*) };
}

#[macro_export]
macro_rules! engine_warn {
    ($source:expr, $($arg:tt)*) => { $crate::__engine_log!(Warn, $source, $($arg)*) };
}

/// Error with the call site attached
#[macro_export]
macro_rules! engine_error {
    ($source:expr, $($arg:tt)*) => {
        $crate::galaxy3d::Engine::log_detailed(
            $crate::galaxy3d::log::LogSeverity::Error,
            $source,
            format!($($arg)*),
            file!(),
            line!(),
        )
    };
}

/// Log an ERROR and evaluate to the matching `Error::InvalidResource`
///
/// ```ignore
/// return Err(engine_err!("galaxy3d::Device", "unknown buffer {:?}", key));
/// ```
#[macro_export]
macro_rules! engine_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        $crate::galaxy3d::Error::InvalidResource(message)
    }};
}

/// Log an ERROR and return `Err(Error::InvalidResource)` from the enclosing function
#[macro_export]
macro_rules! engine_bail {
    ($source:expr, $($arg:tt)*) => {
        return Err($crate::engine_err!($source, $($arg)*))
    };
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
