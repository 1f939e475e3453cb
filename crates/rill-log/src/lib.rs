//! A small, zero-dependency logging crate for the Rill toolchain.
//!
//! Messages go to stderr, tagged with their level and the module that emitted
//! them. The global logger starts at [`Level::Warn`] so library code stays
//! quiet unless a host application asks for more.
//!
//! # Example
//!
//! ```
//! use rill_log::{debug, info, warn, Level};
//!
//! rill_log::set_level(Level::Debug);
//! rill_log::set_color(false);
//!
//! info!("checking {} nodes", 12);
//! debug!("environment: {:?}", ["list_of", "identity"]);
//! warn!("native `{}` declared twice", "hold");
//! ```
//!
//! Output can be narrowed to one subsystem with a module-path prefix:
//!
//! ```
//! rill_log::set_filter(Some("rill_typecheck::infer"));
//! rill_log::set_filter(None);
//! ```

use std::fmt::{self, Arguments};
use std::io::Write;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{OnceLock, RwLock};

/// Severity of a log message.
///
/// Lower numeric values are more severe; a logger set to `Info` emits
/// `Error`, `Warn` and `Info`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// Failures, including internal invariant violations
    Error = 0,
    /// Suspicious input that is still accepted
    Warn = 1,
    /// Coarse progress
    Info = 2,
    /// Per-call diagnostics
    Debug = 3,
    /// Per-step diagnostics (every unification)
    Trace = 4,
}

impl Level {
    const fn color_code(self) -> &'static str {
        match self {
            Level::Error => "\x1b[31m",
            Level::Warn => "\x1b[33m",
            Level::Info => "\x1b[32m",
            Level::Debug => "\x1b[36m",
            Level::Trace => "\x1b[35m",
        }
    }

    /// Upper-case name used in log lines.
    pub const fn as_str(self) -> &'static str {
        match self {
            Level::Error => "ERROR",
            Level::Warn => "WARN",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
            Level::Trace => "TRACE",
        }
    }

    const fn from_u8(raw: u8) -> Level {
        match raw {
            0 => Level::Error,
            1 => Level::Warn,
            2 => Level::Info,
            3 => Level::Debug,
            _ => Level::Trace,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a level name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLevelError(String);

impl fmt::Display for ParseLevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid log level `{}` (expected error, warn, info, debug or trace)",
            self.0
        )
    }
}

impl std::error::Error for ParseLevelError {}

impl FromStr for Level {
    type Err = ParseLevelError;

    /// Parses a level name, ignoring case.
    ///
    /// ```
    /// use rill_log::Level;
    ///
    /// assert_eq!("debug".parse::<Level>(), Ok(Level::Debug));
    /// assert!("loud".parse::<Level>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(Level::Error),
            "warn" | "warning" => Ok(Level::Warn),
            "info" => Ok(Level::Info),
            "debug" => Ok(Level::Debug),
            "trace" => Ok(Level::Trace),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

/// Logger state: a level, an optional module-path filter and a colour switch.
///
/// The process-wide instance is reached through [`get_logger`].
pub struct Logger {
    level: AtomicU8,
    color: AtomicBool,
    filter: RwLock<Option<String>>,
}

impl Logger {
    const fn new(level: Level) -> Self {
        Logger {
            level: AtomicU8::new(level as u8),
            color: AtomicBool::new(true),
            filter: RwLock::new(None),
        }
    }

    /// Sets the minimum level that will be emitted.
    pub fn set_level(&self, level: Level) {
        self.level.store(level as u8, Ordering::SeqCst);
    }

    /// Current minimum level.
    pub fn level(&self) -> Level {
        Level::from_u8(self.level.load(Ordering::Relaxed))
    }

    /// Enables or disables ANSI colour codes.
    pub fn set_color(&self, enabled: bool) {
        self.color.store(enabled, Ordering::Relaxed);
    }

    /// Restricts output to targets starting with `prefix`; `None` clears it.
    pub fn set_filter(&self, prefix: Option<&str>) {
        if let Ok(mut filter) = self.filter.write() {
            *filter = prefix.map(str::to_string);
        }
    }

    /// Whether a message at `level` passes the level check.
    pub fn enabled(&self, level: Level) -> bool {
        level as u8 <= self.level.load(Ordering::Relaxed)
    }

    /// Whether a message at `level` from `target` would be written.
    pub fn accepts(&self, level: Level, target: &str) -> bool {
        if !self.enabled(level) {
            return false;
        }
        match self.filter.read() {
            Ok(filter) => filter
                .as_deref()
                .is_none_or(|prefix| target.starts_with(prefix)),
            Err(_) => true,
        }
    }

    fn render(&self, level: Level, target: &str, args: Arguments) -> String {
        if self.color.load(Ordering::Relaxed) {
            format!("{}[{}]\x1b[0m {target}: {args}", level.color_code(), level)
        } else {
            format!("[{level}] {target}: {args}")
        }
    }
}

static LOGGER: OnceLock<Logger> = OnceLock::new();

/// The process-wide logger, created at [`Level::Warn`] on first use.
pub fn get_logger() -> &'static Logger {
    LOGGER.get_or_init(|| Logger::new(Level::Warn))
}

/// Sets the global minimum level.
pub fn set_level(level: Level) {
    get_logger().set_level(level);
}

/// Sets the global minimum level from its name.
///
/// ```
/// rill_log::set_level_from_str("trace").unwrap();
/// assert!(rill_log::set_level_from_str("chatty").is_err());
/// ```
pub fn set_level_from_str(s: &str) -> Result<(), ParseLevelError> {
    set_level(s.parse()?);
    Ok(())
}

/// Restricts global output to one module-path prefix.
pub fn set_filter(prefix: Option<&str>) {
    get_logger().set_filter(prefix);
}

/// Enables or disables colour in global output.
pub fn set_color(enabled: bool) {
    get_logger().set_color(enabled);
}

#[doc(hidden)]
pub fn __log_with_target(level: Level, target: &str, args: Arguments) {
    let logger = get_logger();
    if !logger.accepts(level, target) {
        return;
    }

    let line = logger.render(level, target, args);
    // A closed stderr is not worth failing the caller over.
    let _ = writeln!(std::io::stderr().lock(), "{line}");
}

/// Logs at an explicit level, tagging the message with the caller's module.
///
/// ```
/// use rill_log::{log, Level};
///
/// log!(level: Level::Info, "lowered {} signatures", 3);
/// ```
#[macro_export]
macro_rules! log {
    (level: $level:expr, $($arg:tt)*) => {
        {
            let level = $level;
            if $crate::get_logger().enabled(level) {
                $crate::__log_with_target(level, module_path!(), format_args!($($arg)*));
            }
        }
    };
}

/// Logs at [`Level::Error`].
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::log!(level: $crate::Level::Error, $($arg)*)
    };
}

/// Logs at [`Level::Warn`].
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::log!(level: $crate::Level::Warn, $($arg)*)
    };
}

/// Logs at [`Level::Info`].
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::log!(level: $crate::Level::Info, $($arg)*)
    };
}

/// Logs at [`Level::Debug`].
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        $crate::log!(level: $crate::Level::Debug, $($arg)*)
    };
}

/// Logs at [`Level::Trace`].
#[macro_export]
macro_rules! trace {
    ($($arg:tt)*) => {
        $crate::log!(level: $crate::Level::Trace, $($arg)*)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(Level::Error < Level::Warn);
        assert!(Level::Warn < Level::Info);
        assert!(Level::Info < Level::Debug);
        assert!(Level::Debug < Level::Trace);
    }

    #[test]
    fn test_level_parse() {
        assert_eq!("ERROR".parse::<Level>(), Ok(Level::Error));
        assert_eq!("warning".parse::<Level>(), Ok(Level::Warn));
        assert_eq!(" Info ".parse::<Level>(), Ok(Level::Info));
        assert_eq!("trace".parse::<Level>(), Ok(Level::Trace));

        let err = "loud".parse::<Level>().unwrap_err();
        assert!(err.to_string().contains("loud"));
    }

    #[test]
    fn test_level_display() {
        assert_eq!(Level::Debug.to_string(), "DEBUG");
        assert_eq!(Level::Warn.as_str(), "WARN");
    }

    #[test]
    fn test_logger_level_filtering() {
        let logger = Logger::new(Level::Info);

        assert!(logger.enabled(Level::Error));
        assert!(logger.enabled(Level::Info));
        assert!(!logger.enabled(Level::Debug));

        logger.set_level(Level::Trace);
        assert!(logger.enabled(Level::Trace));
        assert_eq!(logger.level(), Level::Trace);
    }

    #[test]
    fn test_target_filter() {
        let logger = Logger::new(Level::Trace);
        assert!(logger.accepts(Level::Debug, "rill_typecheck::infer::engine"));

        logger.set_filter(Some("rill_typecheck::infer"));
        assert!(logger.accepts(Level::Debug, "rill_typecheck::infer::unify"));
        assert!(!logger.accepts(Level::Debug, "rill_typecheck::natives"));

        logger.set_filter(None);
        assert!(logger.accepts(Level::Debug, "rill_typecheck::natives"));
    }

    #[test]
    fn test_render_without_color() {
        let logger = Logger::new(Level::Info);
        logger.set_color(false);
        let line = logger.render(Level::Warn, "rill", format_args!("x = {}", 1));
        assert_eq!(line, "[WARN] rill: x = 1");
    }

    #[test]
    fn test_macros_from_threads() {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                std::thread::spawn(move || {
                    info!("thread {} message", i);
                    trace!("thread {} trace", i);
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
    }
}
