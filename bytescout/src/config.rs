use std::ffi::OsStr;
use std::path::PathBuf;

use crate::pattern::BytePattern;

/// Environment variable that turns on step-by-step tracing when set to any
/// non-empty value
pub const DEBUG_ENV_VAR: &str = "BYTESCOUT_DEBUG";

/// Configuration for one scan.
///
/// Built once by the caller and passed by reference; nothing in the library
/// reads the environment behind the caller's back. Use [`debug_requested`]
/// to fold the `BYTESCOUT_DEBUG` variable into `trace`:
///
/// ```rust,ignore
/// let config = ScanConfig::new("root", pattern)
///     .with_trace(cli.debug || debug_requested(std::env::var_os(DEBUG_ENV_VAR).as_deref()));
/// ```
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Root directory to start the walk from
    pub root_path: PathBuf,

    /// Bytes to look for on aligned block boundaries
    pub pattern: BytePattern,

    /// Emit a trace record for every directory opened, pushed and closed and
    /// every file scanned
    pub trace: bool,

    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

pub fn default_log_level() -> String {
    "warn".to_string()
}

/// Whether a value of `BYTESCOUT_DEBUG` asks for tracing
pub fn debug_requested(value: Option<&OsStr>) -> bool {
    value.is_some_and(|v| !v.is_empty())
}

impl ScanConfig {
    pub fn new(root_path: impl Into<PathBuf>, pattern: BytePattern) -> Self {
        Self {
            root_path: root_path.into(),
            pattern,
            trace: false,
            log_level: default_log_level(),
        }
    }

    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    pub fn with_log_level(mut self, log_level: impl Into<String>) -> Self {
        self.log_level = log_level.into();
        self
    }

    /// The filter directive for `tracing-subscriber`. Tracing forces at least
    /// `debug` so trace records are not filtered out.
    pub fn log_filter(&self) -> String {
        if self.trace && !matches!(self.log_level.as_str(), "trace" | "debug") {
            "debug".to_string()
        } else {
            self.log_level.clone()
        }
    }
}
