//! Logging setup for migration runs.
//!
//! The runner always emits `tracing` events: the start of a run, each
//! committed migration, compensations and fatal conditions. Nothing is printed
//! unless a subscriber is installed, either by the embedding application or by
//! [`init`] when the `tracing-subscriber` feature is enabled.
//!
//! # Environment Variables
//!
//! - `STEPWISE_DEBUG=true|1|yes` - log at debug level
//! - `STEPWISE_LOG_LEVEL=trace|debug|info|warn|error` - explicit level
//! - `STEPWISE_LOG_FORMAT=json|pretty|compact` - output format (default: compact)
//!
//! ```rust,no_run
//! stepwise_migrate::logging::init();
//! ```

use std::env;
use std::sync::Once;

const DEBUG_VAR: &str = "STEPWISE_DEBUG";
const LEVEL_VAR: &str = "STEPWISE_LOG_LEVEL";
const FORMAT_VAR: &str = "STEPWISE_LOG_FORMAT";

static INIT: Once = Once::new();

/// Output format of the installed subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per event.
    Json,
    /// Multi-line, human oriented.
    Pretty,
    /// Single line per event.
    Compact,
}

impl LogFormat {
    /// Name as accepted by `STEPWISE_LOG_FORMAT`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Pretty => "pretty",
            Self::Compact => "compact",
        }
    }
}

/// Whether `STEPWISE_DEBUG` is set to "true", "1" or "yes" (case-insensitive).
#[inline]
pub fn is_debug_enabled() -> bool {
    env::var(DEBUG_VAR)
        .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(false)
}

/// The level from `STEPWISE_LOG_LEVEL`.
///
/// Unknown or missing values fall back to "debug" when debugging is enabled
/// and "info" otherwise.
pub fn log_level() -> &'static str {
    let requested = env::var(LEVEL_VAR).map(|l| l.to_lowercase());
    match requested.as_deref() {
        Ok("trace") => "trace",
        Ok("debug") => "debug",
        Ok("info") => "info",
        Ok("warn") => "warn",
        Ok("error") => "error",
        _ if is_debug_enabled() => "debug",
        _ => "info",
    }
}

/// The format from `STEPWISE_LOG_FORMAT`.
pub fn log_format() -> LogFormat {
    match env::var(FORMAT_VAR).map(|f| f.to_lowercase()).as_deref() {
        Ok("json") => LogFormat::Json,
        Ok("pretty") => LogFormat::Pretty,
        _ => LogFormat::Compact,
    }
}

/// Install a global subscriber for the stepwise crates.
///
/// Does nothing unless `STEPWISE_DEBUG` or `STEPWISE_LOG_LEVEL` is set, or
/// when the `tracing-subscriber` feature is disabled. Only the first call has
/// an effect.
pub fn init() {
    INIT.call_once(|| {
        if !is_debug_enabled() && env::var(LEVEL_VAR).is_err() {
            return;
        }

        #[cfg(feature = "tracing-subscriber")]
        {
            use tracing_subscriber::{EnvFilter, fmt, prelude::*};

            let level = log_level();
            let filter = EnvFilter::try_new(format!(
                "stepwise={level},stepwise_ddl={level},stepwise_migrate={level},stepwise_postgres={level}"
            ))
            .unwrap_or_else(|_| EnvFilter::new("info"));

            let registry = tracing_subscriber::registry().with(filter);
            let installed = match log_format() {
                LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
                LogFormat::Pretty => registry.with(fmt::layer().pretty()).try_init(),
                LogFormat::Compact => registry.with(fmt::layer().compact()).try_init(),
            };

            if installed.is_ok() {
                tracing::info!(
                    level,
                    format = log_format().as_str(),
                    "Stepwise logging initialized"
                );
            }
        }
    });
}

/// Set `STEPWISE_LOG_LEVEL` and call [`init`].
///
/// # Safety
///
/// Modifies the process environment. Call it at startup, before any other
/// thread is spawned.
pub fn init_with_level(level: &str) {
    // SAFETY: documented as startup-only.
    unsafe {
        env::set_var(LEVEL_VAR, level);
    }
    init();
}

#[cfg(test)]
mod tests {
    use super::*;

    // Both cases share process-wide variables, so they run in one test.
    #[test]
    fn test_environment_resolution() {
        // SAFETY: no other test in this crate reads these variables.
        unsafe {
            env::remove_var(DEBUG_VAR);
            env::remove_var(LEVEL_VAR);
            env::remove_var(FORMAT_VAR);
        }
        assert!(!is_debug_enabled());
        assert_eq!(log_level(), "info");
        assert_eq!(log_format(), LogFormat::Compact);

        unsafe {
            env::set_var(DEBUG_VAR, "YES");
            env::set_var(LEVEL_VAR, "verbose");
            env::set_var(FORMAT_VAR, "JSON");
        }
        assert!(is_debug_enabled());
        assert_eq!(log_level(), "debug");
        assert_eq!(log_format(), LogFormat::Json);

        unsafe {
            env::set_var(LEVEL_VAR, "warn");
        }
        assert_eq!(log_level(), "warn");

        unsafe {
            env::remove_var(DEBUG_VAR);
            env::remove_var(LEVEL_VAR);
            env::remove_var(FORMAT_VAR);
        }
    }
}
