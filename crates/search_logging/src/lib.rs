#![deny(missing_docs)]
//! Shared logging utilities for the transcript search workspace.
//!
//! This crate provides the `search_*` logging macros used across the codebase,
//! a per-thread "current search generation" that log lines can be tagged with,
//! and a minimal test initializer for the global logger.

use std::cell::Cell;

thread_local! {
    /// Generation of the scan currently driven by this thread (0 = none).
    static SEARCH_GENERATION: Cell<u64> = const { Cell::new(0) };
}

/// Records the search generation being processed on the current thread.
///
/// The scan loop calls this before every batch so log lines emitted from
/// helpers can be attributed to the right search.
pub fn set_search_generation(generation: u64) {
    SEARCH_GENERATION.with(|v| v.set(generation));
}

/// Returns the search generation recorded for the current thread.
/// Returns 0 if no scan has run on this thread yet.
pub fn current_search_generation() -> u64 {
    SEARCH_GENERATION.with(|v| v.get())
}

/// Logs a trace-level message tagged with the current search generation.
#[macro_export]
macro_rules! search_trace {
    ($($arg:tt)*) => {{
        log::trace!("[gen {}] {}", $crate::current_search_generation(), format_args!($($arg)*));
    }};
}

/// Logs an info-level message tagged with the current search generation.
#[macro_export]
macro_rules! search_info {
    ($($arg:tt)*) => {{
        log::info!("[gen {}] {}", $crate::current_search_generation(), format_args!($($arg)*));
    }};
}

/// Logs a debug-level message tagged with the current search generation.
#[macro_export]
macro_rules! search_debug {
    ($($arg:tt)*) => {{
        log::debug!("[gen {}] {}", $crate::current_search_generation(), format_args!($($arg)*));
    }};
}

/// Logs a warn-level message tagged with the current search generation.
#[macro_export]
macro_rules! search_warn {
    ($($arg:tt)*) => {{
        log::warn!("[gen {}] {}", $crate::current_search_generation(), format_args!($($arg)*));
    }};
}

/// Logs an error-level message tagged with the current search generation.
#[macro_export]
macro_rules! search_error {
    ($($arg:tt)*) => {{
        log::error!("[gen {}] {}", $crate::current_search_generation(), format_args!($($arg)*));
    }};
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
