#![deny(missing_docs)]
//! Shared logging utilities for the uploader workspace.
//!
//! This crate provides the `uploader_*` logging macros used across the
//! codebase, a per-thread submission context that tags log lines with the
//! submission they belong to, and a minimal test initializer for the global
//! logger.

use std::cell::Cell;

thread_local! {
    /// Submission currently being handled on this thread, if any.
    static SUBMISSION: Cell<Option<u64>> = const { Cell::new(None) };
}

/// Marks `submission_id` as the submission handled by the current thread.
///
/// Log lines emitted through the `uploader_*` macros are prefixed with it
/// until [`clear_submission`] is called.
pub fn set_submission(submission_id: u64) {
    SUBMISSION.with(|v| v.set(Some(submission_id)));
}

/// Clears the submission context of the current thread.
pub fn clear_submission() {
    SUBMISSION.with(|v| v.set(None));
}

/// Returns the submission id set on the current thread, if any.
pub fn current_submission() -> Option<u64> {
    SUBMISSION.with(|v| v.get())
}

/// Runs `f` with `submission_id` as the thread's submission context and
/// restores the previous context afterwards, also when `f` panics.
pub fn with_submission<T>(submission_id: u64, f: impl FnOnce() -> T) -> T {
    struct Restore(Option<u64>);

    impl Drop for Restore {
        fn drop(&mut self) {
            SUBMISSION.with(|v| v.set(self.0));
        }
    }

    let _restore = Restore(current_submission());
    set_submission(submission_id);
    f()
}

/// Formats the submission prefix for a log line. Used by the macros.
#[doc(hidden)]
pub fn submission_prefix() -> String {
    match current_submission() {
        Some(id) => format!("[submission {id}] "),
        None => String::new(),
    }
}

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! uploader_trace {
    ($($arg:tt)*) => {{
        log::trace!("{}{}", $crate::submission_prefix(), format_args!($($arg)*));
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! uploader_info {
    ($($arg:tt)*) => {{
        log::info!("{}{}", $crate::submission_prefix(), format_args!($($arg)*));
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! uploader_debug {
    ($($arg:tt)*) => {{
        log::debug!("{}{}", $crate::submission_prefix(), format_args!($($arg)*));
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! uploader_warn {
    ($($arg:tt)*) => {{
        log::warn!("{}{}", $crate::submission_prefix(), format_args!($($arg)*));
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! uploader_error {
    ($($arg:tt)*) => {{
        log::error!("{}{}", $crate::submission_prefix(), format_args!($($arg)*));
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
