//! Logging utilities with colored output.
//!
//! This module provides:
//! - `log!` macro for formatted terminal output with colored prefixes
//! - `debug!` macro for output that only shows up with `--verbose`
//! - `Step` for timed pipeline steps (`✓ push (1.42s)`)
//!
//! # Example
//!
//! ```ignore
//! // Simple logging
//! log!("publish"; "cloning {}", remote.display_url);
//!
//! // Timed step
//! let step = Step::start("push");
//! tree.push(true)?;
//! step.done();
//! ```

use crossterm::{
    execute,
    terminal::{Clear, ClearType},
};
use owo_colors::OwoColorize;
use std::{
    io::{Write, stdout},
    sync::atomic::{AtomicBool, Ordering},
    time::Instant,
};

/// Global verbose flag (set by --verbose CLI argument)
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set verbose mode globally
pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

/// Check if verbose mode is enabled
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

// ============================================================================
// Log Macro
// ============================================================================

/// Log a message with a colored module prefix
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log a debug message (only shown when --verbose is enabled)
///
/// # Usage
/// ```ignore
/// debug!("module"; "debug info: {}", value);
/// ```
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Log a message with a colored module prefix
#[inline]
pub fn log(module: &str, message: &str) {
    let module_lower = module.to_ascii_lowercase();
    let prefix = colorize_prefix(module, &module_lower);

    let mut stdout = stdout().lock();
    execute!(stdout, Clear(ClearType::UntilNewLine)).ok();
    writeln!(stdout, "{prefix} {message}").ok();
    stdout.flush().ok();
}

/// Apply color to a module prefix based on module type
#[inline]
fn colorize_prefix(module: &str, module_lower: &str) -> String {
    let prefix = format!("[{module}]");
    match module_lower {
        "publish" => prefix.bright_blue().bold().to_string(),
        "git" => prefix.bright_green().bold().to_string(),
        "error" => prefix.bright_red().bold().to_string(),
        _ => prefix.bright_yellow().bold().to_string(),
    }
}

// ============================================================================
// Step (timed pipeline step)
// ============================================================================

/// A timed step of the publish pipeline.
///
/// Prints `✓ name (elapsed)` on [`Step::done`], `✗ name (elapsed)` when
/// dropped without finishing, so an aborted pipeline shows where it stopped.
pub struct Step {
    name: &'static str,
    started: Instant,
    finished: bool,
}

impl Step {
    pub fn start(name: &'static str) -> Self {
        crate::debug!("step"; "{name} ...");
        Self {
            name,
            started: Instant::now(),
            finished: false,
        }
    }

    /// Mark the step as successful.
    pub fn done(mut self) {
        self.finished = true;
        self.display(format!("{}", "✓".green()));
    }

    fn display(&self, symbol: String) {
        let elapsed = format_elapsed(self.started.elapsed().as_secs_f64());
        let mut stdout = stdout().lock();
        writeln!(stdout, "{symbol} {} {}", self.name, elapsed.dimmed()).ok();
        stdout.flush().ok();
    }
}

impl Drop for Step {
    fn drop(&mut self) {
        if !self.finished {
            self.display(format!("{}", "✗".red()));
        }
    }
}

fn format_elapsed(secs: f64) -> String {
    if secs < 1.0 {
        format!("({:.0}ms)", secs * 1000.0)
    } else {
        format!("({secs:.2}s)")
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(0.0421), "(42ms)");
        assert_eq!(format_elapsed(1.4231), "(1.42s)");
    }

    #[test]
    fn test_colorize_prefix_keeps_module_name() {
        owo_colors::set_override(false);
        assert_eq!(colorize_prefix("git", "git"), "[git]");
        assert_eq!(colorize_prefix("Publish", "publish"), "[Publish]");
    }

    #[test]
    fn test_verbose_flag() {
        set_verbose(true);
        assert!(is_verbose());
        set_verbose(false);
        assert!(!is_verbose());
    }
}
