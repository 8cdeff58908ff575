//! Logging utilities with colored output.
//!
//! This module provides:
//! - `log!` macro for formatted terminal output with colored phase prefixes
//! - `debug!` macro for output that only shows with `--verbose`
//!
//! # Example
//!
//! ```ignore
//! log!("update"; "running `{}`", command);
//! debug!("config"; "root: {}", root.display());
//! ```

use crossterm::{
    execute,
    terminal::{Clear, ClearType},
};
use owo_colors::{OwoColorize, Stream, Style};
use std::{
    io::{Write, stdout},
    sync::atomic::{AtomicBool, Ordering},
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

/// Log a message with a colored phase prefix
///
/// # Usage
/// ```ignore
/// log!("serve"; "message with {} formatting", args);
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

    // Wipe leftovers such as the `^C` echo before writing
    execute!(stdout, Clear(ClearType::UntilNewLine)).ok();
    writeln!(stdout, "{prefix} {message}").ok();
    stdout.flush().ok();
}

/// Apply color to a module prefix based on the phase it belongs to
#[inline]
fn colorize_prefix(module: &str, module_lower: &str) -> String {
    let prefix = format!("[{module}]");
    let style = match module_lower {
        "update" => Style::new().bright_cyan(),
        "serve" => Style::new().bright_blue(),
        "publish" => Style::new().bright_green(),
        "error" => Style::new().bright_red(),
        _ => Style::new().bright_yellow(),
    }
    .bold();
    prefix
        .if_supports_color(Stream::Stdout, |p| p.style(style))
        .to_string()
}

/// Print a top-level failure the way every other diagnostic is printed.
///
/// The `Error:` lead matches what the publish prompt promises for an empty
/// commit message.
pub fn report_error(err: &anyhow::Error) {
    let mut stdout = stdout().lock();
    let lead = "Error:".if_supports_color(Stream::Stdout, |t| t.style(Style::new().bright_red().bold()));
    writeln!(stdout, "{lead} {err:#}").ok();
    stdout.flush().ok();
}

// ============================================================================
// Tests
// ============================================================================
