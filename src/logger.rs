//! Logging utilities with colored output.
//!
//! This module provides:
//! - `log!` macro for formatted terminal output with colored prefixes
//! - `debug!` macro that only prints when `--verbose` is set
//!
//! # Example
//!
//! ```ignore
//! log!("feed"; "rendered {} items", count);
//! debug!("source"; "GET {}", url);
//! ```

use owo_colors::{OwoColorize, Stream, Style};
use std::{
    io::{Write, stderr, stdout},
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
/// Always written to stderr, so verbose output never mixes into a feed
/// streamed on stdout.
///
/// # Usage
/// ```ignore
/// debug!("module"; "debug info: {}", value);
/// ```
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log_debug($module, &format!($($arg)*))
        }
    }};
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Log a message with a colored module prefix.
///
/// `error` and `warning` go to stderr so `build` can write the feed to stdout.
#[inline]
pub fn log(module: &str, message: &str) {
    let module_lower = module.to_ascii_lowercase();

    if is_diagnostic(&module_lower) {
        let prefix = colorize_prefix(module, &module_lower, Stream::Stderr);
        write_line(&mut stderr().lock(), &prefix, message);
    } else {
        let prefix = colorize_prefix(module, &module_lower, Stream::Stdout);
        write_line(&mut stdout().lock(), &prefix, message);
    }
}

/// Backend of `debug!`.
#[inline]
pub fn log_debug(module: &str, message: &str) {
    let prefix = colorize_prefix(module, &module.to_ascii_lowercase(), Stream::Stderr);
    write_line(&mut stderr().lock(), &prefix, message);
}

fn write_line(out: &mut impl Write, prefix: &str, message: &str) {
    writeln!(out, "{prefix} {message}").ok();
    out.flush().ok();
}

#[inline]
fn is_diagnostic(module_lower: &str) -> bool {
    matches!(module_lower, "error" | "warning" | "skip")
}

/// Apply color to a module prefix based on module type.
///
/// Honors `--color` and TTY detection for the stream it is written to.
#[inline]
fn colorize_prefix(module: &str, module_lower: &str, stream: Stream) -> String {
    let style = match module_lower {
        "serve" => Style::new().bright_blue(),
        "feed" => Style::new().bright_green(),
        "error" => Style::new().bright_red(),
        "warning" | "skip" => Style::new().bright_magenta(),
        _ => Style::new().bright_yellow(),
    }
    .bold();

    let prefix = format!("[{module}]");
    prefix
        .if_supports_color(stream, |p| p.style(style))
        .to_string()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colorize_prefix_follows_color_override() {
        owo_colors::set_override(false);
        assert_eq!(colorize_prefix("feed", "feed", Stream::Stdout), "[feed]");
        assert_eq!(colorize_prefix("Serve", "serve", Stream::Stderr), "[Serve]");

        owo_colors::set_override(true);
        let colored = colorize_prefix("error", "error", Stream::Stderr);
        assert!(colored.starts_with('\u{1b}'));
        assert!(colored.contains("[error]"));

        owo_colors::unset_override();
    }

    #[test]
    fn test_diagnostic_modules_go_to_stderr() {
        assert!(is_diagnostic("error"));
        assert!(is_diagnostic("warning"));
        assert!(is_diagnostic("skip"));
        assert!(!is_diagnostic("feed"));
        assert!(!is_diagnostic("serve"));
    }

    #[test]
    fn test_verbose_toggle() {
        set_verbose(true);
        assert!(is_verbose());
        set_verbose(false);
        assert!(!is_verbose());
    }
}
