//! Output helpers for consistent CLI messages.
//!
//! Everything here goes to stderr. Stdout is reserved for the generated
//! Dockerfile (and other command results) so it can be redirected.
//!
//! ```rust,ignore
//! use dfgen::output::Output;
//!
//! Output::success("Wrote Dockerfile.ubu18");
//! Output::warning("Overwriting Dockerfile.ubu18");
//! Output::error("Config 'ubu18' not found");
//! ```

use owo_colors::OwoColorize;

pub struct Output;

impl Output {
    /// `✓ Wrote Dockerfile.ubu18`
    pub fn success(msg: impl AsRef<str>) {
        eprintln!("{} {}", "✓".green().bold(), msg.as_ref());
    }

    /// `✗ Config 'ubu18' not found`
    pub fn error(msg: impl AsRef<str>) {
        eprintln!("{} {}", "✗".red().bold(), msg.as_ref().red());
    }

    /// `⚠ Overwriting Dockerfile.ubu18`
    pub fn warning(msg: impl AsRef<str>) {
        eprintln!("{} {}", "⚠".yellow(), msg.as_ref());
    }

    /// `→ Using config ./conf/ubu18.conf.json`
    pub fn info(msg: impl AsRef<str>) {
        eprintln!("{} {}", "→".cyan(), msg.as_ref().dimmed());
    }

    /// A usage hint, printed as-is so it can be copied.
    pub fn hint(msg: impl AsRef<str>) {
        eprintln!("{}", msg.as_ref());
    }
}
