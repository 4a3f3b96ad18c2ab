//! `TerminalReporter`: Presentation-layer implementation of `ProgressReporter`.
//!
//! Wraps `&OutputContext` and implements the `application::ports::ProgressReporter`
//! trait so application services can emit progress events without depending on
//! any presentation type directly.

use indicatif::ProgressBar;

use crate::application::ports::ProgressReporter;
use crate::output::{OutputContext, progress};

/// Terminal progress reporter that wraps an `OutputContext`.
///
/// Without a spinner:
/// - `step()` prints `"  → {message}"` (suppressed when `ctx.quiet`)
/// - `success()` prints `"  ✓ {message}"` (suppressed when `ctx.quiet`)
/// - `warn()` prints `"  ⚠ {message}"` (suppressed when `ctx.quiet`)
///
/// With a spinner, `step()` updates the spinner message, warnings are printed
/// above it, and `success()` finishes it.
pub struct TerminalReporter<'a> {
    ctx: &'a OutputContext,
    spinner: Option<ProgressBar>,
}

impl<'a> TerminalReporter<'a> {
    /// Create a line-oriented reporter.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx, spinner: None }
    }

    /// Create a reporter that drives a spinner when progress display is
    /// possible (TTY, not quiet), falling back to plain lines otherwise.
    #[must_use]
    pub fn with_spinner(ctx: &'a OutputContext) -> Self {
        let spinner = ctx.show_progress().then(|| progress::spinner("starting..."));
        Self { ctx, spinner }
    }
}

impl ProgressReporter for TerminalReporter<'_> {
    fn step(&self, message: &str) {
        match &self.spinner {
            Some(pb) if !pb.is_finished() => pb.set_message(message.to_string()),
            _ => self.ctx.step(message),
        }
    }

    fn success(&self, message: &str) {
        match &self.spinner {
            Some(pb) if !pb.is_finished() => progress::finish_ok(pb, message),
            _ => self.ctx.success(message),
        }
    }

    fn warn(&self, message: &str) {
        match &self.spinner {
            Some(pb) if !pb.is_finished() => pb.suspend(|| self.ctx.warn(message)),
            _ => self.ctx.warn(message),
        }
    }
}

impl Drop for TerminalReporter<'_> {
    fn drop(&mut self) {
        if let Some(pb) = &self.spinner {
            if !pb.is_finished() {
                pb.finish_and_clear();
            }
        }
    }
}
