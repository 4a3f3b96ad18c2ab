//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, or `std::process`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use std::time::Duration;

use thiserror::Error;

use crate::domain::readiness::{ProbeOutcome, format_elapsed};

// ── Readiness errors ──────────────────────────────────────────────────────────

/// Errors surfaced by a readiness wait. Transient not-ready probes are never
/// reported through this type.
#[derive(Debug, Error)]
pub enum ReadinessError {
    #[error("Invalid target URL '{input}': {reason}")]
    InvalidTarget { input: String, reason: String },

    #[error(
        "Site not ready after {attempts} attempt(s) in {} (last: {})",
        fmt_elapsed(.elapsed),
        fmt_last(.last)
    )]
    TimedOut {
        attempts: u32,
        elapsed: Duration,
        last: Option<ProbeOutcome>,
    },

    #[error("Readiness wait cancelled after {attempts} attempt(s) in {}", fmt_elapsed(.elapsed))]
    Cancelled { attempts: u32, elapsed: Duration },
}

impl ReadinessError {
    /// Stable machine-readable code for `--json` output.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidTarget { .. } => "INVALID_TARGET",
            Self::TimedOut { .. } => "TIMED_OUT",
            Self::Cancelled { .. } => "CANCELLED",
        }
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)] // called with field references
fn fmt_elapsed(elapsed: &Duration) -> String {
    format_elapsed(*elapsed)
}

#[allow(clippy::ref_option)] // called with field references
fn fmt_last(last: &Option<ProbeOutcome>) -> String {
    last.as_ref()
        .map_or_else(|| "no response".to_string(), ToString::to_string)
}

// ── Environment errors ────────────────────────────────────────────────────────

/// Errors raised when the local toolchain or cloud credentials are unusable.
#[derive(Debug, Error)]
pub enum EnvironmentError {
    #[error("Environment not ready:\n  - {}\n\nDiagnose: sitedeploy doctor", .0.join("\n  - "))]
    NotReady(Vec<String>),
}

// ── Deployment errors ─────────────────────────────────────────────────────────

/// Errors raised while driving Terraform or the object store.
#[derive(Debug, Error)]
pub enum DeployError {
    #[error("terraform {step} failed (exit code {code}){}", fmt_stderr(.stderr))]
    StepFailed {
        step: &'static str,
        code: i32,
        stderr: String,
    },

    #[error("Terraform output '{0}' is not set. Run 'sitedeploy apply' first.")]
    MissingOutput(String),

    #[error("Failed to empty bucket '{bucket}'{}", fmt_stderr(.stderr))]
    EmptyBucketFailed { bucket: String, stderr: String },
}

fn fmt_stderr(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {trimmed}")
    }
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration key/value validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown setting: {key}\n\nValid settings: {valid}")]
    UnknownKey { key: String, valid: String },

    #[error("Invalid value for {key}: {value}\n\nValid values: {valid}")]
    InvalidValue {
        key: String,
        value: String,
        valid: String,
    },
}
