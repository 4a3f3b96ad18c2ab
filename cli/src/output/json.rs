//! JSON output helpers.
//!
//! Every `--json` code path prints exactly one pretty-printed JSON document
//! on stdout, whether the command succeeded or failed.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::domain::config::SiteConfig;
use crate::domain::error::{ConfigError, DeployError, EnvironmentError, ReadinessError};
use crate::domain::environment::EnvironmentReport;
use crate::domain::readiness::Ready;

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Machine-readable code for a command failure.
#[must_use]
pub fn error_code(err: &anyhow::Error) -> &'static str {
    if let Some(e) = err.downcast_ref::<ReadinessError>() {
        e.code()
    } else if err.is::<EnvironmentError>() {
        "ENVIRONMENT"
    } else if err.is::<DeployError>() {
        "DEPLOY"
    } else if err.is::<ConfigError>() {
        "CONFIG"
    } else {
        "ERROR"
    }
}

/// Pretty-print any serializable value.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn to_pretty<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("JSON serialization failed")
}

/// Renders domain types as JSON documents on stdout.
pub struct JsonRenderer;

impl JsonRenderer {
    /// Render the CLI version.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_version(&self, version: &str) -> Result<()> {
        println!("{}", to_pretty(&serde_json::json!({ "version": version }))?);
        Ok(())
    }

    /// Render a successful readiness wait.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_ready(&self, ready: &Ready) -> Result<()> {
        let obj = serde_json::json!({
            "ready": true,
            "url": ready.url,
            "status": ready.status,
            "attempts": ready.attempts,
            "elapsed_secs": ready.elapsed.as_secs_f64(),
        });
        println!("{}", to_pretty(&obj)?);
        Ok(())
    }

    /// Render environment check results.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_environment(&self, report: &EnvironmentReport, issues: &[String]) -> Result<()> {
        let obj = serde_json::json!({
            "ready": issues.is_empty(),
            "checks": report,
            "issues": issues,
        });
        println!("{}", to_pretty(&obj)?);
        Ok(())
    }

    /// Render the result of `apply` or `destroy`.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_deployment(&self, action: &str, emptied_bucket: Option<&str>) -> Result<()> {
        let obj = serde_json::json!({
            "action": action,
            "success": true,
            "emptied_bucket": emptied_bucket,
        });
        println!("{}", to_pretty(&obj)?);
        Ok(())
    }

    /// Render the current configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_config(&self, config: &SiteConfig, path: &Path) -> Result<()> {
        let obj = serde_json::json!({
            "path": path.display().to_string(),
            "config": config,
        });
        println!("{}", to_pretty(&obj)?);
        Ok(())
    }
}
