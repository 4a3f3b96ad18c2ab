//! Environment check domain types and pure diagnostic functions.
//!
//! This module is intentionally free of I/O, async, and external layer imports.
//! All functions take data in and return data out.

use serde::Serialize;

use crate::domain::config::Provider;
use crate::domain::error::EnvironmentError;

/// Oldest Terraform release whose `-chdir` and `output -raw` we rely on.
pub const MIN_TERRAFORM_VERSION: semver::Version = semver::Version::new(1, 0, 0);

// ── Types ─────────────────────────────────────────────────────────────────────

/// Presence and version of one command-line tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolCheck {
    /// Executable name, e.g. `terraform`.
    pub name: String,
    /// Whether the tool ran successfully.
    pub found: bool,
    /// Reported version, if it could be parsed.
    pub version: Option<String>,
}

impl ToolCheck {
    /// A tool that could not be executed.
    #[must_use]
    pub fn missing(name: &str) -> Self {
        Self {
            name: name.to_string(),
            found: false,
            version: None,
        }
    }
}

/// Result of a cloud authentication check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthCheck {
    pub provider: Provider,
    pub authenticated: bool,
    /// Caller identity (ARN for AWS, account user for Azure).
    pub identity: Option<String>,
}

/// Everything `doctor`, `apply` and `destroy` need to know before running.
#[derive(Debug, Clone, Serialize)]
pub struct EnvironmentReport {
    pub terraform: ToolCheck,
    pub provider_cli: ToolCheck,
    pub auth: AuthCheck,
}

// ── Pure functions ────────────────────────────────────────────────────────────

/// Returns `true` when the reported Terraform version satisfies
/// [`MIN_TERRAFORM_VERSION`]. Unparseable versions are given the benefit of
/// the doubt.
#[must_use]
pub fn terraform_version_ok(version: Option<&str>) -> bool {
    version
        .and_then(|v| semver::Version::parse(v.trim_start_matches('v')).ok())
        .is_none_or(|v| v >= MIN_TERRAFORM_VERSION)
}

/// Collect blocking issues from an environment report.
///
/// Returns a list of human-readable issue strings. An empty list means the
/// environment can run Terraform against the provider.
#[must_use]
pub fn collect_issues(report: &EnvironmentReport) -> Vec<String> {
    let mut issues = Vec::new();
    if !report.terraform.found {
        issues.push("terraform is not installed".to_string());
    } else if !terraform_version_ok(report.terraform.version.as_deref()) {
        let ver = report.terraform.version.as_deref().unwrap_or("unknown");
        issues.push(format!(
            "terraform {ver} is too old (need ≥ {MIN_TERRAFORM_VERSION})"
        ));
    }
    if !report.provider_cli.found {
        issues.push(format!("{} CLI is not installed", report.provider_cli.name));
    } else if !report.auth.authenticated {
        let hint = match report.auth.provider {
            Provider::Aws => "run 'aws configure' or 'aws sso login'",
            Provider::Azure => "run 'az login'",
        };
        issues.push(format!(
            "{} credentials are not valid ({hint})",
            provider_label(report.auth.provider)
        ));
    }
    issues
}

/// Fail with [`EnvironmentError::NotReady`] if the report has any issues.
///
/// # Errors
///
/// Returns the collected issues as an error.
pub fn require_ready(report: &EnvironmentReport) -> Result<(), EnvironmentError> {
    let issues = collect_issues(report);
    if issues.is_empty() {
        Ok(())
    } else {
        Err(EnvironmentError::NotReady(issues))
    }
}

fn provider_label(provider: Provider) -> &'static str {
    match provider {
        Provider::Aws => "AWS",
        Provider::Azure => "Azure",
    }
}

// ── Unit tests ────────────────────────────────────────────────────────────────
