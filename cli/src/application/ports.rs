//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::PathBuf;
use std::process::Output;

use anyhow::Result;

use crate::domain::{AuthCheck, ProbeMethod, ProbeOutcome, SiteConfig, Target, ToolCheck};

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// Implementations should delegate to `run_with_timeout` using the
    /// instance's configured default timeout.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: std::time::Duration,
    ) -> Result<Output>;
    /// Run a program with inherited stdio and return only its exit status.
    ///
    /// Used for long-running steps whose output the user should see live.
    async fn run_status(&self, program: &str, args: &[&str]) -> Result<std::process::ExitStatus>;
}

// ── Readiness Probe Port ──────────────────────────────────────────────────────

/// Issues a single readiness request.
///
/// Implementations must never fail: every transport error is folded into
/// [`ProbeOutcome::Transport`] so the poller can treat it as "not ready".
#[allow(async_fn_in_trait)]
pub trait HttpProbe {
    /// Probe `target` once with the given method and per-request timeout.
    async fn probe(
        &self,
        target: &Target,
        method: ProbeMethod,
        timeout: std::time::Duration,
    ) -> ProbeOutcome;
}

// ── Environment Port ──────────────────────────────────────────────────────────

/// Checks for required tools and cloud credentials.
///
/// Production code shells out to the provider CLIs; tests substitute a mock.
#[allow(async_fn_in_trait)]
pub trait EnvironmentChecker {
    /// Check that `tool` is installed and report its version.
    async fn check_tool(&self, tool: &str) -> ToolCheck;
    /// Check that the provider CLI holds valid credentials for `config`.
    async fn check_auth(&self, config: &SiteConfig) -> AuthCheck;
}

// ── Infrastructure Ports ──────────────────────────────────────────────────────

/// Terraform operations against the site's configuration directory.
#[allow(async_fn_in_trait)]
pub trait InfraBackend {
    /// Initialise providers and backend.
    async fn init(&self) -> Result<()>;
    /// Create or update all resources.
    async fn apply(&self, vars: &[(&str, &str)]) -> Result<()>;
    /// Destroy all resources.
    async fn destroy(&self, vars: &[(&str, &str)]) -> Result<()>;
    /// Read a single output value; `None` when unset or empty.
    async fn output(&self, name: &str) -> Result<Option<String>>;
}

/// Object storage operations needed during teardown.
#[allow(async_fn_in_trait)]
pub trait ObjectStore {
    /// Delete every object in `bucket` so the bucket itself can be destroyed.
    async fn empty_bucket(&self, bucket: &str, config: &SiteConfig) -> Result<()>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

// ── Config Port ───────────────────────────────────────────────────────────────

/// Abstracts configuration persistence.
pub trait ConfigStore {
    /// Load configuration, falling back to defaults if no file exists.
    fn load(&self) -> Result<SiteConfig>;
    /// Persist configuration.
    fn save(&self, config: &SiteConfig) -> Result<()>;
    /// Location of the configuration file.
    fn path(&self) -> Result<PathBuf>;
}
