//! Application service: local toolchain and credential checks.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use crate::application::ports::{EnvironmentChecker, ProgressReporter};
use crate::domain::SiteConfig;
use crate::domain::environment::EnvironmentReport;

/// Probe Terraform, the provider CLI, and provider credentials.
///
/// The authentication check is skipped (reported as unauthenticated) when the
/// provider CLI itself is missing.
pub async fn check_environment(
    checker: &impl EnvironmentChecker,
    config: &SiteConfig,
    reporter: &impl ProgressReporter,
) -> EnvironmentReport {
    reporter.step("checking tools...");
    let (terraform, provider_cli) = tokio::join!(
        checker.check_tool("terraform"),
        checker.check_tool(config.provider.cli_tool()),
    );

    let auth = if provider_cli.found {
        reporter.step(&format!("checking {} credentials...", config.provider));
        checker.check_auth(config).await
    } else {
        crate::domain::AuthCheck {
            provider: config.provider,
            authenticated: false,
            identity: None,
        }
    };

    EnvironmentReport {
        terraform,
        provider_cli,
        auth,
    }
}
