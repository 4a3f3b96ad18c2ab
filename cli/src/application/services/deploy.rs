//! Application service: apply, validate and destroy use-cases.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! Every step is ordered here; the backends only know how to run one step.

use anyhow::Result;
use tokio::sync::watch;
use tracing::info;

use crate::application::ports::{
    EnvironmentChecker, HttpProbe, InfraBackend, ObjectStore, ProgressReporter,
};
use crate::application::services::environment::check_environment;
use crate::application::services::readiness::wait_for_target;
use crate::domain::environment::require_ready;
use crate::domain::{DeployError, Provider, ReadinessPolicy, Ready, SiteConfig, Target};

/// What `destroy` did before and during `terraform destroy`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeardownSummary {
    /// Bucket that was emptied, if any.
    pub emptied_bucket: Option<String>,
}

fn terraform_vars(config: &SiteConfig) -> Vec<(&'static str, &str)> {
    vec![("region", config.region.as_str())]
}

/// Check the environment, then `terraform init` and `terraform apply`.
///
/// # Errors
///
/// Returns an error if the environment check reports issues or a Terraform
/// step fails. Nothing is run after the first failure.
pub async fn apply(
    env: &impl EnvironmentChecker,
    infra: &impl InfraBackend,
    config: &SiteConfig,
    reporter: &impl ProgressReporter,
) -> Result<()> {
    let report = check_environment(env, config, reporter).await;
    require_ready(&report)?;

    reporter.step("initialising terraform...");
    infra.init().await?;

    reporter.step("applying infrastructure...");
    infra.apply(&terraform_vars(config)).await?;

    info!(region = %config.region, provider = %config.provider, "apply complete");
    reporter.success("infrastructure applied");
    Ok(())
}

/// Read the site's domain from Terraform outputs and build its target URL.
///
/// # Errors
///
/// Returns [`DeployError::MissingOutput`] if the output is unset, or
/// `InvalidTarget` if it does not hold a valid domain name.
pub async fn resolve_target(infra: &impl InfraBackend, config: &SiteConfig) -> Result<Target> {
    let domain = infra
        .output(&config.domain_output)
        .await?
        .ok_or_else(|| DeployError::MissingOutput(config.domain_output.clone()))?;
    Ok(Target::from_domain(&domain)?)
}

/// Resolve the deployed site's URL and wait for it to become ready.
///
/// # Errors
///
/// Returns an error if the target cannot be resolved, or the readiness wait
/// times out or is cancelled.
pub async fn validate(
    infra: &impl InfraBackend,
    probe: &impl HttpProbe,
    config: &SiteConfig,
    policy: &ReadinessPolicy,
    reporter: &impl ProgressReporter,
    shutdown: watch::Receiver<bool>,
) -> Result<Ready> {
    reporter.step(&format!(
        "reading '{}' from terraform outputs...",
        config.domain_output
    ));
    let target = resolve_target(infra, config).await?;
    Ok(wait_for_target(&target, policy, probe, reporter, shutdown).await?)
}

/// Tear the deployment down.
///
/// Ordering: environment check, then empty the content bucket (AWS only,
/// when the bucket output is set), then `terraform destroy`. A bucket that
/// cannot be emptied stops the teardown before Terraform runs.
///
/// # Errors
///
/// Returns an error if the environment check reports issues, the bucket
/// cannot be emptied, or `terraform destroy` fails.
pub async fn destroy(
    env: &impl EnvironmentChecker,
    infra: &impl InfraBackend,
    store: &impl ObjectStore,
    config: &SiteConfig,
    reporter: &impl ProgressReporter,
) -> Result<TeardownSummary> {
    let report = check_environment(env, config, reporter).await;
    require_ready(&report)?;

    let mut emptied_bucket = None;
    if config.provider == Provider::Aws {
        match infra.output(&config.bucket_output).await? {
            Some(bucket) => {
                reporter.step(&format!("emptying bucket {bucket}..."));
                store.empty_bucket(&bucket, config).await?;
                emptied_bucket = Some(bucket);
            }
            None => reporter.warn(&format!(
                "output '{}' not set, skipping bucket cleanup",
                config.bucket_output
            )),
        }
    }

    reporter.step("destroying infrastructure...");
    infra.destroy(&terraform_vars(config)).await?;

    info!(region = %config.region, provider = %config.provider, "destroy complete");
    reporter.success("infrastructure destroyed");
    Ok(TeardownSummary { emptied_bucket })
}
