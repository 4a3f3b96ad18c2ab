//! Tests for the command lines the infra adapters build.
//!
//! A recording `CommandRunner` stands in for the real binaries.

#![allow(clippy::expect_used)]

use sitedeploy_cli::application::ports::{EnvironmentChecker, InfraBackend, ObjectStore};
use sitedeploy_cli::domain::{DeployError, Provider, SiteConfig};
use sitedeploy_cli::infra::environment::CliEnvironmentChecker;
use sitedeploy_cli::infra::object_store::AwsCliObjectStore;
use sitedeploy_cli::infra::terraform::TerraformCli;

use crate::helpers::{err_output, ok_output};
use crate::mocks::RecordingRunner;

fn profiled_config() -> SiteConfig {
    SiteConfig {
        region: "eu-west-1".to_string(),
        profile: Some("deploy".to_string()),
        ..SiteConfig::default()
    }
}

// ── Terraform ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_terraform_steps_run_in_configured_dir() {
    let runner = RecordingRunner::succeeding();
    let tf = TerraformCli::new(&runner, "infra/site");

    tf.init().await.expect("init");
    tf.apply(&[("region", "eu-west-1")]).await.expect("apply");
    tf.destroy(&[("region", "eu-west-1")]).await.expect("destroy");

    assert_eq!(
        runner.calls(),
        vec![
            "terraform -chdir=infra/site init -input=false",
            "terraform -chdir=infra/site apply -auto-approve -input=false -var region=eu-west-1",
            "terraform -chdir=infra/site destroy -auto-approve -input=false -var region=eu-west-1",
        ]
    );
}

#[test]
fn test_terraform_args_append_vars_after_flags() {
    let tf = TerraformCli::new(RecordingRunner::succeeding(), ".");

    let args = tf.args(
        "apply",
        &["-auto-approve"],
        &[("region", "us-east-1"), ("env", "prod")],
    );

    assert_eq!(
        args,
        vec![
            "-chdir=.",
            "apply",
            "-auto-approve",
            "-var",
            "region=us-east-1",
            "-var",
            "env=prod"
        ]
    );
}

#[tokio::test]
async fn test_terraform_output_uses_raw_flag() {
    let runner = RecordingRunner::new(|_, _| ok_output(b"example.com"));
    let tf = TerraformCli::new(&runner, "infra");

    tf.output("domain_name").await.expect("output");

    assert_eq!(
        runner.calls(),
        vec!["terraform -chdir=infra output -raw domain_name"]
    );
}

#[tokio::test]
async fn test_terraform_failed_step_is_step_failed() {
    let tf = TerraformCli::new(RecordingRunner::new(|_, _| err_output(1, b"")), ".");

    let err = tf.apply(&[]).await.expect_err("fails");

    assert!(matches!(
        err.downcast_ref::<DeployError>(),
        Some(DeployError::StepFailed {
            step: "apply",
            code: 1,
            ..
        })
    ));
}

#[tokio::test]
async fn test_terraform_output_trims_value() {
    let tf = TerraformCli::new(RecordingRunner::new(|_, _| ok_output(b"example.com\n")), ".");

    let value = tf.output("domain_name").await.expect("output");

    assert_eq!(value.as_deref(), Some("example.com"));
}

#[tokio::test]
async fn test_terraform_output_missing_is_none() {
    let tf = TerraformCli::new(
        RecordingRunner::new(|_, _| err_output(1, b"Output \"domain_name\" not found")),
        ".",
    );
    assert_eq!(tf.output("domain_name").await.expect("output"), None);

    let tf = TerraformCli::new(RecordingRunner::new(|_, _| ok_output(b"  \n")), ".");
    assert_eq!(tf.output("domain_name").await.expect("output"), None);
}

#[tokio::test]
async fn test_terraform_output_empty_state_is_none() {
    let tf = TerraformCli::new(
        RecordingRunner::new(|_, _| err_output(1, b"Warning: No outputs found\n")),
        ".",
    );
    assert_eq!(tf.output("bucket_name").await.expect("output"), None);
}

#[tokio::test]
async fn test_terraform_output_other_failure_is_step_failed() {
    let tf = TerraformCli::new(
        RecordingRunner::new(|_, _| {
            err_output(1, b"Error: Backend initialization required, please run \"terraform init\"")
        }),
        "infra",
    );

    let err = tf.output("bucket_name").await.expect_err("fails");

    assert!(matches!(
        err.downcast_ref::<DeployError>(),
        Some(DeployError::StepFailed {
            step: "output",
            code: 1,
            stderr,
        }) if stderr.contains("terraform init")
    ));
    assert!(err.to_string().contains("Backend initialization required"));
}

// ── Environment checker ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_check_tool_parses_terraform_json_version() {
    let checker = CliEnvironmentChecker::new(RecordingRunner::new(|_, _| {
        ok_output(br#"{"terraform_version":"1.9.5","platform":"linux_amd64"}"#)
    }));

    let tool = checker.check_tool("terraform").await;

    assert!(tool.found);
    assert_eq!(tool.version.as_deref(), Some("1.9.5"));
}

#[tokio::test]
async fn test_check_tool_parses_aws_cli_banner() {
    let checker = CliEnvironmentChecker::new(RecordingRunner::new(|_, _| {
        ok_output(b"aws-cli/2.17.0 Python/3.11.9 Linux/6.1 exe/x86_64\n")
    }));

    let tool = checker.check_tool("aws").await;

    assert!(tool.found);
    assert_eq!(tool.version.as_deref(), Some("2.17.0"));
}

#[tokio::test]
async fn test_check_tool_failure_is_missing() {
    let checker = CliEnvironmentChecker::new(RecordingRunner::new(|_, _| err_output(127, b"")));

    let tool = checker.check_tool("terraform").await;

    assert!(!tool.found);
    assert_eq!(tool.version, None);
}

#[tokio::test]
async fn test_check_auth_passes_region_and_profile() {
    let runner = RecordingRunner::new(|_, _| {
        ok_output(br#"{"Account":"123456789012","Arn":"arn:aws:iam::123456789012:user/deployer"}"#)
    });
    let checker = CliEnvironmentChecker::new(&runner);

    let auth = checker.check_auth(&profiled_config()).await;

    assert!(auth.authenticated);
    assert_eq!(
        auth.identity.as_deref(),
        Some("arn:aws:iam::123456789012:user/deployer")
    );
    assert_eq!(
        runner.calls(),
        vec!["aws sts get-caller-identity --output json --region eu-west-1 --profile deploy"]
    );
}

#[tokio::test]
async fn test_check_auth_azure_reads_user_name() {
    let checker = CliEnvironmentChecker::new(RecordingRunner::new(|program, _| {
        assert_eq!(program, "az");
        ok_output(br#"{"id":"sub","user":{"name":"dev@example.com","type":"user"}}"#)
    }));
    let config = SiteConfig {
        provider: Provider::Azure,
        ..SiteConfig::default()
    };

    let auth = checker.check_auth(&config).await;

    assert!(auth.authenticated);
    assert_eq!(auth.identity.as_deref(), Some("dev@example.com"));
}

#[tokio::test]
async fn test_check_auth_failure_is_unauthenticated() {
    let checker = CliEnvironmentChecker::new(RecordingRunner::new(|_, _| {
        err_output(255, b"Unable to locate credentials")
    }));

    let auth = checker.check_auth(&SiteConfig::default()).await;

    assert!(!auth.authenticated);
    assert_eq!(auth.identity, None);
}

// ── Object store ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_empty_bucket_command_line_and_timeout() {
    let runner = RecordingRunner::succeeding();
    let store = AwsCliObjectStore::new(&runner);

    store
        .empty_bucket("site-content", &profiled_config())
        .await
        .expect("emptied");

    assert_eq!(
        runner.calls(),
        vec![
            "aws s3 rm s3://site-content --recursive --region eu-west-1 --profile deploy"
        ]
    );
    let timeouts = runner.timeouts.lock().expect("lock");
    assert!(timeouts[0].is_some(), "bucket cleanup must be time-bounded");
}

#[tokio::test]
async fn test_empty_bucket_failure_carries_stderr() {
    let store = AwsCliObjectStore::new(RecordingRunner::new(|_, _| {
        err_output(1, b"An error occurred (AccessDenied)")
    }));

    let err = store
        .empty_bucket("site-content", &SiteConfig::default())
        .await
        .expect_err("fails");

    let msg = err.to_string();
    assert!(msg.contains("site-content"), "{msg}");
    assert!(msg.contains("AccessDenied"), "{msg}");
}
