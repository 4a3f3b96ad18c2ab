//! Terraform infrastructure: implements `InfraBackend` over `CommandRunner`.

use anyhow::Result;

use crate::application::ports::{CommandRunner, InfraBackend};
use crate::domain::DeployError;

/// Drives the `terraform` binary in a fixed working directory.
pub struct TerraformCli<R: CommandRunner> {
    runner: R,
    chdir: String,
}

impl<R: CommandRunner> TerraformCli<R> {
    #[must_use]
    pub fn new(runner: R, dir: &str) -> Self {
        Self {
            runner,
            chdir: format!("-chdir={dir}"),
        }
    }

    /// Build the argument list for `step`, e.g. `-chdir=infra apply -auto-approve ...`.
    #[must_use]
    pub fn args(&self, step: &str, extra: &[&str], vars: &[(&str, &str)]) -> Vec<String> {
        let mut args = vec![self.chdir.clone(), step.to_string()];
        args.extend(extra.iter().map(ToString::to_string));
        for (k, v) in vars {
            args.push("-var".to_string());
            args.push(format!("{k}={v}"));
        }
        args
    }

    async fn run_step(&self, step: &'static str, args: Vec<String>) -> Result<()> {
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        let status = self.runner.run_status("terraform", &args).await?;
        if !status.success() {
            return Err(DeployError::StepFailed {
                step,
                code: status.code().unwrap_or(-1),
                stderr: String::new(),
            }
            .into());
        }
        Ok(())
    }
}

impl<R: CommandRunner> InfraBackend for TerraformCli<R> {
    async fn init(&self) -> Result<()> {
        self.run_step("init", self.args("init", &["-input=false"], &[]))
            .await
    }

    async fn apply(&self, vars: &[(&str, &str)]) -> Result<()> {
        self.run_step(
            "apply",
            self.args("apply", &["-auto-approve", "-input=false"], vars),
        )
        .await
    }

    async fn destroy(&self, vars: &[(&str, &str)]) -> Result<()> {
        self.run_step(
            "destroy",
            self.args("destroy", &["-auto-approve", "-input=false"], vars),
        )
        .await
    }

    async fn output(&self, name: &str) -> Result<Option<String>> {
        let args = self.args("output", &["-raw", name], &[]);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        let output = self.runner.run("terraform", &args).await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if is_missing_output(&stderr) {
                return Ok(None);
            }
            return Err(DeployError::StepFailed {
                step: "output",
                code: output.status.code().unwrap_or(-1),
                stderr: stderr.into_owned(),
            }
            .into());
        }
        let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok((!value.is_empty()).then_some(value))
    }
}

/// `output -raw` reports an undefined output or an empty state this way.
/// Anything else (no init, wrong directory, state lock) is a real failure.
fn is_missing_output(stderr: &str) -> bool {
    let stderr = stderr.to_ascii_lowercase();
    stderr.contains("not found") || stderr.contains("no outputs found")
}
