//! `sitedeploy destroy`: empty the content bucket and destroy the infrastructure.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::deploy;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::environment::CliEnvironmentChecker;
use crate::infra::object_store::AwsCliObjectStore;
use crate::infra::terraform::TerraformCli;
use crate::output::TerminalReporter;

/// Run the destroy command.
///
/// # Errors
///
/// Returns an error if the environment is not ready, the bucket cannot be
/// emptied, or `terraform destroy` fails.
pub async fn run(app: &AppContext) -> Result<ExitCode> {
    let config = app.config()?;

    if !app.confirm(&format!(
        "Destroy all infrastructure in '{}' ({}, {})?",
        config.terraform_dir, config.provider, config.region
    ))? {
        app.output.info("Cancelled.");
        return Ok(ExitCode::SUCCESS);
    }

    let env = CliEnvironmentChecker::new(TokioCommandRunner::default());
    let infra = TerraformCli::new(TokioCommandRunner::default(), &config.terraform_dir);
    let store = AwsCliObjectStore::new(TokioCommandRunner::default());

    let reporter = TerminalReporter::new(&app.output);
    let summary = deploy::destroy(&env, &infra, &store, &config, &reporter).await?;

    app.renderer()
        .render_deployment("destroy", summary.emptied_bucket.as_deref())?;
    Ok(ExitCode::SUCCESS)
}
