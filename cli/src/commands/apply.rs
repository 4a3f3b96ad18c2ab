//! `sitedeploy apply`: create or update the infrastructure.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::deploy;
use crate::commands::{ReadinessArgs, ctrl_c_shutdown};
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::environment::CliEnvironmentChecker;
use crate::infra::http_probe::ReqwestProbe;
use crate::infra::terraform::TerraformCli;
use crate::output::TerminalReporter;

/// Arguments for `sitedeploy apply`.
#[derive(Args)]
pub struct ApplyArgs {
    /// Wait for the site to become ready once applied
    #[arg(long)]
    pub wait: bool,

    #[command(flatten)]
    pub readiness: ReadinessArgs,
}

/// Run the apply command.
///
/// # Errors
///
/// Returns an error if the environment is not ready, a Terraform step fails,
/// or `--wait` was given and the site never became ready.
pub async fn run(app: &AppContext, args: &ApplyArgs) -> Result<ExitCode> {
    let config = app.config()?;
    let env = CliEnvironmentChecker::new(TokioCommandRunner::default());
    let infra = TerraformCli::new(TokioCommandRunner::default(), &config.terraform_dir);

    // Terraform writes to the terminal, so no spinner here.
    let reporter = TerminalReporter::new(&app.output);
    deploy::apply(&env, &infra, &config, &reporter).await?;

    if !args.wait {
        app.renderer().render_deployment("apply", None)?;
        return Ok(ExitCode::SUCCESS);
    }

    let policy = args.readiness.policy(&config);
    let probe = ReqwestProbe::new()?;
    let ready = {
        let reporter = TerminalReporter::with_spinner(&app.output);
        deploy::validate(&infra, &probe, &config, &policy, &reporter, ctrl_c_shutdown()).await?
    };

    app.renderer().render_ready(&ready)?;
    Ok(ExitCode::SUCCESS)
}
