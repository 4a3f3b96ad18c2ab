//! `sitedeploy validate`: wait for the deployed site to become ready.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::deploy;
use crate::commands::{ReadinessArgs, ctrl_c_shutdown};
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::http_probe::ReqwestProbe;
use crate::infra::terraform::TerraformCli;
use crate::output::TerminalReporter;

/// Run the validate command.
///
/// # Errors
///
/// Returns an error if the site's domain cannot be read from Terraform
/// outputs, or the readiness wait fails.
pub async fn run(app: &AppContext, args: &ReadinessArgs) -> Result<ExitCode> {
    let config = app.config()?;
    let policy = args.policy(&config);
    let infra = TerraformCli::new(TokioCommandRunner::default(), &config.terraform_dir);
    let probe = ReqwestProbe::new()?;

    let ready = {
        let reporter = TerminalReporter::with_spinner(&app.output);
        deploy::validate(&infra, &probe, &config, &policy, &reporter, ctrl_c_shutdown()).await?
    };

    app.renderer().render_ready(&ready)?;
    Ok(ExitCode::SUCCESS)
}
