//! `sitedeploy wait`: poll a URL until it is ready.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::readiness::wait_until_ready;
use crate::commands::{ReadinessArgs, ctrl_c_shutdown};
use crate::infra::http_probe::ReqwestProbe;
use crate::output::TerminalReporter;

/// Arguments for `sitedeploy wait`.
#[derive(Args)]
pub struct WaitArgs {
    /// URL to poll, e.g. https://example.com
    pub url: String,

    #[command(flatten)]
    pub readiness: ReadinessArgs,
}

/// Run the wait command.
///
/// # Errors
///
/// Returns an error if the URL is invalid, the wait times out, or it is
/// interrupted with Ctrl-C.
pub async fn run(app: &AppContext, args: &WaitArgs) -> Result<ExitCode> {
    let config = app.config()?;
    let policy = args.readiness.policy(&config);
    let probe = ReqwestProbe::new()?;

    let ready = {
        let reporter = TerminalReporter::with_spinner(&app.output);
        wait_until_ready(&args.url, &policy, &probe, &reporter, ctrl_c_shutdown()).await?
    };

    app.renderer().render_ready(&ready)?;
    Ok(ExitCode::SUCCESS)
}
