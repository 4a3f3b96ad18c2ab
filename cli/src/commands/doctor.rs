//! `sitedeploy doctor`: check tools and cloud credentials.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::environment::check_environment;
use crate::domain::collect_issues;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::environment::CliEnvironmentChecker;
use crate::output::TerminalReporter;

/// Run the doctor command.
///
/// Exits with status 1 when any issue is found.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded or JSON rendering fails.
pub async fn run(app: &AppContext) -> Result<ExitCode> {
    let config = app.config()?;
    let checker = CliEnvironmentChecker::new(TokioCommandRunner::default());

    let report = {
        let reporter = TerminalReporter::with_spinner(&app.output);
        check_environment(&checker, &config, &reporter).await
    };
    let issues = collect_issues(&report);

    app.renderer().render_environment(&report, &issues)?;

    if issues.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
