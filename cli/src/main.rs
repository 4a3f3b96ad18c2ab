//! sitedeploy - apply, validate and tear down a static website deployment

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use sitedeploy_cli::cli::Cli;
use sitedeploy_cli::output::json::{error_code, format_error};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let json = cli.json;
    match cli.run().await {
        Ok(code) => code,
        Err(e) => {
            if json {
                match format_error(&e.to_string(), error_code(&e)) {
                    Ok(doc) => println!("{doc}"),
                    Err(fmt_err) => eprintln!("Error: {fmt_err}"),
                }
            }
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so stdout stays clean for `--json`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "error" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .init();
}
