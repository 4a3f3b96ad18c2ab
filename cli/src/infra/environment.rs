//! Infrastructure implementation of the `EnvironmentChecker` port.
//!
//! Shells out to `terraform`, `aws` and `az` through the `CommandRunner` port.
//! Region and profile come from `SiteConfig` and are passed as arguments.

use crate::application::ports::{CommandRunner, EnvironmentChecker};
use crate::domain::{AuthCheck, Provider, SiteConfig, ToolCheck};

/// Production environment checker backed by the provider CLIs.
pub struct CliEnvironmentChecker<R: CommandRunner> {
    runner: R,
}

impl<R: CommandRunner> CliEnvironmentChecker<R> {
    #[must_use]
    pub fn new(runner: R) -> Self {
        Self { runner }
    }
}

impl<R: CommandRunner> EnvironmentChecker for CliEnvironmentChecker<R> {
    async fn check_tool(&self, tool: &str) -> ToolCheck {
        let args: &[&str] = match tool {
            "terraform" => &["version", "-json"],
            "az" => &["version", "--output", "json"],
            _ => &["--version"],
        };
        let output = match self.runner.run(tool, args).await {
            Ok(output) if output.status.success() => output,
            _ => return ToolCheck::missing(tool),
        };
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        ToolCheck {
            name: tool.to_string(),
            found: true,
            version: parse_tool_version(tool, &stdout, &stderr),
        }
    }

    async fn check_auth(&self, config: &SiteConfig) -> AuthCheck {
        let args = auth_args(config);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        let tool = config.provider.cli_tool();

        let identity = match self.runner.run(tool, &args).await {
            Ok(output) if output.status.success() => {
                Some(parse_identity(config.provider, &output.stdout))
            }
            _ => None,
        };

        AuthCheck {
            provider: config.provider,
            authenticated: identity.is_some(),
            identity: identity.flatten(),
        }
    }
}

/// Arguments for the provider's "who am I" call.
#[must_use]
pub fn auth_args(config: &SiteConfig) -> Vec<String> {
    match config.provider {
        Provider::Aws => {
            let mut args = vec![
                "sts".to_string(),
                "get-caller-identity".to_string(),
                "--output".to_string(),
                "json".to_string(),
            ];
            args.extend(aws_scope_args(config));
            args
        }
        Provider::Azure => vec![
            "account".to_string(),
            "show".to_string(),
            "--output".to_string(),
            "json".to_string(),
        ],
    }
}

/// `--region` / `--profile` arguments for any `aws` invocation.
#[must_use]
pub fn aws_scope_args(config: &SiteConfig) -> Vec<String> {
    let mut args = vec!["--region".to_string(), config.region.clone()];
    if let Some(profile) = &config.profile {
        args.push("--profile".to_string());
        args.push(profile.clone());
    }
    args
}

fn parse_identity(provider: Provider, stdout: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(stdout).ok()?;
    let identity = match provider {
        Provider::Aws => value.get("Arn"),
        Provider::Azure => value.get("user").and_then(|u| u.get("name")),
    };
    identity.and_then(|v| v.as_str()).map(str::to_owned)
}

fn parse_tool_version(tool: &str, stdout: &str, stderr: &str) -> Option<String> {
    match tool {
        "terraform" => serde_json::from_str::<serde_json::Value>(stdout)
            .ok()?
            .get("terraform_version")?
            .as_str()
            .map(str::to_owned),
        "az" => serde_json::from_str::<serde_json::Value>(stdout)
            .ok()?
            .get("azure-cli")?
            .as_str()
            .map(str::to_owned),
        // `aws-cli/2.17.0 Python/3.11.9 Linux/6.1 exe/x86_64` (v1 printed to stderr)
        _ => {
            let line = if stdout.trim().is_empty() { stderr } else { stdout };
            line.split_whitespace()
                .next()
                .and_then(|first| first.split_once('/'))
                .map(|(_, ver)| ver.to_string())
        }
    }
}
