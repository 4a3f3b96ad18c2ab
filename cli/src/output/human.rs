//! Human-readable terminal renderer.

use std::path::Path;

use owo_colors::OwoColorize as _;

use crate::domain::config::{CONFIG_ENV, SiteConfig, VALID_CONFIG_KEYS, config_value};
use crate::domain::environment::{EnvironmentReport, ToolCheck};
use crate::domain::readiness::{Ready, format_elapsed};
use crate::output::OutputContext;

/// Renders domain types as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render the CLI version.
    pub fn render_version(&self, version: &str) {
        if !self.ctx.quiet {
            println!("sitedeploy {version}");
        }
    }

    /// Render the summary line of a successful readiness wait.
    ///
    /// The poller's reporter already announced success; this adds the
    /// machine-friendly details.
    pub fn render_ready(&self, ready: &Ready) {
        self.ctx.kv("URL:", &ready.url);
        self.ctx.kv("Status:", &format!("HTTP {}", ready.status));
        self.ctx.kv("Attempts:", &ready.attempts.to_string());
        self.ctx.kv("Elapsed:", &format_elapsed(ready.elapsed));
    }

    /// Render environment check results.
    pub fn render_environment(&self, report: &EnvironmentReport, issues: &[String]) {
        if self.ctx.quiet && issues.is_empty() {
            return;
        }
        println!();
        println!("  {}", "Environment Check".style(self.ctx.styles.header));
        println!();

        println!("  Tools:");
        self.render_tool(&report.terraform);
        self.render_tool(&report.provider_cli);
        println!();

        println!("  Credentials ({}):", report.auth.provider);
        if report.auth.authenticated {
            let who = report.auth.identity.as_deref().unwrap_or("authenticated");
            println!("    {} {who}", "✓".style(self.ctx.styles.success));
        } else {
            println!("    {} not authenticated", "✗".style(self.ctx.styles.error));
        }
        println!();

        if issues.is_empty() {
            println!("  {} Ready to deploy.", "✓".style(self.ctx.styles.success));
        } else {
            println!(
                "  {} Found {} issue(s):",
                "⚠".style(self.ctx.styles.warning),
                issues.len()
            );
            for issue in issues {
                println!("    - {issue}");
            }
        }
        println!();
    }

    fn render_tool(&self, tool: &ToolCheck) {
        if tool.found {
            let ver = tool.version.as_deref().unwrap_or("unknown version");
            println!(
                "    {} {} {}",
                "✓".style(self.ctx.styles.success),
                tool.name,
                ver.style(self.ctx.styles.dim)
            );
        } else {
            println!(
                "    {} {} not found",
                "✗".style(self.ctx.styles.error),
                tool.name
            );
        }
    }

    /// Render the result of `apply` or `destroy`.
    pub fn render_deployment(&self, action: &str, emptied_bucket: Option<&str>) {
        if let Some(bucket) = emptied_bucket {
            self.ctx.kv("Emptied bucket:", bucket);
        }
        self.ctx.info(&format!("{action} finished"));
    }

    /// Render the current configuration.
    pub fn render_config(&self, config: &SiteConfig, path: &Path) {
        println!();
        println!(
            "  {}",
            format!("Configuration ({})", path.display()).style(self.ctx.styles.header)
        );
        println!();
        for key in VALID_CONFIG_KEYS {
            let value = config_value(config, key).unwrap_or_default();
            println!("  {:<30} {value}", format!("{key}:"));
        }
        println!();
        println!("  {}", "Environment:".style(self.ctx.styles.bold));
        println!(
            "    {:<18} {}",
            format!("{CONFIG_ENV}:"),
            std::env::var(CONFIG_ENV).unwrap_or_else(|_| "(not set)".to_string())
        );
        println!(
            "    {:<18} {}",
            "NO_COLOR:",
            std::env::var("NO_COLOR").unwrap_or_else(|_| "(not set)".to_string())
        );
        println!();
    }
}
