//! Command implementations

pub mod apply;
pub mod config;
pub mod destroy;
pub mod doctor;
pub mod validate;
pub mod version;
pub mod wait;

use std::time::Duration;

use clap::{Args, ValueEnum};
use tokio::sync::watch;

use crate::domain::{ProbeMethod, ReadinessPolicy, SiteConfig};

/// Request method accepted on the command line.
#[derive(Clone, Copy, ValueEnum)]
pub enum MethodArg {
    Head,
    Get,
}

/// Readiness polling overrides shared by `wait`, `validate` and `apply --wait`.
///
/// Unset flags fall back to the `readiness` section of the config file.
#[derive(Args, Default)]
pub struct ReadinessArgs {
    /// Status code that means the site is ready
    #[arg(long, value_name = "CODE", value_parser = clap::value_parser!(u16).range(100..=599))]
    pub ready_status: Option<u16>,

    /// Seconds between probes
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: Option<u64>,

    /// Give up after this many seconds
    #[arg(long, value_name = "SECS")]
    pub max_wait: Option<u64>,

    /// Give up after this many probes
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub max_attempts: Option<u32>,

    /// Per-probe request timeout in seconds
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub probe_timeout: Option<u64>,

    /// HTTP method used for probes
    #[arg(long, value_enum)]
    pub method: Option<MethodArg>,
}

impl ReadinessArgs {
    /// Overlay these flags on the configured policy.
    #[must_use]
    pub fn policy(&self, config: &SiteConfig) -> ReadinessPolicy {
        let mut policy = config.readiness.policy();
        if let Some(code) = self.ready_status {
            policy.ready_status = code;
        }
        if let Some(secs) = self.interval {
            policy.interval = Duration::from_secs(secs);
        }
        if let Some(secs) = self.max_wait {
            policy.max_wait = Duration::from_secs(secs);
        }
        if let Some(n) = self.max_attempts {
            policy.max_attempts = Some(n);
        }
        if let Some(secs) = self.probe_timeout {
            policy.probe_timeout = Duration::from_secs(secs);
        }
        if let Some(method) = self.method {
            policy.method = match method {
                MethodArg::Head => ProbeMethod::Head,
                MethodArg::Get => ProbeMethod::Get,
            };
        }
        policy
    }
}

/// A shutdown signal that fires on Ctrl-C.
#[must_use]
pub fn ctrl_c_shutdown() -> watch::Receiver<bool> {
    let (tx, rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = tx.send(true);
        }
    });
    rx
}
