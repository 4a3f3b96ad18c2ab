//! Domain types and validators for sitedeploy configuration.
//!
//! Pure functions only, no I/O.

use std::fmt;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;
use crate::domain::readiness::{
    DEFAULT_INTERVAL, DEFAULT_MAX_WAIT, DEFAULT_PROBE_TIMEOUT, DEFAULT_READY_STATUS, ProbeMethod,
    ReadinessPolicy,
};
use crate::domain::target::validate_domain;

// ── Constants ────────────────────────────────────────────────────────────────

pub const VALID_CONFIG_KEYS: &[&str] = &[
    "provider",
    "region",
    "profile",
    "terraform_dir",
    "domain_output",
    "bucket_output",
    "readiness.ready_status",
    "readiness.interval_secs",
    "readiness.max_wait_secs",
    "readiness.max_attempts",
    "readiness.probe_timeout_secs",
    "readiness.method",
];
pub const VALID_PROVIDERS: &[&str] = &["aws", "azure"];
pub const VALID_METHODS: &[&str] = &["head", "get"];

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV: &str = "SITEDEPLOY_CONFIG";

/// Value accepted by optional keys to clear them.
pub const UNSET: &str = "none";

// ── Config schema ────────────────────────────────────────────────────────────

/// Cloud provider hosting the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    Aws,
    Azure,
}

impl Provider {
    /// Name of the provider's command-line tool.
    #[must_use]
    pub fn cli_tool(self) -> &'static str {
        match self {
            Self::Aws => "aws",
            Self::Azure => "az",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Aws => "aws",
            Self::Azure => "azure",
        })
    }
}

/// Top-level configuration stored in `~/.sitedeploy/config.yaml`.
///
/// Region and profile are carried here and handed to every operation
/// explicitly; nothing reads them from the process environment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SiteConfig {
    /// Cloud provider: `aws` (default) or `azure`.
    pub provider: Provider,
    /// Provider region, e.g. `us-east-1`.
    pub region: String,
    /// Named CLI profile, if any.
    pub profile: Option<String>,
    /// Directory containing the Terraform configuration.
    pub terraform_dir: String,
    /// Terraform output holding the site's domain name.
    pub domain_output: String,
    /// Terraform output holding the content bucket name.
    pub bucket_output: String,
    /// Readiness polling settings.
    pub readiness: ReadinessConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            provider: Provider::Aws,
            region: "us-east-1".to_string(),
            profile: None,
            terraform_dir: ".".to_string(),
            domain_output: "domain_name".to_string(),
            bucket_output: "bucket_name".to_string(),
            readiness: ReadinessConfig::default(),
        }
    }
}

/// Readiness polling settings, in whole seconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ReadinessConfig {
    pub ready_status: u16,
    pub interval_secs: u64,
    pub max_wait_secs: u64,
    pub max_attempts: Option<u32>,
    pub probe_timeout_secs: u64,
    pub method: ProbeMethod,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            ready_status: DEFAULT_READY_STATUS,
            interval_secs: DEFAULT_INTERVAL.as_secs(),
            max_wait_secs: DEFAULT_MAX_WAIT.as_secs(),
            max_attempts: None,
            probe_timeout_secs: DEFAULT_PROBE_TIMEOUT.as_secs(),
            method: ProbeMethod::Head,
        }
    }
}

impl ReadinessConfig {
    /// Convert to the runtime policy used by the poller.
    #[must_use]
    pub fn policy(&self) -> ReadinessPolicy {
        ReadinessPolicy {
            ready_status: self.ready_status,
            // A hand-edited 0 would poll in a tight loop.
            interval: Duration::from_secs(self.interval_secs.max(1)),
            max_wait: Duration::from_secs(self.max_wait_secs),
            max_attempts: self.max_attempts,
            probe_timeout: Duration::from_secs(self.probe_timeout_secs),
            method: self.method,
        }
    }
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates a configuration key against the whitelist.
///
/// # Errors
///
/// Returns an error if the key is not in the allowed list.
pub fn validate_config_key(key: &str) -> Result<()> {
    if !VALID_CONFIG_KEYS.contains(&key) {
        return Err(ConfigError::UnknownKey {
            key: key.to_string(),
            valid: VALID_CONFIG_KEYS.join(", "),
        }
        .into());
    }
    Ok(())
}

/// Validates a configuration value for the given key.
///
/// # Errors
///
/// Returns an error if the value is not valid for the key.
pub fn validate_config_value(key: &str, value: &str) -> Result<()> {
    let ok = match key {
        "provider" => VALID_PROVIDERS.contains(&value),
        "readiness.method" => VALID_METHODS.contains(&value),
        "region" => is_region(value),
        "profile" | "terraform_dir" => !value.trim().is_empty(),
        "domain_output" | "bucket_output" => is_output_name(value),
        "readiness.ready_status" => value
            .parse::<u16>()
            .is_ok_and(|code| (100..=599).contains(&code)),
        "readiness.max_wait_secs" => value.parse::<u64>().is_ok(),
        "readiness.interval_secs" | "readiness.probe_timeout_secs" => {
            value.parse::<u64>().is_ok_and(|n| n > 0)
        }
        "readiness.max_attempts" => {
            value == UNSET || value.parse::<u32>().is_ok_and(|n| n > 0)
        }
        _ => true,
    };
    if ok {
        return Ok(());
    }
    Err(ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        valid: valid_values_hint(key),
    }
    .into())
}

/// Apply a validated `key = value` to `config`.
///
/// # Errors
///
/// Returns an error if the key or value fails validation.
pub fn apply_config_value(config: &mut SiteConfig, key: &str, value: &str) -> Result<()> {
    validate_config_key(key)?;
    validate_config_value(key, value)?;

    // Parses below cannot fail: `validate_config_value` checked them.
    match key {
        "provider" => {
            config.provider = if value == "azure" {
                Provider::Azure
            } else {
                Provider::Aws
            };
        }
        "region" => config.region = value.to_string(),
        "profile" => {
            config.profile = (value != UNSET).then(|| value.to_string());
        }
        "terraform_dir" => config.terraform_dir = value.to_string(),
        "domain_output" => config.domain_output = value.to_string(),
        "bucket_output" => config.bucket_output = value.to_string(),
        "readiness.ready_status" => config.readiness.ready_status = value.parse()?,
        "readiness.interval_secs" => config.readiness.interval_secs = value.parse()?,
        "readiness.max_wait_secs" => config.readiness.max_wait_secs = value.parse()?,
        "readiness.probe_timeout_secs" => config.readiness.probe_timeout_secs = value.parse()?,
        "readiness.max_attempts" => {
            config.readiness.max_attempts = if value == UNSET {
                None
            } else {
                Some(value.parse()?)
            };
        }
        "readiness.method" => {
            config.readiness.method = if value == "get" {
                ProbeMethod::Get
            } else {
                ProbeMethod::Head
            };
        }
        _ => anyhow::bail!("Unknown setting: {key}"),
    }
    Ok(())
}

/// Read a single configuration value as a display string.
#[must_use]
pub fn config_value(config: &SiteConfig, key: &str) -> Option<String> {
    let value = match key {
        "provider" => config.provider.to_string(),
        "region" => config.region.clone(),
        "profile" => config.profile.clone().unwrap_or_else(|| UNSET.to_string()),
        "terraform_dir" => config.terraform_dir.clone(),
        "domain_output" => config.domain_output.clone(),
        "bucket_output" => config.bucket_output.clone(),
        "readiness.ready_status" => config.readiness.ready_status.to_string(),
        "readiness.interval_secs" => config.readiness.interval_secs.to_string(),
        "readiness.max_wait_secs" => config.readiness.max_wait_secs.to_string(),
        "readiness.max_attempts" => config
            .readiness
            .max_attempts
            .map_or_else(|| UNSET.to_string(), |n| n.to_string()),
        "readiness.probe_timeout_secs" => config.readiness.probe_timeout_secs.to_string(),
        "readiness.method" => match config.readiness.method {
            ProbeMethod::Head => "head".to_string(),
            ProbeMethod::Get => "get".to_string(),
        },
        _ => return None,
    };
    Some(value)
}

fn valid_values_hint(key: &str) -> String {
    match key {
        "provider" => VALID_PROVIDERS.join(", "),
        "readiness.method" => VALID_METHODS.join(", "),
        "region" => "lowercase region name, e.g. us-east-1 or westeurope".to_string(),
        "domain_output" | "bucket_output" => "a Terraform output name".to_string(),
        "readiness.ready_status" => "an HTTP status code (100-599)".to_string(),
        "readiness.interval_secs" | "readiness.probe_timeout_secs" => {
            "a positive number of seconds".to_string()
        }
        "readiness.max_attempts" => format!("a positive integer or '{UNSET}'"),
        "readiness.max_wait_secs" => "a number of seconds".to_string(),
        _ => "a non-empty value".to_string(),
    }
}

fn is_region(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

fn is_output_name(value: &str) -> bool {
    // Terraform identifiers; reuse the DNS-label check after mapping `_` to `-`.
    !value.is_empty() && !value.contains('.') && validate_domain(&value.replace('_', "-"))
}

// ── Unit tests ───────────────────────────────────────────────────────────────
