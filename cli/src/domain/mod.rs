//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, or `std::process`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod environment;
pub mod error;
pub mod readiness;
pub mod target;

pub use config::{
    Provider, ReadinessConfig, SiteConfig, apply_config_value, validate_config_key,
    validate_config_value,
};
pub use environment::{AuthCheck, EnvironmentReport, ToolCheck, collect_issues, require_ready};
pub use error::{ConfigError, DeployError, EnvironmentError, ReadinessError};
pub use readiness::{
    PollSession, ProbeMethod, ProbeOutcome, ReadinessPolicy, Ready, SessionState,
    TransportFailure,
};
pub use target::Target;
