//! Readiness polling domain types: probe outcomes, policy, and poll sessions.
//!
//! This module is free of I/O and async. The polling loop itself lives in
//! `application::services::readiness`; this file owns the state it mutates.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::target::Target;

// ── Constants ─────────────────────────────────────────────────────────────────

/// Status code that signals a ready site unless overridden.
pub const DEFAULT_READY_STATUS: u16 = 200;
/// Delay between probes unless overridden.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(60);
/// Upper bound on a single poll session unless overridden.
///
/// CloudFront distributions and ACM validation routinely take 15–25 minutes.
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(30 * 60);
/// Per-request timeout for a single probe.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

// ── Probe outcomes ────────────────────────────────────────────────────────────

/// Category of a transport-level probe failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportFailure {
    /// The host name did not resolve.
    Dns,
    /// TCP connection refused or reset.
    Connect,
    /// TLS handshake failed.
    Tls,
    /// The request did not complete within the probe timeout.
    Timeout,
    /// Any other request error.
    Other,
}

impl fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Dns => "DNS resolution failed",
            Self::Connect => "connection failed",
            Self::Tls => "TLS handshake failed",
            Self::Timeout => "request timed out",
            Self::Other => "request failed",
        };
        f.write_str(s)
    }
}

/// Result of a single readiness probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProbeOutcome {
    /// The server answered with this HTTP status code.
    Status { code: u16 },
    /// No HTTP response was received.
    Transport {
        failure: TransportFailure,
        detail: String,
    },
}

impl ProbeOutcome {
    /// Shorthand for a status outcome.
    #[must_use]
    pub fn status(code: u16) -> Self {
        Self::Status { code }
    }

    /// Shorthand for a transport failure outcome.
    #[must_use]
    pub fn transport(failure: TransportFailure, detail: impl Into<String>) -> Self {
        Self::Transport {
            failure,
            detail: detail.into(),
        }
    }

    /// Returns `true` when this outcome is exactly the ready status.
    ///
    /// Every other status (3xx, 4xx, 5xx, and non-matching 2xx) and every
    /// transport failure counts as "not yet ready".
    #[must_use]
    pub fn is_ready(&self, ready_status: u16) -> bool {
        matches!(self, Self::Status { code } if *code == ready_status)
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status { code } => write!(f, "HTTP {code}"),
            Self::Transport { failure, detail } if detail.is_empty() => write!(f, "{failure}"),
            Self::Transport { failure, detail } => write!(f, "{failure}: {detail}"),
        }
    }
}

// ── Policy ────────────────────────────────────────────────────────────────────

/// HTTP method used for probes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeMethod {
    #[default]
    Head,
    Get,
}

impl fmt::Display for ProbeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Head => "HEAD",
            Self::Get => "GET",
        })
    }
}

/// Bounds and timing for a poll session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessPolicy {
    /// Status code that ends the session successfully.
    pub ready_status: u16,
    /// Fixed delay between probes.
    pub interval: Duration,
    /// Total time budget for the session.
    pub max_wait: Duration,
    /// Optional cap on the number of probes.
    pub max_attempts: Option<u32>,
    /// Timeout applied to each individual probe.
    pub probe_timeout: Duration,
    /// Request method.
    pub method: ProbeMethod,
}

impl Default for ReadinessPolicy {
    fn default() -> Self {
        Self {
            ready_status: DEFAULT_READY_STATUS,
            interval: DEFAULT_INTERVAL,
            max_wait: DEFAULT_MAX_WAIT,
            max_attempts: None,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            method: ProbeMethod::Head,
        }
    }
}

/// Floor for the per-probe timeout when almost no budget is left.
const MIN_PROBE_TIMEOUT: Duration = Duration::from_millis(1);

// ── Session ───────────────────────────────────────────────────────────────────

/// Why a session stopped without success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AbortReason {
    /// `max_wait` was reached.
    Deadline,
    /// `max_attempts` probes were issued.
    Attempts,
    /// The caller signalled shutdown.
    Cancelled,
}

/// Lifecycle state of a poll session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Running,
    Succeeded,
    Aborted(AbortReason),
}

impl SessionState {
    /// Returns `true` for `Succeeded` and `Aborted`.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Running)
    }
}

/// Decision taken after recording a probe outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextStep {
    /// The session has ended; stop polling.
    Stop,
    /// Sleep for the given duration, then probe again.
    Sleep(Duration),
}

/// Mutable state of one readiness wait.
///
/// The session never reads a clock itself: callers pass the elapsed time in,
/// so the transitions are deterministic under test.
#[derive(Debug, Clone)]
pub struct PollSession {
    target: Target,
    policy: ReadinessPolicy,
    attempts: u32,
    elapsed: Duration,
    last: Option<ProbeOutcome>,
    state: SessionState,
}

impl PollSession {
    /// Start a new session in the `Running` state.
    #[must_use]
    pub fn new(target: Target, policy: ReadinessPolicy) -> Self {
        Self {
            target,
            policy,
            attempts: 0,
            elapsed: Duration::ZERO,
            last: None,
            state: SessionState::Running,
        }
    }

    /// Record the outcome of a probe taken at `elapsed` since session start and
    /// decide what happens next.
    ///
    /// Calling this on a terminal session is a no-op that returns
    /// [`NextStep::Stop`].
    pub fn record(&mut self, outcome: ProbeOutcome, elapsed: Duration) -> NextStep {
        if self.state.is_terminal() {
            return NextStep::Stop;
        }
        self.attempts += 1;
        self.elapsed = elapsed;
        let ready = outcome.is_ready(self.policy.ready_status);
        self.last = Some(outcome);

        if ready {
            self.state = SessionState::Succeeded;
            return NextStep::Stop;
        }
        if self
            .policy
            .max_attempts
            .is_some_and(|max| self.attempts >= max)
        {
            self.state = SessionState::Aborted(AbortReason::Attempts);
            return NextStep::Stop;
        }
        if elapsed >= self.policy.max_wait {
            self.state = SessionState::Aborted(AbortReason::Deadline);
            return NextStep::Stop;
        }
        let remaining = self.policy.max_wait - elapsed;
        NextStep::Sleep(self.policy.interval.min(remaining))
    }

    /// Timeout for a probe starting at `elapsed`.
    ///
    /// Capped at the remaining budget, so a slow probe cannot carry the
    /// session past `max_wait`. A probe starting at the deadline (after a
    /// clamped sleep) gets at most one interval.
    #[must_use]
    pub fn probe_timeout(&self, elapsed: Duration) -> Duration {
        let remaining = self.policy.max_wait.saturating_sub(elapsed);
        let budget = if remaining.is_zero() {
            self.policy.interval
        } else {
            remaining
        };
        self.policy.probe_timeout.min(budget).max(MIN_PROBE_TIMEOUT)
    }

    /// Mark the session as cancelled at `elapsed`.
    pub fn cancel(&mut self, elapsed: Duration) {
        if !self.state.is_terminal() {
            self.elapsed = elapsed;
            self.state = SessionState::Aborted(AbortReason::Cancelled);
        }
    }

    #[must_use]
    pub fn target(&self) -> &Target {
        &self.target
    }

    #[must_use]
    pub fn policy(&self) -> &ReadinessPolicy {
        &self.policy
    }

    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    #[must_use]
    pub fn last(&self) -> Option<&ProbeOutcome> {
        self.last.as_ref()
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }
}

/// Successful result of a readiness wait.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ready {
    /// URL that answered with the ready status.
    pub url: String,
    /// Probes issued, including the successful one.
    pub attempts: u32,
    /// Time from session start to the successful probe.
    #[serde(rename = "elapsed_secs", serialize_with = "serialize_secs")]
    pub elapsed: Duration,
    /// The ready status observed.
    pub status: u16,
}

#[allow(clippy::trivially_copy_pass_by_ref)] // signature fixed by serde
fn serialize_secs<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}

/// Render a duration as `1h 02m 03s` / `2m 05s` / `7s`.
#[must_use]
pub fn format_elapsed(d: Duration) -> String {
    let secs = d.as_secs();
    let h = secs / 3600;
    let m = (secs % 3600) / 60;
    let s = secs % 60;
    if h > 0 {
        format!("{h}h {m:02}m {s:02}s")
    } else if m > 0 {
        format!("{m}m {s:02}s")
    } else {
        format!("{s}s")
    }
}

// ── Unit tests ────────────────────────────────────────────────────────────────
