//! Application service: deployment readiness polling.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! The network and the terminal are reached through injected ports; time is
//! measured with `tokio::time` so tests can run on a paused clock.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::application::ports::{HttpProbe, ProgressReporter};
use crate::domain::readiness::{
    NextStep, PollSession, ProbeMethod, ProbeOutcome, ReadinessPolicy, Ready, SessionState,
    TransportFailure, format_elapsed,
};
use crate::domain::{ReadinessError, Target};

/// A shutdown receiver that never fires.
///
/// For callers that have no cancellation source of their own.
#[must_use]
pub fn no_shutdown() -> watch::Receiver<bool> {
    let (_tx, rx) = watch::channel(false);
    rx
}

/// Validate `url` and wait until it answers with the ready status.
///
/// The URL is checked before any request is made.
///
/// # Errors
///
/// - [`ReadinessError::InvalidTarget`] if `url` is malformed.
/// - [`ReadinessError::TimedOut`] if `policy.max_wait` or `policy.max_attempts`
///   is exhausted.
/// - [`ReadinessError::Cancelled`] if `shutdown` is set to `true`.
pub async fn wait_until_ready(
    url: &str,
    policy: &ReadinessPolicy,
    probe: &impl HttpProbe,
    reporter: &impl ProgressReporter,
    shutdown: watch::Receiver<bool>,
) -> Result<Ready, ReadinessError> {
    let target = Target::parse(url)?;
    wait_for_target(&target, policy, probe, reporter, shutdown).await
}

/// Poll an already-validated target until it is ready.
///
/// Probes are issued one at a time at a fixed interval. Every outcome other
/// than the ready status, including DNS, connection and TLS failures, is
/// logged and retried. The wait between probes and each probe's timeout are
/// clamped to the remaining budget, so the session ends no later than
/// `policy.max_wait` plus one interval.
///
/// # Errors
///
/// - [`ReadinessError::TimedOut`] if the time or attempt bound is exhausted.
/// - [`ReadinessError::Cancelled`] if `shutdown` is set to `true`.
pub async fn wait_for_target(
    target: &Target,
    policy: &ReadinessPolicy,
    probe: &impl HttpProbe,
    reporter: &impl ProgressReporter,
    mut shutdown: watch::Receiver<bool>,
) -> Result<Ready, ReadinessError> {
    let start = Instant::now();
    let mut session = PollSession::new(target.clone(), *policy);

    reporter.step(&format!(
        "waiting for {target} to return HTTP {} (every {}, up to {})",
        policy.ready_status,
        format_elapsed(policy.interval),
        format_elapsed(policy.max_wait),
    ));

    loop {
        let attempt = session.attempts() + 1;
        debug!(url = %target, attempt, method = %policy.method, "probing");

        let timeout = session.probe_timeout(start.elapsed());
        let outcome = tokio::select! {
            biased;
            () = cancelled(&mut shutdown) => {
                return Err(cancel(&mut session, start));
            }
            outcome = probe_bounded(probe, target, policy.method, timeout) => outcome,
        };

        let next = session.record(outcome, start.elapsed());

        match session.state() {
            SessionState::Succeeded => {
                info!(url = %target, attempts = session.attempts(), "target ready");
                let ready = Ready {
                    url: target.url().to_string(),
                    attempts: session.attempts(),
                    elapsed: session.elapsed(),
                    status: policy.ready_status,
                };
                reporter.success(&format!(
                    "{target} is ready (HTTP {} after {} attempt(s), {})",
                    ready.status,
                    ready.attempts,
                    format_elapsed(ready.elapsed),
                ));
                return Ok(ready);
            }
            SessionState::Aborted(reason) => {
                let last = session.last().cloned();
                warn!(
                    url = %target,
                    attempt,
                    outcome = %display_last(last.as_ref()),
                    ?reason,
                    "target not ready, giving up"
                );
                return Err(ReadinessError::TimedOut {
                    attempts: session.attempts(),
                    elapsed: session.elapsed(),
                    last,
                });
            }
            SessionState::Running => {}
        }

        let NextStep::Sleep(delay) = next else {
            continue;
        };
        let last = display_last(session.last());
        warn!(url = %target, attempt, outcome = %last, "target not ready");
        reporter.warn(&format!(
            "attempt {attempt}: {last} ({} elapsed), retrying in {}",
            format_elapsed(session.elapsed()),
            format_elapsed(delay),
        ));

        tokio::select! {
            biased;
            () = cancelled(&mut shutdown) => {
                return Err(cancel(&mut session, start));
            }
            () = tokio::time::sleep(delay) => {}
        }
    }
}

async fn probe_bounded(
    probe: &impl HttpProbe,
    target: &Target,
    method: ProbeMethod,
    timeout: Duration,
) -> ProbeOutcome {
    match tokio::time::timeout(timeout, probe.probe(target, method, timeout)).await {
        Ok(outcome) => outcome,
        Err(_) => ProbeOutcome::transport(
            TransportFailure::Timeout,
            format!("no response within {}", format_elapsed(timeout)),
        ),
    }
}

/// Resolves once `shutdown` holds `true`. Never resolves if the sender is gone.
async fn cancelled(shutdown: &mut watch::Receiver<bool>) {
    if shutdown.wait_for(|stop| *stop).await.is_err() {
        std::future::pending::<()>().await;
    }
}

fn cancel(session: &mut PollSession, start: Instant) -> ReadinessError {
    session.cancel(start.elapsed());
    info!(url = %session.target(), attempts = session.attempts(), "readiness wait cancelled");
    ReadinessError::Cancelled {
        attempts: session.attempts(),
        elapsed: session.elapsed(),
    }
}

fn display_last(last: Option<&ProbeOutcome>) -> String {
    last.map_or_else(|| "no response".to_string(), ToString::to_string)
}
