//! Shared test helpers: exit statuses, output constructors and fixtures.

#![allow(dead_code)]

use std::process::{ExitStatus, Output};
use std::time::Duration;

use sitedeploy_cli::domain::{ProbeMethod, ReadinessPolicy};

// ── Cross-platform ExitStatus construction ───────────────────────────────────

/// Build an `ExitStatus` from a logical exit code (0 = success, non-zero = failure).
///
/// On Unix the raw wait-status encodes the exit code in bits 8–15, so we shift.
/// On Windows `ExitStatusExt::from_raw` takes the exit code directly.
#[cfg(unix)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(code << 8)
}

#[cfg(windows)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    #[allow(clippy::cast_sign_loss)]
    ExitStatus::from_raw(code as u32)
}

// ── Output constructors ──────────────────────────────────────────────────────

pub fn ok_output(stdout: &[u8]) -> Output {
    Output {
        status: exit_status(0),
        stdout: stdout.to_vec(),
        stderr: Vec::new(),
    }
}

pub fn err_output(code: i32, stderr: &[u8]) -> Output {
    Output {
        status: exit_status(code),
        stdout: Vec::new(),
        stderr: stderr.to_vec(),
    }
}

// ── Fixtures ─────────────────────────────────────────────────────────────────

/// Poll every `interval_secs` for up to `max_wait_secs`, no attempt cap.
pub fn policy(interval_secs: u64, max_wait_secs: u64) -> ReadinessPolicy {
    ReadinessPolicy {
        ready_status: 200,
        interval: Duration::from_secs(interval_secs),
        max_wait: Duration::from_secs(max_wait_secs),
        max_attempts: None,
        probe_timeout: Duration::from_secs(10),
        method: ProbeMethod::Head,
    }
}

pub fn secs(n: u64) -> Duration {
    Duration::from_secs(n)
}
