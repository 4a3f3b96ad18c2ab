//! `CommandRunner` over `tokio::process`, used for the terraform, aws and az
//! CLIs.

use std::process::{Output, Stdio};
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, warn};

use crate::application::ports::CommandRunner;

/// Default timeout for short CLI queries (`version`, `sts`, `output`).
pub const DEFAULT_CMD_TIMEOUT: Duration = Duration::from_secs(60);

/// Runs CLI tools with captured output and a hard timeout.
///
/// A command that outlives its timeout is killed before the error is returned,
/// so a hung `aws s3 rm` does not linger after `destroy` gives up.
pub struct TokioCommandRunner {
    timeout: Duration,
}

impl TokioCommandRunner {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for TokioCommandRunner {
    fn default() -> Self {
        Self::new(DEFAULT_CMD_TIMEOUT)
    }
}

impl CommandRunner for TokioCommandRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        self.run_with_timeout(program, args, self.timeout).await
    }

    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output> {
        debug!(program, ?args, "running command");
        let mut child = tokio::process::Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let collect = async {
            let (status, stdout, stderr) =
                tokio::join!(child.wait(), read_all(stdout), read_all(stderr));
            let status = status.with_context(|| format!("waiting for {program}"))?;
            Ok::<_, anyhow::Error>(Output {
                status,
                stdout,
                stderr,
            })
        };

        let finished = tokio::time::timeout(timeout, collect).await;
        if let Ok(output) = finished {
            return output;
        }
        warn!(program, timeout_secs = timeout.as_secs(), "command timed out, killing");
        let _ = child.kill().await;
        anyhow::bail!("{program} timed out after {}s", timeout.as_secs())
    }

    async fn run_status(&self, program: &str, args: &[&str]) -> Result<std::process::ExitStatus> {
        debug!(program, ?args, "running command (inherited stdio)");
        let mut child = tokio::process::Command::new(program)
            .args(args)
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))?;

        child
            .wait()
            .await
            .with_context(|| format!("waiting for {program}"))
    }
}

/// Drain a child pipe. A missing or broken pipe yields what was read so far.
async fn read_all(pipe: Option<impl AsyncRead + Unpin>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        let _ = pipe.read_to_end(&mut buf).await;
    }
    buf
}
