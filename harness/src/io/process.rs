//! Child process execution for the collaborator.
//!
//! Both pipes are drained on reader threads while the child runs, keeping at
//! most `output_limit_bytes` of each. When a timeout is set the child leads its
//! own process group, and expiry kills the whole group so that helpers it
//! forked release the pipes too.

use std::io::Read;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use tracing::{debug, instrument, warn};
use wait_timeout::ChildExt;

type Captured = Result<(Vec<u8>, usize)>;

/// What a finished (or killed) child left behind.
#[derive(Debug)]
pub struct CommandOutput {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub stdout_truncated: usize,
    pub stderr_truncated: usize,
    pub timed_out: bool,
}

impl CommandOutput {
    /// Stdout followed by stderr, as a shell `2>&1` capture would append them.
    pub fn combined(&self) -> Vec<u8> {
        let mut combined = self.stdout.clone();
        combined.extend_from_slice(&self.stderr);
        combined
    }

    pub fn truncated_bytes(&self) -> usize {
        self.stdout_truncated + self.stderr_truncated
    }
}

/// Spawn `cmd` with stdin closed and block until it exits or `timeout` expires.
///
/// A nonzero exit is not an error; only failing to spawn or wait is.
#[instrument(skip_all, fields(timeout_secs = timeout.map(|t| t.as_secs()), output_limit_bytes))]
pub fn run_command(
    mut cmd: Command,
    timeout: Option<Duration>,
    output_limit_bytes: usize,
) -> Result<CommandOutput> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if timeout.is_some() {
        lead_own_group(&mut cmd);
    }

    let mut child = cmd.spawn().context("spawn command")?;
    debug!(pid = child.id(), "child spawned");

    let stdout = spawn_reader(child.stdout.take(), output_limit_bytes, "stdout")?;
    let stderr = spawn_reader(child.stderr.take(), output_limit_bytes, "stderr")?;

    let (status, timed_out) = match timeout {
        None => (child.wait().context("wait for command")?, false),
        Some(limit) => match child.wait_timeout(limit).context("wait for command")? {
            Some(status) => (status, false),
            None => {
                warn!(timeout_secs = limit.as_secs(), "command timed out, killing");
                kill_group(&mut child)?;
                (child.wait().context("wait command after kill")?, true)
            }
        },
    };

    let (stdout, stdout_truncated) = collect(stdout).context("join stdout")?;
    let (stderr, stderr_truncated) = collect(stderr).context("join stderr")?;
    if stdout_truncated > 0 || stderr_truncated > 0 {
        warn!(stdout_truncated, stderr_truncated, "output truncated");
    }

    debug!(exit_code = ?status.code(), timed_out, "command finished");
    Ok(CommandOutput {
        status,
        stdout,
        stderr,
        stdout_truncated,
        stderr_truncated,
        timed_out,
    })
}

fn spawn_reader<R: Read + Send + 'static>(
    pipe: Option<R>,
    limit: usize,
    name: &str,
) -> Result<JoinHandle<Captured>> {
    let pipe = pipe.ok_or_else(|| anyhow!("{name} was not piped"))?;
    Ok(thread::spawn(move || drain_limited(pipe, limit)))
}

fn collect(handle: JoinHandle<Captured>) -> Captured {
    handle
        .join()
        .map_err(|_| anyhow!("output reader thread panicked"))?
}

#[cfg(unix)]
fn lead_own_group(cmd: &mut Command) {
    use std::os::unix::process::CommandExt;
    cmd.process_group(0);
}

#[cfg(not(unix))]
fn lead_own_group(_cmd: &mut Command) {}

/// Kill the child's process group, falling back to the child alone.
#[cfg(unix)]
fn kill_group(child: &mut Child) -> Result<()> {
    let group = format!("-{}", child.id());
    let killed = Command::new("kill")
        .args(["-KILL", "--", group.as_str()])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|status| status.success());
    if !killed {
        debug!("process group kill failed, killing child only");
        child.kill().context("kill command")?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn kill_group(child: &mut Child) -> Result<()> {
    child.kill().context("kill command")
}

/// Read `reader` to EOF, keeping the first `limit` bytes and counting the rest.
fn drain_limited<R: Read>(mut reader: R, limit: usize) -> Captured {
    let mut kept = Vec::new();
    let mut dropped = 0usize;
    let mut chunk = [0u8; 8192];
    loop {
        let n = reader.read(&mut chunk).context("read output")?;
        if n == 0 {
            return Ok((kept, dropped));
        }
        let keep = n.min(limit.saturating_sub(kept.len()));
        kept.extend_from_slice(&chunk[..keep]);
        dropped += n - keep;
    }
}
