//! Adapter for the external `reconstruct` collaborator.

use std::io;
use std::path::Path;
use std::process::Command;

use anyhow::Result;
use tracing::{debug, warn};

use crate::io::config::CollaboratorConfig;
use crate::io::fixtures::Fixture;
use crate::io::process::{CommandOutput, run_command};

/// Runs one fixture through the reconstruction tool and returns its output lines.
///
/// Errors are reported to the caller, which folds them into the fixture's
/// block rather than aborting the run.
pub trait Collaborator {
    fn reconstruct(&self, workdir: &Path, fixture: &Fixture) -> Result<Vec<String>>;
}

/// Invokes the configured command as a child process, one fixture at a time.
#[derive(Debug, Clone)]
pub struct ProcessCollaborator {
    config: CollaboratorConfig,
}

impl ProcessCollaborator {
    pub fn new(config: CollaboratorConfig) -> Self {
        Self { config }
    }

    /// Program name used as the label on folded error lines.
    pub fn program(&self) -> &str {
        self.config
            .command
            .first()
            .map(String::as_str)
            .unwrap_or("reconstruct")
    }

    fn command(&self, workdir: &Path, fixture: &Fixture, niced: bool) -> Command {
        let (program, args) = match self.config.command.split_first() {
            Some((program, args)) => (program.as_str(), args),
            None => ("reconstruct", &[][..]),
        };
        let mut cmd = if niced {
            let mut cmd = Command::new("nice");
            cmd.arg("-n")
                .arg(self.config.niceness.to_string())
                .arg(program);
            cmd
        } else {
            Command::new(program)
        };
        cmd.args(args).arg(&fixture.path).current_dir(workdir);
        cmd
    }

    fn wants_nice(&self) -> bool {
        cfg!(unix) && self.config.niceness != 0
    }

    fn execute(&self, workdir: &Path, fixture: &Fixture) -> Result<CommandOutput> {
        let timeout = self.config.timeout();
        let limit = self.config.output_limit_bytes;
        if self.wants_nice() {
            match run_command(self.command(workdir, fixture, true), timeout, limit) {
                Err(err) if is_not_found(&err) => {
                    debug!("`nice` unavailable, running collaborator directly");
                }
                Ok(output) if nice_could_not_exec(&output) => {
                    debug!("`nice` could not exec the collaborator, retrying directly");
                }
                other => return other,
            }
        }
        run_command(self.command(workdir, fixture, false), timeout, limit)
    }
}

impl Collaborator for ProcessCollaborator {
    fn reconstruct(&self, workdir: &Path, fixture: &Fixture) -> Result<Vec<String>> {
        let output = self.execute(workdir, fixture)?;
        if !output.status.success() && !output.timed_out {
            warn!(
                fixture = %fixture.name,
                exit_code = ?output.status.code(),
                "collaborator exited unsuccessfully"
            );
        }

        let mut lines: Vec<String> = String::from_utf8_lossy(&output.combined())
            .lines()
            .map(str::to_string)
            .collect();
        let truncated = output.truncated_bytes();
        if truncated > 0 {
            lines.push(format!(
                "[{} output truncated {} bytes]",
                self.program(),
                truncated
            ));
        }
        if output.timed_out {
            let secs = self.config.timeout_secs.unwrap_or_default();
            lines.push(format!("[{} timed out after {}s]", self.program(), secs));
        }
        Ok(lines)
    }
}

/// `nice` exits 126/127 with its own diagnostic when the program is missing
/// or not executable. Re-running directly surfaces the real spawn error.
fn nice_could_not_exec(output: &CommandOutput) -> bool {
    !output.timed_out
        && matches!(output.status.code(), Some(126 | 127))
        && output.stdout.is_empty()
        && output.stderr.starts_with(b"nice:")
}

fn is_not_found(err: &anyhow::Error) -> bool {
    err.root_cause()
        .downcast_ref::<io::Error>()
        .is_some_and(|io_err| io_err.kind() == io::ErrorKind::NotFound)
}
