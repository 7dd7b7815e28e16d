//! Infrastructure implementation of the `CommandRunner` port.
//!
//! `TokioCommandRunner` spawns the child in its own process group, drains
//! stdout and stderr concurrently with `wait()`, and on timeout kills the
//! whole group so compose's own children are not left behind.
//!
//! The run ends when the child exits, not when its pipes close: a detached
//! grandchild that keeps stdout open gets `drain_grace` more reading and is
//! then left alone. Each stream keeps at most `output_limit` bytes; the rest
//! is read and discarded so the child never blocks on a full pipe.

use std::io;
use std::path::Path;
use std::pin::pin;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Child;
use tracing::debug;

use crate::application::ports::{CommandRunner, ProcessOutput, RunError};

/// How long to keep reading pipes after the child exited or was killed.
pub const DEFAULT_DRAIN_GRACE: Duration = Duration::from_secs(2);

/// Bytes kept per stream.
pub const DEFAULT_OUTPUT_LIMIT: usize = 16 * 1024 * 1024;

const CHUNK: usize = 8 * 1024;

/// Production `CommandRunner` backed by `tokio::process`.
#[derive(Debug, Clone)]
pub struct TokioCommandRunner {
    drain_grace: Duration,
    output_limit: usize,
}

impl Default for TokioCommandRunner {
    fn default() -> Self {
        Self::new(DEFAULT_DRAIN_GRACE)
    }
}

impl TokioCommandRunner {
    #[must_use]
    pub fn new(drain_grace: Duration) -> Self {
        Self {
            drain_grace,
            output_limit: DEFAULT_OUTPUT_LIMIT,
        }
    }

    /// Cap the bytes kept from each of stdout and stderr.
    #[must_use]
    pub fn with_output_limit(mut self, bytes: usize) -> Self {
        self.output_limit = bytes;
        self
    }
}

impl CommandRunner for TokioCommandRunner {
    async fn run_in(
        &self,
        cwd: &Path,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<ProcessOutput, RunError> {
        ensure_directory(cwd).await?;

        let mut command = tokio::process::Command::new(program);
        command
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        #[cfg(unix)]
        command.process_group(0);

        let mut child = command.spawn().map_err(|source| RunError::Spawn {
            program: program.to_string(),
            source,
        })?;

        let limit = self.output_limit;
        let mut stdout_pipe = child.stdout.take();
        let mut stderr_pipe = child.stderr.take();
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();

        // Each drain appends chunk by chunk, so whatever was read before the
        // deadline cancels it stays in the buffers.
        let deadline = tokio::time::Instant::now() + timeout;
        let exited = {
            let mut drains = pin!(async {
                tokio::join!(
                    drain(stdout_pipe.as_mut(), &mut stdout, limit),
                    drain(stderr_pipe.as_mut(), &mut stderr, limit),
                );
            });
            let waited = tokio::time::timeout_at(deadline, async {
                let status = tokio::select! {
                    status = child.wait() => Some(status),
                    () = &mut drains => None,
                };
                match status {
                    Some(status) => (status, false),
                    None => (child.wait().await, true),
                }
            })
            .await;
            match waited {
                Ok((status, drained)) => {
                    if !drained
                        && tokio::time::timeout(self.drain_grace, &mut drains)
                            .await
                            .is_err()
                    {
                        debug!(program, "pipes still open after exit; output cut off");
                    }
                    Some(status)
                }
                Err(_elapsed) => None,
            }
        };

        if let Some(status) = exited {
            let status = status.map_err(|source| RunError::Wait {
                program: program.to_string(),
                source,
            })?;
            return Ok(ProcessOutput {
                exit_code: status.code(),
                stdout,
                stderr,
                timed_out: false,
            });
        }

        kill_process_group(&mut child).await;
        let _ = tokio::time::timeout(self.drain_grace, async {
            tokio::join!(
                drain(stdout_pipe.as_mut(), &mut stdout, limit),
                drain(stderr_pipe.as_mut(), &mut stderr, limit),
            )
        })
        .await;
        Ok(ProcessOutput {
            exit_code: None,
            stdout,
            stderr,
            timed_out: true,
        })
    }
}

/// Verify `path` exists, is a directory, and can be listed.
async fn ensure_directory(path: &Path) -> Result<(), RunError> {
    let unusable = |reason: String| RunError::WorkingDirectory {
        path: path.to_path_buf(),
        reason,
    };

    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => return Err(unusable("not a directory".to_string())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(unusable("does not exist".to_string()));
        }
        Err(e) => return Err(unusable(e.to_string())),
    }

    tokio::fs::read_dir(path)
        .await
        .map(drop)
        .map_err(|e| unusable(format!("not accessible: {e}")))
}

/// Read `reader` to EOF, keeping at most `limit` bytes in `buf`. Read
/// errors end the drain quietly.
async fn drain<R: AsyncRead + Unpin>(reader: Option<&mut R>, buf: &mut Vec<u8>, limit: usize) {
    let Some(reader) = reader else {
        return;
    };
    let mut chunk = [0u8; CHUNK];
    loop {
        match reader.read(&mut chunk).await {
            Ok(0) => break,
            Ok(n) => {
                let keep = n.min(limit.saturating_sub(buf.len()));
                buf.extend_from_slice(&chunk[..keep]);
            }
            Err(e) => {
                debug!(error = %e, "pipe read failed");
                break;
            }
        }
    }
}

/// SIGKILL the child's process group, then kill and reap the child itself.
async fn kill_process_group(child: &mut Child) {
    #[cfg(unix)]
    if let Some(pid) = child.id().and_then(|pid| i32::try_from(pid).ok()) {
        use nix::sys::signal::{Signal, killpg};
        use nix::unistd::Pid;

        if let Err(e) = killpg(Pid::from_raw(pid), Signal::SIGKILL) {
            debug!(pid, error = %e, "killpg failed");
        }
    }

    if let Err(e) = child.kill().await {
        debug!(error = %e, "child already exited");
    }
}
