//! External tool execution with an optional timeout.

use crate::error::ReadError;
use std::io::Read;
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::debug;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// How long a killed tool's pipe readers get to reach end of file
const DRAIN_GRACE: Duration = Duration::from_millis(250);

/// Run a tool to completion and return its stdout.
///
/// The process is killed once `timeout` elapses. A non-zero exit status is
/// reported with the tool's stderr.
pub fn run_tool(
    mut cmd: Command,
    tool: &str,
    timeout: Option<Duration>,
) -> Result<Vec<u8>, ReadError> {
    debug!("Running {:?}", cmd);

    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| ReadError::Spawn {
            tool: tool.to_string(),
            source,
        })?;

    // Drain both pipes on their own threads so a chatty tool cannot block on a full pipe
    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    let status = match timeout {
        Some(timeout) => {
            let deadline = Instant::now() + timeout;
            loop {
                match child.try_wait() {
                    Ok(Some(status)) => break status,
                    Ok(None) if Instant::now() >= deadline => {
                        let _ = child.kill();
                        let _ = child.wait();
                        settle(tool, [stdout, stderr]);
                        return Err(ReadError::Timeout {
                            tool: tool.to_string(),
                            timeout,
                        });
                    }
                    Ok(None) => thread::sleep(POLL_INTERVAL),
                    Err(source) => {
                        let _ = child.kill();
                        let _ = child.wait();
                        settle(tool, [stdout, stderr]);
                        return Err(ReadError::Spawn {
                            tool: tool.to_string(),
                            source,
                        });
                    }
                }
            }
        }
        None => child.wait().map_err(|source| ReadError::Spawn {
            tool: tool.to_string(),
            source,
        })?,
    };

    let stdout = stdout.join().unwrap_or_default();
    let stderr = stderr.join().unwrap_or_default();

    if !status.success() {
        return Err(ReadError::ToolFailed {
            tool: tool.to_string(),
            code: status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&stderr).trim().to_string(),
        });
    }

    Ok(stdout)
}

/// Join the pipe readers of a killed tool, waiting at most `DRAIN_GRACE`.
///
/// A grandchild that inherited the pipes keeps them open after the tool
/// dies; readers still blocked on it are detached and end with it.
fn settle(tool: &str, drains: [JoinHandle<Vec<u8>>; 2]) {
    let deadline = Instant::now() + DRAIN_GRACE;
    for handle in drains {
        while !handle.is_finished() && Instant::now() < deadline {
            thread::sleep(POLL_INTERVAL);
        }
        if handle.is_finished() {
            let _ = handle.join();
        } else {
            debug!("Detaching {} output reader still held open", tool);
        }
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buffer = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buffer);
        }
        buffer
    })
}
