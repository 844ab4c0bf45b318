// SPDX-FileCopyrightText: 2026 Patchdeck Authors
// SPDX-License-Identifier: MIT

//! Bounded external command execution.
//!
//! `aconnect` and the JACK tools talk to sound servers and can hang when a
//! server is wedged; every invocation here is killed once it exceeds its
//! timeout so the single-threaded UI never blocks indefinitely.

use std::io::Read;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use super::BackendError;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Runs `program` with `args`, capturing stdout. stderr is discarded (the
/// JACK tools are noisy on stderr even on success).
///
/// Returns the captured stdout on a zero exit status.
pub(crate) fn run_capture(
    program: &str,
    args: &[&str],
    timeout: Duration,
) -> Result<String, BackendError> {
    let (stdout, code, success) = run(program, args, timeout)?;
    if !success {
        return Err(BackendError::Failed { program: program.to_owned(), code });
    }
    Ok(stdout)
}

/// Runs `program` with `args` for its side effect, discarding output.
pub(crate) fn run_checked(
    program: &str,
    args: &[&str],
    timeout: Duration,
) -> Result<(), BackendError> {
    let (_, code, success) = run(program, args, timeout)?;
    if !success {
        return Err(BackendError::Failed { program: program.to_owned(), code });
    }
    Ok(())
}

fn run(
    program: &str,
    args: &[&str],
    timeout: Duration,
) -> Result<(String, Option<i32>, bool), BackendError> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|err| BackendError::Spawn {
            program: program.to_owned(),
            message: err.to_string(),
        })?;

    // Drain stdout on a helper thread so a chatty child cannot deadlock on a
    // full pipe while we poll for exit.
    let stdout_pipe = child.stdout.take();
    let reader = thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = stdout_pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        buf
    });

    let deadline = Instant::now() + timeout;
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {
                if Instant::now() >= deadline {
                    let _ = child.kill();
                    let _ = child.wait();
                    let _ = reader.join();
                    return Err(BackendError::Timeout {
                        program: program.to_owned(),
                        secs: timeout.as_secs(),
                    });
                }
                thread::sleep(POLL_INTERVAL);
            }
            Err(err) => {
                let _ = child.kill();
                let _ = child.wait();
                let _ = reader.join();
                return Err(BackendError::Spawn {
                    program: program.to_owned(),
                    message: err.to_string(),
                });
            }
        }
    };

    let bytes = reader.join().unwrap_or_default();
    let stdout = String::from_utf8_lossy(&bytes).into_owned();
    Ok((stdout, status.code(), status.success()))
}
