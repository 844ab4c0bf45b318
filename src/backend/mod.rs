// SPDX-FileCopyrightText: 2026 Patchdeck Authors
// SPDX-License-Identifier: MIT

//! Backend adapters.
//!
//! Each backend is an external command-line tool wrapped behind the same
//! small query/action contract. The UI core never parses command output
//! itself; it only sees structured ports and connections.

use std::fmt;
use std::time::Duration;

use crate::model::{Backend, Connection, Direction, Port};

mod alsa;
mod exec;
mod jack;

pub use alsa::AlsaBackend;
pub use jack::JackBackend;

/// Query and action contract one backend exposes to the UI.
///
/// Both calls are synchronous external-process invocations bounded by a
/// timeout; a hung tool surfaces as [`BackendError::Timeout`] instead of
/// freezing the UI forever.
pub trait PortBackend {
    fn tag(&self) -> Backend;

    /// Current ports for one direction. Rebuilt from scratch on every call.
    fn ports(&self, direction: Direction) -> Result<Vec<Port>, BackendError>;

    /// Currently active connections, in backend-reported order.
    fn connections(&self) -> Result<Vec<Connection>, BackendError>;

    /// Wires `from_id` (source) to `to_id` (destination).
    fn connect(&self, from_id: &str, to_id: &str) -> Result<(), BackendError>;

    /// Tears down the wire between `from_id` and `to_id`.
    fn disconnect(&self, from_id: &str, to_id: &str) -> Result<(), BackendError>;
}

/// The standard backend pair: ALSA sequencer and JACK graph.
pub fn default_backends() -> (Box<dyn PortBackend>, Box<dyn PortBackend>) {
    (Box::new(AlsaBackend::new()), Box::new(JackBackend::new()))
}

/// Bound on every external query/action call.
pub const COMMAND_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The tool could not be started (usually: not installed).
    Spawn { program: String, message: String },
    /// The tool ran but exited unsuccessfully.
    Failed { program: String, code: Option<i32> },
    /// The tool exceeded [`COMMAND_TIMEOUT`] and was killed.
    Timeout { program: String, secs: u64 },
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spawn { program, message } => {
                write!(f, "failed to run {program}: {message}")
            }
            Self::Failed { program, code: Some(code) } => {
                write!(f, "{program} exited with status {code}")
            }
            Self::Failed { program, code: None } => {
                write!(f, "{program} was terminated by a signal")
            }
            Self::Timeout { program, secs } => {
                write!(f, "{program} timed out after {secs}s")
            }
        }
    }
}

impl std::error::Error for BackendError {}
