// SPDX-FileCopyrightText: 2026 Patchdeck Authors
// SPDX-License-Identifier: MIT

//! JACK graph backend, wrapping `jack_lsp` / `jack_connect` /
//! `jack_disconnect`.
//!
//! JACK ports are graph-wide unique names. `jack_lsp` prints one port per
//! line with no direction flag, so direction is inferred from the name:
//! `capture`/`input` names list as inputs, `playback`/`output` names as
//! outputs, and anything unclassifiable shows up in both panels rather than
//! being hidden.

use std::time::Duration;

use super::exec::{run_capture, run_checked};
use super::{BackendError, PortBackend, COMMAND_TIMEOUT};
use crate::model::{Backend, Connection, Direction, Port};

const JACK_LSP: &str = "jack_lsp";
const JACK_CONNECT: &str = "jack_connect";
const JACK_DISCONNECT: &str = "jack_disconnect";

#[derive(Debug, Clone)]
pub struct JackBackend {
    timeout: Duration,
}

impl JackBackend {
    pub fn new() -> Self {
        Self { timeout: COMMAND_TIMEOUT }
    }
}

impl Default for JackBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl PortBackend for JackBackend {
    fn tag(&self) -> Backend {
        Backend::Jack
    }

    fn ports(&self, direction: Direction) -> Result<Vec<Port>, BackendError> {
        let output = run_capture(JACK_LSP, &[], self.timeout)?;
        Ok(classify_ports(&output, direction))
    }

    fn connections(&self) -> Result<Vec<Connection>, BackendError> {
        let output = run_capture(JACK_LSP, &["--connections"], self.timeout)?;
        Ok(parse_connections(&output))
    }

    fn connect(&self, from_id: &str, to_id: &str) -> Result<(), BackendError> {
        run_checked(JACK_CONNECT, &[from_id, to_id], self.timeout)
    }

    fn disconnect(&self, from_id: &str, to_id: &str) -> Result<(), BackendError> {
        run_checked(JACK_DISCONNECT, &[from_id, to_id], self.timeout)
    }
}

/// Splits a plain `jack_lsp` listing into ports for one direction.
///
/// Each side is deduplicated preserving first-seen order; `jack_lsp` can
/// repeat a name when aliases are configured.
fn classify_ports(output: &str, direction: Direction) -> Vec<Port> {
    let mut seen = std::collections::HashSet::new();
    let mut ports = Vec::new();

    for line in output.lines() {
        let name = line.trim();
        if name.is_empty() {
            continue;
        }
        let lower = name.to_lowercase();
        let matches_direction = if lower.contains("capture") || lower.contains("input") {
            direction == Direction::Input
        } else if lower.contains("playback") || lower.contains("output") {
            direction == Direction::Output
        } else {
            true
        };
        if matches_direction && seen.insert(name.to_owned()) {
            ports.push(Port::new(Backend::Jack, direction, name, name));
        }
    }

    ports
}

/// Parses `jack_lsp --connections` output.
///
/// The listing is grouped: an unindented line names a source port and the
/// indented lines below it name its destinations.
fn parse_connections(output: &str) -> Vec<Connection> {
    let mut connections = Vec::new();
    let mut current_source: Option<String> = None;

    for line in output.lines() {
        if line.is_empty() {
            continue;
        }
        if !line.starts_with(' ') {
            current_source = Some(line.trim().to_owned());
        } else if let Some(source) = &current_source {
            let dest = line.trim();
            if !dest.is_empty() {
                connections.push(Connection::new(Backend::Jack, source.clone(), dest));
            }
        }
    }

    connections
}
