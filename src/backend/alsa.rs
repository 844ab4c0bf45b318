// SPDX-FileCopyrightText: 2026 Patchdeck Authors
// SPDX-License-Identifier: MIT

//! ALSA sequencer backend, wrapping `aconnect`.
//!
//! Ports are addressed as `client:port` number pairs. `aconnect -i`/`-o`
//! list readable/writable ports grouped under client header lines;
//! `aconnect -l` lists the subscription graph with `Connecting To:` /
//! `Connected From:` annotations under each port.

use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;

use super::exec::{run_capture, run_checked};
use super::{BackendError, PortBackend, COMMAND_TIMEOUT};
use crate::model::{Backend, Connection, Direction, Port};

const ACONNECT: &str = "aconnect";

#[derive(Debug, Clone)]
pub struct AlsaBackend {
    timeout: Duration,
}

impl AlsaBackend {
    pub fn new() -> Self {
        Self { timeout: COMMAND_TIMEOUT }
    }
}

impl Default for AlsaBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl PortBackend for AlsaBackend {
    fn tag(&self) -> Backend {
        Backend::Alsa
    }

    fn ports(&self, direction: Direction) -> Result<Vec<Port>, BackendError> {
        let flag = match direction {
            Direction::Input => "-i",
            Direction::Output => "-o",
        };
        let output = run_capture(ACONNECT, &[flag], self.timeout)?;
        Ok(parse_ports(&output, direction))
    }

    fn connections(&self) -> Result<Vec<Connection>, BackendError> {
        let output = run_capture(ACONNECT, &["-l"], self.timeout)?;
        Ok(parse_connections(&output))
    }

    fn connect(&self, from_id: &str, to_id: &str) -> Result<(), BackendError> {
        run_checked(ACONNECT, &[from_id, to_id], self.timeout)
    }

    fn disconnect(&self, from_id: &str, to_id: &str) -> Result<(), BackendError> {
        run_checked(ACONNECT, &["-d", from_id, to_id], self.timeout)
    }
}

fn client_header_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"client\s+(\d+):\s+'([^']+)'").expect("client header regex"))
}

fn client_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"client\s+(\d+):").expect("client line regex"))
}

fn port_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*(\d+)\s+'([^']+)'").expect("port line regex"))
}

fn connecting_to_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"Connecting To:\s*(\d+:\d+)").expect("connecting-to regex"))
}

fn connected_from_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"Connected From:\s*(\d+:\d+)").expect("connected-from regex"))
}

/// Parses `aconnect -i` / `aconnect -o` output into ports.
///
/// Port lines inherit the client number from the most recent client header;
/// anything before the first header is ignored.
fn parse_ports(output: &str, direction: Direction) -> Vec<Port> {
    let mut ports = Vec::new();
    let mut current_client: Option<String> = None;

    for line in output.lines() {
        let line = line.trim_end();
        if line.starts_with("client") {
            if let Some(caps) = client_header_re().captures(line) {
                current_client = Some(caps[1].to_owned());
            }
        } else if let Some(caps) = port_line_re().captures(line) {
            if let Some(client) = &current_client {
                let id = format!("{client}:{}", &caps[1]);
                let label = caps[2].trim().to_owned();
                ports.push(Port::new(Backend::Alsa, direction, id, label));
            }
        }
    }

    ports
}

/// Parses `aconnect -l` output into active connections.
///
/// Both `Connecting To:` (seen from the sender) and `Connected From:` (seen
/// from the receiver) describe the same wire, so the result is deduplicated.
fn parse_connections(output: &str) -> Vec<Connection> {
    let mut connections: Vec<Connection> = Vec::new();
    let mut current_client: Option<String> = None;
    let mut current_port: Option<String> = None;

    fn push_unique(conn: Connection, list: &mut Vec<Connection>) {
        if !list.contains(&conn) {
            list.push(conn);
        }
    }

    for line in output.lines() {
        let stripped = line.trim();
        if stripped.starts_with("client") {
            if let Some(caps) = client_line_re().captures(stripped) {
                current_client = Some(caps[1].to_owned());
            }
            current_port = None;
        } else if let Some(caps) = port_line_re().captures(stripped) {
            current_port = Some(caps[1].to_owned());
        } else if let Some(caps) = connecting_to_re().captures(line) {
            if let (Some(client), Some(port)) = (&current_client, &current_port) {
                let src = format!("{client}:{port}");
                push_unique(
                    Connection::new(Backend::Alsa, src, caps[1].to_owned()),
                    &mut connections,
                );
            }
        } else if let Some(caps) = connected_from_re().captures(line) {
            if let (Some(client), Some(port)) = (&current_client, &current_port) {
                let dst = format!("{client}:{port}");
                push_unique(
                    Connection::new(Backend::Alsa, caps[1].to_owned(), dst),
                    &mut connections,
                );
            }
        }
    }

    connections
}

#[cfg(test)]
mod tests {
    use super::{parse_connections, parse_ports};
    use crate::model::{Backend, Direction};

    const ACONNECT_I: &str = "\
client 0: 'System' [type=kernel]
    0 'Timer           '
    1 'Announce        '
client 14: 'Midi Through' [type=kernel]
    0 'Midi Through Port-0'
";

    const ACONNECT_L: &str = "\
client 0: 'System' [type=kernel]
    0 'Timer           '
    1 'Announce        '
	Connecting To: 128:0
client 128: 'Client-128' [type=user,pid=4711]
    0 'qmidiarp        '
	Connected From: 0:1
	Connecting To: 14:0
client 14: 'Midi Through' [type=kernel]
    0 'Midi Through Port-0'
	Connected From: 128:0
";

    #[test]
    fn parses_ports_grouped_under_client_headers() {
        let ports = parse_ports(ACONNECT_I, Direction::Input);

        assert_eq!(ports.len(), 3);
        assert_eq!(ports[0].id, "0:0");
        assert_eq!(ports[0].label, "Timer");
        assert_eq!(ports[2].id, "14:0");
        assert_eq!(ports[2].label, "Midi Through Port-0");
        assert!(ports.iter().all(|port| port.backend == Backend::Alsa));
        assert!(ports.iter().all(|port| port.direction == Direction::Input));
    }

    #[test]
    fn ignores_port_lines_before_any_client_header() {
        let ports = parse_ports("    0 'Orphan'\n", Direction::Output);
        assert!(ports.is_empty());
    }

    #[test]
    fn parses_connections_and_dedupes_both_sides_of_a_wire() {
        let connections = parse_connections(ACONNECT_L);

        let rendered: Vec<String> = connections.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["0:1 -> 128:0", "128:0 -> 14:0"]);
    }

    #[test]
    fn empty_listing_yields_no_connections() {
        assert!(parse_connections("").is_empty());
    }
}
