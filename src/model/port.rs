// SPDX-FileCopyrightText: 2026 Patchdeck Authors
// SPDX-License-Identifier: MIT

use std::fmt;

/// Which subsystem owns a port or connection.
///
/// ALSA ports are addressed by a `client:port` number pair; JACK ports by a
/// unique graph-wide name. A connection never crosses backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Backend {
    Alsa,
    Jack,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Alsa => f.write_str("ALSA"),
            Self::Jack => f.write_str("JACK"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    Input,
    Output,
}

/// One addressable endpoint as reported by a backend query.
///
/// Ports are rebuilt wholesale on every refresh; identity across refreshes is
/// `(backend, direction, id)` only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Port {
    pub backend: Backend,
    pub direction: Direction,
    pub id: String,
    pub label: String,
}

impl Port {
    pub fn new(
        backend: Backend,
        direction: Direction,
        id: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self { backend, direction, id: id.into(), label: label.into() }
    }

    /// Identity key, stable across refreshes for selection preservation.
    pub fn key(&self) -> (Backend, Direction, &str) {
        (self.backend, self.direction, self.id.as_str())
    }

    /// Row text as shown in a ports panel.
    ///
    /// ALSA labels carry the port name next to the numeric id; JACK ids are
    /// already human-readable names, so the label equals the id there.
    pub fn display(&self) -> String {
        if self.label.is_empty() || self.label == self.id {
            self.id.clone()
        } else {
            format!("{}  {}", self.id, self.label)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Backend, Direction, Port};

    #[test]
    fn display_combines_id_and_label() {
        let port = Port::new(Backend::Alsa, Direction::Input, "128:0", "Synth In");
        assert_eq!(port.display(), "128:0  Synth In");
    }

    #[test]
    fn display_omits_redundant_label() {
        let port =
            Port::new(Backend::Jack, Direction::Output, "system:playback_1", "system:playback_1");
        assert_eq!(port.display(), "system:playback_1");
    }

    #[test]
    fn key_ignores_label() {
        let a = Port::new(Backend::Alsa, Direction::Input, "16:0", "old name");
        let b = Port::new(Backend::Alsa, Direction::Input, "16:0", "new name");
        assert_eq!(a.key(), b.key());
    }
}
