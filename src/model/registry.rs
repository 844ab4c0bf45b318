// SPDX-FileCopyrightText: 2026 Patchdeck Authors
// SPDX-License-Identifier: MIT

use std::collections::HashSet;

use super::{Backend, Connection, ConnectionKey};

/// Merged view of all active connections across both backends.
///
/// The registry is a pure derived view: it is rebuilt from fresh backend
/// queries on every refresh and never patched in place after a connect or
/// disconnect, so it cannot drift from backend reality. Backend-reported
/// order is preserved (ALSA block first, then JACK) to keep the panel stable
/// between refreshes when nothing changed.
#[derive(Debug, Clone, Default)]
pub struct ConnectionRegistry {
    connections: Vec<Connection>,
    keys: HashSet<ConnectionKey>,
}

impl ConnectionRegistry {
    /// Builds the registry from the two backends' connection reports.
    ///
    /// Duplicates within one backend's own report are dropped defensively;
    /// no cross-backend dedup is needed since each backend owns its own
    /// namespace.
    pub fn merge(alsa: &[Connection], jack: &[Connection]) -> Self {
        let mut registry = Self::default();
        for conn in alsa.iter().chain(jack.iter()) {
            let key = conn.key();
            if registry.keys.insert(key) {
                registry.connections.push(conn.clone());
            }
        }
        registry
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// Looks a wire up by unordered endpoint pair.
    pub fn find(&self, backend: Backend, a: &str, b: &str) -> Option<&Connection> {
        let key = ConnectionKey::new(backend, a, b);
        self.connections.iter().find(|conn| conn.key() == key)
    }
}

#[cfg(test)]
mod tests {
    use super::{Backend, Connection, ConnectionRegistry};

    fn alsa(from: &str, to: &str) -> Connection {
        Connection::new(Backend::Alsa, from, to)
    }

    fn jack(from: &str, to: &str) -> Connection {
        Connection::new(Backend::Jack, from, to)
    }

    #[test]
    fn merge_concatenates_alsa_before_jack_in_reported_order() {
        let registry = ConnectionRegistry::merge(
            &[alsa("16:0", "128:0"), alsa("20:0", "128:0")],
            &[jack("app:out1", "system:playback_1")],
        );

        let rendered: Vec<String> =
            registry.connections().iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            vec!["16:0 -> 128:0", "20:0 -> 128:0", "app:out1 -> system:playback_1"]
        );
    }

    #[test]
    fn merge_dedupes_within_one_backend() {
        let registry =
            ConnectionRegistry::merge(&[alsa("16:0", "128:0"), alsa("16:0", "128:0")], &[]);
        assert_eq!(registry.connections().len(), 1);
    }

    #[test]
    fn find_matches_unordered_pair() {
        let registry = ConnectionRegistry::merge(&[], &[jack("app:out1", "app2:in1")]);

        let found = registry.find(Backend::Jack, "app2:in1", "app:out1").expect("wire");
        assert_eq!(found.from_id, "app:out1");
        assert_eq!(found.to_id, "app2:in1");

        assert!(registry.find(Backend::Alsa, "app2:in1", "app:out1").is_none());
    }
}
