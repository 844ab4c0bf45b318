// SPDX-FileCopyrightText: 2026 Patchdeck Authors
// SPDX-License-Identifier: MIT

use std::fmt;

use super::Backend;

/// One active wire between two ports of the same backend.
///
/// `from_id`/`to_id` keep the order the backend reported (source before
/// destination); equality of the wire itself is unordered, see
/// [`ConnectionKey`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub backend: Backend,
    pub from_id: String,
    pub to_id: String,
}

impl Connection {
    pub fn new(backend: Backend, from_id: impl Into<String>, to_id: impl Into<String>) -> Self {
        Self { backend, from_id: from_id.into(), to_id: to_id.into() }
    }

    /// Unordered identity of the wire.
    pub fn key(&self) -> ConnectionKey {
        ConnectionKey::new(self.backend, &self.from_id, &self.to_id)
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from_id, self.to_id)
    }
}

/// Unordered endpoint pair, keyed per backend.
///
/// The registry never holds two connections with the same key, and the
/// ports-panel disconnect path looks wires up by this key because the user's
/// two selections carry no source/destination order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionKey {
    backend: Backend,
    lo: String,
    hi: String,
}

impl ConnectionKey {
    pub fn new(backend: Backend, a: &str, b: &str) -> Self {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        Self { backend, lo: lo.to_owned(), hi: hi.to_owned() }
    }
}
