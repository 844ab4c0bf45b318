// SPDX-FileCopyrightText: 2026 Patchdeck Authors
// SPDX-License-Identifier: MIT

//! Data model: ports, connections, and the merged connection registry.

mod connection;
mod port;
mod registry;

pub use connection::{Connection, ConnectionKey};
pub use port::{Backend, Direction, Port};
pub use registry::ConnectionRegistry;
