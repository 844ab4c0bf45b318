// SPDX-FileCopyrightText: 2026 Patchdeck Authors
// SPDX-License-Identifier: MIT

//! Patchdeck — unified ALSA/JACK patchbay TUI.
//!
//! Three panels (input ports, output ports, active connections) over two
//! external command-line backends, tied together by a single-threaded,
//! blocking-on-input render loop.

pub mod backend;
pub mod model;
pub mod tui;

#[cfg(test)]
mod tests {
    #[test]
    fn sanity() {
        assert_eq!(2 + 2, 4);
    }
}
