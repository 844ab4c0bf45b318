// SPDX-FileCopyrightText: 2026 Patchdeck Authors
// SPDX-License-Identifier: MIT

//! One panel's rows, selection, and scroll window.

use crate::model::{Connection, Port};

/// Row identity across refreshes, used to keep the user's selection pinned
/// to the same logical port/wire when the row set is rebuilt.
pub trait PanelEntry {
    fn same_identity(&self, other: &Self) -> bool;
}

impl PanelEntry for Port {
    fn same_identity(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl PanelEntry for Connection {
    fn same_identity(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    Up,
    Down,
}

/// Scrollable list state for one panel.
///
/// Invariant whenever `rows` is non-empty:
/// `scroll_offset <= selected_index < scroll_offset + viewport` and
/// `selected_index < rows.len()`. The viewport height comes from the
/// terminal at draw time via [`PanelModel::set_viewport`].
#[derive(Debug, Clone)]
pub struct PanelModel<T> {
    rows: Vec<T>,
    selected: usize,
    scroll: usize,
    viewport: usize,
}

const DEFAULT_VIEWPORT: usize = 8;

impl<T: PanelEntry> PanelModel<T> {
    pub fn new() -> Self {
        Self { rows: Vec::new(), selected: 0, scroll: 0, viewport: DEFAULT_VIEWPORT }
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll
    }

    pub fn current(&self) -> Option<&T> {
        self.rows.get(self.selected)
    }

    /// Rows currently inside the scroll window, with their absolute indices.
    pub fn visible(&self) -> impl Iterator<Item = (usize, &T)> {
        self.rows.iter().enumerate().skip(self.scroll).take(self.viewport)
    }

    /// Updates the viewport height from the terminal and re-establishes the
    /// scroll invariant (the window may have shrunk under the selection).
    pub fn set_viewport(&mut self, height: usize) {
        self.viewport = height.max(1);
        self.ensure_visible();
    }

    /// Moves the selection one row, clamped to the ends. No-op when empty.
    pub fn navigate(&mut self, direction: Move) {
        if self.rows.is_empty() {
            return;
        }
        self.selected = match direction {
            Move::Up => self.selected.saturating_sub(1),
            Move::Down => (self.selected + 1).min(self.rows.len() - 1),
        };
        self.ensure_visible();
    }

    /// Replaces the row set on refresh.
    ///
    /// If the previously selected row's identity still exists it is
    /// re-selected at its new index; otherwise the selection clamps to the
    /// last valid row and the scroll resets to the top.
    pub fn replace_rows(&mut self, rows: Vec<T>) {
        let carried_index =
            self.current().and_then(|cur| rows.iter().position(|row| row.same_identity(cur)));
        self.rows = rows;
        match carried_index {
            Some(index) => self.selected = index,
            None => {
                self.selected =
                    if self.rows.is_empty() { 0 } else { self.selected.min(self.rows.len() - 1) };
                self.scroll = 0;
            }
        }
        self.ensure_visible();
    }

    /// Scrolls by the minimum amount needed to bring the selection into the
    /// window (no jump-to-center).
    fn ensure_visible(&mut self) {
        if self.rows.is_empty() {
            self.selected = 0;
            self.scroll = 0;
            return;
        }
        self.selected = self.selected.min(self.rows.len() - 1);
        if self.selected < self.scroll {
            self.scroll = self.selected;
        } else if self.selected >= self.scroll + self.viewport {
            self.scroll = self.selected + 1 - self.viewport;
        }
    }
}

impl<T: PanelEntry> Default for PanelModel<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{Move, PanelModel};
    use crate::model::{Backend, Direction, Port};

    fn port(id: &str) -> Port {
        Port::new(Backend::Alsa, Direction::Input, id, id)
    }

    fn panel_with(ids: &[&str]) -> PanelModel<Port> {
        let mut panel = PanelModel::new();
        panel.replace_rows(ids.iter().map(|id| port(id)).collect());
        panel
    }

    fn assert_invariants(panel: &PanelModel<Port>, viewport: usize) {
        if panel.is_empty() {
            return;
        }
        assert!(panel.selected_index() < panel.rows().len());
        assert!(panel.scroll_offset() <= panel.selected_index());
        assert!(panel.selected_index() < panel.scroll_offset() + viewport);
    }

    #[test]
    fn navigate_on_empty_panel_is_a_noop() {
        let mut panel: PanelModel<Port> = PanelModel::new();
        panel.navigate(Move::Down);
        panel.navigate(Move::Up);
        assert!(panel.current().is_none());
        assert_eq!(panel.selected_index(), 0);
        assert_eq!(panel.scroll_offset(), 0);
    }

    #[test]
    fn navigate_clamps_at_both_ends() {
        let mut panel = panel_with(&["a", "b"]);
        panel.navigate(Move::Up);
        assert_eq!(panel.selected_index(), 0);
        panel.navigate(Move::Down);
        panel.navigate(Move::Down);
        panel.navigate(Move::Down);
        assert_eq!(panel.selected_index(), 1);
    }

    #[rstest]
    #[case(1, 3)]
    #[case(5, 2)]
    #[case(12, 4)]
    #[case(40, 7)]
    fn selection_and_scroll_invariants_hold_for_arbitrary_move_sequences(
        #[case] row_count: usize,
        #[case] viewport: usize,
    ) {
        let ids: Vec<String> = (0..row_count).map(|i| format!("p{i}")).collect();
        let mut panel = panel_with(&ids.iter().map(String::as_str).collect::<Vec<_>>());
        panel.set_viewport(viewport);

        // Pseudo-random but deterministic walk covering both directions and
        // both clamped ends.
        let mut seed = 0x9e37u32;
        for _ in 0..200 {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            let direction = if seed & 0x10 == 0 { Move::Up } else { Move::Down };
            panel.navigate(direction);
            assert_invariants(&panel, viewport);
        }
    }

    #[test]
    fn scrolling_moves_by_the_minimum_amount() {
        let mut panel = panel_with(&["a", "b", "c", "d", "e"]);
        panel.set_viewport(2);
        assert_eq!(panel.scroll_offset(), 0);

        panel.navigate(Move::Down);
        assert_eq!(panel.scroll_offset(), 0);

        panel.navigate(Move::Down);
        assert_eq!((panel.selected_index(), panel.scroll_offset()), (2, 1));

        panel.navigate(Move::Up);
        panel.navigate(Move::Up);
        assert_eq!((panel.selected_index(), panel.scroll_offset()), (0, 0));
    }

    #[test]
    fn replace_rows_follows_the_selected_identity_to_its_new_index() {
        let mut panel = panel_with(&["a", "b", "c"]);
        panel.navigate(Move::Down);
        assert_eq!(panel.current().map(|p| p.id.as_str()), Some("b"));

        panel.replace_rows(vec![port("x"), port("b"), port("c")]);
        assert_eq!(panel.selected_index(), 1);
        assert_eq!(panel.current().map(|p| p.id.as_str()), Some("b"));

        // The moved identity is followed, not the old index.
        panel.replace_rows(vec![port("b"), port("y"), port("z")]);
        assert_eq!(panel.selected_index(), 0);
        assert_eq!(panel.current().map(|p| p.id.as_str()), Some("b"));
    }

    #[test]
    fn replace_rows_clamps_when_identity_disappears() {
        let mut panel = panel_with(&["a", "b", "c"]);
        panel.navigate(Move::Down);
        panel.navigate(Move::Down);
        assert_eq!(panel.selected_index(), 2);

        panel.replace_rows(vec![port("x"), port("y")]);
        assert_eq!(panel.selected_index(), 1);
        assert_eq!(panel.scroll_offset(), 0);

        panel.replace_rows(Vec::new());
        assert!(panel.current().is_none());
        assert_eq!(panel.selected_index(), 0);
    }

    #[test]
    fn shrinking_viewport_restores_the_scroll_invariant() {
        let mut panel = panel_with(&["a", "b", "c", "d", "e", "f"]);
        panel.set_viewport(6);
        for _ in 0..5 {
            panel.navigate(Move::Down);
        }
        assert_eq!(panel.selected_index(), 5);

        panel.set_viewport(2);
        assert_invariants(&panel, 2);
        assert_eq!(panel.scroll_offset(), 4);
    }
}
