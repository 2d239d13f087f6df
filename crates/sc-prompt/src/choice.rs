// SPDX-License-Identifier: MIT
//
// ChoiceState — the selection prompt as a pure state machine.
//
// No I/O here. The driver in `prompt.rs` feeds key events and terminal
// heights in, and draws whatever `rows()` says.
//
// Layout of a drawn list (viewport height `vh`, scroll offset `s`):
//
//   row 0          choice 0, or `↑` when s > 0
//   rows 1..=vh    choices s+1 ..= s+vh
//   row vh+1       last choice, or `↓` when s < max scroll
//
// So `vh + 2` rows are drawn, and the first and last choices are always
// one step away from the visible window. The highlighted choice is kept
// visible: `scroll <= highlighted <= scroll + vh + 1`.

use std::borrow::Cow;

use sc_term::input::{KeyCode, KeyEvent};

/// Number of middle rows for `count` choices on a terminal `rows` tall.
///
/// Long lists get a fixed 10-row window when the terminal allows it.
/// Otherwise every choice is shown when they fit, and the window shrinks
/// to the terminal (minus the label and the two edge rows) when not.
#[must_use]
pub fn viewport_height(count: usize, rows: u16) -> usize {
    let rows = usize::from(rows);
    if count > 12 && rows >= 13 {
        10
    } else if count + 1 > rows {
        rows.saturating_sub(3)
    } else {
        count.saturating_sub(2)
    }
}

/// Shorten `label` to fit a terminal `cols` wide, ending it with `…`.
///
/// Labels shorter than `cols - 3` are returned as is.
#[must_use]
pub fn truncate_label(label: &str, cols: usize) -> Cow<'_, str> {
    if label.chars().count() < cols.saturating_sub(3) {
        return Cow::Borrowed(label);
    }
    let kept: String = label.chars().take(cols.saturating_sub(5)).collect();
    Cow::Owned(kept + "…")
}

/// One drawn row of the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Row {
    Choice { index: usize, highlighted: bool },
    /// Choices are hidden above the window.
    MoreAbove,
    /// Choices are hidden below the window.
    MoreBelow,
}

/// What the driver should do after a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The highlight moved; draw again.
    Redraw,
    /// Nothing changed.
    Ignored,
    /// The user picked this index.
    Confirmed(usize),
    /// The user pressed Ctrl-C.
    Interrupted,
}

/// Highlight and scroll position over a list of choices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceState {
    count: usize,
    highlighted: usize,
    scroll: usize,
    viewport: usize,
}

impl ChoiceState {
    /// Start on `default` (or the first choice), scrolled so it is visible.
    ///
    /// `count` must be at least 2; a `default` past the end is clamped to
    /// the last choice.
    #[must_use]
    pub fn new(count: usize, default: Option<usize>, rows: u16) -> Self {
        debug_assert!(count >= 2, "a choice list needs at least 2 entries");
        let mut state = Self {
            count,
            highlighted: default.unwrap_or(0).min(count.saturating_sub(1)),
            scroll: 0,
            viewport: viewport_height(count, rows),
        };
        state.reveal();
        state
    }

    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    #[must_use]
    pub const fn highlighted(&self) -> usize {
        self.highlighted
    }

    #[must_use]
    pub const fn scroll(&self) -> usize {
        self.scroll
    }

    /// Number of middle rows in the window.
    #[must_use]
    pub const fn viewport(&self) -> usize {
        self.viewport
    }

    /// Total rows drawn for the list (without the label line).
    #[must_use]
    pub const fn drawn_rows(&self) -> usize {
        self.viewport + 2
    }

    /// Largest useful scroll offset.
    #[must_use]
    pub const fn max_scroll(&self) -> usize {
        self.count.saturating_sub(self.viewport + 2)
    }

    /// Recompute the window for a terminal `rows` tall. Returns whether
    /// anything moved.
    pub fn resize(&mut self, rows: u16) -> bool {
        let viewport = viewport_height(self.count, rows);
        if viewport == self.viewport {
            return false;
        }
        tracing::debug!(from = self.viewport, to = viewport, "viewport resized");
        self.viewport = viewport;
        self.reveal();
        true
    }

    /// Highlight the previous choice, wrapping to the last.
    pub fn move_up(&mut self) {
        self.highlighted = self
            .highlighted
            .checked_sub(1)
            .unwrap_or(self.count - 1);
        self.reveal();
    }

    /// Highlight the next choice, wrapping to the first.
    pub fn move_down(&mut self) {
        self.highlighted = if self.highlighted + 1 >= self.count {
            0
        } else {
            self.highlighted + 1
        };
        self.reveal();
    }

    /// Apply one key.
    pub fn handle_key(&mut self, key: &KeyEvent) -> Outcome {
        if key.is_interrupt() {
            return Outcome::Interrupted;
        }
        match key.code {
            KeyCode::Up => {
                self.move_up();
                Outcome::Redraw
            }
            KeyCode::Down => {
                self.move_down();
                Outcome::Redraw
            }
            KeyCode::Enter => Outcome::Confirmed(self.highlighted),
            KeyCode::Char(' ') if key.modifiers.is_empty() => Outcome::Confirmed(self.highlighted),
            _ => Outcome::Ignored,
        }
    }

    /// The rows to draw, top to bottom.
    #[must_use]
    pub fn rows(&self) -> Vec<Row> {
        let mut rows = Vec::with_capacity(self.drawn_rows());

        rows.push(if self.scroll > 0 {
            Row::MoreAbove
        } else {
            self.choice_row(0)
        });
        for index in self.scroll + 1..=self.scroll + self.viewport {
            rows.push(self.choice_row(index));
        }
        rows.push(if self.scroll < self.max_scroll() {
            Row::MoreBelow
        } else {
            self.choice_row(self.count - 1)
        });

        rows
    }

    const fn choice_row(&self, index: usize) -> Row {
        Row::Choice {
            index,
            highlighted: index == self.highlighted,
        }
    }

    /// Move the scroll offset the least needed to show the highlight.
    fn reveal(&mut self) {
        let h = self.highlighted;
        let max = self.max_scroll();

        self.scroll = if h == 0 {
            0
        } else if h == self.count - 1 {
            max
        } else if h <= self.scroll {
            h - 1
        } else if h > self.scroll + self.viewport {
            (h - self.viewport).min(max)
        } else {
            self.scroll.min(max)
        };
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sc_term::input::Modifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::plain(code)
    }

    /// Highlighted choice is on screen, either in the window or on an edge
    /// row that shows a choice rather than an arrow.
    fn highlight_is_visible(state: &ChoiceState) -> bool {
        state.rows().iter().any(|row| {
            matches!(row, Row::Choice { index, highlighted: true } if *index == state.highlighted())
        })
    }

    // ── Viewport height ─────────────────────────────────────────────────

    #[test]
    fn long_list_on_tall_terminal() {
        assert_eq!(viewport_height(20, 13), 10);
        assert_eq!(viewport_height(100, 50), 10);
    }

    #[test]
    fn short_list_shows_everything() {
        assert_eq!(viewport_height(5, 24), 3);
        assert_eq!(viewport_height(2, 24), 0);
        assert_eq!(viewport_height(12, 40), 10);
    }

    #[test]
    fn list_taller_than_terminal_shrinks() {
        assert_eq!(viewport_height(20, 12), 9);
        assert_eq!(viewport_height(8, 6), 3);
        assert_eq!(viewport_height(20, 2), 0);
    }

    // ── Truncation ──────────────────────────────────────────────────────

    #[test]
    fn short_label_is_borrowed() {
        assert!(matches!(truncate_label("apple", 20), Cow::Borrowed("apple")));
    }

    #[test]
    fn long_label_gets_ellipsis() {
        let label = "a".repeat(17);
        assert_eq!(truncate_label(&label, 20), format!("{}…", "a".repeat(15)));
    }

    #[test]
    fn truncation_counts_chars() {
        let label = "é".repeat(30);
        assert_eq!(truncate_label(&label, 20).chars().count(), 16);
    }

    // ── Initial position ────────────────────────────────────────────────

    #[test]
    fn starts_at_top() {
        let state = ChoiceState::new(20, None, 13);
        assert_eq!((state.highlighted(), state.scroll()), (0, 0));
        assert_eq!(state.viewport(), 10);
        assert_eq!(state.max_scroll(), 8);
    }

    #[test]
    fn default_in_window_does_not_scroll() {
        let state = ChoiceState::new(20, Some(10), 13);
        assert_eq!((state.highlighted(), state.scroll()), (10, 0));
    }

    #[test]
    fn default_below_window_scrolls() {
        let state = ChoiceState::new(20, Some(15), 13);
        assert_eq!((state.highlighted(), state.scroll()), (15, 5));
        assert!(highlight_is_visible(&state));
    }

    #[test]
    fn default_last_scrolls_to_bottom() {
        let state = ChoiceState::new(20, Some(19), 13);
        assert_eq!(state.scroll(), state.max_scroll());
        assert!(highlight_is_visible(&state));
    }

    // ── Navigation ──────────────────────────────────────────────────────

    #[test]
    fn down_past_window_scrolls_by_overflow() {
        let mut state = ChoiceState::new(20, None, 13);
        for _ in 0..10 {
            state.move_down();
        }
        assert_eq!((state.highlighted(), state.scroll()), (10, 0));

        state.move_down();
        assert_eq!((state.highlighted(), state.scroll()), (11, 1));
        state.move_down();
        assert_eq!((state.highlighted(), state.scroll()), (12, 2));
    }

    #[test]
    fn highlight_stays_in_window_all_the_way_down() {
        let mut state = ChoiceState::new(20, None, 13);
        for _ in 0..45 {
            state.move_down();
            let h = state.highlighted();
            assert!(state.scroll() <= h && h <= state.scroll() + 11, "{state:?}");
            assert!(state.scroll() <= state.max_scroll());
            assert!(highlight_is_visible(&state), "{state:?}");
        }
    }

    #[test]
    fn highlight_stays_in_window_all_the_way_up() {
        let mut state = ChoiceState::new(20, None, 13);
        for _ in 0..45 {
            state.move_up();
            assert!(highlight_is_visible(&state), "{state:?}");
        }
    }

    #[test]
    fn up_from_top_wraps_to_bottom() {
        let mut state = ChoiceState::new(20, None, 13);
        state.move_up();
        assert_eq!((state.highlighted(), state.scroll()), (19, 8));
    }

    #[test]
    fn down_from_bottom_wraps_to_top() {
        let mut state = ChoiceState::new(20, Some(19), 13);
        state.move_down();
        assert_eq!((state.highlighted(), state.scroll()), (0, 0));
    }

    #[test]
    fn up_above_window_scrolls_one() {
        let mut state = ChoiceState::new(20, Some(15), 13);
        assert_eq!(state.scroll(), 5);
        for _ in 0..9 {
            state.move_up();
        }
        assert_eq!((state.highlighted(), state.scroll()), (6, 5));
        state.move_up();
        assert_eq!((state.highlighted(), state.scroll()), (5, 4));
    }

    // ── Keys ────────────────────────────────────────────────────────────

    #[test]
    fn keys_map_to_outcomes() {
        let mut state = ChoiceState::new(5, None, 24);
        assert_eq!(state.handle_key(&key(KeyCode::Down)), Outcome::Redraw);
        assert_eq!(state.handle_key(&key(KeyCode::Enter)), Outcome::Confirmed(1));
        assert_eq!(state.handle_key(&key(KeyCode::Char(' '))), Outcome::Confirmed(1));
        assert_eq!(state.handle_key(&key(KeyCode::Char('x'))), Outcome::Ignored);
        assert_eq!(state.handle_key(&KeyEvent::ctrl('c')), Outcome::Interrupted);
    }

    #[test]
    fn alt_space_does_not_confirm() {
        let mut state = ChoiceState::new(5, None, 24);
        let alt_space = KeyEvent {
            code: KeyCode::Char(' '),
            modifiers: Modifiers::ALT,
        };
        assert_eq!(state.handle_key(&alt_space), Outcome::Ignored);
    }

    // ── Rows ────────────────────────────────────────────────────────────

    #[test]
    fn all_rows_for_short_list() {
        let state = ChoiceState::new(4, Some(2), 24);
        assert_eq!(
            state.rows(),
            vec![
                Row::Choice { index: 0, highlighted: false },
                Row::Choice { index: 1, highlighted: false },
                Row::Choice { index: 2, highlighted: true },
                Row::Choice { index: 3, highlighted: false },
            ]
        );
    }

    #[test]
    fn two_choices_have_no_middle_rows() {
        let state = ChoiceState::new(2, None, 24);
        assert_eq!(state.drawn_rows(), 2);
        assert_eq!(
            state.rows(),
            vec![
                Row::Choice { index: 0, highlighted: true },
                Row::Choice { index: 1, highlighted: false },
            ]
        );
    }

    #[test]
    fn arrows_mark_hidden_choices() {
        let state = ChoiceState::new(20, Some(12), 13);
        let rows = state.rows();
        assert_eq!(rows.len(), 12);
        assert_eq!(rows[0], Row::MoreAbove);
        assert_eq!(rows[11], Row::MoreBelow);
        assert_eq!(rows[10], Row::Choice { index: 12, highlighted: true });
    }

    // ── Resize ──────────────────────────────────────────────────────────

    #[test]
    fn shrinking_keeps_highlight_visible() {
        let mut state = ChoiceState::new(20, Some(10), 13);
        assert!(state.resize(6));
        assert_eq!(state.viewport(), 3);
        assert!(highlight_is_visible(&state));
    }

    #[test]
    fn growing_clamps_scroll() {
        let mut state = ChoiceState::new(8, Some(6), 6);
        assert_eq!(state.viewport(), 3);
        assert_eq!(state.scroll(), 3);
        assert!(state.resize(40));
        assert_eq!(state.viewport(), 6);
        assert_eq!(state.scroll(), 0);
        assert!(highlight_is_visible(&state));
    }

    #[test]
    fn same_height_is_not_a_resize() {
        let mut state = ChoiceState::new(20, None, 13);
        assert!(!state.resize(30));
    }
}
