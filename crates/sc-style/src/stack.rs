// SPDX-License-Identifier: MIT
//
// StyleStack — the LIFO of styles opened by markup tags.
//
// Each pushed style is merged over the base style first, so a block
// rendered on a green background keeps its background inside nested tags.
// Styles are *not* merged with the entry below them: `<fg=red>a<bg=blue>b`
// renders `b` blue-on-default, not blue-on-red.
//
// One stack lives for exactly one formatting pass.

use crate::style::Style;

/// Returned by [`StyleStack::current`] when there is neither an open
/// style nor a base.
static PLAIN: Style = Style::new();

/// Stack of active styles, with an optional base underneath.
#[derive(Debug, Clone, Default)]
pub struct StyleStack {
    base: Option<Style>,
    styles: Vec<Style>,
}

impl StyleStack {
    /// An empty stack with no base style.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            base: None,
            styles: Vec::new(),
        }
    }

    /// An empty stack whose pushes are merged over `base`.
    #[must_use]
    pub const fn with_base(base: Style) -> Self {
        Self {
            base: Some(base),
            styles: Vec::new(),
        }
    }

    #[must_use]
    pub const fn base(&self) -> Option<&Style> {
        self.base.as_ref()
    }

    /// Number of open styles (the base is not counted).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.styles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Open a style.
    pub fn push(&mut self, style: &Style) {
        let merged = self.resolve(style);
        self.styles.push(merged);
    }

    /// Close the most recent entry equal to `style` and everything opened
    /// after it.
    ///
    /// `style` is merged over the base before comparing, the same way
    /// [`push`](Self::push) stored it. Returns `false` and leaves the stack
    /// untouched when no entry matches.
    pub fn pop(&mut self, style: &Style) -> bool {
        let target = self.resolve(style);
        match self.styles.iter().rposition(|s| *s == target) {
            Some(index) => {
                self.styles.truncate(index);
                true
            }
            None => {
                tracing::trace!(style = %style, depth = self.depth(), "close tag matched nothing");
                false
            }
        }
    }

    /// Close the most recent style, whatever it is.
    pub fn pop_current(&mut self) -> Option<Style> {
        self.styles.pop()
    }

    /// The style text should be rendered with right now.
    #[must_use]
    pub fn current(&self) -> &Style {
        self.styles
            .last()
            .or(self.base.as_ref())
            .unwrap_or(&PLAIN)
    }

    fn resolve(&self, style: &Style) -> Style {
        self.base
            .as_ref()
            .map_or_else(|| style.clone(), |base| style.merged_over(base))
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
