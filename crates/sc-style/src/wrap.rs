// SPDX-License-Identifier: MIT
//
// Line wrapping — cutting styled fragments into fixed-width lines.
//
// `WrapState` is the accumulator a formatting pass folds over. It holds the
// rendered lines so far and the visible length of the last one. Each call
// to `push_text` consumes the state, adds one fragment of plain text drawn
// in one style, and hands the state back.
//
// Splitting and padding happen on plain text; styling is applied to each
// finished piece afterwards, so a cut never lands inside an escape sequence
// and every line opens and closes its own styles.
//
// Rules for one fragment:
//
//   1. Line endings are normalized (spaces before a break and `\r\n` become
//      a bare `\n`), then the text is split on `\n`.
//   2. If the current line is already wider than the wrap width, the
//      fragment starts on a fresh line. If the first source line does not
//      fit in what is left of the current line, it is cut there.
//   3. Every source line is cut into width-sized chunks. A final source
//      line that fills its last chunk exactly is followed by an empty
//      piece, so the next fragment starts on a new line.
//   4. A run of empty pieces at the end collapses to one.
//   5. Every piece but the last is padded with spaces to the full width
//      (the first one to whatever remains of the current line).
//   6. The first piece continues the current line; the others start new
//      lines.
//
// Widths are counted in `char`s.

use std::sync::LazyLock;

use regex::Regex;

use crate::render::Renderer;
use crate::style::Style;

/// Trailing spaces plus a line break, in either convention.
static LINE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" *\r?\n").expect("line-end pattern is valid"));

/// SGR sequences and OSC 8 hyperlink delimiters.
static ESCAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1b\[[0-9;]*m|\x1b\]8;;[^\x1b]*\x1b\\").expect("escape pattern is valid")
});

/// Number of visible characters in `s`, not counting escape sequences.
#[must_use]
pub fn visible_len(s: &str) -> usize {
    ESCAPE.split(s).map(|part| part.chars().count()).sum()
}

/// Accumulated output of a formatting pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrapState {
    lines: Vec<String>,
    /// Visible length of the last line. `None` means unknown: it is
    /// measured from the last line before the next fragment is placed.
    line_len: Option<usize>,
    /// The last line is empty only because the line before it filled the
    /// width exactly, not because the text asked for a break.
    fill_break: bool,
}

impl Default for WrapState {
    fn default() -> Self {
        Self::new()
    }
}

impl WrapState {
    /// A state with one empty line, ready for text.
    #[must_use]
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
            line_len: Some(0),
            fill_break: false,
        }
    }

    /// Resume from previously rendered lines.
    ///
    /// Pass `None` as `line_len` when the visible length of the last line
    /// is not known; it is then measured with [`visible_len`].
    #[must_use]
    pub const fn from_lines(lines: Vec<String>, line_len: Option<usize>) -> Self {
        Self {
            lines,
            line_len,
            fill_break: false,
        }
    }

    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Visible length of the last line, if known.
    #[must_use]
    pub const fn line_len(&self) -> Option<usize> {
        self.line_len
    }

    #[must_use]
    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    /// The finished lines of a pass.
    ///
    /// Unlike [`into_lines`](Self::into_lines), drops a final empty line
    /// that only exists because the text before it filled the width.
    #[must_use]
    pub fn finish(mut self) -> Vec<String> {
        if self.fill_break {
            self.lines.pop();
        }
        self.lines
    }

    /// Add `text`, drawn in `style`, wrapping at `width`.
    ///
    /// Empty text or a zero width leaves the state as it is.
    #[must_use]
    pub fn push_text(mut self, text: &str, width: usize, style: &Style, renderer: &Renderer) -> Self {
        if text.is_empty() || width == 0 {
            return self;
        }

        let mut line_len = self
            .line_len
            .unwrap_or_else(|| self.lines.last().map_or(0, |l| visible_len(l)));

        let normalized = LINE_END.replace_all(text, "\n");
        let mut sources: Vec<&str> = normalized.split('\n').collect();
        let mut pieces: Vec<&str> = Vec::with_capacity(sources.len());

        if line_len > width {
            pieces.push("");
            line_len = width;
        } else if line_len > 0 {
            let room = width - line_len;
            if char_len(sources[0]) > room {
                let (head, tail) = split_at_char(sources[0], room);
                pieces.push(head);
                sources[0] = tail;
            }
        }

        let last_source = sources.len() - 1;
        let mut fill_break = false;
        for (i, &source) in sources.iter().enumerate() {
            fill_break = chunk_line(source, width, i == last_source, &mut pieces);
        }

        collapse_trailing_blanks(&mut pieces);

        let last_piece = pieces.len() - 1;
        for (i, piece) in pieces.into_iter().enumerate() {
            let len = char_len(piece);
            let target = if i == last_piece {
                len
            } else if i == 0 {
                width.saturating_sub(line_len).max(len)
            } else {
                width.max(len)
            };

            let painted = paint_padded(piece, target - len, style, renderer);
            match self.lines.last_mut() {
                Some(last) if i == 0 => {
                    last.push_str(&painted);
                    line_len += target;
                }
                _ => {
                    self.lines.push(painted);
                    line_len = target;
                }
            }
        }

        self.line_len = Some(line_len);
        self.fill_break = fill_break;
        self
    }
}

/// Style `piece` followed by `pad` spaces. Empty output stays unstyled.
fn paint_padded(piece: &str, pad: usize, style: &Style, renderer: &Renderer) -> String {
    if piece.is_empty() && pad == 0 {
        return String::new();
    }
    let mut padded = String::with_capacity(piece.len() + pad);
    padded.push_str(piece);
    padded.extend(std::iter::repeat_n(' ', pad));
    renderer.apply(style, &padded)
}

/// Cut one source line into `width`-sized chunks.
///
/// An empty line yields one empty chunk. When `is_last` and the line fills
/// its final chunk exactly, an extra empty chunk follows and `true` is
/// returned.
fn chunk_line<'a>(line: &'a str, width: usize, is_last: bool, out: &mut Vec<&'a str>) -> bool {
    let mut rest = line;
    loop {
        let (chunk, tail) = split_at_char(rest, width);
        out.push(chunk);
        rest = tail;
        if rest.is_empty() {
            break;
        }
    }

    let len = char_len(line);
    let filled = is_last && len > 0 && len % width == 0;
    if filled {
        out.push("");
    }
    filled
}

/// Keep at most one empty piece after the last non-empty one.
///
/// When no piece has content the list is left alone: it is a run of line
/// breaks and every one of them is wanted.
fn collapse_trailing_blanks(pieces: &mut Vec<&str>) {
    let Some(last_filled) = pieces.iter().rposition(|p| !p.is_empty()) else {
        return;
    };
    if last_filled + 1 < pieces.len() {
        pieces.truncate(last_filled + 2);
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Split `s` after `n` chars. The head is all of `s` when it is shorter.
fn split_at_char(s: &str, n: usize) -> (&str, &str) {
    let byte = s.char_indices().nth(n).map_or(s.len(), |(i, _)| i);
    s.split_at(byte)
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Color;
    use pretty_assertions::assert_eq;

    const WIDTH: usize = 20;
    const RENDERER: Renderer = Renderer::new(true);

    /// Helper: push `text` unstyled onto the given lines.
    fn wrap(lines: &[&str], line_len: Option<usize>, text: &str) -> WrapState {
        wrap_styled(lines, line_len, text, &Style::new())
    }

    fn wrap_styled(lines: &[&str], line_len: Option<usize>, text: &str, style: &Style) -> WrapState {
        let lines = lines.iter().map(|&l| l.to_owned()).collect();
        WrapState::from_lines(lines, line_len).push_text(text, WIDTH, style, &RENDERER)
    }

    // ── Helpers ─────────────────────────────────────────────────────────

    #[test]
    fn split_at_char_clamps() {
        assert_eq!(split_at_char("zaaaz", 2), ("za", "aaz"));
        assert_eq!(split_at_char("zaaaz", 50), ("zaaaz", ""));
        assert_eq!(split_at_char("éàü", 1), ("é", "àü"));
    }

    #[test]
    fn visible_len_skips_escapes() {
        assert_eq!(visible_len("plain"), 5);
        assert_eq!(visible_len("\x1b[31;42mred\x1b[39;49m!"), 4);
        assert_eq!(visible_len("\x1b]8;;https://x.dev\x1b\\link\x1b]8;;\x1b\\"), 4);
        assert_eq!(visible_len("→é"), 2);
    }

    // ── Line cutting ────────────────────────────────────────────────────

    #[test]
    fn short_text_on_empty_output() {
        let state = wrap(&[], Some(0), "abc");
        assert_eq!(state.lines(), ["abc"]);
        assert_eq!(state.line_len(), Some(3));
    }

    #[test]
    fn lines_are_padded_except_the_last() {
        let state = wrap(&[], Some(0), "supertoto\nabc\n");
        assert_eq!(
            state.lines(),
            ["supertoto           ", "abc                 ", ""]
        );
        assert_eq!(state.line_len(), Some(0));
    }

    #[test]
    fn trailing_blank_lines_collapse() {
        let state = wrap(&[], Some(0), "abc\n\n\n");
        assert_eq!(state.lines(), ["abc                 ", ""]);
        assert_eq!(state.line_len(), Some(0));
    }

    #[test]
    fn continues_current_line_then_wraps() {
        let state = wrap(
            &["iiiii"],
            Some(5),
            "super super super super super super super super super super",
        );
        assert_eq!(
            state.lines(),
            [
                "iiiiisuper super sup",
                "er super super super",
                " super super super s",
                "uper"
            ]
        );
        assert_eq!(state.line_len(), Some(4));
    }

    #[test]
    fn exact_fill_moves_to_next_line_with_style() {
        let style = Style::new().bg(Color::Green).fg(Color::Red);
        let state = wrap_styled(&["iiiii"], Some(5), "super super super super super super", &style);
        assert_eq!(
            state.lines(),
            [
                "iiiii\x1b[31;42msuper super sup\x1b[39;49m",
                "\x1b[31;42mer super super super\x1b[39;49m",
                ""
            ]
        );
        assert_eq!(state.line_len(), Some(0));
    }

    #[test]
    fn finish_drops_fill_break_only() {
        let filled = wrap(&[""], Some(0), &"x".repeat(WIDTH));
        assert_eq!(filled.lines(), ["x".repeat(WIDTH), String::new()]);
        assert_eq!(filled.finish(), ["x".repeat(WIDTH)]);

        let asked = wrap(&[""], Some(0), "abc\n");
        assert_eq!(asked.finish(), ["abc                 ", ""]);
    }

    #[test]
    fn fill_break_still_starts_next_fragment_on_new_line() {
        let state = wrap(&[""], Some(0), &"x".repeat(WIDTH)).push_text("abc", WIDTH, &Style::new(), &RENDERER);
        assert_eq!(state.finish(), ["x".repeat(WIDTH), "abc".to_owned()]);
    }

    #[test]
    fn exact_fill_in_middle_line_adds_no_blank() {
        let state = wrap(&[""], Some(0), "12345678901234567890\nabc");
        assert_eq!(state.lines(), ["12345678901234567890", "abc"]);
        assert_eq!(state.line_len(), Some(3));
    }

    #[test]
    fn line_breaks_only_are_all_kept() {
        let blank = " ".repeat(WIDTH);
        let state = wrap(&[""], Some(0), "\n\n");
        assert_eq!(state.lines(), [blank.as_str(), blank.as_str(), ""]);
        assert_eq!(state.line_len(), Some(0));
    }

    #[test]
    fn crlf_and_trailing_spaces_are_normalized() {
        let state = wrap(&[""], Some(0), "ab   \r\ncd");
        assert_eq!(state.lines(), ["ab                  ", "cd"]);
    }

    // ── Edge cases ──────────────────────────────────────────────────────

    #[test]
    fn single_space() {
        let state = wrap(&[""], Some(0), " ");
        assert_eq!(state.lines(), [" "]);
        assert_eq!(state.line_len(), Some(1));
    }

    #[test]
    fn empty_text_is_noop() {
        let state = wrap(&["abcdeabcde"], Some(10), "");
        assert_eq!(state.lines(), ["abcdeabcde"]);
        assert_eq!(state.line_len(), Some(10));
    }

    #[test]
    fn zero_width_is_noop() {
        let state = WrapState::new().push_text("abc", 0, &Style::new(), &RENDERER);
        assert_eq!(state, WrapState::new());
    }

    #[test]
    fn overlong_head_forces_new_line() {
        let head = "super super super super super super super super super long line";
        let state = wrap(&[head], Some(63), "abc");
        assert_eq!(state.lines(), [head, "abc"]);
        assert_eq!(state.line_len(), Some(3));
    }

    #[test]
    fn unknown_line_len_is_measured() {
        let state = wrap(&["iii"], None, "abc");
        assert_eq!(state.lines(), ["iiiabc"]);
        assert_eq!(state.line_len(), Some(6));
    }

    #[test]
    fn unknown_line_len_ignores_escapes() {
        let state = wrap(&["\x1b[31miiiiiiiiiiiiiiiiii\x1b[39m"], None, "abcd");
        assert_eq!(state.lines(), ["\x1b[31miiiiiiiiiiiiiiiiii\x1b[39mab", "cd"]);
        assert_eq!(state.line_len(), Some(2));
    }

    #[test]
    fn first_piece_padding_accounts_for_current_line() {
        let style = Style::new().fg(Color::Blue);
        let state = wrap_styled(&["awesome text"], Some(12), "\nnext", &style);
        assert_eq!(state.lines(), ["awesome text\x1b[34m        \x1b[39m", "\x1b[34mnext\x1b[39m"]);
    }

    #[test]
    fn multibyte_chars_count_once() {
        let state = wrap(&[""], Some(0), &"é".repeat(25));
        assert_eq!(state.lines(), ["é".repeat(20), "é".repeat(5)]);
        assert_eq!(state.line_len(), Some(5));
    }

    #[test]
    fn no_line_exceeds_width() {
        let text = "lorem ipsum dolor sit amet\nconsectetur adipiscing elit, sed do eiusmod\n\ntempor";
        let state = wrap(&["head"], Some(4), text);
        for line in state.lines() {
            assert!(visible_len(line) <= WIDTH, "line too long: {line:?}");
        }
    }
}
