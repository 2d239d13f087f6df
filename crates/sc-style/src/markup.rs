// SPDX-License-Identifier: MIT
//
// Markup — tag scanning and the formatting pass.
//
// Markup is plain text with inline style tags:
//
//   <fg=red;options=bold>   open a style
//   </fg=red;options=bold>  close the most recent matching style
//   </>                     close the most recent style
//   \<                      a literal `<`
//
// Formatting is a fold. `tokenize` turns the input into a flat list of
// tokens; each token either adds text to the `WrapState` accumulator (in
// the style on top of the `StyleStack`) or changes the stack.
//
// Malformed tags never fail: a tag whose body does not parse is just text.

use std::sync::LazyLock;

use regex::Regex;

use crate::render::Renderer;
use crate::stack::StyleStack;
use crate::style::Style;
use crate::wrap::WrapState;

/// Anything shaped like a tag: `<name...>`, `</name...>`, or `</>`.
/// Group 1 is the body of an opening tag, or the `/...` of a closing one.
static TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<([a-z][^<>]*|/([a-z][^<>]*)?)>").expect("tag pattern is valid")
});

// ─── Escaping ───────────────────────────────────────────────────────────────

/// Make `text` print literally by escaping every `<`.
///
/// ```
/// use sc_style::markup::{escape, unescape};
///
/// let user_input = "a <b> c";
/// assert_eq!(escape(user_input), r"a \<b> c");
/// assert_eq!(unescape(&escape(user_input)), user_input);
/// ```
#[must_use]
pub fn escape(text: &str) -> String {
    text.replace('<', r"\<")
}

/// Undo [`escape`]: turn every `\<` back into `<`.
#[must_use]
pub fn unescape(text: &str) -> String {
    text.replace(r"\<", "<")
}

// ─── Tokens ─────────────────────────────────────────────────────────────────

/// One step of a formatting pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    /// Literal text, still escaped.
    Text(&'a str),
    /// `<body>` with a valid body.
    Open(Style),
    /// `</body>` with a valid body.
    Close(Style),
    /// `</>`.
    CloseCurrent,
}

/// Split markup into tokens.
///
/// Tags preceded by a backslash and tags whose body is not a valid style
/// come out as [`Token::Text`]. Adjacent text is not merged.
#[must_use]
pub fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut offset = 0;

    for caps in TAG.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        if text[..whole.start()].ends_with('\\') {
            continue;
        }

        if offset < whole.start() {
            tokens.push(Token::Text(&text[offset..whole.start()]));
        }
        offset = whole.end();

        let tag = whole.as_str();
        let body = caps.get(1).map_or("", |m| m.as_str());
        let token = match body.strip_prefix('/') {
            Some("") => Token::CloseCurrent,
            Some(close) => Style::parse(close).map_or(Token::Text(tag), Token::Close),
            None => Style::parse(body).map_or(Token::Text(tag), Token::Open),
        };
        if token == Token::Text(tag) {
            tracing::trace!(tag, "malformed tag kept as text");
        }
        tokens.push(token);
    }

    if offset < text.len() {
        tokens.push(Token::Text(&text[offset..]));
    }
    tokens
}

// ─── Formatting ─────────────────────────────────────────────────────────────

/// Render markup into styled lines no wider than `width` visible chars.
///
/// Every line but the last is padded to `width`. `base` is drawn under
/// everything: unstyled text uses it as is, and tags are merged over it.
///
/// ```
/// use sc_style::markup::format_text;
/// use sc_style::render::Renderer;
///
/// let lines = format_text("<fg=red>awesome text</>", 20, None, &Renderer::new(true));
/// assert_eq!(lines, ["\x1b[31mawesome text\x1b[39m"]);
/// ```
#[must_use]
pub fn format_text(text: &str, width: usize, base: Option<&Style>, renderer: &Renderer) -> Vec<String> {
    let mut stack = base.map_or_else(StyleStack::new, |b| StyleStack::with_base(b.clone()));

    tokenize(text)
        .into_iter()
        .fold(WrapState::new(), |state, token| match token {
            Token::Text(literal) => {
                state.push_text(&unescape(literal), width, stack.current(), renderer)
            }
            Token::Open(style) => {
                stack.push(&style);
                state
            }
            Token::Close(style) => {
                stack.pop(&style);
                state
            }
            Token::CloseCurrent => {
                stack.pop_current();
                state
            }
        })
        .finish()
}

/// Reusable formatting settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatter {
    width: usize,
    base: Option<Style>,
    renderer: Renderer,
}

impl Formatter {
    #[must_use]
    pub const fn new(width: usize, renderer: Renderer) -> Self {
        Self {
            width,
            base: None,
            renderer,
        }
    }

    /// Draw every line over `base`.
    #[must_use]
    pub fn with_base(mut self, base: Style) -> Self {
        self.base = Some(base);
        self
    }

    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub const fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// See [`format_text`].
    #[must_use]
    pub fn format(&self, text: &str) -> Vec<String> {
        format_text(text, self.width, self.base.as_ref(), &self.renderer)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Color;
    use crate::wrap::visible_len;
    use pretty_assertions::assert_eq;

    const WIDTH: usize = 20;
    const RENDERER: Renderer = Renderer::new(true);

    fn fmt(text: &str) -> Vec<String> {
        format_text(text, WIDTH, None, &RENDERER)
    }

    fn fmt_on(text: &str, base: &str) -> Vec<String> {
        let base = Style::parse(base).unwrap();
        format_text(text, WIDTH, Some(&base), &RENDERER)
    }

    // ── Tokenizer ───────────────────────────────────────────────────────

    #[test]
    fn tokenize_open_text_close() {
        assert_eq!(
            tokenize("a<fg=red>b</>c"),
            vec![
                Token::Text("a"),
                Token::Open(Style::new().fg(Color::Red)),
                Token::Text("b"),
                Token::CloseCurrent,
                Token::Text("c"),
            ]
        );
    }

    #[test]
    fn tokenize_explicit_close() {
        assert_eq!(
            tokenize("</bg=blue>"),
            vec![Token::Close(Style::new().bg(Color::Blue))]
        );
    }

    #[test]
    fn tokenize_invalid_tag_is_text() {
        assert_eq!(
            tokenize("<toto=titi>x"),
            vec![Token::Text("<toto=titi>"), Token::Text("x")]
        );
    }

    #[test]
    fn tokenize_skips_escaped_tag() {
        assert_eq!(tokenize(r"\<fg=red>x"), vec![Token::Text(r"\<fg=red>x")]);
    }

    #[test]
    fn tokenize_ignores_non_tags() {
        assert_eq!(tokenize("a < b > c <1>"), vec![Token::Text("a < b > c <1>")]);
    }

    // ── Escaping ────────────────────────────────────────────────────────

    #[test]
    fn escape_round_trip() {
        let text = "<fg=red>not a tag</> and a <b";
        assert_eq!(unescape(&escape(text)), text);
    }

    #[test]
    fn escaped_markup_prints_literally() {
        let text = escape("<fg=red>x</>");
        assert_eq!(fmt(&text), ["<fg=red>x</>"]);
    }

    // ── Without base ────────────────────────────────────────────────────

    #[test]
    fn plain_text_is_unchanged() {
        assert_eq!(fmt("great text"), ["great text"]);
    }

    #[test]
    fn text_as_wide_as_the_line_is_unchanged() {
        assert_eq!(format_text("abc", 3, None, &RENDERER), ["abc"]);
        assert_eq!(fmt(&"x".repeat(WIDTH)), ["x".repeat(WIDTH)]);
        assert_eq!(
            fmt(&format!("<fg=red>{}</>", "x".repeat(WIDTH))),
            [format!("\x1b[31m{}\x1b[39m", "x".repeat(WIDTH))]
        );
    }

    #[test]
    fn plain_text_up_to_width_round_trips() {
        for text in ["a", "great text", "émoji → ok", "ends with space "] {
            let len = text.chars().count();
            for width in len..=len + 3 {
                assert_eq!(format_text(text, width, None, &RENDERER), [text], "width {width}");
            }
        }
    }

    #[test]
    fn explicit_break_after_full_line_is_kept() {
        assert_eq!(format_text("abc\n", 3, None, &RENDERER), ["abc", ""]);
    }

    #[test]
    fn no_line_exceeds_width() {
        let inputs = [
            "great text",
            "<fg=red>awesome text</> and more text after it",
            "a\nbb\n\nccc\n",
            "one <bg=blue>two <options=bold>three</> four</> five six seven",
            r"escaped \<fg=red> tag and <fg=green>real</fg=green> tag",
            "<href=https://example.com>a link long enough to wrap</>",
            "trailing spaces   \r\nand crlf",
            "<toto=titi>bad tag</fg=blue> then text",
            "éàü éàü éàü éàü éàü éàü",
            "xxxxxxxxxxxxxxxxxxxxxxxxx",
        ];
        for text in inputs {
            for width in 1..=25 {
                for line in format_text(text, width, None, &RENDERER) {
                    assert!(
                        visible_len(&line) <= width,
                        "{text:?} at width {width}: {line:?} is too long"
                    );
                }
            }
        }
    }

    #[test]
    fn multiple_lines_are_padded() {
        assert_eq!(
            fmt("awesome text\non\nmultiple lines."),
            ["awesome text        ", "on                  ", "multiple lines."]
        );
    }

    #[test]
    fn simple_tag() {
        assert_eq!(fmt("<fg=red>awesome text</>"), ["\x1b[31mawesome text\x1b[39m"]);
    }

    #[test]
    fn style_spans_line_breaks() {
        assert_eq!(
            format_text(
                "Some\ntext\nthat can handle <fg=red>multi-line\nstyling.</> This is a very long line.",
                30,
                None,
                &RENDERER,
            ),
            [
                "Some                          ",
                "text                          ",
                "that can handle \x1b[31mmulti-line    \x1b[39m",
                "\x1b[31mstyling.\x1b[39m This is a very long l",
                "ine.",
            ]
        );
    }

    #[test]
    fn nested_styles() {
        assert_eq!(
            fmt("awesome text <fg=red>with <bg=blue>imbricated styles</> and on\nmultiple</> lines."),
            [
                "awesome text \x1b[31mwith \x1b[39m\x1b[44mim\x1b[49m",
                "\x1b[44mbricated styles\x1b[49m\x1b[31m and \x1b[39m",
                "\x1b[31mon                  \x1b[39m",
                "\x1b[31mmultiple\x1b[39m lines.",
            ]
        );
    }

    #[test]
    fn empty_input() {
        assert_eq!(fmt(""), [""]);
        assert_eq!(fmt("<fg=red></>"), [""]);
    }

    #[test]
    fn unknown_color_renders_plain() {
        assert_eq!(fmt("<fg=wrong>qsdf</>"), ["qsdf"]);
    }

    #[test]
    fn unknown_key_is_literal() {
        assert_eq!(fmt("<toto=titi>qsdf"), ["<toto=titi>qsdf"]);
    }

    #[test]
    fn unmatched_close_is_consumed() {
        assert_eq!(fmt("<toto=titi>qsdf</fg=blue>"), ["<toto=titi>qsdf"]);
        assert_eq!(fmt("testt</fg=blue>est"), ["testtest"]);
    }

    #[test]
    fn unclosed_tag_styles_to_the_end() {
        assert_eq!(fmt("<fg=blue>testtest"), ["\x1b[34mtesttest\x1b[39m"]);
    }

    #[test]
    fn explicit_close_pops_nested() {
        assert_eq!(
            fmt("<fg=red>a<bg=blue>b</fg=red>c"),
            ["\x1b[31ma\x1b[39m\x1b[44mb\x1b[49mc"]
        );
    }

    #[test]
    fn hyperlink_tag() {
        assert_eq!(
            fmt("see <href=https://example.com>docs</>"),
            ["see \x1b]8;;https://example.com\x1b\\docs\x1b]8;;\x1b\\"]
        );
    }

    #[test]
    fn escaped_tag_does_not_count_backslash() {
        assert_eq!(fmt(r"\<b>"), ["<b>"]);
    }

    // ── With base ───────────────────────────────────────────────────────

    #[test]
    fn base_is_merged_under_tag() {
        assert_eq!(
            fmt_on("<fg=red>awesome text</>", "bg=green;fg=blue"),
            ["\x1b[31;42mawesome text\x1b[39;49m"]
        );
    }

    #[test]
    fn base_applies_to_plain_text() {
        assert_eq!(
            fmt_on("awesome <fg=red>text</>", "bg=green;fg=blue"),
            ["\x1b[34;42mawesome \x1b[39;49m\x1b[31;42mtext\x1b[39;49m"]
        );
    }

    #[test]
    fn base_fills_padding() {
        assert_eq!(
            fmt_on(
                "awesome <fg=red>text</>\nwith <fg=yellow>multiple lines</>",
                "bg=green;fg=blue"
            ),
            [
                "\x1b[34;42mawesome \x1b[39;49m\x1b[31;42mtext\x1b[39;49m\x1b[34;42m        \x1b[39;49m",
                "\x1b[34;42mwith \x1b[39;49m\x1b[33;42mmultiple lines\x1b[39;49m",
            ]
        );
    }

    // ── Formatter ───────────────────────────────────────────────────────

    #[test]
    fn formatter_matches_format_text() {
        let base = Style::new().bg(Color::Red);
        let formatter = Formatter::new(WIDTH, RENDERER).with_base(base.clone());
        assert_eq!(
            formatter.format("a\nb"),
            format_text("a\nb", WIDTH, Some(&base), &RENDERER)
        );
        assert_eq!(formatter.width(), WIDTH);
    }
}
