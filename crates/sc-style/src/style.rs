// SPDX-License-Identifier: MIT
//
// Style — the descriptor behind every markup tag.
//
// A `Style` is a plain value: optional foreground and background colors,
// an optional hyperlink target, and a set of text options. It is built
// either in code (builder methods) or by parsing a tag body such as
// `fg=red;bg=blue;options=bold,underscore`.
//
// Validation happens at two levels:
//
//   - Parsing validates *keys*. An unknown key (or a key without a value)
//     voids the whole descriptor, and the tag parser prints such a tag as
//     literal text.
//   - Color and option *names* are never rejected. An unknown color is kept
//     as `Color::Unknown` and renders nothing; an unknown option name is
//     dropped.
//
// Merging never mutates: `merged_over` returns a new descriptor.

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;
use thiserror::Error;

// ─── Errors ─────────────────────────────────────────────────────────────────

/// Why a tag body is not a valid style.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StyleError {
    /// The body contains no `key=value` pair at all.
    #[error("empty style")]
    Empty,
    /// A key other than `fg`, `bg`, `href`, or `options`.
    #[error("unknown style key `{0}`")]
    UnknownKey(String),
    /// A recognized key followed by `=` and nothing else.
    #[error("style key `{0}` has no value")]
    MissingValue(String),
}

// ─── Color ──────────────────────────────────────────────────────────────────

/// One of the eight named terminal colors, or the terminal default.
///
/// Names that match none of these are preserved as [`Color::Unknown`] so a
/// tag like `<fg=wrong>` still parses; it just renders without color.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    /// The terminal's own default color (SGR 39 / 49).
    Default,
    /// An unrecognized color name, lowercased.
    Unknown(String),
}

impl Color {
    /// Look up a color by name, case-insensitively.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "black" => Self::Black,
            "red" => Self::Red,
            "green" => Self::Green,
            "yellow" => Self::Yellow,
            "blue" => Self::Blue,
            "magenta" => Self::Magenta,
            "cyan" => Self::Cyan,
            "white" => Self::White,
            "default" => Self::Default,
            other => Self::Unknown(other.to_owned()),
        }
    }

    /// The canonical name of this color.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Black => "black",
            Self::Red => "red",
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Blue => "blue",
            Self::Magenta => "magenta",
            Self::Cyan => "cyan",
            Self::White => "white",
            Self::Default => "default",
            Self::Unknown(name) => name,
        }
    }

    /// Palette offset added to the SGR base (30 for fg, 40 for bg).
    /// `None` for unknown colors.
    const fn offset(&self) -> Option<u8> {
        match self {
            Self::Black => Some(0),
            Self::Red => Some(1),
            Self::Green => Some(2),
            Self::Yellow => Some(3),
            Self::Blue => Some(4),
            Self::Magenta => Some(5),
            Self::Cyan => Some(6),
            Self::White => Some(7),
            Self::Default => Some(9),
            Self::Unknown(_) => None,
        }
    }

    /// SGR `(set, unset)` codes for this color as a foreground.
    #[must_use]
    pub fn fg_codes(&self) -> Option<(u8, u8)> {
        self.offset().map(|o| (30 + o, 39))
    }

    /// SGR `(set, unset)` codes for this color as a background.
    #[must_use]
    pub fn bg_codes(&self) -> Option<(u8, u8)> {
        self.offset().map(|o| (40 + o, 49))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ─── Options ────────────────────────────────────────────────────────────────

bitflags! {
    /// Text options that can be toggled by a tag's `options=` list.
    ///
    /// ```
    /// use sc_style::style::Options;
    ///
    /// let opts = Options::BOLD | Options::UNDERSCORE;
    /// assert!(opts.contains(Options::BOLD));
    /// assert!(!opts.contains(Options::BLINK));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Options: u8 {
        /// SGR 1 / 22.
        const BOLD       = 1 << 0;
        /// SGR 4 / 24.
        const UNDERSCORE = 1 << 1;
        /// SGR 5 / 25.
        const BLINK      = 1 << 2;
        /// SGR 7 / 27.
        const REVERSE    = 1 << 3;
        /// SGR 8 / 28.
        const CONCEAL    = 1 << 4;
    }
}

/// Every option with its markup name and SGR `(set, unset)` codes.
const OPTION_TABLE: [(Options, &str, u8, u8); 5] = [
    (Options::BOLD, "bold", 1, 22),
    (Options::UNDERSCORE, "underscore", 4, 24),
    (Options::BLINK, "blink", 5, 25),
    (Options::REVERSE, "reverse", 7, 27),
    (Options::CONCEAL, "conceal", 8, 28),
];

impl Options {
    /// Look up one option by markup name, case-insensitively.
    #[must_use]
    pub fn from_markup_name(name: &str) -> Option<Self> {
        let name = name.trim();
        OPTION_TABLE
            .iter()
            .find(|(_, n, _, _)| n.eq_ignore_ascii_case(name))
            .map(|&(flag, _, _, _)| flag)
    }

    /// Parse a `,`-separated option list. Unknown names are skipped.
    #[must_use]
    pub fn from_list(list: &str) -> Self {
        list.split(',')
            .filter_map(Self::from_markup_name)
            .fold(Self::empty(), |acc, flag| acc | flag)
    }

    /// SGR `(set, unset)` codes for every option in this set.
    pub fn codes(self) -> impl Iterator<Item = (u8, u8)> {
        OPTION_TABLE
            .into_iter()
            .filter(move |(flag, _, _, _)| self.contains(*flag))
            .map(|(_, _, set, unset)| (set, unset))
    }

    /// Markup names of every option in this set, in table order.
    pub fn names(self) -> impl Iterator<Item = &'static str> {
        OPTION_TABLE
            .into_iter()
            .filter(move |(flag, _, _, _)| self.contains(*flag))
            .map(|(_, name, _, _)| name)
    }
}

// ─── Style ──────────────────────────────────────────────────────────────────

/// A complete style descriptor.
///
/// ```
/// use sc_style::style::{Color, Options, Style};
///
/// let parsed: Style = "fg=cyan;options=bold,underscore".parse().unwrap();
/// let built = Style::new()
///     .fg(Color::Cyan)
///     .options(Options::BOLD | Options::UNDERSCORE);
/// assert_eq!(parsed, built);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Hash)]
pub struct Style {
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub href: Option<String>,
    pub options: Options,
}

/// The keys a tag body may use.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Key {
    Fg,
    Bg,
    Href,
    Options,
}

impl Style {
    /// A style that sets nothing.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            fg: None,
            bg: None,
            href: None,
            options: Options::empty(),
        }
    }

    #[must_use]
    pub fn fg(mut self, color: Color) -> Self {
        self.fg = Some(color);
        self
    }

    #[must_use]
    pub fn bg(mut self, color: Color) -> Self {
        self.bg = Some(color);
        self
    }

    #[must_use]
    pub fn href(mut self, url: impl Into<String>) -> Self {
        self.href = Some(url.into());
        self
    }

    /// Add options to the set (existing ones are kept).
    #[must_use]
    pub fn options(mut self, options: Options) -> Self {
        self.options |= options;
        self
    }

    /// Whether this style sets nothing at all.
    #[must_use]
    pub fn is_plain(&self) -> bool {
        self.fg.is_none() && self.bg.is_none() && self.href.is_none() && self.options.is_empty()
    }

    /// Layer `self` over `base`.
    ///
    /// Colors and hyperlink come from `self` when set, otherwise from
    /// `base`. Options accumulate from both.
    #[must_use]
    pub fn merged_over(&self, base: &Self) -> Self {
        Self {
            fg: self.fg.clone().or_else(|| base.fg.clone()),
            bg: self.bg.clone().or_else(|| base.bg.clone()),
            href: self.href.clone().or_else(|| base.href.clone()),
            options: base.options | self.options,
        }
    }

    /// Parse a tag body: `key=value` pairs separated by `;`.
    ///
    /// Keys are case-insensitive. `options` takes a `,`-separated list, and
    /// a bare word right after an `options` pair continues that list, so
    /// `options=bold;underscore` means the same as `options=bold,underscore`.
    /// Later pairs override earlier ones for `fg`, `bg`, and `href`.
    ///
    /// # Errors
    ///
    /// [`StyleError::UnknownKey`] for any key besides `fg`, `bg`, `href`,
    /// `options` (including a bare word that follows anything other than
    /// an `options` pair), [`StyleError::MissingValue`] for `key=` with no
    /// value, and [`StyleError::Empty`] when there is nothing to parse.
    pub fn parse(body: &str) -> Result<Self, StyleError> {
        let mut style = Self::new();
        let mut last_key = None;

        for segment in body.split(';') {
            if segment.trim().is_empty() {
                continue;
            }

            let Some((raw_key, value)) = segment.split_once('=') else {
                // Continuation of an options list.
                if last_key == Some(Key::Options) {
                    style.options |= Options::from_list(segment);
                    continue;
                }
                return Err(StyleError::UnknownKey(segment.trim().to_ascii_lowercase()));
            };

            let key_name = raw_key.trim().to_ascii_lowercase();
            let key = match key_name.as_str() {
                "fg" => Key::Fg,
                "bg" => Key::Bg,
                "href" => Key::Href,
                "options" => Key::Options,
                _ => return Err(StyleError::UnknownKey(key_name)),
            };
            if value.trim().is_empty() {
                return Err(StyleError::MissingValue(key_name));
            }

            match key {
                Key::Fg => style.fg = Some(Color::from_name(value)),
                Key::Bg => style.bg = Some(Color::from_name(value)),
                Key::Href => style.href = Some(value.trim().to_owned()),
                Key::Options => style.options |= Options::from_list(value),
            }
            last_key = Some(key);
        }

        if last_key.is_none() {
            return Err(StyleError::Empty);
        }
        Ok(style)
    }
}

impl FromStr for Style {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Formats back into tag-body syntax. Parsing the output yields an equal
/// style, except that unknown option names are already gone.
impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sep = "";
        if let Some(fg) = &self.fg {
            write!(f, "{sep}fg={fg}")?;
            sep = ";";
        }
        if let Some(bg) = &self.bg {
            write!(f, "{sep}bg={bg}")?;
            sep = ";";
        }
        if let Some(href) = &self.href {
            write!(f, "{sep}href={href}")?;
            sep = ";";
        }
        if !self.options.is_empty() {
            write!(f, "{sep}options=")?;
            for (i, name) in self.options.names().enumerate() {
                if i > 0 {
                    f.write_str(",")?;
                }
                f.write_str(name)?;
            }
        }
        Ok(())
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
