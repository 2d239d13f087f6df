// SPDX-License-Identifier: MIT
//
// Renderer — turns a Style plus a text fragment into escape-coded output.
//
// The only environment-dependent decision in the whole pipeline lives
// here: whether the terminal handles OSC 8 hyperlinks. It is made once,
// by `Renderer::detect()`, and carried as a plain value afterwards.
//
// Output shapes:
//
//   hyperlink   ESC]8;;<url>ESC\ <text> ESC]8;;ESC\
//   styled      ESC[<set>m <text> ESC[<unset>m
//   plain       <text>
//
// A hyperlink wins over colors and options when both are present.
// Set and unset codes are each sorted as strings before joining, so equal
// styles always produce byte-identical output.

use std::env;
use std::fmt;

use sc_term::ansi;

use crate::style::Style;

/// Environment variable set by JetBrains IDE terminals.
const TERMINAL_EMULATOR_VAR: &str = "TERMINAL_EMULATOR";

/// Environment variable set by Konsole.
const KONSOLE_VERSION_VAR: &str = "KONSOLE_VERSION";

/// Whether a terminal handles hyperlink escapes, from its environment.
///
/// JetBrains' JediTerm and Konsole print the raw OSC 8 bytes instead of
/// a link, so both are denied. Everything else is assumed to cope.
#[must_use]
pub fn hyperlinks_supported(term_emulator: Option<&str>, konsole_version: Option<&str>) -> bool {
    term_emulator != Some("JetBrains-JediTerm") && konsole_version.is_none_or(str::is_empty)
}

/// Applies styles to text fragments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Renderer {
    hyperlinks: bool,
}

impl Renderer {
    #[must_use]
    pub const fn new(hyperlinks: bool) -> Self {
        Self { hyperlinks }
    }

    /// Build a renderer for the terminal this process runs in.
    #[must_use]
    pub fn detect() -> Self {
        let term_emulator = env::var(TERMINAL_EMULATOR_VAR).ok();
        let konsole_version = env::var(KONSOLE_VERSION_VAR).ok();
        let hyperlinks = hyperlinks_supported(term_emulator.as_deref(), konsole_version.as_deref());
        tracing::debug!(hyperlinks, "detected renderer capabilities");
        Self::new(hyperlinks)
    }

    /// Whether `href` styles render as hyperlinks.
    #[must_use]
    pub const fn hyperlinks(&self) -> bool {
        self.hyperlinks
    }

    /// Return `text` wrapped in the escape sequences for `style`.
    #[must_use]
    pub fn apply(&self, style: &Style, text: &str) -> String {
        let mut out = String::with_capacity(text.len() + 16);
        // Writing into a String cannot fail.
        let _ = self.paint(&mut out, style, text);
        out
    }

    /// Write `text` wrapped in the escape sequences for `style` to `w`.
    ///
    /// # Errors
    ///
    /// Only what the underlying writer reports.
    pub fn paint(&self, w: &mut impl fmt::Write, style: &Style, text: &str) -> fmt::Result {
        if self.hyperlinks {
            if let Some(url) = style.href.as_deref().filter(|u| !u.is_empty()) {
                ansi::hyperlink_open(w, url)?;
                w.write_str(text)?;
                return ansi::hyperlink_close(w);
            }
        }

        let (mut set, mut unset) = sgr_codes(style);
        if set.is_empty() {
            return w.write_str(text);
        }

        set.sort_unstable();
        unset.sort_unstable();
        ansi::sgr(w, &set)?;
        w.write_str(text)?;
        ansi::sgr(w, &unset)
    }
}

/// Collect the SGR set and unset codes of a style, unsorted.
fn sgr_codes(style: &Style) -> (Vec<String>, Vec<String>) {
    let colors = [
        style.fg.as_ref().and_then(|c| c.fg_codes()),
        style.bg.as_ref().and_then(|c| c.bg_codes()),
    ];

    colors
        .into_iter()
        .flatten()
        .chain(style.options.codes())
        .map(|(set, unset)| (set.to_string(), unset.to_string()))
        .unzip()
}

// ─── Tests ──────────────────────────────────────────────────────────────────
