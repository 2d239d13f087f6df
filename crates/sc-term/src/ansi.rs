// SPDX-License-Identifier: MIT
//
// ANSI escape sequence generation.
//
// Pure functions that write escape sequences. No state, no decisions about
// when to emit: callers decide that. This module just knows the byte-level
// encoding of every terminal command styledconsole needs.
//
// Two families live here:
//
//   - Control sequences (cursor movement, visibility, clearing) write to any
//     `impl io::Write`, because they go straight to the terminal.
//   - Styling sequences (SGR set/unset, OSC 8 hyperlinks) write to any
//     `impl fmt::Write`, because styled fragments are assembled in memory
//     and only printed once a whole line is ready.
//
// All cursor columns are 0-indexed in our API and converted to 1-indexed
// for the terminal (ANSI standard uses 1-based coordinates).
use std::fmt;
use std::io::{self, Write};

/// Control Sequence Introducer.
pub const CSI: &str = "\x1b[";

/// String Terminator used to close OSC sequences (`ESC \`).
pub const ST: &str = "\x1b\\";

// ─── Cursor ──────────────────────────────────────────────────────────────────

/// Hide the cursor (DECTCEM reset).
#[inline]
pub fn cursor_hide(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25l")
}

/// Show the cursor (DECTCEM set).
#[inline]
pub fn cursor_show(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25h")
}

/// Move the cursor up `n` rows (CUU). Does nothing for `n == 0`.
///
/// CUU with a zero parameter is treated as 1 by terminals, so the zero
/// case has to be filtered out here.
#[inline]
pub fn cursor_up(w: &mut impl Write, n: u16) -> io::Result<()> {
    if n == 0 {
        return Ok(());
    }
    write!(w, "\x1b[{n}A")
}

/// Move the cursor down `n` rows (CUD). Does nothing for `n == 0`.
#[inline]
pub fn cursor_down(w: &mut impl Write, n: u16) -> io::Result<()> {
    if n == 0 {
        return Ok(());
    }
    write!(w, "\x1b[{n}B")
}

/// Move the cursor to column `x` of the current row (CHA).
///
/// Our column is 0-indexed; ANSI CHA is 1-indexed.
#[inline]
pub fn cursor_column(w: &mut impl Write, x: u16) -> io::Result<()> {
    write!(w, "\x1b[{}G", x + 1)
}

// ─── Screen ──────────────────────────────────────────────────────────────────

/// Clear from the cursor to the end of the screen (ED 0).
#[inline]
pub fn clear_from_cursor(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[0J")
}

// ─── SGR ─────────────────────────────────────────────────────────────────────

/// Emit a single SGR sequence with `;`-joined parameters: `ESC[1;31m`.
///
/// Parameters are written in the order given. Does nothing if `codes` is
/// empty (an empty SGR would mean "reset everything", which is never what
/// a caller with no codes wants).
pub fn sgr<S: AsRef<str>>(w: &mut impl fmt::Write, codes: &[S]) -> fmt::Result {
    let Some((first, rest)) = codes.split_first() else {
        return Ok(());
    };

    w.write_str(CSI)?;
    w.write_str(first.as_ref())?;
    for code in rest {
        w.write_char(';')?;
        w.write_str(code.as_ref())?;
    }
    w.write_char('m')
}

// ─── Hyperlinks (OSC 8) ─────────────────────────────────────────────────────

/// Open an OSC 8 hyperlink: `ESC]8;;<url>ESC\`.
///
/// Text written after this is clickable until [`hyperlink_close`].
#[inline]
pub fn hyperlink_open(w: &mut impl fmt::Write, url: &str) -> fmt::Result {
    write!(w, "\x1b]8;;{url}{ST}")
}

/// Close the current OSC 8 hyperlink: `ESC]8;;ESC\`.
#[inline]
pub fn hyperlink_close(w: &mut impl fmt::Write) -> fmt::Result {
    write!(w, "\x1b]8;;{ST}")
}

// ─── Tests ───────────────────────────────────────────────────────────────────
