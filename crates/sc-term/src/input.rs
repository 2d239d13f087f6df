// SPDX-License-Identifier: MIT
//
// Terminal key input.
//
// Turns raw stdin bytes into structured key events. Covers what a
// raw-mode prompt sees from a terminal in its default keyboard mode:
//
// - Legacy CSI sequences (arrows, Home/End, editing keys, with modifiers)
// - SS3 sequences (arrow/Home/End alternate encoding from some terminals)
// - Alt+key (ESC followed by printable character)
// - Control characters (Ctrl+letter, Enter, Tab, Backspace)
// - UTF-8 multi-byte characters
//
// # Design
//
// The parser maintains a small internal byte buffer because escape
// sequences can span multiple `read()` calls. Feed bytes with
// [`Parser::advance`], retrieve events from the returned `Vec`. When no
// more bytes are coming, call [`Parser::flush`] to emit any pending lone
// ESC as a real Escape keypress.
//
// [`KeyReader`] wraps a parser around any `io::Read` and hands out one key
// at a time, blocking until a key is available or the stream ends.

use std::collections::VecDeque;
use std::io::{self, Read};

use bitflags::bitflags;

// ─── Event Types ────────────────────────────────────────────────────────────

/// A keyboard event with key identity and modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// Which key was pressed.
    pub code: KeyCode,
    /// Active modifier keys (Shift, Alt, Ctrl).
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// A key press with no modifiers.
    #[must_use]
    pub const fn plain(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::empty(),
        }
    }

    /// A key press with the Ctrl modifier.
    #[must_use]
    pub const fn ctrl(ch: char) -> Self {
        Self {
            code: KeyCode::Char(ch),
            modifiers: Modifiers::CTRL,
        }
    }

    /// Whether this is Ctrl-C, the interrupt key.
    ///
    /// In raw mode the terminal delivers Ctrl-C as byte `0x03` instead of
    /// raising SIGINT, so interactive code has to recognize it itself.
    #[must_use]
    pub fn is_interrupt(&self) -> bool {
        self.code == KeyCode::Char('c') && self.modifiers == Modifiers::CTRL
    }
}

/// Identity of a key.
///
/// Named keys have dedicated variants; printable characters use
/// [`Char`](KeyCode::Char).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    /// A Unicode character (printable, or the letter of a Ctrl combination).
    Char(char),
    // ── Named keys ──────────────────────────────────────────────
    Enter,
    Tab,
    Backspace,
    Escape,
    Delete,
    Insert,
    // ── Navigation ──────────────────────────────────────────────
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
}

bitflags! {
    /// Keyboard modifier flags.
    ///
    /// Matches the xterm CSI modifier encoding where `param = 1 + bitmask`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0000_0001;
        const ALT   = 0b0000_0010;
        const CTRL  = 0b0000_0100;
    }
}

// ─── Parser ─────────────────────────────────────────────────────────────────

/// Terminal input parser.
///
/// Feed raw bytes via [`advance`](Parser::advance) and collect
/// [`KeyEvent`]s. The parser buffers incomplete sequences internally and
/// resumes parsing when more bytes arrive.
///
/// # Escape vs escape-sequence ambiguity
///
/// A bare `ESC` byte (0x1B) could be either a standalone Escape keypress
/// or the start of a multi-byte escape sequence. The parser keeps a lone
/// ESC pending; call [`flush`](Parser::flush) to emit it as a real Escape
/// key event.
pub struct Parser {
    /// Accumulated raw bytes waiting to be parsed.
    buf: Vec<u8>,
}

impl Parser {
    /// Create a new parser with an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(16),
        }
    }

    /// Feed raw bytes from stdin and return all events that can be parsed.
    ///
    /// Bytes that form an incomplete sequence are kept in the internal
    /// buffer and will be combined with future [`advance`](Parser::advance)
    /// calls.
    pub fn advance(&mut self, data: &[u8]) -> Vec<KeyEvent> {
        self.buf.extend_from_slice(data);
        let mut events = Vec::new();
        let mut pos = 0;

        while pos < self.buf.len() {
            match try_parse(&self.buf[pos..]) {
                Parsed::Event(event, consumed) => {
                    events.push(event);
                    pos += consumed;
                }
                Parsed::Incomplete => break,
                Parsed::Skip(n) => pos += n,
            }
        }

        // Compact: remove consumed bytes, keep unconsumed remainder.
        if pos > 0 {
            self.buf.drain(..pos);
        }

        events
    }

    /// Are there unconsumed bytes that might complete with more data?
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.buf.is_empty()
    }

    /// Is the only pending byte a single ESC?
    #[must_use]
    pub fn pending_is_lone_escape(&self) -> bool {
        self.buf == [0x1B]
    }

    /// Flush pending bytes as literal key events.
    ///
    /// A lone ESC byte becomes an Escape key event, and any other leftover
    /// ASCII bytes become `Char` events. Incomplete UTF-8 is dropped.
    pub fn flush(&mut self) -> Vec<KeyEvent> {
        let mut events = Vec::new();
        for &byte in &self.buf {
            let event = match byte {
                0x1B => KeyEvent::plain(KeyCode::Escape),
                0x00 => KeyEvent::ctrl('@'),
                b @ 0x01..=0x1A => KeyEvent::ctrl((b + b'a' - 1) as char),
                0x7F => KeyEvent::plain(KeyCode::Backspace),
                b @ 0x20..=0x7E => KeyEvent::plain(KeyCode::Char(b as char)),
                _ => continue,
            };
            events.push(event);
        }
        self.buf.clear();
        events
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Stateless Parsing Functions ────────────────────────────────────────────
//
// All parse functions are pure: they read from the front of `buf` and
// return what they found plus how many bytes to consume.

/// Result of trying to parse one event from the buffer.
enum Parsed {
    /// Successfully parsed an event, consuming `usize` bytes.
    Event(KeyEvent, usize),
    /// Sequence is incomplete; need more bytes.
    Incomplete,
    /// Unrecognized byte(s), skip `usize` bytes.
    Skip(usize),
}

/// Try to parse a single event from the front of `buf`.
fn try_parse(buf: &[u8]) -> Parsed {
    let Some(&lead) = buf.first() else {
        return Parsed::Skip(0);
    };

    match lead {
        // ESC: could be escape sequence or standalone Escape key.
        0x1B => parse_escape(buf),
        // Control characters.
        0x00 => Parsed::Event(KeyEvent::ctrl('@'), 1),
        b @ (0x01..=0x07 | 0x0B..=0x0C | 0x0E..=0x1A) => {
            Parsed::Event(KeyEvent::ctrl((b + b'a' - 1) as char), 1)
        }
        0x08 | 0x7F => Parsed::Event(KeyEvent::plain(KeyCode::Backspace), 1),
        0x09 => Parsed::Event(KeyEvent::plain(KeyCode::Tab), 1),
        0x0A | 0x0D => Parsed::Event(KeyEvent::plain(KeyCode::Enter), 1),
        // ASCII printable.
        b @ 0x20..=0x7E => Parsed::Event(KeyEvent::plain(KeyCode::Char(b as char)), 1),
        // UTF-8 multi-byte.
        0xC0..=0xFF => parse_utf8(buf),
        // Bare continuation bytes (0x80..=0xBF) are an invalid lead, skip.
        _ => Parsed::Skip(1),
    }
}

// ── Escape sequences ────────────────────────────────────────────────────────

fn parse_escape(buf: &[u8]) -> Parsed {
    debug_assert_eq!(buf[0], 0x1B);

    if buf.len() < 2 {
        return Parsed::Incomplete;
    }

    match buf[1] {
        // CSI: ESC [
        b'[' => parse_csi(buf),
        // SS3: ESC O
        b'O' => parse_ss3(buf),
        // Alt+printable character.
        b @ 0x20..=0x7E => Parsed::Event(
            KeyEvent {
                code: KeyCode::Char(b as char),
                modifiers: Modifiers::ALT,
            },
            2,
        ),
        // Unknown byte after ESC: emit standalone Escape.
        _ => Parsed::Event(KeyEvent::plain(KeyCode::Escape), 1),
    }
}

// ── CSI (Control Sequence Introducer) ───────────────────────────────────────

fn parse_csi(buf: &[u8]) -> Parsed {
    debug_assert!(buf.len() >= 2 && buf[0] == 0x1B && buf[1] == b'[');

    // Scan for the final byte (0x40..=0x7E).
    // CSI parameter bytes are in 0x30..=0x3F, intermediate in 0x20..=0x2F.
    let mut end = 2;
    while end < buf.len() {
        let b = buf[end];
        if (0x40..=0x7E).contains(&b) {
            break;
        }
        if !(0x20..=0x3F).contains(&b) {
            // Invalid byte in CSI sequence, abort.
            return Parsed::Skip(end + 1);
        }
        end += 1;
    }

    if end >= buf.len() {
        return Parsed::Incomplete;
    }

    let final_byte = buf[end];
    let params = parse_csi_params(&buf[2..end]);
    let consumed = end + 1;
    let modifiers = params
        .get(1)
        .map_or(Modifiers::empty(), |&p| decode_modifiers(p));

    // ── Tilde-terminated sequences (editing keys) ────────────────────
    if final_byte == b'~' {
        let code = match params.first().copied().unwrap_or(0) {
            1 | 7 => KeyCode::Home,
            2 => KeyCode::Insert,
            3 => KeyCode::Delete,
            4 | 8 => KeyCode::End,
            5 => KeyCode::PageUp,
            6 => KeyCode::PageDown,
            _ => return Parsed::Skip(consumed),
        };
        return Parsed::Event(KeyEvent { code, modifiers }, consumed);
    }

    // ── Standard CSI sequences with letter final bytes ──────────────
    let code = match final_byte {
        b'A' => KeyCode::Up,
        b'B' => KeyCode::Down,
        b'C' => KeyCode::Right,
        b'D' => KeyCode::Left,
        b'H' => KeyCode::Home,
        b'F' => KeyCode::End,
        b'Z' => {
            return Parsed::Event(
                KeyEvent {
                    code: KeyCode::Tab,
                    modifiers: Modifiers::SHIFT,
                },
                consumed,
            );
        }
        _ => return Parsed::Skip(consumed),
    };

    Parsed::Event(KeyEvent { code, modifiers }, consumed)
}

// ── SS3 (Single Shift 3) ───────────────────────────────────────────────────

fn parse_ss3(buf: &[u8]) -> Parsed {
    debug_assert!(buf.len() >= 2 && buf[0] == 0x1B && buf[1] == b'O');

    if buf.len() < 3 {
        return Parsed::Incomplete;
    }

    let code = match buf[2] {
        b'A' => KeyCode::Up,
        b'B' => KeyCode::Down,
        b'C' => KeyCode::Right,
        b'D' => KeyCode::Left,
        b'H' => KeyCode::Home,
        b'F' => KeyCode::End,
        _ => return Parsed::Skip(3),
    };

    Parsed::Event(KeyEvent::plain(code), 3)
}

// ── UTF-8 ──────────────────────────────────────────────────────────────────

fn parse_utf8(buf: &[u8]) -> Parsed {
    let expected = utf8_char_len(buf[0]);

    if expected == 0 {
        return Parsed::Skip(1);
    }
    if buf.len() < expected {
        return Parsed::Incomplete;
    }

    std::str::from_utf8(&buf[..expected]).map_or(Parsed::Skip(1), |s| {
        s.chars().next().map_or(Parsed::Skip(expected), |ch| {
            Parsed::Event(KeyEvent::plain(KeyCode::Char(ch)), expected)
        })
    })
}

// ─── Helpers ────────────────────────────────────────────────────────────────

/// Parse semicolon-separated numeric CSI parameters.
///
/// Examples: `1;2` → `[1, 2]`, (empty) → `[]`. Non-digit bytes end a
/// parameter; values saturate at `u16::MAX`.
fn parse_csi_params(raw: &[u8]) -> Vec<u16> {
    if raw.is_empty() {
        return Vec::new();
    }

    raw.split(|&b| b == b';')
        .map(|param| {
            param
                .iter()
                .take_while(|b| b.is_ascii_digit())
                .fold(0u16, |acc, &b| {
                    acc.saturating_mul(10).saturating_add(u16::from(b - b'0'))
                })
        })
        .collect()
}

/// Decode CSI modifier parameter into `Modifiers` bitflags.
///
/// The encoding is `1 + bitmask`. A parameter of 0 or 1 means no modifiers.
/// Bits beyond Shift/Alt/Ctrl are dropped.
#[allow(clippy::cast_possible_truncation)]
const fn decode_modifiers(param: u16) -> Modifiers {
    let val = if param > 0 { param - 1 } else { 0 };
    Modifiers::from_bits_truncate(val as u8)
}

/// Expected byte length of a UTF-8 character from its lead byte.
/// Returns 0 for invalid lead bytes (continuation bytes, 0xF8..).
const fn utf8_char_len(lead: u8) -> usize {
    match lead {
        0x00..=0x7F => 1,
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => 0,
    }
}

// ─── KeyReader ──────────────────────────────────────────────────────────────

/// Read buffer size. A keypress is 1-6 bytes; a burst of held-down arrow
/// keys is a few dozen.
const READ_BUF_SIZE: usize = 256;

/// Blocking single-key reader over any byte source.
///
/// Each [`read_key`](Self::read_key) returns the next key, reading from the
/// source only when no parsed key is queued. Keys that arrive together in
/// one read (a fast typist, a held arrow key) are queued and handed out one
/// per call.
///
/// A read that ends in a lone ESC is flushed immediately: that ESC is the
/// Escape key itself. Any longer incomplete sequence (`ESC [`, `ESC O 1`,
/// half a UTF-8 character) stays buffered until the next read completes
/// it, since a slow link can split one key across reads. End of input
/// flushes whatever is left.
///
/// # Example
///
/// ```no_run
/// use sc_term::input::KeyReader;
///
/// let mut keys = KeyReader::new(std::io::stdin());
/// while let Some(key) = keys.read_key()? {
///     println!("{key:?}");
/// }
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct KeyReader<R> {
    source: R,
    parser: Parser,
    queue: VecDeque<KeyEvent>,
}

impl<R: Read> KeyReader<R> {
    /// Wrap a byte source.
    pub fn new(source: R) -> Self {
        Self {
            source,
            parser: Parser::new(),
            queue: VecDeque::new(),
        }
    }

    /// Block until the next key is available.
    ///
    /// Returns `Ok(None)` once the source reaches end of input and every
    /// buffered key has been handed out.
    ///
    /// # Errors
    ///
    /// Returns any I/O error from the underlying source other than
    /// `Interrupted`, which is retried.
    pub fn read_key(&mut self) -> io::Result<Option<KeyEvent>> {
        let mut buf = [0u8; READ_BUF_SIZE];

        loop {
            if let Some(key) = self.queue.pop_front() {
                return Ok(Some(key));
            }

            let n = match self.source.read(&mut buf) {
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };

            if n == 0 {
                if self.parser.has_pending() {
                    self.queue.extend(self.parser.flush());
                }
                return Ok(self.queue.pop_front());
            }

            self.queue.extend(self.parser.advance(&buf[..n]));
            if self.parser.pending_is_lone_escape() {
                self.queue.extend(self.parser.flush());
            }
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
