// SPDX-License-Identifier: MIT
//
// ChoicePrompt — the interactive driver around `ChoiceState`.
//
// Everything terminal-facing goes through the `Tty` trait: writing bytes,
// asking the size, switching raw mode, reading one key, raising SIGINT.
// `StdTty` implements it over the real stdin/stdout; tests implement it
// over queues.
//
// One run:
//
//   check TTY ─► enter raw ─► wait while too small ─► hide cursor
//       │
//       ▼
//   ┌─► draw frame ─► read key ─► re-read size ─► state.handle_key
//   │                                                  │
//   └──────────────────── Redraw ──────────────────────┤
//                                                      ▼
//                       Confirmed / end of input / Ctrl-C ─► leave
//
// Raw mode is held by `RawSession`. Dropping it, on any path, shows the
// cursor and restores the terminal mode; the normal exit additionally
// moves the cursor below the drawn list first.
//
// Raw mode turns off output post-processing, so every line break written
// while it is active is `\r\n`.

use std::io::{self, Write};
use std::ops::{Deref, DerefMut};

use sc_style::render::Renderer;
use sc_style::style::{Color, Options, Style};
use sc_term::ansi;
use sc_term::input::{KeyEvent, KeyReader};
use sc_term::terminal::{self, RawMode, Size};

use crate::choice::{ChoiceState, Outcome, Row, truncate_label};
use crate::error::PromptError;

/// Narrowest terminal the prompt will draw in.
pub const MIN_COLS: u16 = 20;

/// Shortest terminal the prompt will draw in.
pub const MIN_ROWS: u16 = 4;

/// Size assumed when a terminal does not report one.
const FALLBACK_SIZE: Size = Size { cols: 80, rows: 24 };

const TOO_SMALL_MESSAGE: &str = "Terminal is too small... Resize and press a key.\r\n";

// ─── Tty ────────────────────────────────────────────────────────────────────

/// The terminal, as far as a prompt is concerned.
pub trait Tty: Write {
    /// Current size, if the terminal reports one.
    fn size(&mut self) -> Option<Size>;

    /// Whether output goes to a terminal at all.
    fn is_terminal(&self) -> bool;

    /// Switch input to raw mode.
    ///
    /// # Errors
    ///
    /// The OS error from changing the terminal mode.
    fn enter_raw(&mut self) -> io::Result<()>;

    /// Undo [`enter_raw`](Self::enter_raw). Must be safe to call when raw
    /// mode is not active.
    ///
    /// # Errors
    ///
    /// The OS error from changing the terminal mode.
    fn restore(&mut self) -> io::Result<()>;

    /// Block until the next key. `Ok(None)` at end of input.
    ///
    /// # Errors
    ///
    /// Any read error other than end of input.
    fn read_key(&mut self) -> io::Result<Option<KeyEvent>>;

    /// Deliver SIGINT to this process.
    ///
    /// # Errors
    ///
    /// The OS error from sending the signal.
    fn interrupt(&mut self) -> io::Result<()>;
}

/// The process's own stdin and stdout.
pub struct StdTty {
    out: io::Stdout,
    keys: KeyReader<io::Stdin>,
    raw: Option<RawMode>,
}

impl StdTty {
    #[must_use]
    pub fn new() -> Self {
        Self {
            out: io::stdout(),
            keys: KeyReader::new(io::stdin()),
            raw: None,
        }
    }
}

impl Default for StdTty {
    fn default() -> Self {
        Self::new()
    }
}

impl Write for StdTty {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.out.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

impl Tty for StdTty {
    fn size(&mut self) -> Option<Size> {
        terminal::get_size()
    }

    fn is_terminal(&self) -> bool {
        terminal::is_tty()
    }

    fn enter_raw(&mut self) -> io::Result<()> {
        if self.raw.is_none() {
            self.raw = Some(RawMode::enable()?);
        }
        Ok(())
    }

    fn restore(&mut self) -> io::Result<()> {
        self.raw.take().map_or(Ok(()), RawMode::restore)
    }

    fn read_key(&mut self) -> io::Result<Option<KeyEvent>> {
        self.keys.read_key()
    }

    fn interrupt(&mut self) -> io::Result<()> {
        terminal::raise_interrupt()
    }
}

// ─── Raw session ────────────────────────────────────────────────────────────

/// Raw mode held for the duration of one prompt.
struct RawSession<'a, T: Tty> {
    tty: &'a mut T,
    /// Rows below the label line in the last drawn frame.
    drawn: usize,
}

impl<'a, T: Tty> RawSession<'a, T> {
    fn enter(tty: &'a mut T) -> io::Result<Self> {
        tty.enter_raw()?;
        Ok(Self { tty, drawn: 0 })
    }

    /// Move below the drawn list, then let `Drop` restore the terminal.
    fn leave(self) -> io::Result<()> {
        let below = to_u16(self.drawn + 1);
        ansi::cursor_down(&mut *self.tty, below)?;
        ansi::cursor_column(&mut *self.tty, 0)?;
        self.tty.flush()
    }
}

impl<T: Tty> Deref for RawSession<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.tty
    }
}

impl<T: Tty> DerefMut for RawSession<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.tty
    }
}

impl<T: Tty> Drop for RawSession<'_, T> {
    fn drop(&mut self) {
        let _ = ansi::cursor_show(&mut *self.tty);
        let _ = self.tty.flush();
        let _ = self.tty.restore();
    }
}

fn to_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

// ─── Theme ──────────────────────────────────────────────────────────────────

/// Styles used to draw a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTheme {
    /// The question line.
    pub label: Style,
    /// The highlighted choice.
    pub highlight: Style,
}

impl Default for PromptTheme {
    fn default() -> Self {
        Self {
            label: Style::new().fg(Color::Green),
            highlight: Style::new()
                .fg(Color::Cyan)
                .options(Options::BOLD | Options::UNDERSCORE),
        }
    }
}

// ─── ChoicePrompt ───────────────────────────────────────────────────────────

/// Ask the user to pick one of several choices with the arrow keys.
///
/// ```no_run
/// use sc_prompt::ChoicePrompt;
///
/// let fruit = ChoicePrompt::new("Pick a fruit", ["apple", "banana", "cherry"])
///     .default(1)
///     .run()?;
/// println!("you picked {fruit}");
/// # Ok::<(), sc_prompt::PromptError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ChoicePrompt {
    label: String,
    choices: Vec<String>,
    default: Option<usize>,
    theme: PromptTheme,
    renderer: Renderer,
}

impl ChoicePrompt {
    pub fn new<I>(label: impl Into<String>, choices: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            label: label.into(),
            choices: choices.into_iter().map(Into::into).collect(),
            default: None,
            theme: PromptTheme::default(),
            renderer: Renderer::detect(),
        }
    }

    /// Start on this choice, and pick it if input ends.
    #[must_use]
    pub const fn default(mut self, index: usize) -> Self {
        self.default = Some(index);
        self
    }

    #[must_use]
    pub fn theme(mut self, theme: PromptTheme) -> Self {
        self.theme = theme;
        self
    }

    #[must_use]
    pub const fn renderer(mut self, renderer: Renderer) -> Self {
        self.renderer = renderer;
        self
    }

    #[must_use]
    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    /// Run on the real terminal and return the chosen label.
    ///
    /// # Errors
    ///
    /// See [`run_on`](Self::run_on).
    pub fn run(&self) -> Result<String, PromptError> {
        self.run_on(&mut StdTty::new())
    }

    /// Run on `tty` and return the chosen label, untruncated.
    ///
    /// # Errors
    ///
    /// [`PromptError::TooFewChoices`] and [`PromptError::InvalidDefault`]
    /// for a badly built prompt, [`PromptError::NotATerminal`] when `tty`
    /// is not interactive, [`PromptError::TerminalTooSmall`] and
    /// [`PromptError::EndOfInput`] when input ends early,
    /// [`PromptError::Interrupted`] after Ctrl-C if the process survives
    /// the signal, and [`PromptError::Io`] for terminal failures.
    pub fn run_on<T: Tty>(&self, tty: &mut T) -> Result<String, PromptError> {
        self.select_on(tty).map(|index| self.choices[index].clone())
    }

    /// Run on `tty` and return the chosen index.
    ///
    /// # Errors
    ///
    /// See [`run_on`](Self::run_on).
    pub fn select_on<T: Tty>(&self, tty: &mut T) -> Result<usize, PromptError> {
        let count = self.choices.len();
        if count < 2 {
            return Err(PromptError::TooFewChoices(count));
        }
        if let Some(index) = self.default.filter(|&i| i >= count) {
            return Err(PromptError::InvalidDefault { index, count });
        }
        if !tty.is_terminal() {
            return Err(PromptError::NotATerminal);
        }

        let mut session = RawSession::enter(tty)?;
        let mut size = match wait_for_room(&mut session) {
            Ok(size) => size,
            Err(PromptError::Interrupted) => {
                drop(session);
                tty.interrupt()?;
                return Err(PromptError::Interrupted);
            }
            Err(err) => return Err(err),
        };

        let mut state = ChoiceState::new(count, self.default, size.rows);
        tracing::debug!(
            count,
            default = ?self.default,
            viewport = state.viewport(),
            "choice prompt started"
        );

        ansi::cursor_hide(&mut *session)?;
        loop {
            self.draw(&mut session, &state, size.cols)?;

            let outcome = loop {
                let key = session.read_key()?;
                let previous = size;
                size = session.size().unwrap_or(size);
                let viewport_changed = state.resize(size.rows.max(MIN_ROWS));
                let resized = viewport_changed || size != previous;

                let Some(key) = key else {
                    break None;
                };
                match state.handle_key(&key) {
                    Outcome::Ignored if !resized => {}
                    outcome => break Some(outcome),
                }
            };

            match outcome {
                Some(Outcome::Redraw | Outcome::Ignored) => {}
                Some(Outcome::Confirmed(index)) => {
                    tracing::debug!(index, "choice confirmed");
                    session.leave()?;
                    return Ok(index);
                }
                Some(Outcome::Interrupted) => {
                    tracing::debug!("choice prompt interrupted");
                    session.leave()?;
                    tty.interrupt()?;
                    return Err(PromptError::Interrupted);
                }
                None => {
                    tracing::debug!(default = ?self.default, "input ended during choice prompt");
                    session.leave()?;
                    return self.default.ok_or(PromptError::EndOfInput);
                }
            }
        }
    }

    /// Draw the label and the visible rows, then return the cursor to the
    /// start of the label line.
    fn draw<T: Tty>(&self, session: &mut RawSession<'_, T>, state: &ChoiceState, cols: u16) -> io::Result<()> {
        let cols = usize::from(cols);
        let mut frame = String::new();
        frame.push_str(&self.renderer.apply(&self.theme.label, &self.label));
        frame.push(':');

        for row in state.rows() {
            match row {
                Row::MoreAbove => frame.push_str("\r\n   ↑"),
                Row::MoreBelow => frame.push_str("\r\n   ↓"),
                Row::Choice { index, highlighted } => {
                    let label = truncate_label(&self.choices[index], cols);
                    if highlighted {
                        frame.push_str("\r\n > ");
                        frame.push_str(&self.renderer.apply(&self.theme.highlight, &label));
                    } else {
                        frame.push_str("\r\n   ");
                        frame.push_str(&label);
                    }
                }
            }
        }

        ansi::clear_from_cursor(&mut **session)?;
        session.write_all(frame.as_bytes())?;
        ansi::cursor_up(&mut **session, to_u16(state.drawn_rows()))?;
        ansi::cursor_column(&mut **session, 0)?;
        session.flush()?;
        session.drawn = state.drawn_rows();
        Ok(())
    }
}

/// Wait, one key at a time, until the terminal is big enough. Ctrl-C
/// comes back as [`PromptError::Interrupted`] without raising the signal.
fn wait_for_room<T: Tty>(session: &mut RawSession<'_, T>) -> Result<Size, PromptError> {
    let mut size = session.size().unwrap_or(FALLBACK_SIZE);
    while !size.fits(MIN_COLS, MIN_ROWS) {
        tracing::warn!(cols = size.cols, rows = size.rows, "terminal too small for choice prompt");
        session.write_all(TOO_SMALL_MESSAGE.as_bytes())?;
        session.flush()?;

        match session.read_key()? {
            None => {
                return Err(PromptError::TerminalTooSmall {
                    cols: size.cols,
                    rows: size.rows,
                });
            }
            Some(key) if key.is_interrupt() => return Err(PromptError::Interrupted),
            Some(_) => size = session.size().unwrap_or(FALLBACK_SIZE),
        }
    }
    Ok(size)
}

// ─── Tests ──────────────────────────────────────────────────────────────────
