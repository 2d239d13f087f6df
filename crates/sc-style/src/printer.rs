// SPDX-License-Identifier: MIT
//
// Printer — formatted output to a writer.
//
// Owns the three things every print needs: where the bytes go, how wide
// the lines are, and how styles render. `Printer::stdout()` fills them in
// for the current terminal; tests build one over a `Vec<u8>`.
//
// On top of `write` and `write_block` sit the convenience printers used by
// command-line tools: section titles, listings, and the success / warning
// / error blocks.

use std::io::{self, Write};

use sc_term::terminal;

use crate::markup::format_text;
use crate::render::Renderer;
use crate::style::{Color, Style};
use crate::wrap::visible_len;

/// Width used when stdout is not a terminal.
pub const FALLBACK_WIDTH: usize = 120;

/// Writes markup, formatted at a fixed width, to `W`.
#[derive(Debug)]
pub struct Printer<W> {
    out: W,
    width: usize,
    renderer: Renderer,
}

impl Printer<io::Stdout> {
    /// A printer for this process's stdout, as wide as the terminal.
    #[must_use]
    pub fn stdout() -> Self {
        let width = terminal::get_size().map_or(FALLBACK_WIDTH, |s| usize::from(s.cols));
        Self::new(io::stdout(), width, Renderer::detect())
    }
}

impl<W: Write> Printer<W> {
    pub const fn new(out: W, width: usize, renderer: Renderer) -> Self {
        Self {
            out,
            width,
            renderer,
        }
    }

    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub const fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Give back the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Format `message` and print its lines joined by `\n`, plus a final
    /// `\n` when `newline` is set.
    ///
    /// # Errors
    ///
    /// Any error from the underlying writer.
    pub fn write(&mut self, message: &str, newline: bool) -> io::Result<()> {
        let lines = format_text(message, self.width, None, &self.renderer);
        self.out.write_all(lines.join("\n").as_bytes())?;
        if newline {
            self.out.write_all(b"\n")?;
        }
        self.out.flush()
    }

    /// Print `message` as a block: every line starts with `padding`, and
    /// the whole block (padding, text and the blank lines framing it) is
    /// drawn over `base` out to the full width.
    ///
    /// # Errors
    ///
    /// Any error from the underlying writer.
    pub fn write_block(&mut self, message: &str, padding: &str, base: &Style, newline: bool) -> io::Result<()> {
        let inner_width = self.width.saturating_sub(visible_len(padding));

        // A trailing break makes every content line padded out to the edge.
        let mut message = message.to_owned();
        if !message.ends_with('\n') {
            message.push('\n');
        }

        let mut lines = format_text(&message, inner_width, Some(base), &self.renderer);
        // The final line is the empty one after the forced break.
        lines.pop();

        let blank = format!("{padding}{}", " ".repeat(inner_width));
        let blank = self.renderer.apply(base, &blank);
        let prefix = self.renderer.apply(base, padding);

        writeln!(self.out, "{blank}")?;
        for line in &lines {
            writeln!(self.out, "{prefix}{line}")?;
        }
        writeln!(self.out, "{blank}")?;
        if newline {
            writeln!(self.out)?;
        }
        self.out.flush()
    }

    // ─── Convenience printers ───────────────────────────────────────────

    /// A yellow, bold title underlined with `=`.
    ///
    /// # Errors
    ///
    /// Any error from the underlying writer.
    pub fn section(&mut self, title: &str) -> io::Result<()> {
        let underline = "=".repeat(title.chars().count());
        self.write(&format!("<fg=yellow;options=bold>{title}\n{underline}\n</>"), true)
    }

    /// Markup text followed by a line break.
    ///
    /// # Errors
    ///
    /// Any error from the underlying writer.
    pub fn text(&mut self, content: &str) -> io::Result<()> {
        self.write(content, true)
    }

    /// One ` * item` line per item, with a yellow bullet.
    ///
    /// # Errors
    ///
    /// Any error from the underlying writer.
    pub fn listing<I>(&mut self, items: I) -> io::Result<()>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        for item in items {
            self.write(&format!(" <fg=yellow>*</> {}", item.as_ref()), true)?;
        }
        Ok(())
    }

    /// A green block headed `Success:`.
    ///
    /// # Errors
    ///
    /// Any error from the underlying writer.
    pub fn success(&mut self, content: &str) -> io::Result<()> {
        let base = Style::new().bg(Color::Green).fg(Color::Black);
        self.write_block(&format!("Success:\n{content}"), "  ", &base, true)
    }

    /// A yellow block headed `Warning:`, each line prefixed with `# `.
    ///
    /// # Errors
    ///
    /// Any error from the underlying writer.
    pub fn warning(&mut self, content: &str) -> io::Result<()> {
        let base = Style::new().fg(Color::Yellow);
        self.write_block(&format!("Warning:\n{content}"), "# ", &base, true)
    }

    /// A red block headed `Error:`.
    ///
    /// # Errors
    ///
    /// Any error from the underlying writer.
    pub fn error(&mut self, content: &str) -> io::Result<()> {
        let base = Style::new().bg(Color::Red).fg(Color::Black);
        self.write_block(&format!("Error:\n{content}"), "  ", &base, true)
    }

    /// One empty line.
    ///
    /// # Errors
    ///
    /// Any error from the underlying writer.
    pub fn new_line(&mut self) -> io::Result<()> {
        self.write("", true)
    }

    /// `count` empty lines.
    ///
    /// # Errors
    ///
    /// Any error from the underlying writer.
    pub fn new_lines(&mut self, count: usize) -> io::Result<()> {
        if count == 0 {
            return Ok(());
        }
        self.write(&"\n".repeat(count - 1), true)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
