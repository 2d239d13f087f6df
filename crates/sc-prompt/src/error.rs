// SPDX-License-Identifier: MIT

use std::io;

use thiserror::Error;

/// Why a prompt returned without a selection.
#[derive(Debug, Error)]
pub enum PromptError {
    /// Stdout is not a terminal, so nobody can see or answer the prompt.
    #[error("cannot open an interactive prompt outside of a terminal")]
    NotATerminal,

    /// A choice prompt needs at least two choices.
    #[error("a choice prompt needs at least 2 choices, got {0}")]
    TooFewChoices(usize),

    /// The default index points past the end of the choice list.
    #[error("default choice {index} is out of range for {count} choices")]
    InvalidDefault { index: usize, count: usize },

    /// The terminal stayed too small and input ended before a resize.
    #[error("terminal is too small ({cols}x{rows})")]
    TerminalTooSmall { cols: u16, rows: u16 },

    /// Input ended before a choice was confirmed and there is no default.
    #[error("input ended before a choice was made")]
    EndOfInput,

    /// The user pressed Ctrl-C and the interrupt did not end the process.
    #[error("prompt interrupted")]
    Interrupted,

    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}
