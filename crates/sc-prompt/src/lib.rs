// SPDX-License-Identifier: MIT
//
// sc-prompt — Arrow-key choice prompt for styledconsole.
//
// Split in two layers:
//
//   choice   ChoiceState: highlight, scroll window, key handling. Pure.
//   prompt   ChoicePrompt: raw mode, drawing, reading keys through `Tty`.
//
// Use `ChoicePrompt::run()` on the real terminal, or `run_on()` with any
// `Tty` implementation.

pub mod choice;
pub mod error;
pub mod prompt;

pub use choice::ChoiceState;
pub use error::PromptError;
pub use prompt::{ChoicePrompt, PromptTheme, StdTty, Tty};
