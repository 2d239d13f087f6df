// SPDX-License-Identifier: MIT
//
// sc-term — Terminal plumbing for styledconsole.
//
// The thin layer between styled output and the terminal device: the byte
// encoding of every escape sequence styledconsole emits, terminal size and
// TTY queries, scoped raw mode with a panic-safe restore, and a key parser
// that turns raw stdin bytes into key events.
//
// Nothing here knows about markup or prompts. Higher crates decide what
// to draw; this crate only knows how to talk to the terminal.

pub mod ansi;
pub mod input;
pub mod terminal;
