// SPDX-License-Identifier: MIT
//
// sc-style — Inline markup to styled, wrapped terminal lines.
//
// Pipeline for one piece of markup:
//
//   text ──► markup::tokenize ──► tokens
//                                   │
//            ┌──────────────────────┴───────────────────────┐
//            ▼                                              ▼
//   stack::StyleStack (open / close)          wrap::WrapState (text)
//            │                                              ▲
//            └──── current style ─► render::Renderer ───────┘
//
// `markup::format_text` runs the whole pass and returns the finished
// lines. `printer::Printer` sends them to a writer.

pub mod markup;
pub mod printer;
pub mod render;
pub mod stack;
pub mod style;
pub mod wrap;

pub use markup::{Formatter, escape, format_text, unescape};
pub use printer::Printer;
pub use render::Renderer;
pub use style::{Color, Options, Style, StyleError};
