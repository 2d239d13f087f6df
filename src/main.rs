// SPDX-License-Identifier: MIT
//
// styledconsole — command-line front-end for the styledconsole crates.
//
// Wires the library crates to a handful of subcommands:
//
//   sc-style  → render markup, print blocks, the demo page
//   sc-prompt → choose one of several values with the arrow keys
//
// Formatted output goes to stdout. Logs go to stderr, filtered by
// `STYLEDCONSOLE_LOG` (default `warn`), so they never interleave with a
// prompt being drawn.

use std::io::{self, Write};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use sc_prompt::{ChoicePrompt, PromptError};
use sc_style::printer::FALLBACK_WIDTH;
use sc_style::{Formatter, Printer, Renderer, Style};
use sc_term::terminal;

/// Environment variable holding the log filter.
const LOG_ENV: &str = "STYLEDCONSOLE_LOG";

/// Exit status after Ctrl-C, as a shell reports SIGINT.
const EXIT_INTERRUPTED: i32 = 130;

// ─── Command line ───────────────────────────────────────────────────────────

#[derive(Debug, Parser)]
#[command(name = "styledconsole", version)]
#[command(about = "Styled terminal output from inline markup, plus an arrow-key choice prompt")]
struct Cli {
    /// Never emit hyperlink escapes, even where the terminal supports them
    #[arg(long, global = true)]
    no_links: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Format markup such as `<fg=red>text</>` and print the lines
    Render {
        /// The markup to format
        text: String,
        /// Wrap width (defaults to the terminal width)
        #[arg(long)]
        width: Option<usize>,
        /// Style drawn under every line, e.g. `bg=blue;fg=white`
        #[arg(long, value_name = "STYLE")]
        base: Option<Style>,
    },
    /// Print markup as a padded block
    Block {
        /// The markup to print
        text: String,
        /// Use one of the predefined blocks instead of `--base`/`--padding`
        #[arg(long, value_enum)]
        kind: Option<BlockKind>,
        /// Prefix for every line of the block
        #[arg(long, default_value = "  ")]
        padding: String,
        /// Style of the whole block
        #[arg(long, value_name = "STYLE")]
        base: Option<Style>,
    },
    /// Ask for one of several choices and print the one picked
    Choose {
        /// The question shown above the choices
        label: String,
        /// The choices, at least two
        #[arg(required = true, num_args = 2..)]
        choices: Vec<String>,
        /// Index of the choice highlighted first, and picked if input ends
        #[arg(long)]
        default: Option<usize>,
    },
    /// Print a sample of every kind of output
    Demo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum BlockKind {
    Success,
    Warning,
    Error,
}

// ─── Entry point ────────────────────────────────────────────────────────────

fn main() {
    init_logging();

    if let Err(e) = run(Cli::parse()) {
        if matches!(e.downcast_ref::<PromptError>(), Some(PromptError::Interrupted)) {
            process::exit(EXIT_INTERRUPTED);
        }
        eprintln!("styledconsole: {e:#}");
        process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let renderer = if cli.no_links {
        Renderer::new(false)
    } else {
        Renderer::detect()
    };
    tracing::debug!(command = ?cli.command, hyperlinks = renderer.hyperlinks(), "starting");

    match cli.command {
        Command::Render { text, width, base } => {
            let mut formatter = Formatter::new(width.unwrap_or_else(terminal_width), renderer);
            if let Some(base) = base {
                formatter = formatter.with_base(base);
            }
            let mut out = io::stdout().lock();
            for line in formatter.format(&text) {
                writeln!(out, "{line}").context("writing formatted text")?;
            }
        }
        Command::Block {
            text,
            kind,
            padding,
            base,
        } => {
            let mut printer = printer(renderer);
            let written = match kind {
                Some(BlockKind::Success) => printer.success(&text),
                Some(BlockKind::Warning) => printer.warning(&text),
                Some(BlockKind::Error) => printer.error(&text),
                None => printer.write_block(&text, &padding, &base.unwrap_or_default(), true),
            };
            written.context("writing block")?;
        }
        Command::Choose {
            label,
            choices,
            default,
        } => {
            let mut prompt = ChoicePrompt::new(label, choices).renderer(renderer);
            if let Some(index) = default {
                prompt = prompt.default(index);
            }
            let choice = prompt.run().context("choice prompt failed")?;
            println!("{choice}");
        }
        Command::Demo => demo(&mut printer(renderer)).context("writing demo")?,
    }
    Ok(())
}

fn terminal_width() -> usize {
    terminal::get_size().map_or(FALLBACK_WIDTH, |size| usize::from(size.cols))
}

fn printer(renderer: Renderer) -> Printer<io::Stdout> {
    Printer::new(io::stdout(), terminal_width(), renderer)
}

fn demo<W: Write>(printer: &mut Printer<W>) -> io::Result<()> {
    printer.section("styledconsole")?;
    printer.text("Markup such as <fg=green>green</>, <bg=blue;fg=white>white on blue</> and <options=bold,underscore>bold underlined</> text.")?;
    printer.text("Tags nest: <fg=red>red <options=bold>bold red</> red again</> plain.")?;
    printer.text("Links: <href=https://github.com>github.com</>")?;
    printer.text("A literal \\<fg=red> stays as typed.")?;
    printer.new_line()?;
    printer.listing(["first item", "second item", "<fg=cyan>styled</> item"])?;
    printer.new_line()?;
    printer.success("Everything went fine.")?;
    printer.warning("Something looks odd.")?;
    printer.error("Something broke.")
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sc_style::Color;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("styledconsole").chain(args.iter().copied()))
    }

    #[test]
    fn render_with_width_and_base() {
        let cli = parse(&["render", "<fg=red>hi</>", "--width", "40", "--base", "bg=blue"]).unwrap();
        let Command::Render { text, width, base } = cli.command else {
            panic!("expected render");
        };
        assert_eq!(text, "<fg=red>hi</>");
        assert_eq!(width, Some(40));
        assert_eq!(base, Some(Style::new().bg(Color::Blue)));
    }

    #[test]
    fn bad_base_style_is_rejected() {
        assert!(parse(&["render", "hi", "--base", "size=12"]).is_err());
    }

    #[test]
    fn block_kind() {
        let cli = parse(&["block", "done", "--kind", "success"]).unwrap();
        let Command::Block { kind, padding, .. } = cli.command else {
            panic!("expected block");
        };
        assert_eq!(kind, Some(BlockKind::Success));
        assert_eq!(padding, "  ");
    }

    #[test]
    fn choose_needs_two_choices() {
        assert!(parse(&["choose", "Pick", "only"]).is_err());

        let cli = parse(&["choose", "Pick", "a", "b", "c", "--default", "2"]).unwrap();
        let Command::Choose {
            label,
            choices,
            default,
        } = cli.command
        else {
            panic!("expected choose");
        };
        assert_eq!(label, "Pick");
        assert_eq!(choices, vec!["a", "b", "c"]);
        assert_eq!(default, Some(2));
    }

    #[test]
    fn no_links_is_global() {
        let cli = parse(&["demo", "--no-links"]).unwrap();
        assert!(cli.no_links);
        assert!(matches!(cli.command, Command::Demo));
    }

    #[test]
    fn demo_writes_every_kind() {
        let mut printer = Printer::new(Vec::new(), 60, Renderer::new(true));
        demo(&mut printer).unwrap();
        let out = String::from_utf8(printer.into_inner()).unwrap();
        assert!(out.contains("\x1b[32mgreen\x1b[39m"));
        assert!(out.contains("\x1b]8;;https://github.com\x1b\\github.com\x1b]8;;\x1b\\"));
        assert!(out.contains("<fg=red> stays as typed."));
        assert!(out.contains("Success:"));
        assert!(out.contains("Warning:"));
        assert!(out.contains("Error:"));
    }
}
