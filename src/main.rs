//! CLI entry point for the `game-rules` tool.
//!
//! Reads a rules file, optionally dumps its tokens, parses it and prints the
//! resulting tree. Any failure is reported on stderr with a non-zero exit.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use game_rules::{ParseError, lex, parse};

/// How the parsed rules are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Indented outline of the parse tree
    Tree,
    /// One S-expression per rule
    Sexpr,
    /// The lossless syntax tree, trivia included
    Cst,
}

/// Parse a game-rules file and print its tree.
#[derive(Parser)]
#[command(name = "game-rules", version, about = "Game-rules condition language parser")]
struct Cli {
    /// Path to the rules file
    path: PathBuf,

    /// Print every token before parsing
    #[arg(long)]
    tokens: bool,

    /// Output format
    #[arg(long, default_value = "tree", value_enum)]
    format: Format,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("cannot write output: {0}")]
    Write(#[from] io::Error),
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let src = fs::read_to_string(&cli.path).map_err(|source| CliError::Read {
        path: cli.path.clone(),
        source,
    })?;
    let mut out = io::stdout().lock();

    if cli.tokens {
        for token in lex(&src) {
            writeln!(out, "{token}")?;
        }
    }

    let parsed = parse(&src);
    if let Some(err) = parsed.error() {
        return Err(err.clone().into());
    }
    match cli.format {
        Format::Tree => write!(out, "{}", parsed.tree())?,
        Format::Sexpr => {
            let tree = parsed.tree();
            for list in tree.condition_lists() {
                writeln!(out, "{}", tree.sexpr_of(list))?;
            }
        }
        Format::Cst => {
            if let Some(syntax) = parsed.syntax() {
                writeln!(out, "{syntax:#?}")?;
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let _ = writeln!(io::stderr(), "error: {err}");
            ExitCode::FAILURE
        }
    }
}
