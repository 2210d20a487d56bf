//! Command-line arguments and subcommands, declared with `clap`'s derive API.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "sexpr",
    version,
    about = "A minimal s-expression runtime."
)]
pub struct SexprArgs {
    /// Log registry and evaluation events to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Parse and evaluate a script.
    Run {
        /// The script to run.
        #[arg(required = true)]
        file: PathBuf,
        /// Maximum nesting of forms and function calls.
        #[arg(long, default_value_t = 256)]
        max_depth: usize,
        /// Report a failing top-level expression and continue with the next.
        #[arg(long)]
        keep_going: bool,
        /// Print the parsed tree before evaluating it.
        #[arg(long)]
        dump: bool,
    },
    /// Print the parsed expression tree of a script.
    Ast {
        /// The script to parse.
        #[arg(required = true)]
        file: PathBuf,
        /// Emit JSON instead of s-expressions.
        #[arg(long)]
        json: bool,
    },
    /// List the native built-in functions.
    Builtins,
}
