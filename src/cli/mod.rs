//! The sexpr command-line interface.
//!
//! This module is the only place that ends the process. Library functions
//! return errors; the handlers here print them and pick the exit code.

use std::{fs, path::Path, process};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::args::{Command, SexprArgs};
use crate::cli::output::{print_builtins, print_summary, StdoutSink};
use crate::errors::print_error;
use crate::runtime::eval::{evaluate_each, evaluate_program, EvalOptions};
use crate::runtime::registry::build_default_runtime;
use crate::runtime::source::SourceContext;
use crate::syntax::parse;
use crate::ast::Program;

pub mod args;
pub mod output;

// ============================================================================
// MAIN ENTRY POINT
// ============================================================================

/// The main entry point for the CLI.
pub fn run() {
    let args = SexprArgs::parse();
    init_tracing(args.verbose);

    match args.command {
        Command::Run {
            file,
            max_depth,
            keep_going,
            dump,
        } => {
            let (source, program) = load_or_exit(&file);
            if dump {
                println!("{}", program.pretty());
            }
            let options = EvalOptions { max_depth };
            if keep_going {
                run_keep_going(&program, &source, options);
            } else {
                run_until_error(&program, &source, options);
            }
        }

        Command::Ast { file, json } => {
            let (_, program) = load_or_exit(&file);
            print_ast(&program, json);
        }

        Command::Builtins => {
            print_builtins(&build_default_runtime());
        }
    }
}

// ============================================================================
// HANDLERS
// ============================================================================

fn run_until_error(program: &Program, source: &SourceContext, options: EvalOptions) {
    let mut runtime = build_default_runtime();
    if let Err(e) = evaluate_program(program, &mut runtime, &mut StdoutSink, source, options) {
        print_error(e);
        process::exit(1);
    }
}

fn run_keep_going(program: &Program, source: &SourceContext, options: EvalOptions) {
    let mut runtime = build_default_runtime();
    let results = evaluate_each(program, &mut runtime, &mut StdoutSink, source, options);
    let total = results.len();
    let mut failed = 0;
    for error in results.into_iter().filter_map(Result::err) {
        failed += 1;
        print_error(error);
    }
    if failed > 0 {
        print_summary(failed, total);
        process::exit(1);
    }
}

fn print_ast(program: &Program, json: bool) {
    if !json {
        if program.is_empty() {
            println!("(empty)");
        } else {
            println!("{}", program.pretty());
        }
        return;
    }
    match serde_json::to_string_pretty(program) {
        Ok(text) => println!("{}", text),
        Err(e) => {
            eprintln!("Error: cannot serialize the tree: {}", e);
            process::exit(1);
        }
    }
}

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Reads and parses a script, or reports why not and exits.
fn load_or_exit(path: &Path) -> (SourceContext, Program) {
    let content = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error: cannot read {}: {}", path.display(), e);
        process::exit(1);
    });
    let source = SourceContext::from_file(path.display().to_string(), content);
    let program = parse(&source.content, &source).unwrap_or_else(|e| {
        print_error(e);
        process::exit(1);
    });
    (source, program)
}

/// `RUST_LOG` wins; otherwise `--verbose` selects debug and the default is warn.
fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .try_init();
}
