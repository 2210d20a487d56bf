//! Shared helpers for the integration tests: parse a snippet, evaluate every
//! top-level expression against a fresh runtime, capture `println` output.

#![allow(dead_code)]

use sexpr::ast::atom::Atom;
use sexpr::cli::output::OutputBuffer;
use sexpr::runtime::eval::{evaluate_each, EvalOptions};
use sexpr::runtime::registry::{build_default_runtime, Runtime};
use sexpr::runtime::source::SourceContext;
use sexpr::syntax::parse;
use sexpr::SexprError;

/// Outcome of running a snippet.
pub struct Run {
    pub results: Vec<Result<Atom, SexprError>>,
    pub output: OutputBuffer,
    pub runtime: Runtime,
}

impl Run {
    /// The value of the last top-level expression; panics on error.
    pub fn last(&self) -> Atom {
        match self.results.last() {
            Some(Ok(value)) => value.clone(),
            Some(Err(e)) => panic!("last expression failed: {e}"),
            None => panic!("no expressions"),
        }
    }

    /// The error of the last top-level expression; panics on success.
    pub fn last_error(&self) -> &SexprError {
        match self.results.last() {
            Some(Err(e)) => e,
            Some(Ok(value)) => panic!("expected an error, got {value}"),
            None => panic!("no expressions"),
        }
    }
}

pub fn run_with(source_text: &str, options: EvalOptions) -> Run {
    let source = SourceContext::from_file("test.sx", source_text);
    let program = parse(source_text, &source).expect("snippet should parse");
    let mut runtime = build_default_runtime();
    let mut output = OutputBuffer::new();
    let results = evaluate_each(&program, &mut runtime, &mut output, &source, options);
    Run {
        results,
        output,
        runtime,
    }
}

pub fn run(source_text: &str) -> Run {
    run_with(source_text, EvalOptions::default())
}

/// Evaluates a snippet and returns the value of its last expression.
pub fn eval(source_text: &str) -> Atom {
    run(source_text).last()
}
