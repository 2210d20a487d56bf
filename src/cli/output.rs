//! User-facing output for the CLI: output sinks, colored listings, error
//! summaries.

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use std::io::Write;

use crate::builtins::OutputSink;
use crate::runtime::callable::Callable;
use crate::runtime::registry::Runtime;

// ============================================================================
// OUTPUT SINKS
// ============================================================================

/// Collects emitted lines, for tests and programmatic capture.
#[derive(Debug, Default)]
pub struct OutputBuffer {
    pub lines: Vec<String>,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything emitted so far, one line each, newline-terminated.
    pub fn contents(&self) -> String {
        self.lines.iter().map(|line| format!("{line}\n")).collect()
    }
}

impl OutputSink for OutputBuffer {
    fn emit(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }
}

/// Writes to stdout.
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn emit(&mut self, line: &str) {
        println!("{}", line);
    }
}

// ============================================================================
// CONSOLE OUTPUT
// ============================================================================

/// Prints every native function with its usage line.
pub fn print_builtins(runtime: &Runtime) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    for name in runtime.names() {
        let Some(callable) = runtime.get(&name) else {
            continue;
        };
        let Callable::Native(native) = callable.as_ref() else {
            continue;
        };
        let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true));
        let _ = write!(stdout, "{:<8}", native.name);
        let _ = stdout.reset();
        let _ = write!(stdout, " {}", native.usage);
        if native.is_special_form() {
            let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)));
            let _ = write!(stdout, " [special form]");
            let _ = stdout.reset();
        }
        let _ = writeln!(stdout);
    }
}

/// Prints the outcome line after a `--keep-going` run.
pub fn print_summary(failed: usize, total: usize) {
    let mut stderr = StandardStream::stderr(ColorChoice::Auto);
    let color = if failed == 0 { Color::Green } else { Color::Red };
    let _ = stderr.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true));
    let _ = writeln!(
        stderr,
        "{} of {} top-level expression(s) failed",
        failed, total
    );
    let _ = stderr.reset();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_keeps_lines_in_order() {
        let mut buffer = OutputBuffer::new();
        buffer.emit("ab");
        buffer.emit("");
        buffer.emit("c");
        assert_eq!(buffer.contents(), "ab\n\nc\n");
    }
}
