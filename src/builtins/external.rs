//! Built-ins that reach outside the evaluator. Only `println` for now.

use crate::ast::atom::Atom;
use crate::builtins::helpers::BuiltinResult;
use crate::builtins::ExecutionContext;
use crate::runtime::callable::{Arity, NativeFunction, NativeKind};
use crate::runtime::registry::Runtime;

/// Emits the concatenated renderings of its arguments as one line.
///
/// Usage: (println <value> ...)
///
///   Returns: Text (the line, without the newline)
///
/// Example:
///   (println "a" "b") ; prints ab
pub fn builtin_println(args: &[Atom], context: &mut dyn ExecutionContext) -> BuiltinResult {
    let line: String = args.iter().map(Atom::render_text).collect();
    context.emit_line(&line);
    Ok(Atom::Text(line))
}

pub fn register_external_builtins(runtime: &mut Runtime) {
    runtime.register_native(NativeFunction::new(
        "println",
        Arity::AtLeast(0),
        NativeKind::Stateful(builtin_println),
        "(println <value> ...) print the arguments, unseparated, as one line",
    ));
}
