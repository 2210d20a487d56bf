//! List operations: `list`, `first`, `rest`.
//!
//! `first` and `rest` pass anything that is not a List through unchanged.

use crate::ast::atom::Atom;
use crate::builtins::helpers::BuiltinResult;
use crate::errors::{ErrorKind, SexprError};
use crate::runtime::callable::{Arity, NativeFunction, NativeKind};
use crate::runtime::registry::Runtime;

/// Constructs a list from its arguments: (list <a> <b> ...)
pub fn builtin_list(args: &[Atom]) -> BuiltinResult {
    Ok(Atom::List(args.to_vec()))
}

/// First element of a list: (first <list>)
pub fn builtin_first(args: &[Atom]) -> BuiltinResult {
    match &args[0] {
        Atom::List(items) => items.first().cloned().ok_or_else(|| {
            SexprError::new(ErrorKind::EmptyList {
                function: "first".to_string(),
            })
        }),
        other => Ok(other.clone()),
    }
}

/// Everything after the first element: (rest <list>)
pub fn builtin_rest(args: &[Atom]) -> BuiltinResult {
    match &args[0] {
        Atom::List(items) => Ok(Atom::List(items.iter().skip(1).cloned().collect())),
        other => Ok(other.clone()),
    }
}

/// Registers `list`, `first` and `rest`.
pub fn register_collection_builtins(runtime: &mut Runtime) {
    runtime.register_native(NativeFunction::new(
        "list",
        Arity::AtLeast(0),
        NativeKind::Pure(builtin_list),
        "(list <value> ...) a list of the arguments",
    ));
    runtime.register_native(NativeFunction::new(
        "first",
        Arity::Exact(1),
        NativeKind::Pure(builtin_first),
        "(first <list>) first element; non-lists pass through",
    ));
    runtime.register_native(NativeFunction::new(
        "rest",
        Arity::Exact(1),
        NativeKind::Pure(builtin_rest),
        "(rest <list>) all elements after the first; non-lists pass through",
    ));
}
