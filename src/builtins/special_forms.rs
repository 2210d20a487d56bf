//! Function-creating built-ins: `define` and `lambda`.
//!
//! `define` receives evaluated arguments like any other built-in; a bare
//! symbol operand evaluates to itself, so `(define x 5)` needs no quoting.
//! `lambda` is a special form: its body must reach the new function
//! unevaluated.

use std::rc::Rc;

use crate::ast::atom::Atom;
use crate::ast::{AstNode, Expr};
use crate::builtins::helpers::{extract_symbol, type_error, BuiltinResult};
use crate::builtins::ExecutionContext;
use crate::errors::{ErrorKind, ErrorReporting, SexprError};
use crate::runtime::callable::{symbol_leaf, Arity, Callable, NativeFunction, NativeKind, UserFunction};
use crate::runtime::eval::EvaluationContext;
use crate::runtime::registry::Runtime;

const PARAMS_EXPECTED: &str = "a list of Symbols as parameter list";

/// Binds a name to a value.
///
/// Usage: (define <name> <value>)
///
///   Registers a zero-argument function `name` that returns `value`, and
///   returns that function. Redefining a name replaces the binding; functions
///   returned by earlier definitions keep their own value.
///
/// Example:
///   (define x 5)
///   (x) ; => 5
pub fn builtin_define(args: &[Atom], context: &mut dyn ExecutionContext) -> BuiltinResult {
    let name = extract_symbol(&args[0], "define")?;
    let callable = Rc::new(Callable::User(UserFunction::constant(name, args[1].clone())));
    context.register_function(name, Rc::clone(&callable));
    Ok(Atom::Function(callable))
}

/// Creates an anonymous function.
///
/// Usage: (lambda (<param> ...) <body>)
///
///   The body is kept unevaluated and evaluated on each call with the
///   parameters bound to the arguments. Only the parameters and the global
///   registry are visible inside it.
///
/// Example:
///   ((lambda (a b) (- a b)) 5 3) ; => 2
pub fn builtin_lambda(operands: &[AstNode], context: &mut EvaluationContext<'_>) -> BuiltinResult {
    let params = parameter_names(&operands[0])
        .map_err(|e| e.located(context.source(), operands[0].span))?;
    let body = operands[1].clone();
    Ok(Atom::Function(Rc::new(Callable::User(UserFunction::lambda(
        params, body,
    )))))
}

/// Reads a parameter list: a form of symbols as written in source, or a list
/// atom of symbols when `lambda` is applied to evaluated values.
fn parameter_names(node: &AstNode) -> Result<Vec<String>, SexprError> {
    match &node.value {
        Expr::Form(children) => children
            .iter()
            .map(|child| {
                symbol_leaf(child).map(str::to_string).ok_or_else(|| {
                    SexprError::new(ErrorKind::TypeMismatch {
                        function: "lambda".to_string(),
                        expected: PARAMS_EXPECTED.to_string(),
                        found: child.value.pretty(),
                    })
                })
            })
            .collect(),
        Expr::Leaf(Atom::List(items)) => items
            .iter()
            .map(|item| match item {
                Atom::Symbol(name) => Ok(name.clone()),
                other => Err(type_error("lambda", PARAMS_EXPECTED, other)),
            })
            .collect(),
        Expr::Leaf(other) => Err(type_error("lambda", PARAMS_EXPECTED, other)),
    }
}

pub fn register_special_forms(runtime: &mut Runtime) {
    runtime.register_native(NativeFunction::new(
        "define",
        Arity::Exact(2),
        NativeKind::Stateful(builtin_define),
        "(define <symbol> <value>) bind a name to a value",
    ));
    runtime.register_native(NativeFunction::new(
        "lambda",
        Arity::Exact(2),
        NativeKind::SpecialForm(builtin_lambda),
        "(lambda (<symbol> ...) <body>) an anonymous function",
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builder::{form, number, symbol};

    #[test]
    fn parameters_from_a_form_of_symbols() {
        let node = form(vec![symbol("a"), symbol("b")]).unwrap();
        assert_eq!(parameter_names(&node).unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn parameters_from_a_list_atom() {
        let node = crate::ast::builder::leaf(Atom::List(vec![Atom::Symbol("x".into())]));
        assert_eq!(parameter_names(&node).unwrap(), vec!["x"]);
        let empty = crate::ast::builder::leaf(Atom::List(vec![]));
        assert!(parameter_names(&empty).unwrap().is_empty());
    }

    #[test]
    fn non_symbol_parameters_are_rejected() {
        let node = form(vec![symbol("a"), number(1.0)]).unwrap();
        let err = parameter_names(&node).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::TypeMismatch { function, .. } if function == "lambda"));
        assert!(parameter_names(&symbol("a")).is_err());
    }
}
