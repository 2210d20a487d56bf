//! This module provides the evaluation engine: the tree walk that turns an
//! [`AstNode`] into an [`Atom`].
//!
//! ## Evaluation rules
//!
//! - A leaf evaluates to its atom. Symbols are names, not variables: they
//!   evaluate to themselves unless a user function's parameter scope binds
//!   them.
//! - A form resolves its head to a [`Callable`], evaluates its operands left
//!   to right, depth first, and applies the callable. Special forms receive
//!   their operands unevaluated.
//!
//! ## Errors
//!
//! Nothing here recovers from an error. Failures propagate out of
//! [`evaluate`] with the span of the innermost form that raised them; the
//! embedding program decides whether to stop or continue.

use std::rc::Rc;

use tracing::{debug, trace};

use crate::ast::atom::Atom;
use crate::ast::{AstNode, Expr, Program, Span};
use crate::builtins::{ExecutionContext, OutputSink};
use crate::errors::{ErrorKind, ErrorReporting, SexprError};
use crate::runtime::callable::Callable;
use crate::runtime::registry::Runtime;
use crate::runtime::source::SourceContext;

// ============================================================================
// CONFIGURATION AND SCOPES
// ============================================================================

/// Evaluation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalOptions {
    /// Maximum nesting of forms and user-function calls.
    pub max_depth: usize,
}

impl Default for EvalOptions {
    fn default() -> Self {
        Self { max_depth: 256 }
    }
}

/// Parameter bindings of one user-function call.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    bindings: im::HashMap<String, Atom>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bindings(bindings: impl IntoIterator<Item = (String, Atom)>) -> Self {
        Self {
            bindings: bindings.into_iter().collect(),
        }
    }

    pub fn bind(&mut self, name: impl Into<String>, value: Atom) {
        self.bindings.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Atom> {
        self.bindings.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

// ============================================================================
// EVALUATION CONTEXT
// ============================================================================

/// Everything an evaluation needs, passed explicitly to every step.
pub struct EvaluationContext<'a> {
    pub runtime: &'a mut Runtime,
    pub output: &'a mut dyn OutputSink,
    pub source: &'a SourceContext,
    pub scope: Scope,
    pub depth: usize,
    pub max_depth: usize,
}

impl<'a> EvaluationContext<'a> {
    pub fn new(
        runtime: &'a mut Runtime,
        output: &'a mut dyn OutputSink,
        source: &'a SourceContext,
        options: EvalOptions,
    ) -> Self {
        Self {
            runtime,
            output,
            source,
            scope: Scope::new(),
            depth: 0,
            max_depth: options.max_depth,
        }
    }

    /// A context for the body of a user-function call: same runtime and
    /// output, a fresh scope, one level deeper.
    pub fn enter_call(&mut self, scope: Scope) -> EvaluationContext<'_> {
        EvaluationContext {
            runtime: &mut *self.runtime,
            output: &mut *self.output,
            source: self.source,
            scope,
            depth: self.depth + 1,
            max_depth: self.max_depth,
        }
    }
}

impl ErrorReporting for EvaluationContext<'_> {
    fn source(&self) -> &SourceContext {
        self.source
    }
}

impl ExecutionContext for EvaluationContext<'_> {
    fn emit_line(&mut self, line: &str) {
        self.output.emit(line);
    }

    fn register_function(&mut self, name: &str, callable: Rc<Callable>) {
        self.runtime.register(name, callable);
    }
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Evaluates one expression against `runtime`, writing `println` output to `output`.
///
/// # Examples
///
/// ```rust
/// use sexpr::ast::atom::Atom;
/// use sexpr::ast::builder::{call, number};
/// use sexpr::builtins::NullSink;
/// use sexpr::runtime::eval::{evaluate, EvalOptions};
/// use sexpr::runtime::registry::build_default_runtime;
/// use sexpr::runtime::source::SourceContext;
///
/// let mut runtime = build_default_runtime();
/// let expr = call("+", vec![number(1.0), number(2.0)]);
/// let result = evaluate(
///     &expr,
///     &mut runtime,
///     &mut NullSink,
///     &SourceContext::default(),
///     EvalOptions::default(),
/// )
/// .unwrap();
/// assert_eq!(result, Atom::Number(3.0));
/// ```
pub fn evaluate(
    expr: &AstNode,
    runtime: &mut Runtime,
    output: &mut dyn OutputSink,
    source: &SourceContext,
    options: EvalOptions,
) -> Result<Atom, SexprError> {
    let mut context = EvaluationContext::new(runtime, output, source, options);
    evaluate_ast_node(expr, &mut context)
}

/// Evaluates every top-level expression in order for its effects, stopping
/// at the first error.
pub fn evaluate_program(
    program: &Program,
    runtime: &mut Runtime,
    output: &mut dyn OutputSink,
    source: &SourceContext,
    options: EvalOptions,
) -> Result<(), SexprError> {
    let mut context = EvaluationContext::new(runtime, output, source, options);
    for (index, node) in program.forms.iter().enumerate() {
        debug!(index, "evaluating top-level expression");
        evaluate_ast_node(node, &mut context)?;
    }
    Ok(())
}

/// Evaluates every top-level expression in order and returns each outcome.
///
/// An error in one expression does not stop the next one; effects of the
/// expressions that succeeded (output, definitions) stay in place.
pub fn evaluate_each(
    program: &Program,
    runtime: &mut Runtime,
    output: &mut dyn OutputSink,
    source: &SourceContext,
    options: EvalOptions,
) -> Vec<Result<Atom, SexprError>> {
    let mut context = EvaluationContext::new(runtime, output, source, options);
    program
        .forms
        .iter()
        .enumerate()
        .map(|(index, node)| {
            debug!(index, "evaluating top-level expression");
            context.depth = 0;
            evaluate_ast_node(node, &mut context)
        })
        .collect()
}

/// The recursive evaluator.
pub fn evaluate_ast_node(expr: &AstNode, context: &mut EvaluationContext<'_>) -> Result<Atom, SexprError> {
    if context.depth > context.max_depth {
        return Err(context.report(
            ErrorKind::RecursionLimit {
                limit: context.max_depth,
            },
            expr.span,
        ));
    }
    trace!(depth = context.depth, expr = %expr.value.pretty(), "eval");

    match &expr.value {
        Expr::Leaf(atom) => Ok(evaluate_leaf(atom, context)),
        Expr::Form(children) => {
            context.depth += 1;
            let result = evaluate_form(children, expr.span, context);
            context.depth -= 1;
            result
        }
    }
}

// ============================================================================
// INTERNAL HELPERS
// ============================================================================

/// Leaves are self-evaluating; only a parameter binding replaces a symbol.
fn evaluate_leaf(atom: &Atom, context: &EvaluationContext<'_>) -> Atom {
    if let Atom::Symbol(name) = atom {
        if let Some(bound) = context.scope.get(name) {
            return bound.clone();
        }
    }
    atom.clone()
}

fn evaluate_form(
    children: &[AstNode],
    span: Span,
    context: &mut EvaluationContext<'_>,
) -> Result<Atom, SexprError> {
    let Some((head, operands)) = children.split_first() else {
        return Err(context.report(
            ErrorKind::Syntax {
                message: "a form needs at least a head".to_string(),
            },
            span,
        ));
    };

    let callable = resolve_head(head, context)?;
    debug!(
        function = callable.display_name(),
        args = operands.len(),
        "applying"
    );

    // Special forms take their operands as written.
    if let Some(special_form) = callable.special_form() {
        callable
            .check_arity(operands.len())
            .map_err(|e| e.located(context.source, span))?;
        return special_form(operands, context).map_err(|e| e.located(context.source, span));
    }

    let args = operands
        .iter()
        .map(|operand| evaluate_ast_node(operand, context))
        .collect::<Result<Vec<_>, _>>()?;

    callable
        .apply(args, context)
        .map_err(|e| e.located(context.source, span))
}

/// Turns the head of a form into something callable.
///
/// - a function leaf is used as is;
/// - a symbol is looked up in the parameter scope, then in the registry;
/// - a nested form is evaluated and must produce a function;
/// - anything else is not callable.
fn resolve_head(head: &AstNode, context: &mut EvaluationContext<'_>) -> Result<Rc<Callable>, SexprError> {
    match &head.value {
        Expr::Leaf(Atom::Function(callable)) => Ok(Rc::clone(callable)),
        Expr::Leaf(Atom::Symbol(name)) => {
            if let Some(bound) = context.scope.get(name) {
                return match bound {
                    Atom::Function(callable) => Ok(Rc::clone(callable)),
                    other => Err(context.not_callable(&other.describe(), head.span)),
                };
            }
            context
                .runtime
                .lookup(name)
                .map_err(|e| e.located(context.source, head.span))
        }
        Expr::Leaf(other) => Err(context.not_callable(&other.describe(), head.span)),
        Expr::Form(_) => match evaluate_ast_node(head, context)? {
            Atom::Function(callable) => Ok(callable),
            other => Err(context.not_callable(&other.describe(), head.span)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builder::{call, number, symbol};
    use crate::builtins::NullSink;
    use crate::runtime::registry::build_default_runtime;

    #[test]
    fn parameter_scope_replaces_bound_symbols_only() {
        let mut runtime = build_default_runtime();
        let source = SourceContext::default();
        let mut sink = NullSink;
        let mut context = EvaluationContext::new(&mut runtime, &mut sink, &source, EvalOptions::default());
        context.scope.bind("x", Atom::Number(4.0));

        let expr = call("list", vec![symbol("x"), symbol("y")]);
        let result = evaluate_ast_node(&expr, &mut context).unwrap();
        assert_eq!(result.to_string(), "(4 y)");
    }

    #[test]
    fn depth_is_restored_after_each_form() {
        let mut runtime = build_default_runtime();
        let source = SourceContext::default();
        let mut sink = NullSink;
        let mut context = EvaluationContext::new(&mut runtime, &mut sink, &source, EvalOptions::default());
        let expr = call("+", vec![call("+", vec![number(1.0)]), number(2.0)]);
        evaluate_ast_node(&expr, &mut context).unwrap();
        assert_eq!(context.depth, 0);
    }

    #[test]
    fn nesting_beyond_the_limit_fails() {
        let mut runtime = build_default_runtime();
        let mut expr = number(1.0);
        for _ in 0..10 {
            expr = call("+", vec![expr]);
        }
        let err = evaluate(
            &expr,
            &mut runtime,
            &mut NullSink,
            &SourceContext::default(),
            EvalOptions { max_depth: 5 },
        )
        .unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::RecursionLimit { limit: 5 });
    }
}
