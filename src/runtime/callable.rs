//! # Function Protocol
//!
//! Every function value is a [`Callable`]: either a [`NativeFunction`]
//! implemented in Rust and registered at startup, or a [`UserFunction`] built
//! at run time by `define` or `lambda`.
//!
//! ## Native calling conventions
//!
//! - **`Pure`**: receives evaluated arguments, touches nothing else (`+`, `list`).
//! - **`Stateful`**: receives evaluated arguments plus an [`ExecutionContext`]
//!   for the output sink and the registry (`println`, `define`).
//! - **`SpecialForm`**: receives the *unevaluated* operand nodes and decides
//!   itself what to evaluate (`lambda`, whose body must stay unevaluated).
//!
//! Arity is declared once per callable and checked before any body runs.

use std::fmt;
use std::rc::Rc;

use crate::ast::atom::Atom;
use crate::ast::builder::leaf;
use crate::ast::{AstNode, Expr};
use crate::builtins::ExecutionContext;
use crate::errors::{ErrorKind, SexprError};
use crate::runtime::eval::{evaluate_ast_node, EvaluationContext, Scope};

// ============================================================================
// CALLING CONVENTIONS
// ============================================================================

/// Pure natives: operate only on evaluated arguments.
pub type PureFn = fn(args: &[Atom]) -> Result<Atom, SexprError>;

/// Stateful natives: evaluated arguments plus limited access to the runtime.
pub type StatefulFn =
    fn(args: &[Atom], context: &mut dyn ExecutionContext) -> Result<Atom, SexprError>;

/// Special forms: unevaluated operands and the full evaluation context.
pub type SpecialFormFn =
    fn(operands: &[AstNode], context: &mut EvaluationContext<'_>) -> Result<Atom, SexprError>;

#[derive(Clone, Copy)]
pub enum NativeKind {
    Pure(PureFn),
    Stateful(StatefulFn),
    SpecialForm(SpecialFormFn),
}

/// How many arguments a callable accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(&self, count: usize) -> bool {
        match *self {
            Arity::Exact(n) => count == n,
            Arity::AtLeast(n) => count >= n,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Arity::Exact(n) => write!(f, "{}", n),
            Arity::AtLeast(0) => write!(f, "any number of"),
            Arity::AtLeast(n) => write!(f, "at least {}", n),
        }
    }
}

// ============================================================================
// CALLABLES
// ============================================================================

/// A function implemented by the host.
pub struct NativeFunction {
    pub name: String,
    pub arity: Arity,
    pub kind: NativeKind,
    /// One-line usage, shown by `sexpr builtins`.
    pub usage: &'static str,
}

impl NativeFunction {
    pub fn new(name: &str, arity: Arity, kind: NativeKind, usage: &'static str) -> Self {
        Self {
            name: name.to_string(),
            arity,
            kind,
            usage,
        }
    }

    pub fn is_special_form(&self) -> bool {
        matches!(self.kind, NativeKind::SpecialForm(_))
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            NativeKind::Pure(_) => "pure",
            NativeKind::Stateful(_) => "stateful",
            NativeKind::SpecialForm(_) => "special-form",
        };
        f.debug_struct("NativeFunction")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .field("kind", &kind)
            .finish()
    }
}

/// What a user function returns when applied.
#[derive(Debug, Clone)]
pub enum FunctionBody {
    /// An expression evaluated in the parameter scope on every call. Shared
    /// and read-only once the function exists.
    Expr(Rc<AstNode>),
    /// A value fixed at definition time (what `define` produces).
    Value(Atom),
}

/// A function created at run time.
#[derive(Debug, Clone)]
pub struct UserFunction {
    pub name: Option<String>,
    pub params: Vec<String>,
    pub body: FunctionBody,
}

impl UserFunction {
    /// A named zero-argument function returning `value` on every call.
    pub fn constant(name: &str, value: Atom) -> Self {
        Self {
            name: Some(name.to_string()),
            params: Vec::new(),
            body: FunctionBody::Value(value),
        }
    }

    /// An anonymous function over `params` evaluating `body`.
    pub fn lambda(params: Vec<String>, body: AstNode) -> Self {
        Self {
            name: None,
            params,
            body: FunctionBody::Expr(Rc::new(body)),
        }
    }

    /// Binds the actual arguments in a fresh scope and evaluates the body.
    ///
    /// The scope holds only the parameters: the caller's bindings are not
    /// visible, globals are reached through the registry.
    fn invoke(&self, args: Vec<Atom>, context: &mut EvaluationContext<'_>) -> Result<Atom, SexprError> {
        match &self.body {
            FunctionBody::Value(value) => Ok(value.clone()),
            FunctionBody::Expr(body) => {
                let scope = Scope::from_bindings(self.params.iter().cloned().zip(args));
                let mut frame = context.enter_call(scope);
                evaluate_ast_node(body, &mut frame)
            }
        }
    }
}

/// Anything that can be applied to arguments.
#[derive(Debug)]
pub enum Callable {
    Native(NativeFunction),
    User(UserFunction),
}

impl Callable {
    pub fn name(&self) -> Option<&str> {
        match self {
            Callable::Native(native) => Some(&native.name),
            Callable::User(user) => user.name.as_deref(),
        }
    }

    /// The name, or `lambda` for anonymous functions.
    pub fn display_name(&self) -> &str {
        self.name().unwrap_or("lambda")
    }

    pub fn arity(&self) -> Arity {
        match self {
            Callable::Native(native) => native.arity,
            Callable::User(user) => Arity::Exact(user.params.len()),
        }
    }

    pub fn check_arity(&self, actual: usize) -> Result<(), SexprError> {
        let arity = self.arity();
        if arity.accepts(actual) {
            return Ok(());
        }
        Err(SexprError::new(ErrorKind::ArityMismatch {
            function: self.display_name().to_string(),
            expected: arity.to_string(),
            actual,
        }))
    }

    /// Applies the callable to already-evaluated arguments.
    ///
    /// A special form reached this way (for instance through a function value
    /// bound to a parameter) sees its arguments as leaf nodes.
    pub fn apply(&self, args: Vec<Atom>, context: &mut EvaluationContext<'_>) -> Result<Atom, SexprError> {
        self.check_arity(args.len())?;
        match self {
            Callable::Native(native) => match native.kind {
                NativeKind::Pure(f) => f(&args),
                NativeKind::Stateful(f) => f(&args, context),
                NativeKind::SpecialForm(f) => {
                    let operands: Vec<AstNode> = args.into_iter().map(leaf).collect();
                    f(&operands, context)
                }
            },
            Callable::User(user) => user.invoke(args, context),
        }
    }

    /// The special-form entry point, if this callable is one.
    pub fn special_form(&self) -> Option<SpecialFormFn> {
        match self {
            Callable::Native(NativeFunction {
                kind: NativeKind::SpecialForm(f),
                ..
            }) => Some(*f),
            _ => None,
        }
    }
}

impl From<NativeFunction> for Callable {
    fn from(native: NativeFunction) -> Self {
        Callable::Native(native)
    }
}

impl From<UserFunction> for Callable {
    fn from(user: UserFunction) -> Self {
        Callable::User(user)
    }
}

/// Whether a node is a bare symbol leaf, and which.
pub(crate) fn symbol_leaf(node: &AstNode) -> Option<&str> {
    match &node.value {
        Expr::Leaf(Atom::Symbol(name)) => Some(name),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arity_bounds() {
        assert!(Arity::Exact(1).accepts(1));
        assert!(!Arity::Exact(1).accepts(2));
        assert!(Arity::AtLeast(1).accepts(3));
        assert!(!Arity::AtLeast(1).accepts(0));
        assert_eq!(Arity::AtLeast(0).to_string(), "any number of");
        assert_eq!(Arity::AtLeast(2).to_string(), "at least 2");
    }

    #[test]
    fn user_function_arity_follows_its_parameters() {
        let f: Callable = UserFunction::lambda(vec!["a".into(), "b".into()], leaf(Atom::Number(1.0))).into();
        assert_eq!(f.arity(), Arity::Exact(2));
        let err = f.check_arity(1).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::ArityMismatch { function, actual: 1, .. } if function == "lambda"
        ));
    }

    #[test]
    fn constants_are_named_and_take_no_arguments() {
        let c: Callable = UserFunction::constant("x", Atom::Number(5.0)).into();
        assert_eq!(c.display_name(), "x");
        assert_eq!(c.arity(), Arity::Exact(0));
        assert!(c.special_form().is_none());
    }
}
