//! Constructors for building expression trees by hand.
//!
//! The reader produces spanned trees from source text; embedders and tests
//! that already hold classified atoms build them here instead. Nodes built
//! this way carry the default (empty) span unless a span is passed.

use std::rc::Rc;

use crate::ast::atom::Atom;
use crate::ast::{AstNode, Expr, Program, Span, Spanned};
use crate::errors::{ErrorKind, SexprError};
use crate::runtime::callable::Callable;

/// A leaf node wrapping any atom.
pub fn leaf(atom: Atom) -> AstNode {
    leaf_at(atom, Span::default())
}

pub fn leaf_at(atom: Atom, span: Span) -> AstNode {
    Spanned {
        value: Expr::Leaf(atom),
        span,
    }
}

pub fn number(n: f64) -> AstNode {
    leaf(Atom::Number(n))
}

pub fn text(s: &str) -> AstNode {
    leaf(Atom::Text(s.to_string()))
}

pub fn symbol(name: &str) -> AstNode {
    leaf(Atom::Symbol(name.to_string()))
}

pub fn boolean(b: bool) -> AstNode {
    leaf(Atom::Boolean(b))
}

/// A leaf holding a function value, usable directly in head position.
pub fn function(callable: Rc<Callable>) -> AstNode {
    leaf(Atom::Function(callable))
}

/// A compound form. Fails if `children` is empty: every form needs a head.
pub fn form(children: Vec<AstNode>) -> Result<AstNode, SexprError> {
    form_at(children, Span::default())
}

pub fn form_at(children: Vec<AstNode>, span: Span) -> Result<AstNode, SexprError> {
    if children.is_empty() {
        return Err(SexprError::new(ErrorKind::Syntax {
            message: "a form needs at least a head".to_string(),
        }));
    }
    Ok(Spanned {
        value: Expr::Form(children),
        span,
    })
}

/// Shorthand for a form headed by a symbol: `call("+", [..])` is `(+ ..)`.
pub fn call(head: &str, operands: Vec<AstNode>) -> AstNode {
    let mut children = Vec::with_capacity(operands.len() + 1);
    children.push(symbol(head));
    children.extend(operands);
    Spanned {
        value: Expr::Form(children),
        span: Span::default(),
    }
}

pub fn program(forms: Vec<AstNode>) -> Program {
    Program::new(forms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_form_is_rejected() {
        let err = form(vec![]).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Syntax { .. }));
    }

    #[test]
    fn call_puts_the_symbol_at_the_head() {
        let node = call("list", vec![number(1.0), text("two")]);
        assert_eq!(node.value.pretty(), "(list 1 \"two\")");
        let (head, operands) = node.value.as_form().unwrap();
        assert_eq!(head.value.as_leaf(), Some(&Atom::Symbol("list".into())));
        assert_eq!(operands.len(), 2);
    }
}
