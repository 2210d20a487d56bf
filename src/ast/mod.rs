//! Expression tree for the sexpr runtime.
//!
//! A parsed program is a sequence of [`AstNode`]s. Each node is either a
//! `Leaf` holding an already-classified [`Atom`] or a `Form` whose first child
//! is the head and whose remaining children are operand expressions. Every node
//! carries the [`Span`] of the text it was read from.

use serde::Serialize;

use crate::ast::atom::Atom;

pub mod atom;
pub mod builder;

// ============================================================================
// CORE DATA STRUCTURES
// ============================================================================

/// Byte range in the source text.
///
/// # Examples
///
/// ```rust
/// use sexpr::ast::Span;
/// let span = Span { start: 0, end: 5 };
/// assert_eq!(span.len(), 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Wrapper carrying a source span with any value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Spanned<T> {
    pub value: T,
    pub span: Span,
}

/// A node of the expression tree.
pub type AstNode = Spanned<Expr>;

/// An expression: a self-evaluating leaf or a compound call.
///
/// A `Form` is never empty. The reader turns `()` into the empty list leaf and
/// [`builder::form`] refuses an empty child list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expr {
    Leaf(Atom),
    Form(Vec<AstNode>),
}

impl Expr {
    pub fn is_form(&self) -> bool {
        matches!(self, Expr::Form(_))
    }

    pub fn as_leaf(&self) -> Option<&Atom> {
        match self {
            Expr::Leaf(atom) => Some(atom),
            Expr::Form(_) => None,
        }
    }

    /// Splits a form into its head and operands.
    pub fn as_form(&self) -> Option<(&AstNode, &[AstNode])> {
        match self {
            Expr::Form(children) => children.split_first(),
            Expr::Leaf(_) => None,
        }
    }

    /// Pretty-prints the expression as source text.
    ///
    /// Text leaves are quoted so the output reads back as the same tree.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sexpr::ast::builder::{form, number, symbol, text};
    /// let node = form(vec![symbol("println"), text("hi"), number(1.0)]).unwrap();
    /// assert_eq!(node.value.pretty(), "(println \"hi\" 1)");
    /// ```
    pub fn pretty(&self) -> String {
        match self {
            Expr::Leaf(atom) => Self::pretty_atom(atom),
            Expr::Form(children) => {
                let inner = children
                    .iter()
                    .map(|child| child.value.pretty())
                    .collect::<Vec<_>>()
                    .join(" ");
                format!("({})", inner)
            }
        }
    }

    fn pretty_atom(atom: &Atom) -> String {
        match atom {
            Atom::Text(s) => format!("{:?}", s),
            Atom::List(items) => {
                let inner = items
                    .iter()
                    .map(Self::pretty_atom)
                    .collect::<Vec<_>>()
                    .join(" ");
                format!("({})", inner)
            }
            other => other.to_string(),
        }
    }
}

/// Ordered top-level expressions, evaluated left to right for effect.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Program {
    pub forms: Vec<AstNode>,
}

impl Program {
    pub fn new(forms: Vec<AstNode>) -> Self {
        Self { forms }
    }

    pub fn len(&self) -> usize {
        self.forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }

    /// One pretty-printed line per top-level expression.
    pub fn pretty(&self) -> String {
        self.forms
            .iter()
            .map(|node| node.value.pretty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
