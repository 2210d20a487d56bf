use std::fmt;
use std::rc::Rc;

use serde::ser::{Serialize, SerializeSeq, Serializer};

use crate::runtime::callable::Callable;

/// The universal value type.
///
/// Atoms form a tree: a `List` owns its elements and nothing can contain
/// itself. Functions are shared behind `Rc` because the registry, the list
/// that holds them and the form that produced them may all keep a handle.
///
/// # Examples
///
/// ```rust
/// use sexpr::ast::atom::Atom;
/// let list = Atom::List(vec![Atom::Number(1.0), Atom::Text("a".into())]);
/// assert_eq!(list.to_string(), "(1 a)");
/// assert_eq!(Atom::Boolean(false).to_string(), "false");
/// ```
#[derive(Debug, Clone)]
pub enum Atom {
    Number(f64),
    Text(String),
    Symbol(String),
    Boolean(bool),
    List(Vec<Atom>),
    Function(Rc<Callable>),
}

impl Atom {
    /// Returns the variant name, used in type errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            Atom::Number(_) => "Number",
            Atom::Text(_) => "Text",
            Atom::Symbol(_) => "Symbol",
            Atom::Boolean(_) => "Boolean",
            Atom::List(_) => "List",
            Atom::Function(_) => "Function",
        }
    }

    /// Whether the atom can sit in head position and be applied.
    pub fn is_callable(&self) -> bool {
        matches!(self, Atom::Function(_))
    }

    /// Canonical external representation. Total: never fails.
    pub fn render_text(&self) -> String {
        self.to_string()
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Atom::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Atom::Symbol(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Atom]> {
        match self {
            Atom::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Rc<Callable>> {
        match self {
            Atom::Function(callable) => Some(callable),
            _ => None,
        }
    }

    /// A short description for error messages: type plus rendering.
    pub fn describe(&self) -> String {
        format!("{} {}", self.type_name(), self)
    }

    // ------------------------------------------------------------------------
    // Display formatting helpers
    // ------------------------------------------------------------------------

    fn fmt_list(f: &mut fmt::Formatter<'_>, items: &[Atom]) -> fmt::Result {
        write!(f, "(")?;
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", item)?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // f64's Display is the shortest round-trip form: 5, 2.5, 1e-7
            Atom::Number(n) => write!(f, "{}", n),
            Atom::Text(s) => write!(f, "{}", s),
            Atom::Symbol(s) => write!(f, "{}", s),
            Atom::Boolean(b) => write!(f, "{}", b),
            Atom::List(items) => Atom::fmt_list(f, items),
            Atom::Function(callable) => write!(f, "{}", callable.display_name()),
        }
    }
}

/// Functions compare by identity, everything else structurally.
impl PartialEq for Atom {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Atom::Number(a), Atom::Number(b)) => a == b,
            (Atom::Text(a), Atom::Text(b)) => a == b,
            (Atom::Symbol(a), Atom::Symbol(b)) => a == b,
            (Atom::Boolean(a), Atom::Boolean(b)) => a == b,
            (Atom::List(a), Atom::List(b)) => a == b,
            (Atom::Function(a), Atom::Function(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Serialize for Atom {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Atom::Number(n) => serializer.serialize_newtype_variant("Atom", 0, "Number", n),
            Atom::Text(s) => serializer.serialize_newtype_variant("Atom", 1, "Text", s),
            Atom::Symbol(s) => serializer.serialize_newtype_variant("Atom", 2, "Symbol", s),
            Atom::Boolean(b) => serializer.serialize_newtype_variant("Atom", 3, "Boolean", b),
            Atom::List(items) => {
                serializer.serialize_newtype_variant("Atom", 4, "List", &AtomSeq(items))
            }
            Atom::Function(callable) => serializer.serialize_newtype_variant(
                "Atom",
                5,
                "Function",
                callable.display_name(),
            ),
        }
    }
}

struct AtomSeq<'a>(&'a [Atom]);

impl Serialize for AtomSeq<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for item in self.0 {
            seq.serialize_element(item)?;
        }
        seq.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_render_without_trailing_zeroes() {
        assert_eq!(Atom::Number(5.0).to_string(), "5");
        assert_eq!(Atom::Number(2.5).to_string(), "2.5");
        assert_eq!(Atom::Number(-0.125).to_string(), "-0.125");
    }

    #[test]
    fn nested_lists_render_parenthesized() {
        let atom = Atom::List(vec![
            Atom::Symbol("a".into()),
            Atom::List(vec![]),
            Atom::List(vec![Atom::Boolean(true), Atom::Number(3.0)]),
        ]);
        assert_eq!(atom.render_text(), "(a () (true 3))");
    }

    #[test]
    fn text_and_symbol_are_distinct() {
        assert_ne!(Atom::Text("x".into()), Atom::Symbol("x".into()));
        assert_eq!(Atom::Text("x".into()).to_string(), Atom::Symbol("x".into()).to_string());
    }

    #[test]
    fn only_functions_are_callable() {
        assert!(!Atom::Symbol("+".into()).is_callable());
        assert!(!Atom::List(vec![]).is_callable());
    }

    #[test]
    fn serializes_as_tagged_json() {
        let atom = Atom::List(vec![Atom::Number(1.0), Atom::Symbol("x".into())]);
        let json = serde_json::to_string(&atom).unwrap();
        assert_eq!(json, r#"{"List":[{"Number":1.0},{"Symbol":"x"}]}"#);
    }
}
