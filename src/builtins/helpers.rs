//! Shared infrastructure for the built-ins: type extraction and error
//! construction with consistent messages.
//!
//! Errors built here carry no location; the evaluator attaches the span of
//! the calling form.

use crate::ast::atom::Atom;
use crate::errors::{ErrorKind, SexprError};

/// Result type of every built-in.
pub type BuiltinResult = Result<Atom, SexprError>;

/// Creates a type error: `function` expected `expected`, got `found`.
pub fn type_error(function: &str, expected: &str, found: &Atom) -> SexprError {
    SexprError::new(ErrorKind::TypeMismatch {
        function: function.to_string(),
        expected: expected.to_string(),
        found: found.describe(),
    })
}

/// Extracts a number or fails with a type error naming the argument position.
pub fn extract_number(value: &Atom, index: usize, function: &str) -> Result<f64, SexprError> {
    match value {
        Atom::Number(n) => Ok(*n),
        other => Err(type_error(
            function,
            &format!("a Number as argument {}", index + 1),
            other,
        )),
    }
}

/// Extracts a symbol name or fails with a type error.
pub fn extract_symbol<'a>(value: &'a Atom, function: &str) -> Result<&'a str, SexprError> {
    match value {
        Atom::Symbol(name) => Ok(name),
        other => Err(type_error(function, "a Symbol", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_extraction_reports_position() {
        let err = extract_number(&Atom::Text("a".into()), 1, "+").unwrap_err();
        assert_eq!(
            err.kind(),
            &ErrorKind::TypeMismatch {
                function: "+".into(),
                expected: "a Number as argument 2".into(),
                found: "Text a".into(),
            }
        );
    }

    #[test]
    fn symbol_extraction() {
        assert_eq!(extract_symbol(&Atom::Symbol("x".into()), "define").unwrap(), "x");
        assert!(extract_symbol(&Atom::Number(1.0), "define").is_err());
    }
}
