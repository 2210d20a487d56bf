//! # Arithmetic
//!
//! - **`+`**: sum of any number of Numbers, `0` for none
//! - **`-`**: first argument minus each following one, in order
//!
//! Both are pure: Numbers in, a Number out, no state touched.

use crate::ast::atom::Atom;
use crate::builtins::helpers::{extract_number, BuiltinResult};
use crate::runtime::callable::{Arity, NativeFunction, NativeKind};
use crate::runtime::registry::Runtime;

/// Adds numbers.
///
/// Usage: (+ <a> <b> ...)
///
/// Example:
///   (+ 1 2 3) ; => 6
///   (+)       ; => 0
pub fn builtin_add(args: &[Atom]) -> BuiltinResult {
    let mut sum = 0.0;
    for (i, arg) in args.iter().enumerate() {
        sum += extract_number(arg, i, "+")?;
    }
    Ok(Atom::Number(sum))
}

/// Subtracts every argument after the first from the first.
///
/// Usage: (- <a> <b> ...)
///
/// Example:
///   (- 10 3 2) ; => 5
///   (- 4)      ; => 4
pub fn builtin_sub(args: &[Atom]) -> BuiltinResult {
    // Arity (at least one) is checked before we get here.
    let Some((first, rest)) = args.split_first() else {
        return Ok(Atom::Number(0.0));
    };
    let mut result = extract_number(first, 0, "-")?;
    for (i, arg) in rest.iter().enumerate() {
        result -= extract_number(arg, i + 1, "-")?;
    }
    Ok(Atom::Number(result))
}

/// Registers `+` and `-`.
pub fn register_math_builtins(runtime: &mut Runtime) {
    runtime.register_native(NativeFunction::new(
        "+",
        Arity::AtLeast(0),
        NativeKind::Pure(builtin_add),
        "(+ <number> ...) sum of the arguments",
    ));
    runtime.register_native(NativeFunction::new(
        "-",
        Arity::AtLeast(1),
        NativeKind::Pure(builtin_sub),
        "(- <number> <number> ...) first argument minus the rest",
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    #[test]
    fn add_sums_in_order() {
        let args = [Atom::Number(1.5), Atom::Number(2.0), Atom::Number(-0.5)];
        assert_eq!(builtin_add(&args).unwrap(), Atom::Number(3.0));
        assert_eq!(builtin_add(&[]).unwrap(), Atom::Number(0.0));
    }

    #[test]
    fn add_rejects_non_numbers() {
        let err = builtin_add(&[Atom::Number(1.0), Atom::Boolean(true)]).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::TypeMismatch { function, .. } if function == "+"));
    }

    #[test]
    fn sub_is_left_associative() {
        let args = [Atom::Number(10.0), Atom::Number(3.0), Atom::Number(2.0)];
        assert_eq!(builtin_sub(&args).unwrap(), Atom::Number(5.0));
        assert_eq!(builtin_sub(&[Atom::Number(4.0)]).unwrap(), Atom::Number(4.0));
    }

    #[test]
    fn sub_checks_the_first_argument_too() {
        let err = builtin_sub(&[Atom::Symbol("x".into()), Atom::Number(1.0)]).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::TypeMismatch { .. }));
    }
}
