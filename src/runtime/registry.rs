//! The function registry.
//!
//! A [`Runtime`] maps names to callables. It is built once at the entry point
//! with [`build_default_runtime`], which registers every native built-in, and
//! then passed by reference to every evaluation. `define` adds bindings while
//! a program runs; they are visible to every form evaluated afterwards.
//!
//! ## Usage Workflow
//! ```rust
//! use sexpr::runtime::registry::build_default_runtime;
//! let runtime = build_default_runtime();
//! assert!(runtime.exists("+"));
//! assert!(!runtime.exists("undefined-fn"));
//! ```
//!
//! The registry is single-threaded (`Rc` callables, `&mut` access). Sharing
//! one between threads would need a single lock around both `register` and
//! `lookup`.

use std::rc::Rc;

use tracing::debug;

use crate::builtins;
use crate::errors::{ErrorKind, SexprError};
use crate::runtime::callable::{Callable, NativeFunction};

/// Name to callable mapping, one per run.
#[derive(Debug, Clone, Default)]
pub struct Runtime {
    functions: im::HashMap<String, Rc<Callable>>,
}

impl Runtime {
    /// An empty registry. Most callers want [`build_default_runtime`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the binding for `name`. Last write wins.
    pub fn register(&mut self, name: impl Into<String>, callable: Rc<Callable>) {
        let name = name.into();
        match self.functions.insert(name.clone(), callable) {
            Some(_) => debug!(name = %name, "redefined function"),
            None => debug!(name = %name, "registered function"),
        }
    }

    /// Registers a native under its own name.
    pub fn register_native(&mut self, native: NativeFunction) {
        let name = native.name.clone();
        self.register(name, Rc::new(Callable::Native(native)));
    }

    /// Returns the callable bound to `name`.
    ///
    /// # Errors
    /// `UnboundFunction` if nothing is registered under `name`.
    pub fn lookup(&self, name: &str) -> Result<Rc<Callable>, SexprError> {
        self.functions.get(name).cloned().ok_or_else(|| {
            SexprError::new(ErrorKind::UnboundFunction {
                name: name.to_string(),
            })
        })
    }

    pub fn get(&self, name: &str) -> Option<&Rc<Callable>> {
        self.functions.get(name)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// All registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.functions.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

/// Builds a registry with every native built-in registered exactly once.
#[inline]
pub fn build_default_runtime() -> Runtime {
    let mut runtime = Runtime::new();
    builtins::register_all_builtins(&mut runtime);
    runtime
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::atom::Atom;
    use crate::runtime::callable::UserFunction;

    #[test]
    fn default_runtime_has_every_builtin() {
        let runtime = build_default_runtime();
        assert_eq!(
            runtime.names(),
            vec!["+", "-", "define", "first", "lambda", "list", "println", "rest"]
        );
    }

    #[test]
    fn lookup_of_a_missing_name_is_unbound() {
        let runtime = Runtime::new();
        let err = runtime.lookup("nope").unwrap_err();
        assert_eq!(
            err.kind(),
            &ErrorKind::UnboundFunction {
                name: "nope".into()
            }
        );
    }

    #[test]
    fn last_registration_wins() {
        let mut runtime = Runtime::new();
        let first = Rc::new(Callable::User(UserFunction::constant("x", Atom::Number(1.0))));
        let second = Rc::new(Callable::User(UserFunction::constant("x", Atom::Number(2.0))));
        runtime.register("x", first);
        runtime.register("x", Rc::clone(&second));
        assert!(Rc::ptr_eq(&runtime.lookup("x").unwrap(), &second));
        assert_eq!(runtime.len(), 1);
    }

    #[test]
    fn registering_the_same_native_twice_is_idempotent() {
        let mut runtime = build_default_runtime();
        let plus = runtime.lookup("+").unwrap();
        let before = runtime.len();
        runtime.register("+", Rc::clone(&plus));
        runtime.register("+", Rc::clone(&plus));
        assert_eq!(runtime.len(), before);
        assert!(Rc::ptr_eq(&runtime.lookup("+").unwrap(), &plus));
    }
}
