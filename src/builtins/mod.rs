//! # Native Built-ins
//!
//! The functions every runtime starts with.
//!
//! ## Module Structure
//!
//! - **`helpers`**: argument extraction and error construction
//! - **`math`**: `+`, `-`
//! - **`collections`**: `list`, `first`, `rest`
//! - **`external`**: `println`
//! - **`special_forms`**: `define`, `lambda`
//!
//! Each module exposes a `register_*` function; [`register_all_builtins`]
//! calls them all.

use std::rc::Rc;

use crate::runtime::callable::Callable;
use crate::runtime::registry::Runtime;

pub mod collections;
pub mod external;
pub mod helpers;
pub mod math;
pub mod special_forms;

// ============================================================================
// COLLABORATOR INTERFACES
// ============================================================================

/// Where `println` lines go. The host picks the sink.
pub trait OutputSink {
    fn emit(&mut self, line: &str);
}

/// Discards all output.
pub struct NullSink;

impl OutputSink for NullSink {
    fn emit(&mut self, _line: &str) {}
}

/// The slice of the runtime that stateful built-ins may touch.
pub trait ExecutionContext {
    /// Writes one line to the output sink.
    fn emit_line(&mut self, line: &str);
    /// Installs a global binding, visible to every later lookup.
    fn register_function(&mut self, name: &str, callable: Rc<Callable>);
}

// ============================================================================
// REGISTRATION
// ============================================================================

/// Registers every native built-in with `runtime`.
pub fn register_all_builtins(runtime: &mut Runtime) {
    math::register_math_builtins(runtime);
    collections::register_collection_builtins(runtime);
    external::register_external_builtins(runtime);
    special_forms::register_special_forms(runtime);
}
