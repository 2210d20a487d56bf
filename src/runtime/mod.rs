//! The evaluation runtime: function protocol, registry and evaluator.

pub mod callable;
pub mod eval;
pub mod registry;
pub mod source;

pub use callable::{Arity, Callable, FunctionBody, NativeFunction, NativeKind, UserFunction};
pub use eval::{evaluate, evaluate_ast_node, evaluate_each, evaluate_program, EvalOptions, EvaluationContext, Scope};
pub use registry::{build_default_runtime, Runtime};
pub use source::SourceContext;
