pub use crate::errors::{ErrorKind, SexprError};

pub mod ast;
pub mod builtins;
pub mod cli;
pub mod errors;
pub mod runtime;
pub mod syntax;
