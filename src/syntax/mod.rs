//! The reader collaborator: source text in, expression trees out.

pub mod parser;

pub use parser::{parse, parse_str};
