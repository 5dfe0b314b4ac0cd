//! Parser for lil source text.
//!
//! [`parse`] lexes and parses a whole program into a [`Program`]. Parsing
//! stops at the first error.

mod error;
mod parser;

pub use error::ParseError;
pub use parser::parse;

pub use lil_ir::Program;
