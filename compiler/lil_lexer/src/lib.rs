//! Tokenizer for lil source text.
//!
//! Built on `logos`. Identifiers are interned while lexing so the parser
//! only ever sees [`Name`](lil_ir::Name) handles.

mod lexer;
mod token;

pub use lexer::{lex, LexError};
pub use token::{Token, TokenKind};
