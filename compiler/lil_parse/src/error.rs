//! Parse errors.

use thiserror::Error;

use lil_ir::Span;
use lil_lexer::{LexError, TokenKind};

#[derive(Clone, Debug, PartialEq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("expected {expected}, found {found}")]
    Unexpected {
        expected: &'static str,
        found: TokenKind,
        span: Span,
    },

    #[error("`var` is only allowed on variable definitions")]
    VarInSignature { span: Span },

    #[error("`var` definition needs an initializer to infer its type")]
    VarWithoutInit { span: Span },
}

impl ParseError {
    pub fn span(&self) -> Span {
        match self {
            ParseError::Lex(err) => err.span(),
            ParseError::Unexpected { span, .. }
            | ParseError::VarInSignature { span }
            | ParseError::VarWithoutInit { span } => *span,
        }
    }
}
