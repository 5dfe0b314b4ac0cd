//! `logos`-driven lexer.

use logos::Logos;
use thiserror::Error;

use lil_ir::{Span, StringInterner};

use crate::{Token, TokenKind};

/// Raw token from logos (before interning).
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
#[logos(skip r"//[^\n]*")]
enum RawToken {
    // === Keywords ===
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("if")]
    If,
    #[token("then")]
    Then,
    #[token("else")]
    Else,
    #[token("while")]
    While,
    #[token("return")]
    Return,
    #[token("extern")]
    Extern,
    #[token("fn")]
    Fn,
    #[token("int")]
    IntType,
    #[token("double")]
    DoubleType,
    #[token("bool")]
    BoolType,
    #[token("void")]
    VoidType,
    #[token("var")]
    Var,

    // === Literals ===
    #[regex(r"[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?")]
    Double,
    #[regex(r"[0-9]+")]
    Int,
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,

    // === Punctuation ===
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,

    // === Operators ===
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("=")]
    Assign,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("^")]
    Caret,
    #[token("!")]
    Bang,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("unexpected character `{text}`")]
    UnexpectedChar { text: String, span: Span },
    #[error("integer literal `{text}` does not fit in 64 bits")]
    IntOverflow { text: String, span: Span },
    #[error("malformed number `{text}`")]
    BadNumber { text: String, span: Span },
}

impl LexError {
    pub fn span(&self) -> Span {
        match self {
            LexError::UnexpectedChar { span, .. }
            | LexError::IntOverflow { span, .. }
            | LexError::BadNumber { span, .. } => *span,
        }
    }
}

/// Tokenize `source`, appending a trailing [`TokenKind::Eof`].
pub fn lex(source: &str, interner: &StringInterner) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::new();
    let mut lexer = RawToken::lexer(source);

    while let Some(raw) = lexer.next() {
        let span = Span::from_range(lexer.span());
        let text = lexer.slice();
        let Ok(raw) = raw else {
            return Err(LexError::UnexpectedChar {
                text: text.to_owned(),
                span,
            });
        };
        let kind = cook(raw, text, span, interner)?;
        tokens.push(Token { kind, span });
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "sources over 4GB are rejected by Span::from_range saturation"
    )]
    let end = source.len() as u32;
    tokens.push(Token {
        kind: TokenKind::Eof,
        span: Span::new(end, end),
    });
    Ok(tokens)
}

fn cook(
    raw: RawToken,
    text: &str,
    span: Span,
    interner: &StringInterner,
) -> Result<TokenKind, LexError> {
    Ok(match raw {
        RawToken::True => TokenKind::True,
        RawToken::False => TokenKind::False,
        RawToken::If => TokenKind::If,
        RawToken::Then => TokenKind::Then,
        RawToken::Else => TokenKind::Else,
        RawToken::While => TokenKind::While,
        RawToken::Return => TokenKind::Return,
        RawToken::Extern => TokenKind::Extern,
        RawToken::Fn => TokenKind::Fn,
        RawToken::IntType => TokenKind::IntType,
        RawToken::DoubleType => TokenKind::DoubleType,
        RawToken::BoolType => TokenKind::BoolType,
        RawToken::VoidType => TokenKind::VoidType,
        RawToken::Var => TokenKind::Var,
        RawToken::Int => {
            let value = text.parse::<i64>().map_err(|_| LexError::IntOverflow {
                text: text.to_owned(),
                span,
            })?;
            TokenKind::Int(value)
        }
        RawToken::Double => {
            let value = text.parse::<f64>().map_err(|_| LexError::BadNumber {
                text: text.to_owned(),
                span,
            })?;
            TokenKind::Double(value)
        }
        RawToken::Ident => TokenKind::Ident(interner.intern(text)),
        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::LBrace => TokenKind::LBrace,
        RawToken::RBrace => TokenKind::RBrace,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Semicolon => TokenKind::Semicolon,
        RawToken::EqEq => TokenKind::EqEq,
        RawToken::NotEq => TokenKind::NotEq,
        RawToken::LtEq => TokenKind::LtEq,
        RawToken::GtEq => TokenKind::GtEq,
        RawToken::Assign => TokenKind::Assign,
        RawToken::Lt => TokenKind::Lt,
        RawToken::Gt => TokenKind::Gt,
        RawToken::Plus => TokenKind::Plus,
        RawToken::Minus => TokenKind::Minus,
        RawToken::Star => TokenKind::Star,
        RawToken::Slash => TokenKind::Slash,
        RawToken::Caret => TokenKind::Caret,
        RawToken::Bang => TokenKind::Bang,
    })
}

#[cfg(test)]
mod tests;
