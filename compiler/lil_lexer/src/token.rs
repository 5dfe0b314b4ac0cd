//! Cooked tokens handed to the parser.

use std::fmt;

use lil_ir::{Name, Span};

#[derive(Copy, Clone, PartialEq, Debug)]
pub enum TokenKind {
    // Literals
    Int(i64),
    Double(f64),
    Ident(Name),

    // Keywords
    True,
    False,
    If,
    Then,
    Else,
    While,
    Return,
    Extern,
    Fn,

    // Type keywords
    IntType,
    DoubleType,
    BoolType,
    VoidType,
    Var,

    // Punctuation
    LParen,
    RParen,
    LBrace,
    RBrace,
    Comma,
    Semicolon,

    // Operators
    Assign,
    EqEq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    Bang,

    Eof,
}

impl TokenKind {
    /// Human-readable description for diagnostics.
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Int(_) => "integer literal",
            TokenKind::Double(_) => "double literal",
            TokenKind::Ident(_) => "identifier",
            TokenKind::True => "`true`",
            TokenKind::False => "`false`",
            TokenKind::If => "`if`",
            TokenKind::Then => "`then`",
            TokenKind::Else => "`else`",
            TokenKind::While => "`while`",
            TokenKind::Return => "`return`",
            TokenKind::Extern => "`extern`",
            TokenKind::Fn => "`fn`",
            TokenKind::IntType => "`int`",
            TokenKind::DoubleType => "`double`",
            TokenKind::BoolType => "`bool`",
            TokenKind::VoidType => "`void`",
            TokenKind::Var => "`var`",
            TokenKind::LParen => "`(`",
            TokenKind::RParen => "`)`",
            TokenKind::LBrace => "`{`",
            TokenKind::RBrace => "`}`",
            TokenKind::Comma => "`,`",
            TokenKind::Semicolon => "`;`",
            TokenKind::Assign => "`=`",
            TokenKind::EqEq => "`==`",
            TokenKind::NotEq => "`!=`",
            TokenKind::Lt => "`<`",
            TokenKind::LtEq => "`<=`",
            TokenKind::Gt => "`>`",
            TokenKind::GtEq => "`>=`",
            TokenKind::Plus => "`+`",
            TokenKind::Minus => "`-`",
            TokenKind::Star => "`*`",
            TokenKind::Slash => "`/`",
            TokenKind::Caret => "`^`",
            TokenKind::Bang => "`!`",
            TokenKind::Eof => "end of file",
        }
    }

    /// True for the keywords that start a type annotation.
    pub fn is_type(self) -> bool {
        matches!(
            self,
            TokenKind::IntType
                | TokenKind::DoubleType
                | TokenKind::BoolType
                | TokenKind::VoidType
                | TokenKind::Var
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}
