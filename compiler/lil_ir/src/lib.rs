//! Intermediate representation shared by the lil front end and code generator.
//!
//! - [`Name`] / [`StringInterner`]: interned identifiers (`u32` compare)
//! - [`Span`]: byte range into the source text
//! - [`ExprArena`] / [`ExprId`]: the flat, immutable syntax tree
//!
//! The parser builds a [`Program`]; everything downstream only reads it.

mod ast;
mod interner;
mod name;
mod span;

pub use ast::{
    BinaryOp, Expr, ExprArena, ExprId, ExprKind, ExprRange, Param, ParamRange, Program, TypeAnnot,
};
pub use interner::StringInterner;
pub use name::Name;
pub use span::Span;
