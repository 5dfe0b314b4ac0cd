//! Code generation errors.
//!
//! Compilation stops at the first error; nothing is handed back to the
//! caller except the error itself.

use lil_ir::Span;
use thiserror::Error;

use crate::ValueKind;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CodegenError {
    #[error("cannot find `{name}` in this scope")]
    UnresolvedName { name: String, span: Span },

    #[error("no function named `{name}` is in scope")]
    UnknownCallee { name: String, span: Span },

    #[error("`if` branches disagree: `then` yields {then_kind}, `else` yields {else_kind}")]
    BranchTypeMismatch {
        then_kind: ValueKind,
        else_kind: ValueKind,
        span: Span,
    },

    #[error("call to `{callee}` supplies {found} captured values, but it expects {expected}")]
    CaptureArityMismatch {
        callee: String,
        expected: usize,
        found: usize,
        span: Span,
    },

    /// A coercion outside the supported set was requested by the lowering
    /// code itself.
    #[error("internal error: no coercion from {from} to {to}")]
    InvalidCoercion {
        from: ValueKind,
        to: ValueKind,
        span: Span,
    },

    #[error("`{callee}` takes {expected} arguments, but {found} were supplied")]
    ArgumentCountMismatch {
        callee: String,
        expected: usize,
        found: usize,
        span: Span,
    },

    #[error("expected a {expected} value, found {found}")]
    TypeMismatch {
        expected: ValueKind,
        found: ValueKind,
        span: Span,
    },

    #[error("`{op}` cannot be applied to a {kind} value")]
    InvalidOperand {
        op: &'static str,
        kind: ValueKind,
        span: Span,
    },

    #[error("function `{name}` must produce a {expected} value")]
    MissingReturn {
        name: String,
        expected: ValueKind,
        span: Span,
    },

    #[error("local function `{name}` is used before its definition is complete")]
    RecursiveLocalFunction { name: String, span: Span },

    #[error("variable `{name}` cannot hold a {found} value")]
    UnstorableVariable {
        name: String,
        found: ValueKind,
        span: Span,
    },

    #[error("`{name}` needs an explicit type")]
    MissingTypeAnnotation { name: String, span: Span },
}

impl CodegenError {
    pub fn span(&self) -> Span {
        match self {
            CodegenError::UnresolvedName { span, .. }
            | CodegenError::UnknownCallee { span, .. }
            | CodegenError::BranchTypeMismatch { span, .. }
            | CodegenError::CaptureArityMismatch { span, .. }
            | CodegenError::InvalidCoercion { span, .. }
            | CodegenError::ArgumentCountMismatch { span, .. }
            | CodegenError::TypeMismatch { span, .. }
            | CodegenError::InvalidOperand { span, .. }
            | CodegenError::MissingReturn { span, .. }
            | CodegenError::RecursiveLocalFunction { span, .. }
            | CodegenError::UnstorableVariable { span, .. }
            | CodegenError::MissingTypeAnnotation { span, .. } => *span,
        }
    }
}
