//! Errors surfaced by the driver.

use std::io;
use std::path::PathBuf;

use lil_codegen::CodegenError;
use lil_ir::Span;
use lil_parse::ParseError;
use lil_ssa::EvalError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("cannot read `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Codegen(#[from] CodegenError),

    #[error("runtime error: {0}")]
    Eval(#[from] EvalError),
}

impl DriverError {
    /// Source location, for errors that have one.
    pub fn span(&self) -> Option<Span> {
        match self {
            DriverError::Parse(err) => Some(err.span()),
            DriverError::Codegen(err) => Some(err.span()),
            DriverError::Io { .. } | DriverError::Eval(_) => None,
        }
    }

    /// Short label for the report header.
    pub fn phase(&self) -> &'static str {
        match self {
            DriverError::Io { .. } => "io",
            DriverError::Parse(_) => "parse",
            DriverError::Codegen(_) => "codegen",
            DriverError::Eval(_) => "runtime",
        }
    }
}
