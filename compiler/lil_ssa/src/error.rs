//! Runtime errors raised while evaluating a module.

use thiserror::Error;

use crate::eval::MAX_CALL_DEPTH;
use crate::module::{FunctionId, ValueId};

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("integer division by zero")]
    DivisionByZero,

    #[error("no host implementation for extern `{name}`")]
    UnknownExtern { name: String },

    #[error("call depth limit of {} exceeded", MAX_CALL_DEPTH)]
    StackOverflow,

    #[error("no function named `{name}`")]
    NoSuchFunction { name: String },

    #[error("call to erased or unknown function {func:?}")]
    UnknownFunction { func: FunctionId },

    #[error("`{name}` takes {expected} arguments, but {found} were supplied")]
    ArgumentCount {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("expected a {expected} value, found {found}")]
    TypeConfusion {
        expected: &'static str,
        found: String,
    },

    #[error("value {0:?} used before it was defined")]
    UndefinedValue(ValueId),

    #[error("block `{block}` in `{function}` ends without a terminator")]
    MissingTerminator { function: String, block: String },
}
