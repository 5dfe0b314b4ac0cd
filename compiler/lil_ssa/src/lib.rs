//! A small register-based IR for the lil compiler.
//!
//! [`ModuleBuilder`] implements `lil_codegen`'s backend traits, so the
//! code generation core can emit into a [`Module`] directly. The module
//! prints as an LLVM-like listing (`Display`) and runs on the
//! [`Evaluator`], which supplies the core runtime and a few libm functions
//! as host externs.
//!
//! ```text
//! source ─► lil_parse ─► lil_codegen ─► ModuleBuilder ─► Module ─► Evaluator
//! ```

mod builder;
mod error;
mod eval;
pub mod host;
mod module;
mod print_handler;
mod printer;

pub use builder::ModuleBuilder;
pub use error::EvalError;
pub use eval::{Evaluator, Value, MAX_CALL_DEPTH};
pub use module::{
    BinOp, Block, BlockId, CastOp, Const, Function, FunctionId, Inst, InstData, Module, ValueId,
};
pub use print_handler::PrintHandler;
