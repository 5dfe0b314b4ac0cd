//! Code generation core for the lil compiler.
//!
//! Lowers a parsed [`Program`](lil_ir::Program) into a backend module through
//! the [`BuilderMethods`] trait. The pieces:
//!
//! - [`ScopeStack`]: lexical frames with capture-aware resolution
//! - [`CaptureTable`]: captured outer variables per function literal
//! - [`FunctionCache`]: finished functions by `(path, name)`
//! - [`coerce`]: the closed set of primitive conversions
//! - the lowering itself (`if`/`while`, two-pass function compilation,
//!   calls, operators), driven by [`compile_program`]
//!
//! There is no separate type checker. Each lowered value carries a
//! [`ValueKind`]; `if` expressions learn their result kind from a trial pass
//! over both branches in a scratch function, and local functions learn their
//! captures from a draft pass before being specialized.

mod captures;
pub mod coerce;
mod error;
mod expr_lowerer;
mod function_cache;
mod function_compiler;
mod kind;
mod lower_calls;
mod lower_control_flow;
mod lower_operators;
mod program;
pub mod runtime_decl;
mod scope;
pub mod traits;

pub use captures::{Capture, CaptureTable, FunctionKey, FunctionPath, KeyDisplay};
pub use error::CodegenError;
pub use function_cache::{FunctionCache, FunctionEntry, FunctionState};
pub use kind::{kind_of, Lowered, TypedValue, ValueKind};
pub use program::{compile_program, CodegenOptions, CompiledProgram};
pub use scope::{FrameFlags, ScopeFrame, ScopeStack, Slot};
pub use traits::{BackendTypes, BuilderMethods, FloatPredicate, IntPredicate, Linkage};
