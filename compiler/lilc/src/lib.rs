//! The lil compiler driver.
//!
//! `lilc run <file>` compiles a program and executes its entry point on the
//! SSA evaluator; `lilc build <file>` prints the compiled module. The
//! binary in `main.rs` only parses arguments; everything else lives here so
//! tests can drive it without spawning processes.

pub mod commands;
mod diagnostic;
mod error;
mod tracing_setup;

pub use commands::{
    build_file, build_source, compile_source, run_file, run_source, Compilation, RunOutput,
};
pub use diagnostic::{emit, render};
pub use error::DriverError;
pub use tracing_setup::{init_tracing, level_filter};
