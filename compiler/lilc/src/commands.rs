//! `run` and `build`.

use std::path::Path;
use std::process::ExitCode;

use lil_codegen::{compile_program, CodegenOptions, CompiledProgram, ValueKind};
use lil_ir::StringInterner;
use lil_ssa::host::is_host_function;
use lil_ssa::{Evaluator, FunctionId, Module, ModuleBuilder, PrintHandler, Value};
use tracing::{debug, instrument, warn};

use crate::diagnostic::emit;
use crate::error::DriverError;

/// A compiled program and the module holding it.
pub struct Compilation {
    pub module: Module,
    pub program: CompiledProgram<FunctionId>,
}

/// Result of `run`: the entry point's value and anything it printed
/// (empty unless the print handler buffers).
#[derive(Debug, PartialEq)]
pub struct RunOutput {
    pub value: Value,
    pub kind: ValueKind,
    pub output: String,
}

/// Parse and compile `source` into a fresh module.
#[instrument(level = "debug", skip_all, fields(bytes = source.len()))]
pub fn compile_source(source: &str) -> Result<Compilation, DriverError> {
    let interner = StringInterner::new();
    let program = lil_parse::parse(source, &interner)?;

    let mut builder = ModuleBuilder::new();
    let compiled = compile_program(&mut builder, &program, &interner, &CodegenOptions::default())?;
    let module = builder.into_module();
    debug!(
        functions = compiled.functions,
        result = %compiled.result,
        "compiled"
    );
    warn_unbound_externs(&module);

    Ok(Compilation {
        module,
        program: compiled,
    })
}

/// The module listing for `source`.
pub fn build_source(source: &str) -> Result<String, DriverError> {
    Ok(compile_source(source)?.module.to_string())
}

/// Compile `source` and execute its entry point.
pub fn run_source(source: &str, print: PrintHandler) -> Result<RunOutput, DriverError> {
    let compiled = compile_source(source)?;
    if std::env::var("LIL_DEBUG_IR").is_ok() {
        eprintln!("=== IR ===");
        eprint!("{}", compiled.module);
        eprintln!("=== END IR ===");
    }

    let mut eval = Evaluator::with_print_handler(&compiled.module, print);
    let value = eval.call(compiled.program.entry, &[])?;
    Ok(RunOutput {
        value,
        kind: compiled.program.result,
        output: eval.print_handler().output(),
    })
}

/// `lilc run <file>`: print the program's result, if it has one.
pub fn run_file(path: &str) -> ExitCode {
    with_source(path, |source| {
        let out = run_source(source, PrintHandler::Stdout)?;
        if out.kind != ValueKind::Void {
            println!("{}", out.value);
        }
        Ok(())
    })
}

/// `lilc build <file>`: print the compiled module.
pub fn build_file(path: &str) -> ExitCode {
    with_source(path, |source| {
        print!("{}", build_source(source)?);
        Ok(())
    })
}

/// Read `path`, run `f` on its contents and report any error to stderr.
fn with_source(path: &str, f: impl FnOnce(&str) -> Result<(), DriverError>) -> ExitCode {
    let result = read_file(Path::new(path)).and_then(|source| {
        f(&source).map_err(|err| {
            emit(path, &source, &err);
            err
        })
    });
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err @ DriverError::Io { .. }) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
        Err(_) => ExitCode::FAILURE,
    }
}

fn read_file(path: &Path) -> Result<String, DriverError> {
    std::fs::read_to_string(path).map_err(|source| DriverError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Externs the evaluator cannot call still compile; say so up front.
fn warn_unbound_externs(module: &Module) {
    for (_, function) in module.functions() {
        if function.is_declaration() && !is_host_function(&function.name) {
            warn!(name = %function.name, "extern has no host implementation");
        }
    }
}
