//! Shared helpers: parse, compile into a fresh module, run `main`.

#![allow(dead_code, clippy::missing_panics_doc)]

use lil_codegen::{compile_program, CodegenError, CodegenOptions, CompiledProgram};
use lil_ir::StringInterner;
use lil_ssa::{EvalError, Evaluator, FunctionId, Module, ModuleBuilder, PrintHandler, Value};

pub struct Compiled {
    pub module: Module,
    pub program: CompiledProgram<FunctionId>,
}

impl Compiled {
    /// Number of live functions whose symbol is `name`.
    pub fn count(&self, name: &str) -> usize {
        self.module
            .functions()
            .filter(|(_, f)| f.name == name)
            .count()
    }

    /// Parameter count of the live function `name`.
    pub fn arity(&self, name: &str) -> Option<usize> {
        self.module
            .function_by_name(name)
            .and_then(|id| self.module.function(id))
            .map(|f| f.params.len())
    }
}

pub fn try_compile(source: &str) -> Result<Compiled, CodegenError> {
    let interner = StringInterner::new();
    let program = match lil_parse::parse(source, &interner) {
        Ok(program) => program,
        Err(err) => panic!("parse failed for {source:?}: {err}"),
    };
    let mut builder = ModuleBuilder::new();
    let compiled = compile_program(&mut builder, &program, &interner, &CodegenOptions::default())?;
    Ok(Compiled {
        module: builder.into_module(),
        program: compiled,
    })
}

pub fn compile(source: &str) -> Compiled {
    match try_compile(source) {
        Ok(compiled) => compiled,
        Err(err) => panic!("compile failed for {source:?}: {err}"),
    }
}

pub fn compile_err(source: &str) -> CodegenError {
    match try_compile(source) {
        Ok(compiled) => panic!("expected an error for {source:?}, got:\n{}", compiled.module),
        Err(err) => err,
    }
}

/// Compile and run, returning the result and everything printed.
pub fn try_run(source: &str) -> (Result<Value, EvalError>, String) {
    let compiled = compile(source);
    let mut eval = Evaluator::with_print_handler(&compiled.module, PrintHandler::buffer());
    let result = eval.call(compiled.program.entry, &[]);
    (result, eval.print_handler().output())
}

pub fn run(source: &str) -> Value {
    match try_run(source) {
        (Ok(value), _) => value,
        (Err(err), _) => panic!("evaluation failed for {source:?}: {err}"),
    }
}
