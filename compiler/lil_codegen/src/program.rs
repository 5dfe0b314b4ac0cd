//! Whole-program compilation.

use lil_ir::{Program, StringInterner};
use tracing::{debug, instrument};

use crate::coerce::convert;
use crate::expr_lowerer::ExprLowerer;
use crate::traits::{BuilderMethods, Linkage};
use crate::{CodegenError, ValueKind};

/// Options for [`compile_program`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodegenOptions {
    /// Symbol of the generated entry point.
    pub entry_name: String,
    /// Declare `echo`, `echod` and `pow` up front.
    pub core_runtime: bool,
}

impl Default for CodegenOptions {
    fn default() -> Self {
        CodegenOptions {
            entry_name: "main".to_owned(),
            core_runtime: true,
        }
    }
}

/// Handle to the generated entry point and what it returns.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CompiledProgram<F> {
    pub entry: F,
    /// `Void` when the program's last value is not storable.
    pub result: ValueKind,
    /// Distinct functions in the function cache.
    pub functions: usize,
}

/// Compile `program` into `builder`'s module.
///
/// The top-level statements become the body of an externally visible entry
/// function. Its return kind is learned by a trial pass over the whole
/// program first. On error the module may hold partial output and should be
/// discarded.
#[instrument(level = "debug", skip_all, fields(entry = %options.entry_name))]
pub fn compile_program<B: BuilderMethods>(
    builder: &mut B,
    program: &Program,
    interner: &StringInterner,
    options: &CodegenOptions,
) -> Result<CompiledProgram<B::Function>, CodegenError> {
    let scratch = builder.declare_function("__trial.0", &[], ValueKind::Void, Linkage::Internal);
    let scratch_entry = builder.append_block(scratch, "entry");
    let mut lowerer = ExprLowerer::new(builder, program, interner, scratch, scratch_entry);
    if options.core_runtime {
        lowerer.declare_core_runtime();
    }

    let trial = lowerer.lower_program()?;
    let result = match trial {
        Some(value) if value.kind.is_storable() => value.kind,
        _ => ValueKind::Void,
    };
    lowerer.builder.erase_function(scratch);
    debug!(%result, "program result kind");

    let entry = lowerer
        .builder
        .declare_function(&options.entry_name, &[], result, Linkage::External);
    let entry_bb = lowerer.builder.append_block(entry, "entry");
    lowerer.current_function = entry;
    lowerer.position_at_end(entry_bb);

    let value = lowerer.lower_program()?;
    match (result, value) {
        (ValueKind::Void, _) => lowerer.builder.ret_void(),
        (kind, Some(value)) => {
            let value = convert(lowerer.builder, value, kind, program.span)?;
            lowerer.builder.ret(value.value);
        }
        (kind, None) => {
            return Err(CodegenError::MissingReturn {
                name: options.entry_name.clone(),
                expected: kind,
                span: program.span,
            })
        }
    }

    Ok(CompiledProgram {
        entry,
        result,
        functions: lowerer.cache.len(),
    })
}
