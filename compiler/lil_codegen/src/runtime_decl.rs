//! Core runtime functions.
//!
//! Declared as external symbols in every module (unless disabled through
//! [`CodegenOptions::core_runtime`](crate::CodegenOptions)). A backend or
//! host environment supplies the definitions.

use smallvec::SmallVec;

use crate::expr_lowerer::ExprLowerer;
use crate::function_cache::FunctionEntry;
use crate::function_compiler::Signature;
use crate::traits::BuilderMethods;
use crate::ValueKind;

/// Signature of a runtime function.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RuntimeFunction {
    pub name: &'static str,
    pub params: &'static [ValueKind],
    pub ret: ValueKind,
}

/// `int echo(int)`: print and return its argument.
pub const ECHO: RuntimeFunction = RuntimeFunction {
    name: "echo",
    params: &[ValueKind::Int],
    ret: ValueKind::Int,
};

/// `double echod(double)`: print and return its argument.
pub const ECHOD: RuntimeFunction = RuntimeFunction {
    name: "echod",
    params: &[ValueKind::Float],
    ret: ValueKind::Float,
};

/// `double pow(double, double)`, the target of `^`.
pub const POW: RuntimeFunction = RuntimeFunction {
    name: "pow",
    params: &[ValueKind::Float, ValueKind::Float],
    ret: ValueKind::Float,
};

pub const CORE_RUNTIME: &[RuntimeFunction] = &[ECHO, ECHOD, POW];

impl<B: BuilderMethods> ExprLowerer<'_, B> {
    pub(crate) fn declare_core_runtime(&mut self) {
        for rt in CORE_RUNTIME {
            self.declare_runtime(rt);
        }
    }

    /// Declare `rt` if nothing by that name is bound yet.
    pub(crate) fn declare_runtime(&mut self, rt: &RuntimeFunction) -> FunctionEntry<B::Function> {
        let name = self.interner.intern(rt.name);
        let sig = Signature {
            params: rt.params.iter().copied().collect::<SmallVec<_>>(),
            ret: rt.ret,
        };
        self.declare_extern(name, sig)
    }
}
