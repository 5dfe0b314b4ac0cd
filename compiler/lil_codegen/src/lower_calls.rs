//! Call lowering.
//!
//! Explicit arguments are converted to the declared parameter kinds. For a
//! finished local function, the values of its captured variables are then
//! appended: each capture is resolved by name in the caller's scope and
//! passed by value.

use lil_ir::{ExprRange, Name, Span};
use smallvec::SmallVec;
use tracing::trace;

use crate::coerce::{cast_to_if_needed, convert};
use crate::expr_lowerer::ExprLowerer;
use crate::function_cache::{FunctionEntry, FunctionState};
use crate::traits::BuilderMethods;
use crate::{Capture, CodegenError, Lowered, TypedValue, ValueKind};

impl<B: BuilderMethods> ExprLowerer<'_, B> {
    pub(crate) fn lower_call(
        &mut self,
        func: Name,
        args: ExprRange,
        span: Span,
    ) -> Result<Lowered<B::Value>, CodegenError> {
        let callee = self.lookup_callee(func, span)?;
        let interner = self.interner;

        let program = self.program;
        let arg_ids = program.arena.list(args);
        if arg_ids.len() != callee.explicit {
            return Err(CodegenError::ArgumentCountMismatch {
                callee: callee.key.mangle(interner),
                expected: callee.explicit,
                found: arg_ids.len(),
                span,
            });
        }

        // A local function still being drafted may only call itself.
        let drafting = callee.local && callee.state == FunctionState::Draft;
        if drafting && self.scopes.innermost_function() != Some(&callee.key) {
            return Err(CodegenError::RecursiveLocalFunction {
                name: callee.key.mangle(interner),
                span,
            });
        }

        let mut values: SmallVec<[B::Value; 8]> = SmallVec::with_capacity(callee.params.len());
        for (&arg, &kind) in arg_ids.iter().zip(callee.explicit_params()) {
            let arg_span = program.arena.span(arg);
            let Some(value) = self.lower(arg)? else {
                return Err(CodegenError::TypeMismatch {
                    expected: kind,
                    found: ValueKind::Void,
                    span: arg_span,
                });
            };
            values.push(convert(self.builder, value, kind, arg_span)?.value);
        }

        if callee.local && !drafting {
            self.append_captures(&callee, span, &mut values)?;
        }

        trace!(callee = %callee.key.display(self.interner), args = values.len(), "call");
        let result = self.builder.call(callee.func, &values, "call");
        Ok(match (result, callee.ret) {
            (_, ValueKind::Void) | (None, _) => None,
            (Some(value), kind) => Some(TypedValue::new(value, kind)),
        })
    }

    fn lookup_callee(
        &self,
        name: Name,
        span: Span,
    ) -> Result<FunctionEntry<B::Function>, CodegenError> {
        self.scopes
            .lookup_function(name)
            .or_else(|| self.functions.get(&name))
            .cloned()
            .ok_or_else(|| CodegenError::UnknownCallee {
                name: self.interner.lookup(name).to_owned(),
                span,
            })
    }

    /// Load each captured variable from the caller's scope.
    fn append_captures(
        &mut self,
        callee: &FunctionEntry<B::Function>,
        span: Span,
        values: &mut SmallVec<[B::Value; 8]>,
    ) -> Result<(), CodegenError> {
        let captures: SmallVec<[Capture; 4]> =
            self.captures.get(&callee.key).iter().copied().collect();
        if captures.len() != callee.capture_count() {
            return Err(CodegenError::CaptureArityMismatch {
                callee: callee.key.mangle(self.interner),
                expected: callee.capture_count(),
                found: captures.len(),
                span,
            });
        }

        for (capture, &kind) in captures.iter().zip(&callee.params[callee.explicit..]) {
            let slot = self.resolve(capture.name, span)?;
            let loaded = self
                .builder
                .load(slot.kind, slot.ptr, self.interner.lookup(capture.name));
            let loaded = TypedValue::new(loaded, slot.kind);
            let value = cast_to_if_needed(self.builder, loaded, kind, span)?;
            values.push(value.value);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
