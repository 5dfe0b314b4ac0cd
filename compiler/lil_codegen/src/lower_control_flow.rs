//! Control flow lowering: `if` expressions, `while` loops, trial passes.
//!
//! An `if` is an expression, so its result kind must be known before the
//! real branches are emitted (the result slot is allocated in the dispatch
//! block). Both branches are first lowered into a scratch function that is
//! discarded afterwards; only the kinds they produced survive.

use lil_ir::{ExprId, Span};
use tracing::trace;

use crate::coerce::{cast_to_if_needed, convert};
use crate::expr_lowerer::ExprLowerer;
use crate::scope::FrameFlags;
use crate::traits::{BuilderMethods, Linkage};
use crate::{kind_of, CodegenError, Lowered, TypedValue, ValueKind};

/// Saved position while a trial pass emits into a scratch function.
pub(crate) struct Trial<B: BuilderMethods> {
    scratch: B::Function,
    entry: B::BasicBlock,
    saved_function: B::Function,
    saved_block: B::BasicBlock,
}

impl<B: BuilderMethods> ExprLowerer<'_, B> {
    /// Redirect emission into a fresh scratch function.
    pub(crate) fn begin_trial(&mut self) -> Trial<B> {
        self.trial_count += 1;
        let symbol = format!("__trial.{}", self.trial_count);
        trace!(%symbol, "trial pass");

        let scratch = self
            .builder
            .declare_function(&symbol, &[], ValueKind::Void, Linkage::Internal);
        let entry = self.builder.append_block(scratch, "entry");
        let trial = Trial {
            scratch,
            entry,
            saved_function: self.current_function,
            saved_block: self.current_block,
        };
        self.current_function = scratch;
        self.position_at_end(entry);
        self.scopes
            .push(entry, self.names.trial, FrameFlags::TRANSPARENT, None);
        trial
    }

    /// Drop everything the trial emitted and restore the saved position.
    pub(crate) fn end_trial(&mut self, trial: Trial<B>) {
        self.scopes.pop_until(trial.entry);
        self.scopes.pop();
        self.builder.erase_function(trial.scratch);
        self.current_function = trial.saved_function;
        self.position_at_end(trial.saved_block);
    }

    /// Kinds the two branches would produce.
    fn trial_branch_kinds(
        &mut self,
        then_branch: ExprId,
        else_branch: ExprId,
    ) -> Result<(ValueKind, ValueKind), CodegenError> {
        let trial = self.begin_trial();
        let then_kind = kind_of(&self.lower_scoped(then_branch, self.names.then_branch)?);
        let else_kind = kind_of(&self.lower_scoped(else_branch, self.names.else_branch)?);
        self.end_trial(trial);
        Ok((then_kind, else_kind))
    }

    /// ```text
    ///   br if.dispatch
    /// if.dispatch:
    ///   %c = <cond>            ; converted to bool
    ///   %slot = alloca <kind>  ; storable kinds only
    ///   condbr %c, if.then, if.else
    /// if.then:  <then> ; store %slot ; br if.merge
    /// if.else:  <else> ; store %slot ; br if.merge
    /// if.merge: load %slot
    /// ```
    pub(crate) fn lower_if(
        &mut self,
        cond: ExprId,
        then_branch: ExprId,
        else_branch: ExprId,
        span: Span,
    ) -> Result<Lowered<B::Value>, CodegenError> {
        let func = self.current_function;
        let dispatch = self.builder.append_block(func, "if.dispatch");
        let then_bb = self.builder.append_block(func, "if.then");
        let else_bb = self.builder.append_block(func, "if.else");
        let merge_bb = self.builder.append_block(func, "if.merge");

        self.builder.br(dispatch);
        self.position_at_end(dispatch);
        self.scopes
            .push(dispatch, self.names.if_dispatch, FrameFlags::TRANSPARENT, None);

        let cond_span = self.program.arena.span(cond);
        let cond_value = self.lower_operand(cond, "if")?;
        let cond_value = convert(self.builder, cond_value, ValueKind::Bool, cond_span)?;

        let (then_kind, else_kind) = self.trial_branch_kinds(then_branch, else_branch)?;
        if then_kind != else_kind {
            return Err(CodegenError::BranchTypeMismatch {
                then_kind,
                else_kind,
                span,
            });
        }
        let kind = then_kind;
        let slot = kind
            .is_storable()
            .then(|| self.builder.alloca(kind, "if.result"));
        self.builder.cond_br(cond_value.value, then_bb, else_bb);

        for (block, branch, name) in [
            (then_bb, then_branch, self.names.then_branch),
            (else_bb, else_branch, self.names.else_branch),
        ] {
            self.position_at_end(block);
            let value = self.lower_scoped(branch, name)?;
            if let (Some(slot), Some(value)) = (slot, value) {
                let value = cast_to_if_needed(self.builder, value, kind, span)?;
                self.builder.store(value.value, slot);
            }
            self.builder.br(merge_bb);
        }

        self.scopes.pop();
        self.position_at_end(merge_bb);
        self.scopes.set_current_block(merge_bb);

        Ok(slot.map(|ptr| TypedValue::new(self.builder.load(kind, ptr, "if.value"), kind)))
    }

    /// ```text
    ///   br while.cond
    /// while.cond: %c = <cond> ; condbr %c, while.body, while.exit
    /// while.body: <body> ; br while.cond
    /// while.exit:
    /// ```
    ///
    /// The loop's value is the last condition evaluated.
    pub(crate) fn lower_while(
        &mut self,
        cond: ExprId,
        body: ExprId,
        span: Span,
    ) -> Result<Lowered<B::Value>, CodegenError> {
        let func = self.current_function;
        let dispatch = self.builder.append_block(func, "while.cond");
        let body_bb = self.builder.append_block(func, "while.body");
        let exit_bb = self.builder.append_block(func, "while.exit");

        self.builder.br(dispatch);
        self.position_at_end(dispatch);
        self.scopes
            .push(dispatch, self.names.while_loop, FrameFlags::TRANSPARENT, None);

        let cond_value = self.lower_operand(cond, "while")?;
        let cond_value = convert(self.builder, cond_value, ValueKind::Bool, span)?;
        self.builder.cond_br(cond_value.value, body_bb, exit_bb);

        self.position_at_end(body_bb);
        self.lower_scoped(body, self.names.loop_body)?;
        self.builder.br(dispatch);

        self.scopes.pop();
        self.position_at_end(exit_bb);
        self.scopes.set_current_block(exit_bb);

        Ok(Some(cond_value))
    }
}
