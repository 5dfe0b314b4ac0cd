//! Expression lowering coordinator.
//!
//! `ExprLowerer` owns the lowering context (scope stack, capture table,
//! function cache, current function) and dispatches each [`ExprKind`] to a
//! focused `lower_*` method implemented in separate files.
//!
//! ```text
//! ExprLowerer
//!   ├── expr_lowerer.rs       : literals, identifiers, variables, blocks
//!   ├── lower_operators.rs    : Binary, Not
//!   ├── lower_control_flow.rs : If, While, trial passes
//!   ├── function_compiler.rs  : Function, Extern
//!   ├── lower_calls.rs        : Call
//!   └── runtime_decl.rs       : echo / echod / pow
//! ```

use lil_ir::{ExprId, ExprKind, ExprRange, Name, Program, Span, StringInterner, TypeAnnot};
use lil_stack::ensure_sufficient_stack;
use rustc_hash::FxHashMap;
use tracing::trace;

use crate::coerce::convert;
use crate::function_cache::{FunctionCache, FunctionEntry};
use crate::scope::{FrameFlags, ScopeStack, Slot};
use crate::traits::BuilderMethods;
use crate::{kind_of, CaptureTable, CodegenError, Lowered, TypedValue, ValueKind};

/// Pre-interned frame names.
#[derive(Clone, Copy)]
pub(crate) struct FrameNames {
    pub(crate) program: Name,
    pub(crate) block: Name,
    pub(crate) if_dispatch: Name,
    pub(crate) then_branch: Name,
    pub(crate) else_branch: Name,
    pub(crate) while_loop: Name,
    pub(crate) loop_body: Name,
    pub(crate) trial: Name,
}

impl FrameNames {
    fn new(interner: &StringInterner) -> Self {
        FrameNames {
            program: interner.intern("program"),
            block: interner.intern("block"),
            if_dispatch: interner.intern("if"),
            then_branch: interner.intern("then"),
            else_branch: interner.intern("else"),
            while_loop: interner.intern("while"),
            loop_body: interner.intern("do"),
            trial: interner.intern("trial"),
        }
    }
}

/// Lowers a [`Program`] through a backend's [`BuilderMethods`].
pub(crate) struct ExprLowerer<'a, B: BuilderMethods> {
    pub(crate) builder: &'a mut B,
    pub(crate) program: &'a Program,
    pub(crate) interner: &'a StringInterner,
    pub(crate) scopes: ScopeStack<B>,
    pub(crate) captures: CaptureTable,
    pub(crate) cache: FunctionCache<B::Function>,
    /// Top-level functions and externs, by name.
    pub(crate) functions: FxHashMap<Name, FunctionEntry<B::Function>>,
    /// Function receiving instructions.
    pub(crate) current_function: B::Function,
    /// Block receiving instructions.
    pub(crate) current_block: B::BasicBlock,
    pub(crate) names: FrameNames,
    /// Scratch functions created so far (for unique symbol names).
    pub(crate) trial_count: u32,
}

impl<'a, B: BuilderMethods> ExprLowerer<'a, B> {
    pub(crate) fn new(
        builder: &'a mut B,
        program: &'a Program,
        interner: &'a StringInterner,
        function: B::Function,
        block: B::BasicBlock,
    ) -> Self {
        builder.position_at_end(block);
        ExprLowerer {
            builder,
            program,
            interner,
            scopes: ScopeStack::new(),
            captures: CaptureTable::new(),
            cache: FunctionCache::new(),
            functions: FxHashMap::default(),
            current_function: function,
            current_block: block,
            names: FrameNames::new(interner),
            trial_count: 0,
        }
    }

    /// Move the insertion point to the end of `block`.
    pub(crate) fn position_at_end(&mut self, block: B::BasicBlock) {
        self.builder.position_at_end(block);
        self.current_block = block;
    }

    /// Lower one node.
    pub(crate) fn lower(&mut self, id: ExprId) -> Result<Lowered<B::Value>, CodegenError> {
        ensure_sufficient_stack(|| self.lower_inner(id))
    }

    fn lower_inner(&mut self, id: ExprId) -> Result<Lowered<B::Value>, CodegenError> {
        let program = self.program;
        let expr = program.arena.get(id);
        let span = expr.span;
        trace!(?id, ?span, "lower");

        match expr.kind {
            ExprKind::Bool(value) => Ok(Some(TypedValue::new(
                self.builder.const_bool(value),
                ValueKind::Bool,
            ))),
            ExprKind::Int(value) => Ok(Some(TypedValue::new(
                self.builder.const_int(value),
                ValueKind::Int,
            ))),
            ExprKind::Double(value) => Ok(Some(TypedValue::new(
                self.builder.const_float(value),
                ValueKind::Float,
            ))),
            ExprKind::Ident(name) => self.lower_ident(name, span),
            ExprKind::Call { func, args } => self.lower_call(func, args, span),
            ExprKind::Binary { op, left, right } => self.lower_binary(op, left, right, span),
            ExprKind::Not(operand) => self.lower_not(operand, span),
            ExprKind::Assign { target, value } => self.lower_assign(target, value, span),
            ExprKind::Block(_) => self.lower_scoped(id, self.names.block),
            ExprKind::ExprStmt(inner) => self.lower(inner),
            ExprKind::Return(value) => self.lower_return(value),
            ExprKind::If {
                cond,
                then_branch,
                else_branch,
            } => self.lower_if(cond, then_branch, else_branch, span),
            ExprKind::While { cond, body } => self.lower_while(cond, body, span),
            ExprKind::VarDef { ty, name, init } => self.lower_var_def(ty, name, init, span),
            ExprKind::Extern { ret, name, params } => self.lower_extern(ret, name, params, span),
            ExprKind::Function {
                ret,
                name,
                params,
                body,
                local,
            } => self.lower_function(ret, name, params, body, local, span),
        }
    }

    /// Lower a node that must produce a storable value.
    pub(crate) fn lower_operand(
        &mut self,
        id: ExprId,
        op: &'static str,
    ) -> Result<TypedValue<B::Value>, CodegenError> {
        match self.lower(id)? {
            Some(value) if value.kind.is_storable() => Ok(value),
            other => Err(CodegenError::InvalidOperand {
                op,
                kind: kind_of(&other),
                span: self.program.arena.span(id),
            }),
        }
    }

    // -----------------------------------------------------------------------
    // Blocks
    // -----------------------------------------------------------------------

    /// Lower `id` inside a fresh transparent frame.
    pub(crate) fn lower_scoped(
        &mut self,
        id: ExprId,
        name: Name,
    ) -> Result<Lowered<B::Value>, CodegenError> {
        self.scopes
            .push(self.current_block, name, FrameFlags::TRANSPARENT, None);
        let value = self.lower_body(id)?;
        self.scopes.pop();
        Ok(value)
    }

    /// Lower a body in the current frame. Blocks are flattened into it.
    pub(crate) fn lower_body(&mut self, id: ExprId) -> Result<Lowered<B::Value>, CodegenError> {
        match *self.program.arena.kind(id) {
            ExprKind::Block(stmts) => self.lower_block_body(stmts),
            _ => {
                let value = self.lower(id)?;
                Ok(self.frame_result(value))
            }
        }
    }

    /// Lower statements in the current frame.
    ///
    /// The frame's value is what `return` stored, else the last statement's.
    pub(crate) fn lower_block_body(
        &mut self,
        stmts: ExprRange,
    ) -> Result<Lowered<B::Value>, CodegenError> {
        let program = self.program;
        let mut last = None;
        for &stmt in program.arena.list(stmts) {
            last = self.lower(stmt)?;
        }
        Ok(self.frame_result(last))
    }

    fn frame_result(&self, last: Lowered<B::Value>) -> Lowered<B::Value> {
        self.scopes
            .current()
            .and_then(|frame| frame.return_value)
            .or(last)
    }

    /// Lower the program body in an opaque, non-function frame.
    pub(crate) fn lower_program(&mut self) -> Result<Lowered<B::Value>, CodegenError> {
        self.scopes
            .push(self.current_block, self.names.program, FrameFlags::empty(), None);
        let value = self.lower_block_body(self.program.body)?;
        self.scopes.pop();
        Ok(value)
    }

    // -----------------------------------------------------------------------
    // Variables
    // -----------------------------------------------------------------------

    /// Resolve a variable, recording captures for crossed function bodies.
    pub(crate) fn resolve(
        &mut self,
        name: Name,
        span: Span,
    ) -> Result<Slot<B::Value>, CodegenError> {
        self.scopes
            .resolve(name, &mut self.captures)
            .ok_or_else(|| CodegenError::UnresolvedName {
                name: self.interner.lookup(name).to_owned(),
                span,
            })
    }

    fn lower_ident(&mut self, name: Name, span: Span) -> Result<Lowered<B::Value>, CodegenError> {
        let slot = self.resolve(name, span)?;
        let value = self
            .builder
            .load(slot.kind, slot.ptr, self.interner.lookup(name));
        Ok(Some(TypedValue::new(value, slot.kind)))
    }

    /// `type name = init`. The initializer is lowered before the name is
    /// bound, so it sees any outer binding of the same name.
    fn lower_var_def(
        &mut self,
        ty: TypeAnnot,
        name: Name,
        init: Option<ExprId>,
        span: Span,
    ) -> Result<Lowered<B::Value>, CodegenError> {
        let init_value = match init {
            Some(init) => Some(self.lower(init)?),
            None => None,
        };

        let kind = match (ValueKind::from_annot(ty), &init_value) {
            (Some(kind), _) if kind.is_storable() => kind,
            (Some(kind), _) => {
                return Err(CodegenError::UnstorableVariable {
                    name: self.interner.lookup(name).to_owned(),
                    found: kind,
                    span,
                })
            }
            (None, Some(Some(value))) if value.kind.is_storable() => value.kind,
            (None, value) => {
                return Err(CodegenError::UnstorableVariable {
                    name: self.interner.lookup(name).to_owned(),
                    found: value.as_ref().map_or(ValueKind::Void, kind_of),
                    span,
                })
            }
        };

        let ptr = self.builder.alloca(kind, self.interner.lookup(name));
        self.scopes.declare(name, Slot { ptr, kind });

        match init_value {
            Some(Some(value)) => {
                let value = convert(self.builder, value, kind, span)?;
                self.builder.store(value.value, ptr);
                Ok(Some(value))
            }
            Some(None) => Err(CodegenError::TypeMismatch {
                expected: kind,
                found: ValueKind::Void,
                span,
            }),
            None => Ok(None),
        }
    }

    fn lower_assign(
        &mut self,
        target: Name,
        value: ExprId,
        span: Span,
    ) -> Result<Lowered<B::Value>, CodegenError> {
        let value = self.lower(value)?;
        let slot = self.resolve(target, span)?;
        let Some(value) = value else {
            return Err(CodegenError::TypeMismatch {
                expected: slot.kind,
                found: ValueKind::Void,
                span,
            });
        };
        let value = convert(self.builder, value, slot.kind, span)?;
        self.builder.store(value.value, slot.ptr);
        Ok(Some(value))
    }

    /// `return e` sets the enclosing frame's value. It does not branch.
    fn lower_return(&mut self, value: ExprId) -> Result<Lowered<B::Value>, CodegenError> {
        let value = self.lower(value)?;
        if let Some(value) = value {
            self.scopes.set_return_value(value);
        }
        Ok(value)
    }
}
