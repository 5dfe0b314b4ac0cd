//! Function and extern declarations.
//!
//! A function is compiled in up to two passes:
//!
//! 1. **Draft**: the body is lowered with its declared parameters only.
//!    Any outer variable the body reaches across its own boundary is
//!    recorded in the capture table under the function's key.
//! 2. **Specializing**: if the draft recorded captures, it is erased and
//!    the body is lowered again with one trailing parameter per capture,
//!    in discovery order. Those parameters shadow the outer names, so the
//!    second pass reads its own arguments instead of outer slots.
//!
//! The finished function goes into the function cache. Reaching the same
//! declaration again (a second `if` pass, for instance) reuses it.

use lil_ir::{ExprId, Name, ParamRange, Span, TypeAnnot};
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::coerce::convert;
use crate::expr_lowerer::ExprLowerer;
use crate::function_cache::{FunctionEntry, FunctionState};
use crate::scope::{FrameFlags, Slot};
use crate::traits::{BuilderMethods, Linkage};
use crate::{Capture, CodegenError, FunctionKey, FunctionPath, Lowered, TypedValue, ValueKind};

/// Declared signature, resolved to value kinds.
pub(crate) struct Signature {
    pub(crate) params: SmallVec<[ValueKind; 4]>,
    pub(crate) ret: ValueKind,
}

impl<B: BuilderMethods> ExprLowerer<'_, B> {
    pub(crate) fn lower_function(
        &mut self,
        ret: TypeAnnot,
        name: Name,
        params: ParamRange,
        body: ExprId,
        local: bool,
        span: Span,
    ) -> Result<Lowered<B::Value>, CodegenError> {
        let key = FunctionKey::new(self.scopes.function_path(), name);

        if let Some(entry) = self.cache.get(&key).cloned() {
            trace!(function = %key.display(self.interner), "function cache hit");
            return Ok(Some(self.bind_function(entry)));
        }

        let sig = self.signature(ret, name, params, span)?;
        debug!(
            function = %key.display(self.interner),
            params = sig.params.len(),
            local,
            "compiling function"
        );

        let draft = self.build_function(&key, &sig, &[], params, body, local, span)?;
        let captures: SmallVec<[Capture; 4]> = if local {
            self.captures.get(&key).iter().copied().collect()
        } else {
            SmallVec::new()
        };

        let mut entry = if captures.is_empty() {
            draft
        } else {
            debug!(
                function = %key.display(self.interner),
                captures = captures.len(),
                "specializing with captured variables"
            );
            self.builder.erase_function(draft.func);
            self.build_function(&key, &sig, &captures, params, body, local, span)?
        };

        entry.state = FunctionState::Final;
        self.cache.insert(entry.clone());
        Ok(Some(self.bind_function(entry)))
    }

    /// Lower one pass of a function body. Draft when `captures` is empty,
    /// otherwise the specialized version with trailing capture parameters.
    #[allow(clippy::too_many_arguments)]
    fn build_function(
        &mut self,
        key: &FunctionKey,
        sig: &Signature,
        captures: &[Capture],
        param_names: ParamRange,
        body: ExprId,
        local: bool,
        span: Span,
    ) -> Result<FunctionEntry<B::Function>, CodegenError> {
        let mut params = sig.params.clone();
        params.extend(captures.iter().map(|c| c.kind));

        let symbol = key.mangle(self.interner);
        let func = self
            .builder
            .declare_function(&symbol, &params, sig.ret, Linkage::Internal);
        let entry = FunctionEntry {
            func,
            key: key.clone(),
            params,
            explicit: sig.params.len(),
            ret: sig.ret,
            local,
            state: if captures.is_empty() {
                FunctionState::Draft
            } else {
                FunctionState::Specializing
            },
        };
        // Bound before the body so the body can call itself.
        self.bind_entry(entry.clone());

        let saved_function = self.current_function;
        let saved_block = self.current_block;
        let entry_bb = self.builder.append_block(func, "entry");
        self.current_function = func;
        self.position_at_end(entry_bb);

        let mut flags = FrameFlags::FUNCTION_BOUNDARY;
        if local {
            flags |= FrameFlags::TRANSPARENT;
        }
        self.scopes.push(entry_bb, key.name, flags, Some(key.clone()));

        let program = self.program;
        let names = program
            .arena
            .params(param_names)
            .iter()
            .map(|p| p.name)
            .chain(captures.iter().map(|c| c.name));
        for (index, (name, &kind)) in names.zip(entry.params.iter()).enumerate() {
            let ptr = self.builder.alloca(kind, self.interner.lookup(name));
            let incoming = self.builder.param(func, index);
            self.builder.store(incoming, ptr);
            self.scopes.declare(name, Slot { ptr, kind });
        }

        let value = self.lower_body(body)?;
        self.scopes.pop();

        match (sig.ret, value) {
            (ValueKind::Void, _) => self.builder.ret_void(),
            (ret, Some(value)) => {
                let value = convert(self.builder, value, ret, span)?;
                self.builder.ret(value.value);
            }
            (ret, None) => {
                return Err(CodegenError::MissingReturn {
                    name: key.mangle(self.interner),
                    expected: ret,
                    span,
                })
            }
        }

        self.current_function = saved_function;
        self.position_at_end(saved_block);
        Ok(entry)
    }

    /// `extern ret name(params)`. Declaring the same name twice is a no-op.
    pub(crate) fn lower_extern(
        &mut self,
        ret: TypeAnnot,
        name: Name,
        params: ParamRange,
        span: Span,
    ) -> Result<Lowered<B::Value>, CodegenError> {
        let sig = self.signature(ret, name, params, span)?;
        let entry = self.declare_extern(name, sig);
        Ok(Some(self.function_value(entry.func)))
    }

    /// Declare an external function unless `name` is already bound at
    /// top level.
    pub(crate) fn declare_extern(
        &mut self,
        name: Name,
        sig: Signature,
    ) -> FunctionEntry<B::Function> {
        if let Some(existing) = self.functions.get(&name) {
            return existing.clone();
        }
        let func = self.builder.declare_function(
            self.interner.lookup(name),
            &sig.params,
            sig.ret,
            Linkage::External,
        );
        trace!(name = self.interner.lookup(name), "declared extern");
        let entry = FunctionEntry {
            func,
            key: FunctionKey::new(FunctionPath::new(), name),
            explicit: sig.params.len(),
            params: sig.params,
            ret: sig.ret,
            local: false,
            state: FunctionState::Final,
        };
        self.functions.insert(name, entry.clone());
        entry
    }

    fn signature(
        &self,
        ret: TypeAnnot,
        name: Name,
        params: ParamRange,
        span: Span,
    ) -> Result<Signature, CodegenError> {
        let ret = ValueKind::from_annot(ret).ok_or_else(|| CodegenError::MissingTypeAnnotation {
            name: self.interner.lookup(name).to_owned(),
            span,
        })?;
        let params = self
            .program
            .arena
            .params(params)
            .iter()
            .map(|param| match ValueKind::from_annot(param.ty) {
                Some(kind) if kind.is_storable() => Ok(kind),
                Some(kind) => Err(CodegenError::UnstorableVariable {
                    name: self.interner.lookup(param.name).to_owned(),
                    found: kind,
                    span: param.span,
                }),
                None => Err(CodegenError::MissingTypeAnnotation {
                    name: self.interner.lookup(param.name).to_owned(),
                    span: param.span,
                }),
            })
            .collect::<Result<SmallVec<[ValueKind; 4]>, _>>()?;
        Ok(Signature { params, ret })
    }

    /// Make `entry` callable by name from the current scope and return the
    /// function's value.
    fn bind_function(&mut self, entry: FunctionEntry<B::Function>) -> TypedValue<B::Value> {
        let func = entry.func;
        self.bind_entry(entry);
        self.function_value(func)
    }

    fn bind_entry(&mut self, entry: FunctionEntry<B::Function>) {
        let name = entry.key.name;
        if entry.local {
            self.scopes.bind_function(name, entry);
        } else {
            self.functions.insert(name, entry);
        }
    }

    fn function_value(&mut self, func: B::Function) -> TypedValue<B::Value> {
        TypedValue::new(self.builder.function_ref(func), ValueKind::Function)
    }
}
