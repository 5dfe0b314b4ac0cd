//! [`BuilderMethods`] over a [`Module`].

use lil_codegen::{
    BackendTypes, BuilderMethods, FloatPredicate, IntPredicate, Linkage, ValueKind,
};
use smallvec::SmallVec;
use tracing::{trace, warn};

use crate::module::{
    BinOp, Block, BlockId, CastOp, Const, Function, FunctionId, Inst, InstData, Module, ValueId,
};

/// Appends instructions to a [`Module`] at a movable insertion point.
#[derive(Default)]
pub struct ModuleBuilder {
    module: Module,
    position: Option<BlockId>,
}

impl ModuleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn module(&self) -> &Module {
        &self.module
    }

    pub fn into_module(self) -> Module {
        self.module
    }

    fn define(&mut self, inst: Inst, kind: ValueKind, name: &str) -> ValueId {
        let id = self.module.push_inst(InstData {
            inst,
            kind,
            name: name.to_owned(),
        });
        match self.position.and_then(|bb| self.module.block_mut(bb)) {
            Some(block) => block.insts.push(id),
            None => warn!(?id, "instruction emitted without an insertion point"),
        }
        id
    }

    fn emit(&mut self, inst: Inst) {
        self.define(inst, ValueKind::Void, "");
    }

    fn kind_of(&self, value: ValueId) -> ValueKind {
        self.module.inst(value).kind
    }

    fn binary(&mut self, op: BinOp, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        let kind = match op {
            BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::SDiv => ValueKind::Int,
            BinOp::FAdd | BinOp::FSub | BinOp::FMul | BinOp::FDiv => ValueKind::Float,
        };
        self.define(Inst::Binary { op, lhs, rhs }, kind, name)
    }

    fn cast(&mut self, op: CastOp, value: ValueId, kind: ValueKind, name: &str) -> ValueId {
        self.define(Inst::Cast { op, value }, kind, name)
    }
}

impl BackendTypes for ModuleBuilder {
    type Value = ValueId;
    type Function = FunctionId;
    type BasicBlock = BlockId;
}

impl BuilderMethods for ModuleBuilder {
    fn declare_function(
        &mut self,
        name: &str,
        params: &[ValueKind],
        ret: ValueKind,
        linkage: Linkage,
    ) -> FunctionId {
        let param_values: SmallVec<[ValueId; 4]> = params
            .iter()
            .enumerate()
            .map(|(index, &kind)| {
                self.module.push_inst(InstData {
                    inst: Inst::Param(u32::try_from(index).unwrap_or(u32::MAX)),
                    kind,
                    name: String::new(),
                })
            })
            .collect();
        let id = self.module.push_function(Function {
            name: name.to_owned(),
            params: params.iter().copied().collect(),
            param_values,
            ret,
            linkage,
            blocks: Vec::new(),
        });
        trace!(?id, name, "declare function");
        id
    }

    fn erase_function(&mut self, func: FunctionId) {
        if let Some(bb) = self.position {
            if self.module.block(bb).is_some_and(|b| b.func == func) {
                self.position = None;
            }
        }
        if self.module.erase_function(func) {
            trace!(?func, "erase function");
        }
    }

    fn param(&self, func: FunctionId, index: usize) -> ValueId {
        match self
            .module
            .function(func)
            .and_then(|f| f.param_values.get(index))
        {
            Some(&value) => value,
            None => {
                warn!(?func, index, "parameter out of range");
                ValueId::from_raw(u32::MAX)
            }
        }
    }

    fn function_ref(&mut self, func: FunctionId) -> ValueId {
        self.define(Inst::FuncRef(func), ValueKind::Function, "")
    }

    fn append_block(&mut self, func: FunctionId, name: &str) -> BlockId {
        let id = self.module.push_block(Block {
            name: name.to_owned(),
            func,
            insts: Vec::new(),
        });
        match self.module.function_mut(func) {
            Some(function) => function.blocks.push(id),
            None => warn!(?func, "block appended to an erased function"),
        }
        id
    }

    fn position_at_end(&mut self, block: BlockId) {
        self.position = Some(block);
    }

    fn current_block(&self) -> Option<BlockId> {
        self.position
    }

    fn const_bool(&mut self, value: bool) -> ValueId {
        self.define(Inst::Const(Const::Bool(value)), ValueKind::Bool, "")
    }

    fn const_int(&mut self, value: i64) -> ValueId {
        self.define(Inst::Const(Const::Int(value)), ValueKind::Int, "")
    }

    fn const_float(&mut self, value: f64) -> ValueId {
        self.define(Inst::Const(Const::Float(value)), ValueKind::Float, "")
    }

    fn alloca(&mut self, kind: ValueKind, name: &str) -> ValueId {
        self.define(Inst::Alloca, kind, name)
    }

    fn load(&mut self, kind: ValueKind, ptr: ValueId, name: &str) -> ValueId {
        self.define(Inst::Load { ptr }, kind, name)
    }

    fn store(&mut self, value: ValueId, ptr: ValueId) {
        self.emit(Inst::Store { value, ptr });
    }

    fn add(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        self.binary(BinOp::Add, lhs, rhs, name)
    }

    fn sub(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        self.binary(BinOp::Sub, lhs, rhs, name)
    }

    fn mul(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        self.binary(BinOp::Mul, lhs, rhs, name)
    }

    fn sdiv(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        self.binary(BinOp::SDiv, lhs, rhs, name)
    }

    fn fadd(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        self.binary(BinOp::FAdd, lhs, rhs, name)
    }

    fn fsub(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        self.binary(BinOp::FSub, lhs, rhs, name)
    }

    fn fmul(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        self.binary(BinOp::FMul, lhs, rhs, name)
    }

    fn fdiv(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        self.binary(BinOp::FDiv, lhs, rhs, name)
    }

    fn not(&mut self, value: ValueId, name: &str) -> ValueId {
        self.define(Inst::Not(value), ValueKind::Bool, name)
    }

    fn icmp(&mut self, pred: IntPredicate, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        self.define(Inst::ICmp { pred, lhs, rhs }, ValueKind::Bool, name)
    }

    fn fcmp(&mut self, pred: FloatPredicate, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        self.define(Inst::FCmp { pred, lhs, rhs }, ValueKind::Bool, name)
    }

    fn si_to_fp(&mut self, value: ValueId, name: &str) -> ValueId {
        self.cast(CastOp::SiToFp, value, ValueKind::Float, name)
    }

    fn fp_to_si(&mut self, value: ValueId, name: &str) -> ValueId {
        self.cast(CastOp::FpToSi, value, ValueKind::Int, name)
    }

    fn zext_bool(&mut self, value: ValueId, name: &str) -> ValueId {
        debug_assert_eq!(self.kind_of(value), ValueKind::Bool);
        self.cast(CastOp::ZExt, value, ValueKind::Int, name)
    }

    fn br(&mut self, dest: BlockId) {
        self.emit(Inst::Br(dest));
    }

    fn cond_br(&mut self, cond: ValueId, then_block: BlockId, else_block: BlockId) {
        self.emit(Inst::CondBr {
            cond,
            then_block,
            else_block,
        });
    }

    fn ret(&mut self, value: ValueId) {
        self.emit(Inst::Ret(Some(value)));
    }

    fn ret_void(&mut self) {
        self.emit(Inst::Ret(None));
    }

    fn call(&mut self, func: FunctionId, args: &[ValueId], name: &str) -> Option<ValueId> {
        let ret = self
            .module
            .function(func)
            .map_or(ValueKind::Void, |f| f.ret);
        let call = Inst::Call {
            func,
            args: args.iter().copied().collect(),
        };
        if ret == ValueKind::Void {
            self.emit(call);
            None
        } else {
            Some(self.define(call, ret, name))
        }
    }
}

#[cfg(test)]
mod tests;
