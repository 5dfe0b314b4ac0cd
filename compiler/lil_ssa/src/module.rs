//! Module data: functions, blocks and instructions.
//!
//! Every instruction lives in one module-wide table and is addressed by its
//! [`ValueId`]; instructions that produce no value (stores, terminators)
//! still get an id. Blocks list the ids they execute, in order.
//!
//! Erasing a function drops it and its blocks from the module. Its
//! instructions stay in the table but are no longer reachable.

use std::fmt;

use lil_codegen::{FloatPredicate, IntPredicate, Linkage, ValueKind};
use smallvec::SmallVec;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
        pub struct $name(u32);

        impl $name {
            #[inline]
            pub const fn from_raw(raw: u32) -> Self {
                $name(raw)
            }

            #[inline]
            pub const fn raw(self) -> u32 {
                self.0
            }

            #[inline]
            pub(crate) const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

id_type!(
    /// An instruction, and the value it defines.
    ValueId,
    "%"
);
id_type!(
    /// A basic block.
    BlockId,
    "bb"
);
id_type!(
    /// A function.
    FunctionId,
    "fn"
);

#[expect(
    clippy::cast_possible_truncation,
    reason = "module tables are bounded by source size"
)]
fn to_u32(n: usize) -> u32 {
    n as u32
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Const {
    Bool(bool),
    Int(i64),
    Float(f64),
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    SDiv,
    FAdd,
    FSub,
    FMul,
    FDiv,
}

impl BinOp {
    pub fn mnemonic(self) -> &'static str {
        match self {
            BinOp::Add => "add",
            BinOp::Sub => "sub",
            BinOp::Mul => "mul",
            BinOp::SDiv => "sdiv",
            BinOp::FAdd => "fadd",
            BinOp::FSub => "fsub",
            BinOp::FMul => "fmul",
            BinOp::FDiv => "fdiv",
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum CastOp {
    SiToFp,
    FpToSi,
    ZExt,
}

impl CastOp {
    pub fn mnemonic(self) -> &'static str {
        match self {
            CastOp::SiToFp => "sitofp",
            CastOp::FpToSi => "fptosi",
            CastOp::ZExt => "zext",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Inst {
    /// Incoming parameter `n` of the owning function.
    Param(u32),
    Const(Const),
    FuncRef(FunctionId),
    Alloca,
    Load {
        ptr: ValueId,
    },
    Store {
        value: ValueId,
        ptr: ValueId,
    },
    Binary {
        op: BinOp,
        lhs: ValueId,
        rhs: ValueId,
    },
    ICmp {
        pred: IntPredicate,
        lhs: ValueId,
        rhs: ValueId,
    },
    FCmp {
        pred: FloatPredicate,
        lhs: ValueId,
        rhs: ValueId,
    },
    Not(ValueId),
    Cast {
        op: CastOp,
        value: ValueId,
    },
    Call {
        func: FunctionId,
        args: SmallVec<[ValueId; 4]>,
    },
    Br(BlockId),
    CondBr {
        cond: ValueId,
        then_block: BlockId,
        else_block: BlockId,
    },
    Ret(Option<ValueId>),
}

impl Inst {
    pub fn is_terminator(&self) -> bool {
        matches!(self, Inst::Br(_) | Inst::CondBr { .. } | Inst::Ret(_))
    }
}

/// One instruction with its result kind and name hint.
#[derive(Clone, Debug, PartialEq)]
pub struct InstData {
    pub inst: Inst,
    /// Kind of the defined value; `Void` when nothing is defined. For an
    /// `alloca` this is the kind of the slot's contents.
    pub kind: ValueKind,
    pub name: String,
}

#[derive(Clone, Debug)]
pub struct Block {
    pub name: String,
    pub func: FunctionId,
    pub insts: Vec<ValueId>,
}

impl Block {
    /// Whether the block already ends in a terminator.
    pub fn is_terminated(&self, module: &Module) -> bool {
        self.insts
            .last()
            .is_some_and(|&id| module.inst(id).inst.is_terminator())
    }
}

#[derive(Clone, Debug)]
pub struct Function {
    pub name: String,
    pub params: SmallVec<[ValueKind; 4]>,
    /// `Param` instructions, one per parameter.
    pub param_values: SmallVec<[ValueId; 4]>,
    pub ret: ValueKind,
    pub linkage: Linkage,
    /// Entry block first. Empty for external declarations.
    pub blocks: Vec<BlockId>,
}

impl Function {
    pub fn is_declaration(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// A compiled module.
#[derive(Clone, Debug, Default)]
pub struct Module {
    functions: Vec<Option<Function>>,
    blocks: Vec<Option<Block>>,
    insts: Vec<InstData>,
}

impl Module {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn function(&self, id: FunctionId) -> Option<&Function> {
        self.functions.get(id.index()).and_then(Option::as_ref)
    }

    pub(crate) fn function_mut(&mut self, id: FunctionId) -> Option<&mut Function> {
        self.functions.get_mut(id.index()).and_then(Option::as_mut)
    }

    /// Live functions in declaration order.
    pub fn functions(&self) -> impl Iterator<Item = (FunctionId, &Function)> {
        self.functions
            .iter()
            .enumerate()
            .filter_map(|(i, f)| f.as_ref().map(|f| (FunctionId(to_u32(i)), f)))
    }

    /// Live function named `name`.
    pub fn function_by_name(&self, name: &str) -> Option<FunctionId> {
        self.functions()
            .find(|(_, f)| f.name == name)
            .map(|(id, _)| id)
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(id.index()).and_then(Option::as_ref)
    }

    pub(crate) fn block_mut(&mut self, id: BlockId) -> Option<&mut Block> {
        self.blocks.get_mut(id.index()).and_then(Option::as_mut)
    }

    /// # Panics
    /// Panics if `id` was not created by this module.
    #[inline]
    pub fn inst(&self, id: ValueId) -> &InstData {
        &self.insts[id.index()]
    }

    pub(crate) fn push_function(&mut self, function: Function) -> FunctionId {
        let id = FunctionId(to_u32(self.functions.len()));
        self.functions.push(Some(function));
        id
    }

    pub(crate) fn push_block(&mut self, block: Block) -> BlockId {
        let id = BlockId(to_u32(self.blocks.len()));
        self.blocks.push(Some(block));
        id
    }

    pub(crate) fn push_inst(&mut self, data: InstData) -> ValueId {
        let id = ValueId(to_u32(self.insts.len()));
        self.insts.push(data);
        id
    }

    /// Remove a function and its blocks. Returns `false` if it was already
    /// gone.
    pub fn erase_function(&mut self, id: FunctionId) -> bool {
        let Some(function) = self.functions.get_mut(id.index()).and_then(Option::take) else {
            return false;
        };
        for block in function.blocks {
            if let Some(slot) = self.blocks.get_mut(block.index()) {
                *slot = None;
            }
        }
        true
    }
}
