//! Backend traits for IR emission.
//!
//! The lowering code never sees a concrete IR. It talks to the backend
//! through these traits, in the shape of `rustc_codegen_ssa`'s traits:
//!
//! - `BackendTypes`: opaque handle types (value, function, block)
//! - `BuilderMethods`: function/block management and instruction emission
//!
//! Every handle is `Copy`; the backend owns the storage behind it.

use std::fmt::Debug;

use crate::ValueKind;

/// Associated handle types of a backend.
pub trait BackendTypes {
    type Value: Copy + Debug;
    type Function: Copy + Debug + PartialEq;
    type BasicBlock: Copy + Debug + PartialEq;
}

/// Symbol visibility of a declared function.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Linkage {
    /// Visible only inside the module.
    Internal,
    /// Exported (entry point) or provided by the host (externs).
    External,
}

/// Signed integer comparison predicates.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum IntPredicate {
    Eq,
    Ne,
    Slt,
    Sle,
    Sgt,
    Sge,
}

/// Floating-point comparison predicates.
///
/// The `O*` forms are ordered and false when either side is NaN. `Une` is
/// unordered: true when either side is NaN.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum FloatPredicate {
    Oeq,
    One,
    Une,
    Olt,
    Ole,
    Ogt,
    Oge,
}

/// Instruction builder.
///
/// Emission methods append to the block selected by the last
/// [`position_at_end`](BuilderMethods::position_at_end).
pub trait BuilderMethods: BackendTypes {
    // -- Functions --

    /// Declare a function. Functions without blocks are external declarations.
    fn declare_function(
        &mut self,
        name: &str,
        params: &[ValueKind],
        ret: ValueKind,
        linkage: Linkage,
    ) -> Self::Function;

    /// Remove a function and all of its blocks from the module.
    fn erase_function(&mut self, func: Self::Function);

    /// The `index`-th incoming parameter of `func`.
    fn param(&self, func: Self::Function, index: usize) -> Self::Value;

    /// A value referring to `func` itself.
    fn function_ref(&mut self, func: Self::Function) -> Self::Value;

    // -- Blocks --

    fn append_block(&mut self, func: Self::Function, name: &str) -> Self::BasicBlock;

    fn position_at_end(&mut self, block: Self::BasicBlock);

    fn current_block(&self) -> Option<Self::BasicBlock>;

    // -- Constants --

    fn const_bool(&mut self, value: bool) -> Self::Value;

    fn const_int(&mut self, value: i64) -> Self::Value;

    fn const_float(&mut self, value: f64) -> Self::Value;

    // -- Memory --

    /// Allocate a stack slot holding a value of `kind`; returns its address.
    fn alloca(&mut self, kind: ValueKind, name: &str) -> Self::Value;

    fn load(&mut self, kind: ValueKind, ptr: Self::Value, name: &str) -> Self::Value;

    fn store(&mut self, value: Self::Value, ptr: Self::Value);

    // -- Integer arithmetic --

    fn add(&mut self, lhs: Self::Value, rhs: Self::Value, name: &str) -> Self::Value;
    fn sub(&mut self, lhs: Self::Value, rhs: Self::Value, name: &str) -> Self::Value;
    fn mul(&mut self, lhs: Self::Value, rhs: Self::Value, name: &str) -> Self::Value;
    fn sdiv(&mut self, lhs: Self::Value, rhs: Self::Value, name: &str) -> Self::Value;

    // -- Float arithmetic --

    fn fadd(&mut self, lhs: Self::Value, rhs: Self::Value, name: &str) -> Self::Value;
    fn fsub(&mut self, lhs: Self::Value, rhs: Self::Value, name: &str) -> Self::Value;
    fn fmul(&mut self, lhs: Self::Value, rhs: Self::Value, name: &str) -> Self::Value;
    fn fdiv(&mut self, lhs: Self::Value, rhs: Self::Value, name: &str) -> Self::Value;

    /// Boolean negation.
    fn not(&mut self, value: Self::Value, name: &str) -> Self::Value;

    // -- Comparisons --

    fn icmp(
        &mut self,
        pred: IntPredicate,
        lhs: Self::Value,
        rhs: Self::Value,
        name: &str,
    ) -> Self::Value;

    fn fcmp(
        &mut self,
        pred: FloatPredicate,
        lhs: Self::Value,
        rhs: Self::Value,
        name: &str,
    ) -> Self::Value;

    // -- Conversions --

    /// Signed integer to float.
    fn si_to_fp(&mut self, value: Self::Value, name: &str) -> Self::Value;

    /// Float to signed integer, truncating toward zero.
    fn fp_to_si(&mut self, value: Self::Value, name: &str) -> Self::Value;

    /// Zero-extend a boolean to an integer.
    fn zext_bool(&mut self, value: Self::Value, name: &str) -> Self::Value;

    // -- Terminators --

    fn br(&mut self, dest: Self::BasicBlock);

    fn cond_br(
        &mut self,
        cond: Self::Value,
        then_block: Self::BasicBlock,
        else_block: Self::BasicBlock,
    );

    fn ret(&mut self, value: Self::Value);

    fn ret_void(&mut self);

    // -- Calls --

    /// Call `func`; `None` when it returns void.
    fn call(
        &mut self,
        func: Self::Function,
        args: &[Self::Value],
        name: &str,
    ) -> Option<Self::Value>;
}
