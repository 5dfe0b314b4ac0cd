//! Primitive value kinds.
//!
//! The language has no separate type-checking pass: every lowered value
//! carries its [`ValueKind`] next to the backend handle, and instruction
//! selection matches on that tag.

use std::fmt;

use lil_ir::TypeAnnot;

/// Primitive representation of a compiled value.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ValueKind {
    Bool,
    Int,
    Float,
    Function,
    /// No value (or not yet inferred).
    Void,
}

impl ValueKind {
    /// Kind for a declared type; `var` has none until an initializer is seen.
    pub fn from_annot(ty: TypeAnnot) -> Option<ValueKind> {
        match ty {
            TypeAnnot::Int => Some(ValueKind::Int),
            TypeAnnot::Double => Some(ValueKind::Float),
            TypeAnnot::Bool => Some(ValueKind::Bool),
            TypeAnnot::Void => Some(ValueKind::Void),
            TypeAnnot::Infer => None,
        }
    }

    /// Kinds that fit in a stack slot.
    #[inline]
    pub fn is_storable(self) -> bool {
        matches!(self, ValueKind::Bool | ValueKind::Int | ValueKind::Float)
    }

    #[inline]
    pub fn is_numeric(self) -> bool {
        matches!(self, ValueKind::Int | ValueKind::Float)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Float => "double",
            ValueKind::Function => "function",
            ValueKind::Void => "void",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A backend value tagged with its kind.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TypedValue<V> {
    pub value: V,
    pub kind: ValueKind,
}

impl<V> TypedValue<V> {
    #[inline]
    pub fn new(value: V, kind: ValueKind) -> Self {
        TypedValue { value, kind }
    }
}

/// Result of lowering one node: `None` when the node produces no value.
pub type Lowered<V> = Option<TypedValue<V>>;

/// Kind of a lowered result, `Void` for `None`.
#[inline]
pub fn kind_of<V>(lowered: &Lowered<V>) -> ValueKind {
    lowered.as_ref().map_or(ValueKind::Void, |v| v.kind)
}
