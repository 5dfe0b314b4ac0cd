//! Flat syntax tree.
//!
//! Nodes live in an [`ExprArena`] and refer to each other by [`ExprId`].
//! Child lists (block statements, call arguments) are stored contiguously
//! in a side table and addressed by [`ExprRange`]; parameter lists the
//! same way via [`ParamRange`].

use std::fmt;

use crate::{Name, Span};

/// Index of an expression in its [`ExprArena`].
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct ExprId(u32);

impl ExprId {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        ExprId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExprId({})", self.0)
    }
}

/// Contiguous run of expression ids in the arena's list table.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct ExprRange {
    start: u32,
    len: u32,
}

impl ExprRange {
    pub const EMPTY: ExprRange = ExprRange { start: 0, len: 0 };

    #[inline]
    pub fn len(self) -> usize {
        self.len as usize
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.len == 0
    }
}

/// Contiguous run of parameters in the arena's parameter table.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct ParamRange {
    start: u32,
    len: u32,
}

impl ParamRange {
    #[inline]
    pub fn len(self) -> usize {
        self.len as usize
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.len == 0
    }
}

/// Declared type of a variable, parameter or function result.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeAnnot {
    Int,
    Double,
    Bool,
    Void,
    /// `var`: take the type of the initializer.
    Infer,
}

impl TypeAnnot {
    pub fn as_str(self) -> &'static str {
        match self {
            TypeAnnot::Int => "int",
            TypeAnnot::Double => "double",
            TypeAnnot::Bool => "bool",
            TypeAnnot::Void => "void",
            TypeAnnot::Infer => "var",
        }
    }
}

/// Binary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

impl BinaryOp {
    pub fn as_symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Pow => "^",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
        }
    }

    /// True for operators producing a boolean.
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Eq
                | BinaryOp::NotEq
                | BinaryOp::Lt
                | BinaryOp::LtEq
                | BinaryOp::Gt
                | BinaryOp::GtEq
        )
    }
}

/// A declared parameter: `int x`.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Param {
    pub ty: TypeAnnot,
    pub name: Name,
    pub span: Span,
}

/// Expression node kinds.
///
/// Statements are expressions too: every node lowers to an optional value.
#[derive(Clone, PartialEq, Debug)]
pub enum ExprKind {
    Bool(bool),
    Int(i64),
    Double(f64),
    Ident(Name),
    Call {
        func: Name,
        args: ExprRange,
    },
    Binary {
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
    },
    /// `!operand`
    Not(ExprId),
    Assign {
        target: Name,
        value: ExprId,
    },
    Block(ExprRange),
    /// An expression in statement position.
    ExprStmt(ExprId),
    Return(ExprId),
    /// `if cond then { .. } else { .. }`; both branches are required.
    If {
        cond: ExprId,
        then_branch: ExprId,
        else_branch: ExprId,
    },
    While {
        cond: ExprId,
        body: ExprId,
    },
    VarDef {
        ty: TypeAnnot,
        name: Name,
        init: Option<ExprId>,
    },
    Extern {
        ret: TypeAnnot,
        name: Name,
        params: ParamRange,
    },
    Function {
        ret: TypeAnnot,
        name: Name,
        params: ParamRange,
        body: ExprId,
        /// Declared inside another function's body.
        local: bool,
    },
}

#[derive(Clone, PartialEq, Debug)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

/// Owns every node of one parsed program.
#[derive(Default, Debug)]
pub struct ExprArena {
    exprs: Vec<Expr>,
    lists: Vec<ExprId>,
    params: Vec<Param>,
}

impl ExprArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an expression, returning its id.
    pub fn alloc(&mut self, kind: ExprKind, span: Span) -> ExprId {
        let id = ExprId(to_u32(self.exprs.len()));
        self.exprs.push(Expr { kind, span });
        id
    }

    /// Store a list of child ids contiguously.
    pub fn alloc_list(&mut self, ids: impl IntoIterator<Item = ExprId>) -> ExprRange {
        let start = to_u32(self.lists.len());
        self.lists.extend(ids);
        ExprRange {
            start,
            len: to_u32(self.lists.len()) - start,
        }
    }

    pub fn alloc_params(&mut self, params: impl IntoIterator<Item = Param>) -> ParamRange {
        let start = to_u32(self.params.len());
        self.params.extend(params);
        ParamRange {
            start,
            len: to_u32(self.params.len()) - start,
        }
    }

    /// # Panics
    /// Panics if `id` was not allocated by this arena.
    #[inline]
    pub fn get(&self, id: ExprId) -> &Expr {
        &self.exprs[id.0 as usize]
    }

    #[inline]
    pub fn kind(&self, id: ExprId) -> &ExprKind {
        &self.get(id).kind
    }

    #[inline]
    pub fn span(&self, id: ExprId) -> Span {
        self.get(id).span
    }

    pub fn list(&self, range: ExprRange) -> &[ExprId] {
        let start = range.start as usize;
        &self.lists[start..start + range.len as usize]
    }

    pub fn params(&self, range: ParamRange) -> &[Param] {
        let start = range.start as usize;
        &self.params[start..start + range.len as usize]
    }

    pub fn len(&self) -> usize {
        self.exprs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exprs.is_empty()
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "arena sizes are bounded by source size"
)]
fn to_u32(n: usize) -> u32 {
    n as u32
}

/// A parsed compilation unit: the arena plus its top-level statements.
#[derive(Debug)]
pub struct Program {
    pub arena: ExprArena,
    pub body: ExprRange,
    pub span: Span,
}

#[cfg(test)]
mod tests;
