//! Binary and unary operator lowering.
//!
//! Instruction selection dispatches on the operand kinds: if either side is
//! a double both sides are promoted and float instructions are used,
//! otherwise integer ones. Booleans entering arithmetic are zero-extended
//! first. `^` is always a call to the runtime `pow`.

use lil_ir::{BinaryOp, ExprId, Span};

use crate::coerce::{convert, widen_bool};
use crate::expr_lowerer::ExprLowerer;
use crate::runtime_decl::POW;
use crate::traits::{BuilderMethods, FloatPredicate, IntPredicate};
use crate::{CodegenError, Lowered, TypedValue, ValueKind};

fn int_predicate(op: BinaryOp) -> Option<IntPredicate> {
    Some(match op {
        BinaryOp::Eq => IntPredicate::Eq,
        BinaryOp::NotEq => IntPredicate::Ne,
        BinaryOp::Lt => IntPredicate::Slt,
        BinaryOp::LtEq => IntPredicate::Sle,
        BinaryOp::Gt => IntPredicate::Sgt,
        BinaryOp::GtEq => IntPredicate::Sge,
        _ => return None,
    })
}

fn float_predicate(op: BinaryOp) -> Option<FloatPredicate> {
    Some(match op {
        BinaryOp::Eq => FloatPredicate::Oeq,
        BinaryOp::NotEq => FloatPredicate::Une,
        BinaryOp::Lt => FloatPredicate::Olt,
        BinaryOp::LtEq => FloatPredicate::Ole,
        BinaryOp::Gt => FloatPredicate::Ogt,
        BinaryOp::GtEq => FloatPredicate::Oge,
        _ => return None,
    })
}

impl<B: BuilderMethods> ExprLowerer<'_, B> {
    pub(crate) fn lower_binary(
        &mut self,
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
        span: Span,
    ) -> Result<Lowered<B::Value>, CodegenError> {
        let lhs = self.lower_operand(left, op.as_symbol())?;
        let rhs = self.lower_operand(right, op.as_symbol())?;

        if op == BinaryOp::Pow {
            return self.lower_pow(lhs, rhs, span).map(Some);
        }

        let lhs = widen_bool(self.builder, lhs);
        let rhs = widen_bool(self.builder, rhs);
        if lhs.kind == ValueKind::Float || rhs.kind == ValueKind::Float {
            let lhs = convert(self.builder, lhs, ValueKind::Float, span)?.value;
            let rhs = convert(self.builder, rhs, ValueKind::Float, span)?.value;
            self.float_binary(op, lhs, rhs, span).map(Some)
        } else {
            self.int_binary(op, lhs.value, rhs.value, span).map(Some)
        }
    }

    fn int_binary(
        &mut self,
        op: BinaryOp,
        lhs: B::Value,
        rhs: B::Value,
        span: Span,
    ) -> Result<TypedValue<B::Value>, CodegenError> {
        let b = &mut *self.builder;
        let value = match op {
            BinaryOp::Add => b.add(lhs, rhs, "add"),
            BinaryOp::Sub => b.sub(lhs, rhs, "sub"),
            BinaryOp::Mul => b.mul(lhs, rhs, "mul"),
            BinaryOp::Div => b.sdiv(lhs, rhs, "div"),
            _ => {
                let Some(pred) = int_predicate(op) else {
                    return Err(CodegenError::InvalidOperand {
                        op: op.as_symbol(),
                        kind: ValueKind::Int,
                        span,
                    });
                };
                let cmp = b.icmp(pred, lhs, rhs, "cmp");
                return Ok(TypedValue::new(cmp, ValueKind::Bool));
            }
        };
        Ok(TypedValue::new(value, ValueKind::Int))
    }

    fn float_binary(
        &mut self,
        op: BinaryOp,
        lhs: B::Value,
        rhs: B::Value,
        span: Span,
    ) -> Result<TypedValue<B::Value>, CodegenError> {
        let b = &mut *self.builder;
        let value = match op {
            BinaryOp::Add => b.fadd(lhs, rhs, "fadd"),
            BinaryOp::Sub => b.fsub(lhs, rhs, "fsub"),
            BinaryOp::Mul => b.fmul(lhs, rhs, "fmul"),
            BinaryOp::Div => b.fdiv(lhs, rhs, "fdiv"),
            _ => {
                let Some(pred) = float_predicate(op) else {
                    return Err(CodegenError::InvalidOperand {
                        op: op.as_symbol(),
                        kind: ValueKind::Float,
                        span,
                    });
                };
                let cmp = b.fcmp(pred, lhs, rhs, "fcmp");
                return Ok(TypedValue::new(cmp, ValueKind::Bool));
            }
        };
        Ok(TypedValue::new(value, ValueKind::Float))
    }

    /// `a ^ b` as `pow(double a, double b)`.
    fn lower_pow(
        &mut self,
        lhs: TypedValue<B::Value>,
        rhs: TypedValue<B::Value>,
        span: Span,
    ) -> Result<TypedValue<B::Value>, CodegenError> {
        let lhs = convert(self.builder, lhs, ValueKind::Float, span)?;
        let rhs = convert(self.builder, rhs, ValueKind::Float, span)?;
        let pow = self.declare_runtime(&POW);
        match self.builder.call(pow.func, &[lhs.value, rhs.value], "pow") {
            Some(value) => Ok(TypedValue::new(value, ValueKind::Float)),
            None => Err(CodegenError::TypeMismatch {
                expected: ValueKind::Float,
                found: ValueKind::Void,
                span,
            }),
        }
    }

    /// `!e`: the operand is tested against zero, then inverted.
    pub(crate) fn lower_not(
        &mut self,
        operand: ExprId,
        span: Span,
    ) -> Result<Lowered<B::Value>, CodegenError> {
        let value = self.lower_operand(operand, "!")?;
        let value = convert(self.builder, value, ValueKind::Bool, span)?;
        let inverted = self.builder.not(value.value, "not");
        Ok(Some(TypedValue::new(inverted, ValueKind::Bool)))
    }
}
