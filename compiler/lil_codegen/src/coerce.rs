//! Primitive coercions between value kinds.
//!
//! The supported set is closed:
//!
//! | from  | to     | emitted as          |
//! |-------|--------|---------------------|
//! | int   | double | `sitofp`            |
//! | double| int    | `fptosi` (truncate) |
//! | int   | bool   | `icmp ne v, 0`      |
//! | double| bool   | `fcmp une v, 0.0`   |
//!
//! [`cast_to_if_needed`] is the raw engine and reports any other pair as
//! [`CodegenError::InvalidCoercion`]. [`convert`] is what user-facing sites
//! (initializers, arguments, conditions, returns) call: it first widens a
//! boolean used as a number to a 1-bit integer, and reports impossible
//! conversions as [`CodegenError::TypeMismatch`].

use lil_ir::Span;
use tracing::error;

use crate::traits::{BuilderMethods, FloatPredicate, IntPredicate};
use crate::{CodegenError, TypedValue, ValueKind};

/// Whether [`cast_to_if_needed`] handles `from -> to`.
pub fn can_cast(from: ValueKind, to: ValueKind) -> bool {
    from == to
        || matches!(
            (from, to),
            (ValueKind::Int, ValueKind::Float | ValueKind::Bool)
                | (ValueKind::Float, ValueKind::Int | ValueKind::Bool)
        )
}

/// Coerce `value` to `target`; a no-op when the kinds already match.
pub fn cast_to_if_needed<B: BuilderMethods>(
    builder: &mut B,
    value: TypedValue<B::Value>,
    target: ValueKind,
    span: Span,
) -> Result<TypedValue<B::Value>, CodegenError> {
    let converted = match (value.kind, target) {
        (from, to) if from == to => return Ok(value),
        (ValueKind::Int, ValueKind::Float) => builder.si_to_fp(value.value, "conv"),
        (ValueKind::Float, ValueKind::Int) => builder.fp_to_si(value.value, "conv"),
        (ValueKind::Int, ValueKind::Bool) => {
            let zero = builder.const_int(0);
            builder.icmp(IntPredicate::Ne, value.value, zero, "tobool")
        }
        (ValueKind::Float, ValueKind::Bool) => {
            let zero = builder.const_float(0.0);
            builder.fcmp(FloatPredicate::Une, value.value, zero, "tobool")
        }
        (from, to) => {
            error!(%from, %to, "unsupported coercion requested");
            return Err(CodegenError::InvalidCoercion { from, to, span });
        }
    };
    Ok(TypedValue::new(converted, target))
}

/// Coerce a user value to `target`, treating booleans as 1-bit integers
/// where a number is wanted.
pub fn convert<B: BuilderMethods>(
    builder: &mut B,
    value: TypedValue<B::Value>,
    target: ValueKind,
    span: Span,
) -> Result<TypedValue<B::Value>, CodegenError> {
    let value = if value.kind == ValueKind::Bool && target.is_numeric() {
        widen_bool(builder, value)
    } else {
        value
    };
    if !can_cast(value.kind, target) {
        return Err(CodegenError::TypeMismatch {
            expected: target,
            found: value.kind,
            span,
        });
    }
    cast_to_if_needed(builder, value, target, span)
}

/// Zero-extend a boolean to an integer; other kinds pass through.
pub fn widen_bool<B: BuilderMethods>(
    builder: &mut B,
    value: TypedValue<B::Value>,
) -> TypedValue<B::Value> {
    if value.kind == ValueKind::Bool {
        TypedValue::new(builder.zext_bool(value.value, "zext"), ValueKind::Int)
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_set() {
        assert!(can_cast(ValueKind::Int, ValueKind::Float));
        assert!(can_cast(ValueKind::Float, ValueKind::Int));
        assert!(can_cast(ValueKind::Int, ValueKind::Bool));
        assert!(can_cast(ValueKind::Float, ValueKind::Bool));
        assert!(can_cast(ValueKind::Bool, ValueKind::Bool));

        assert!(!can_cast(ValueKind::Bool, ValueKind::Int));
        assert!(!can_cast(ValueKind::Bool, ValueKind::Float));
        assert!(!can_cast(ValueKind::Void, ValueKind::Int));
        assert!(!can_cast(ValueKind::Function, ValueKind::Bool));
        assert!(!can_cast(ValueKind::Int, ValueKind::Void));
    }
}
