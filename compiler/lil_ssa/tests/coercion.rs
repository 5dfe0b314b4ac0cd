mod common;

use common::{compile, run};
use lil_codegen::coerce::{can_cast, cast_to_if_needed};
use lil_codegen::{CodegenError, TypedValue, ValueKind};
use lil_ir::Span;
use lil_ssa::{ModuleBuilder, Value, ValueId};
use pretty_assertions::assert_eq;

#[test]
fn unsupported_pairs_are_invalid_coercions() {
    let mut builder = ModuleBuilder::new();
    let value = ValueId::from_raw(0);
    let span = Span::new(3, 7);

    for (from, to) in [
        (ValueKind::Bool, ValueKind::Int),
        (ValueKind::Void, ValueKind::Float),
        (ValueKind::Function, ValueKind::Int),
    ] {
        assert!(!can_cast(from, to));
        let err = cast_to_if_needed(&mut builder, TypedValue::new(value, from), to, span);
        assert_eq!(err, Err(CodegenError::InvalidCoercion { from, to, span }));
    }
}

#[test]
fn matching_kinds_pass_through() {
    let mut builder = ModuleBuilder::new();
    let value = TypedValue::new(ValueId::from_raw(5), ValueKind::Bool);
    assert_eq!(
        cast_to_if_needed(&mut builder, value, ValueKind::Bool, Span::DUMMY),
        Ok(value)
    );
}

#[test]
fn truncation_and_promotion() {
    assert_eq!(run("int n = 0 - 2.7; n"), Value::Int(-2));
    assert_eq!(run("double d = 7; d / 2"), Value::Float(3.5));
}

#[test]
fn nan_converts_to_true() {
    assert_eq!(run("double n = 0.0 / 0.0; bool b = n; b"), Value::Bool(true));
    assert_eq!(run("double n = 0.0 / 0.0; if n then { 1 } else { 2 }"), Value::Int(1));
    assert_eq!(run("double z = 0.0; bool b = z; b"), Value::Bool(false));
}

#[test]
fn conversions_are_visible_in_the_listing() {
    let listing = compile("double d = 7; int n = d; bool b = n; b").module.to_string();
    assert!(listing.contains("sitofp"), "{listing}");
    assert!(listing.contains("fptosi"), "{listing}");
    assert!(listing.contains("icmp ne"), "{listing}");
    let listing = compile("double d = 0.5; bool b = d; b").module.to_string();
    assert!(listing.contains("fcmp une"), "{listing}");
    assert!(listing.contains("define i1 @main()"), "{listing}");
}

#[test]
fn deep_nesting_compiles() {
    let depth = 2000;
    let source = format!("{}1{}", "(1 + ".repeat(depth), ")".repeat(depth));
    assert_eq!(run(&source), Value::Int(2001));
}
