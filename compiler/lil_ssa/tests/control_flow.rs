mod common;

use common::{compile, compile_err, run};
use lil_codegen::{CodegenError, ValueKind};
use lil_ssa::Value;
use pretty_assertions::assert_eq;

#[test]
fn if_is_an_expression() {
    assert_eq!(run("1 + if 2 > 1 then { 10 } else { 20 }"), Value::Int(11));
    assert_eq!(run("if 0 then { 1.5 } else { 2.5 }"), Value::Float(2.5));
}

#[test]
fn else_if_chains() {
    let source = "
        int classify(int n) {
            if n < 0 then { 0 - 1 } else if n == 0 then { 0 } else { 1 }
        }
        classify(0 - 7) * 100 + classify(0) * 10 + classify(9)
    ";
    assert_eq!(run(source), Value::Int(-99));
}

#[test]
fn numeric_conditions_test_against_zero() {
    assert_eq!(run("if 3 then { true } else { false }"), Value::Bool(true));
    assert_eq!(run("if 0.0 then { 1 } else { 2 }"), Value::Int(2));
}

#[test]
fn branches_must_agree() {
    let err = compile_err("if true then { 1 } else { 2.0 }");
    assert!(matches!(
        err,
        CodegenError::BranchTypeMismatch {
            then_kind: ValueKind::Int,
            else_kind: ValueKind::Float,
            ..
        }
    ));
}

#[test]
fn void_branches_produce_no_value() {
    let compiled = compile("void f() { } if true then { f() } else { f() }");
    assert_eq!(compiled.program.result, ValueKind::Void);
}

#[test]
fn trial_passes_leave_nothing_behind() {
    let compiled = compile("int x = 1; if x > 0 then { x + 1 } else { x - 1 }");
    let listing = compiled.module.to_string();
    assert!(listing.contains("define i64 @main()"), "{listing}");
    assert!(!listing.contains("__trial"), "{listing}");
    assert_eq!(compiled.count("main"), 1);
}

#[test]
fn while_loops_accumulate() {
    let source = "
        int i = 0
        int sum = 0
        while i < 5 { i = i + 1; sum = sum + i }
        sum
    ";
    assert_eq!(run(source), Value::Int(15));
}

#[test]
fn a_loop_yields_its_last_condition() {
    assert_eq!(
        run("int i = 0; while i < 3 { i = i + 1 }"),
        Value::Bool(false)
    );
}

#[test]
fn loops_inside_branches() {
    let source = "
        int n = 4
        int acc = 1
        if n > 0 then {
            while n > 0 { acc = acc * n; n = n - 1 }
            acc
        } else { 0 }
    ";
    assert_eq!(run(source), Value::Int(24));
}

#[test]
fn void_conditions_are_rejected() {
    let err = compile_err("void f() { } while f() { }");
    assert!(matches!(
        err,
        CodegenError::InvalidOperand {
            op: "while",
            kind: ValueKind::Void,
            ..
        }
    ));
}
