mod common;

use common::{compile, compile_err, run};
use lil_codegen::{CodegenError, ValueKind};
use lil_ssa::Value;
use pretty_assertions::assert_eq;

#[test]
fn top_level_functions() {
    assert_eq!(
        run("int add(int a, int b) { a + b } add(2, 3)"),
        Value::Int(5)
    );
    assert_eq!(run("fn double half(int n) { n / 2.0 } half(3)"), Value::Float(1.5));
}

#[test]
fn arguments_convert_to_parameter_kinds() {
    assert_eq!(run("int trunc(int n) { n } trunc(3.9)"), Value::Int(3));
    assert_eq!(run("double widen(double x) { x } widen(2)"), Value::Float(2.0));
    assert_eq!(run("int count(int n) { n } count(true)"), Value::Int(1));
}

#[test]
fn return_values_convert_to_the_declared_kind() {
    assert_eq!(run("double f() { 1 } f()"), Value::Float(1.0));
    assert_eq!(run("int f() { return 3; 4 } f()"), Value::Int(3));
}

#[test]
fn recursion() {
    let source = "
        int fact(int n) { if n <= 1 then { 1 } else { n * fact(n - 1) } }
        fact(10)
    ";
    assert_eq!(run(source), Value::Int(3_628_800));
}

#[test]
fn local_function_captures_an_outer_parameter() {
    let source = "
        int outer(int x) {
            int inner(int y) { x + y }
            inner(10)
        }
        outer(5)
    ";
    let compiled = compile(source);
    assert_eq!(compiled.arity("outer.inner"), Some(2));
    assert_eq!(compiled.count("outer.inner"), 1);
    assert_eq!(run(source), Value::Int(15));
}

#[test]
fn captures_resolve_by_name_at_the_call_site() {
    // The call site's `double x` shadows the captured `int x` and is
    // truncated to the capture's kind.
    let source = "
        int t() {
            int x = 1
            int get() { x }
            { double x = 2.5; get() }
        }
        t()
    ";
    assert_eq!(run(source), Value::Int(2));
}

#[test]
fn captures_thread_through_every_level() {
    let source = "
        int t() {
            int z = 42
            int f() {
                int g() { z }
                g()
            }
            f()
        }
        t()
    ";
    let compiled = compile(source);
    assert_eq!(compiled.arity("t.f"), Some(1));
    assert_eq!(compiled.arity("t.f.g"), Some(1));
    assert_eq!(compiled.count("t.f"), 1);
    assert_eq!(compiled.count("t.f.g"), 1);
    assert_eq!(run(source), Value::Int(42));
}

#[test]
fn functions_without_captures_are_not_specialized() {
    let compiled = compile("int t() { int f(int a) { a * 2 } f(4) } t()");
    assert_eq!(compiled.arity("t.f"), Some(1));
    assert_eq!(compiled.count("t.f"), 1);
}

#[test]
fn captures_are_read_at_call_time() {
    let source = "
        int t() {
            int x = 1
            int get() { x }
            int first = get()
            x = 5
            first * 10 + get()
        }
        t()
    ";
    assert_eq!(run(source), Value::Int(15));
}

#[test]
fn functions_declared_in_branches_are_compiled_once() {
    let source = "
        int f(int a) {
            if a > 0 then {
                int h() { a + 2 }
                h()
            } else { 0 }
        }
        f(1)
    ";
    let compiled = compile(source);
    assert_eq!(compiled.count("f.h"), 1);
    assert_eq!(compiled.count("f"), 1);
    assert_eq!(run(source), Value::Int(3));
}

#[test]
fn recursive_local_function_with_a_capture() {
    let source = "
        int t(int k) {
            int fact(int n) { if n <= 1 then { k } else { n * fact(n - 1) } }
            fact(5)
        }
        t(1)
    ";
    assert_eq!(compile(source).arity("t.fact"), Some(2));
    assert_eq!(run(source), Value::Int(120));
}

#[test]
fn calling_an_enclosing_local_function_is_rejected() {
    let source = "
        int t() {
            int f() {
                int g() { f() }
                g()
            }
            f()
        }
        t()
    ";
    let err = compile_err(source);
    assert!(
        matches!(err, CodegenError::RecursiveLocalFunction { ref name, .. } if name == "t.f"),
        "{err:?}"
    );
}

#[test]
fn local_functions_are_scoped_to_their_block() {
    let err = compile_err("int t() { { int f() { 1 } }; f() } t()");
    assert!(matches!(err, CodegenError::UnknownCallee { ref name, .. } if name == "f"));
}

#[test]
fn unknown_callee() {
    let err = compile_err("nope(1)");
    assert!(matches!(err, CodegenError::UnknownCallee { ref name, .. } if name == "nope"));
}

#[test]
fn argument_count_must_match() {
    let err = compile_err("int f(int a) { a } f(1, 2)");
    assert_eq!(
        err,
        CodegenError::ArgumentCountMismatch {
            callee: "f".to_owned(),
            expected: 1,
            found: 2,
            span: err.span(),
        }
    );
}

#[test]
fn non_void_functions_need_a_value() {
    let err = compile_err("int f() { int x } f()");
    assert!(matches!(
        err,
        CodegenError::MissingReturn {
            ref name,
            expected: ValueKind::Int,
            ..
        } if name == "f"
    ));
}

#[test]
fn top_level_functions_do_not_see_program_variables() {
    let err = compile_err("int x = 1; int f() { x } f()");
    assert!(matches!(err, CodegenError::UnresolvedName { ref name, .. } if name == "x"));
}

#[test]
fn void_arguments_are_type_errors() {
    let err = compile_err("void g() { } int h(int a) { a } h(g())");
    assert!(matches!(
        err,
        CodegenError::TypeMismatch {
            expected: ValueKind::Int,
            found: ValueKind::Void,
            ..
        }
    ));
}

#[test]
fn function_cache_is_reported() {
    let compiled = compile("int a() { 1 } int b() { int c() { 2 } c() } a() + b()");
    assert_eq!(compiled.program.functions, 3);
    assert_eq!(compiled.program.result, ValueKind::Int);
}
