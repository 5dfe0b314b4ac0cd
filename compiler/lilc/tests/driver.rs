//! End-to-end: source text through parse, codegen, SSA and evaluation.

use lil_codegen::{CodegenError, ValueKind};
use lil_ssa::{EvalError, PrintHandler, Value};
use lilc::{build_source, compile_source, render, run_source, DriverError, RunOutput};
use pretty_assertions::assert_eq;

const FIB: &str = "
// iterative fibonacci with an echo per step
int fib(int n) {
    int a = 0
    int b = 1
    int i = 0
    while i < n {
        int t = a + b
        a = b
        b = t
        echo(a)
        i = i + 1
    }
    a
}
fib(6)
";

#[test]
fn run_returns_the_result_and_captured_output() {
    let out = run_source(FIB, PrintHandler::buffer()).unwrap_or_else(|err| panic!("{err}"));
    assert_eq!(
        out,
        RunOutput {
            value: Value::Int(8),
            kind: ValueKind::Int,
            output: "1\n1\n2\n3\n5\n8\n".to_owned(),
        }
    );
}

#[test]
fn result_kind_follows_the_last_statement() {
    let out = run_source("echod(1.5);", PrintHandler::buffer())
        .unwrap_or_else(|err| panic!("{err}"));
    assert_eq!(out.kind, ValueKind::Float);
    assert_eq!(out.output, "1.500000\n");

    let out = run_source("void f() { } f()", PrintHandler::Silent)
        .unwrap_or_else(|err| panic!("{err}"));
    assert_eq!(out.kind, ValueKind::Void);
    assert_eq!(out.value, Value::Void);
}

#[test]
fn build_lists_the_module() {
    let listing = build_source(FIB).unwrap_or_else(|err| panic!("{err}"));
    assert!(listing.contains("declare i64 @echo(i64)"), "{listing}");
    assert!(listing.contains("define internal i64 @fib(i64"), "{listing}");
    assert!(listing.contains("define i64 @main()"), "{listing}");
    assert!(listing.contains("while.cond"), "{listing}");
}

#[test]
fn errors_come_from_each_phase() {
    assert!(matches!(
        compile_source("int x = ;"),
        Err(DriverError::Parse(_))
    ));
    assert!(matches!(
        compile_source("missing(1)"),
        Err(DriverError::Codegen(CodegenError::UnknownCallee { .. }))
    ));
    assert!(matches!(
        run_source("int z = 0; 10 / z", PrintHandler::Silent),
        Err(DriverError::Eval(EvalError::DivisionByZero))
    ));
    assert!(matches!(
        run_source("extern double cbrt(double x)\ncbrt(8.0)", PrintHandler::Silent),
        Err(DriverError::Eval(EvalError::UnknownExtern { .. }))
    ));
}

#[test]
fn codegen_errors_render_with_their_location() {
    let source = "int f(int a) { a }\nf(1, 2)\n";
    let Err(err) = compile_source(source) else {
        panic!("expected an argument count error");
    };
    assert_eq!(err.phase(), "codegen");
    let text = render("args.lil", source, &err);
    assert!(text.contains("`f` takes 1 argument"), "{text}");
    assert!(text.contains("f(1, 2)"), "{text}");
}
