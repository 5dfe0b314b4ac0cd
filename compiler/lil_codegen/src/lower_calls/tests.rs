use lil_ir::{ExprArena, ExprRange, Name, Program, Span, StringInterner};
use pretty_assertions::assert_eq;
use smallvec::smallvec;

use super::*;
use crate::scope::{FrameFlags, Slot};
use crate::traits::{BackendTypes, FloatPredicate, IntPredicate, Linkage};
use crate::{FunctionKey, FunctionPath};

/// Hands out fresh handles and remembers the argument count of each call.
#[derive(Default)]
struct Recorder {
    next: u32,
    calls: Vec<(u32, usize)>,
}

impl Recorder {
    fn fresh(&mut self) -> u32 {
        self.next += 1;
        self.next
    }
}

impl BackendTypes for Recorder {
    type Value = u32;
    type Function = u32;
    type BasicBlock = u32;
}

impl BuilderMethods for Recorder {
    fn declare_function(&mut self, _: &str, _: &[ValueKind], _: ValueKind, _: Linkage) -> u32 {
        self.fresh()
    }
    fn erase_function(&mut self, _: u32) {}
    fn param(&self, _: u32, index: usize) -> u32 {
        u32::try_from(index).unwrap_or(u32::MAX)
    }
    fn function_ref(&mut self, _: u32) -> u32 {
        self.fresh()
    }
    fn append_block(&mut self, _: u32, _: &str) -> u32 {
        self.fresh()
    }
    fn position_at_end(&mut self, _: u32) {}
    fn current_block(&self) -> Option<u32> {
        Some(0)
    }
    fn const_bool(&mut self, _: bool) -> u32 {
        self.fresh()
    }
    fn const_int(&mut self, _: i64) -> u32 {
        self.fresh()
    }
    fn const_float(&mut self, _: f64) -> u32 {
        self.fresh()
    }
    fn alloca(&mut self, _: ValueKind, _: &str) -> u32 {
        self.fresh()
    }
    fn load(&mut self, _: ValueKind, _: u32, _: &str) -> u32 {
        self.fresh()
    }
    fn store(&mut self, _: u32, _: u32) {}
    fn add(&mut self, _: u32, _: u32, _: &str) -> u32 {
        self.fresh()
    }
    fn sub(&mut self, _: u32, _: u32, _: &str) -> u32 {
        self.fresh()
    }
    fn mul(&mut self, _: u32, _: u32, _: &str) -> u32 {
        self.fresh()
    }
    fn sdiv(&mut self, _: u32, _: u32, _: &str) -> u32 {
        self.fresh()
    }
    fn fadd(&mut self, _: u32, _: u32, _: &str) -> u32 {
        self.fresh()
    }
    fn fsub(&mut self, _: u32, _: u32, _: &str) -> u32 {
        self.fresh()
    }
    fn fmul(&mut self, _: u32, _: u32, _: &str) -> u32 {
        self.fresh()
    }
    fn fdiv(&mut self, _: u32, _: u32, _: &str) -> u32 {
        self.fresh()
    }
    fn not(&mut self, _: u32, _: &str) -> u32 {
        self.fresh()
    }
    fn icmp(&mut self, _: IntPredicate, _: u32, _: u32, _: &str) -> u32 {
        self.fresh()
    }
    fn fcmp(&mut self, _: FloatPredicate, _: u32, _: u32, _: &str) -> u32 {
        self.fresh()
    }
    fn si_to_fp(&mut self, _: u32, _: &str) -> u32 {
        self.fresh()
    }
    fn fp_to_si(&mut self, _: u32, _: &str) -> u32 {
        self.fresh()
    }
    fn zext_bool(&mut self, _: u32, _: &str) -> u32 {
        self.fresh()
    }
    fn br(&mut self, _: u32) {}
    fn cond_br(&mut self, _: u32, _: u32, _: u32) {}
    fn ret(&mut self, _: u32) {}
    fn ret_void(&mut self) {}
    fn call(&mut self, func: u32, args: &[u32], _: &str) -> Option<u32> {
        self.calls.push((func, args.len()));
        Some(self.fresh())
    }
}

fn empty_program() -> Program {
    Program {
        arena: ExprArena::new(),
        body: ExprRange::EMPTY,
        span: Span::default(),
    }
}

/// A finished local function `outer.g()` taking one trailing capture.
fn local_g(interner: &StringInterner, func: u32) -> FunctionEntry<u32> {
    let path = FunctionPath::from_names([interner.intern("outer")]);
    FunctionEntry {
        func,
        key: FunctionKey::new(path, interner.intern("g")),
        params: smallvec![ValueKind::Int],
        explicit: 0,
        ret: ValueKind::Int,
        local: true,
        state: FunctionState::Final,
    }
}

/// Caller frame with `x` and `y` in scope and `g` bound.
fn caller<'a>(
    builder: &'a mut Recorder,
    program: &'a Program,
    interner: &'a StringInterner,
    g: &FunctionEntry<u32>,
) -> ExprLowerer<'a, Recorder> {
    let mut lowerer = ExprLowerer::new(builder, program, interner, 0, 0);
    lowerer
        .scopes
        .push(0, interner.intern("entry"), FrameFlags::empty(), None);
    for (name, ptr) in [("x", 100), ("y", 101)] {
        lowerer.scopes.declare(
            interner.intern(name),
            Slot {
                ptr,
                kind: ValueKind::Int,
            },
        );
    }
    lowerer.scopes.bind_function(g.key.name, g.clone());
    lowerer
}

fn name(interner: &StringInterner, s: &str) -> Name {
    interner.intern(s)
}

#[test]
fn captures_are_appended_after_explicit_arguments() {
    let interner = StringInterner::new();
    let program = empty_program();
    let mut builder = Recorder::default();
    let g = local_g(&interner, 77);
    {
        let mut lowerer = caller(&mut builder, &program, &interner, &g);
        assert!(lowerer
            .captures
            .record(&g.key, name(&interner, "x"), ValueKind::Int));

        let result = lowerer.lower_call(g.key.name, ExprRange::EMPTY, Span::default());
        assert!(matches!(result, Ok(Some(_))));
    }
    assert_eq!(builder.calls, vec![(77, 1)]);
}

#[test]
fn capture_table_disagreeing_with_signature_is_rejected() {
    let interner = StringInterner::new();
    let program = empty_program();
    let mut builder = Recorder::default();
    let g = local_g(&interner, 77);
    let span = Span::default();
    {
        let mut lowerer = caller(&mut builder, &program, &interner, &g);
        assert!(lowerer
            .captures
            .record(&g.key, name(&interner, "x"), ValueKind::Int));
        assert!(lowerer
            .captures
            .record(&g.key, name(&interner, "y"), ValueKind::Int));

        let result = lowerer.lower_call(g.key.name, ExprRange::EMPTY, span);
        assert_eq!(
            result,
            Err(CodegenError::CaptureArityMismatch {
                callee: "outer.g".to_owned(),
                expected: 1,
                found: 2,
                span,
            })
        );
    }
    assert!(builder.calls.is_empty());
}
