use lil_codegen::{BuilderMethods, IntPredicate, Linkage, ValueKind};
use pretty_assertions::assert_eq;

use super::ModuleBuilder;
use crate::module::Inst;

#[test]
fn instructions_land_in_the_positioned_block() {
    let mut b = ModuleBuilder::new();
    let f = b.declare_function("f", &[ValueKind::Int], ValueKind::Int, Linkage::Internal);
    let entry = b.append_block(f, "entry");
    b.position_at_end(entry);

    let x = b.param(f, 0);
    let one = b.const_int(1);
    let sum = b.add(x, one, "sum");
    b.ret(sum);

    let module = b.module();
    let block = module.block(entry).map(|bb| bb.insts.clone());
    assert_eq!(block.map(|insts| insts.len()), Some(3));
    assert_eq!(module.inst(sum).kind, ValueKind::Int);
    assert_eq!(module.inst(x).inst, Inst::Param(0));
    assert!(module.block(entry).is_some_and(|bb| bb.is_terminated(module)));
}

#[test]
fn void_calls_define_no_value() {
    let mut b = ModuleBuilder::new();
    let callee = b.declare_function("g", &[], ValueKind::Void, Linkage::Internal);
    let caller = b.declare_function("f", &[], ValueKind::Bool, Linkage::Internal);
    let entry = b.append_block(caller, "entry");
    b.position_at_end(entry);

    assert_eq!(b.call(callee, &[], "call"), None);
    let zero = b.const_int(0);
    let cmp = b.icmp(IntPredicate::Eq, zero, zero, "cmp");
    assert_eq!(b.module().inst(cmp).kind, ValueKind::Bool);
}

#[test]
fn erased_functions_disappear_with_their_blocks() {
    let mut b = ModuleBuilder::new();
    let keep = b.declare_function("keep", &[], ValueKind::Void, Linkage::External);
    let scratch = b.declare_function("__trial.1", &[], ValueKind::Void, Linkage::Internal);
    let bb = b.append_block(scratch, "entry");
    b.position_at_end(bb);
    b.const_int(4);

    b.erase_function(scratch);

    assert_eq!(b.current_block(), None);
    assert!(b.module().function(scratch).is_none());
    assert!(b.module().block(bb).is_none());
    assert_eq!(b.module().function_by_name("keep"), Some(keep));
    assert_eq!(b.module().function_by_name("__trial.1"), None);
    assert_eq!(b.module().functions().count(), 1);
}
