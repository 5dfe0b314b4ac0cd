use lil_ir::Name;
use pretty_assertions::assert_eq;
use smallvec::smallvec;

use super::*;
use crate::FunctionPath;

fn entry(func: u32, name: u32, explicit: usize) -> FunctionEntry<u32> {
    FunctionEntry {
        func,
        key: FunctionKey::new(FunctionPath::from_names([Name::from_raw(1)]), Name::from_raw(name)),
        params: smallvec![ValueKind::Int, ValueKind::Float, ValueKind::Bool],
        explicit,
        ret: ValueKind::Int,
        local: true,
        state: FunctionState::Final,
    }
}

#[test]
fn capture_count_is_trailing_params() {
    let e = entry(0, 7, 1);
    assert_eq!(e.capture_count(), 2);
    assert_eq!(e.explicit_params(), &[ValueKind::Int]);
}

#[test]
fn first_insert_wins() {
    let mut cache = FunctionCache::new();
    cache.insert(entry(10, 7, 3));
    cache.insert(entry(20, 7, 3));

    assert_eq!(cache.len(), 1);
    let key = entry(0, 7, 3).key;
    assert_eq!(cache.get(&key).map(|e| e.func), Some(10));
}

#[test]
fn distinct_keys_coexist() {
    let mut cache = FunctionCache::new();
    assert!(cache.is_empty());
    cache.insert(entry(10, 7, 3));
    cache.insert(entry(11, 8, 3));
    assert_eq!(cache.len(), 2);
}
