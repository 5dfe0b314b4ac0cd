use pretty_assertions::assert_eq;

use super::*;

fn key(interner: &StringInterner, path: &[&str], name: &str) -> FunctionKey {
    FunctionKey::new(
        FunctionPath::from_names(path.iter().map(|s| interner.intern(s))),
        interner.intern(name),
    )
}

#[test]
fn mangles_with_path() {
    let interner = StringInterner::new();
    assert_eq!(key(&interner, &[], "main").mangle(&interner), "main");
    assert_eq!(
        key(&interner, &["outer", "mid"], "leaf").mangle(&interner),
        "outer.mid.leaf"
    );
    assert_eq!(
        key(&interner, &["outer"], "f").display(&interner).to_string(),
        "outer.f"
    );
}

#[test]
fn same_name_different_path_is_a_different_key() {
    let interner = StringInterner::new();
    assert_ne!(key(&interner, &["a"], "f"), key(&interner, &["b"], "f"));
    assert_eq!(key(&interner, &["a"], "f"), key(&interner, &["a"], "f"));
}

#[test]
fn records_in_discovery_order_without_duplicates() {
    let interner = StringInterner::new();
    let f = key(&interner, &["outer"], "f");
    let x = interner.intern("x");
    let y = interner.intern("y");
    let mut table = CaptureTable::new();

    assert!(table.record(&f, y, ValueKind::Float));
    assert!(table.record(&f, x, ValueKind::Int));
    assert!(!table.record(&f, y, ValueKind::Float));

    assert_eq!(
        table.get(&f),
        &[
            Capture {
                name: y,
                kind: ValueKind::Float
            },
            Capture {
                name: x,
                kind: ValueKind::Int
            },
        ]
    );
}

#[test]
fn unknown_key_has_no_captures() {
    let interner = StringInterner::new();
    let table = CaptureTable::new();
    let g = key(&interner, &[], "g");
    assert!(table.get(&g).is_empty());
    assert!(!table.has_captures(&g));
}
