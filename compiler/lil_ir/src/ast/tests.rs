use pretty_assertions::assert_eq;

use super::*;

#[test]
fn alloc_and_read_back() {
    let mut arena = ExprArena::new();
    let one = arena.alloc(ExprKind::Int(1), Span::new(0, 1));
    let two = arena.alloc(ExprKind::Double(2.0), Span::new(4, 7));
    let sum = arena.alloc(
        ExprKind::Binary {
            op: BinaryOp::Add,
            left: one,
            right: two,
        },
        Span::new(0, 7),
    );

    assert_eq!(arena.len(), 3);
    assert_eq!(arena.kind(one), &ExprKind::Int(1));
    assert_eq!(arena.span(two), Span::new(4, 7));
    match arena.kind(sum) {
        ExprKind::Binary { op, left, right } => {
            assert_eq!(*op, BinaryOp::Add);
            assert_eq!((*left, *right), (one, two));
        }
        other => panic!("expected binary, got {other:?}"),
    }
}

#[test]
fn lists_are_independent() {
    let mut arena = ExprArena::new();
    let a = arena.alloc(ExprKind::Bool(true), Span::DUMMY);
    let b = arena.alloc(ExprKind::Bool(false), Span::DUMMY);
    let c = arena.alloc(ExprKind::Int(3), Span::DUMMY);

    let first = arena.alloc_list([a, b]);
    let second = arena.alloc_list([c]);
    let empty = arena.alloc_list([]);

    assert_eq!(arena.list(first), &[a, b]);
    assert_eq!(arena.list(second), &[c]);
    assert!(empty.is_empty());
    assert!(arena.list(empty).is_empty());
}

#[test]
fn params_round_through_the_table() {
    let mut arena = ExprArena::new();
    let x = Param {
        ty: TypeAnnot::Int,
        name: Name::from_raw(1),
        span: Span::new(0, 5),
    };
    let y = Param {
        ty: TypeAnnot::Double,
        name: Name::from_raw(2),
        span: Span::new(7, 15),
    };
    let range = arena.alloc_params([x, y]);
    assert_eq!(range.len(), 2);
    assert_eq!(arena.params(range), &[x, y]);
}

#[test]
fn comparison_operators() {
    assert!(BinaryOp::LtEq.is_comparison());
    assert!(BinaryOp::NotEq.is_comparison());
    assert!(!BinaryOp::Pow.is_comparison());
    assert_eq!(BinaryOp::Pow.as_symbol(), "^");
}
