use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;

fn kinds(source: &str) -> Vec<TokenKind> {
    let interner = StringInterner::new();
    match lex(source, &interner) {
        Ok(tokens) => tokens.into_iter().map(|t| t.kind).collect(),
        Err(err) => panic!("lex failed: {err}"),
    }
}

#[test]
fn keywords_and_types() {
    assert_eq!(
        kinds("fn int double bool void var extern return"),
        vec![
            TokenKind::Fn,
            TokenKind::IntType,
            TokenKind::DoubleType,
            TokenKind::BoolType,
            TokenKind::VoidType,
            TokenKind::Var,
            TokenKind::Extern,
            TokenKind::Return,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn keyword_prefix_is_an_identifier() {
    let interner = StringInterner::new();
    let tokens = lex("iffy integer", &interner).unwrap_or_default();
    assert_eq!(tokens[0].kind, TokenKind::Ident(interner.intern("iffy")));
    assert_eq!(tokens[1].kind, TokenKind::Ident(interner.intern("integer")));
}

#[test]
fn numbers() {
    assert_eq!(
        kinds("7 2.5 1.0e3"),
        vec![
            TokenKind::Int(7),
            TokenKind::Double(2.5),
            TokenKind::Double(1000.0),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn two_char_operators_win() {
    assert_eq!(
        kinds("a <= b == c != d >= e = f"),
        {
            let interner = StringInterner::new();
            let id = |s| TokenKind::Ident(interner.intern(s));
            vec![
                id("a"),
                TokenKind::LtEq,
                id("b"),
                TokenKind::EqEq,
                id("c"),
                TokenKind::NotEq,
                id("d"),
                TokenKind::GtEq,
                id("e"),
                TokenKind::Assign,
                id("f"),
                TokenKind::Eof,
            ]
        }
    );
}

#[test]
fn comments_are_skipped() {
    assert_eq!(
        kinds("1 // the rest is ignored ^ !\n2"),
        vec![TokenKind::Int(1), TokenKind::Int(2), TokenKind::Eof]
    );
}

#[test]
fn spans_point_at_source() {
    let interner = StringInterner::new();
    let tokens = lex("x = 42", &interner).unwrap_or_default();
    assert_eq!(tokens[2].span, Span::new(4, 6));
    assert_eq!(tokens[3].span, Span::new(6, 6));
}

#[test]
fn unexpected_character() {
    let interner = StringInterner::new();
    let err = lex("a @ b", &interner).err();
    assert_eq!(
        err,
        Some(LexError::UnexpectedChar {
            text: "@".to_owned(),
            span: Span::new(2, 3),
        })
    );
}

#[test]
fn integer_overflow() {
    let interner = StringInterner::new();
    let err = lex("99999999999999999999", &interner).err();
    assert!(matches!(err, Some(LexError::IntOverflow { .. })));
}

proptest! {
    #[test]
    fn never_panics(source in "\\PC{0,64}") {
        let interner = StringInterner::new();
        let _ = lex(&source, &interner);
    }

    #[test]
    fn integer_literals_roundtrip(n in 0i64..i64::MAX) {
        let interner = StringInterner::new();
        let tokens = lex(&n.to_string(), &interner).unwrap_or_default();
        prop_assert_eq!(tokens[0].kind, TokenKind::Int(n));
    }
}
