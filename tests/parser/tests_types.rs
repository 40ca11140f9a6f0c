//! Type expression grammar through the public API

use docblock::ast::{TypeNode, Variance};
use docblock::parser::{ParserConfig, TokenIterator, TokenKind, TypeParser};
use docblock::parse_type;
use rstest::rstest;

#[rstest]
#[case("int")]
#[case("\\Foo\\Bar")]
#[case("?Foo<int>")]
#[case("A | B | C")]
#[case("A & (B | C)")]
#[case("array<int, list<string>>")]
#[case("(int|string)[][]")]
#[case("T[K]")]
#[case("array{a: int, 'b'?: string, 0: float, ...}")]
#[case("object{foo: int, bar?: ?string}")]
#[case("callable(int, string &...$rest=): void")]
#[case("Closure(A): (B|C)")]
#[case("(T is int ? A : B)")]
#[case("($x is not null ? A : B)")]
#[case("'a'|'b'|1|1.5|Foo::BAR|Foo::*")]
#[case("Foo<covariant A, contravariant B, *>")]
#[case("$this")]
fn test_printed_type_reparses_to_same_tree(#[case] input: &str) {
    let parsed = parse_type(input).unwrap();
    let reparsed = parse_type(&parsed.to_string()).unwrap();
    assert_eq!(reparsed, parsed, "printed as {parsed}");
}

#[test]
fn test_union_and_intersection_do_not_mix() {
    let mut tokens = TokenIterator::from_text("string & int | float");
    let ty = TypeParser::default().parse(&mut tokens).unwrap();
    assert!(matches!(ty, TypeNode::Intersection(ref i) if i.types.len() == 2));
    assert_eq!(tokens.current_kind(), TokenKind::UNION);
}

#[test]
fn test_nested_parentheses_leave_no_wrapper() {
    assert_eq!(parse_type("(((string)))").unwrap(), TypeNode::identifier("string"));
}

#[test]
fn test_array_suffixes_nest_left_to_right() {
    let ty = parse_type("string[][][]").unwrap();
    let TypeNode::Array(outer) = &ty else {
        panic!("expected array, got {ty:?}");
    };
    let TypeNode::Array(middle) = outer.inner.as_ref() else {
        panic!("expected array");
    };
    let TypeNode::Array(inner) = middle.inner.as_ref() else {
        panic!("expected array");
    };
    assert_eq!(*inner.inner, TypeNode::identifier("string"));
}

#[test]
fn test_nullable_generic() {
    let ty = parse_type("?Foo<int>").unwrap();
    let TypeNode::Nullable(nullable) = ty else {
        panic!("expected nullable");
    };
    assert!(matches!(*nullable.inner, TypeNode::Generic(_)));
}

#[test]
fn test_generic_variances() {
    let TypeNode::Generic(generic) = parse_type("Foo<covariant A, contravariant B, C, *>").unwrap()
    else {
        panic!("expected generic");
    };
    assert_eq!(generic.base.name, "Foo");
    assert_eq!(
        generic.variances,
        vec![
            Variance::Covariant,
            Variance::Contravariant,
            Variance::Invariant,
            Variance::Bivariant,
        ]
    );
}

#[test]
fn test_callable_parameters() {
    let TypeNode::Callable(callable) = parse_type("callable(int $a, string ...$rest): void").unwrap()
    else {
        panic!("expected callable");
    };
    assert_eq!(callable.identifier.name, "callable");
    assert_eq!(callable.parameters.len(), 2);
    assert_eq!(callable.parameters[0].name, "$a");
    assert!(!callable.parameters[0].variadic);
    assert!(callable.parameters[1].variadic);
    assert_eq!(callable.parameters[1].name, "$rest");
    assert_eq!(*callable.return_type, TypeNode::identifier("void"));
}

#[test]
fn test_unclosed_generic_reports_end() {
    let err = parse_type("array<int").unwrap_err();
    assert_eq!(err.expected_kind, TokenKind::CLOSE_ANGLE_BRACKET);
    assert_eq!(err.current_kind, TokenKind::END);
    assert_eq!(err.offset_usize(), 9);
}

#[test]
fn test_lines_are_tracked() {
    let mut tokens = TokenIterator::from_text("array{\n  a: int,\n  b: string\n}");
    let parser = TypeParser::new(ParserConfig::default().with_lines(true));
    let TypeNode::ArrayShape(shape) = parser.parse(&mut tokens).unwrap() else {
        panic!("expected shape");
    };
    assert_eq!(shape.attributes.start_line, Some(1));
    assert_eq!(shape.attributes.end_line, Some(4));
    assert_eq!(shape.items[1].attributes.start_line, Some(3));
}

#[test]
fn test_comments_attach_to_following_item() {
    let mut tokens = TokenIterator::from_text("array{\n  // the id\n  id: int\n}");
    let parser = TypeParser::new(ParserConfig::default().with_comments(true));
    let TypeNode::ArrayShape(shape) = parser.parse(&mut tokens).unwrap() else {
        panic!("expected shape");
    };
    let comments = &shape.items[0].attributes.comments;
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].text, "// the id");
}
