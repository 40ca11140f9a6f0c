//! Constant expression grammar through the public API

use docblock::ast::{ConstExpr, QuoteStyle};
use docblock::parser::{ConstExprParser, ParseError, ParserConfig, TokenIterator, TokenKind};
use rstest::rstest;

fn parse_with(config: ParserConfig, input: &str) -> Result<ConstExpr, ParseError> {
    let mut tokens = TokenIterator::from_text(input);
    let expr = ConstExprParser::new(config).parse(&mut tokens)?;
    tokens.consume(TokenKind::END)?;
    Ok(expr)
}

fn parse(input: &str) -> Result<ConstExpr, ParseError> {
    parse_with(ParserConfig::default(), input)
}

#[rstest]
#[case("0b1010", "0b1010")]
#[case("1e10", "1e10")]
#[case("-1.0", "-1.0")]
#[case("\"double\"", "\"double\"")]
#[case("FALSE", "false")]
#[case("\\Foo\\BAR", "\\Foo\\BAR")]
#[case("self::VALUE", "self::VALUE")]
#[case("array()", "[]")]
#[case("[1, [2, [3]]]", "[1, [2, [3]]]")]
#[case("new \\DateTime('now')", "new \\DateTime('now')")]
fn test_expression_prints_back(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(parse(input).unwrap().to_string(), expected);
}

#[test]
fn test_raw_strings_keep_delimiters() {
    let ConstExpr::String(string) = parse("'foo'").unwrap() else {
        panic!("expected string");
    };
    assert_eq!(string.value, "'foo'");
    assert_eq!(string.quote, None);
}

#[test]
fn test_quote_aware_strings_are_requoted() {
    let config = ParserConfig::default().with_quote_aware_strings(true);
    let expr = parse_with(config, "'it\\'s'").unwrap();
    let ConstExpr::String(string) = &expr else {
        panic!("expected string");
    };
    assert_eq!(string.value, "it's");
    assert_eq!(string.quote, Some(QuoteStyle::Single));
    assert_eq!(expr.to_string(), "'it\\'s'");
}

#[test]
fn test_keyed_items() {
    let ConstExpr::Array(array) = parse("['a' => 1, 2]").unwrap() else {
        panic!("expected array");
    };
    assert_eq!(array.items.len(), 2);
    assert!(array.items[0].key.is_some());
    assert!(array.items[1].key.is_none());
}

#[rstest]
#[case("Foo::", TokenKind::WILDCARD)]
#[case("[1, 2", TokenKind::CLOSE_SQUARE_BRACKET)]
#[case("array(1", TokenKind::CLOSE_PARENTHESES)]
fn test_incomplete_expression_fails(#[case] input: &str, #[case] expected: TokenKind) {
    assert_eq!(parse(input).unwrap_err().expected_kind, expected);
}
