//! Doc block parsing, tag dispatch and per-tag recovery

use docblock::ast::{DocChild, NodeKind, TagValue};
use docblock::parser::{DocBlockParser, ParserConfig, TokenIterator, TokenKind};
use docblock::parse_doc_block;
use rstest::rstest;

fn values(input: &str) -> Vec<TagValue> {
    parse_doc_block(input, ParserConfig::default())
        .unwrap()
        .tags()
        .map(|tag| tag.value.clone())
        .collect()
}

#[test]
fn test_summary_and_tags() {
    let block = parse_doc_block(
        "/**\n * Adds numbers.\n *\n * @param int $a first\n * @param int $b\n * @return int\n */",
        ParserConfig::default(),
    )
    .unwrap();

    assert!(matches!(&block.children[0], DocChild::Text(text) if text.text == "Adds numbers."));
    assert_eq!(block.tags_named("@param").count(), 2);
    assert_eq!(block.tags_named("@return").count(), 1);
}

#[rstest]
#[case("/** @param Foo $x */", NodeKind::ParamTag)]
#[case("/** @param $x */", NodeKind::TypelessParamTag)]
#[case("/** @var int */", NodeKind::VarTag)]
#[case("/** @returns int */", NodeKind::ReturnTag)]
#[case("/** @throws \\Exception */", NodeKind::ThrowsTag)]
#[case("/** @mixin Foo */", NodeKind::MixinTag)]
#[case("/** @deprecated */", NodeKind::DeprecatedTag)]
#[case("/** @property-write int $x */", NodeKind::PropertyTag)]
#[case("/** @method void run() */", NodeKind::MethodTag)]
#[case("/** @template-covariant T */", NodeKind::TemplateTag)]
#[case("/** @implements Foo<int> */", NodeKind::ExtendsTag)]
#[case("/** @psalm-type Id = int */", NodeKind::TypeAliasTag)]
#[case("/** @phpstan-param int $x */", NodeKind::ParamTag)]
#[case("/** @author Someone */", NodeKind::GenericTag)]
#[case("/** @ORM:Column */", NodeKind::GenericTag)]
fn test_tag_dispatch(#[case] input: &str, #[case] expected: NodeKind) {
    let values = values(input);
    assert_eq!(values.len(), 1);
    assert_eq!(values[0].kind(), expected);
}

#[test]
fn test_invalid_param_keeps_its_text() {
    let values = values("/** @param Foo optional description */");
    let TagValue::Invalid(invalid) = &values[0] else {
        panic!("expected invalid value, got {:?}", values[0]);
    };
    assert_eq!(invalid.value, "Foo optional description");
    assert_eq!(invalid.error.expected_kind, TokenKind::VARIABLE);
    assert_eq!(values[0].to_string(), "Foo optional description");
}

#[test]
fn test_invalid_tag_does_not_affect_neighbours() {
    let values = values("/**\n * @return [int, string]\n * @param int $a\n */");
    assert_eq!(values[0].kind(), NodeKind::InvalidTag);
    assert_eq!(values[1].kind(), NodeKind::ParamTag);
}

#[test]
fn test_return_error_points_at_bracket() {
    let mut tokens = TokenIterator::from_text("@return [int, string]");
    let tag = DocBlockParser::default().parse_tag(&mut tokens);
    let TagValue::Invalid(invalid) = &tag.value else {
        panic!("expected invalid value, got {:?}", tag.value);
    };
    assert_eq!(invalid.error.offset_usize(), 8);
    assert_eq!(invalid.error.current_text, "[");
}

#[test]
fn test_method_tag_structure() {
    let values = values("/** @method static list<T> find<T of Model>(int ...$ids, bool $strict = true) Find */");
    let TagValue::Method(method) = &values[0] else {
        panic!("expected method, got {:?}", values[0]);
    };
    assert!(method.is_static);
    assert_eq!(method.name, "find");
    assert_eq!(method.return_type.as_ref().map(ToString::to_string).as_deref(), Some("list<T>"));
    assert_eq!(method.templates.len(), 1);
    assert_eq!(method.templates[0].name, "T");
    assert_eq!(method.parameters.len(), 2);
    assert!(method.parameters[0].variadic);
    assert_eq!(
        method.parameters[1].default.as_ref().map(ToString::to_string).as_deref(),
        Some("true")
    );
    assert_eq!(method.description, "Find");
}

#[test]
fn test_missing_open_delimiter_fails() {
    let err = parse_doc_block("@var int */", ParserConfig::default()).unwrap_err();
    assert_eq!(err.expected_kind, TokenKind::OPEN_PHPDOC);
}

#[test]
fn test_missing_close_delimiter_is_recorded() {
    let block = parse_doc_block("/** @var int", ParserConfig::default()).unwrap();
    let last = block.tags().last().unwrap();
    assert!(matches!(last.value, TagValue::Invalid(_)));
}

#[test]
fn test_indexes_and_lines() {
    let block = parse_doc_block(
        "/**\n * @var int\n */",
        ParserConfig::default().with_indexes(true).with_lines(true),
    )
    .unwrap();
    let tag = block.tags().next().unwrap();
    assert_eq!(tag.attributes.start_line, Some(2));
    assert_eq!(tag.attributes.end_line, Some(2));
    let (start, end) = tag.attributes.index_range().unwrap();
    assert!(start < end);
    assert!(block.attributes.index_range().is_some());
}

#[test]
fn test_tag_lines_reach_the_tag_parser() {
    let block = parse_doc_block("/** @return A|B */", ParserConfig::default()).unwrap();
    assert_eq!(block.children.len(), 1);
    let DocChild::Tag(tag) = &block.children[0] else {
        panic!("expected tag, got {:?}", block.children[0]);
    };
    assert_eq!(tag.name, "@return");
    assert_eq!(tag.value.kind(), NodeKind::ReturnTag);
}

#[test]
fn test_prefixed_tag_name_is_one_token() {
    let input = "/**\n * @ORM:Column(type=\"string\")\n */";
    let block = parse_doc_block(input, ParserConfig::default()).unwrap();
    let tag = block.tags().next().unwrap();
    assert_eq!(tag.name, "@ORM:Column");
    assert_eq!(tag.value.to_string(), "(type=\"string\")");
}
