//! Unchanged trees print back byte for byte

use docblock::ast::{DocBlock, NodeRef};
use docblock::parser::{DocBlockParser, ParserConfig, TokenIterator};
use docblock::printer::Printer;
use docblock::visit::{Visitor, clone_with_backlinks, traverse};
use rstest::rstest;

fn parse(input: &str) -> (DocBlock, TokenIterator<'_>) {
    let mut tokens = TokenIterator::from_text(input);
    let block = DocBlockParser::new(ParserConfig::all())
        .parse(&mut tokens)
        .unwrap();
    (block, tokens)
}

struct Noop;

impl Visitor for Noop {}

#[rstest]
#[case("/** @var int */")]
#[case("/**  @var   int   $x   the   x  */")]
#[case("/**\n * Summary.\n *\n * Details\n *   indented\n */")]
#[case("/**\n * @param int|string $a\n * @param array{\n *   a: int,\n *   b?: string,\n * } $b\n */")]
#[case("/**\n\t* @return callable( int , string ) : void\n\t*/")]
#[case("/**\r\n * @template T of object\r\n * @method T get<T>(class-string<T> $c = Foo::BAR)\r\n */")]
#[case("/** @return [int, string] */")]
#[case("/** @param Foo optional description */")]
#[case("/** @var array<int,   list< string >> */")]
#[case("/** @psalm-type Pair = array{int, int} */")]
#[case("/**\n * @see Foo::bar()\n * @deprecated since 2.0\n */")]
#[case("/**")]
#[case("/**\n * @return int")]
#[case("/** @ORM:Column(type=\"string\") */")]
fn test_noop_edit_prints_source(#[case] input: &str) {
    let (original, tokens) = parse(input);
    let mut edited = clone_with_backlinks(&original);
    traverse(&mut edited, &mut Noop).unwrap();

    let printed = Printer::new().print_format_preserving(&edited, &original, &tokens);
    assert_eq!(printed, input);
}

#[rstest]
#[case("/**  @var   int   $x  */", "/**\n * @var int $x\n */")]
#[case("/** @param  array< int , string >  $m */", "/**\n * @param array<int, string> $m\n */")]
#[case("/**\n *\n * @return  void\n */", "/**\n *\n * @return void\n */")]
fn test_fresh_print_normalizes(#[case] input: &str, #[case] expected: &str) {
    let (block, _) = parse(input);
    assert_eq!(Printer::new().print(NodeRef::DocBlock(&block)), expected);
}
