//! Edits printed against the original source

use docblock::ast::{
    ArrayShapeItem, Attributes, DocBlock, DocChild, IdentifierType, ShapeKey, TagNode, TagValue,
    TypeNode, TypeTagValue, UnionType, Variance,
};
use docblock::parser::{DocBlockParser, ParserConfig, TokenIterator};
use docblock::printer::Printer;
use docblock::visit::{VisitAction, Visitor, clone_with_backlinks, traverse};

fn parse(input: &str) -> (DocBlock, TokenIterator<'_>) {
    let mut tokens = TokenIterator::from_text(input);
    let block = DocBlockParser::new(ParserConfig::default().with_indexes(true))
        .parse(&mut tokens)
        .unwrap();
    (block, tokens)
}

/// Parse `input`, apply `visitor` to a backlinked copy and print it preserving formatting
fn edit(input: &str, visitor: &mut impl Visitor) -> String {
    let (original, tokens) = parse(input);
    let mut edited = clone_with_backlinks(&original);
    traverse(&mut edited, visitor).unwrap();
    Printer::new().print_format_preserving(&edited, &original, &tokens)
}

/// Runs a closure on every type on the way out
struct OnLeave<F>(F);

impl<F: FnMut(&mut TypeNode)> Visitor for OnLeave<F> {
    fn leave_type(&mut self, ty: &mut TypeNode) -> VisitAction<TypeNode> {
        (self.0)(ty);
        VisitAction::Continue
    }
}

fn shape_item(key: &str, value: &str) -> ArrayShapeItem {
    ArrayShapeItem {
        key: Some(ShapeKey::Identifier(IdentifierType::new(key))),
        optional: false,
        value: TypeNode::identifier(value),
        attributes: Attributes::detached(),
    }
}

#[test]
fn test_item_added_to_empty_shape() {
    let printed = edit(
        "/** @return array{} */",
        &mut OnLeave(|ty: &mut TypeNode| {
            if let TypeNode::ArrayShape(shape) = ty {
                shape.items.push(ArrayShapeItem::positional(TypeNode::identifier("float")));
            }
        }),
    );
    assert_eq!(printed, "/** @return array{float} */");
}

#[test]
fn test_item_appended_to_single_line_shape() {
    let printed = edit(
        "/** @param array{a: int,  b: string} $x */",
        &mut OnLeave(|ty: &mut TypeNode| {
            if let TypeNode::ArrayShape(shape) = ty {
                shape.items.push(shape_item("c", "float"));
            }
        }),
    );
    assert_eq!(printed, "/** @param array{a: int,  b: string, c: float} $x */");
}

#[test]
fn test_item_appended_to_multiline_shape() {
    let printed = edit(
        "/**\n * @return array{\n *   a: int,\n *   b: string\n * }\n */",
        &mut OnLeave(|ty: &mut TypeNode| {
            if let TypeNode::ArrayShape(shape) = ty {
                shape.items.push(shape_item("c", "float"));
            }
        }),
    );
    assert_eq!(
        printed,
        "/**\n * @return array{\n *   a: int,\n *   b: string,\n *   c: float\n * }\n */"
    );
}

#[test]
fn test_middle_item_removed() {
    let printed = edit(
        "/** @param array{a: int, b: string, c: float} $x */",
        &mut OnLeave(|ty: &mut TypeNode| {
            if let TypeNode::ArrayShape(shape) = ty {
                shape.items.remove(1);
            }
        }),
    );
    assert_eq!(printed, "/** @param array{a: int, c: float} $x */");
}

struct RemoveMember(&'static str);

impl Visitor for RemoveMember {
    fn enter_type(&mut self, ty: &mut TypeNode) -> VisitAction<TypeNode> {
        match ty {
            TypeNode::Identifier(id) if id.name == self.0 => VisitAction::Remove,
            _ => VisitAction::Continue,
        }
    }
}

#[test]
fn test_first_union_member_removed() {
    let printed = edit("/** @return A|B */", &mut RemoveMember("A"));
    assert_eq!(printed, "/** @return B */");
}

#[test]
fn test_last_union_member_removed_keeps_spacing() {
    let printed = edit("/** @return A | B | C  text */", &mut RemoveMember("C"));
    assert_eq!(printed, "/** @return A | B  text */");
}

struct Rename(&'static str, &'static str);

impl Visitor for Rename {
    fn enter_type(&mut self, ty: &mut TypeNode) -> VisitAction<TypeNode> {
        match ty {
            TypeNode::Identifier(id) if id.name == self.0 => {
                VisitAction::Replace(TypeNode::identifier(self.1))
            }
            _ => VisitAction::Continue,
        }
    }
}

#[test]
fn test_renamed_identifier_keeps_surrounding_layout() {
    let printed = edit(
        "/**\n * @param  Foo   $a  the foo\n * @return  array< Foo ,  int >\n */",
        &mut Rename("Foo", "Bar"),
    );
    assert_eq!(
        printed,
        "/**\n * @param  Bar   $a  the foo\n * @return  array< Bar ,  int >\n */"
    );
}

struct Widen;

impl Visitor for Widen {
    fn leave_type(&mut self, ty: &mut TypeNode) -> VisitAction<TypeNode> {
        match ty {
            TypeNode::Identifier(id) if id.name == "int" => {
                VisitAction::Replace(TypeNode::Union(UnionType {
                    types: vec![TypeNode::identifier("int"), TypeNode::identifier("null")],
                    attributes: Attributes::detached(),
                }))
            }
            _ => VisitAction::Continue,
        }
    }
}

#[test]
fn test_union_in_array_gets_parentheses() {
    let printed = edit("/** @var  int[]  $list */", &mut Widen);
    assert_eq!(printed, "/** @var  (int|null)[]  $list */");
}

#[test]
fn test_replaced_param_type_keeps_description_spacing() {
    let printed = edit("/** @param  int  $a   desc */", &mut Widen);
    assert_eq!(printed, "/** @param  int|null  $a   desc */");
}

struct AppendReturn;

impl Visitor for AppendReturn {
    fn leave_child(&mut self, child: &mut DocChild) -> VisitAction<DocChild> {
        match child {
            DocChild::Tag(tag) if tag.name == "@param" => {
                let added = DocChild::Tag(TagNode {
                    name: "@return".into(),
                    value: TagValue::Return(TypeTagValue {
                        ty: TypeNode::identifier("void"),
                        description: String::new(),
                        attributes: Attributes::detached(),
                    }),
                    attributes: Attributes::detached(),
                });
                VisitAction::ReplaceMany(vec![child.clone(), added])
            }
            _ => VisitAction::Continue,
        }
    }
}

#[test]
fn test_added_tag_uses_block_line_prefix() {
    let printed = edit("/**\n * @param int $a\n */", &mut AppendReturn);
    assert_eq!(printed, "/**\n * @param int $a\n * @return void\n */");
}

#[test]
fn test_added_tag_follows_tab_indentation() {
    let printed = edit("/**\n\t *  Summary\n\t *  @param int $a\n\t */", &mut AppendReturn);
    assert_eq!(
        printed,
        "/**\n\t *  Summary\n\t *  @param int $a\n\t *  @return void\n\t */"
    );
}

#[test]
fn test_removed_leading_line_keeps_block_opening() {
    struct DropSummary;
    impl Visitor for DropSummary {
        fn enter_child(&mut self, child: &mut DocChild) -> VisitAction<DocChild> {
            match child {
                DocChild::Text(text) if text.text == "Summary." => VisitAction::Remove,
                _ => VisitAction::SkipSubtree,
            }
        }
    }

    let printed = edit("/**\n * Summary.\n * @return int\n */", &mut DropSummary);
    assert_eq!(printed, "/**\n * @return int\n */");
}

/// Appends an argument with the given variance to every generic type
fn push_argument(name: &'static str, variance: Variance) -> OnLeave<impl FnMut(&mut TypeNode)> {
    OnLeave(move |ty: &mut TypeNode| {
        if let TypeNode::Generic(generic) = ty {
            generic.params.push(TypeNode::identifier(name));
            generic.variances.push(variance);
        }
    })
}

#[test]
fn test_argument_appended_to_generic_keeps_spacing() {
    let printed = edit(
        "/** @return array< int > */",
        &mut push_argument("string", Variance::Invariant),
    );
    assert_eq!(printed, "/** @return array< int, string > */");
}

#[test]
fn test_argument_appended_after_covariant_argument() {
    let printed = edit(
        "/** @return Foo<covariant  A> */",
        &mut push_argument("B", Variance::Invariant),
    );
    assert_eq!(printed, "/** @return Foo<covariant  A, B> */");
}

#[test]
fn test_added_covariant_argument_prints_generic_fresh() {
    let printed = edit("/** @return  Foo< A > */", &mut push_argument("B", Variance::Covariant));
    assert_eq!(printed, "/** @return  Foo<A, covariant B> */");
}

#[test]
fn test_changed_variance_prints_generic_fresh() {
    let printed = edit(
        "/** @return  Foo< covariant A > */",
        &mut OnLeave(|ty: &mut TypeNode| {
            if let TypeNode::Generic(generic) = ty {
                generic.variances[0] = Variance::Invariant;
            }
        }),
    );
    assert_eq!(printed, "/** @return  Foo<A> */");
}
