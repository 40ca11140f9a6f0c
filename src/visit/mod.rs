//! Mutable traversal of doc block trees
//!
//! Implement [`Visitor`] and hand it to [`traverse`]. Hooks run for every doc
//! block line ([`DocChild`]) and every type node, parents before children on
//! enter and children before parents on leave. Each hook answers with a
//! [`VisitAction`].
//!
//! To edit a parsed block and print it back with its formatting, traverse a
//! copy made by [`clone_with_backlinks`] and pass both trees to
//! [`Printer::print_format_preserving`](crate::printer::Printer::print_format_preserving).

mod backlinks;

use thiserror::Error;

use crate::ast::{DocBlock, DocChild, NodeKind, TagValue, TypeNode};

pub use backlinks::clone_with_backlinks;

/// What a [`Visitor`] hook wants done with the node it was given
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisitAction<T> {
    /// Keep the node and go on
    Continue,
    /// Swap the node for another
    Replace(T),
    /// Swap a list item for several items; not visited again
    ReplaceMany(Vec<T>),
    /// Drop a list item
    Remove,
    /// Do not visit the node's children; its leave hook still runs
    SkipChildren,
    /// Do not visit the node's children nor run its leave hook
    SkipSubtree,
    /// End the whole traversal
    Stop,
}

impl<T> VisitAction<T> {
    fn name(&self) -> &'static str {
        match self {
            Self::Continue => "Continue",
            Self::Replace(_) => "Replace",
            Self::ReplaceMany(_) => "ReplaceMany",
            Self::Remove => "Remove",
            Self::SkipChildren => "SkipChildren",
            Self::SkipSubtree => "SkipSubtree",
            Self::Stop => "Stop",
        }
    }
}

/// A hook returned an action that makes no sense where it was returned
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TraverseError {
    #[error("{action} returned for a single {kind} slot, only list items can be removed or expanded")]
    NotInList { action: &'static str, kind: NodeKind },
    #[error("{action} returned when leaving {kind}, its children were already visited")]
    SkipOnLeave { action: &'static str, kind: NodeKind },
}

/// Hooks called by [`traverse`]; every default keeps the node
pub trait Visitor {
    fn enter_child(&mut self, _child: &mut DocChild) -> VisitAction<DocChild> {
        VisitAction::Continue
    }

    fn leave_child(&mut self, _child: &mut DocChild) -> VisitAction<DocChild> {
        VisitAction::Continue
    }

    fn enter_type(&mut self, _ty: &mut TypeNode) -> VisitAction<TypeNode> {
        VisitAction::Continue
    }

    fn leave_type(&mut self, _ty: &mut TypeNode) -> VisitAction<TypeNode> {
        VisitAction::Continue
    }
}

/// Walk `block`, applying the visitor's actions in place
pub fn traverse<V: Visitor>(block: &mut DocBlock, visitor: &mut V) -> Result<(), TraverseError> {
    visit_list(visitor, &mut block.children)?;
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Stop,
}

/// Node categories the visitor has hooks for
trait Visitable: Sized {
    fn enter<V: Visitor>(&mut self, visitor: &mut V) -> VisitAction<Self>;
    fn leave<V: Visitor>(&mut self, visitor: &mut V) -> VisitAction<Self>;
    fn visit_children<V: Visitor>(&mut self, visitor: &mut V) -> Result<Flow, TraverseError>;
    fn node_kind(&self) -> NodeKind;
}

impl Visitable for DocChild {
    fn enter<V: Visitor>(&mut self, visitor: &mut V) -> VisitAction<Self> {
        visitor.enter_child(self)
    }

    fn leave<V: Visitor>(&mut self, visitor: &mut V) -> VisitAction<Self> {
        visitor.leave_child(self)
    }

    fn visit_children<V: Visitor>(&mut self, visitor: &mut V) -> Result<Flow, TraverseError> {
        match self {
            DocChild::Text(_) => Ok(Flow::Continue),
            DocChild::Tag(tag) => visit_tag_value(visitor, &mut tag.value),
        }
    }

    fn node_kind(&self) -> NodeKind {
        self.kind()
    }
}

impl Visitable for TypeNode {
    fn enter<V: Visitor>(&mut self, visitor: &mut V) -> VisitAction<Self> {
        visitor.enter_type(self)
    }

    fn leave<V: Visitor>(&mut self, visitor: &mut V) -> VisitAction<Self> {
        visitor.leave_type(self)
    }

    fn visit_children<V: Visitor>(&mut self, visitor: &mut V) -> Result<Flow, TraverseError> {
        match self {
            TypeNode::Identifier(_) | TypeNode::This(_) | TypeNode::Const(_) => Ok(Flow::Continue),
            TypeNode::Nullable(n) => visit_slot(visitor, n.inner.as_mut()),
            TypeNode::Union(n) => visit_list(visitor, &mut n.types),
            TypeNode::Intersection(n) => visit_list(visitor, &mut n.types),
            TypeNode::Array(n) => visit_slot(visitor, n.inner.as_mut()),
            TypeNode::OffsetAccess(n) => visit_slots(visitor, [&mut *n.inner, &mut *n.offset]),
            // Params stay slots so they line up with their variances
            TypeNode::Generic(n) => visit_slots(visitor, n.params.iter_mut()),
            TypeNode::ArrayShape(n) => {
                visit_slots(visitor, n.items.iter_mut().map(|item| &mut item.value))
            }
            TypeNode::ObjectShape(n) => {
                visit_slots(visitor, n.items.iter_mut().map(|item| &mut item.value))
            }
            TypeNode::Callable(n) => visit_slots(
                visitor,
                n.parameters
                    .iter_mut()
                    .map(|param| &mut param.ty)
                    .chain([&mut *n.return_type]),
            ),
            TypeNode::Conditional(n) => visit_slots(
                visitor,
                [
                    &mut *n.subject,
                    &mut *n.target,
                    &mut *n.if_type,
                    &mut *n.else_type,
                ],
            ),
            TypeNode::ConditionalForParameter(n) => visit_slots(
                visitor,
                [&mut *n.target, &mut *n.if_type, &mut *n.else_type],
            ),
        }
    }

    fn node_kind(&self) -> NodeKind {
        self.kind()
    }
}

fn visit_tag_value<V: Visitor>(
    visitor: &mut V,
    value: &mut TagValue,
) -> Result<Flow, TraverseError> {
    match value {
        TagValue::Param(n) => visit_slot(visitor, &mut n.ty),
        TagValue::Var(n) => visit_slot(visitor, &mut n.ty),
        TagValue::Return(n) | TagValue::Throws(n) | TagValue::Mixin(n) => {
            visit_slot(visitor, &mut n.ty)
        }
        TagValue::Property(n) => visit_slot(visitor, &mut n.ty),
        TagValue::Extends(n) => visit_slot(visitor, &mut n.ty),
        TagValue::TypeAlias(n) => visit_slot(visitor, &mut n.ty),
        TagValue::Template(n) => visit_slots(visitor, n.bound.iter_mut().chain(n.default.iter_mut())),
        TagValue::Method(n) => visit_slots(
            visitor,
            n.return_type
                .iter_mut()
                .chain(
                    n.templates
                        .iter_mut()
                        .flat_map(|t| t.bound.iter_mut().chain(t.default.iter_mut())),
                )
                .chain(n.parameters.iter_mut().filter_map(|p| p.ty.as_mut())),
        ),
        TagValue::TypelessParam(_)
        | TagValue::Deprecated(_)
        | TagValue::Generic(_)
        | TagValue::Invalid(_) => Ok(Flow::Continue),
    }
}

fn visit_slots<'n, V: Visitor, N: Visitable + 'n>(
    visitor: &mut V,
    slots: impl IntoIterator<Item = &'n mut N>,
) -> Result<Flow, TraverseError> {
    for slot in slots {
        if visit_slot(visitor, slot)? == Flow::Stop {
            return Ok(Flow::Stop);
        }
    }
    Ok(Flow::Continue)
}

/// A position holding exactly one node
fn visit_slot<V: Visitor, N: Visitable>(
    visitor: &mut V,
    node: &mut N,
) -> Result<Flow, TraverseError> {
    let descend = match node.enter(visitor) {
        VisitAction::Continue => true,
        VisitAction::Replace(replacement) => {
            *node = replacement;
            true
        }
        VisitAction::SkipChildren => false,
        VisitAction::SkipSubtree => return Ok(Flow::Continue),
        VisitAction::Stop => return Ok(Flow::Stop),
        action @ (VisitAction::ReplaceMany(_) | VisitAction::Remove) => {
            return Err(TraverseError::NotInList {
                action: action.name(),
                kind: node.node_kind(),
            });
        }
    };

    if descend && node.visit_children(visitor)? == Flow::Stop {
        return Ok(Flow::Stop);
    }

    match node.leave(visitor) {
        VisitAction::Continue => Ok(Flow::Continue),
        VisitAction::Replace(replacement) => {
            *node = replacement;
            Ok(Flow::Continue)
        }
        VisitAction::Stop => Ok(Flow::Stop),
        action @ (VisitAction::ReplaceMany(_) | VisitAction::Remove) => {
            Err(TraverseError::NotInList {
                action: action.name(),
                kind: node.node_kind(),
            })
        }
        action @ (VisitAction::SkipChildren | VisitAction::SkipSubtree) => {
            Err(TraverseError::SkipOnLeave {
                action: action.name(),
                kind: node.node_kind(),
            })
        }
    }
}

/// A list position; items may be removed or expanded
fn visit_list<V: Visitor, N: Visitable>(
    visitor: &mut V,
    list: &mut Vec<N>,
) -> Result<Flow, TraverseError> {
    let mut i = 0;
    while i < list.len() {
        let descend = match list[i].enter(visitor) {
            VisitAction::Continue => true,
            VisitAction::Replace(replacement) => {
                list[i] = replacement;
                true
            }
            VisitAction::ReplaceMany(replacements) => {
                let count = replacements.len();
                list.splice(i..=i, replacements);
                i += count;
                continue;
            }
            VisitAction::Remove => {
                list.remove(i);
                continue;
            }
            VisitAction::SkipChildren => false,
            VisitAction::SkipSubtree => {
                i += 1;
                continue;
            }
            VisitAction::Stop => return Ok(Flow::Stop),
        };

        if descend && list[i].visit_children(visitor)? == Flow::Stop {
            return Ok(Flow::Stop);
        }

        match list[i].leave(visitor) {
            VisitAction::Continue => {}
            VisitAction::Replace(replacement) => list[i] = replacement,
            VisitAction::ReplaceMany(replacements) => {
                let count = replacements.len();
                list.splice(i..=i, replacements);
                i += count;
                continue;
            }
            VisitAction::Remove => {
                list.remove(i);
                continue;
            }
            VisitAction::Stop => return Ok(Flow::Stop),
            action @ (VisitAction::SkipChildren | VisitAction::SkipSubtree) => {
                return Err(TraverseError::SkipOnLeave {
                    action: action.name(),
                    kind: list[i].node_kind(),
                });
            }
        }
        i += 1;
    }
    Ok(Flow::Continue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{DocBlockParser, TokenIterator};

    fn parse(input: &str) -> DocBlock {
        let mut tokens = TokenIterator::from_text(input);
        DocBlockParser::default().parse(&mut tokens).unwrap()
    }

    /// Renames identifiers and records the enter/leave order
    #[derive(Default)]
    struct Renamer {
        log: Vec<String>,
    }

    impl Visitor for Renamer {
        fn enter_type(&mut self, ty: &mut TypeNode) -> VisitAction<TypeNode> {
            self.log.push(format!("enter {ty}"));
            match ty {
                TypeNode::Identifier(id) if id.name == "Foo" => {
                    VisitAction::Replace(TypeNode::identifier("Bar"))
                }
                _ => VisitAction::Continue,
            }
        }

        fn leave_type(&mut self, ty: &mut TypeNode) -> VisitAction<TypeNode> {
            self.log.push(format!("leave {ty}"));
            VisitAction::Continue
        }
    }

    #[test]
    fn test_replace_and_visit_order() {
        let mut block = parse("/** @param Foo|int[] $x */");
        let mut renamer = Renamer::default();
        traverse(&mut block, &mut renamer).unwrap();

        assert_eq!(block.to_string(), "/**\n * @param Bar|int[] $x\n */");
        assert_eq!(
            renamer.log,
            vec![
                "enter Foo|int[]",
                "enter Foo",
                "leave Bar",
                "enter int[]",
                "enter int",
                "leave int",
                "leave int[]",
                "leave Bar|int[]",
            ]
        );
    }

    struct DropUnionMember(&'static str);

    impl Visitor for DropUnionMember {
        fn leave_type(&mut self, ty: &mut TypeNode) -> VisitAction<TypeNode> {
            match ty {
                TypeNode::Identifier(id) if id.name == self.0 => VisitAction::Remove,
                _ => VisitAction::Continue,
            }
        }
    }

    #[test]
    fn test_remove_from_list() {
        let mut block = parse("/** @return A|B|C */");
        traverse(&mut block, &mut DropUnionMember("B")).unwrap();
        assert_eq!(block.to_string(), "/**\n * @return A|C\n */");
    }

    #[test]
    fn test_remove_from_single_slot_is_an_error() {
        let mut block = parse("/** @return B */");
        let err = traverse(&mut block, &mut DropUnionMember("B")).unwrap_err();
        assert_eq!(
            err,
            TraverseError::NotInList {
                action: "Remove",
                kind: NodeKind::Identifier,
            }
        );
    }

    struct DropText;

    impl Visitor for DropText {
        fn enter_child(&mut self, child: &mut DocChild) -> VisitAction<DocChild> {
            match child {
                DocChild::Text(_) => VisitAction::Remove,
                DocChild::Tag(_) => VisitAction::SkipSubtree,
            }
        }
    }

    #[test]
    fn test_remove_children() {
        let mut block = parse("/**\n * Summary.\n *\n * @var int\n */");
        traverse(&mut block, &mut DropText).unwrap();
        assert_eq!(block.to_string(), "/**\n * @var int\n */");
    }

    #[derive(Default)]
    struct StopAtFirst {
        seen: usize,
    }

    impl Visitor for StopAtFirst {
        fn enter_type(&mut self, _ty: &mut TypeNode) -> VisitAction<TypeNode> {
            self.seen += 1;
            VisitAction::Stop
        }
    }

    #[test]
    fn test_stop_ends_traversal() {
        let mut block = parse("/**\n * @param A $a\n * @param B $b\n */");
        let mut visitor = StopAtFirst::default();
        traverse(&mut block, &mut visitor).unwrap();
        assert_eq!(visitor.seen, 1);
    }
}
