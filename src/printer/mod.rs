//! Printing of doc block trees
//!
//! [`Printer::print`] renders any node from scratch. [`Printer::print_format_preserving`]
//! re-emits an edited copy of a parsed block, reusing the original source text
//! for every part that did not change.
//!
//! ## Format-preserving printing
//!
//! The edited tree must come from [`crate::visit::clone_with_backlinks`] so its
//! nodes point back at the originals through [`crate::ast::Attributes::original`].
//! The original tree must have been parsed with token indexes, and the original
//! [`TokenIterator`] supplies the text between nodes.
//!
//! Lists are reconciled with a minimal diff. Items added to a list use the
//! separator from the list insertion map; lists that were empty in the source
//! are opened at their bracket via the empty-list map. A list laid out one
//! item per line keeps that layout for inserted items.

pub mod differ;
mod preserving;

use rustc_hash::FxHashMap;

use crate::ast::{
    DocBlock, NodeKind, NodeRef, needs_parens_as_array_inner, needs_parens_as_member,
    needs_parens_as_return,
};
use crate::parser::TokenIterator;

pub use differ::{DiffElem, Differ};

/// `(parent kind, field name)`
type SlotKey = (NodeKind, &'static str);

/// Whether a child of the given kind needs parentheses in a slot
type NeedsParens = fn(NodeKind) -> bool;

/// Placeholder separator for doc block lines; replaced by the detected line prefix
const DOC_LINE_SEPARATOR: &str = "\n * ";

/// Where to open a list that was empty in the source
#[derive(Debug, Clone, Copy)]
struct EmptyListInsertion {
    /// Token text to copy up to and including
    find: &'static str,
    extra_left: &'static str,
    extra_right: &'static str,
}

#[derive(Debug, Clone)]
pub struct Printer {
    list_insertion: FxHashMap<SlotKey, &'static str>,
    empty_list_insertion: FxHashMap<SlotKey, EmptyListInsertion>,
    parentheses: FxHashMap<SlotKey, NeedsParens>,
    parentheses_list: FxHashMap<SlotKey, NeedsParens>,
}

impl Default for Printer {
    fn default() -> Self {
        Self::new()
    }
}

impl Printer {
    pub fn new() -> Self {
        let list_insertion = [
            ((NodeKind::DocBlock, "children"), DOC_LINE_SEPARATOR),
            ((NodeKind::Union, "types"), "|"),
            ((NodeKind::Intersection, "types"), "&"),
            ((NodeKind::ArrayShape, "items"), ", "),
            ((NodeKind::ObjectShape, "items"), ", "),
            ((NodeKind::Callable, "parameters"), ", "),
            ((NodeKind::Generic, "params"), ", "),
            ((NodeKind::ConstArray, "items"), ", "),
            ((NodeKind::MethodTag, "parameters"), ", "),
            ((NodeKind::MethodTag, "templates"), ", "),
            ((NodeKind::New, "args"), ", "),
        ]
        .into_iter()
        .collect();

        let open = |find| EmptyListInsertion {
            find,
            extra_left: "",
            extra_right: "",
        };
        let empty_list_insertion = [
            ((NodeKind::Callable, "parameters"), open("(")),
            ((NodeKind::ArrayShape, "items"), open("{")),
            ((NodeKind::ObjectShape, "items"), open("{")),
            ((NodeKind::MethodTag, "parameters"), open("(")),
        ]
        .into_iter()
        .collect();

        let parentheses = [
            ((NodeKind::Array, "inner"), needs_parens_as_array_inner as NeedsParens),
            ((NodeKind::OffsetAccess, "inner"), needs_parens_as_array_inner),
            ((NodeKind::Callable, "return_type"), needs_parens_as_return),
        ]
        .into_iter()
        .collect();

        let parentheses_list = [
            ((NodeKind::Union, "types"), needs_parens_as_member as NeedsParens),
            ((NodeKind::Intersection, "types"), needs_parens_as_member),
        ]
        .into_iter()
        .collect();

        Self {
            list_insertion,
            empty_list_insertion,
            parentheses,
            parentheses_list,
        }
    }

    /// Render a node from scratch
    pub fn print(&self, node: NodeRef<'_>) -> String {
        node.to_string()
    }

    /// Render `node`, an edited clone of `original`, keeping the original
    /// formatting of everything that was not touched
    ///
    /// Falls back to [`Printer::print`] when `original` carries no token
    /// indexes or the edit cannot be expressed against the source text.
    ///
    /// # Panics
    ///
    /// Panics if a node of an indexed `original` lacks its token range, or if
    /// list items overlap in the source. Both mean `original` and
    /// `original_tokens` do not belong to the same parse.
    pub fn print_format_preserving(
        &self,
        node: &DocBlock,
        original: &DocBlock,
        original_tokens: &TokenIterator<'_>,
    ) -> String {
        if original.attributes.index_range().is_none() {
            tracing::debug!("[PRINT] Original block has no token indexes, printing from scratch");
            return self.print(NodeRef::DocBlock(node));
        }

        let session = preserving::Session::new(self, original, original_tokens);
        let new_children: Vec<_> = node.children.iter().map(NodeRef::Child).collect();
        let old_children: Vec<_> = original.children.iter().map(NodeRef::Child).collect();

        let mut token_index = 0;
        match session.print_list(
            &new_children,
            &old_children,
            &mut token_index,
            (NodeKind::DocBlock, "children"),
        ) {
            Some(mut result) => {
                result.push_str(
                    &original_tokens.content_between(token_index, original_tokens.token_count()),
                );
                result
            }
            None => {
                tracing::debug!("[PRINT] Doc block children could not be reconciled");
                self.print(NodeRef::DocBlock(node))
            }
        }
    }
}
