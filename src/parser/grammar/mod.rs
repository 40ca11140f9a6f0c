//! Recursive-descent grammars
//!
//! - `const_expr` - constant expressions (literals, arrays, constant fetches)
//! - `types` - type expressions
//! - `doc_block` - the block container and its tags, dispatching to the two above
//!
//! Every parser works on a shared [`TokenIterator`] and returns
//! `Result<_, ParseError>`. Only the block parser recovers from errors, and
//! only per tag.

pub mod const_expr;
pub mod doc_block;
mod tags;
pub mod types;

pub use const_expr::ConstExprParser;
pub use doc_block::DocBlockParser;
pub use types::TypeParser;

use crate::ast::Attributes;
use crate::parser::{ParserConfig, TokenIterator};

/// Cursor position captured before a node is parsed
#[derive(Debug, Clone, Copy)]
pub(crate) struct Start {
    pub index: usize,
    pub line: u32,
}

impl Start {
    pub(crate) fn at(tokens: &TokenIterator<'_>) -> Self {
        Self {
            index: tokens.current_index(),
            line: tokens.current_line(),
        }
    }
}

/// Build the attributes of a node spanning from `start` to the last consumed token
///
/// A node that consumed nothing ends one token before it starts.
pub(crate) fn enrich(tokens: &mut TokenIterator<'_>, config: &ParserConfig, start: Start) -> Attributes {
    let mut end = tokens.end_index_of_last_relevant_token();
    if start.index > 0 && end < start.index {
        end = start.index - 1;
    }
    let mut attributes = Attributes {
        id: tokens.next_node_id(),
        ..Attributes::default()
    };
    if config.track_lines {
        attributes.start_line = Some(start.line);
        let end_line = tokens.tokens()[end].line;
        attributes.end_line = Some(end_line.max(start.line));
    }
    if config.track_indexes {
        attributes.start_index = Some(start.index);
        attributes.end_index = Some(end);
    }
    attributes
}

/// Like [`enrich`], also attaching the comments queued before the node
pub(crate) fn enrich_with_comments(
    tokens: &mut TokenIterator<'_>,
    config: &ParserConfig,
    start: Start,
    comments: Vec<crate::ast::Comment>,
) -> Attributes {
    let mut attributes = enrich(tokens, config, start);
    if config.preserve_comments {
        attributes.comments = comments;
    }
    attributes
}
