//! # docblock
//!
//! Parser and format-preserving printer for PHPDoc-style doc blocks.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! printer   → fresh and format-preserving printing, sequence differ
//!   ↓
//! visit     → mutable traversal, clone-with-backlinks
//!   ↓
//! parser    → Logos lexer, token cursor, recursive-descent grammars
//!   ↓
//! ast       → node types, attributes, uniform read-only view
//! ```
//!
//! ## Example
//!
//! ```
//! use docblock::parser::{DocBlockParser, ParserConfig, TokenIterator};
//! use docblock::printer::Printer;
//! use docblock::visit::clone_with_backlinks;
//!
//! let source = "/** @param  int  $x */";
//! let mut tokens = TokenIterator::from_text(source);
//! let original = DocBlockParser::new(ParserConfig::default().with_indexes(true))
//!     .parse(&mut tokens)
//!     .unwrap();
//!
//! let edited = clone_with_backlinks(&original);
//! let printed = Printer::new().print_format_preserving(&edited, &original, &tokens);
//! assert_eq!(printed, source);
//! ```

// ============================================================================
// MODULES (dependency order: ast → parser → visit → printer)
// ============================================================================

/// Syntax tree: node types, attributes, `NodeRef`
pub mod ast;

/// Parser: Logos lexer, token cursor, recursive-descent grammars
pub mod parser;

/// Mutable traversal and backlink cloning
pub mod visit;

/// Fresh and format-preserving printing
pub mod printer;

pub use ast::{DocBlock, NodeKind, NodeRef, TypeNode};
pub use parser::{ParseError, ParserConfig, TokenIterator, TokenKind};
pub use printer::Printer;

/// Parse a whole doc block with the given configuration
pub fn parse_doc_block(text: &str, config: ParserConfig) -> Result<DocBlock, ParseError> {
    let mut tokens = TokenIterator::from_text(text);
    parser::DocBlockParser::new(config).parse(&mut tokens)
}

/// Parse `text` as one type expression, rejecting trailing input
pub fn parse_type(text: &str) -> Result<TypeNode, ParseError> {
    let mut tokens = TokenIterator::from_text(text);
    let ty = parser::TypeParser::default().parse(&mut tokens)?;
    tokens.consume(TokenKind::END)?;
    Ok(ty)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_type_rejects_trailing_input() {
        let err = parse_type("string & int | float").unwrap_err();
        assert_eq!(err.current_kind, TokenKind::UNION);
        assert_eq!(err.expected_kind, TokenKind::END);
    }

    #[test]
    fn test_parse_doc_block() {
        let block = parse_doc_block("/** @var int */", ParserConfig::default()).unwrap();
        assert_eq!(block.tags().count(), 1);
    }
}
