//! Lexer and recursive-descent parsers for doc blocks
//!
//! ## Architecture
//!
//! ```text
//! Source Text
//!     ↓
//! Lexer (logos) → Tokens with TokenKind, offset and line
//!     ↓
//! TokenIterator → cursor, save points, comment queue, node ids
//!     ↓
//! grammar → DocBlock / TypeNode / ConstExpr trees
//! ```
//!
//! Nodes record token indexes (with [`ParserConfig::track_indexes`]) so the
//! format-preserving printer can copy untouched source text back out of the
//! same [`TokenIterator`].

pub mod config;
pub mod errors;
pub mod grammar;
mod lexer;
mod syntax_kind;
mod token_iterator;

pub use config::ParserConfig;
pub use errors::ParseError;
pub use grammar::{ConstExprParser, DocBlockParser, TypeParser};
pub use lexer::{AmpersandKind, Lexer, Token, tokenize};
pub use syntax_kind::TokenKind;
pub use token_iterator::TokenIterator;

/// Re-export text-size types for convenience
pub use text_size::TextSize;
