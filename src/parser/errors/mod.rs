//! Parser error handling module
//!
//! A single error kind escapes the parsing core: [`ParseError`], raised when
//! the current token does not match what a grammar rule requires. It keeps
//! enough context (token text, kind, byte offset, line, expectation) to render
//! a precise diagnostic.

mod error;

pub use error::ParseError;
