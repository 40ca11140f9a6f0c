//! Parse error type

use text_size::TextSize;
use thiserror::Error;

use crate::parser::TokenKind;

/// A token that did not match the grammar's expectation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "Unexpected token \"{}\", expected {}{} at offset {}{}",
    escape_newlines(.current_text),
    .expected_kind,
    expected_value_suffix(.expected_value),
    offset_value(.offset),
    line_suffix(.line)
)]
pub struct ParseError {
    /// Text of the offending token
    pub current_text: String,
    /// Kind of the offending token
    pub current_kind: TokenKind,
    /// Byte offset of the offending token
    pub offset: TextSize,
    /// Kind the grammar required at this point
    pub expected_kind: TokenKind,
    /// Exact text required, for keyword expectations
    pub expected_value: Option<String>,
    pub line: Option<u32>,
}

impl ParseError {
    pub fn new(
        current_text: impl Into<String>,
        current_kind: TokenKind,
        offset: TextSize,
        expected_kind: TokenKind,
        expected_value: Option<&str>,
        line: Option<u32>,
    ) -> Self {
        Self {
            current_text: current_text.into(),
            current_kind,
            offset,
            expected_kind,
            expected_value: expected_value.map(str::to_string),
            line,
        }
    }

    /// Byte offset as a plain index into the source text
    pub fn offset_usize(&self) -> usize {
        u32::from(self.offset) as usize
    }
}

fn expected_value_suffix(value: &Option<String>) -> String {
    value.as_ref().map(|v| format!(" (\"{v}\")")).unwrap_or_default()
}

fn offset_value(offset: &TextSize) -> u32 {
    u32::from(*offset)
}

fn line_suffix(line: &Option<u32>) -> String {
    line.map(|l| format!(" on line {l}")).unwrap_or_default()
}

fn escape_newlines(text: &str) -> String {
    text.replace('\r', "\\r").replace('\n', "\\n")
}
