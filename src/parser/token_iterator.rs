//! Cursor over a token sequence
//!
//! `TokenIterator` is the only mutable state the parsers share. Consuming a
//! non-whitespace token steps over at most one following horizontal
//! whitespace token; newlines are only skipped where a grammar rule asks for
//! it through [`TokenIterator::skip_new_line_tokens`].

use super::errors::ParseError;
use super::lexer::{Token, tokenize};
use super::syntax_kind::TokenKind;
use crate::ast::{Comment, NodeId};
use text_size::TextSize;

#[derive(Debug, Clone)]
pub struct TokenIterator<'a> {
    tokens: Vec<Token<'a>>,
    index: usize,
    save_points: Vec<usize>,
    newline: Option<&'static str>,
    comments: Vec<Comment>,
    next_id: u32,
}

impl<'a> TokenIterator<'a> {
    /// Wrap an END-terminated token sequence
    pub fn new(mut tokens: Vec<Token<'a>>) -> Self {
        if tokens.last().is_none_or(|t| t.kind != TokenKind::END) {
            let end = tokens
                .last()
                .map(|t| (t.offset + TextSize::of(t.text), t.line))
                .unwrap_or((TextSize::new(0), 1));
            tokens.push(Token {
                kind: TokenKind::END,
                text: "",
                offset: end.0,
                line: end.1,
            });
        }
        let mut iter = Self {
            tokens,
            index: 0,
            save_points: Vec::new(),
            newline: None,
            comments: Vec::new(),
            next_id: 0,
        };
        iter.skip_irrelevant_tokens();
        iter
    }

    /// Tokenize `text` and position the cursor on its first token
    pub fn from_text(text: &'a str) -> Self {
        Self::new(tokenize(text))
    }

    pub fn tokens(&self) -> &[Token<'a>] {
        &self.tokens
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    // =========================================================================
    // Token inspection
    // =========================================================================

    pub fn current(&self) -> &Token<'a> {
        &self.tokens[self.index]
    }

    pub fn current_value(&self) -> &'a str {
        self.tokens[self.index].text
    }

    pub fn current_kind(&self) -> TokenKind {
        self.tokens[self.index].kind
    }

    pub fn current_offset(&self) -> TextSize {
        self.tokens[self.index].offset
    }

    pub fn current_line(&self) -> u32 {
        self.tokens[self.index].line
    }

    pub fn current_index(&self) -> usize {
        self.index
    }

    pub fn is_kind(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    pub fn is_any(&self, kinds: &[TokenKind]) -> bool {
        kinds.contains(&self.current_kind())
    }

    /// Case-insensitive match of the current token's text
    pub fn is_value(&self, value: &str) -> bool {
        self.current_value().eq_ignore_ascii_case(value)
    }

    pub fn is_preceded_by_horizontal_whitespace(&self) -> bool {
        self.index > 0 && self.tokens[self.index - 1].kind == TokenKind::HORIZONTAL_WS
    }

    /// The whitespace stepped over by the last consume, or `""`
    pub fn skipped_horizontal_whitespace(&self) -> &'a str {
        if self.is_preceded_by_horizontal_whitespace() {
            self.tokens[self.index - 1].text
        } else {
            ""
        }
    }

    /// Newline style of the first doc line break consumed, if any
    pub fn detected_newline(&self) -> Option<&'static str> {
        self.newline
    }

    // =========================================================================
    // Token consumption
    // =========================================================================

    pub fn advance(&mut self) {
        if self.current_kind() == TokenKind::END {
            return;
        }
        self.index += 1;
        self.skip_irrelevant_tokens();
    }

    pub fn try_consume(&mut self, kind: TokenKind) -> bool {
        if !self.is_kind(kind) {
            return false;
        }
        if kind == TokenKind::PHPDOC_EOL {
            self.detect_newline();
        }
        self.advance();
        true
    }

    pub fn consume(&mut self, kind: TokenKind) -> Result<(), ParseError> {
        if self.try_consume(kind) {
            Ok(())
        } else {
            Err(self.error(kind, None))
        }
    }

    /// Consume a token of `kind` whose text equals `value`, ignoring case
    pub fn try_consume_value(&mut self, kind: TokenKind, value: &str) -> bool {
        if self.is_kind(kind) && self.is_value(value) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub fn consume_value(&mut self, kind: TokenKind, value: &str) -> Result<(), ParseError> {
        if self.try_consume_value(kind, value) {
            Ok(())
        } else {
            Err(self.error(kind, Some(value)))
        }
    }

    /// Step over doc line breaks and `//` comments, queueing the comments
    pub fn skip_new_line_tokens(&mut self) {
        loop {
            match self.current_kind() {
                TokenKind::PHPDOC_EOL => {
                    self.try_consume(TokenKind::PHPDOC_EOL);
                }
                TokenKind::COMMENT => {
                    let token = *self.current();
                    self.comments.push(Comment {
                        text: token.text.trim_end().to_string(),
                        start_line: token.line,
                        start_index: self.index,
                    });
                    self.advance();
                }
                _ => break,
            }
        }
    }

    /// Drain the comments queued since the last call
    pub fn take_comments(&mut self) -> Vec<Comment> {
        std::mem::take(&mut self.comments)
    }

    /// Concatenate token text up to (not including) any of `kinds`
    pub fn join_until(&mut self, kinds: &[TokenKind]) -> String {
        let mut text = String::new();
        while !self.is_any(kinds) && !self.is_kind(TokenKind::END) {
            text.push_str(self.current_value());
            self.index += 1;
        }
        text
    }

    // =========================================================================
    // Save points
    // =========================================================================

    pub fn push_save_point(&mut self) {
        self.save_points.push(self.index);
    }

    pub fn drop_save_point(&mut self) {
        self.save_points.pop();
    }

    pub fn rollback(&mut self) {
        if let Some(index) = self.save_points.pop() {
            self.index = index;
        }
    }

    // =========================================================================
    // Positions
    // =========================================================================

    /// Index of the last token before the cursor that is not whitespace
    pub fn end_index_of_last_relevant_token(&self) -> usize {
        let mut end = self.index.saturating_sub(1);
        while end > 0 && self.tokens[end].kind.is_trivia() {
            end -= 1;
        }
        end
    }

    /// Concatenated text of tokens in `start..end`
    pub fn content_between(&self, start: usize, end: usize) -> String {
        let end = end.min(self.tokens.len());
        if start >= end {
            return String::new();
        }
        self.tokens[start..end].iter().map(|t| t.text).collect()
    }

    /// Whether tokens `start..=end` are wrapped in parentheses
    pub fn has_parentheses(&self, start: usize, end: usize) -> bool {
        self.has_token_immediately_before(start, TokenKind::OPEN_PARENTHESES)
            && self.has_token_immediately_after(end, TokenKind::CLOSE_PARENTHESES)
    }

    fn has_token_immediately_before(&self, pos: usize, kind: TokenKind) -> bool {
        for token in self.tokens[..pos.min(self.tokens.len())].iter().rev() {
            if token.kind == kind {
                return true;
            }
            if !matches!(token.kind, TokenKind::HORIZONTAL_WS | TokenKind::PHPDOC_EOL) {
                break;
            }
        }
        false
    }

    fn has_token_immediately_after(&self, pos: usize, kind: TokenKind) -> bool {
        for token in self.tokens.iter().skip(pos + 1) {
            if token.kind == kind {
                return true;
            }
            if !matches!(token.kind, TokenKind::HORIZONTAL_WS | TokenKind::PHPDOC_EOL) {
                break;
            }
        }
        false
    }

    /// Hand out the next id for a freshly parsed node
    pub fn next_node_id(&mut self) -> NodeId {
        self.next_id += 1;
        NodeId::new(self.next_id)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    pub(crate) fn error(&self, expected: TokenKind, expected_value: Option<&str>) -> ParseError {
        let token = self.current();
        ParseError::new(
            token.text,
            token.kind,
            token.offset,
            expected,
            expected_value,
            Some(token.line),
        )
    }

    fn skip_irrelevant_tokens(&mut self) {
        if self.current_kind() == TokenKind::HORIZONTAL_WS && self.index + 1 < self.tokens.len() {
            self.index += 1;
        }
    }

    fn detect_newline(&mut self) {
        if self.newline.is_none() {
            let text = self.current_value();
            self.newline = Some(if text.starts_with("\r\n") { "\r\n" } else { "\n" });
        }
    }
}
