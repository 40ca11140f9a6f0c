//! Logos-based lexer for doc blocks
//!
//! The token table is compiled into a DFA by the logos derive, so there is no
//! runtime pattern construction and nothing to guard across threads. Ties
//! between patterns of equal length are broken by logos priorities, which
//! mirror the declaration order below.

use super::syntax_kind::TokenKind;
use logos::Logos;
use text_size::TextSize;

/// A token with its kind, text, and position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub offset: TextSize,
    /// 1-based line the token starts on
    pub line: u32,
}

/// Lexer wrapping the logos-generated tokenizer
///
/// Yields every byte of the input exactly once and finishes with a
/// single [`TokenKind::END`] token.
pub struct Lexer<'a> {
    source: &'a str,
    inner: logos::Lexer<'a, LogosToken>,
    base: usize,
    line: u32,
    finished: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            source: input,
            inner: LogosToken::lexer(input),
            base: 0,
            line: 1,
            finished: false,
        }
    }

    fn emit(&mut self, kind: TokenKind, start: usize, end: usize) -> Token<'a> {
        let text = &self.source[start..end];
        let token = Token {
            kind,
            text,
            offset: TextSize::new(start as u32),
            line: self.line,
        };
        self.line += text.bytes().filter(|&b| b == b'\n').count() as u32;
        token
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let Some(result) = self.inner.next() else {
            self.finished = true;
            let end = self.source.len();
            return Some(self.emit(TokenKind::END, end, end));
        };

        let span = self.inner.span();
        let start = self.base + span.start;
        let end = self.base + span.end;

        match result {
            Ok(token) => Some(self.emit(token.into(), start, end)),
            Err(()) => {
                // Only the first character is unrecognized; everything after it
                // gets a fresh chance at the regular patterns.
                let width = self.source[start..]
                    .chars()
                    .next()
                    .map_or(1, char::len_utf8);
                let resume = start + width;
                if resume < end {
                    self.base = resume;
                    self.inner = LogosToken::lexer(&self.source[resume..]);
                }
                Some(self.emit(TokenKind::OTHER, start, resume))
            }
        }
    }
}

/// Tokenize an entire string into a Vec, terminated by an END token
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).collect()
}

/// Whether an `&` binds to a following parameter rather than a type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmpersandKind {
    Reference,
    Intersection,
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || !c.is_ascii()
}

fn ampersand(lex: &mut logos::Lexer<'_, LogosToken>) -> AmpersandKind {
    let rest = lex.remainder().trim_start();
    match rest.as_bytes().first() {
        Some(b'.' | b',' | b'=' | b')') => AmpersandKind::Reference,
        Some(b'$') => {
            let name = &rest[1..];
            let is_this = name.get(..4).is_some_and(|s| s.eq_ignore_ascii_case("this"))
                && !name[4..].chars().next().is_some_and(is_identifier_char);
            if is_this {
                AmpersandKind::Intersection
            } else {
                AmpersandKind::Reference
            }
        }
        _ => AmpersandKind::Intersection,
    }
}

/// Swallow the `*` continuation marker of a doc line, unless it starts `*/`
fn doc_continuation(lex: &mut logos::Lexer<'_, LogosToken>) -> bool {
    let rest = lex.remainder().as_bytes();
    if rest.first() == Some(&b'*') && rest.get(1) != Some(&b'/') {
        let extra = if rest.get(1) == Some(&b' ') { 2 } else { 1 };
        lex.bump(extra);
    }
    true
}

/// `//` comments stop at the end of the line or at the closing delimiter
fn line_comment(lex: &mut logos::Lexer<'_, LogosToken>) -> bool {
    let rest = lex.remainder();
    let line_end = rest.find(['\r', '\n']).unwrap_or(rest.len());
    let end = rest[..line_end].find("*/").unwrap_or(line_end);
    lex.bump(end);
    true
}

/// Logos token enum - maps to TokenKind
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
pub enum LogosToken {
    // =========================================================================
    // DELIMITERS
    // =========================================================================
    #[token("/**")]
    OpenPhpdoc,

    #[token("*/")]
    ClosePhpdoc,

    #[regex(r"@[a-zA-Z][a-zA-Z0-9\-\\]*(?::[a-zA-Z][a-zA-Z0-9\-\\]*)?")]
    Tag,

    #[regex(r"\r?\n[\t ]*", doc_continuation)]
    Eol,

    // =========================================================================
    // TRIVIA
    // =========================================================================
    #[regex(r"[\t ]+")]
    HorizontalWs,

    #[token("//", line_comment)]
    Comment,

    // =========================================================================
    // MULTI-CHARACTER PUNCTUATION
    // =========================================================================
    #[token("::")]
    DoubleColon,

    #[token("...")]
    Variadic,

    #[token("->")]
    Arrow,

    #[token("=>")]
    DoubleArrow,

    // =========================================================================
    // SINGLE-CHARACTER PUNCTUATION
    // =========================================================================
    #[token("&", ampersand)]
    Ampersand(AmpersandKind),
    #[token("|")]
    Union,
    #[token("!")]
    Negated,
    #[token("?")]
    Nullable,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("<")]
    LAngle,
    #[token(">")]
    RAngle,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token("=")]
    Equal,
    #[token("*")]
    Wildcard,

    // =========================================================================
    // LITERALS
    // =========================================================================
    #[regex(r"[+\-]?(?:[0-9]+(?:_[0-9]+)*\.[0-9]*(?:_[0-9]+)*(?:[eE][+\-]?[0-9]+)?|\.[0-9]+(?:_[0-9]+)*(?:[eE][+\-]?[0-9]+)?|[0-9]+(?:_[0-9]+)*[eE][+\-]?[0-9]+)")]
    Float,

    #[regex(r"[+\-]?(?:0[bB][01]+(?:_[01]+)*|0[oO][0-7]+(?:_[0-7]+)*|0[xX][0-9a-fA-F]+(?:_[0-9a-fA-F]+)*|[0-9]+(?:_[0-9]+)*)")]
    Integer,

    #[regex(r"'(?:\\[^\r\n]|[^'\r\n\\])*'")]
    SingleQuotedString,

    #[regex(r#""(?:\\[^\r\n]|[^"\r\n\\])*""#)]
    DoubleQuotedString,

    // =========================================================================
    // NAMES
    // =========================================================================
    #[regex(r"\$[tT][hH][iI][sS]", priority = 10)]
    ThisVariable,

    #[regex(r"\$[a-zA-Z_\x{80}-\x{10FFFF}][0-9a-zA-Z_\x{80}-\x{10FFFF}]*")]
    Variable,

    #[regex(r"\\?[a-zA-Z_\x{80}-\x{10FFFF}][0-9a-zA-Z_\x{80}-\x{10FFFF}\-]*(?:\\[a-zA-Z_\x{80}-\x{10FFFF}][0-9a-zA-Z_\x{80}-\x{10FFFF}\-]*)*")]
    Identifier,
}

impl From<LogosToken> for TokenKind {
    fn from(token: LogosToken) -> Self {
        use LogosToken::*;
        match token {
            OpenPhpdoc => TokenKind::OPEN_PHPDOC,
            ClosePhpdoc => TokenKind::CLOSE_PHPDOC,
            Tag => TokenKind::PHPDOC_TAG,
            Eol => TokenKind::PHPDOC_EOL,
            HorizontalWs => TokenKind::HORIZONTAL_WS,
            Comment => TokenKind::COMMENT,
            DoubleColon => TokenKind::DOUBLE_COLON,
            Variadic => TokenKind::VARIADIC,
            Arrow => TokenKind::ARROW,
            DoubleArrow => TokenKind::DOUBLE_ARROW,
            Ampersand(AmpersandKind::Reference) => TokenKind::REFERENCE,
            Ampersand(AmpersandKind::Intersection) => TokenKind::INTERSECTION,
            Union => TokenKind::UNION,
            Negated => TokenKind::NEGATED,
            Nullable => TokenKind::NULLABLE,
            LParen => TokenKind::OPEN_PARENTHESES,
            RParen => TokenKind::CLOSE_PARENTHESES,
            LAngle => TokenKind::OPEN_ANGLE_BRACKET,
            RAngle => TokenKind::CLOSE_ANGLE_BRACKET,
            LBracket => TokenKind::OPEN_SQUARE_BRACKET,
            RBracket => TokenKind::CLOSE_SQUARE_BRACKET,
            LBrace => TokenKind::OPEN_CURLY_BRACKET,
            RBrace => TokenKind::CLOSE_CURLY_BRACKET,
            Comma => TokenKind::COMMA,
            Colon => TokenKind::COLON,
            Equal => TokenKind::EQUAL,
            Wildcard => TokenKind::WILDCARD,
            Float => TokenKind::FLOAT,
            Integer => TokenKind::INTEGER,
            SingleQuotedString => TokenKind::SINGLE_QUOTED_STRING,
            DoubleQuotedString => TokenKind::DOUBLE_QUOTED_STRING,
            ThisVariable => TokenKind::THIS_VARIABLE,
            Variable => TokenKind::VARIABLE,
            Identifier => TokenKind::IDENTIFIER,
        }
    }
}
