//! Token kinds for doc-block text
//!
//! The lexer classifies every slice of the input into one of these kinds.
//! Kinds carry no semantic meaning beyond classification; the grammar
//! decides what a token means in context.

use std::fmt;

/// All token kinds produced by the lexer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
#[allow(non_camel_case_types)]
pub enum TokenKind {
    // =========================================================================
    // DELIMITERS
    // =========================================================================
    OPEN_PHPDOC,        // /**
    CLOSE_PHPDOC,       // */
    PHPDOC_TAG,         // @param
    PHPDOC_EOL,         // \n *

    // =========================================================================
    // TRIVIA
    // =========================================================================
    HORIZONTAL_WS,      // spaces and tabs
    COMMENT,            // // comment

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    REFERENCE,          // & before a variable
    UNION,              // |
    INTERSECTION,       // &
    NEGATED,            // !
    NULLABLE,           // ?
    OPEN_PARENTHESES,   // (
    CLOSE_PARENTHESES,  // )
    OPEN_ANGLE_BRACKET, // <
    CLOSE_ANGLE_BRACKET, // >
    OPEN_SQUARE_BRACKET, // [
    CLOSE_SQUARE_BRACKET, // ]
    OPEN_CURLY_BRACKET, // {
    CLOSE_CURLY_BRACKET, // }
    COMMA,              // ,
    COLON,              // :
    DOUBLE_COLON,       // ::
    VARIADIC,           // ...
    ARROW,              // ->
    DOUBLE_ARROW,       // =>
    EQUAL,              // =
    WILDCARD,           // *

    // =========================================================================
    // LITERALS
    // =========================================================================
    FLOAT,              // 1.5e3
    INTEGER,            // 0x1F
    SINGLE_QUOTED_STRING, // 'foo'
    DOUBLE_QUOTED_STRING, // "foo"

    // =========================================================================
    // NAMES
    // =========================================================================
    THIS_VARIABLE,      // $this
    VARIABLE,           // $foo
    IDENTIFIER,         // Foo\Bar

    // =========================================================================
    // SPECIAL
    // =========================================================================
    OTHER,              // anything the patterns above do not cover
    END,                // end-of-input sentinel
}

impl TokenKind {
    /// Whitespace-like kinds the iterator may step over
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::HORIZONTAL_WS | Self::PHPDOC_EOL | Self::COMMENT)
    }

    /// Kinds that end a free-text run inside a block
    pub fn ends_text(self) -> bool {
        matches!(self, Self::PHPDOC_EOL | Self::CLOSE_PHPDOC | Self::END)
    }

    pub fn is_string(self) -> bool {
        matches!(self, Self::SINGLE_QUOTED_STRING | Self::DOUBLE_QUOTED_STRING)
    }

    /// Human-readable label used in diagnostics
    pub fn label(self) -> &'static str {
        match self {
            Self::OPEN_PHPDOC => "'/**'",
            Self::CLOSE_PHPDOC => "'*/'",
            Self::PHPDOC_TAG => "TOKEN_PHPDOC_TAG",
            Self::PHPDOC_EOL => "TOKEN_PHPDOC_EOL",
            Self::HORIZONTAL_WS => "TOKEN_HORIZONTAL_WS",
            Self::COMMENT => "TOKEN_COMMENT",
            Self::REFERENCE => "'&'",
            Self::UNION => "'|'",
            Self::INTERSECTION => "'&'",
            Self::NEGATED => "'!'",
            Self::NULLABLE => "'?'",
            Self::OPEN_PARENTHESES => "'('",
            Self::CLOSE_PARENTHESES => "')'",
            Self::OPEN_ANGLE_BRACKET => "'<'",
            Self::CLOSE_ANGLE_BRACKET => "'>'",
            Self::OPEN_SQUARE_BRACKET => "'['",
            Self::CLOSE_SQUARE_BRACKET => "']'",
            Self::OPEN_CURLY_BRACKET => "'{'",
            Self::CLOSE_CURLY_BRACKET => "'}'",
            Self::COMMA => "','",
            Self::COLON => "':'",
            Self::DOUBLE_COLON => "'::'",
            Self::VARIADIC => "'...'",
            Self::ARROW => "'->'",
            Self::DOUBLE_ARROW => "'=>'",
            Self::EQUAL => "'='",
            Self::WILDCARD => "'*'",
            Self::FLOAT => "TOKEN_FLOAT",
            Self::INTEGER => "TOKEN_INTEGER",
            Self::SINGLE_QUOTED_STRING => "TOKEN_SINGLE_QUOTED_STRING",
            Self::DOUBLE_QUOTED_STRING => "TOKEN_DOUBLE_QUOTED_STRING",
            Self::THIS_VARIABLE => "'$this'",
            Self::VARIABLE => "TOKEN_VARIABLE",
            Self::IDENTIFIER => "type",
            Self::OTHER => "TOKEN_OTHER",
            Self::END => "TOKEN_END",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trivia_kinds() {
        assert!(TokenKind::HORIZONTAL_WS.is_trivia());
        assert!(TokenKind::PHPDOC_EOL.is_trivia());
        assert!(!TokenKind::IDENTIFIER.is_trivia());
    }

    #[test]
    fn test_labels_quote_punctuation() {
        assert_eq!(TokenKind::UNION.to_string(), "'|'");
        assert_eq!(TokenKind::IDENTIFIER.label(), "type");
    }
}
