//! Constant expression grammar
//!
//! ```text
//! const_expr := FLOAT | INTEGER | STRING
//!             | 'true' | 'false' | 'null'
//!             | 'new' IDENTIFIER ( '(' args ')' )?
//!             | 'array' '(' items ')' | '[' items ']'
//!             | IDENTIFIER ( '::' ( IDENTIFIER | '*' )+ )?
//! items      := ( item ( ',' item )* ','? )?
//! item       := const_expr ( '=>' const_expr )?
//! ```

use crate::ast::{
    BoolLiteral, ConstArray, ConstArrayItem, ConstExpr, ConstFetch, FloatLiteral, IntegerLiteral,
    NewExpr, NullLiteral, QuoteStyle, StringLiteral,
};
use crate::parser::{ParseError, ParserConfig, TokenIterator, TokenKind};

use super::{Start, enrich, enrich_with_comments};

#[derive(Debug, Clone, Copy, Default)]
pub struct ConstExprParser {
    config: ParserConfig,
}

impl ConstExprParser {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse one constant expression starting at the current token
    pub fn parse(&self, tokens: &mut TokenIterator<'_>) -> Result<ConstExpr, ParseError> {
        self.parse_with(tokens, false)
    }

    /// `trim_strings` strips and unescapes string delimiters even when the
    /// configuration keeps them, as type positions require
    pub(crate) fn parse_with(
        &self,
        tokens: &mut TokenIterator<'_>,
        trim_strings: bool,
    ) -> Result<ConstExpr, ParseError> {
        let start = Start::at(tokens);

        match tokens.current_kind() {
            TokenKind::FLOAT => {
                let value = tokens.current_value().into();
                tokens.advance();
                let attributes = enrich(tokens, &self.config, start);
                Ok(ConstExpr::Float(FloatLiteral { value, attributes }))
            }
            TokenKind::INTEGER => {
                let value = tokens.current_value().into();
                tokens.advance();
                let attributes = enrich(tokens, &self.config, start);
                Ok(ConstExpr::Integer(IntegerLiteral { value, attributes }))
            }
            kind if kind.is_string() => {
                let raw = tokens.current_value();
                tokens.advance();
                let (value, quote) = if trim_strings || self.config.quote_aware_strings {
                    (unescape(raw), Some(quote_style(kind)))
                } else {
                    (raw.to_string(), None)
                };
                let attributes = enrich(tokens, &self.config, start);
                Ok(ConstExpr::String(StringLiteral {
                    value,
                    quote,
                    attributes,
                }))
            }
            TokenKind::IDENTIFIER => self.parse_identifier(tokens, trim_strings, start),
            TokenKind::OPEN_SQUARE_BRACKET => {
                tokens.advance();
                self.parse_array(tokens, TokenKind::CLOSE_SQUARE_BRACKET, trim_strings, start)
            }
            _ => Err(tokens.error(TokenKind::IDENTIFIER, None)),
        }
    }

    fn parse_identifier(
        &self,
        tokens: &mut TokenIterator<'_>,
        trim_strings: bool,
        start: Start,
    ) -> Result<ConstExpr, ParseError> {
        let identifier = tokens.current_value();
        tokens.advance();

        match identifier.to_ascii_lowercase().as_str() {
            "true" | "false" => {
                let attributes = enrich(tokens, &self.config, start);
                return Ok(ConstExpr::Bool(BoolLiteral {
                    value: identifier.eq_ignore_ascii_case("true"),
                    attributes,
                }));
            }
            "null" => {
                let attributes = enrich(tokens, &self.config, start);
                return Ok(ConstExpr::Null(NullLiteral { attributes }));
            }
            "array" if tokens.is_kind(TokenKind::OPEN_PARENTHESES) => {
                tokens.advance();
                return self.parse_array(tokens, TokenKind::CLOSE_PARENTHESES, trim_strings, start);
            }
            "new" if tokens.is_kind(TokenKind::IDENTIFIER) => {
                return self.parse_new(tokens, trim_strings, start);
            }
            _ => {}
        }

        if !tokens.try_consume(TokenKind::DOUBLE_COLON) {
            let attributes = enrich(tokens, &self.config, start);
            return Ok(ConstExpr::Fetch(ConstFetch {
                class_name: Default::default(),
                name: identifier.into(),
                attributes,
            }));
        }

        // `Class::NAME`, `Class::PREFIX_*`, `Class::*`
        let mut name = String::new();
        let mut last = None;
        loop {
            if last != Some(TokenKind::IDENTIFIER) && tokens.is_kind(TokenKind::IDENTIFIER) {
                name.push_str(tokens.current_value());
                tokens.advance();
                last = Some(TokenKind::IDENTIFIER);
                if tokens.is_preceded_by_horizontal_whitespace() {
                    break;
                }
                continue;
            }
            if last != Some(TokenKind::WILDCARD) && tokens.try_consume(TokenKind::WILDCARD) {
                name.push('*');
                last = Some(TokenKind::WILDCARD);
                if tokens.is_preceded_by_horizontal_whitespace() {
                    break;
                }
                continue;
            }
            if last.is_none() {
                return Err(tokens.error(TokenKind::WILDCARD, None));
            }
            break;
        }

        let attributes = enrich(tokens, &self.config, start);
        Ok(ConstExpr::Fetch(ConstFetch {
            class_name: identifier.into(),
            name: name.into(),
            attributes,
        }))
    }

    fn parse_new(
        &self,
        tokens: &mut TokenIterator<'_>,
        trim_strings: bool,
        start: Start,
    ) -> Result<ConstExpr, ParseError> {
        let class_name = tokens.current_value().into();
        tokens.consume(TokenKind::IDENTIFIER)?;

        let mut args = Vec::new();
        if tokens.try_consume(TokenKind::OPEN_PARENTHESES) {
            tokens.skip_new_line_tokens();
            if !tokens.is_kind(TokenKind::CLOSE_PARENTHESES) {
                loop {
                    args.push(self.parse_with(tokens, trim_strings)?);
                    tokens.skip_new_line_tokens();
                    if !tokens.try_consume(TokenKind::COMMA) {
                        break;
                    }
                    tokens.skip_new_line_tokens();
                    if tokens.is_kind(TokenKind::CLOSE_PARENTHESES) {
                        break;
                    }
                }
            }
            tokens.consume(TokenKind::CLOSE_PARENTHESES)?;
        }

        let attributes = enrich(tokens, &self.config, start);
        Ok(ConstExpr::New(NewExpr {
            class_name,
            args,
            attributes,
        }))
    }

    fn parse_array(
        &self,
        tokens: &mut TokenIterator<'_>,
        end: TokenKind,
        trim_strings: bool,
        start: Start,
    ) -> Result<ConstExpr, ParseError> {
        let mut items = Vec::new();
        tokens.skip_new_line_tokens();

        if !tokens.try_consume(end) {
            loop {
                items.push(self.parse_array_item(tokens, trim_strings)?);
                tokens.skip_new_line_tokens();
                if !tokens.try_consume(TokenKind::COMMA) {
                    break;
                }
                tokens.skip_new_line_tokens();
                if tokens.is_kind(end) {
                    break;
                }
            }
            tokens.consume(end)?;
        }

        let attributes = enrich(tokens, &self.config, start);
        Ok(ConstExpr::Array(ConstArray { items, attributes }))
    }

    fn parse_array_item(
        &self,
        tokens: &mut TokenIterator<'_>,
        trim_strings: bool,
    ) -> Result<ConstArrayItem, ParseError> {
        let comments = tokens.take_comments();
        let start = Start::at(tokens);

        let first = self.parse_with(tokens, trim_strings)?;
        let (key, value) = if tokens.try_consume(TokenKind::DOUBLE_ARROW) {
            (Some(first), self.parse_with(tokens, trim_strings)?)
        } else {
            (None, first)
        };

        let attributes = enrich_with_comments(tokens, &self.config, start, comments);
        Ok(ConstArrayItem {
            key,
            value,
            attributes,
        })
    }
}

pub(crate) fn quote_style(kind: TokenKind) -> QuoteStyle {
    if kind == TokenKind::DOUBLE_QUOTED_STRING {
        QuoteStyle::Double
    } else {
        QuoteStyle::Single
    }
}

/// Strip the delimiters of a quoted string token and resolve its escapes
pub(crate) fn unescape(raw: &str) -> String {
    let mut chars = raw.chars();
    let Some(quote) = chars.next() else {
        return String::new();
    };
    let body = chars.as_str();
    let body = body.strip_suffix(quote).unwrap_or(body);

    if quote == '\'' {
        return unescape_single(body);
    }
    unescape_double(body)
}

fn unescape_single(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' && matches!(chars.peek(), Some('\\' | '\'')) {
            if let Some(next) = chars.next() {
                out.push(next);
            }
            continue;
        }
        out.push(c);
    }
    out
}

fn unescape_double(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(&next) = chars.peek() else {
            out.push('\\');
            break;
        };
        let simple = match next {
            'n' => Some('\n'),
            't' => Some('\t'),
            'r' => Some('\r'),
            'v' => Some('\x0b'),
            'e' => Some('\x1b'),
            'f' => Some('\x0c'),
            '\\' => Some('\\'),
            '$' => Some('$'),
            '"' => Some('"'),
            _ => None,
        };
        if let Some(resolved) = simple {
            chars.next();
            out.push(resolved);
            continue;
        }
        match next {
            'x' => {
                chars.next();
                let digits = take_while_max(&mut chars, 2, |c| c.is_ascii_hexdigit());
                match u32::from_str_radix(&digits, 16).ok().and_then(char::from_u32) {
                    Some(resolved) if !digits.is_empty() => out.push(resolved),
                    _ => {
                        out.push_str("\\x");
                        out.push_str(&digits);
                    }
                }
            }
            'u' => {
                chars.next();
                if chars.peek() != Some(&'{') {
                    out.push_str("\\u");
                    continue;
                }
                chars.next();
                let digits = take_while_max(&mut chars, 6, |c| c.is_ascii_hexdigit());
                let closed = chars.peek() == Some(&'}');
                match u32::from_str_radix(&digits, 16).ok().and_then(char::from_u32) {
                    Some(resolved) if closed => {
                        chars.next();
                        out.push(resolved);
                    }
                    _ => {
                        out.push_str("\\u{");
                        out.push_str(&digits);
                    }
                }
            }
            '0'..='7' => {
                let digits = take_while_max(&mut chars, 3, |c| ('0'..='7').contains(&c));
                let code = u32::from_str_radix(&digits, 8).unwrap_or(0) & 0xFF;
                out.push(char::from_u32(code).unwrap_or('\0'));
            }
            _ => out.push('\\'),
        }
    }
    out
}

fn take_while_max(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    max: usize,
    pred: impl Fn(char) -> bool,
) -> String {
    let mut taken = String::new();
    while taken.len() < max {
        match chars.peek() {
            Some(&c) if pred(c) => {
                taken.push(c);
                chars.next();
            }
            _ => break,
        }
    }
    taken
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse(input: &str) -> Result<ConstExpr, ParseError> {
        let mut tokens = TokenIterator::from_text(input);
        ConstExprParser::default().parse(&mut tokens)
    }

    #[rstest]
    #[case("123", "123")]
    #[case("-0x1F", "-0x1F")]
    #[case("1_000", "1_000")]
    #[case("1.5e-3", "1.5e-3")]
    #[case("'foo'", "'foo'")]
    #[case("TRUE", "true")]
    #[case("Null", "null")]
    #[case("FOO", "FOO")]
    #[case("Foo::BAR", "Foo::BAR")]
    #[case("Foo::BAR_*", "Foo::BAR_*")]
    #[case("Foo::*", "Foo::*")]
    #[case("array(1, 2,)", "[1, 2]")]
    #[case("['a' => 1, 'b' => [true]]", "['a' => 1, 'b' => [true]]")]
    #[case("new Foo(1, 'x')", "new Foo(1, 'x')")]
    fn test_parse_and_print(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(parse(input).unwrap().to_string(), expected);
    }

    #[test]
    fn test_numbers_are_verbatim() {
        let ConstExpr::Float(float) = parse("+.5E10").unwrap() else {
            panic!("expected float");
        };
        assert_eq!(float.value, "+.5E10");
    }

    #[test]
    fn test_both_array_forms_have_the_same_shape() {
        assert_eq!(parse("array(1, 'a' => 2)").unwrap(), parse("[1, 'a' => 2]").unwrap());
    }

    #[test]
    fn test_double_colon_requires_name_or_wildcard() {
        let err = parse("Foo::'bar'").unwrap_err();
        assert_eq!(err.expected_kind, TokenKind::WILDCARD);
        assert_eq!(err.current_kind, TokenKind::SINGLE_QUOTED_STRING);
        assert_eq!(err.offset_usize(), 5);
    }

    #[test]
    fn test_unexpected_token_is_reported() {
        let err = parse(")").unwrap_err();
        assert_eq!(err.expected_kind, TokenKind::IDENTIFIER);
        assert_eq!(err.current_text, ")");
    }

    #[test]
    fn test_quote_aware_strings_unescape() {
        let mut tokens = TokenIterator::from_text(r#""a\tb\"c""#);
        let parser = ConstExprParser::new(ParserConfig::default().with_quote_aware_strings(true));
        let ConstExpr::String(string) = parser.parse(&mut tokens).unwrap() else {
            panic!("expected string");
        };
        assert_eq!(string.value, "a\tb\"c");
        assert_eq!(string.quote, Some(QuoteStyle::Double));
    }

    #[rstest]
    #[case(r"'it\'s'", "it's")]
    #[case(r"'a\nb'", r"a\nb")]
    #[case(r#""\x41\101\u{1F600}""#, "AA\u{1F600}")]
    #[case(r#""\q""#, r"\q")]
    fn test_unescape(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(unescape(raw), expected);
    }

    #[test]
    fn test_index_attributes_cover_array() {
        let mut tokens = TokenIterator::from_text("[1, 2]");
        let parser = ConstExprParser::new(ParserConfig::default().with_indexes(true));
        let expr = parser.parse(&mut tokens).unwrap();
        assert_eq!(expr.attributes().index_range(), Some((0, 5)));
    }
}
