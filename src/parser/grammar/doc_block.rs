//! Doc block grammar
//!
//! ```text
//! doc_block := '/**' EOL? ( child ( EOL child )* )? '*/'
//! child     := TAG tag_value | text
//! ```
//!
//! A tag whose value fails to parse is kept as an invalid value holding the
//! raw text of its line and the error, so one bad tag never fails the block.

use smol_str::SmolStr;

use crate::ast::{DocBlock, DocChild, InvalidTagValue, TagNode, TagValue, TextNode};
use crate::parser::{ParseError, ParserConfig, TokenIterator, TokenKind};

use super::tags::{TagValueParser, parse_text};
use super::{Start, enrich};

#[derive(Debug, Clone, Copy, Default)]
pub struct DocBlockParser {
    config: ParserConfig,
    tags: TagValueParser,
}

impl DocBlockParser {
    pub fn new(config: ParserConfig) -> Self {
        Self {
            config,
            tags: TagValueParser::new(config),
        }
    }

    /// Parse a whole block; fails only when the opening `/**` is missing
    pub fn parse(&self, tokens: &mut TokenIterator<'_>) -> Result<DocBlock, ParseError> {
        let start = Start { index: 0, line: 1 };
        tokens.consume(TokenKind::OPEN_PHPDOC)?;
        tokens.try_consume(TokenKind::PHPDOC_EOL);

        let mut children = Vec::new();
        if !tokens.is_kind(TokenKind::CLOSE_PHPDOC) {
            children.push(self.parse_child(tokens));
            while tokens.try_consume(TokenKind::PHPDOC_EOL)
                && !tokens.is_kind(TokenKind::CLOSE_PHPDOC)
            {
                children.push(self.parse_child(tokens));
            }
        }

        if let Err(error) = tokens.consume(TokenKind::CLOSE_PHPDOC) {
            tracing::debug!("[DOC] Unterminated doc block: {}", error);
            children.push(DocChild::Tag(self.unterminated_tag(tokens, &children, error)));
        }

        let attributes = enrich(tokens, &self.config, start);
        Ok(DocBlock {
            children,
            attributes,
        })
    }

    fn parse_child(&self, tokens: &mut TokenIterator<'_>) -> DocChild {
        if tokens.is_kind(TokenKind::PHPDOC_TAG) {
            return DocChild::Tag(self.parse_tag(tokens));
        }

        let start = Start::at(tokens);
        let text = parse_text(tokens);
        let attributes = enrich(tokens, &self.config, start);
        DocChild::Text(TextNode { text, attributes })
    }

    /// Parse `@name value` with the cursor on the tag name
    pub fn parse_tag(&self, tokens: &mut TokenIterator<'_>) -> TagNode {
        let start = Start::at(tokens);
        let name = SmolStr::from(tokens.current_value());
        tokens.advance();

        let value = self.parse_tag_value(tokens, &name);
        let attributes = enrich(tokens, &self.config, start);
        TagNode {
            name,
            value,
            attributes,
        }
    }

    /// Parse the value of tag `name`, recovering from errors as an invalid value
    pub fn parse_tag_value(&self, tokens: &mut TokenIterator<'_>, name: &str) -> TagValue {
        let start = Start::at(tokens);
        tokens.push_save_point();
        match self.tags.parse(tokens, name) {
            Ok(value) => {
                tokens.drop_save_point();
                value
            }
            Err(error) => {
                tokens.rollback();
                tracing::trace!("[DOC] Invalid value for '{}': {}", name, error);
                let value = parse_text(tokens);
                let attributes = enrich(tokens, &self.config, start);
                TagValue::Invalid(InvalidTagValue {
                    value,
                    error,
                    attributes,
                })
            }
        }
    }

    fn unterminated_tag(
        &self,
        tokens: &mut TokenIterator<'_>,
        children: &[DocChild],
        error: ParseError,
    ) -> TagNode {
        let name = match children.last() {
            Some(DocChild::Tag(tag)) => tag.name.clone(),
            _ => SmolStr::default(),
        };
        let start = Start::at(tokens);
        let value = TagValue::Invalid(InvalidTagValue {
            value: error.to_string(),
            error,
            attributes: enrich(tokens, &self.config, start),
        });
        TagNode {
            name,
            value,
            attributes: enrich(tokens, &self.config, start),
        }
    }
}
