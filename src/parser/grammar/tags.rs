//! Per-tag value grammars
//!
//! Each handler starts right after the tag name and stops at the end of the
//! tag's line. Errors propagate to the block parser, which turns them into
//! invalid values.

use smol_str::SmolStr;

use crate::ast::{
    DeprecatedTagValue, ExtendsTagValue, GenericTagValue, IdentifierType, MethodParameter,
    MethodTagValue, ParamTagValue, PropertyTagValue, TagValue, TemplateTagValue,
    TypeAliasTagValue, TypeNode, TypeTagValue, TypelessParamTagValue, VarTagValue,
};
use crate::parser::{ParseError, ParserConfig, TokenIterator, TokenKind};

use super::const_expr::ConstExprParser;
use super::types::TypeParser;
use super::{Start, enrich};

const END_OF_TEXT: [TokenKind; 3] = [
    TokenKind::PHPDOC_EOL,
    TokenKind::CLOSE_PHPDOC,
    TokenKind::END,
];

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct TagValueParser {
    config: ParserConfig,
    types: TypeParser,
    const_expr: ConstExprParser,
}

impl TagValueParser {
    pub(crate) fn new(config: ParserConfig) -> Self {
        Self {
            config,
            types: TypeParser::new(config),
            const_expr: ConstExprParser::new(config),
        }
    }

    pub(crate) fn parse(
        &self,
        tokens: &mut TokenIterator<'_>,
        tag_name: &str,
    ) -> Result<TagValue, ParseError> {
        let start = Start::at(tokens);
        match canonical_name(tag_name).as_str() {
            "@param" => self.parse_param(tokens, start),
            "@var" => self.parse_var(tokens, start),
            "@return" | "@returns" => self.parse_type_tag(tokens, start).map(TagValue::Return),
            "@throws" => self.parse_type_tag(tokens, start).map(TagValue::Throws),
            "@mixin" => self.parse_type_tag(tokens, start).map(TagValue::Mixin),
            "@deprecated" => {
                let description = self.parse_description(tokens, false)?;
                let attributes = enrich(tokens, &self.config, start);
                Ok(TagValue::Deprecated(DeprecatedTagValue {
                    description,
                    attributes,
                }))
            }
            "@property" | "@property-read" | "@property-write" => {
                self.parse_property(tokens, start)
            }
            "@method" => self.parse_method(tokens, start),
            "@template" | "@template-covariant" | "@template-contravariant" => self
                .parse_template(tokens, start, true)
                .map(TagValue::Template),
            "@extends" | "@implements" | "@use" => self.parse_extends(tokens, start),
            "@phpstan-type" | "@psalm-type" => self.parse_type_alias(tokens, start),
            _ => {
                let value = parse_text(tokens);
                let attributes = enrich(tokens, &self.config, start);
                Ok(TagValue::Generic(GenericTagValue { value, attributes }))
            }
        }
    }

    fn parse_param(
        &self,
        tokens: &mut TokenIterator<'_>,
        start: Start,
    ) -> Result<TagValue, ParseError> {
        if tokens.is_any(&[
            TokenKind::REFERENCE,
            TokenKind::VARIADIC,
            TokenKind::VARIABLE,
        ]) {
            let by_reference = tokens.try_consume(TokenKind::REFERENCE);
            let variadic = tokens.try_consume(TokenKind::VARIADIC);
            let name = parse_required_variable(tokens)?;
            let description = self.parse_description(tokens, false)?;
            let attributes = enrich(tokens, &self.config, start);
            return Ok(TagValue::TypelessParam(TypelessParamTagValue {
                by_reference,
                variadic,
                name,
                description,
                attributes,
            }));
        }

        let ty = self.types.parse(tokens)?;
        let by_reference = tokens.try_consume(TokenKind::REFERENCE);
        let variadic = tokens.try_consume(TokenKind::VARIADIC);
        let name = parse_required_variable(tokens)?;
        let description = self.parse_description(tokens, false)?;
        let attributes = enrich(tokens, &self.config, start);
        Ok(TagValue::Param(ParamTagValue {
            ty,
            by_reference,
            variadic,
            name,
            description,
            attributes,
        }))
    }

    fn parse_var(&self, tokens: &mut TokenIterator<'_>, start: Start) -> Result<TagValue, ParseError> {
        let ty = self.types.parse(tokens)?;
        let name = if tokens.is_any(&[TokenKind::VARIABLE, TokenKind::THIS_VARIABLE])
            && tokens.is_preceded_by_horizontal_whitespace()
        {
            let name = tokens.current_value();
            tokens.advance();
            SmolStr::from(name)
        } else {
            SmolStr::default()
        };
        let description = self.parse_description(tokens, name.is_empty())?;
        let attributes = enrich(tokens, &self.config, start);
        Ok(TagValue::Var(VarTagValue {
            ty,
            name,
            description,
            attributes,
        }))
    }

    fn parse_type_tag(
        &self,
        tokens: &mut TokenIterator<'_>,
        start: Start,
    ) -> Result<TypeTagValue, ParseError> {
        let ty = self.types.parse(tokens)?;
        let description = self.parse_description(tokens, true)?;
        let attributes = enrich(tokens, &self.config, start);
        Ok(TypeTagValue {
            ty,
            description,
            attributes,
        })
    }

    fn parse_property(
        &self,
        tokens: &mut TokenIterator<'_>,
        start: Start,
    ) -> Result<TagValue, ParseError> {
        let ty = self.types.parse(tokens)?;
        let name = parse_required_variable(tokens)?;
        let description = self.parse_description(tokens, false)?;
        let attributes = enrich(tokens, &self.config, start);
        Ok(TagValue::Property(PropertyTagValue {
            ty,
            name,
            description,
            attributes,
        }))
    }

    /// A leading `static` always marks a static method, so a method whose only
    /// written return type is `static` must be spelled `static static name()`
    fn parse_method(
        &self,
        tokens: &mut TokenIterator<'_>,
        start: Start,
    ) -> Result<TagValue, ParseError> {
        let is_static = tokens.try_consume_value(TokenKind::IDENTIFIER, "static");
        let return_type_or_name = self.types.parse(tokens)?;

        let (return_type, name) = if tokens.is_kind(TokenKind::IDENTIFIER) {
            let name = SmolStr::from(tokens.current_value());
            tokens.advance();
            (Some(return_type_or_name), name)
        } else if let TypeNode::Identifier(identifier) = return_type_or_name {
            (None, identifier.name)
        } else {
            return Err(tokens.error(TokenKind::IDENTIFIER, None));
        };

        let mut templates = Vec::new();
        if tokens.try_consume(TokenKind::OPEN_ANGLE_BRACKET) {
            loop {
                let template_start = Start::at(tokens);
                templates.push(self.parse_template(tokens, template_start, false)?);
                if !tokens.try_consume(TokenKind::COMMA) {
                    break;
                }
            }
            tokens.consume(TokenKind::CLOSE_ANGLE_BRACKET)?;
        }

        let mut parameters = Vec::new();
        if tokens.try_consume(TokenKind::OPEN_PARENTHESES) {
            while !tokens.is_kind(TokenKind::CLOSE_PARENTHESES) {
                parameters.push(self.parse_method_parameter(tokens)?);
                if !tokens.try_consume(TokenKind::COMMA) {
                    break;
                }
            }
            tokens.consume(TokenKind::CLOSE_PARENTHESES)?;
        }

        let description = self.parse_description(tokens, false)?;
        let attributes = enrich(tokens, &self.config, start);
        Ok(TagValue::Method(MethodTagValue {
            is_static,
            return_type,
            name,
            templates,
            parameters,
            description,
            attributes,
        }))
    }

    fn parse_method_parameter(
        &self,
        tokens: &mut TokenIterator<'_>,
    ) -> Result<MethodParameter, ParseError> {
        let start = Start::at(tokens);
        let ty = if tokens.is_any(&[
            TokenKind::IDENTIFIER,
            TokenKind::OPEN_PARENTHESES,
            TokenKind::NULLABLE,
        ]) {
            Some(self.types.parse(tokens)?)
        } else {
            None
        };
        let by_reference = tokens.try_consume(TokenKind::REFERENCE);
        let variadic = tokens.try_consume(TokenKind::VARIADIC);
        let name = parse_required_variable(tokens)?;
        let default = if tokens.try_consume(TokenKind::EQUAL) {
            Some(self.const_expr.parse(tokens)?)
        } else {
            None
        };

        let attributes = enrich(tokens, &self.config, start);
        Ok(MethodParameter {
            ty,
            by_reference,
            variadic,
            name,
            default,
            attributes,
        })
    }

    /// `T of Bound = Default`; method templates carry no description
    fn parse_template(
        &self,
        tokens: &mut TokenIterator<'_>,
        start: Start,
        with_description: bool,
    ) -> Result<TemplateTagValue, ParseError> {
        let name = SmolStr::from(tokens.current_value());
        tokens.consume(TokenKind::IDENTIFIER)?;

        let bound = if tokens.try_consume_value(TokenKind::IDENTIFIER, "of")
            || tokens.try_consume_value(TokenKind::IDENTIFIER, "as")
        {
            Some(self.types.parse(tokens)?)
        } else {
            None
        };
        let default = if tokens.try_consume(TokenKind::EQUAL) {
            Some(self.types.parse(tokens)?)
        } else {
            None
        };
        let description = if with_description {
            self.parse_description(tokens, false)?
        } else {
            String::new()
        };

        let attributes = enrich(tokens, &self.config, start);
        Ok(TemplateTagValue {
            name,
            bound,
            default,
            description,
            attributes,
        })
    }

    fn parse_extends(
        &self,
        tokens: &mut TokenIterator<'_>,
        start: Start,
    ) -> Result<TagValue, ParseError> {
        let base_start = Start::at(tokens);
        let name = tokens.current_value();
        tokens.consume(TokenKind::IDENTIFIER)?;
        let base = IdentifierType {
            name: name.into(),
            attributes: enrich(tokens, &self.config, base_start),
        };
        let ty = self.types.parse_generic(tokens, base, base_start)?;
        let description = self.parse_description(tokens, true)?;

        let attributes = enrich(tokens, &self.config, start);
        Ok(TagValue::Extends(ExtendsTagValue {
            ty,
            description,
            attributes,
        }))
    }

    fn parse_type_alias(
        &self,
        tokens: &mut TokenIterator<'_>,
        start: Start,
    ) -> Result<TagValue, ParseError> {
        let alias = SmolStr::from(tokens.current_value());
        tokens.consume(TokenKind::IDENTIFIER)?;
        tokens.try_consume(TokenKind::EQUAL);
        let ty = self.types.parse(tokens)?;
        if !tokens.is_any(&END_OF_TEXT) {
            return Err(tokens.error(TokenKind::PHPDOC_EOL, None));
        }

        let attributes = enrich(tokens, &self.config, start);
        Ok(TagValue::TypeAlias(TypeAliasTagValue {
            alias,
            ty,
            attributes,
        }))
    }

    /// Rest of the line, trimmed
    ///
    /// With `limit_start`, a description glued to the preceding type or
    /// starting with a type operator means the type itself was malformed.
    fn parse_description(
        &self,
        tokens: &mut TokenIterator<'_>,
        limit_start: bool,
    ) -> Result<String, ParseError> {
        if limit_start {
            if tokens.is_any(&[TokenKind::UNION, TokenKind::INTERSECTION]) {
                return Err(tokens.error(TokenKind::OTHER, None));
            }
            if !tokens.is_any(&END_OF_TEXT) && !tokens.is_preceded_by_horizontal_whitespace() {
                return Err(tokens.error(TokenKind::HORIZONTAL_WS, None));
            }
        }
        Ok(parse_text(tokens))
    }
}

/// `@phpstan-param` and `@psalm-param` behave like `@param`; the alias tags keep their name
fn canonical_name(name: &str) -> String {
    if matches!(name, "@phpstan-type" | "@psalm-type") {
        return name.to_string();
    }
    match name
        .strip_prefix("@phpstan-")
        .or_else(|| name.strip_prefix("@psalm-"))
    {
        Some(rest) => format!("@{rest}"),
        None => name.to_string(),
    }
}

fn parse_required_variable(tokens: &mut TokenIterator<'_>) -> Result<SmolStr, ParseError> {
    let name = tokens.current_value();
    tokens.consume(TokenKind::VARIABLE)?;
    Ok(name.into())
}

/// Everything up to the end of the current doc line
pub(crate) fn parse_text(tokens: &mut TokenIterator<'_>) -> String {
    tokens
        .join_until(&END_OF_TEXT)
        .trim_matches([' ', '\t'])
        .to_string()
}
