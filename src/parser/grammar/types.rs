//! Type expression grammar
//!
//! ```text
//! type        := '?' nullable_tail | atomic ( ( '|' atomic )+ | ( '&' atomic )+ )?
//! atomic      := '(' sub_type ')' suffix*
//!              | '$this' suffix*
//!              | IDENTIFIER ( generic | callable | shape )? suffix*
//!              | const_expr suffix*
//! sub_type    := '?' nullable_tail
//!              | VARIABLE 'is' 'not'? type '?' type ':' sub_type
//!              | atomic 'is' 'not'? type '?' type ':' sub_type
//!              | atomic ( ( '|' atomic )+ | ( '&' atomic )+ )?
//! suffix      := '[' ']' | '[' type ']'
//! ```
//!
//! Union and intersection never mix at one level: `A & B | C` stops after
//! `A & B` and leaves `|` to the caller. Inside parentheses newlines between
//! members are allowed.

use smol_str::SmolStr;

use crate::ast::{
    ArrayShapeItem, ArrayShapeKind, ArrayShapeType, ArrayType, CallableParameter, CallableType,
    ConditionalForParameterType, ConditionalType, ConstExpr, ConstType, GenericType,
    IdentifierType, IntersectionType, IntegerLiteral, NullableType, ObjectShapeItem,
    ObjectShapeType, OffsetAccessType, ShapeKey, StringLiteral, ThisType, TypeNode, UnionType,
    Variance,
};
use crate::parser::{ParseError, ParserConfig, TokenIterator, TokenKind};

use super::const_expr::{ConstExprParser, quote_style, unescape};
use super::{Start, enrich, enrich_with_comments};

#[derive(Debug, Clone, Copy, Default)]
pub struct TypeParser {
    config: ParserConfig,
    const_expr: ConstExprParser,
}

impl TypeParser {
    pub fn new(config: ParserConfig) -> Self {
        Self {
            config,
            const_expr: ConstExprParser::new(config),
        }
    }

    /// Parse one type expression starting at the current token
    pub fn parse(&self, tokens: &mut TokenIterator<'_>) -> Result<TypeNode, ParseError> {
        let start = Start::at(tokens);
        if tokens.is_kind(TokenKind::NULLABLE) {
            return self.parse_nullable(tokens);
        }

        let ty = self.parse_atomic(tokens)?;
        match tokens.current_kind() {
            TokenKind::UNION => self.parse_union(tokens, ty, start, false),
            TokenKind::INTERSECTION => self.parse_intersection(tokens, ty, start, false),
            _ => Ok(ty),
        }
    }

    /// The inside of a parenthesized group
    fn sub_parse(&self, tokens: &mut TokenIterator<'_>) -> Result<TypeNode, ParseError> {
        let start = Start::at(tokens);
        if tokens.is_kind(TokenKind::NULLABLE) {
            return self.parse_nullable(tokens);
        }
        if tokens.is_kind(TokenKind::VARIABLE) {
            return self.parse_conditional_for_parameter(tokens, start);
        }

        let ty = self.parse_atomic(tokens)?;
        if tokens.is_kind(TokenKind::IDENTIFIER) && tokens.is_value("is") {
            return self.parse_conditional(tokens, ty, start);
        }

        tokens.skip_new_line_tokens();
        match tokens.current_kind() {
            TokenKind::UNION => self.parse_union(tokens, ty, start, true),
            TokenKind::INTERSECTION => self.parse_intersection(tokens, ty, start, true),
            _ => Ok(ty),
        }
    }

    fn parse_union(
        &self,
        tokens: &mut TokenIterator<'_>,
        first: TypeNode,
        start: Start,
        multiline: bool,
    ) -> Result<TypeNode, ParseError> {
        let types = self.parse_members(tokens, first, TokenKind::UNION, multiline)?;
        let attributes = enrich(tokens, &self.config, start);
        Ok(TypeNode::Union(UnionType { types, attributes }))
    }

    fn parse_intersection(
        &self,
        tokens: &mut TokenIterator<'_>,
        first: TypeNode,
        start: Start,
        multiline: bool,
    ) -> Result<TypeNode, ParseError> {
        let types = self.parse_members(tokens, first, TokenKind::INTERSECTION, multiline)?;
        let attributes = enrich(tokens, &self.config, start);
        Ok(TypeNode::Intersection(IntersectionType { types, attributes }))
    }

    fn parse_members(
        &self,
        tokens: &mut TokenIterator<'_>,
        first: TypeNode,
        separator: TokenKind,
        multiline: bool,
    ) -> Result<Vec<TypeNode>, ParseError> {
        let mut types = vec![first];
        while tokens.try_consume(separator) {
            if multiline {
                tokens.skip_new_line_tokens();
            }
            types.push(self.parse_atomic(tokens)?);
            if multiline {
                tokens.skip_new_line_tokens();
            }
        }
        Ok(types)
    }

    fn parse_atomic(&self, tokens: &mut TokenIterator<'_>) -> Result<TypeNode, ParseError> {
        let start = Start::at(tokens);

        if tokens.try_consume(TokenKind::OPEN_PARENTHESES) {
            tokens.skip_new_line_tokens();
            let ty = self.sub_parse(tokens)?;
            tokens.skip_new_line_tokens();
            tokens.consume(TokenKind::CLOSE_PARENTHESES)?;
            return Ok(self.try_parse_array_or_offset_access(tokens, ty, start));
        }

        if tokens.try_consume(TokenKind::THIS_VARIABLE) {
            let attributes = enrich(tokens, &self.config, start);
            let ty = TypeNode::This(ThisType { attributes });
            return Ok(self.try_parse_array_or_offset_access(tokens, ty, start));
        }

        if tokens.is_kind(TokenKind::IDENTIFIER) {
            // `Foo::BAR` is a constant, not a type name
            tokens.push_save_point();
            let name = tokens.current_value();
            tokens.advance();
            if tokens.is_kind(TokenKind::DOUBLE_COLON) {
                tokens.rollback();
            } else {
                tokens.drop_save_point();
                let identifier = IdentifierType {
                    name: name.into(),
                    attributes: enrich(tokens, &self.config, start),
                };
                return self.parse_identifier_suffix(tokens, identifier, start, true);
            }
        }

        self.parse_const_type(tokens, start)
    }

    /// Whatever may follow a bare type name
    fn parse_identifier_suffix(
        &self,
        tokens: &mut TokenIterator<'_>,
        identifier: IdentifierType,
        start: Start,
        allow_callable: bool,
    ) -> Result<TypeNode, ParseError> {
        match tokens.current_kind() {
            TokenKind::OPEN_ANGLE_BRACKET => {
                if is_html(tokens) {
                    return Ok(TypeNode::Identifier(identifier));
                }
                let ty = self.parse_generic(tokens, identifier, start)?;
                Ok(self.try_parse_array_or_offset_access(tokens, ty, start))
            }
            TokenKind::OPEN_PARENTHESES if allow_callable => {
                Ok(self.try_parse_callable(tokens, identifier, start))
            }
            TokenKind::OPEN_SQUARE_BRACKET => Ok(self.try_parse_array_or_offset_access(
                tokens,
                TypeNode::Identifier(identifier),
                start,
            )),
            TokenKind::OPEN_CURLY_BRACKET if !tokens.is_preceded_by_horizontal_whitespace() => {
                let ty = if identifier.name.eq_ignore_ascii_case("object") {
                    self.parse_object_shape(tokens, start)?
                } else if let Some(kind) = ArrayShapeKind::from_name(&identifier.name) {
                    self.parse_array_shape(tokens, kind, start)?
                } else {
                    return Ok(TypeNode::Identifier(identifier));
                };
                Ok(self.try_parse_array_or_offset_access(tokens, ty, start))
            }
            _ => Ok(TypeNode::Identifier(identifier)),
        }
    }

    fn parse_const_type(
        &self,
        tokens: &mut TokenIterator<'_>,
        start: Start,
    ) -> Result<TypeNode, ParseError> {
        // Reported at the first token, whatever the constant parser consumed
        let error = tokens.error(TokenKind::IDENTIFIER, None);
        let expr = self.const_expr.parse_with(tokens, true)?;
        if matches!(expr, ConstExpr::Array(_)) {
            return Err(error);
        }

        let attributes = enrich(tokens, &self.config, start);
        let ty = TypeNode::Const(ConstType { expr, attributes });
        Ok(self.try_parse_array_or_offset_access(tokens, ty, start))
    }

    /// `?` followed by a name, optionally generic
    fn parse_nullable(&self, tokens: &mut TokenIterator<'_>) -> Result<TypeNode, ParseError> {
        let start = Start::at(tokens);
        tokens.consume(TokenKind::NULLABLE)?;

        let inner_start = Start::at(tokens);
        let name = tokens.current_value();
        tokens.consume(TokenKind::IDENTIFIER)?;
        let identifier = IdentifierType {
            name: name.into(),
            attributes: enrich(tokens, &self.config, inner_start),
        };
        let inner = if tokens.is_kind(TokenKind::OPEN_ANGLE_BRACKET) {
            self.parse_generic(tokens, identifier, inner_start)?
        } else {
            TypeNode::Identifier(identifier)
        };

        let attributes = enrich(tokens, &self.config, start);
        Ok(TypeNode::Nullable(NullableType {
            inner: Box::new(inner),
            attributes,
        }))
    }

    /// `<A, covariant B, *>` after an already consumed base name
    pub(crate) fn parse_generic(
        &self,
        tokens: &mut TokenIterator<'_>,
        base: IdentifierType,
        start: Start,
    ) -> Result<TypeNode, ParseError> {
        tokens.consume(TokenKind::OPEN_ANGLE_BRACKET)?;
        tokens.skip_new_line_tokens();

        let mut params = Vec::new();
        let mut variances = Vec::new();
        loop {
            let comments = tokens.take_comments();
            let (mut param, variance) = self.parse_generic_argument(tokens)?;
            if self.config.preserve_comments {
                param.attributes_mut().comments = comments;
            }
            params.push(param);
            variances.push(variance);

            tokens.skip_new_line_tokens();
            if !tokens.try_consume(TokenKind::COMMA) {
                break;
            }
            tokens.skip_new_line_tokens();
            if tokens.is_kind(TokenKind::CLOSE_ANGLE_BRACKET) {
                break;
            }
        }
        tokens.consume(TokenKind::CLOSE_ANGLE_BRACKET)?;

        let attributes = enrich(tokens, &self.config, start);
        Ok(TypeNode::Generic(GenericType {
            base,
            params,
            variances,
            attributes,
        }))
    }

    fn parse_generic_argument(
        &self,
        tokens: &mut TokenIterator<'_>,
    ) -> Result<(TypeNode, Variance), ParseError> {
        let start = Start::at(tokens);
        if tokens.try_consume(TokenKind::WILDCARD) {
            let attributes = enrich(tokens, &self.config, start);
            let mixed = TypeNode::Identifier(IdentifierType {
                name: "mixed".into(),
                attributes,
            });
            return Ok((mixed, Variance::Bivariant));
        }

        let variance = if tokens.try_consume_value(TokenKind::IDENTIFIER, "contravariant") {
            Variance::Contravariant
        } else if tokens.try_consume_value(TokenKind::IDENTIFIER, "covariant") {
            Variance::Covariant
        } else {
            Variance::Invariant
        };
        Ok((self.parse(tokens)?, variance))
    }

    /// One or more `[]` / `[K]` suffixes; a malformed suffix is left unconsumed
    fn try_parse_array_or_offset_access(
        &self,
        tokens: &mut TokenIterator<'_>,
        mut ty: TypeNode,
        start: Start,
    ) -> TypeNode {
        while tokens.is_kind(TokenKind::OPEN_SQUARE_BRACKET) {
            tokens.push_save_point();
            let can_be_offset = !tokens.is_preceded_by_horizontal_whitespace();
            match self.parse_brackets(tokens, can_be_offset) {
                Ok(offset) => {
                    tokens.drop_save_point();
                    let attributes = enrich(tokens, &self.config, start);
                    ty = match offset {
                        Some(offset) => TypeNode::OffsetAccess(OffsetAccessType {
                            inner: Box::new(ty),
                            offset: Box::new(offset),
                            attributes,
                        }),
                        None => TypeNode::Array(ArrayType {
                            inner: Box::new(ty),
                            attributes,
                        }),
                    };
                }
                Err(_) => {
                    tokens.rollback();
                    break;
                }
            }
        }
        ty
    }

    fn parse_brackets(
        &self,
        tokens: &mut TokenIterator<'_>,
        can_be_offset: bool,
    ) -> Result<Option<TypeNode>, ParseError> {
        tokens.consume(TokenKind::OPEN_SQUARE_BRACKET)?;
        if can_be_offset && !tokens.is_kind(TokenKind::CLOSE_SQUARE_BRACKET) {
            let offset = self.parse(tokens)?;
            tokens.consume(TokenKind::CLOSE_SQUARE_BRACKET)?;
            return Ok(Some(offset));
        }
        tokens.consume(TokenKind::CLOSE_SQUARE_BRACKET)?;
        Ok(None)
    }

    /// A name followed by `(` is a callable only if the whole signature parses
    fn try_parse_callable(
        &self,
        tokens: &mut TokenIterator<'_>,
        identifier: IdentifierType,
        start: Start,
    ) -> TypeNode {
        tokens.push_save_point();
        match self.parse_callable(tokens, identifier.clone(), start) {
            Ok(ty) => {
                tokens.drop_save_point();
                ty
            }
            Err(_) => {
                tokens.rollback();
                TypeNode::Identifier(identifier)
            }
        }
    }

    fn parse_callable(
        &self,
        tokens: &mut TokenIterator<'_>,
        identifier: IdentifierType,
        start: Start,
    ) -> Result<TypeNode, ParseError> {
        tokens.consume(TokenKind::OPEN_PARENTHESES)?;
        tokens.skip_new_line_tokens();

        let mut parameters = Vec::new();
        if !tokens.is_kind(TokenKind::CLOSE_PARENTHESES) {
            parameters.push(self.parse_callable_parameter(tokens)?);
            tokens.skip_new_line_tokens();
            while tokens.try_consume(TokenKind::COMMA) {
                tokens.skip_new_line_tokens();
                if tokens.is_kind(TokenKind::CLOSE_PARENTHESES) {
                    break;
                }
                parameters.push(self.parse_callable_parameter(tokens)?);
                tokens.skip_new_line_tokens();
            }
        }
        tokens.consume(TokenKind::CLOSE_PARENTHESES)?;
        tokens.consume(TokenKind::COLON)?;

        let return_type = self.parse_callable_return_type(tokens)?;
        let attributes = enrich(tokens, &self.config, start);
        Ok(TypeNode::Callable(CallableType {
            identifier,
            parameters,
            return_type: Box::new(return_type),
            attributes,
        }))
    }

    fn parse_callable_parameter(
        &self,
        tokens: &mut TokenIterator<'_>,
    ) -> Result<CallableParameter, ParseError> {
        let comments = tokens.take_comments();
        let start = Start::at(tokens);

        let ty = self.parse(tokens)?;
        let by_reference = tokens.try_consume(TokenKind::REFERENCE);
        let variadic = tokens.try_consume(TokenKind::VARIADIC);
        let name = if tokens.is_kind(TokenKind::VARIABLE) {
            let name = tokens.current_value();
            tokens.advance();
            name.into()
        } else {
            SmolStr::default()
        };
        let optional = tokens.try_consume(TokenKind::EQUAL);

        let attributes = enrich_with_comments(tokens, &self.config, start, comments);
        Ok(CallableParameter {
            ty,
            by_reference,
            variadic,
            name,
            optional,
            attributes,
        })
    }

    /// Return types bind tighter than unions: `callable(): A|B` is a union
    fn parse_callable_return_type(
        &self,
        tokens: &mut TokenIterator<'_>,
    ) -> Result<TypeNode, ParseError> {
        let start = Start::at(tokens);

        if tokens.is_kind(TokenKind::NULLABLE) {
            return self.parse_nullable(tokens);
        }
        if tokens.try_consume(TokenKind::OPEN_PARENTHESES) {
            tokens.skip_new_line_tokens();
            let ty = self.sub_parse(tokens)?;
            tokens.skip_new_line_tokens();
            tokens.consume(TokenKind::CLOSE_PARENTHESES)?;
            return Ok(self.try_parse_array_or_offset_access(tokens, ty, start));
        }
        if tokens.try_consume(TokenKind::THIS_VARIABLE) {
            let attributes = enrich(tokens, &self.config, start);
            let ty = TypeNode::This(ThisType { attributes });
            return Ok(self.try_parse_array_or_offset_access(tokens, ty, start));
        }

        let name = tokens.current_value();
        tokens.consume(TokenKind::IDENTIFIER)?;
        let identifier = IdentifierType {
            name: name.into(),
            attributes: enrich(tokens, &self.config, start),
        };
        self.parse_identifier_suffix(tokens, identifier, start, false)
    }

    fn parse_array_shape(
        &self,
        tokens: &mut TokenIterator<'_>,
        kind: ArrayShapeKind,
        start: Start,
    ) -> Result<TypeNode, ParseError> {
        tokens.consume(TokenKind::OPEN_CURLY_BRACKET)?;

        let mut items = Vec::new();
        let mut sealed = true;
        let mut closed = false;
        loop {
            tokens.skip_new_line_tokens();
            if tokens.try_consume(TokenKind::CLOSE_CURLY_BRACKET) {
                closed = true;
                break;
            }
            if tokens.try_consume(TokenKind::VARIADIC) {
                sealed = false;
                tokens.try_consume(TokenKind::COMMA);
                break;
            }
            items.push(self.parse_array_shape_item(tokens)?);
            tokens.skip_new_line_tokens();
            if !tokens.try_consume(TokenKind::COMMA) {
                break;
            }
        }
        if !closed {
            tokens.skip_new_line_tokens();
            tokens.consume(TokenKind::CLOSE_CURLY_BRACKET)?;
        }

        let attributes = enrich(tokens, &self.config, start);
        Ok(TypeNode::ArrayShape(ArrayShapeType {
            kind,
            items,
            sealed,
            attributes,
        }))
    }

    fn parse_array_shape_item(
        &self,
        tokens: &mut TokenIterator<'_>,
    ) -> Result<ArrayShapeItem, ParseError> {
        let comments = tokens.take_comments();
        let start = Start::at(tokens);

        tokens.push_save_point();
        let (key, optional, value) = match self.parse_keyed_item(tokens, true) {
            Ok((key, optional, value)) => {
                tokens.drop_save_point();
                (Some(key), optional, value)
            }
            Err(_) => {
                tokens.rollback();
                (None, false, self.parse(tokens)?)
            }
        };

        let attributes = enrich_with_comments(tokens, &self.config, start, comments);
        Ok(ArrayShapeItem {
            key,
            optional,
            value,
            attributes,
        })
    }

    fn parse_keyed_item(
        &self,
        tokens: &mut TokenIterator<'_>,
        allow_integer_key: bool,
    ) -> Result<(ShapeKey, bool, TypeNode), ParseError> {
        let key = self.parse_shape_key(tokens, allow_integer_key)?;
        let optional = tokens.try_consume(TokenKind::NULLABLE);
        tokens.consume(TokenKind::COLON)?;
        let value = self.parse(tokens)?;
        Ok((key, optional, value))
    }

    fn parse_shape_key(
        &self,
        tokens: &mut TokenIterator<'_>,
        allow_integer: bool,
    ) -> Result<ShapeKey, ParseError> {
        let start = Start::at(tokens);
        let kind = tokens.current_kind();

        if kind == TokenKind::INTEGER && allow_integer {
            let value = tokens.current_value().into();
            tokens.advance();
            let attributes = enrich(tokens, &self.config, start);
            return Ok(ShapeKey::Const(ConstExpr::Integer(IntegerLiteral {
                value,
                attributes,
            })));
        }
        if kind.is_string() {
            let raw = tokens.current_value();
            tokens.advance();
            let mut key = StringLiteral::quoted(unescape(raw), quote_style(kind));
            key.attributes = enrich(tokens, &self.config, start);
            return Ok(ShapeKey::Const(ConstExpr::String(key)));
        }

        let name = tokens.current_value();
        tokens.consume(TokenKind::IDENTIFIER)?;
        Ok(ShapeKey::Identifier(IdentifierType {
            name: name.into(),
            attributes: enrich(tokens, &self.config, start),
        }))
    }

    fn parse_object_shape(
        &self,
        tokens: &mut TokenIterator<'_>,
        start: Start,
    ) -> Result<TypeNode, ParseError> {
        tokens.consume(TokenKind::OPEN_CURLY_BRACKET)?;

        let mut items = Vec::new();
        let mut closed = false;
        loop {
            tokens.skip_new_line_tokens();
            if tokens.try_consume(TokenKind::CLOSE_CURLY_BRACKET) {
                closed = true;
                break;
            }
            let comments = tokens.take_comments();
            let item_start = Start::at(tokens);
            let (key, optional, value) = self.parse_keyed_item(tokens, false)?;
            let attributes = enrich_with_comments(tokens, &self.config, item_start, comments);
            items.push(ObjectShapeItem {
                key,
                optional,
                value,
                attributes,
            });
            tokens.skip_new_line_tokens();
            if !tokens.try_consume(TokenKind::COMMA) {
                break;
            }
        }
        if !closed {
            tokens.skip_new_line_tokens();
            tokens.consume(TokenKind::CLOSE_CURLY_BRACKET)?;
        }

        let attributes = enrich(tokens, &self.config, start);
        Ok(TypeNode::ObjectShape(ObjectShapeType { items, attributes }))
    }

    fn parse_conditional(
        &self,
        tokens: &mut TokenIterator<'_>,
        subject: TypeNode,
        start: Start,
    ) -> Result<TypeNode, ParseError> {
        let (negated, target, if_type, else_type) = self.parse_conditional_tail(tokens)?;
        let attributes = enrich(tokens, &self.config, start);
        Ok(TypeNode::Conditional(ConditionalType {
            subject: Box::new(subject),
            target,
            if_type,
            else_type,
            negated,
            attributes,
        }))
    }

    fn parse_conditional_for_parameter(
        &self,
        tokens: &mut TokenIterator<'_>,
        start: Start,
    ) -> Result<TypeNode, ParseError> {
        let parameter_name = tokens.current_value().into();
        tokens.consume(TokenKind::VARIABLE)?;

        let (negated, target, if_type, else_type) = self.parse_conditional_tail(tokens)?;
        let attributes = enrich(tokens, &self.config, start);
        Ok(TypeNode::ConditionalForParameter(ConditionalForParameterType {
            parameter_name,
            target,
            if_type,
            else_type,
            negated,
            attributes,
        }))
    }

    /// `is [not] Target ? If : Else`
    #[allow(clippy::type_complexity)]
    fn parse_conditional_tail(
        &self,
        tokens: &mut TokenIterator<'_>,
    ) -> Result<(bool, Box<TypeNode>, Box<TypeNode>, Box<TypeNode>), ParseError> {
        tokens.consume_value(TokenKind::IDENTIFIER, "is")?;
        let negated = tokens.try_consume_value(TokenKind::IDENTIFIER, "not");
        let target = self.parse(tokens)?;

        tokens.skip_new_line_tokens();
        tokens.consume(TokenKind::NULLABLE)?;
        tokens.skip_new_line_tokens();
        let if_type = self.parse(tokens)?;

        tokens.skip_new_line_tokens();
        tokens.consume(TokenKind::COLON)?;
        tokens.skip_new_line_tokens();
        let else_type = self.sub_parse(tokens)?;

        Ok((negated, Box::new(target), Box::new(if_type), Box::new(else_type)))
    }
}

/// `Foo <b>bold</b>`: the `<` opens an HTML tag, not generic arguments
fn is_html(tokens: &TokenIterator<'_>) -> bool {
    let rest: Vec<_> = tokens.tokens()[tokens.current_index()..]
        .iter()
        .filter(|t| t.kind != TokenKind::HORIZONTAL_WS)
        .collect();

    match rest.as_slice() {
        [open, name, close, tail @ ..]
            if open.kind == TokenKind::OPEN_ANGLE_BRACKET
                && name.kind == TokenKind::IDENTIFIER
                && close.kind == TokenKind::CLOSE_ANGLE_BRACKET =>
        {
            tail.windows(3).any(|w| {
                w[0].kind == TokenKind::OPEN_ANGLE_BRACKET
                    && w[1].text == "/"
                    && w[2].text.eq_ignore_ascii_case(name.text)
            })
        }
        _ => false,
    }
}
