//! Type expression nodes

use std::fmt;

use smol_str::SmolStr;

use super::{Attributes, ConstExpr, NodeKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeNode {
    Identifier(IdentifierType),
    This(ThisType),
    Nullable(NullableType),
    Union(UnionType),
    Intersection(IntersectionType),
    Array(ArrayType),
    OffsetAccess(OffsetAccessType),
    Generic(GenericType),
    ArrayShape(ArrayShapeType),
    ObjectShape(ObjectShapeType),
    Callable(CallableType),
    Conditional(ConditionalType),
    ConditionalForParameter(ConditionalForParameterType),
    Const(ConstType),
}

impl TypeNode {
    /// A detached identifier type, for building trees by hand
    pub fn identifier(name: &str) -> Self {
        Self::Identifier(IdentifierType::new(name))
    }

    pub fn attributes(&self) -> &Attributes {
        match self {
            Self::Identifier(n) => &n.attributes,
            Self::This(n) => &n.attributes,
            Self::Nullable(n) => &n.attributes,
            Self::Union(n) => &n.attributes,
            Self::Intersection(n) => &n.attributes,
            Self::Array(n) => &n.attributes,
            Self::OffsetAccess(n) => &n.attributes,
            Self::Generic(n) => &n.attributes,
            Self::ArrayShape(n) => &n.attributes,
            Self::ObjectShape(n) => &n.attributes,
            Self::Callable(n) => &n.attributes,
            Self::Conditional(n) => &n.attributes,
            Self::ConditionalForParameter(n) => &n.attributes,
            Self::Const(n) => &n.attributes,
        }
    }

    pub fn attributes_mut(&mut self) -> &mut Attributes {
        match self {
            Self::Identifier(n) => &mut n.attributes,
            Self::This(n) => &mut n.attributes,
            Self::Nullable(n) => &mut n.attributes,
            Self::Union(n) => &mut n.attributes,
            Self::Intersection(n) => &mut n.attributes,
            Self::Array(n) => &mut n.attributes,
            Self::OffsetAccess(n) => &mut n.attributes,
            Self::Generic(n) => &mut n.attributes,
            Self::ArrayShape(n) => &mut n.attributes,
            Self::ObjectShape(n) => &mut n.attributes,
            Self::Callable(n) => &mut n.attributes,
            Self::Conditional(n) => &mut n.attributes,
            Self::ConditionalForParameter(n) => &mut n.attributes,
            Self::Const(n) => &mut n.attributes,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Identifier(_) => NodeKind::Identifier,
            Self::This(_) => NodeKind::This,
            Self::Nullable(_) => NodeKind::Nullable,
            Self::Union(_) => NodeKind::Union,
            Self::Intersection(_) => NodeKind::Intersection,
            Self::Array(_) => NodeKind::Array,
            Self::OffsetAccess(_) => NodeKind::OffsetAccess,
            Self::Generic(_) => NodeKind::Generic,
            Self::ArrayShape(_) => NodeKind::ArrayShape,
            Self::ObjectShape(_) => NodeKind::ObjectShape,
            Self::Callable(_) => NodeKind::Callable,
            Self::Conditional(_) => NodeKind::Conditional,
            Self::ConditionalForParameter(_) => NodeKind::ConditionalForParameter,
            Self::Const(_) => NodeKind::ConstType,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierType {
    pub name: SmolStr,
    pub attributes: Attributes,
}

impl IdentifierType {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.into(),
            attributes: Attributes::detached(),
        }
    }
}

/// `$this`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThisType {
    pub attributes: Attributes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NullableType {
    pub inner: Box<TypeNode>,
    pub attributes: Attributes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnionType {
    pub types: Vec<TypeNode>,
    pub attributes: Attributes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntersectionType {
    pub types: Vec<TypeNode>,
    pub attributes: Attributes,
}

/// `T[]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayType {
    pub inner: Box<TypeNode>,
    pub attributes: Attributes,
}

/// `T[K]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetAccessType {
    pub inner: Box<TypeNode>,
    pub offset: Box<TypeNode>,
    pub attributes: Attributes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variance {
    Invariant,
    Covariant,
    Contravariant,
    /// `*`, printed in place of the argument
    Bivariant,
}

impl Variance {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Invariant => "invariant",
            Self::Covariant => "covariant",
            Self::Contravariant => "contravariant",
            Self::Bivariant => "bivariant",
        }
    }
}

/// `Base<A, B>`; `variances` runs parallel to `params`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericType {
    pub base: IdentifierType,
    pub params: Vec<TypeNode>,
    pub variances: Vec<Variance>,
    pub attributes: Attributes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayShapeKind {
    Array,
    List,
    NonEmptyArray,
    NonEmptyList,
}

impl ArrayShapeKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "array" => Some(Self::Array),
            "list" => Some(Self::List),
            "non-empty-array" => Some(Self::NonEmptyArray),
            "non-empty-list" => Some(Self::NonEmptyList),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Array => "array",
            Self::List => "list",
            Self::NonEmptyArray => "non-empty-array",
            Self::NonEmptyList => "non-empty-list",
        }
    }
}

/// `array{a: int, b?: string, ...}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayShapeType {
    pub kind: ArrayShapeKind,
    pub items: Vec<ArrayShapeItem>,
    /// False when the shape ends in `...`
    pub sealed: bool,
    pub attributes: Attributes,
}

/// Key of a shape item: a bare name, an integer, or a quoted string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeKey {
    Identifier(IdentifierType),
    Const(ConstExpr),
}

impl ShapeKey {
    pub fn attributes(&self) -> &Attributes {
        match self {
            Self::Identifier(n) => &n.attributes,
            Self::Const(n) => n.attributes(),
        }
    }

    pub fn attributes_mut(&mut self) -> &mut Attributes {
        match self {
            Self::Identifier(n) => &mut n.attributes,
            Self::Const(n) => n.attributes_mut(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayShapeItem {
    pub key: Option<ShapeKey>,
    pub optional: bool,
    pub value: TypeNode,
    pub attributes: Attributes,
}

impl ArrayShapeItem {
    /// A detached positional item
    pub fn positional(value: TypeNode) -> Self {
        Self {
            key: None,
            optional: false,
            value,
            attributes: Attributes::detached(),
        }
    }
}

/// `object{a: int, b?: string}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectShapeType {
    pub items: Vec<ObjectShapeItem>,
    pub attributes: Attributes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectShapeItem {
    pub key: ShapeKey,
    pub optional: bool,
    pub value: TypeNode,
    pub attributes: Attributes,
}

/// `callable(A $a, B ...$rest): R`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallableType {
    pub identifier: IdentifierType,
    pub parameters: Vec<CallableParameter>,
    pub return_type: Box<TypeNode>,
    pub attributes: Attributes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallableParameter {
    pub ty: TypeNode,
    pub by_reference: bool,
    pub variadic: bool,
    /// Includes the `$`; empty for an unnamed parameter
    pub name: SmolStr,
    pub optional: bool,
    pub attributes: Attributes,
}

/// `(T is U ? A : B)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionalType {
    pub subject: Box<TypeNode>,
    pub target: Box<TypeNode>,
    pub if_type: Box<TypeNode>,
    pub else_type: Box<TypeNode>,
    pub negated: bool,
    pub attributes: Attributes,
}

/// `($param is U ? A : B)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionalForParameterType {
    pub parameter_name: SmolStr,
    pub target: Box<TypeNode>,
    pub if_type: Box<TypeNode>,
    pub else_type: Box<TypeNode>,
    pub negated: bool,
    pub attributes: Attributes,
}

/// A constant used as a type: `'foo'`, `1`, `Foo::BAR`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstType {
    pub expr: ConstExpr,
    pub attributes: Attributes,
}

// ============================================================================
// Display
// ============================================================================

/// Kinds that need parentheses as the element of `T[]` or `T[K]`
pub(crate) fn needs_parens_as_array_inner(kind: NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::Callable
            | NodeKind::Union
            | NodeKind::Intersection
            | NodeKind::ConstType
            | NodeKind::Nullable
            | NodeKind::Conditional
            | NodeKind::ConditionalForParameter
    )
}

/// Kinds that need parentheses as a union or intersection member
pub(crate) fn needs_parens_as_member(kind: NodeKind) -> bool {
    matches!(kind, NodeKind::Intersection | NodeKind::Union | NodeKind::Nullable)
}

/// Kinds that need parentheses as a callable's return type
pub(crate) fn needs_parens_as_return(kind: NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::Union | NodeKind::Intersection | NodeKind::Callable | NodeKind::ConstType
    )
}

fn write_wrapped(f: &mut fmt::Formatter<'_>, ty: &TypeNode, wrap: bool) -> fmt::Result {
    if wrap { write!(f, "({ty})") } else { write!(f, "{ty}") }
}

fn write_joined(f: &mut fmt::Formatter<'_>, types: &[TypeNode], separator: &str) -> fmt::Result {
    for (i, ty) in types.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        write_wrapped(f, ty, needs_parens_as_member(ty.kind()))?;
    }
    Ok(())
}

impl fmt::Display for TypeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identifier(n) => n.fmt(f),
            Self::This(_) => f.write_str("$this"),
            Self::Nullable(n) => write!(f, "?{}", n.inner),
            Self::Union(n) => write_joined(f, &n.types, "|"),
            Self::Intersection(n) => write_joined(f, &n.types, "&"),
            Self::Array(n) => {
                write_wrapped(f, &n.inner, needs_parens_as_array_inner(n.inner.kind()))?;
                f.write_str("[]")
            }
            Self::OffsetAccess(n) => {
                write_wrapped(f, &n.inner, needs_parens_as_array_inner(n.inner.kind()))?;
                write!(f, "[{}]", n.offset)
            }
            Self::Generic(n) => n.fmt(f),
            Self::ArrayShape(n) => n.fmt(f),
            Self::ObjectShape(n) => n.fmt(f),
            Self::Callable(n) => n.fmt(f),
            Self::Conditional(n) => write!(
                f,
                "({} {} {} ? {} : {})",
                n.subject,
                if n.negated { "is not" } else { "is" },
                n.target,
                n.if_type,
                n.else_type
            ),
            Self::ConditionalForParameter(n) => write!(
                f,
                "({} {} {} ? {} : {})",
                n.parameter_name,
                if n.negated { "is not" } else { "is" },
                n.target,
                n.if_type,
                n.else_type
            ),
            Self::Const(n) => n.expr.fmt(f),
        }
    }
}

impl fmt::Display for IdentifierType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Display for GenericType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}<", self.base)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match self.variances.get(i).copied().unwrap_or(Variance::Invariant) {
                Variance::Invariant => write!(f, "{param}")?,
                Variance::Covariant => write!(f, "covariant {param}")?,
                Variance::Contravariant => write!(f, "contravariant {param}")?,
                Variance::Bivariant => f.write_str("*")?,
            }
        }
        f.write_str(">")
    }
}

impl fmt::Display for ShapeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identifier(n) => n.fmt(f),
            Self::Const(n) => n.fmt(f),
        }
    }
}

impl fmt::Display for ArrayShapeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{{", self.kind.as_str())?;
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            item.fmt(f)?;
        }
        if !self.sealed {
            f.write_str(if self.items.is_empty() { "..." } else { ", ..." })?;
        }
        f.write_str("}")
    }
}

impl fmt::Display for ArrayShapeItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.key {
            Some(key) => write!(
                f,
                "{}{}: {}",
                key,
                if self.optional { "?" } else { "" },
                self.value
            ),
            None => self.value.fmt(f),
        }
    }
}

impl fmt::Display for ObjectShapeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("object{")?;
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            item.fmt(f)?;
        }
        f.write_str("}")
    }
}

impl fmt::Display for ObjectShapeItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}: {}",
            self.key,
            if self.optional { "?" } else { "" },
            self.value
        )
    }
}

impl fmt::Display for CallableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.identifier)?;
        for (i, param) in self.parameters.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            param.fmt(f)?;
        }
        f.write_str("): ")?;
        write_wrapped(f, &self.return_type, needs_parens_as_return(self.return_type.kind()))
    }
}

impl fmt::Display for CallableParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = format!(
            "{} {}{}{}",
            self.ty,
            if self.by_reference { "&" } else { "" },
            if self.variadic { "..." } else { "" },
            self.name
        );
        f.write_str(text.trim())?;
        if self.optional {
            f.write_str("=")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(name: &str) -> TypeNode {
        TypeNode::identifier(name)
    }

    #[test]
    fn test_union_wraps_nested_intersection() {
        let ty = TypeNode::Union(UnionType {
            types: vec![
                TypeNode::Intersection(IntersectionType {
                    types: vec![ident("A"), ident("B")],
                    attributes: Attributes::detached(),
                }),
                ident("C"),
            ],
            attributes: Attributes::detached(),
        });
        assert_eq!(ty.to_string(), "(A&B)|C");
    }

    #[test]
    fn test_array_of_nullable_is_parenthesized() {
        let ty = TypeNode::Array(ArrayType {
            inner: Box::new(TypeNode::Nullable(NullableType {
                inner: Box::new(ident("int")),
                attributes: Attributes::detached(),
            })),
            attributes: Attributes::detached(),
        });
        assert_eq!(ty.to_string(), "(?int)[]");
    }

    #[test]
    fn test_unsealed_shapes() {
        let mut shape = ArrayShapeType {
            kind: ArrayShapeKind::List,
            items: Vec::new(),
            sealed: false,
            attributes: Attributes::detached(),
        };
        assert_eq!(shape.to_string(), "list{...}");
        shape.items.push(ArrayShapeItem::positional(ident("int")));
        assert_eq!(shape.to_string(), "list{int, ...}");
    }

    #[test]
    fn test_generic_variances() {
        let ty = GenericType {
            base: IdentifierType::new("Foo"),
            params: vec![ident("A"), ident("B"), ident("mixed")],
            variances: vec![Variance::Covariant, Variance::Invariant, Variance::Bivariant],
            attributes: Attributes::detached(),
        };
        assert_eq!(ty.to_string(), "Foo<covariant A, B, *>");
    }

    #[test]
    fn test_callable_parameter_markers() {
        let param = CallableParameter {
            ty: ident("B"),
            by_reference: true,
            variadic: true,
            name: "$c".into(),
            optional: true,
            attributes: Attributes::detached(),
        };
        assert_eq!(param.to_string(), "B &...$c=");
    }
}
