//! Uniform read-only view over nodes of every category
//!
//! [`NodeRef::fields`] lists a node's structural fields in the order they
//! appear in source text. The format-preserving printer walks these fields
//! without knowing the concrete node types.

use std::borrow::Cow;
use std::fmt;

use super::*;

#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    DocBlock(&'a DocBlock),
    Child(&'a DocChild),
    TagValue(&'a TagValue),
    Template(&'a TemplateTagValue),
    MethodParameter(&'a MethodParameter),
    Type(&'a TypeNode),
    Identifier(&'a IdentifierType),
    ArrayShapeItem(&'a ArrayShapeItem),
    ObjectShapeItem(&'a ObjectShapeItem),
    CallableParameter(&'a CallableParameter),
    ConstExpr(&'a ConstExpr),
    ConstArrayItem(&'a ConstArrayItem),
}

/// One named structural field of a node
#[derive(Debug, Clone)]
pub struct Field<'a> {
    pub name: &'static str,
    pub value: FieldValue<'a>,
}

#[derive(Debug, Clone)]
pub enum FieldValue<'a> {
    /// A single child slot, possibly empty
    Node(Option<NodeRef<'a>>),
    /// An ordered list of children
    List(Vec<NodeRef<'a>>),
    /// A scalar, rendered as text for comparison
    Value(Cow<'a, str>),
}

fn node<'a>(name: &'static str, node: NodeRef<'a>) -> Field<'a> {
    Field {
        name,
        value: FieldValue::Node(Some(node)),
    }
}

fn optional<'a>(name: &'static str, node: Option<NodeRef<'a>>) -> Field<'a> {
    Field {
        name,
        value: FieldValue::Node(node),
    }
}

fn list<'a, T: 'a>(
    name: &'static str,
    items: &'a [T],
    wrap: impl Fn(&'a T) -> NodeRef<'a>,
) -> Field<'a> {
    Field {
        name,
        value: FieldValue::List(items.iter().map(wrap).collect()),
    }
}

fn text<'a>(name: &'static str, value: &'a str) -> Field<'a> {
    Field {
        name,
        value: FieldValue::Value(Cow::Borrowed(value)),
    }
}

fn flag(name: &'static str, value: bool) -> Field<'static> {
    Field {
        name,
        value: FieldValue::Value(Cow::Borrowed(if value { "true" } else { "false" })),
    }
}

fn shape_key(key: &ShapeKey) -> NodeRef<'_> {
    match key {
        ShapeKey::Identifier(n) => NodeRef::Identifier(n),
        ShapeKey::Const(n) => NodeRef::ConstExpr(n),
    }
}

fn template_fields(n: &TemplateTagValue) -> Vec<Field<'_>> {
    vec![
        text("name", &n.name),
        optional("bound", n.bound.as_ref().map(NodeRef::Type)),
        optional("default", n.default.as_ref().map(NodeRef::Type)),
        text("description", &n.description),
    ]
}

fn identifier_fields(n: &IdentifierType) -> Vec<Field<'_>> {
    vec![text("name", &n.name)]
}

impl<'a> NodeRef<'a> {
    pub fn attributes(self) -> &'a Attributes {
        match self {
            Self::DocBlock(n) => &n.attributes,
            Self::Child(n) => n.attributes(),
            Self::TagValue(n) => n.attributes(),
            Self::Template(n) => &n.attributes,
            Self::MethodParameter(n) => &n.attributes,
            Self::Type(n) => n.attributes(),
            Self::Identifier(n) => &n.attributes,
            Self::ArrayShapeItem(n) => &n.attributes,
            Self::ObjectShapeItem(n) => &n.attributes,
            Self::CallableParameter(n) => &n.attributes,
            Self::ConstExpr(n) => n.attributes(),
            Self::ConstArrayItem(n) => &n.attributes,
        }
    }

    pub fn kind(self) -> NodeKind {
        match self {
            Self::DocBlock(_) => NodeKind::DocBlock,
            Self::Child(n) => n.kind(),
            Self::TagValue(n) => n.kind(),
            Self::Template(_) => NodeKind::TemplateTag,
            Self::MethodParameter(_) => NodeKind::MethodParameter,
            Self::Type(n) => n.kind(),
            Self::Identifier(_) => NodeKind::Identifier,
            Self::ArrayShapeItem(_) => NodeKind::ArrayShapeItem,
            Self::ObjectShapeItem(_) => NodeKind::ObjectShapeItem,
            Self::CallableParameter(_) => NodeKind::CallableParameter,
            Self::ConstExpr(n) => n.kind(),
            Self::ConstArrayItem(_) => NodeKind::ConstArrayItem,
        }
    }

    /// Structural fields in source order
    pub fn fields(self) -> Vec<Field<'a>> {
        match self {
            Self::DocBlock(n) => vec![list("children", &n.children, NodeRef::Child)],
            Self::Child(DocChild::Text(n)) => vec![text("text", &n.text)],
            Self::Child(DocChild::Tag(n)) => vec![
                text("name", &n.name),
                node("value", NodeRef::TagValue(&n.value)),
            ],
            Self::TagValue(value) => tag_value_fields(value),
            Self::Template(n) => template_fields(n),
            Self::MethodParameter(n) => vec![
                optional("ty", n.ty.as_ref().map(NodeRef::Type)),
                flag("by_reference", n.by_reference),
                flag("variadic", n.variadic),
                text("name", &n.name),
                optional("default", n.default.as_ref().map(NodeRef::ConstExpr)),
            ],
            Self::Type(ty) => type_fields(ty),
            Self::Identifier(n) => identifier_fields(n),
            Self::ArrayShapeItem(n) => vec![
                optional("key", n.key.as_ref().map(shape_key)),
                flag("optional", n.optional),
                node("value", NodeRef::Type(&n.value)),
            ],
            Self::ObjectShapeItem(n) => vec![
                node("key", shape_key(&n.key)),
                flag("optional", n.optional),
                node("value", NodeRef::Type(&n.value)),
            ],
            Self::CallableParameter(n) => vec![
                node("ty", NodeRef::Type(&n.ty)),
                flag("by_reference", n.by_reference),
                flag("variadic", n.variadic),
                text("name", &n.name),
                flag("optional", n.optional),
            ],
            Self::ConstExpr(expr) => const_expr_fields(expr),
            Self::ConstArrayItem(n) => vec![
                optional("key", n.key.as_ref().map(NodeRef::ConstExpr)),
                node("value", NodeRef::ConstExpr(&n.value)),
            ],
        }
    }

    /// Visit this node and every descendant, parents first
    pub fn walk(self, f: &mut impl FnMut(NodeRef<'a>)) {
        f(self);
        for field in self.fields() {
            match field.value {
                FieldValue::Node(Some(child)) => child.walk(f),
                FieldValue::List(children) => {
                    for child in children {
                        child.walk(f);
                    }
                }
                FieldValue::Node(None) | FieldValue::Value(_) => {}
            }
        }
    }
}

fn tag_value_fields(value: &TagValue) -> Vec<Field<'_>> {
    match value {
        TagValue::Param(n) => vec![
            node("ty", NodeRef::Type(&n.ty)),
            flag("by_reference", n.by_reference),
            flag("variadic", n.variadic),
            text("name", &n.name),
            text("description", &n.description),
        ],
        TagValue::TypelessParam(n) => vec![
            flag("by_reference", n.by_reference),
            flag("variadic", n.variadic),
            text("name", &n.name),
            text("description", &n.description),
        ],
        TagValue::Var(n) => vec![
            node("ty", NodeRef::Type(&n.ty)),
            text("name", &n.name),
            text("description", &n.description),
        ],
        TagValue::Return(n) | TagValue::Throws(n) | TagValue::Mixin(n) => vec![
            node("ty", NodeRef::Type(&n.ty)),
            text("description", &n.description),
        ],
        TagValue::Deprecated(n) => vec![text("description", &n.description)],
        TagValue::Property(n) => vec![
            node("ty", NodeRef::Type(&n.ty)),
            text("name", &n.name),
            text("description", &n.description),
        ],
        TagValue::Method(n) => vec![
            flag("is_static", n.is_static),
            optional("return_type", n.return_type.as_ref().map(NodeRef::Type)),
            text("name", &n.name),
            list("templates", &n.templates, NodeRef::Template),
            list("parameters", &n.parameters, NodeRef::MethodParameter),
            text("description", &n.description),
        ],
        TagValue::Template(n) => template_fields(n),
        TagValue::Extends(n) => vec![
            node("ty", NodeRef::Type(&n.ty)),
            text("description", &n.description),
        ],
        TagValue::TypeAlias(n) => vec![
            text("alias", &n.alias),
            node("ty", NodeRef::Type(&n.ty)),
        ],
        TagValue::Generic(n) => vec![text("value", &n.value)],
        TagValue::Invalid(n) => vec![
            text("value", &n.value),
            Field {
                name: "error",
                value: FieldValue::Value(Cow::Owned(n.error.to_string())),
            },
        ],
    }
}

fn type_fields(ty: &TypeNode) -> Vec<Field<'_>> {
    match ty {
        TypeNode::Identifier(n) => identifier_fields(n),
        TypeNode::This(_) => Vec::new(),
        TypeNode::Nullable(n) => vec![node("inner", NodeRef::Type(&n.inner))],
        TypeNode::Union(n) => vec![list("types", &n.types, NodeRef::Type)],
        TypeNode::Intersection(n) => vec![list("types", &n.types, NodeRef::Type)],
        TypeNode::Array(n) => vec![node("inner", NodeRef::Type(&n.inner))],
        TypeNode::OffsetAccess(n) => vec![
            node("inner", NodeRef::Type(&n.inner)),
            node("offset", NodeRef::Type(&n.offset)),
        ],
        TypeNode::Generic(n) => vec![
            node("base", NodeRef::Identifier(&n.base)),
            list("params", &n.params, NodeRef::Type),
        ],
        TypeNode::ArrayShape(n) => vec![
            text("kind", n.kind.as_str()),
            list("items", &n.items, NodeRef::ArrayShapeItem),
            flag("sealed", n.sealed),
        ],
        TypeNode::ObjectShape(n) => vec![list("items", &n.items, NodeRef::ObjectShapeItem)],
        TypeNode::Callable(n) => vec![
            node("identifier", NodeRef::Identifier(&n.identifier)),
            list("parameters", &n.parameters, NodeRef::CallableParameter),
            node("return_type", NodeRef::Type(&n.return_type)),
        ],
        TypeNode::Conditional(n) => vec![
            node("subject", NodeRef::Type(&n.subject)),
            flag("negated", n.negated),
            node("target", NodeRef::Type(&n.target)),
            node("if_type", NodeRef::Type(&n.if_type)),
            node("else_type", NodeRef::Type(&n.else_type)),
        ],
        TypeNode::ConditionalForParameter(n) => vec![
            text("parameter_name", &n.parameter_name),
            flag("negated", n.negated),
            node("target", NodeRef::Type(&n.target)),
            node("if_type", NodeRef::Type(&n.if_type)),
            node("else_type", NodeRef::Type(&n.else_type)),
        ],
        TypeNode::Const(n) => vec![node("expr", NodeRef::ConstExpr(&n.expr))],
    }
}

fn const_expr_fields(expr: &ConstExpr) -> Vec<Field<'_>> {
    match expr {
        ConstExpr::Integer(n) => vec![text("value", &n.value)],
        ConstExpr::Float(n) => vec![text("value", &n.value)],
        ConstExpr::String(n) => vec![
            text("value", &n.value),
            text(
                "quote",
                match n.quote {
                    None => "raw",
                    Some(QuoteStyle::Single) => "single",
                    Some(QuoteStyle::Double) => "double",
                },
            ),
        ],
        ConstExpr::Bool(n) => vec![flag("value", n.value)],
        ConstExpr::Null(_) => Vec::new(),
        ConstExpr::Array(n) => vec![list("items", &n.items, NodeRef::ConstArrayItem)],
        ConstExpr::Fetch(n) => vec![text("class_name", &n.class_name), text("name", &n.name)],
        ConstExpr::New(n) => vec![
            text("class_name", &n.class_name),
            list("args", &n.args, NodeRef::ConstExpr),
        ],
    }
}

impl fmt::Display for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DocBlock(n) => n.fmt(f),
            Self::Child(n) => n.fmt(f),
            Self::TagValue(n) => n.fmt(f),
            Self::Template(n) => n.fmt(f),
            Self::MethodParameter(n) => n.fmt(f),
            Self::Type(n) => n.fmt(f),
            Self::Identifier(n) => n.fmt(f),
            Self::ArrayShapeItem(n) => n.fmt(f),
            Self::ObjectShapeItem(n) => n.fmt(f),
            Self::CallableParameter(n) => n.fmt(f),
            Self::ConstExpr(n) => n.fmt(f),
            Self::ConstArrayItem(n) => n.fmt(f),
        }
    }
}
