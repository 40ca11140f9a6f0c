//! Doc block, its children and tag values

use std::fmt;

use smol_str::SmolStr;

use super::{Attributes, ConstExpr, NodeKind, TypeNode};
use crate::parser::ParseError;

/// A whole `/** ... */` block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocBlock {
    pub children: Vec<DocChild>,
    pub attributes: Attributes,
}

impl DocBlock {
    pub fn tags(&self) -> impl Iterator<Item = &TagNode> {
        self.children.iter().filter_map(|child| match child {
            DocChild::Tag(tag) => Some(tag),
            DocChild::Text(_) => None,
        })
    }

    /// Tags whose name matches exactly, e.g. `"@param"`
    pub fn tags_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a TagNode> {
        self.tags().filter(move |tag| tag.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocChild {
    Text(TextNode),
    Tag(TagNode),
}

impl DocChild {
    pub fn attributes(&self) -> &Attributes {
        match self {
            Self::Text(n) => &n.attributes,
            Self::Tag(n) => &n.attributes,
        }
    }

    pub fn attributes_mut(&mut self) -> &mut Attributes {
        match self {
            Self::Text(n) => &mut n.attributes,
            Self::Tag(n) => &mut n.attributes,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Text(_) => NodeKind::Text,
            Self::Tag(_) => NodeKind::Tag,
        }
    }
}

/// One line of free text; empty for a blank line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextNode {
    pub text: String,
    pub attributes: Attributes,
}

/// `@name value`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagNode {
    pub name: SmolStr,
    pub value: TagValue,
    pub attributes: Attributes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagValue {
    Param(ParamTagValue),
    TypelessParam(TypelessParamTagValue),
    Var(VarTagValue),
    Return(TypeTagValue),
    Throws(TypeTagValue),
    Mixin(TypeTagValue),
    Deprecated(DeprecatedTagValue),
    Property(PropertyTagValue),
    Method(MethodTagValue),
    Template(TemplateTagValue),
    Extends(ExtendsTagValue),
    TypeAlias(TypeAliasTagValue),
    Generic(GenericTagValue),
    Invalid(InvalidTagValue),
}

impl TagValue {
    pub fn attributes(&self) -> &Attributes {
        match self {
            Self::Param(n) => &n.attributes,
            Self::TypelessParam(n) => &n.attributes,
            Self::Var(n) => &n.attributes,
            Self::Return(n) | Self::Throws(n) | Self::Mixin(n) => &n.attributes,
            Self::Deprecated(n) => &n.attributes,
            Self::Property(n) => &n.attributes,
            Self::Method(n) => &n.attributes,
            Self::Template(n) => &n.attributes,
            Self::Extends(n) => &n.attributes,
            Self::TypeAlias(n) => &n.attributes,
            Self::Generic(n) => &n.attributes,
            Self::Invalid(n) => &n.attributes,
        }
    }

    pub fn attributes_mut(&mut self) -> &mut Attributes {
        match self {
            Self::Param(n) => &mut n.attributes,
            Self::TypelessParam(n) => &mut n.attributes,
            Self::Var(n) => &mut n.attributes,
            Self::Return(n) | Self::Throws(n) | Self::Mixin(n) => &mut n.attributes,
            Self::Deprecated(n) => &mut n.attributes,
            Self::Property(n) => &mut n.attributes,
            Self::Method(n) => &mut n.attributes,
            Self::Template(n) => &mut n.attributes,
            Self::Extends(n) => &mut n.attributes,
            Self::TypeAlias(n) => &mut n.attributes,
            Self::Generic(n) => &mut n.attributes,
            Self::Invalid(n) => &mut n.attributes,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Param(_) => NodeKind::ParamTag,
            Self::TypelessParam(_) => NodeKind::TypelessParamTag,
            Self::Var(_) => NodeKind::VarTag,
            Self::Return(_) => NodeKind::ReturnTag,
            Self::Throws(_) => NodeKind::ThrowsTag,
            Self::Mixin(_) => NodeKind::MixinTag,
            Self::Deprecated(_) => NodeKind::DeprecatedTag,
            Self::Property(_) => NodeKind::PropertyTag,
            Self::Method(_) => NodeKind::MethodTag,
            Self::Template(_) => NodeKind::TemplateTag,
            Self::Extends(_) => NodeKind::ExtendsTag,
            Self::TypeAlias(_) => NodeKind::TypeAliasTag,
            Self::Generic(_) => NodeKind::GenericTag,
            Self::Invalid(_) => NodeKind::InvalidTag,
        }
    }
}

/// `@param Type &...$name description`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamTagValue {
    pub ty: TypeNode,
    pub by_reference: bool,
    pub variadic: bool,
    pub name: SmolStr,
    pub description: String,
    pub attributes: Attributes,
}

/// `@param &...$name description` with no type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypelessParamTagValue {
    pub by_reference: bool,
    pub variadic: bool,
    pub name: SmolStr,
    pub description: String,
    pub attributes: Attributes,
}

/// `@var Type $name description`; `name` may be empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarTagValue {
    pub ty: TypeNode,
    pub name: SmolStr,
    pub description: String,
    pub attributes: Attributes,
}

/// Shared by `@return`, `@throws` and `@mixin`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeTagValue {
    pub ty: TypeNode,
    pub description: String,
    pub attributes: Attributes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeprecatedTagValue {
    pub description: String,
    pub attributes: Attributes,
}

/// `@property`, `@property-read`, `@property-write`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyTagValue {
    pub ty: TypeNode,
    pub name: SmolStr,
    pub description: String,
    pub attributes: Attributes,
}

/// `@method static Ret name<T>(A $a = 1) description`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodTagValue {
    pub is_static: bool,
    pub return_type: Option<TypeNode>,
    pub name: SmolStr,
    pub templates: Vec<TemplateTagValue>,
    pub parameters: Vec<MethodParameter>,
    pub description: String,
    pub attributes: Attributes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodParameter {
    pub ty: Option<TypeNode>,
    pub by_reference: bool,
    pub variadic: bool,
    pub name: SmolStr,
    pub default: Option<ConstExpr>,
    pub attributes: Attributes,
}

/// `@template T of Bound = Default description`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateTagValue {
    pub name: SmolStr,
    pub bound: Option<TypeNode>,
    pub default: Option<TypeNode>,
    pub description: String,
    pub attributes: Attributes,
}

/// `@extends`, `@implements`, `@use`; `ty` is always a generic type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendsTagValue {
    pub ty: TypeNode,
    pub description: String,
    pub attributes: Attributes,
}

/// `@phpstan-type Name = Type`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeAliasTagValue {
    pub alias: SmolStr,
    pub ty: TypeNode,
    pub attributes: Attributes,
}

/// Value of a tag with no dedicated grammar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericTagValue {
    pub value: String,
    pub attributes: Attributes,
}

/// A known tag whose value failed to parse
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidTagValue {
    pub value: String,
    pub error: ParseError,
    pub attributes: Attributes,
}

// ============================================================================
// Display
// ============================================================================

fn join_trimmed(f: &mut fmt::Formatter<'_>, parts: &[&dyn fmt::Display]) -> fmt::Result {
    let text = parts
        .iter()
        .map(|part| part.to_string())
        .collect::<Vec<_>>()
        .join(" ");
    f.write_str(text.trim())
}

fn markers(by_reference: bool, variadic: bool) -> &'static str {
    match (by_reference, variadic) {
        (true, true) => "&...",
        (true, false) => "&",
        (false, true) => "...",
        (false, false) => "",
    }
}

impl fmt::Display for DocBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("/**\n *")?;
        for (i, child) in self.children.iter().enumerate() {
            if i > 0 {
                f.write_str("\n *")?;
            }
            let text = child.to_string();
            if !text.is_empty() {
                write!(f, " {text}")?;
            }
        }
        f.write_str("\n */")
    }
}

impl fmt::Display for DocChild {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(n) => f.write_str(&n.text),
            Self::Tag(n) => n.fmt(f),
        }
    }
}

impl fmt::Display for TagNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        join_trimmed(f, &[&self.name, &self.value])
    }
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Param(n) => {
                let name = format!("{}{}", markers(n.by_reference, n.variadic), n.name);
                join_trimmed(f, &[&n.ty, &name, &n.description])
            }
            Self::TypelessParam(n) => {
                let name = format!("{}{}", markers(n.by_reference, n.variadic), n.name);
                join_trimmed(f, &[&name, &n.description])
            }
            Self::Var(n) => {
                let rest = format!("{} {}", n.name, n.description);
                join_trimmed(f, &[&n.ty, &rest.trim()])
            }
            Self::Return(n) | Self::Throws(n) | Self::Mixin(n) => {
                join_trimmed(f, &[&n.ty, &n.description])
            }
            Self::Deprecated(n) => f.write_str(n.description.trim()),
            Self::Property(n) => join_trimmed(f, &[&n.ty, &n.name, &n.description]),
            Self::Method(n) => n.fmt(f),
            Self::Template(n) => n.fmt(f),
            Self::Extends(n) => join_trimmed(f, &[&n.ty, &n.description]),
            Self::TypeAlias(n) => join_trimmed(f, &[&n.alias, &n.ty]),
            Self::Generic(n) => f.write_str(&n.value),
            Self::Invalid(n) => f.write_str(&n.value),
        }
    }
}

impl fmt::Display for MethodTagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_static {
            f.write_str("static ")?;
        }
        if let Some(return_type) = &self.return_type {
            write!(f, "{return_type} ")?;
        }
        f.write_str(&self.name)?;
        if !self.templates.is_empty() {
            f.write_str("<")?;
            for (i, template) in self.templates.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                template.fmt(f)?;
            }
            f.write_str(">")?;
        }
        f.write_str("(")?;
        for (i, param) in self.parameters.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            param.fmt(f)?;
        }
        f.write_str(")")?;
        if !self.description.is_empty() {
            write!(f, " {}", self.description)?;
        }
        Ok(())
    }
}

impl fmt::Display for MethodParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ty) = &self.ty {
            write!(f, "{ty} ")?;
        }
        write!(f, "{}{}", markers(self.by_reference, self.variadic), self.name)?;
        if let Some(default) = &self.default {
            write!(f, " = {default}")?;
        }
        Ok(())
    }
}

impl fmt::Display for TemplateTagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut head = self.name.to_string();
        if let Some(bound) = &self.bound {
            head.push_str(&format!(" of {bound}"));
        }
        if let Some(default) = &self.default {
            head.push_str(&format!(" = {default}"));
        }
        join_trimmed(f, &[&head, &self.description])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(name: &str, value: TagValue) -> DocChild {
        DocChild::Tag(TagNode {
            name: name.into(),
            value,
            attributes: Attributes::detached(),
        })
    }

    #[test]
    fn test_doc_block_display_skips_space_on_blank_lines() {
        let block = DocBlock {
            children: vec![
                DocChild::Text(TextNode {
                    text: "Summary".into(),
                    attributes: Attributes::detached(),
                }),
                DocChild::Text(TextNode {
                    text: String::new(),
                    attributes: Attributes::detached(),
                }),
                tag(
                    "@return",
                    TagValue::Return(TypeTagValue {
                        ty: TypeNode::identifier("int"),
                        description: String::new(),
                        attributes: Attributes::detached(),
                    }),
                ),
            ],
            attributes: Attributes::detached(),
        };
        assert_eq!(block.to_string(), "/**\n * Summary\n *\n * @return int\n */");
    }

    #[test]
    fn test_param_display() {
        let value = TagValue::Param(ParamTagValue {
            ty: TypeNode::identifier("int"),
            by_reference: true,
            variadic: true,
            name: "$xs".into(),
            description: "values".into(),
            attributes: Attributes::detached(),
        });
        assert_eq!(value.to_string(), "int &...$xs values");
    }

    #[test]
    fn test_var_without_name() {
        let value = TagValue::Var(VarTagValue {
            ty: TypeNode::identifier("int"),
            name: SmolStr::default(),
            description: String::new(),
            attributes: Attributes::detached(),
        });
        assert_eq!(tag("@var", value).to_string(), "@var int");
    }

    #[test]
    fn test_method_display() {
        let value = MethodTagValue {
            is_static: true,
            return_type: Some(TypeNode::identifier("void")),
            name: "run".into(),
            templates: vec![TemplateTagValue {
                name: "T".into(),
                bound: Some(TypeNode::identifier("object")),
                default: None,
                description: String::new(),
                attributes: Attributes::detached(),
            }],
            parameters: vec![MethodParameter {
                ty: Some(TypeNode::identifier("T")),
                by_reference: false,
                variadic: false,
                name: "$a".into(),
                default: None,
                attributes: Attributes::detached(),
            }],
            description: "Runs".into(),
            attributes: Attributes::detached(),
        };
        assert_eq!(value.to_string(), "static void run<T of object>(T $a) Runs");
    }
}
