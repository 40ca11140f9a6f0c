//! Doc-block syntax tree
//!
//! Nodes are grouped into three categories, each a closed enum over plain
//! structs: [`TypeNode`], [`ConstExpr`] and [`TagValue`]. The block itself is
//! a [`DocBlock`] holding [`DocChild`] entries.
//!
//! Every node carries an [`Attributes`] record. Attributes are side data:
//! they never take part in equality, so two trees compare equal when their
//! structure and values match regardless of where they came from.
//!
//! `Display` on any node produces fresh, reparseable syntax. Reproducing the
//! original bytes is the job of [`crate::printer::Printer`].

mod const_expr;
mod doc_block;
mod node_ref;
mod types;

pub use const_expr::{
    BoolLiteral, ConstArray, ConstArrayItem, ConstExpr, ConstFetch, FloatLiteral, IntegerLiteral,
    NewExpr, NullLiteral, QuoteStyle, StringLiteral,
};
pub use doc_block::{
    DeprecatedTagValue, DocBlock, DocChild, ExtendsTagValue, GenericTagValue, InvalidTagValue,
    MethodParameter, MethodTagValue, ParamTagValue, PropertyTagValue, TagNode, TagValue,
    TemplateTagValue, TextNode, TypeAliasTagValue, TypeTagValue, TypelessParamTagValue,
    VarTagValue,
};
pub use node_ref::{Field, FieldValue, NodeRef};
pub use types::{
    ArrayShapeItem, ArrayShapeKind, ArrayShapeType, ArrayType, CallableParameter, CallableType,
    ConditionalForParameterType, ConditionalType, ConstType, GenericType, IdentifierType,
    IntersectionType, NullableType, ObjectShapeItem, ObjectShapeType, OffsetAccessType, ShapeKey,
    ThisType, TypeNode, UnionType, Variance,
};
pub(crate) use types::{needs_parens_as_array_inner, needs_parens_as_member, needs_parens_as_return};

use std::fmt;

/// Identity of a parsed node
///
/// Ids are handed out by the [`TokenIterator`](crate::parser::TokenIterator)
/// during a parse. Nodes built by hand keep the default id `0`, which no
/// parsed node ever has.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u32 {
        self.0
    }

    pub fn is_assigned(self) -> bool {
        self.0 != 0
    }
}

/// A `//` comment that preceded a node inside a multi-line construct
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub text: String,
    pub start_line: u32,
    pub start_index: usize,
}

/// Position and identity data attached to every node
#[derive(Debug, Clone, Default)]
pub struct Attributes {
    pub id: NodeId,
    /// Id of the node this one was cloned from
    pub original: Option<NodeId>,
    pub start_index: Option<usize>,
    pub end_index: Option<usize>,
    pub start_line: Option<u32>,
    pub end_line: Option<u32>,
    pub comments: Vec<Comment>,
}

impl Attributes {
    /// Attributes for a node built outside the parser
    pub fn detached() -> Self {
        Self::default()
    }

    /// Token range `(start, end)` if the parser recorded indexes
    pub fn index_range(&self) -> Option<(usize, usize)> {
        Some((self.start_index?, self.end_index?))
    }
}

// Attributes are metadata; equality is structural.
impl PartialEq for Attributes {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for Attributes {}

/// The concrete shape of a node, independent of its category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    DocBlock,
    Text,
    Tag,

    ParamTag,
    TypelessParamTag,
    VarTag,
    ReturnTag,
    ThrowsTag,
    MixinTag,
    DeprecatedTag,
    PropertyTag,
    MethodTag,
    MethodParameter,
    TemplateTag,
    ExtendsTag,
    TypeAliasTag,
    GenericTag,
    InvalidTag,

    Identifier,
    This,
    Nullable,
    Union,
    Intersection,
    Array,
    OffsetAccess,
    Generic,
    ArrayShape,
    ArrayShapeItem,
    ObjectShape,
    ObjectShapeItem,
    Callable,
    CallableParameter,
    Conditional,
    ConditionalForParameter,
    ConstType,

    Integer,
    Float,
    String,
    Bool,
    Null,
    ConstArray,
    ConstArrayItem,
    ConstFetch,
    New,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
