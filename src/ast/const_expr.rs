//! Constant expression nodes

use std::fmt;

use smol_str::SmolStr;

use super::{Attributes, NodeKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstExpr {
    Integer(IntegerLiteral),
    Float(FloatLiteral),
    String(StringLiteral),
    Bool(BoolLiteral),
    Null(NullLiteral),
    Array(ConstArray),
    Fetch(ConstFetch),
    New(NewExpr),
}

impl ConstExpr {
    pub fn attributes(&self) -> &Attributes {
        match self {
            Self::Integer(n) => &n.attributes,
            Self::Float(n) => &n.attributes,
            Self::String(n) => &n.attributes,
            Self::Bool(n) => &n.attributes,
            Self::Null(n) => &n.attributes,
            Self::Array(n) => &n.attributes,
            Self::Fetch(n) => &n.attributes,
            Self::New(n) => &n.attributes,
        }
    }

    pub fn attributes_mut(&mut self) -> &mut Attributes {
        match self {
            Self::Integer(n) => &mut n.attributes,
            Self::Float(n) => &mut n.attributes,
            Self::String(n) => &mut n.attributes,
            Self::Bool(n) => &mut n.attributes,
            Self::Null(n) => &mut n.attributes,
            Self::Array(n) => &mut n.attributes,
            Self::Fetch(n) => &mut n.attributes,
            Self::New(n) => &mut n.attributes,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Integer(_) => NodeKind::Integer,
            Self::Float(_) => NodeKind::Float,
            Self::String(_) => NodeKind::String,
            Self::Bool(_) => NodeKind::Bool,
            Self::Null(_) => NodeKind::Null,
            Self::Array(_) => NodeKind::ConstArray,
            Self::Fetch(_) => NodeKind::ConstFetch,
            Self::New(_) => NodeKind::New,
        }
    }
}

/// Integer literal kept in its source form (`0x1F`, `-1_000`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegerLiteral {
    pub value: SmolStr,
    pub attributes: Attributes,
}

/// Float literal kept in its source form (`1.5e3`, `.5`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FloatLiteral {
    pub value: SmolStr,
    pub attributes: Attributes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteStyle {
    Single,
    Double,
}

/// String literal
///
/// With no `quote` the value is the raw token text, delimiters included.
/// Otherwise it is the unescaped content and printing re-quotes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringLiteral {
    pub value: String,
    pub quote: Option<QuoteStyle>,
    pub attributes: Attributes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoolLiteral {
    pub value: bool,
    pub attributes: Attributes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NullLiteral {
    pub attributes: Attributes,
}

/// `[...]` or `array(...)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstArray {
    pub items: Vec<ConstArrayItem>,
    pub attributes: Attributes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstArrayItem {
    pub key: Option<ConstExpr>,
    pub value: ConstExpr,
    pub attributes: Attributes,
}

/// `NAME`, `Class::NAME`, `Class::PREFIX_*` or `Class::*`
///
/// `class_name` is empty for a global constant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstFetch {
    pub class_name: SmolStr,
    pub name: SmolStr,
    pub attributes: Attributes,
}

/// `new Class(args)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExpr {
    pub class_name: SmolStr,
    pub args: Vec<ConstExpr>,
    pub attributes: Attributes,
}

impl StringLiteral {
    pub fn raw(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            quote: None,
            attributes: Attributes::detached(),
        }
    }

    pub fn quoted(value: impl Into<String>, quote: QuoteStyle) -> Self {
        Self {
            value: value.into(),
            quote: Some(quote),
            attributes: Attributes::detached(),
        }
    }
}

// ============================================================================
// Display
// ============================================================================

impl fmt::Display for ConstExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => f.write_str(&n.value),
            Self::Float(n) => f.write_str(&n.value),
            Self::String(n) => n.fmt(f),
            Self::Bool(n) => f.write_str(if n.value { "true" } else { "false" }),
            Self::Null(_) => f.write_str("null"),
            Self::Array(n) => n.fmt(f),
            Self::Fetch(n) => n.fmt(f),
            Self::New(n) => n.fmt(f),
        }
    }
}

impl fmt::Display for StringLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.quote {
            None => f.write_str(&self.value),
            Some(QuoteStyle::Single) => {
                f.write_str("'")?;
                for c in self.value.chars() {
                    if matches!(c, '\\' | '\'') {
                        f.write_str("\\")?;
                    }
                    write!(f, "{c}")?;
                }
                f.write_str("'")
            }
            Some(QuoteStyle::Double) => {
                f.write_str("\"")?;
                for c in self.value.chars() {
                    match c {
                        '\\' => f.write_str("\\\\")?,
                        '"' => f.write_str("\\\"")?,
                        '$' => f.write_str("\\$")?,
                        '\n' => f.write_str("\\n")?,
                        '\r' => f.write_str("\\r")?,
                        '\t' => f.write_str("\\t")?,
                        '\x0b' => f.write_str("\\v")?,
                        '\x0c' => f.write_str("\\f")?,
                        '\x1b' => f.write_str("\\e")?,
                        c if c.is_ascii_control() => write!(f, "\\x{:02X}", c as u32)?,
                        c => write!(f, "{c}")?,
                    }
                }
                f.write_str("\"")
            }
        }
    }
}

impl fmt::Display for ConstArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            item.fmt(f)?;
        }
        f.write_str("]")
    }
}

impl fmt::Display for ConstArrayItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(key) = &self.key {
            write!(f, "{key} => ")?;
        }
        self.value.fmt(f)
    }
}

impl fmt::Display for ConstFetch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.class_name.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}::{}", self.class_name, self.name)
        }
    }
}

impl fmt::Display for NewExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "new {}(", self.class_name)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            arg.fmt(f)?;
        }
        f.write_str(")")
    }
}
