use crate::ast::{
    Attributes, ConstExpr, DocBlock, DocChild, MethodParameter, ShapeKey, TagValue,
    TemplateTagValue, TypeNode,
};

/// Deep copy of `block` whose nodes point back at the nodes they were copied from
///
/// Every copied node with an assigned id gets `original = Some(id)`. Edit the
/// copy, then print it with
/// [`Printer::print_format_preserving`](crate::printer::Printer::print_format_preserving)
/// against `block`.
pub fn clone_with_backlinks(block: &DocBlock) -> DocBlock {
    let mut copy = block.clone();
    link(&mut copy.attributes);
    for child in &mut copy.children {
        link_child(child);
    }
    tracing::trace!("[VISIT] Cloned doc block with {} children", copy.children.len());
    copy
}

fn link(attributes: &mut Attributes) {
    if attributes.id.is_assigned() {
        attributes.original = Some(attributes.id);
    }
}

fn link_child(child: &mut DocChild) {
    link(child.attributes_mut());
    if let DocChild::Tag(tag) = child {
        link_tag_value(&mut tag.value);
    }
}

fn link_tag_value(value: &mut TagValue) {
    link(value.attributes_mut());
    match value {
        TagValue::Param(n) => link_type(&mut n.ty),
        TagValue::Var(n) => link_type(&mut n.ty),
        TagValue::Return(n) | TagValue::Throws(n) | TagValue::Mixin(n) => link_type(&mut n.ty),
        TagValue::Property(n) => link_type(&mut n.ty),
        TagValue::Extends(n) => link_type(&mut n.ty),
        TagValue::TypeAlias(n) => link_type(&mut n.ty),
        TagValue::Template(n) => link_template_bounds(n),
        TagValue::Method(n) => {
            if let Some(ty) = &mut n.return_type {
                link_type(ty);
            }
            for template in &mut n.templates {
                link(&mut template.attributes);
                link_template_bounds(template);
            }
            for param in &mut n.parameters {
                link_method_parameter(param);
            }
        }
        TagValue::TypelessParam(_)
        | TagValue::Deprecated(_)
        | TagValue::Generic(_)
        | TagValue::Invalid(_) => {}
    }
}

fn link_template_bounds(template: &mut TemplateTagValue) {
    for ty in template.bound.iter_mut().chain(template.default.iter_mut()) {
        link_type(ty);
    }
}

fn link_method_parameter(param: &mut MethodParameter) {
    link(&mut param.attributes);
    if let Some(ty) = &mut param.ty {
        link_type(ty);
    }
    if let Some(default) = &mut param.default {
        link_const(default);
    }
}

fn link_type(ty: &mut TypeNode) {
    link(ty.attributes_mut());
    match ty {
        TypeNode::Identifier(_) | TypeNode::This(_) => {}
        TypeNode::Nullable(n) => link_type(&mut n.inner),
        TypeNode::Union(n) => n.types.iter_mut().for_each(link_type),
        TypeNode::Intersection(n) => n.types.iter_mut().for_each(link_type),
        TypeNode::Array(n) => link_type(&mut n.inner),
        TypeNode::OffsetAccess(n) => {
            link_type(&mut n.inner);
            link_type(&mut n.offset);
        }
        TypeNode::Generic(n) => {
            link(&mut n.base.attributes);
            n.params.iter_mut().for_each(link_type);
        }
        TypeNode::ArrayShape(n) => {
            for item in &mut n.items {
                link(&mut item.attributes);
                if let Some(key) = &mut item.key {
                    link_shape_key(key);
                }
                link_type(&mut item.value);
            }
        }
        TypeNode::ObjectShape(n) => {
            for item in &mut n.items {
                link(&mut item.attributes);
                link_shape_key(&mut item.key);
                link_type(&mut item.value);
            }
        }
        TypeNode::Callable(n) => {
            link(&mut n.identifier.attributes);
            for param in &mut n.parameters {
                link(&mut param.attributes);
                link_type(&mut param.ty);
            }
            link_type(&mut n.return_type);
        }
        TypeNode::Conditional(n) => {
            for ty in [
                &mut *n.subject,
                &mut *n.target,
                &mut *n.if_type,
                &mut *n.else_type,
            ] {
                link_type(ty);
            }
        }
        TypeNode::ConditionalForParameter(n) => {
            for ty in [&mut *n.target, &mut *n.if_type, &mut *n.else_type] {
                link_type(ty);
            }
        }
        TypeNode::Const(n) => link_const(&mut n.expr),
    }
}

fn link_shape_key(key: &mut ShapeKey) {
    match key {
        ShapeKey::Identifier(id) => link(&mut id.attributes),
        ShapeKey::Const(expr) => link_const(expr),
    }
}

fn link_const(expr: &mut ConstExpr) {
    link(expr.attributes_mut());
    match expr {
        ConstExpr::Array(array) => {
            for item in &mut array.items {
                link(&mut item.attributes);
                if let Some(key) = &mut item.key {
                    link_const(key);
                }
                link_const(&mut item.value);
            }
        }
        ConstExpr::New(new) => new.args.iter_mut().for_each(link_const),
        ConstExpr::Integer(_)
        | ConstExpr::Float(_)
        | ConstExpr::String(_)
        | ConstExpr::Bool(_)
        | ConstExpr::Null(_)
        | ConstExpr::Fetch(_) => {}
    }
}
