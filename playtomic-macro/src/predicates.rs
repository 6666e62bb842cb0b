//! Pure classification of syntax nodes.
//!
//! Nothing in here fails: a node that doesn't match is answered with `false` or `None`.

use crate::{
    syntax::{unwrap_generic, Property, Segment, StringLiteral},
    with_tokens::WithTokens,
};
use proc_macro2::Ident;
use syn::{Expr, ExprLit, ExprPath, ExprUnary, Lit, Path, Type, UnOp};

/// Backed by storage: a field, or a declaration without a body.
pub(crate) fn is_stored_property(property: &Property) -> bool {
    property.body.is_none()
}

/// Has a body supplying the value rather than storage.
pub(crate) fn is_computed_property(property: &Property) -> bool {
    property.body.is_some()
}

/// Belongs to the type rather than to a value of it, i.e. takes no `self`.
pub(crate) fn is_static_property(property: &Property) -> bool {
    property.is_static
}

pub(crate) fn is_single_segment_string_literal(literal: &StringLiteral) -> bool {
    matches!(literal.segments.as_slice(), [Segment::Text(_)])
}

/// The text of `expr` if it is a string literal without interpolation.
pub(crate) fn static_string(expr: &Expr) -> Option<WithTokens<'_, String>> {
    let literal = StringLiteral::lower(expr)?;
    if !is_single_segment_string_literal(&literal) {
        return None;
    }
    match literal.segments.into_iter().next() {
        Some(Segment::Text(text)) => Some(WithTokens::new(text, expr)),
        _ => None,
    }
}

/// The type of value a literal spells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum LiteralType {
    Bool,
    Int,
    String,
    Float,
    /// `Theme::Dark` is taken to be a `Theme`. This is a guess from the spelling only.
    Named(Path),
    Unrecognized,
}

pub(crate) fn classify_literal_type(expr: &Expr) -> LiteralType {
    match *expr {
        Expr::Lit(ExprLit { ref lit, .. }) => match *lit {
            Lit::Bool(_) => LiteralType::Bool,
            Lit::Int(_) => LiteralType::Int,
            Lit::Str(_) => LiteralType::String,
            Lit::Float(_) => LiteralType::Float,
            _ => LiteralType::Unrecognized,
        },
        Expr::Unary(ExprUnary { op: UnOp::Neg(_), ref expr, .. }) =>
            match classify_literal_type(expr) {
                numeric @ (LiteralType::Int | LiteralType::Float) => numeric,
                _ => LiteralType::Unrecognized,
            },
        Expr::Group(ref group) => classify_literal_type(&group.expr),
        Expr::Paren(ref paren) => classify_literal_type(&paren.expr),
        Expr::Path(ExprPath { qself: None, ref path, .. }) if path.segments.len() >= 2 => {
            let qualifier = path.segments.len() - 1;
            LiteralType::Named(Path {
                leading_colon: path.leading_colon,
                segments: path.segments.iter().take(qualifier).cloned().collect(),
            })
        }
        _ => LiteralType::Unrecognized,
    }
}

/// What the transforms need to know about a property, recomputed whenever it is asked for.
#[derive(Clone, Copy, Debug)]
pub(crate) struct PropertyDescriptor<'a> {
    pub(crate) name: &'a Ident,
    pub(crate) declared_type: Option<&'a Type>,
    pub(crate) is_optional: bool,
    pub(crate) is_stored: bool,
    pub(crate) is_static: bool,
}

pub(crate) fn descriptor<'a>(property: &'a Property<'_>) -> PropertyDescriptor<'a> {
    PropertyDescriptor {
        name: &property.name,
        declared_type: property.ty,
        is_optional: property.ty.and_then(|ty| unwrap_generic(ty, "Option")).is_some(),
        is_stored: is_stored_property(property),
        is_static: is_static_property(property),
    }
}
