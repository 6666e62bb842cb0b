//! `#[equatable]`: derives `PartialEq`, unless the type already does.

use super::{TransformRequest, TransformResult};
use crate::{
    prelude::*,
    syntax::{DeclGroup, DeclKind},
};
use syn::{parse_quote, punctuated::Punctuated, Attribute, Path, Token};

pub(crate) fn expand(request: TransformRequest) -> Result<TransformResult> {
    let not_a_type = |message: &'static str| {
        Diagnostic::at(Severity::Error, id::NOT_A_TYPE, message, request.site.span)
    };
    let group = match request.item() {
        Some(item) => DeclGroup::lower(item),
        None => return Err(not_a_type("`#[equatable]` can only be applied to a struct or enum")),
    };
    match group.kind {
        DeclKind::Struct | DeclKind::Enum => (),
        DeclKind::Union => {
            return Err(not_a_type("`PartialEq` cannot be derived for a union")
                .with_help("implement `PartialEq` by hand"));
        }
        DeclKind::Other => {
            return Err(not_a_type("`#[equatable]` can only be applied to a struct or enum"));
        }
    }
    if derives(group.attrs, "PartialEq") {
        return Ok(TransformResult::Empty);
    }
    Ok(TransformResult::Extension(parse_quote!(::core::cmp::PartialEq)))
}

/// Whether any `#[derive(..)]` among `attrs` names `name`, by last path segment.
fn derives(attrs: &[Attribute], name: &str) -> bool {
    attrs.iter().filter(|attr| attr.path.is_ident("derive")).any(|attr| {
        attr.parse_args_with(Punctuated::<Path, Token![,]>::parse_terminated)
            .map_or(false, |paths| {
                paths.iter().any(|path| path.segments.last().map_or(false, |s| s.ident == name))
            })
    })
}
