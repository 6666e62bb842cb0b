//! `#[wrap_stored_properties("attr")]`: puts `#[attr]` on every stored field.

use super::{TransformRequest, TransformResult};
use crate::{
    predicates::{descriptor, static_string},
    prelude::*,
    syntax::{DeclGroup, DeclKind},
};
use proc_macro2::{Group, TokenStream};
use quote::quote;
use syn::{
    parse::{ParseStream, Parser},
    Path, Token,
};

const REQUIRES_ATTRIBUTE: &str =
    "`#[wrap_stored_properties]` requires a string literal containing the name of an attribute";

pub(crate) fn expand(request: TransformRequest) -> Result<TransformResult> {
    let expr = request.arguments.single_positional().ok_or_else(|| {
        Diagnostic::at(Severity::Error, id::INVALID_ARGUMENT, REQUIRES_ATTRIBUTE, request.site.span)
    })?;
    let text = static_string(expr).context(id::INVALID_ARGUMENT, REQUIRES_ATTRIBUTE, expr)?;
    let attribute = attribute_body
        .parse_str(&text)
        .context(id::INVALID_ARGUMENT, REQUIRES_ATTRIBUTE, expr)?;

    let group = match request.item() {
        Some(item) => DeclGroup::lower(item),
        None => return Ok(TransformResult::Empty),
    };
    if !matches!(group.kind, DeclKind::Struct | DeclKind::Union) {
        return Ok(TransformResult::Empty);
    }
    let members: Vec<_> = group
        .properties()
        .enumerate()
        .filter(|&(_, property)| {
            let descriptor = descriptor(property);
            descriptor.is_stored && !descriptor.is_static
        })
        .map(|(index, _)| index)
        .collect();
    Ok(if members.is_empty() {
        TransformResult::Empty
    } else {
        TransformResult::MemberAttributes { attribute, members }
    })
}

/// What goes between `#[` and `]`: a path, then nothing, a delimited group, or `= value`.
fn attribute_body(input: ParseStream) -> syn::Result<TokenStream> {
    let path = input.call(Path::parse_mod_style)?;
    let rest = if input.is_empty() {
        TokenStream::new()
    } else if input.peek(Token![=]) {
        let eq: Token![=] = input.parse()?;
        let value: TokenStream = input.parse()?;
        quote!(#eq #value)
    } else {
        let group: Group = input.parse()?;
        quote!(#group)
    };
    if !input.is_empty() {
        return Err(input.error("unexpected tokens after the attribute"));
    }
    Ok(quote!(#path #rest))
}
