//! `#[copyable]`: a `copy` method returning a modified clone of a struct.
//!
//! Every stored field becomes an optional parameter; `None` keeps the current value. A field which
//! is itself an `Option<T>` takes a `Nullable<T>` instead, so that "keep" and "set to `None`" can
//! be told apart. Field types which mention a type parameter are bounded by `Clone` on the method
//! itself, so the struct declaration needs no bounds.

use super::{TransformRequest, TransformResult};
use crate::{
    emitter::MethodSpec,
    predicates::descriptor,
    prelude::*,
    syntax::{mentions_type_param, unwrap_generic, DeclGroup, DeclKind, Property},
};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{parse_quote, Generics, Type, Visibility};

const NOT_STRUCT: &str = "`#[copyable]` can only be applied to a struct";

pub(crate) fn expand(request: TransformRequest) -> Result<TransformResult> {
    let not_struct =
        || Diagnostic::at(Severity::Error, id::NOT_STRUCT, NOT_STRUCT, request.site.span);
    let group = DeclGroup::lower(request.item().ok_or_else(not_struct)?);
    if group.kind != DeclKind::Struct {
        return Err(not_struct());
    }

    let properties: Vec<_> = group
        .properties()
        .filter(|property| {
            let descriptor = descriptor(property);
            descriptor.is_stored && !descriptor.is_static
        })
        .collect();
    if properties.is_empty() {
        return Ok(TransformResult::Empty);
    }

    let bounds = clone_bounds(&properties, group.generics);
    let mut params = Vec::with_capacity(properties.len());
    let mut inits = Vec::with_capacity(properties.len());
    for property in properties {
        let (ty, value) = parameter(property);
        let (name, member) = (descriptor(property).name, &property.member);
        params.push((quote!(#name), ty));
        inits.push(quote!(#member: #value));
    }

    let vis = group.vis.cloned().unwrap_or(Visibility::Inherited);
    let mut method =
        MethodSpec::new(vis, format_ident!("copy"), quote!(Self { #( #inits ),* }));
    method.attrs = vec![
        parse_quote!(#[doc = "Returns a copy of `self` with the given fields replaced."]),
        parse_quote!(#[must_use]),
    ];
    method.receiver = Some(quote!(&self));
    method.params = params;
    method.output = Some(quote!(Self));
    if !bounds.is_empty() {
        method.generics.where_clause =
            Some(parse_quote!(where #( #bounds: ::core::clone::Clone ),*));
    }
    Ok(TransformResult::Declarations(vec![method.method()]))
}

/// The distinct field types which mention a type parameter, and so need a `Clone` bound.
fn clone_bounds<'a>(properties: &[&Property<'a>], generics: Option<&Generics>) -> Vec<&'a Type> {
    let generics = match generics {
        Some(generics) => generics,
        None => return Vec::new(),
    };
    let mut bounds: Vec<&Type> = Vec::new();
    for ty in properties.iter().filter_map(|property| property.ty) {
        if mentions_type_param(ty, generics) && !bounds.contains(&ty) {
            bounds.push(ty);
        }
    }
    bounds
}

/// The parameter type for `property` and the expression picking between argument and current value.
fn parameter(property: &Property) -> (TokenStream, TokenStream) {
    let descriptor = descriptor(property);
    let (name, ty, member) = (descriptor.name, descriptor.declared_type, &property.member);
    let current = quote!(|| ::core::clone::Clone::clone(&self.#member));
    if descriptor.is_optional {
        let inner = ty.and_then(|ty| unwrap_generic(ty, "Option"));
        (quote!(::playtomic::Nullable<#inner>), quote!(#name.or_else(#current)))
    } else {
        (quote!(::core::option::Option<#ty>), quote!(#name.unwrap_or_else(#current)))
    }
}
