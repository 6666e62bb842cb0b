//! Function signature inspection for callback bridging.
//!
//! Recognises a trailing completion callback, however it is spelled, and pulls out the pieces a
//! bridged signature is built from: the forwarded leading parameters, the generics without the
//! callback's type parameter, and the attributes which must follow the function around.

use crate::syntax::{unwrap_generic, Mentions};
use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote, ToTokens};
use syn::{
    punctuated::Punctuated,
    visit::Visit,
    Attribute, FnArg, GenericParam, Generics, Pat, PatIdent, PatType, Path, PathArguments,
    ReturnType, Signature, TraitBound, Type, TypeParamBound, TypePath, WherePredicate,
};

/// How the callback argument has to be passed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Passing {
    /// `impl Fn(T)` or a generic `F: Fn(T)`: the closure itself.
    Direct,
    /// `Box<dyn Fn(T)>`.
    Boxed,
    /// `&dyn Fn(T)`.
    Ref,
    /// `&mut dyn FnMut(T)`.
    RefMut,
}

/// A trailing completion callback.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Callback<'a> {
    /// The type of the single value the callback is called with.
    pub(crate) value: &'a Type,
    pub(crate) passing: Passing,
    /// The type parameter standing for the callback, if it is generic.
    pub(crate) generic: Option<&'a Ident>,
}

impl Callback<'_> {
    /// Wraps `closure` so it can be passed where the callback is expected.
    pub(crate) fn pass(&self, closure: TokenStream) -> TokenStream {
        match self.passing {
            Passing::Direct => closure,
            Passing::Boxed => quote!(::std::boxed::Box::new(#closure)),
            Passing::Ref => quote!(&#closure),
            Passing::RefMut => quote!(&mut #closure),
        }
    }
}

/// The completion callback ending `sig`'s parameter list, if there is one.
pub(crate) fn completion_callback(sig: &Signature) -> Option<Callback<'_>> {
    let (last, leading) = match sig.inputs.last() {
        Some(&FnArg::Typed(ref last)) => (last, sig.inputs.len() - 1),
        Some(&FnArg::Receiver(_)) | None => return None,
    };
    if sig.inputs.iter().take(leading).any(is_typed_self) {
        return None;
    }
    let callback = match *peel(&last.ty) {
        Type::ImplTrait(ref ty) => Callback {
            value: fn_bound_value(ty.bounds.iter())?,
            passing: Passing::Direct,
            generic: None,
        },
        Type::Reference(ref reference) => match *peel(&reference.elem) {
            Type::TraitObject(ref object) => Callback {
                value: fn_bound_value(object.bounds.iter())?,
                passing: match reference.mutability {
                    Some(_) => Passing::RefMut,
                    None => Passing::Ref,
                },
                generic: None,
            },
            _ => return None,
        },
        ref ty @ Type::Path(_) => match unwrap_generic(ty, "Box").map(peel) {
            Some(&Type::TraitObject(ref object)) => Callback {
                value: fn_bound_value(object.bounds.iter())?,
                passing: Passing::Boxed,
                generic: None,
            },
            Some(_) => return None,
            None => generic_callback(sig, ty)?,
        },
        _ => return None,
    };
    Some(callback)
}

/// `F` where `F: Fn(T)` is declared inline or in the where clause, and `F` is used nowhere else.
fn generic_callback<'a>(sig: &'a Signature, ty: &Type) -> Option<Callback<'a>> {
    let ident = match *ty {
        Type::Path(TypePath { qself: None, ref path }) => path.get_ident()?,
        _ => return None,
    };
    let param = sig.generics.type_params().find(|param| param.ident == *ident)?;
    let where_bounds = sig
        .generics
        .where_clause
        .iter()
        .flat_map(|clause| clause.predicates.iter())
        .filter_map(|predicate| match *predicate {
            WherePredicate::Type(ref predicate) if is_ident_type(&predicate.bounded_ty, ident) =>
                Some(predicate.bounds.iter()),
            _ => None,
        })
        .flatten();
    let value = fn_bound_value(param.bounds.iter().chain(where_bounds))?;

    let mut mentions = Mentions { ident, found: false };
    for input in sig.inputs.iter().take(sig.inputs.len() - 1) {
        mentions.visit_fn_arg(input);
    }
    mentions.visit_return_type(&sig.output);
    for other in sig.generics.params.iter() {
        match *other {
            GenericParam::Type(ref other) if other.ident == *ident => {}
            ref other => mentions.visit_generic_param(other),
        }
    }
    for predicate in sig.generics.where_clause.iter().flat_map(|clause| clause.predicates.iter()) {
        match *predicate {
            WherePredicate::Type(ref predicate) if is_ident_type(&predicate.bounded_ty, ident) => {}
            ref predicate => mentions.visit_where_predicate(predicate),
        }
    }
    if mentions.found {
        return None;
    }
    Some(Callback { value, passing: Passing::Direct, generic: Some(&param.ident) })
}

/// The argument type of the single `Fn*(T)` bound among `bounds`, if it returns nothing and `T` is
/// not a reference.
fn fn_bound_value<'a>(bounds: impl Iterator<Item = &'a TypeParamBound>) -> Option<&'a Type> {
    let mut fn_bounds = bounds.filter_map(|bound| match *bound {
        TypeParamBound::Trait(TraitBound { ref path, .. }) if is_fn_trait(path) => Some(path),
        _ => None,
    });
    let path = fn_bounds.next()?;
    if fn_bounds.next().is_some() {
        return None;
    }
    let arguments = match path.segments.last()?.arguments {
        PathArguments::Parenthesized(ref arguments) => arguments,
        _ => return None,
    };
    let returns_unit = match arguments.output {
        ReturnType::Default => true,
        ReturnType::Type(_, ref ty) =>
            matches!(**ty, Type::Tuple(ref tuple) if tuple.elems.is_empty()),
    };
    match (arguments.inputs.len(), arguments.inputs.first()) {
        (1, Some(value)) if returns_unit && !matches!(*peel(value), Type::Reference(_)) =>
            Some(value),
        _ => None,
    }
}

fn is_fn_trait(path: &Path) -> bool {
    path.segments.last().map_or(false, |segment| {
        segment.ident == "Fn" || segment.ident == "FnMut" || segment.ident == "FnOnce"
    })
}

fn is_ident_type(ty: &Type, ident: &Ident) -> bool {
    match *peel(ty) {
        Type::Path(TypePath { qself: None, ref path }) => path.is_ident(ident),
        _ => false,
    }
}

fn is_typed_self(arg: &FnArg) -> bool {
    match *arg {
        FnArg::Typed(PatType { ref pat, .. }) =>
            matches!(**pat, Pat::Ident(PatIdent { ref ident, .. }) if ident == "self"),
        FnArg::Receiver(_) => false,
    }
}

/// Looks through parentheses and invisible groups.
fn peel(ty: &Type) -> &Type {
    match *ty {
        Type::Paren(ref paren) => peel(&paren.elem),
        Type::Group(ref group) => peel(&group.elem),
        ref ty => ty,
    }
}

/// The parameters before the callback, as `(name, type)`. Parameters bound by a pattern other than
/// a plain identifier are renamed `arg0`, `arg1`, ...
pub(crate) fn forwarded_params(sig: &Signature) -> Vec<(Ident, &Type)> {
    sig.inputs
        .iter()
        .take(sig.inputs.len().saturating_sub(1))
        .filter_map(|arg| match *arg {
            FnArg::Typed(ref arg) => Some(arg),
            FnArg::Receiver(_) => None,
        })
        .enumerate()
        .map(|(index, arg)| {
            let name = match *arg.pat {
                Pat::Ident(PatIdent { by_ref: None, subpat: None, ref ident, .. }) => ident.clone(),
                _ => format_ident!("arg{}", index),
            };
            (name, &*arg.ty)
        })
        .collect()
}

/// The receiver of `sig`, verbatim.
pub(crate) fn receiver(sig: &Signature) -> Option<TokenStream> {
    sig.inputs
        .first()
        .filter(|arg| matches!(**arg, FnArg::Receiver(_)))
        .map(ToTokens::to_token_stream)
}

/// `generics` without the type parameter `ident` or any where-clause predicate bounding it.
pub(crate) fn without_type_param(generics: &Generics, ident: &Ident) -> Generics {
    let mut generics = generics.clone();
    generics.params = generics
        .params
        .into_iter()
        .filter(|param| !matches!(*param, GenericParam::Type(ref param) if param.ident == *ident))
        .collect::<Punctuated<_, _>>();
    if generics.params.is_empty() {
        generics.lt_token = None;
        generics.gt_token = None;
    }
    if let Some(ref mut clause) = generics.where_clause {
        clause.predicates = clause
            .predicates
            .iter()
            .filter(|predicate| match **predicate {
                WherePredicate::Type(ref predicate) => !is_ident_type(&predicate.bounded_ty, ident),
                _ => true,
            })
            .cloned()
            .collect();
    }
    if generics.where_clause.as_ref().map_or(false, |clause| clause.predicates.is_empty()) {
        generics.where_clause = None;
    }
    generics
}

/// `cfg` and `cfg`-like attributes, which should apply to anything generated alongside an item.
pub(crate) fn copied_attrs(attrs: &[Attribute]) -> Vec<Attribute> {
    attrs
        .iter()
        .filter(|attr| attr.path.is_ident("cfg") || attr.path.is_ident("doc_cfg"))
        .cloned()
        .collect()
}
