//! `#[case_detection]`: one `is_<variant>` method per enum variant.

use super::{TransformRequest, TransformResult};
use crate::{
    emitter::MethodSpec,
    prelude::*,
    syntax::{CaseShape, DeclGroup, DeclKind, EnumCase},
};
use heck::ToSnakeCase;
use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};
use std::collections::BTreeMap;
use syn::{ext::IdentExt, parse_quote, Visibility};

pub(crate) fn expand(request: TransformRequest) -> Result<TransformResult> {
    let group = match request.item() {
        Some(item) => DeclGroup::lower(item),
        None => return Ok(TransformResult::Empty),
    };
    if group.kind != DeclKind::Enum {
        return Ok(TransformResult::Empty);
    }
    let vis = group.vis.cloned().unwrap_or(Visibility::Inherited);
    let mut seen = BTreeMap::new();
    let mut decls = Vec::new();
    for case in group.cases() {
        let name = detector_name(case.name);
        if let Some(first) = seen.insert(name.to_string(), case.name) {
            return Err(diagnostic_error!(
                id::DUPLICATE_MEMBER,
                case.name,
                "`{}` would be generated for both `{}` and `{}`",
                name,
                first.unraw(),
                case.name.unraw()
            )
            .with_help("rename one of the variants"));
        }
        decls.push(detector(case, name, &vis));
    }
    Ok(if decls.is_empty() {
        TransformResult::Empty
    } else {
        TransformResult::Declarations(decls)
    })
}

fn detector_name(variant: &Ident) -> Ident {
    let snake = variant.unraw().to_string().to_snake_case();
    format_ident!("is_{}", snake, span = variant.span())
}

fn detector(case: &EnumCase, name: Ident, vis: &Visibility) -> TokenStream {
    let variant = case.name;
    let pattern = match case.shape {
        CaseShape::Unit => quote!(Self::#variant),
        CaseShape::Tuple => quote!(Self::#variant(..)),
        CaseShape::Struct => quote!(Self::#variant { .. }),
    };
    let doc = format!("Returns `true` if this is [`Self::{}`].", variant.unraw());

    let mut method = MethodSpec::new(vis.clone(), name, quote!(::core::matches!(*self, #pattern)));
    method.attrs = vec![parse_quote!(#[doc = #doc]), parse_quote!(#[must_use])];
    method.receiver = Some(quote!(&self));
    method.output = Some(quote!(bool));
    method.method()
}

#[cfg(test)]
mod tests {
    use crate::{prelude::*, transforms::testing};
    use pretty_assertions::assert_eq;
    use quote::quote;

    #[test]
    fn detects_every_case_regardless_of_payload() {
        let item = quote! {
            pub enum ViewState {
                Loading,
                Loaded { user_name: String },
                HTTPFailure(u16),
            }
        };
        let (tokens, diagnostics) = testing::attached("case-detection", quote!(), item.clone());
        assert!(diagnostics.is_empty());
        assert_eq!(
            tokens,
            quote! {
                #item
                impl ViewState {
                    #[doc = "Returns `true` if this is [`Self::Loading`]."]
                    #[must_use]
                    pub fn is_loading(&self) -> bool { ::core::matches!(*self, Self::Loading) }
                    #[doc = "Returns `true` if this is [`Self::Loaded`]."]
                    #[must_use]
                    pub fn is_loaded(&self) -> bool { ::core::matches!(*self, Self::Loaded { .. }) }
                    #[doc = "Returns `true` if this is [`Self::HTTPFailure`]."]
                    #[must_use]
                    pub fn is_http_failure(&self) -> bool {
                        ::core::matches!(*self, Self::HTTPFailure(..))
                    }
                }
            }
            .to_string()
        );
    }

    #[test]
    fn ignores_empty_enums_and_other_items() {
        for item in [quote!(enum Never {}), quote!(struct Loading;), quote!(fn loading() {})] {
            let (tokens, diagnostics) = testing::attached("case-detection", quote!(), item.clone());
            assert!(diagnostics.is_empty());
            assert_eq!(tokens, item.to_string());
        }
    }

    #[test]
    fn colliding_names_are_errors() {
        let item = quote! { enum Failure { HTTPError, Timeout, HttpError } };
        let (tokens, diagnostics) = testing::attached("case-detection", quote!(), item.clone());
        assert_eq!(tokens, item.to_string());
        assert_eq!(
            testing::messages(&diagnostics),
            ["`is_http_error` would be generated for both `HTTPError` and `HttpError`"]
        );
        assert_eq!(diagnostics[0].id, id::DUPLICATE_MEMBER);
    }
}
