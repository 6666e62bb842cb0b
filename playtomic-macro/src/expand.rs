//! The host shim: from macro input tokens to output tokens plus diagnostics.

use crate::{
    arguments::ArgumentList,
    emitter,
    prelude::*,
    registry::{Registry, Transform, TransformKind},
    syntax::PropertyDecl,
    transforms::{Node, Site},
};
use proc_macro2::{Span, TokenStream};
use syn::Item;

/// The output of one expansion, before the diagnostics are handed to the compiler.
#[derive(Debug)]
pub(crate) struct Expansion {
    pub(crate) tokens: TokenStream,
    pub(crate) sink: DiagnosticSink,
}

pub(crate) fn attached(name: &str, attr: TokenStream, item: TokenStream) -> TokenStream {
    // If anything goes wrong, still emit the item so that uses of it don't pile up more errors.
    proc_macro_error::set_dummy(item.clone());
    let Expansion { tokens, sink } = expand_attached(name, attr, item);
    sink.emit();
    tokens
}

pub(crate) fn freestanding(name: &str, input: TokenStream) -> TokenStream {
    let Expansion { tokens, sink } = expand_freestanding(name, input);
    sink.emit();
    tokens
}

pub(crate) fn expand_attached(name: &str, attr: TokenStream, item: TokenStream) -> Expansion {
    let mut sink = DiagnosticSink::default();
    let tokens = match attached_site(name, attr, &item) {
        Ok((transform, site, arguments)) => {
            let result = transform.invoke(&site, &arguments, &mut sink);
            emitter::splice(transform.kind, &site, result)
        }
        Err(diagnostic) => {
            sink.push(diagnostic);
            item
        }
    };
    Expansion { tokens, sink }
}

pub(crate) fn expand_freestanding(name: &str, input: TokenStream) -> Expansion {
    let mut sink = DiagnosticSink::default();
    let site = Site { span: Span::call_site(), node: Node::Invocation };
    let tokens = match resolve(name).and_then(|t| Ok((t, ArgumentList::parse(input)?))) {
        Ok((transform, arguments)) => {
            let result = transform.invoke(&site, &arguments, &mut sink);
            emitter::splice(transform.kind, &site, result)
        }
        Err(diagnostic) => {
            sink.push(diagnostic);
            TokenStream::new()
        }
    };
    Expansion { tokens, sink }
}

fn resolve(name: &str) -> Result<&'static Transform> {
    Ok(Registry::builtin().resolve(name)?)
}

fn attached_site(
    name: &str, attr: TokenStream, item: &TokenStream,
) -> Result<(&'static Transform, Site, ArgumentList)> {
    let transform = resolve(name)?;
    let arguments = ArgumentList::parse(attr)?;
    let node = match transform.kind {
        TransformKind::Accessor => Node::Property(syn::parse2::<PropertyDecl>(item.clone())?),
        _ => Node::Item(syn::parse2::<Item>(item.clone())?),
    };
    Ok((transform, Site { span: Span::call_site(), node }, arguments))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transforms::testing;
    use pretty_assertions::assert_eq;
    use quote::quote;

    #[test]
    fn unknown_transforms_leave_the_item_alone() {
        let item = quote! { struct Unchanged; };
        let (tokens, diagnostics) = testing::attached("no-such-transform", quote!(), item.clone());
        assert_eq!(tokens, item.to_string());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].id, id::UNKNOWN_TRANSFORM);
    }

    #[test]
    fn unparseable_arguments_are_reported() {
        let (_, diagnostics) = testing::freestanding("stringify", quote!(1 +));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].id, id::SYNTAX);
    }

    #[test]
    fn expansion_is_deterministic() {
        let item =
            quote! { #[derive(Clone)] pub struct Pair { first: i32, second: Option<String> } };
        let first = testing::attached("copyable", quote!(), item.clone());
        let second = testing::attached("copyable", quote!(), item);
        assert_eq!(first.0, second.0);
        assert_eq!(testing::messages(&first.1), testing::messages(&second.1));
    }
}
