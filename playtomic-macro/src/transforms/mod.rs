//! The transforms, and the request/result types they share.
//!
//! Every transform is a plain function from a [`TransformRequest`] to a [`TransformResult`]. A
//! hard failure is returned as `Err(Diagnostic)`; a transform which wants to report something and
//! carry on pushes into the request's sink instead.

use crate::{arguments::ArgumentList, prelude::*, syntax::PropertyDecl};
use proc_macro2::{Span, TokenStream};
use quote::ToTokens;
use syn::Item;

pub(crate) mod async_bridge;
pub(crate) mod case_detection;
pub(crate) mod copyable;
pub(crate) mod equatable;
pub(crate) mod stored_access;
pub(crate) mod stringify;
pub(crate) mod url;
pub(crate) mod warning;
pub(crate) mod wrap_stored_properties;

/// Where a transform was attached or invoked.
#[derive(Debug)]
pub(crate) struct Site {
    /// The attribute or macro invocation, for diagnostics about the site as a whole.
    pub(crate) span: Span,
    pub(crate) node: Node,
}

#[derive(Debug)]
pub(crate) enum Node {
    /// The item an attribute is attached to.
    Item(Item),
    /// A method-shaped property declaration an accessor attribute is attached to.
    Property(PropertyDecl),
    /// A function-like invocation; everything interesting is in the arguments.
    Invocation,
}
impl ToTokens for Node {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        match *self {
            Self::Item(ref item) => item.to_tokens(tokens),
            Self::Property(ref decl) => decl.to_tokens(tokens),
            Self::Invocation => (),
        }
    }
}

pub(crate) struct TransformRequest<'a> {
    pub(crate) site: &'a Site,
    pub(crate) arguments: &'a ArgumentList,
    pub(crate) sink: &'a mut DiagnosticSink,
}
impl TransformRequest<'_> {
    pub(crate) fn item(&self) -> Option<&Item> {
        match self.site.node {
            Node::Item(ref item) => Some(item),
            Node::Property(_) | Node::Invocation => None,
        }
    }
}

#[derive(Debug)]
pub(crate) enum TransformResult {
    /// Members of the attached type, or siblings of the attached item.
    Declarations(Vec<TokenStream>),
    /// Replacement for a property declaration.
    Accessors { getter: TokenStream, setter: TokenStream },
    /// A trait the attached type should derive.
    Extension(syn::Path),
    /// Replacement for a function-like invocation.
    Expression(TokenStream),
    /// An attribute body to apply to the listed fields, by index.
    MemberAttributes { attribute: TokenStream, members: Vec<usize> },
    /// Nothing to add.
    Empty,
}

pub(crate) type TransformFn = fn(TransformRequest) -> Result<TransformResult>;

/// Transforms whose generated code names `std`-only runtime support call this first.
pub(crate) fn has_std(span: Span) -> Result<()> {
    if cfg!(feature = "std") {
        Ok(())
    } else {
        Err(Diagnostic::at(
            Severity::Error,
            id::REQUIRES_STD,
            "this macro requires the standard library",
            span,
        )
        .with_help("enable playtomic's `std` feature"))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Drives transforms through the host shim without `proc-macro-error`.

    use crate::{diagnostic::Diagnostic, expand};
    use proc_macro2::TokenStream;

    pub(crate) fn attached(
        name: &str, attr: TokenStream, item: TokenStream,
    ) -> (String, Vec<Diagnostic>) {
        let expansion = expand::expand_attached(name, attr, item);
        (expansion.tokens.to_string(), expansion.sink.into_diagnostics())
    }

    pub(crate) fn freestanding(name: &str, input: TokenStream) -> (String, Vec<Diagnostic>) {
        let expansion = expand::expand_freestanding(name, input);
        (expansion.tokens.to_string(), expansion.sink.into_diagnostics())
    }

    pub(crate) fn messages(diagnostics: &[Diagnostic]) -> Vec<String> {
        diagnostics.iter().map(ToString::to_string).collect()
    }
}
