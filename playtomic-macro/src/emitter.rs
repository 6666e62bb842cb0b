//! Renders synthesised declarations and splices results back around the site.

use crate::{
    registry::TransformKind,
    syntax::DeclGroup,
    transforms::{Node, Site, TransformResult},
};
use proc_macro2::{Ident, TokenStream};
use quote::{quote, ToTokens};
use syn::{parse_quote, Attribute, Generics, Item, Visibility};

/// A method to be rendered: everything `fn` needs, in logical form.
#[derive(Clone, Debug)]
pub(crate) struct MethodSpec {
    pub(crate) attrs: Vec<Attribute>,
    pub(crate) vis: Visibility,
    pub(crate) asyncness: bool,
    pub(crate) name: Ident,
    pub(crate) generics: Generics,
    /// `&self`, `&mut self`, `self` etc.
    pub(crate) receiver: Option<TokenStream>,
    /// `(pattern, type)` pairs.
    pub(crate) params: Vec<(TokenStream, TokenStream)>,
    pub(crate) output: Option<TokenStream>,
    pub(crate) body: TokenStream,
}

impl MethodSpec {
    pub(crate) fn new(vis: Visibility, name: Ident, body: TokenStream) -> Self {
        Self {
            attrs: Vec::new(),
            vis,
            asyncness: false,
            name,
            generics: Generics::default(),
            receiver: None,
            params: Vec::new(),
            output: None,
            body,
        }
    }

    pub(crate) fn method(&self) -> TokenStream {
        let Self { ref attrs, ref vis, ref name, ref generics, ref body, .. } = *self;
        let asyncness = self.asyncness.then(|| quote!(async));
        let inputs = self
            .receiver
            .iter()
            .cloned()
            .chain(self.params.iter().map(|&(ref pat, ref ty)| quote!(#pat: #ty)));
        let output = self.output.as_ref().map(|ty| quote!(-> #ty));
        let where_clause = &generics.where_clause;
        quote! {
            #( #attrs )*
            #vis #asyncness fn #name #generics ( #( #inputs ),* ) #output #where_clause {
                #body
            }
        }
    }
}

/// Wraps `decls` in an inherent impl of the group's type. `None` for a group without a name.
pub(crate) fn member_impl(group: &DeclGroup, decls: &[TokenStream]) -> Option<TokenStream> {
    let name = group.name?;
    let generics = group.generics.cloned().unwrap_or_default();
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    Some(quote! {
        impl #impl_generics #name #ty_generics #where_clause {
            #( #decls )*
        }
    })
}

/// Places a transform's result relative to the site it was produced for.
pub(crate) fn splice(kind: TransformKind, site: &Site, result: TransformResult) -> TokenStream {
    let original = site.node.to_token_stream();
    match result {
        TransformResult::Empty => original,
        TransformResult::Expression(expr) => expr,
        TransformResult::Declarations(decls) if kind == TransformKind::Member => {
            let item = match site.node {
                Node::Item(ref item) => item,
                Node::Property(_) | Node::Invocation => return original,
            };
            match member_impl(&DeclGroup::lower(item), &decls) {
                Some(members) => quote!(#original #members),
                None => original,
            }
        }
        TransformResult::Declarations(decls) => quote!(#original #( #decls )*),
        TransformResult::Accessors { getter, setter } => quote!(#getter #setter),
        TransformResult::Extension(path) => quote!(#[derive(#path)] #original),
        TransformResult::MemberAttributes { attribute, members } => match site.node {
            Node::Item(ref item) =>
                with_member_attributes(item, &attribute, &members).into_token_stream(),
            Node::Property(_) | Node::Invocation => original,
        },
    }
}

/// A copy of `item` with `#[attribute]` appended to the fields at the given indices.
fn with_member_attributes(item: &Item, attribute: &TokenStream, members: &[usize]) -> Item {
    let mut item = item.clone();
    let fields: Vec<_> = match item {
        Item::Struct(ref mut item) => item.fields.iter_mut().collect(),
        Item::Union(ref mut item) => item.fields.named.iter_mut().collect(),
        _ => Vec::new(),
    };
    for (index, field) in fields.into_iter().enumerate() {
        if members.contains(&index) {
            field.attrs.push(parse_quote!(#[#attribute]));
        }
    }
    item
}
