//! A closed view over the `syn` nodes the transforms care about.
//!
//! `syn` hands us the whole Rust grammar. The transforms only ever look at a handful of shapes:
//! declaration groups and their members, property declarations and string literals. Lowering into
//! these small enums up front means every predicate can `match` exhaustively and nobody has to
//! remember which of syn's dozens of variants are relevant.

use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, ToTokens, TokenStreamExt};
use syn::{
    ext::IdentExt,
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    token,
    visit::{self, Visit},
    Attribute, Block, Expr, ExprLit, Fields, FnArg, GenericArgument, Generics, Item, Lit, LitStr,
    Member as FieldMember, Path, PathArguments, ReturnType, Signature, Token, Type, TypePath,
    Variant, Visibility,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum DeclKind {
    Struct,
    Enum,
    Union,
    Other,
}

/// A type declaration and its members.
#[derive(Debug)]
pub(crate) struct DeclGroup<'a> {
    pub(crate) kind: DeclKind,
    pub(crate) attrs: &'a [Attribute],
    pub(crate) name: Option<&'a Ident>,
    pub(crate) vis: Option<&'a Visibility>,
    pub(crate) generics: Option<&'a Generics>,
    pub(crate) members: Vec<Member<'a>>,
}

#[derive(Debug)]
pub(crate) enum Member<'a> {
    Property(Property<'a>),
    EnumCase(EnumCase<'a>),
}

/// A data member: a struct or union field, or a method-shaped property declaration.
#[derive(Clone, Debug)]
pub(crate) struct Property<'a> {
    /// Name used for bindings and parameters; `field_N` for tuple fields.
    pub(crate) name: Ident,
    /// How to reach the member on a value: `self.name` or `self.0`.
    pub(crate) member: FieldMember,
    pub(crate) ty: Option<&'a Type>,
    pub(crate) body: Option<&'a Block>,
    pub(crate) is_static: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum CaseShape {
    Unit,
    Tuple,
    Struct,
}

#[derive(Debug)]
pub(crate) struct EnumCase<'a> {
    pub(crate) name: &'a Ident,
    pub(crate) shape: CaseShape,
}

impl<'a> DeclGroup<'a> {
    pub(crate) fn lower(item: &'a Item) -> Self {
        match *item {
            Item::Struct(ref item) => Self {
                kind: DeclKind::Struct,
                attrs: &item.attrs,
                name: Some(&item.ident),
                vis: Some(&item.vis),
                generics: Some(&item.generics),
                members: lower_fields(&item.fields),
            },
            Item::Union(ref item) => Self {
                kind: DeclKind::Union,
                attrs: &item.attrs,
                name: Some(&item.ident),
                vis: Some(&item.vis),
                generics: Some(&item.generics),
                members: item
                    .fields
                    .named
                    .iter()
                    .enumerate()
                    .map(|(index, field)| Member::Property(Property::from_field(index, field)))
                    .collect(),
            },
            Item::Enum(ref item) => Self {
                kind: DeclKind::Enum,
                attrs: &item.attrs,
                name: Some(&item.ident),
                vis: Some(&item.vis),
                generics: Some(&item.generics),
                members: item.variants.iter().map(|v| Member::EnumCase(v.into())).collect(),
            },
            _ => Self {
                kind: DeclKind::Other,
                attrs: &[],
                name: None,
                vis: None,
                generics: None,
                members: vec![],
            },
        }
    }

    pub(crate) fn properties(&self) -> impl Iterator<Item = &Property<'a>> {
        self.members.iter().filter_map(|member| match *member {
            Member::Property(ref property) => Some(property),
            Member::EnumCase(_) => None,
        })
    }

    pub(crate) fn cases(&self) -> impl Iterator<Item = &EnumCase<'a>> {
        self.members.iter().filter_map(|member| match *member {
            Member::EnumCase(ref case) => Some(case),
            Member::Property(_) => None,
        })
    }
}

fn lower_fields(fields: &Fields) -> Vec<Member<'_>> {
    fields
        .iter()
        .enumerate()
        .map(|(index, field)| Member::Property(Property::from_field(index, field)))
        .collect()
}

impl<'a> Property<'a> {
    fn from_field(index: usize, field: &'a syn::Field) -> Self {
        let (name, member) = match field.ident {
            Some(ref ident) => (ident.clone(), FieldMember::Named(ident.clone())),
            None => (format_ident!("field_{}", index), FieldMember::Unnamed(index.into())),
        };
        Self { name, member, ty: Some(&field.ty), body: None, is_static: false }
    }

    pub(crate) fn from_decl(decl: &'a PropertyDecl) -> Self {
        let name = decl.sig.ident.clone();
        let ty = match decl.sig.output {
            ReturnType::Type(_, ref ty) => Some(&**ty),
            ReturnType::Default => None,
        };
        Self {
            member: FieldMember::Named(name.clone()),
            name,
            ty,
            body: decl.body.as_ref(),
            is_static: decl.sig.receiver().is_none(),
        }
    }
}

impl<'a> From<&'a Variant> for EnumCase<'a> {
    fn from(variant: &'a Variant) -> Self {
        let shape = match variant.fields {
            Fields::Unit => CaseShape::Unit,
            Fields::Unnamed(_) => CaseShape::Tuple,
            Fields::Named(_) => CaseShape::Struct,
        };
        Self { name: &variant.ident, shape }
    }
}

/// A property written as a method signature, e.g. `pub fn user_id(&self) -> String;`.
///
/// Rust has no property syntax, so accessor-generating attributes are attached to a getter
/// signature without a body, which the macro then replaces.
#[derive(Clone, Debug)]
pub(crate) struct PropertyDecl {
    pub(crate) attrs: Vec<Attribute>,
    pub(crate) vis: Visibility,
    pub(crate) sig: Signature,
    pub(crate) body: Option<Block>,
}
impl Parse for PropertyDecl {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let attrs = input.call(Attribute::parse_outer)?;
        let vis = input.parse()?;
        let sig = input.parse()?;
        let body = if input.peek(token::Brace) {
            Some(input.parse()?)
        } else {
            input.parse::<Token![;]>()?;
            None
        };
        Ok(Self { attrs, vis, sig, body })
    }
}
impl ToTokens for PropertyDecl {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        tokens.append_all(&self.attrs);
        self.vis.to_tokens(tokens);
        self.sig.to_tokens(tokens);
        match self.body {
            Some(ref body) => body.to_tokens(tokens),
            None => <Token![;]>::default().to_tokens(tokens),
        }
    }
}

impl PropertyDecl {
    /// Whether the signature is just `fn name(&self)` or `fn name()`, with no generics.
    pub(crate) fn is_plain_getter(&self) -> bool {
        let receiver_ok = self.sig.inputs.iter().all(|arg| match *arg {
            FnArg::Receiver(ref receiver) =>
                receiver.reference.is_some() && receiver.mutability.is_none(),
            FnArg::Typed(_) => false,
        });
        receiver_ok
            && self.sig.generics.params.is_empty()
            && self.sig.generics.where_clause.is_none()
            && self.sig.asyncness.is_none()
            && self.sig.variadic.is_none()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Segment {
    Text(String),
    Interpolation(String),
}

/// A string literal, broken into literal text and interpolated parts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct StringLiteral {
    pub(crate) segments: Vec<Segment>,
}

impl StringLiteral {
    /// Lowers `"..."`, `format!(...)` and `concat!(...)`. Anything else is not a string literal.
    pub(crate) fn lower(expr: &Expr) -> Option<Self> {
        match *expr {
            Expr::Lit(ExprLit { lit: Lit::Str(ref lit), .. }) =>
                Some(Self { segments: vec![Segment::Text(lit.value())] }),
            Expr::Group(ref group) => Self::lower(&group.expr),
            Expr::Paren(ref paren) => Self::lower(&paren.expr),
            Expr::Macro(ref mac) => {
                let name = mac.mac.path.get_ident()?.to_string();
                let args = mac
                    .mac
                    .parse_body_with(Punctuated::<Expr, Token![,]>::parse_terminated)
                    .ok()?;
                match &*name {
                    "format" => Self::from_format(args.first()?),
                    "concat" => Some(Self::from_concat(args.iter())),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    fn from_format(template: &Expr) -> Option<Self> {
        let template = match *template {
            Expr::Lit(ExprLit { lit: Lit::Str(ref lit), .. }) => lit.value(),
            _ => return None,
        };
        let mut segments = Vec::new();
        let mut text = String::new();
        let mut chars = template.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    text.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    text.push('}');
                }
                '{' => {
                    if !text.is_empty() {
                        segments.push(Segment::Text(core::mem::take(&mut text)));
                    }
                    let placeholder = chars.by_ref().take_while(|&c| c != '}').collect();
                    segments.push(Segment::Interpolation(placeholder));
                }
                c => text.push(c),
            }
        }
        if !text.is_empty() || segments.is_empty() {
            segments.push(Segment::Text(text));
        }
        Some(Self { segments })
    }

    fn from_concat<'e>(args: impl Iterator<Item = &'e Expr>) -> Self {
        let mut segments: Vec<Segment> = Vec::new();
        for arg in args {
            let segment = match *arg {
                Expr::Lit(ExprLit { ref lit, .. }) => match literal_text(lit) {
                    Some(text) => Segment::Text(text),
                    None => Segment::Interpolation(lit.to_token_stream().to_string()),
                },
                ref other => Segment::Interpolation(other.to_token_stream().to_string()),
            };
            if let Segment::Text(ref text) = segment {
                if let Some(Segment::Text(last)) = segments.last_mut() {
                    last.push_str(text);
                    continue;
                }
            }
            segments.push(segment);
        }
        if segments.is_empty() {
            segments.push(Segment::Text(String::new()));
        }
        Self { segments }
    }
}

fn literal_text(lit: &Lit) -> Option<String> {
    match *lit {
        Lit::Str(ref lit) => Some(lit.value()),
        Lit::Char(ref lit) => Some(lit.value().to_string()),
        Lit::Int(ref lit) => Some(lit.base10_digits().to_owned()),
        Lit::Float(ref lit) => Some(lit.base10_digits().to_owned()),
        Lit::Bool(ref lit) => Some(lit.value.to_string()),
        _ => None,
    }
}

/// If `ty` is `wrapper<T>` (by last path segment), returns `T`.
pub(crate) fn unwrap_generic<'t>(ty: &'t Type, wrapper: &str) -> Option<&'t Type> {
    if let Type::Path(TypePath { qself: None, ref path }) = *ty {
        let last = path.segments.last()?;
        if last.ident != wrapper {
            return None;
        }
        if let PathArguments::AngleBracketed(ref abga) = last.arguments {
            let mut types = abga.args.iter().filter_map(|arg| match *arg {
                GenericArgument::Type(ref ty) => Some(ty),
                _ => None,
            });
            return match (types.next(), types.next()) {
                (Some(ty), None) => Some(ty),
                _ => None,
            };
        }
    }
    None
}

/// A string literal spelling an identifier, without any `r#` prefix.
pub(crate) fn ident_literal(ident: &Ident) -> LitStr {
    LitStr::new(&ident.unraw().to_string(), ident.span())
}

/// Records whether any path visited starts with `ident`.
pub(crate) struct Mentions<'i> {
    pub(crate) ident: &'i Ident,
    pub(crate) found: bool,
}
impl<'ast> Visit<'ast> for Mentions<'_> {
    fn visit_path(&mut self, path: &'ast Path) {
        if path.segments.first().map_or(false, |segment| segment.ident == *self.ident) {
            self.found = true;
        }
        visit::visit_path(self, path);
    }
}

/// Whether `ty` names any of the type parameters in `generics`.
pub(crate) fn mentions_type_param(ty: &Type, generics: &Generics) -> bool {
    generics.type_params().any(|param| {
        let mut mentions = Mentions { ident: &param.ident, found: false };
        mentions.visit_type(ty);
        mentions.found
    })
}
