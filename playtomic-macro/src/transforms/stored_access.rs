//! `#[stored_access(default_value = .., key = "..", store = ..)]`: turns a getter signature into a
//! getter/setter pair backed by a `KeyValueStore`.
//!
//! ```ignore
//! #[stored_access(default_value = 0)]
//! fn launch_count(&self) -> i64;
//! ```
//!
//! becomes `launch_count(&self) -> i64`, reading `"launch_count"` from
//! `UserDefaults::standard()` and falling back to `0`, plus `set_launch_count(&self, i64)`.

use super::{has_std, Node, TransformRequest, TransformResult};
use crate::{
    arguments::Argument,
    emitter::MethodSpec,
    predicates::{classify_literal_type, is_computed_property, static_string, LiteralType},
    prelude::*,
    signature,
    syntax::{ident_literal, Property, PropertyDecl},
};
use proc_macro2::{Span, TokenStream};
use quote::{format_ident, quote, ToTokens};
use syn::{Expr, LitStr, ReturnType, Type, TypePath};

const LABELS: [&str; 3] = ["default_value", "key", "store"];

pub(crate) fn expand(request: TransformRequest) -> Result<TransformResult> {
    has_std(request.site.span)?;
    let decl = match request.site.node {
        Node::Property(ref decl) => decl,
        Node::Item(_) | Node::Invocation => return Err(not_a_stored_property(request.site.span)),
    };

    // The declaration has no body, so every way out from here on is an error.
    if let Some(wrong) = request.arguments.iter().find(|argument| !is_known(argument)) {
        return Err(Diagnostic::error(id::STORED_ACCESS, "wrong argument", wrong)
            .with_help("expected `default_value = ..`, `key = \"..\"` or `store = ..`"));
    }
    let default_value = request.arguments.labeled("default_value").ok_or_else(|| {
        Diagnostic::at(
            Severity::Error,
            id::STORED_ACCESS,
            "missing `default_value`",
            request.site.span,
        )
        .with_help("add `default_value = ..`")
    })?;
    let key = match request.arguments.labeled("key") {
        Some(key) => {
            let text = static_string(key).context(
                id::INVALID_ARGUMENT,
                "`key` must be a static string literal",
                key,
            )?;
            LitStr::new(&text, Span::call_site())
        }
        None => ident_literal(&decl.sig.ident),
    };
    let store = match request.arguments.labeled("store") {
        Some(store) => store.to_token_stream(),
        None => quote!(::playtomic::UserDefaults::standard()),
    };

    let property = Property::from_decl(decl);
    if is_computed_property(&property) || !decl.is_plain_getter() {
        return Err(not_a_stored_property(request.site.span));
    }
    let declared = match decl.sig.output {
        ReturnType::Type(_, ref ty) => Some(&**ty),
        ReturnType::Default => None,
    };
    let access = Access::new(default_value, declared)?;
    let ty = declared.map_or_else(|| access.ty.clone(), ToTokens::to_token_stream);
    Ok(TransformResult::Accessors {
        getter: getter(decl, &ty, &key, &store, &access),
        setter: setter(decl, &ty, &key, &store),
    })
}

fn is_known(argument: &Argument) -> bool {
    argument.label.as_ref().map_or(false, |label| LABELS.iter().any(|known| label == known))
}

fn not_a_stored_property(span: Span) -> Diagnostic {
    Diagnostic::at(
        Severity::Error,
        id::STORED_ACCESS,
        "`#[stored_access]` can only be applied to a stored property declaration",
        span,
    )
    .with_help("declare the property as `fn name(&self) -> Type;`")
}

/// How a value of the default's logical type is read back.
struct Access {
    /// The Rust type the logical type maps to.
    ty: TokenStream,
    /// `default_value`, converted to that type.
    default: TokenStream,
    /// Reads the value for `key` from `store`, both in scope as locals.
    read: TokenStream,
}

impl Access {
    /// Integers and floats are read through `integer`/`float` when the property is `i64`/`f64` (or
    /// undeclared). Any other declared type goes through its `StoredValue` impl.
    fn new(default_value: &Expr, declared: Option<&Type>) -> Result<Self> {
        let (store, key) = locals();
        let literal = classify_literal_type(default_value);
        let native = match literal {
            LiteralType::Int => "i64",
            LiteralType::Float => "f64",
            _ => "",
        };
        if let Some(ty) = declared.filter(|ty| !native.is_empty() && !is_primitive(ty, native)) {
            return Ok(Self {
                ty: ty.to_token_stream(),
                default: quote!(#default_value),
                read: quote!(#store.get::<#ty>(#key).unwrap_or(#default_value)),
            });
        }
        let access = match literal {
            LiteralType::Bool => Self {
                ty: quote!(bool),
                default: quote!(#default_value),
                read: quote!(#store.bool(#key)),
            },
            LiteralType::Int => Self {
                ty: quote!(i64),
                default: quote!(#default_value),
                read: quote!(#store.integer(#key)),
            },
            LiteralType::Float => Self {
                ty: quote!(f64),
                default: quote!(#default_value),
                read: quote!(#store.float(#key)),
            },
            LiteralType::String => Self {
                ty: quote!(::std::string::String),
                default: quote!(::std::string::String::from(#default_value)),
                read: quote! {
                    #store
                        .string(#key)
                        .unwrap_or_else(|| ::std::string::String::from(#default_value))
                },
            },
            LiteralType::Named(path) => Self {
                default: quote!(#default_value),
                read: quote!(#store.get::<#path>(#key).unwrap_or(#default_value)),
                ty: path.into_token_stream(),
            },
            LiteralType::Unrecognized => {
                return Err(diagnostic_error!(
                    id::UNSUPPORTED_TYPE,
                    default_value,
                    "this type is not supported yet"
                )
                .with_help("use a `bool`, integer, float or string literal, or an enum variant"));
            }
        };
        Ok(access)
    }
}

/// Whether `ty` is spelled as the bare primitive `name`.
fn is_primitive(ty: &Type, name: &str) -> bool {
    match *ty {
        Type::Path(TypePath { qself: None, ref path }) => path.is_ident(name),
        _ => false,
    }
}

/// The `store` and `key` locals of the generated accessors.
fn locals() -> (TokenStream, TokenStream) {
    let store = format_ident!("store", span = Span::mixed_site());
    let key = format_ident!("key", span = Span::mixed_site());
    (store.into_token_stream(), key.into_token_stream())
}

fn getter(
    decl: &PropertyDecl, ty: &TokenStream, key: &LitStr, store: &TokenStream, access: &Access,
) -> TokenStream {
    let (store_local, key_local) = locals();
    let Access { ref default, ref read, .. } = *access;
    let body = quote! {
        use ::playtomic::KeyValueStore as _;
        let #store_local = &#store;
        let #key_local = #key;
        if #store_local.value(#key_local).is_none() {
            return #default;
        }
        #read
    };
    let mut method = MethodSpec::new(decl.vis.clone(), decl.sig.ident.clone(), body);
    method.attrs = decl.attrs.clone();
    method.receiver = signature::receiver(&decl.sig);
    method.output = Some(ty.clone());
    method.method()
}

fn setter(decl: &PropertyDecl, ty: &TokenStream, key: &LitStr, store: &TokenStream) -> TokenStream {
    let (store_local, _) = locals();
    let body = quote! {
        use ::playtomic::KeyValueStore as _;
        let #store_local = &#store;
        #store_local.set(new_value, #key);
    };
    let name = format_ident!("set_{}", decl.sig.ident);
    let mut method = MethodSpec::new(decl.vis.clone(), name, body);
    method.attrs = signature::copied_attrs(&decl.attrs);
    method.receiver = signature::receiver(&decl.sig);
    method.params = vec![(quote!(new_value), ty.clone())];
    method.method()
}

#[cfg(test)]
mod tests {
    use crate::{prelude::*, transforms::testing};
    use pretty_assertions::assert_eq;
    use quote::quote;

    #[test]
    fn synthesises_getter_and_setter() {
        let (tokens, diagnostics) = testing::attached(
            "stored-access",
            quote!(default_value = 0),
            quote! { #[inline] pub fn launch_count(&self) -> i64; },
        );
        assert!(diagnostics.is_empty());
        assert_eq!(
            tokens,
            quote! {
                #[inline]
                pub fn launch_count(&self) -> i64 {
                    use ::playtomic::KeyValueStore as _;
                    let store = &::playtomic::UserDefaults::standard();
                    let key = "launch_count";
                    if store.value(key).is_none() {
                        return 0;
                    }
                    store.integer(key)
                }
                pub fn set_launch_count(&self, new_value: i64) {
                    use ::playtomic::KeyValueStore as _;
                    let store = &::playtomic::UserDefaults::standard();
                    store.set(new_value, "launch_count");
                }
            }
            .to_string()
        );
    }

    #[test]
    fn uses_custom_key_and_store_and_infers_named_types() {
        let (tokens, diagnostics) = testing::attached(
            "stored-access",
            quote!(default_value = Theme::Dark, key = "theme", store = self.settings),
            quote! { fn theme(&self); },
        );
        assert!(diagnostics.is_empty());
        assert_eq!(
            tokens,
            quote! {
                fn theme(&self) -> Theme {
                    use ::playtomic::KeyValueStore as _;
                    let store = &self.settings;
                    let key = "theme";
                    if store.value(key).is_none() {
                        return Theme::Dark;
                    }
                    store.get::<Theme>(key).unwrap_or(Theme::Dark)
                }
                fn set_theme(&self, new_value: Theme) {
                    use ::playtomic::KeyValueStore as _;
                    let store = &self.settings;
                    store.set(new_value, "theme");
                }
            }
            .to_string()
        );
    }

    #[test]
    fn other_numeric_types_go_through_stored_value() {
        let (tokens, diagnostics) = testing::attached(
            "stored-access",
            quote!(default_value = 3, store = self.store),
            quote! { fn retries(&self) -> u32; },
        );
        assert!(diagnostics.is_empty());
        assert_eq!(
            tokens,
            quote! {
                fn retries(&self) -> u32 {
                    use ::playtomic::KeyValueStore as _;
                    let store = &self.store;
                    let key = "retries";
                    if store.value(key).is_none() {
                        return 3;
                    }
                    store.get::<u32>(key).unwrap_or(3)
                }
                fn set_retries(&self, new_value: u32) {
                    use ::playtomic::KeyValueStore as _;
                    let store = &self.store;
                    store.set(new_value, "retries");
                }
            }
            .to_string()
        );

        let (tokens, _) = testing::attached(
            "stored-access",
            quote!(default_value = 0.5),
            quote! { fn volume(&self) -> f32; },
        );
        assert!(tokens.contains("store . get :: < f32 > (key) . unwrap_or (0.5)"));

        let (tokens, _) = testing::attached(
            "stored-access",
            quote!(default_value = 0.5),
            quote! { fn volume(&self) -> f64; },
        );
        assert!(tokens.contains("store . float (key)"));
    }

    #[test]
    fn strings_fall_back_to_the_default() {
        let (tokens, _) = testing::attached(
            "stored-access",
            quote!(default_value = "guest"),
            quote! { fn user_name() -> String; },
        );
        assert!(tokens.contains("return :: std :: string :: String :: from (\"guest\")"));
        assert!(tokens.contains("fn set_user_name (new_value : String)"));
    }

    #[test]
    fn unsupported_defaults_are_errors() {
        let decl = quote! { fn user_id(&self) -> UserId; };
        let (tokens, diagnostics) = testing::attached(
            "stored-access",
            quote!(default_value = load_default()),
            decl.clone(),
        );
        assert_eq!(tokens, decl.to_string());
        assert_eq!(testing::messages(&diagnostics), ["this type is not supported yet"]);
        assert_eq!(diagnostics[0].id, id::UNSUPPORTED_TYPE);
    }

    #[test]
    fn malformed_arguments_are_errors() {
        let decl = quote! { fn flag(&self) -> bool; };
        for (attr, message) in [
            (quote!(true), "wrong argument"),
            (quote!(default = true), "wrong argument"),
            (quote!(key = "flag"), "missing `default_value`"),
        ] {
            let (tokens, diagnostics) = testing::attached("stored-access", attr, decl.clone());
            assert_eq!(tokens, decl.to_string());
            assert_eq!(testing::messages(&diagnostics), [message]);
            assert_eq!(diagnostics[0].severity, Severity::Error);
            assert_eq!(diagnostics[0].id, id::STORED_ACCESS);
        }
    }

    #[test]
    fn computed_properties_and_methods_are_rejected() {
        for decl in [
            quote! { fn flag(&self) -> bool { true } },
            quote! { fn flag(&self, index: usize) -> bool; },
            quote! { fn flag(&mut self) -> bool; },
            quote! { fn flag<T>(&self) -> bool; },
        ] {
            let (tokens, diagnostics) =
                testing::attached("stored-access", quote!(default_value = false), decl.clone());
            assert_eq!(tokens, decl.to_string());
            assert_eq!(diagnostics.len(), 1);
            assert!(diagnostics[0].is_error());
            assert_eq!(diagnostics[0].id, id::STORED_ACCESS);
        }
    }

    #[test]
    fn keys_must_be_static_strings() {
        let (_, diagnostics) = testing::attached(
            "stored-access",
            quote!(default_value = false, key = format!("{}", prefix)),
            quote! { fn flag(&self) -> bool; },
        );
        assert_eq!(testing::messages(&diagnostics), ["`key` must be a static string literal"]);
        assert_eq!(diagnostics[0].id, id::INVALID_ARGUMENT);
    }
}
