//! `#[async_bridge]`: an `async` sibling for a function reporting its result through a trailing
//! completion callback.
//!
//! ```ignore
//! #[async_bridge]
//! fn fetch_user(id: u32, completion: impl FnOnce(Result<User, Error>)) { .. }
//! ```
//!
//! gains `async fn fetch_user_async(id: u32) -> Result<User, Error>`. Rust has no overloading, so
//! the sibling is suffixed rather than sharing the name.

use super::{has_std, TransformRequest, TransformResult};
use crate::{
    emitter::MethodSpec,
    prelude::*,
    signature::{self, completion_callback},
};
use proc_macro2::Span;
use quote::{format_ident, quote, ToTokens};
use syn::{parse_quote, Item, ReturnType};

pub(crate) fn expand(request: TransformRequest) -> Result<TransformResult> {
    has_std(request.site.span)?;
    let function = match request.item() {
        Some(&Item::Fn(ref function)) => function,
        _ => return Ok(TransformResult::Empty),
    };
    let sig = &function.sig;
    if sig.unsafety.is_some() {
        return Ok(TransformResult::Empty);
    }
    let callback = match completion_callback(sig) {
        Some(callback) => callback,
        None => return Ok(TransformResult::Empty),
    };

    let completion = format_ident!("completion", span = Span::mixed_site());
    let pending = format_ident!("pending", span = Span::mixed_site());
    let value = format_ident!("value", span = Span::mixed_site());

    let params = signature::forwarded_params(sig);
    let receiver = signature::receiver(sig);
    let name = &sig.ident;
    let args = params.iter().map(|&(ref name, _)| name);
    let closure = callback.pass(quote!(move |#value| #completion.resume(#value)));
    let mut call = match receiver {
        Some(_) => quote!(self.#name(#( #args, )* #closure)),
        None => quote!(#name(#( #args, )* #closure)),
    };
    if sig.asyncness.is_some() {
        call = quote!(#call.await);
    }
    let call = match sig.output {
        ReturnType::Default => quote!(#call;),
        ReturnType::Type(..) => quote!(let _ = #call;),
    };
    let body = quote! {
        let (#completion, #pending) = ::playtomic::__private::Completion::channel();
        #call
        #pending.await
    };

    let doc = match receiver {
        Some(_) => format!("Async version of [`{0}`](Self::{0}).", name),
        None => format!("Async version of [`{}`].", name),
    };
    let mut method = MethodSpec::new(function.vis.clone(), format_ident!("{}_async", name), body);
    method.attrs = signature::copied_attrs(&function.attrs);
    method.attrs.push(parse_quote!(#[doc = #doc]));
    method.asyncness = true;
    method.generics = match callback.generic {
        Some(generic) => signature::without_type_param(&sig.generics, generic),
        None => sig.generics.clone(),
    };
    method.receiver = receiver;
    method.params = params
        .iter()
        .map(|&(ref name, ty)| (name.to_token_stream(), ty.to_token_stream()))
        .collect();
    method.output = Some(callback.value.to_token_stream());
    Ok(TransformResult::Declarations(vec![method.method()]))
}
