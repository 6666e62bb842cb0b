//! [`playtomic`](https://docs.rs/playtomic)'s proc-macro implementation. See that crate for
//! documentation, and do not use this crate directly.

#![cfg_attr(all(feature = "clippy-insane", debug_assertions), warn(
    //// Turn the "allow" lints listed by `rustc -W help` into warn lints:
    absolute_paths_not_starting_with_crate, elided_lifetimes_in_paths,
    explicit_outlives_requirements, keyword_idents, macro_use_extern_crate, meta_variable_misuse,
    missing_copy_implementations, missing_debug_implementations, missing_docs, non_ascii_idents,
    single_use_lifetimes, trivial_casts, trivial_numeric_casts, unreachable_pub, unsafe_code,
    unused_crate_dependencies, unused_extern_crates, unused_import_braces, unused_lifetimes,
    unused_qualifications, unused_results, variant_size_differences,
    //// Ditto for clippy lint categories (see https://github.com/rust-lang/rust-clippy):
    clippy::all, clippy::cargo, clippy::nursery, clippy::pedantic,
))]
#![cfg_attr(debug_assertions, allow(
    //// turn off individual noisy/buggy lints enabled by broader categories above:
    clippy::missing_const_for_fn,             // not relevant
    clippy::redundant_pub_crate,              // a bit broken
    clippy::wildcard_enum_match_arm,          // don't care
    clippy::wildcard_imports,                 // don't care
    elided_lifetimes_in_paths,                // adding <'_> everywhere is ugly
))]
#![forbid(unsafe_code)]

#[allow(unused_extern_crates)] extern crate proc_macro;

macro_rules! diagnostic_error {
    ($ID:expr, $SPAN:expr, $($REST:tt)+) => {
        $crate::diagnostic::Diagnostic::error($ID, format!($($REST)+), $SPAN)
    }
}

mod prelude {
    pub(crate) use crate::diagnostic::{id, Diagnostic, DiagnosticSink, ResultExt, Severity};
    pub(crate) type Result<T, E = Diagnostic> = core::result::Result<T, E>;
}
mod arguments;
mod diagnostic;
mod emitter;
mod expand;
mod predicates;
mod registry;
mod signature;
mod syntax;
mod transforms;
mod with_tokens;

use proc_macro::TokenStream;

/// `stringify!(expr)`: the value of `expr` paired with its source text.
#[proc_macro_error::proc_macro_error]
#[proc_macro]
pub fn stringify(input: TokenStream) -> TokenStream {
    crate::expand::freestanding("stringify", input.into()).into()
}

/// `url!("...")`: a `Url` whose string is checked at compile time.
#[proc_macro_error::proc_macro_error]
#[proc_macro]
pub fn url(input: TokenStream) -> TokenStream {
    crate::expand::freestanding("validated-url", input.into()).into()
}

/// `warning!("...")`: emits a compile-time warning.
#[proc_macro_error::proc_macro_error]
#[proc_macro]
pub fn warning(input: TokenStream) -> TokenStream {
    crate::expand::freestanding("warning", input.into()).into()
}

/// `#[async_bridge]`: adds an `async` sibling of a completion-callback function.
#[proc_macro_error::proc_macro_error]
#[proc_macro_attribute]
pub fn async_bridge(attr: TokenStream, item: TokenStream) -> TokenStream {
    crate::expand::attached("async-bridge", attr.into(), item.into()).into()
}

/// `#[copyable]`: adds a `copy` method to a struct.
#[proc_macro_error::proc_macro_error]
#[proc_macro_attribute]
pub fn copyable(attr: TokenStream, item: TokenStream) -> TokenStream {
    crate::expand::attached("copyable", attr.into(), item.into()).into()
}

/// `#[case_detection]`: adds an `is_*` method per enum variant.
#[proc_macro_error::proc_macro_error]
#[proc_macro_attribute]
pub fn case_detection(attr: TokenStream, item: TokenStream) -> TokenStream {
    crate::expand::attached("case-detection", attr.into(), item.into()).into()
}

/// `#[wrap_stored_properties("attr")]`: applies `#[attr]` to every field.
#[proc_macro_error::proc_macro_error]
#[proc_macro_attribute]
pub fn wrap_stored_properties(attr: TokenStream, item: TokenStream) -> TokenStream {
    crate::expand::attached("wrap-stored-properties", attr.into(), item.into()).into()
}

/// `#[stored_access(default_value = ..)]`: a getter/setter pair backed by a key-value store.
#[proc_macro_error::proc_macro_error]
#[proc_macro_attribute]
pub fn stored_access(attr: TokenStream, item: TokenStream) -> TokenStream {
    crate::expand::attached("stored-access", attr.into(), item.into()).into()
}

/// `#[equatable]`: derives `PartialEq` unless it is already derived.
#[proc_macro_error::proc_macro_error]
#[proc_macro_attribute]
pub fn equatable(attr: TokenStream, item: TokenStream) -> TokenStream {
    crate::expand::attached("equatable", attr.into(), item.into()).into()
}
