//! `warning!("...")`: reports the message as a compiler warning.
//!
//! Procedural-macro warnings are only rendered by nightly toolchains, so the invocation also
//! expands to an anonymous const that uses a `#[deprecated]` item carrying the message. Stable
//! toolchains report that use as a `deprecated` lint warning at the literal.

use super::{TransformRequest, TransformResult};
use crate::{predicates::static_string, prelude::*};
use proc_macro2::{Span, TokenStream};
use quote::quote_spanned;
use syn::{spanned::Spanned, LitStr};

const REQUIRES_LITERAL: &str = "`warning!` requires a non-interpolated string literal";

pub(crate) fn expand(request: TransformRequest) -> Result<TransformResult> {
    let expr = request.arguments.single_positional().ok_or_else(|| {
        Diagnostic::at(Severity::Error, id::INVALID_ARGUMENT, REQUIRES_LITERAL, request.site.span)
    })?;
    let text = static_string(expr).context(id::INVALID_ARGUMENT, REQUIRES_LITERAL, expr)?;
    request.sink.push(Diagnostic::warning(id::WARNING, text.value.clone(), expr));
    Ok(TransformResult::Declarations(vec![deprecated_use(&text.value, expr.span())]))
}

fn deprecated_use(text: &str, span: Span) -> TokenStream {
    let note = LitStr::new(text, span);
    quote_spanned! {span=>
        const _: () = {
            #[deprecated(note = #note)]
            #[allow(non_upper_case_globals)]
            const warning: () = ();
            warning
        };
    }
}

#[cfg(test)]
mod tests {
    use crate::{prelude::*, transforms::testing};
    use pretty_assertions::assert_eq;
    use quote::quote;

    #[test]
    fn emits_the_message_as_a_warning() {
        let (tokens, diagnostics) =
            testing::freestanding("warning", quote!("macro-generated warning"));
        assert_eq!(
            tokens,
            quote! {
                const _: () = {
                    #[deprecated(note = "macro-generated warning")]
                    #[allow(non_upper_case_globals)]
                    const warning: () = ();
                    warning
                };
            }
            .to_string()
        );
        assert_eq!(testing::messages(&diagnostics), ["macro-generated warning"]);
        assert_eq!(diagnostics[0].severity, Severity::Warning);
        assert_eq!(diagnostics[0].id, id::WARNING);
    }

    #[test]
    fn rejects_interpolation() {
        let (tokens, diagnostics) =
            testing::freestanding("warning", quote!(format!("{} left", n)));
        assert!(tokens.is_empty());
        assert_eq!(
            testing::messages(&diagnostics),
            ["`warning!` requires a non-interpolated string literal"]
        );
        assert!(diagnostics[0].is_error());
    }
}
