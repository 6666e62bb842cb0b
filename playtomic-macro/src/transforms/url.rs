//! `url!("...")`: a URL checked while compiling.

use super::{has_std, TransformRequest, TransformResult};
use crate::{predicates::static_string, prelude::*};
use quote::quote_spanned;
use syn::{spanned::Spanned, LitStr};
use url::Url;

const REQUIRES_LITERAL: &str = "`url!` requires a static string literal";

pub(crate) fn expand(request: TransformRequest) -> Result<TransformResult> {
    has_std(request.site.span)?;
    let expr = request.arguments.single_positional().ok_or_else(|| {
        Diagnostic::at(Severity::Error, id::INVALID_ARGUMENT, REQUIRES_LITERAL, request.site.span)
    })?;
    let text = static_string(expr).context(id::INVALID_ARGUMENT, REQUIRES_LITERAL, expr)?;
    if let Err(error) = Url::parse(&text) {
        return Err(diagnostic_error!(id::MALFORMED_URL, &text, "malformed url: {}", *text)
            .with_help(error.to_string()));
    }

    let span = expr.span();
    let literal = LitStr::new(&text, span);
    Ok(TransformResult::Expression(quote_spanned! {span=>
        ::playtomic::__private::Url::parse(#literal)
            .unwrap_or_else(|_| ::core::unreachable!("url checked while compiling"))
    }))
}

#[cfg(test)]
mod tests {
    use crate::{prelude::*, transforms::testing};
    use pretty_assertions::assert_eq;
    use quote::quote;

    #[test]
    fn accepts_valid_urls() {
        let (tokens, diagnostics) =
            testing::freestanding("validated-url", quote!("https://example.org/"));
        assert!(diagnostics.is_empty());
        assert_eq!(
            tokens,
            quote! {
                ::playtomic::__private::Url::parse("https://example.org/")
                    .unwrap_or_else(|_| ::core::unreachable!("url checked while compiling"))
            }
            .to_string()
        );
    }

    #[test]
    fn rejects_malformed_urls() {
        let (tokens, diagnostics) =
            testing::freestanding("validated-url", quote!("https://not a url.com"));
        assert!(tokens.is_empty());
        assert_eq!(testing::messages(&diagnostics), ["malformed url: https://not a url.com"]);
        assert_eq!(diagnostics[0].id, id::MALFORMED_URL);
        assert!(diagnostics[0].help.is_some());
    }

    #[test]
    fn rejects_interpolated_strings() {
        let (tokens, diagnostics) = testing::freestanding(
            "validated-url",
            quote!(format!("https://{}/api/path", domain)),
        );
        assert!(tokens.is_empty());
        assert_eq!(testing::messages(&diagnostics), ["`url!` requires a static string literal"]);
        assert_eq!(diagnostics[0].id, id::INVALID_ARGUMENT);
    }

    #[test]
    fn rejects_missing_argument() {
        let (_, diagnostics) = testing::freestanding("validated-url", quote!());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].id, id::INVALID_ARGUMENT);
    }
}
