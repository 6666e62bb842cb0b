//! `stringify!(expr)` → `(expr, "expr")`.

use super::{TransformRequest, TransformResult};
use crate::prelude::*;
use quote::{quote_spanned, ToTokens};
use syn::{spanned::Spanned, LitStr};

pub(crate) fn expand(request: TransformRequest) -> Result<TransformResult> {
    let expr = request.arguments.single_positional().ok_or_else(|| {
        Diagnostic::at(
            Severity::Error,
            id::INVALID_ARGUMENT,
            "`stringify!` takes exactly one expression",
            request.site.span,
        )
    })?;
    let span = expr.span();
    let text = LitStr::new(&expr.to_token_stream().to_string(), span);
    Ok(TransformResult::Expression(quote_spanned! {span=> (#expr, #text) }))
}

#[cfg(test)]
mod tests {
    use crate::{prelude::*, transforms::testing};
    use pretty_assertions::assert_eq;
    use quote::quote;

    #[test]
    fn pairs_value_with_source_text() {
        let (tokens, diagnostics) = testing::freestanding("stringify", quote!(a + b));
        assert!(diagnostics.is_empty());
        assert_eq!(tokens, quote!((a + b, "a + b")).to_string());
    }

    #[test]
    fn requires_exactly_one_expression() {
        for input in [quote!(), quote!(a, b), quote!(value = a)] {
            let (tokens, diagnostics) = testing::freestanding("stringify", input);
            assert!(tokens.is_empty());
            assert_eq!(
                testing::messages(&diagnostics),
                ["`stringify!` takes exactly one expression"]
            );
            assert_eq!(diagnostics[0].id, id::INVALID_ARGUMENT);
        }
    }
}
