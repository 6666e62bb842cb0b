//! Macro argument lists: `(expr, label = expr, ...)`.
//!
//! `syn::AttributeArgs` would only give us literals on the right of `=`, whereas `store =
//! UserDefaults::standard()` needs an arbitrary expression, so arguments are parsed by hand.

use crate::prelude::*;
use proc_macro2::{Ident, TokenStream};
use quote::ToTokens;
use syn::{
    parse::{Parse, ParseStream, Parser},
    punctuated::Punctuated,
    Expr, Token,
};

/// One argument, optionally labelled.
#[derive(Clone, Debug)]
pub(crate) struct Argument {
    pub(crate) label: Option<Ident>,
    pub(crate) expr: Expr,
}
impl Parse for Argument {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let label = if input.peek(syn::Ident) && input.peek2(Token![=]) && !input.peek2(Token![==])
        {
            let label = input.parse()?;
            input.parse::<Token![=]>()?;
            Some(label)
        } else {
            None
        };
        Ok(Self { label, expr: input.parse()? })
    }
}
impl ToTokens for Argument {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        if let Some(ref label) = self.label {
            label.to_tokens(tokens);
            <Token![=]>::default().to_tokens(tokens);
        }
        self.expr.to_tokens(tokens);
    }
}

/// The ordered arguments of one macro invocation. Labels are unique.
#[derive(Clone, Debug, Default)]
pub(crate) struct ArgumentList {
    arguments: Vec<Argument>,
}

impl ArgumentList {
    pub(crate) fn parse(tokens: TokenStream) -> Result<Self> {
        let parser = Punctuated::<Argument, Token![,]>::parse_terminated;
        let arguments: Vec<Argument> = parser.parse2(tokens)?.into_iter().collect();

        for (index, argument) in arguments.iter().enumerate() {
            if let Some(ref label) = argument.label {
                let duplicate = arguments[..index]
                    .iter()
                    .any(|earlier| earlier.label.as_ref() == Some(label));
                if duplicate {
                    return Err(diagnostic_error!(
                        id::INVALID_ARGUMENT,
                        label,
                        "duplicate argument `{}`",
                        label
                    ));
                }
            }
        }
        Ok(Self { arguments })
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Argument> {
        self.arguments.iter()
    }

    /// The argument with the given label.
    pub(crate) fn labeled(&self, label: &str) -> Option<&Expr> {
        self.arguments
            .iter()
            .find(|argument| argument.label.as_ref().map_or(false, |l| l == label))
            .map(|argument| &argument.expr)
    }

    /// The only argument, if there is exactly one and it has no label.
    pub(crate) fn single_positional(&self) -> Option<&Expr> {
        match self.arguments.as_slice() {
            [Argument { label: None, expr }] => Some(expr),
            _ => None,
        }
    }
}
