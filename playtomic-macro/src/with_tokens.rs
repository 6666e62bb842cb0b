//! Processed data and its source tokens.
//!
//! When classifying macro arguments, we want to keep track of the original source in case we need
//! to report an error. For example, when checking a `default_value = Theme::Dark` argument, we may
//! want to highlight `Theme::Dark` in the error message, but the value we work on is the inferred
//! type.
use core::{fmt, ops::Deref};
use proc_macro2::TokenStream;
use quote::ToTokens;

/// Processed data and its source tokens.
#[derive(Clone, Copy)]
pub(crate) struct WithTokens<'a, T> {
    // The value.
    pub(crate) value: T,
    // The tokens representing the value, for diagnostic purposes.
    to_tokens: &'a dyn ToTokens,
}
impl<T> Deref for WithTokens<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}
impl<T> ToTokens for WithTokens<'_, T> {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        tokens.extend(self.to_tokens.into_token_stream());
    }
}
impl<T: fmt::Debug> fmt::Debug for WithTokens<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("WithTokens").field("value", &self.value).finish()
    }
}
impl<'a, T> WithTokens<'a, T> {
    pub(crate) fn new(value: T, to_tokens: &'a dyn ToTokens) -> Self {
        Self { value, to_tokens }
    }
}
