//! Compile-time diagnostics.
//!
//! Transforms never talk to `proc-macro-error` directly. They return a [`Diagnostic`] for a hard
//! failure, or push one into the [`DiagnosticSink`] they were handed, and the host shim flushes the
//! sink once expansion is over. Keeping the channel in our own hands means transforms can be run
//! (and tested) outside a real macro invocation.

use core::fmt;
use proc_macro2::{Span, TokenStream};
use proc_macro_error::{DiagnosticExt, Level, SpanRange};
use quote::ToTokens;
use std::borrow::Cow;

/// The fixed domain every diagnostic identifier lives in.
pub(crate) const DOMAIN: &str = "playtomic";

/// Transform-specific diagnostic identifiers.
pub(crate) mod id {
    use super::MessageId;

    pub(crate) const DUPLICATE_MEMBER: MessageId = MessageId::new("duplicate_member");
    pub(crate) const INVALID_ARGUMENT: MessageId = MessageId::new("invalid_argument");
    pub(crate) const MALFORMED_URL: MessageId = MessageId::new("malformed_url");
    pub(crate) const NOT_A_TYPE: MessageId = MessageId::new("not_a_type");
    pub(crate) const NOT_STRUCT: MessageId = MessageId::new("not_struct");
    pub(crate) const REQUIRES_STD: MessageId = MessageId::new("requires_std");
    pub(crate) const STORED_ACCESS: MessageId = MessageId::new("stored_access");
    pub(crate) const SYNTAX: MessageId = MessageId::new("syntax");
    pub(crate) const UNKNOWN_TRANSFORM: MessageId = MessageId::new("unknown_transform");
    pub(crate) const UNSUPPORTED_TYPE: MessageId = MessageId::new("unsupported_type");
    pub(crate) const WARNING: MessageId = MessageId::new("warning");
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct MessageId {
    pub(crate) domain: &'static str,
    pub(crate) id: &'static str,
}
impl MessageId {
    const fn new(id: &'static str) -> Self {
        Self { domain: DOMAIN, id }
    }
}
impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}::{}", self.domain, self.id)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Severity {
    Warning,
    Error,
}

#[derive(Clone, Copy, Debug)]
struct SpanPair {
    start: Span,
    end: Span,
}
impl From<TokenStream> for SpanPair {
    fn from(value: TokenStream) -> Self {
        // Inspired by syn::Error::new_spanned.
        let mut iter = value.into_iter();
        let start = iter.next().map_or_else(Span::call_site, |t| t.span());
        let end = iter.last().map_or(start, |t| t.span());
        Self { start, end }
    }
}
impl From<Span> for SpanPair {
    fn from(span: Span) -> Self {
        Self { start: span, end: span }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Diagnostic {
    pub(crate) severity: Severity,
    pub(crate) id: MessageId,
    pub(crate) message: Cow<'static, str>,
    pub(crate) help: Option<Cow<'static, str>>,
    span: SpanPair,
}
impl Diagnostic {
    fn new(
        severity: Severity, id: MessageId, message: impl Into<Cow<'static, str>>, span: SpanPair,
    ) -> Self {
        Self { severity, id, message: message.into(), help: None, span }
    }

    pub(crate) fn error(
        id: MessageId, message: impl Into<Cow<'static, str>>, spanned: impl ToTokens,
    ) -> Self {
        Self::new(Severity::Error, id, message, spanned.into_token_stream().into())
    }

    pub(crate) fn warning(
        id: MessageId, message: impl Into<Cow<'static, str>>, spanned: impl ToTokens,
    ) -> Self {
        Self::new(Severity::Warning, id, message, spanned.into_token_stream().into())
    }

    /// A diagnostic located at a bare span, e.g. the attribute currently being expanded.
    pub(crate) fn at(
        severity: Severity, id: MessageId, message: impl Into<Cow<'static, str>>, span: Span,
    ) -> Self {
        Self::new(severity, id, message, span.into())
    }

    #[must_use = "This returns a new object with updated values. Were you expecting a mutator?"]
    pub(crate) fn with_help(self, help: impl Into<Cow<'static, str>>) -> Self {
        Self { help: Some(help.into()), ..self }
    }

    pub(crate) fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Hands the diagnostic over to `proc-macro-error`. Only valid inside a macro invocation.
    pub(crate) fn emit(self) {
        let level = match self.severity {
            Severity::Error => Level::Error,
            Severity::Warning => Level::Warning,
        };
        let range = SpanRange { first: self.span.start, last: self.span.end };
        let mut diagnostic =
            proc_macro_error::Diagnostic::spanned_range(range, level, self.message.into_owned());
        if let Some(help) = self.help {
            diagnostic = diagnostic.help(help.into_owned());
        }
        diagnostic.note(self.id.to_string()).emit();
    }
}
impl From<syn::Error> for Diagnostic {
    fn from(error: syn::Error) -> Self {
        Self::at(Severity::Error, id::SYNTAX, error.to_string(), error.span())
    }
}
impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.message)
    }
}

pub(crate) trait ResultExt<T> {
    fn context(
        self, id: MessageId, message: impl Into<Cow<'static, str>>, spanned: impl ToTokens,
    ) -> Result<T, Diagnostic>;
}
impl<T, E: fmt::Display> ResultExt<T> for Result<T, E> {
    fn context(
        self, id: MessageId, message: impl Into<Cow<'static, str>>, spanned: impl ToTokens,
    ) -> Result<T, Diagnostic> {
        self.map_err(|err| {
            let message = message.into();
            Diagnostic::error(id, format!("{}: {}", message, err), spanned)
        })
    }
}
impl<T> ResultExt<T> for Option<T> {
    fn context(
        self, id: MessageId, message: impl Into<Cow<'static, str>>, spanned: impl ToTokens,
    ) -> Result<T, Diagnostic> {
        self.ok_or_else(|| Diagnostic::error(id, message, spanned))
    }
}

/// The write-only channel a transform reports through.
#[derive(Debug, Default)]
pub(crate) struct DiagnosticSink {
    diagnostics: Vec<Diagnostic>,
}
impl DiagnosticSink {
    pub(crate) fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub(crate) fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    #[cfg(test)]
    pub(crate) fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub(crate) fn emit(self) {
        for diagnostic in self.diagnostics {
            diagnostic.emit();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use quote::quote;

    #[test]
    fn ids_render_with_their_domain() {
        let diagnostic = Diagnostic::error(id::MALFORMED_URL, "malformed url: x", quote!("x"))
            .with_help("relative URL without a base");
        assert_eq!(diagnostic.id.to_string(), "playtomic::malformed_url");
        assert_eq!(diagnostic.help.as_deref(), Some("relative URL without a base"));
        assert!(diagnostic.is_error());
    }

    #[test]
    fn sink_reports_errors_only_for_errors() {
        let mut sink = DiagnosticSink::default();
        sink.push(Diagnostic::warning(id::WARNING, "careful", quote!("careful")));
        assert!(!sink.has_errors());
        sink.push(Diagnostic::error(id::SYNTAX, "broken", quote!(x)));
        assert!(sink.has_errors());
        assert_eq!(sink.into_diagnostics().len(), 2);
    }
}
