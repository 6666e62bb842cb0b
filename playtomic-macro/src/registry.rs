//! Transform name → implementation.
//!
//! The table is built exactly once, the first time a macro is expanded, and is read-only after
//! that.

use crate::{
    arguments::ArgumentList,
    prelude::*,
    transforms::{self, Site, TransformFn, TransformRequest, TransformResult},
};
use core::fmt;
use proc_macro2::Span;
use std::{collections::BTreeMap, sync::OnceLock};

/// Where a transform's output goes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TransformKind {
    /// `name!(..)` replaced by an expression.
    Expression,
    /// `name!(..)` replaced by declarations.
    Declaration,
    /// Siblings of the attached item.
    Peer,
    /// Members of the attached type.
    Member,
    /// Attributes on the members of the attached type.
    MemberAttribute,
    /// Accessors replacing the attached property declaration.
    Accessor,
    /// Conformances of the attached type.
    Extension,
}

#[derive(Clone, Copy)]
pub(crate) struct Transform {
    pub(crate) name: &'static str,
    pub(crate) kind: TransformKind,
    function: TransformFn,
}
impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Transform").field("name", &self.name).field("kind", &self.kind).finish()
    }
}

impl Transform {
    /// Runs the transform. A failed run never yields declarations, and reports exactly one error.
    pub(crate) fn invoke(
        &self, site: &Site, arguments: &ArgumentList, sink: &mut DiagnosticSink,
    ) -> TransformResult {
        let request = TransformRequest { site, arguments, sink: &mut *sink };
        match (self.function)(request) {
            Ok(_) if sink.has_errors() => TransformResult::Empty,
            Ok(result) => result,
            Err(diagnostic) => {
                sink.push(diagnostic);
                TransformResult::Empty
            }
        }
    }
}

#[derive(Debug)]
pub(crate) struct UnknownTransform(pub(crate) String);
impl fmt::Display for UnknownTransform {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "no transform is registered as `{}`", self.0)
    }
}
impl From<UnknownTransform> for Diagnostic {
    fn from(unknown: UnknownTransform) -> Self {
        Self::at(Severity::Error, id::UNKNOWN_TRANSFORM, unknown.to_string(), Span::call_site())
    }
}

#[derive(Debug, Default)]
pub(crate) struct Registry {
    transforms: BTreeMap<&'static str, Transform>,
}

impl Registry {
    pub(crate) fn register(
        &mut self, name: &'static str, kind: TransformKind, function: TransformFn,
    ) -> &mut Self {
        let previous = self.transforms.insert(name, Transform { name, kind, function });
        debug_assert!(previous.is_none(), "transform `{}` registered twice", name);
        self
    }

    pub(crate) fn resolve(&self, name: &str) -> Result<&Transform, UnknownTransform> {
        self.transforms.get(name).ok_or_else(|| UnknownTransform(name.to_owned()))
    }

    /// The built-in transforms.
    pub(crate) fn builtin() -> &'static Self {
        static BUILTIN: OnceLock<Registry> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            use TransformKind::*;
            let mut registry = Self::default();
            registry
                .register("stringify", Expression, transforms::stringify::expand)
                .register("validated-url", Expression, transforms::url::expand)
                .register("warning", Declaration, transforms::warning::expand)
                .register("async-bridge", Peer, transforms::async_bridge::expand)
                .register("copyable", Member, transforms::copyable::expand)
                .register("case-detection", Member, transforms::case_detection::expand)
                .register(
                    "wrap-stored-properties",
                    MemberAttribute,
                    transforms::wrap_stored_properties::expand,
                )
                .register("stored-access", Accessor, transforms::stored_access::expand)
                .register("equatable", Extension, transforms::equatable::expand);
            registry
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn resolves_every_builtin() {
        let registry = Registry::builtin();
        let kinds: Vec<_> = [
            "stringify",
            "validated-url",
            "warning",
            "async-bridge",
            "copyable",
            "case-detection",
            "wrap-stored-properties",
            "stored-access",
            "equatable",
        ]
        .iter()
        .map(|name| registry.resolve(name).map(|t| t.kind).unwrap())
        .collect();
        assert_eq!(
            kinds,
            [
                TransformKind::Expression,
                TransformKind::Expression,
                TransformKind::Declaration,
                TransformKind::Peer,
                TransformKind::Member,
                TransformKind::Member,
                TransformKind::MemberAttribute,
                TransformKind::Accessor,
                TransformKind::Extension,
            ]
        );
    }

    #[test]
    fn unknown_names_do_not_resolve() {
        let error = Registry::builtin().resolve("Copyable").unwrap_err();
        assert_eq!(error.to_string(), "no transform is registered as `Copyable`");
        assert_eq!(Diagnostic::from(error).id, id::UNKNOWN_TRANSFORM);
    }

    #[test]
    fn builtin_is_initialised_once() {
        assert!(core::ptr::eq(Registry::builtin(), Registry::builtin()));
    }
}
