#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
mod completion;
mod nullable;
#[cfg(feature = "std")]
mod store;

pub use nullable::Nullable;
pub use playtomic_macro::{
    async_bridge, case_detection, copyable, equatable, stored_access, stringify, url, warning,
    wrap_stored_properties,
};
#[cfg(feature = "std")]
pub use store::{KeyValueStore, StoredValue, UserDefaults, Value};

/// Support for generated code. Not public API.
#[cfg(feature = "std")]
#[doc(hidden)]
pub mod __private {
    pub use crate::completion::{Completion, Pending};
    pub use ::url::Url;
}
