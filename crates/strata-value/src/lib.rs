//! Tree-value model for Strata.
//!
//! This crate defines the single recursive value type the merge engine
//! operates on, together with the classification and comparison rules every
//! other Strata crate relies on.
//!
//! # Key Types
//!
//! - [`TreeValue`] -- Closed set of value kinds (leaves, sequences, mappings)
//! - [`ValueKind`] -- Tag naming the concrete kind of a value
//! - [`Pattern`] -- Shared compiled regular expression, compared by identity
//! - [`Callable`] -- Shared opaque closure, compared by identity
//!
//! # Key Functions
//!
//! - [`is_spreadable`] -- Does this value take part in recursive merges?
//! - [`empty_like`] -- Fresh empty container matching a value's shape
//! - [`deep_equals`] -- Recursive structural equivalence
//! - [`strict_equals`] -- Shallow (identity-or-primitive) equality

pub mod classify;
pub mod equality;
pub mod error;
pub mod json;
pub mod value;

pub use classify::{empty_like, is_spreadable, is_truthy, strict_equals};
pub use equality::deep_equals;
pub use error::{ValueError, ValueResult};
pub use value::{Callable, CallableFn, Mapping, Pattern, TreeValue, ValueKind};
