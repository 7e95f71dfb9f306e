//! Structural merge engine for Strata.
//!
//! Combines a target tree with a source tree field by field and element by
//! element. The source is authoritative on conflicts, except where both sides
//! hold composites, which are reconciled recursively. Inputs are never
//! mutated; results are freshly built and, with `clone: true`, share no
//! container with the inputs.
//!
//! # Quick Start
//!
//! ```rust
//! use strata_merge::{deep_merge, MergeOptions};
//! use strata_value::TreeValue;
//!
//! let defaults = TreeValue::mapping([("retries", TreeValue::from(3)), ("verbose", false.into())]);
//! let overrides = TreeValue::mapping([("verbose", true)]);
//!
//! let merged = deep_merge(&defaults, &overrides, &MergeOptions::cloning());
//! assert_eq!(merged.get("retries"), Some(&TreeValue::from(3)));
//! assert_eq!(merged.get("verbose"), Some(&TreeValue::from(true)));
//! ```

pub mod engine;
pub mod error;
pub mod options;
pub mod strategy;

pub use engine::{clone_if_requested, clone_value, deep_merge, merge_all, merge_mappings};
pub use error::{MergeError, MergeResult};
pub use options::{ArrayMergeMode, MergeConfig, MergeOptions};
pub use strategy::{ArrayMergeStrategy, ConcatArrays, IndexAligned, ReplaceArrays};

// Classification and equality live with the value model; re-exported so
// collaborators need only this crate.
pub use strata_value::{deep_equals, empty_like, is_spreadable, TreeValue};
