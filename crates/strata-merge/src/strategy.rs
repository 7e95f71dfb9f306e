//! Array merge strategies.
//!
//! The dispatcher hands every sequence-into-sequence merge to the strategy
//! configured in [`MergeOptions`], without interpreting it. Any closure with
//! the right signature is a strategy too.

use strata_value::{is_spreadable, strict_equals, TreeValue};

use crate::engine::{clone_if_requested, deep_merge};
use crate::options::MergeOptions;

/// Reconciles a target sequence with a source sequence.
///
/// Implementations must not mutate their inputs and should route nested
/// composites back through [`deep_merge`] or [`clone_if_requested`] so the
/// `clone` option keeps its meaning.
pub trait ArrayMergeStrategy: Send + Sync {
    fn merge_arrays(
        &self,
        target: &[TreeValue],
        source: &[TreeValue],
        options: &MergeOptions,
    ) -> Vec<TreeValue>;
}

impl<F> ArrayMergeStrategy for F
where
    F: Fn(&[TreeValue], &[TreeValue], &MergeOptions) -> Vec<TreeValue> + Send + Sync,
{
    fn merge_arrays(
        &self,
        target: &[TreeValue],
        source: &[TreeValue],
        options: &MergeOptions,
    ) -> Vec<TreeValue> {
        self(target, source, options)
    }
}

// ---------------------------------------------------------------------------
// IndexAligned (default)
// ---------------------------------------------------------------------------

/// Index-aligned merge with append-if-novel leaves. The default strategy.
///
/// Starting from a copy of `target`, each source element at index `i`:
///
/// - fills slot `i` if the result has nothing there yet (past the end, or a
///   hole);
/// - otherwise, if spreadable, replaces slot `i` with the deep merge of
///   `target[i]` and the element;
/// - otherwise is appended, unless `target` already holds it by
///   [`strict_equals`].
///
/// Slots are checked against the result, which grows as leaves are
/// appended, while membership is checked against the original `target`.
#[derive(Clone, Copy, Debug, Default)]
pub struct IndexAligned;

impl ArrayMergeStrategy for IndexAligned {
    fn merge_arrays(
        &self,
        target: &[TreeValue],
        source: &[TreeValue],
        options: &MergeOptions,
    ) -> Vec<TreeValue> {
        let mut destination = target.to_vec();

        for (index, value) in source.iter().enumerate() {
            let slot_free = destination.get(index).map_or(true, TreeValue::is_undefined);

            if slot_free {
                let cloned = clone_if_requested(value, options);
                if index < destination.len() {
                    destination[index] = cloned;
                } else {
                    destination.push(cloned);
                }
            } else if is_spreadable(value) {
                destination[index] = match target.get(index) {
                    Some(base) => deep_merge(base, value, options),
                    None => deep_merge(&TreeValue::Undefined, value, options),
                };
            } else if !target.iter().any(|existing| strict_equals(existing, value)) {
                destination.push(clone_if_requested(value, options));
            }
        }

        destination
    }
}

// ---------------------------------------------------------------------------
// ReplaceArrays
// ---------------------------------------------------------------------------

/// The source sequence replaces the target outright.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReplaceArrays;

impl ArrayMergeStrategy for ReplaceArrays {
    fn merge_arrays(
        &self,
        _target: &[TreeValue],
        source: &[TreeValue],
        options: &MergeOptions,
    ) -> Vec<TreeValue> {
        source
            .iter()
            .map(|value| clone_if_requested(value, options))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// ConcatArrays
// ---------------------------------------------------------------------------

/// Target elements followed by source elements, duplicates kept.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConcatArrays;

impl ArrayMergeStrategy for ConcatArrays {
    fn merge_arrays(
        &self,
        target: &[TreeValue],
        source: &[TreeValue],
        options: &MergeOptions,
    ) -> Vec<TreeValue> {
        target
            .iter()
            .chain(source)
            .map(|value| clone_if_requested(value, options))
            .collect()
    }
}
