//! The recursive merge: dispatcher, mapping merge, clone path, and reducer.
//!
//! # Invariants
//!
//! - Inputs are never mutated. Every result container is freshly built.
//! - With `clone: false`, untouched composite children are shared with the
//!   inputs. With `clone: true`, no result container is shared with them.
//! - Leaves are always shared; there is nothing to copy.
//! - The source wins every conflict, except that a spreadable source value
//!   over a truthy target value is merged recursively.

use strata_value::{empty_like, is_spreadable, is_truthy, Mapping, TreeValue};
use tracing::{debug, trace};

use crate::error::{MergeError, MergeResult};
use crate::options::MergeOptions;

/// Merge `source` into `target` and return the combined tree.
///
/// A source sequence over a target sequence goes to the configured array
/// strategy. A source sequence over anything else discards the target and
/// yields (a clone of) the source. Any other source goes through
/// [`merge_mappings`], whatever the target is.
pub fn deep_merge(target: &TreeValue, source: &TreeValue, options: &MergeOptions) -> TreeValue {
    match (target, source) {
        (TreeValue::Sequence(t), TreeValue::Sequence(s)) => {
            trace!(target_len = t.len(), source_len = s.len(), "merging sequences");
            TreeValue::from(options.array_strategy().merge_arrays(t, s, options))
        }
        (_, TreeValue::Sequence(_)) => {
            trace!(target_kind = %target.kind(), "sequence over non-sequence, source wins");
            clone_if_requested(source, options)
        }
        _ => TreeValue::from(merge_mappings(target, source, options)),
    }
}

/// Merge a source mapping into a target mapping, key by key.
///
/// The result starts with every entry of `target` (when it is spreadable;
/// a sequence target contributes its indices as keys). Each source entry then
/// either overrides the target entry or, when the source value is spreadable
/// and the target value is truthy, is deep-merged with it.
///
/// A present but falsy target value (`0`, `""`, `false`, `null`) counts as
/// absent: a spreadable source value replaces it instead of merging.
pub fn merge_mappings(target: &TreeValue, source: &TreeValue, options: &MergeOptions) -> Mapping {
    let mut destination = Mapping::new();

    if is_spreadable(target) {
        for (key, value) in target.entries() {
            destination.insert(key, clone_if_requested(value, options));
        }
    }

    for (key, value) in source.entries() {
        let existing = target.get_key(&key);
        let merged = if !is_spreadable(value) || !is_truthy(existing) {
            clone_if_requested(value, options)
        } else {
            deep_merge(existing, value, options)
        };
        destination.insert(key, merged);
    }

    destination
}

/// Deep-copy `value` if `options.clone` is set and the value is spreadable.
///
/// The copy is made by merging `value` into an empty container of the same
/// shape. Leaves are returned as they are.
pub fn clone_if_requested(value: &TreeValue, options: &MergeOptions) -> TreeValue {
    if options.clone && is_spreadable(value) {
        deep_merge(&empty_like(value), value, options)
    } else {
        value.clone()
    }
}

/// Deep-copy a tree with default options.
pub fn clone_value(value: &TreeValue) -> TreeValue {
    clone_if_requested(value, &MergeOptions::cloning())
}

/// Left-fold [`deep_merge`] over two or more values.
///
/// `merge_all([a, b, c])` is `deep_merge(deep_merge(a, b), c)`. Fewer than two
/// values is an [`InvalidArgument`](MergeError::InvalidArgument) error.
pub fn merge_all<'a, I>(values: I, options: &MergeOptions) -> MergeResult<TreeValue>
where
    I: IntoIterator<Item = &'a TreeValue>,
{
    let values: Vec<&TreeValue> = values.into_iter().collect();
    if values.len() < 2 {
        return Err(MergeError::InvalidArgument(format!(
            "merge_all needs at least two values, got {}",
            values.len()
        )));
    }

    debug!(count = values.len(), clone = options.clone, "reducing values");
    let first = deep_merge(values[0], values[1], options);
    Ok(values[2..]
        .iter()
        .fold(first, |acc, next| deep_merge(&acc, next, options)))
}
