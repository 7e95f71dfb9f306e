//! Value classification: spreadability, truthiness, and shallow equality.
//!
//! [`is_spreadable`] is the single gate for every recurse-or-copy decision in
//! the merge engine. Callers must go through it rather than matching on
//! variants themselves.

use crate::value::TreeValue;

/// Returns `true` if `value` takes part in recursive merges.
///
/// Only sequences and mappings are spreadable. Patterns and temporal values
/// are objects in spirit but are merged as leaves, and so are callables.
pub fn is_spreadable(value: &TreeValue) -> bool {
    match value {
        TreeValue::Sequence(_) | TreeValue::Mapping(_) => true,
        TreeValue::Undefined
        | TreeValue::Null
        | TreeValue::Bool(_)
        | TreeValue::Number(_)
        | TreeValue::String(_)
        | TreeValue::Temporal(_)
        | TreeValue::Pattern(_)
        | TreeValue::Callable(_) => false,
    }
}

/// A fresh empty container shaped like `value`.
///
/// Sequences produce an empty sequence; everything else an empty mapping.
pub fn empty_like(value: &TreeValue) -> TreeValue {
    if value.is_sequence() {
        TreeValue::empty_sequence()
    } else {
        TreeValue::empty_mapping()
    }
}

/// Truthiness as the mapping merge sees an existing target entry.
///
/// `Undefined`, `Null`, `false`, `0`, `-0`, `NaN` and the empty string are
/// falsy. Everything else, including empty containers, is truthy.
pub fn is_truthy(value: &TreeValue) -> bool {
    match value {
        TreeValue::Undefined | TreeValue::Null => false,
        TreeValue::Bool(b) => *b,
        TreeValue::Number(n) => *n != 0.0 && !n.is_nan(),
        TreeValue::String(s) => !s.is_empty(),
        TreeValue::Temporal(_)
        | TreeValue::Pattern(_)
        | TreeValue::Callable(_)
        | TreeValue::Sequence(_)
        | TreeValue::Mapping(_) => true,
    }
}

/// Shallow equality used for sequence membership tests.
///
/// Primitives compare by value (`NaN` equals nothing), temporal values by
/// instant, and every handle or container by identity. Nested structure is
/// never inspected.
pub fn strict_equals(a: &TreeValue, b: &TreeValue) -> bool {
    match (a, b) {
        (TreeValue::Undefined, TreeValue::Undefined) => true,
        (TreeValue::Null, TreeValue::Null) => true,
        (TreeValue::Bool(x), TreeValue::Bool(y)) => x == y,
        (TreeValue::Number(x), TreeValue::Number(y)) => x == y,
        (TreeValue::String(x), TreeValue::String(y)) => x == y,
        (TreeValue::Temporal(x), TreeValue::Temporal(y)) => x == y,
        (TreeValue::Pattern(x), TreeValue::Pattern(y)) => x.ptr_eq(y),
        (TreeValue::Callable(x), TreeValue::Callable(y)) => x.ptr_eq(y),
        (TreeValue::Sequence(_), TreeValue::Sequence(_))
        | (TreeValue::Mapping(_), TreeValue::Mapping(_)) => a.same_allocation(b),
        _ => false,
    }
}
