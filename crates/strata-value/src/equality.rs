//! Recursive structural equality.
//!
//! [`deep_equals`] is independent of the merge path. The array merge uses
//! the shallow [`strict_equals`](crate::strict_equals) for membership instead.

use crate::classify::strict_equals;
use crate::value::TreeValue;

/// Returns `true` if `x` and `y` are structurally equivalent.
///
/// Rules, in order:
///
/// 1. If either side is `Null` or `Undefined`, equal iff both are the same
///    marker.
/// 2. Values of different kinds are never equal.
/// 3. Callables and patterns are equal iff they are the same handle.
/// 4. Primitives compare by value. Temporal values compare by their
///    millisecond instant.
/// 5. Sequences are equal iff they have the same length and every element
///    pair is equal.
/// 6. Mappings are equal iff their key sets match exactly and every value
///    pair is equal.
///
/// `NaN` is not equal to itself, so a tree holding `NaN` is not equal to
/// itself unless both sides share the container.
pub fn deep_equals(x: &TreeValue, y: &TreeValue) -> bool {
    if x.is_nullish() || y.is_nullish() {
        return strict_equals(x, y);
    }
    if x.kind() != y.kind() {
        return false;
    }

    match (x, y) {
        (TreeValue::Callable(a), TreeValue::Callable(b)) => a.ptr_eq(b),
        (TreeValue::Pattern(a), TreeValue::Pattern(b)) => a.ptr_eq(b),
        (TreeValue::Temporal(a), TreeValue::Temporal(b)) => {
            a.timestamp_millis() == b.timestamp_millis()
        }
        (TreeValue::Sequence(a), TreeValue::Sequence(b)) => {
            if x.same_allocation(y) {
                return true;
            }
            a.len() == b.len() && a.iter().zip(b.iter()).all(|(l, r)| deep_equals(l, r))
        }
        (TreeValue::Mapping(a), TreeValue::Mapping(b)) => {
            if x.same_allocation(y) {
                return true;
            }
            a.len() == b.len()
                && a.iter()
                    .all(|(key, l)| b.get(key).is_some_and(|r| deep_equals(l, r)))
        }
        _ => strict_equals(x, y),
    }
}
