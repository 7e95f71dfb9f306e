//! The recursive tree value and its leaf handle types.
//!
//! Composite payloads (`Sequence`, `Mapping`) sit behind an [`Arc`]. Cloning a
//! `TreeValue` therefore never copies a container; it shares it. Producing a
//! distinct allocation is the job of the merge engine's clone path.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{ValueError, ValueResult};

/// String-keyed record. Key order carries no meaning for merges.
pub type Mapping = BTreeMap<String, TreeValue>;

/// Signature of the closure carried by a [`Callable`].
pub type CallableFn = dyn Fn(&[TreeValue]) -> TreeValue + Send + Sync;

// ---------------------------------------------------------------------------
// ValueKind
// ---------------------------------------------------------------------------

/// The concrete kind of a [`TreeValue`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Undefined,
    Null,
    Bool,
    Number,
    String,
    Temporal,
    Pattern,
    Callable,
    Sequence,
    Mapping,
}

impl ValueKind {
    /// Lowercase name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Number => "number",
            Self::String => "string",
            Self::Temporal => "temporal",
            Self::Pattern => "pattern",
            Self::Callable => "callable",
            Self::Sequence => "sequence",
            Self::Mapping => "mapping",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Pattern
// ---------------------------------------------------------------------------

/// A shared compiled regular expression.
///
/// Two patterns are the same value only if they are the same handle; equal
/// source text is not enough.
#[derive(Clone)]
pub struct Pattern(Arc<Regex>);

impl Pattern {
    /// Compile `pattern` into a new handle.
    pub fn new(pattern: &str) -> ValueResult<Self> {
        Regex::new(pattern)
            .map(|re| Self(Arc::new(re)))
            .map_err(|e| ValueError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })
    }

    /// Wrap an already compiled expression.
    pub fn from_regex(regex: Regex) -> Self {
        Self(Arc::new(regex))
    }

    /// The source text of the expression.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_match(&self, haystack: &str) -> bool {
        self.0.is_match(haystack)
    }

    /// Returns `true` if both handles point at the same compiled expression.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pattern(/{}/)", self.0.as_str())
    }
}

// ---------------------------------------------------------------------------
// Callable
// ---------------------------------------------------------------------------

/// A shared opaque closure.
///
/// Closures may capture distinct state, so equality is handle identity and
/// never structural.
#[derive(Clone)]
pub struct Callable {
    name: Arc<str>,
    func: Arc<CallableFn>,
}

impl Callable {
    pub fn new(
        name: impl Into<Arc<str>>,
        f: impl Fn(&[TreeValue]) -> TreeValue + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            func: Arc::new(f),
        }
    }

    /// Diagnostic name; plays no part in equality.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, args: &[TreeValue]) -> TreeValue {
        (self.func)(args)
    }

    /// Returns `true` if both handles share the same closure.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callable({})", self.name)
    }
}

// ---------------------------------------------------------------------------
// TreeValue
// ---------------------------------------------------------------------------

/// A tree-shaped value: leaves, ordered sequences, and string-keyed mappings.
///
/// `Undefined` is the absence marker. Inside a sequence it stands for a hole,
/// which the array merge treats as a free slot.
///
/// `PartialEq` is [`deep_equals`](crate::deep_equals), so `assert_eq!` on two
/// trees compares structure.
#[derive(Clone, Debug, Default)]
pub enum TreeValue {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Temporal(DateTime<Utc>),
    Pattern(Pattern),
    Callable(Callable),
    Sequence(Arc<Vec<TreeValue>>),
    Mapping(Arc<Mapping>),
}

impl TreeValue {
    /// Build a sequence from any iterator of values.
    pub fn sequence<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<TreeValue>,
    {
        Self::Sequence(Arc::new(items.into_iter().map(Into::into).collect()))
    }

    /// Build a mapping from any iterator of key/value pairs.
    pub fn mapping<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<TreeValue>,
    {
        Self::Mapping(Arc::new(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        ))
    }

    pub fn empty_sequence() -> Self {
        Self::Sequence(Arc::new(Vec::new()))
    }

    pub fn empty_mapping() -> Self {
        Self::Mapping(Arc::new(Mapping::new()))
    }

    /// The concrete kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Undefined => ValueKind::Undefined,
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Bool,
            Self::Number(_) => ValueKind::Number,
            Self::String(_) => ValueKind::String,
            Self::Temporal(_) => ValueKind::Temporal,
            Self::Pattern(_) => ValueKind::Pattern,
            Self::Callable(_) => ValueKind::Callable,
            Self::Sequence(_) => ValueKind::Sequence,
            Self::Mapping(_) => ValueKind::Mapping,
        }
    }

    /// Returns `true` for `Null` and `Undefined`.
    pub fn is_nullish(&self) -> bool {
        matches!(self, Self::Null | Self::Undefined)
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, Self::Sequence(_))
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self, Self::Mapping(_))
    }

    pub fn as_sequence(&self) -> Option<&[TreeValue]> {
        match self {
            Self::Sequence(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Self::Mapping(map) => Some(&**map),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Mutable access to a sequence, copying it first if it is shared.
    pub fn as_sequence_mut(&mut self) -> Option<&mut Vec<TreeValue>> {
        match self {
            Self::Sequence(items) => Some(Arc::make_mut(items)),
            _ => None,
        }
    }

    /// Mutable access to a mapping, copying it first if it is shared.
    pub fn as_mapping_mut(&mut self) -> Option<&mut Mapping> {
        match self {
            Self::Mapping(map) => Some(Arc::make_mut(map)),
            _ => None,
        }
    }

    /// Look up a mapping entry. Non-mappings have no entries.
    pub fn get(&self, key: &str) -> Option<&TreeValue> {
        self.as_mapping().and_then(|map| map.get(key))
    }

    /// Property lookup as the mapping merge sees it.
    ///
    /// Mappings are looked up by key and sequences by decimal index. Every
    /// other kind, and every missing key, reads as `Undefined`.
    pub fn get_key(&self, key: &str) -> &TreeValue {
        match self {
            Self::Mapping(map) => map.get(key).unwrap_or(&UNDEFINED),
            Self::Sequence(items) => parse_index(key)
                .and_then(|i| items.get(i))
                .unwrap_or(&UNDEFINED),
            _ => &UNDEFINED,
        }
    }

    /// Own keys of a composite value, paired with their values.
    ///
    /// Sequences report their indices as decimal strings, skipping holes.
    /// Leaves have no keys.
    pub fn entries(&self) -> Vec<(String, &TreeValue)> {
        match self {
            Self::Mapping(map) => map.iter().map(|(k, v)| (k.clone(), v)).collect(),
            Self::Sequence(items) => items
                .iter()
                .enumerate()
                .filter(|(_, v)| !v.is_undefined())
                .map(|(i, v)| (i.to_string(), v))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Returns `true` if both values are composites backed by the same
    /// allocation.
    pub fn same_allocation(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Sequence(a), Self::Sequence(b)) => Arc::ptr_eq(a, b),
            (Self::Mapping(a), Self::Mapping(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

static UNDEFINED: TreeValue = TreeValue::Undefined;

/// Canonical array index: no sign, no leading zeros.
fn parse_index(key: &str) -> Option<usize> {
    if key.is_empty() || (key.len() > 1 && key.starts_with('0')) {
        return None;
    }
    if !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    key.parse().ok()
}

impl PartialEq for TreeValue {
    fn eq(&self, other: &Self) -> bool {
        crate::equality::deep_equals(self, other)
    }
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

impl From<bool> for TreeValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for TreeValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for TreeValue {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<i64> for TreeValue {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<u32> for TreeValue {
    fn from(n: u32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<&str> for TreeValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for TreeValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<DateTime<Utc>> for TreeValue {
    fn from(t: DateTime<Utc>) -> Self {
        Self::Temporal(t)
    }
}

impl From<Pattern> for TreeValue {
    fn from(p: Pattern) -> Self {
        Self::Pattern(p)
    }
}

impl From<Callable> for TreeValue {
    fn from(c: Callable) -> Self {
        Self::Callable(c)
    }
}

impl From<Vec<TreeValue>> for TreeValue {
    fn from(items: Vec<TreeValue>) -> Self {
        Self::Sequence(Arc::new(items))
    }
}

impl From<Mapping> for TreeValue {
    fn from(map: Mapping) -> Self {
        Self::Mapping(Arc::new(map))
    }
}

impl<T: Into<TreeValue>> From<Option<T>> for TreeValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn kinds_are_reported() {
        assert_eq!(TreeValue::Undefined.kind(), ValueKind::Undefined);
        assert_eq!(TreeValue::Null.kind(), ValueKind::Null);
        assert_eq!(TreeValue::from(true).kind(), ValueKind::Bool);
        assert_eq!(TreeValue::from(1.5).kind(), ValueKind::Number);
        assert_eq!(TreeValue::from("x").kind(), ValueKind::String);
        let t = Utc.timestamp_millis_opt(0).unwrap();
        assert_eq!(TreeValue::from(t).kind(), ValueKind::Temporal);
        assert_eq!(TreeValue::empty_sequence().kind(), ValueKind::Sequence);
        assert_eq!(TreeValue::empty_mapping().kind(), ValueKind::Mapping);
    }

    #[test]
    fn kind_display() {
        assert_eq!(ValueKind::Mapping.to_string(), "mapping");
        assert_eq!(format!("{}", ValueKind::Temporal), "temporal");
    }

    #[test]
    fn get_key_on_mapping() {
        let v = TreeValue::mapping([("a", 1)]);
        assert_eq!(*v.get_key("a"), TreeValue::from(1));
        assert!(v.get_key("b").is_undefined());
    }

    #[test]
    fn get_key_on_sequence_uses_indices() {
        let v = TreeValue::sequence(["x", "y"]);
        assert_eq!(*v.get_key("1"), TreeValue::from("y"));
        assert!(v.get_key("2").is_undefined());
        assert!(v.get_key("01").is_undefined());
        assert!(v.get_key("-1").is_undefined());
    }

    #[test]
    fn get_key_on_leaf_is_undefined() {
        assert!(TreeValue::from(5).get_key("0").is_undefined());
        assert!(TreeValue::Null.get_key("a").is_undefined());
    }

    #[test]
    fn sequence_entries_skip_holes() {
        let v = TreeValue::from(vec![
            TreeValue::from(1),
            TreeValue::Undefined,
            TreeValue::from(3),
        ]);
        let keys: Vec<String> = v.entries().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["0", "2"]);
    }

    #[test]
    fn leaf_entries_are_empty() {
        assert!(TreeValue::from("abc").entries().is_empty());
    }

    #[test]
    fn clone_shares_allocation() {
        let v = TreeValue::mapping([("a", 1)]);
        let w = v.clone();
        assert!(v.same_allocation(&w));
    }

    #[test]
    fn make_mut_detaches_shared_container() {
        let v = TreeValue::mapping([("a", 1)]);
        let mut w = v.clone();
        w.as_mapping_mut().unwrap().insert("b".into(), 2.into());
        assert!(!v.same_allocation(&w));
        assert!(v.get("b").is_none());
        assert_eq!(w.get("b"), Some(&TreeValue::from(2)));
    }

    #[test]
    fn pattern_rejects_invalid_source() {
        let err = Pattern::new("(unclosed").unwrap_err();
        assert!(matches!(err, ValueError::InvalidPattern { .. }));
    }

    #[test]
    fn pattern_identity() {
        let p = Pattern::new("^a+$").unwrap();
        let q = Pattern::new("^a+$").unwrap();
        assert!(p.ptr_eq(&p.clone()));
        assert!(!p.ptr_eq(&q));
        assert!(p.is_match("aaa"));
        assert_eq!(p.as_str(), "^a+$");
    }

    #[test]
    fn callable_identity_and_call() {
        let f = Callable::new("len", |args: &[TreeValue]| TreeValue::from(args.len() as u32));
        let g = Callable::new("len", |args: &[TreeValue]| TreeValue::from(args.len() as u32));
        assert!(f.ptr_eq(&f.clone()));
        assert!(!f.ptr_eq(&g));
        assert_eq!(f.call(&[TreeValue::Null, TreeValue::Null]), TreeValue::from(2));
        assert_eq!(format!("{f:?}"), "Callable(len)");
    }

    #[test]
    fn option_converts_to_null() {
        assert!(matches!(TreeValue::from(None::<i32>), TreeValue::Null));
        assert_eq!(TreeValue::from(Some("x")), TreeValue::from("x"));
    }
}
