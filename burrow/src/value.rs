//! The variant value type fronted by [`Node`] wrappers.

use core::cmp::Ordering;
use core::fmt;

use indexmap::IndexMap;

use crate::node::Node;

/// A dynamically-typed value: a scalar, an ordered sequence, or a keyed
/// mapping with insertion order preserved.
///
/// Container members may be raw `Value`s or wrapped child [`Node`]s. A node's
/// own value slot is never `Value::Node`; the `Node` variant exists only for
/// children stored inside a parent container.
#[derive(Clone)]
pub enum Value {
    /// Absent value.
    Null,
    /// Boolean.
    Bool(bool),
    /// Signed 64-bit integer.
    Int(i64),
    /// 64-bit floating point.
    Float(f64),
    /// UTF-8 text.
    Str(String),
    /// Binary data.
    Bytes(Vec<u8>),
    /// Ordered sequence.
    List(Vec<Value>),
    /// Keyed mapping, insertion order preserved.
    Map(IndexMap<String, Value>),
    /// A wrapped child node stored inside a container slot.
    Node(Node),
}

/// Runtime kind discriminator for [`Value`].
///
/// A wrapped child reports the kind of its inner value, so `kind()` always
/// names one of the eight raw forms.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ValueKind {
    /// Absent value.
    Null,
    /// Boolean.
    Bool,
    /// Signed integer.
    Int,
    /// Floating point.
    Float,
    /// UTF-8 text.
    Str,
    /// Binary data.
    Bytes,
    /// Ordered sequence.
    List,
    /// Keyed mapping.
    Map,
}

impl ValueKind {
    /// Lowercase name, as used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::Str => "str",
            ValueKind::Bytes => "bytes",
            ValueKind::List => "list",
            ValueKind::Map => "map",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Value {
    /// An empty mapping.
    pub fn empty_map() -> Value {
        Value::Map(IndexMap::new())
    }

    /// A text value.
    pub fn text(s: impl Into<String>) -> Value {
        Value::Str(s.into())
    }

    /// A byte-sequence value.
    pub fn bytes(b: impl Into<Vec<u8>>) -> Value {
        Value::Bytes(b.into())
    }

    /// A sequence built from anything convertible to values.
    pub fn list_from(items: impl IntoIterator<Item = impl Into<Value>>) -> Value {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    /// A mapping built from key/value pairs, preserving iteration order.
    pub fn map_from(
        pairs: impl IntoIterator<Item = (impl Into<String>, impl Into<Value>)>,
    ) -> Value {
        Value::Map(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }

    /// Runtime kind of this value (the inner value's kind for wrapped
    /// children).
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Str(_) => ValueKind::Str,
            Value::Bytes(_) => ValueKind::Bytes,
            Value::List(_) => ValueKind::List,
            Value::Map(_) => ValueKind::Map,
            Value::Node(node) => node.kind(),
        }
    }

    /// Whether this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Whether this value is a mapping (directly or through a wrapper).
    pub fn is_map(&self) -> bool {
        self.kind() == ValueKind::Map
    }

    /// Whether this value is a sequence (directly or through a wrapper).
    pub fn is_list(&self) -> bool {
        self.kind() == ValueKind::List
    }

    /// Whether this value is a wrapped child node.
    pub fn is_node(&self) -> bool {
        matches!(self, Value::Node(_))
    }

    /// Borrows the boolean payload.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Borrows the integer payload.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Borrows the float payload.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }

    /// Borrows the text payload.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Borrows the byte-sequence payload.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Borrows the sequence payload.
    pub fn as_list(&self) -> Option<&Vec<Value>> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Borrows the mapping payload.
    pub fn as_map(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Borrows the wrapped child node.
    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Value::Node(node) => Some(node),
            _ => None,
        }
    }

    /// Native truthiness: `Null`, `false`, zero, and empty containers are
    /// false; everything else is true. Wrapped children defer to their inner
    /// value. Never fails.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(x) => *x != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::Bytes(b) => !b.is_empty(),
            Value::List(items) => !items.is_empty(),
            Value::Map(map) => !map.is_empty(),
            Value::Node(node) => node.inner.value.borrow().is_truthy(),
        }
    }

    /// The unwrapped form: a clone of the inner value if this is a wrapped
    /// child, a clone of the value itself otherwise.
    pub fn unwrapped(&self) -> Value {
        match self {
            Value::Node(node) => node.value(),
            other => other.clone(),
        }
    }

    fn write_repr(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => write!(f, "{s:?}"),
            Value::Bytes(b) => write!(f, "b\"{}\"", b.escape_ascii()),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    item.write_repr(f)?;
                }
                f.write_str("]")
            }
            Value::Map(map) => {
                f.write_str("{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key:?}: ")?;
                    value.write_repr(f)?;
                }
                f.write_str("}")
            }
            Value::Node(node) => node.inner.value.borrow().write_repr(f),
        }
    }
}

/// Structural comparison for ordered operators. Mixed `Int`/`Float` pairs
/// compare numerically; sequences compare lexicographically; `None` marks an
/// unordered pair.
pub(crate) fn partial_cmp_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Node(node), _) => partial_cmp_values(&node.value(), b),
        (_, Value::Node(node)) => partial_cmp_values(a, &node.value()),
        (Value::Int(x), Value::Int(y)) => Some(x.cmp(y)),
        (Value::Float(x), Value::Float(y)) => x.partial_cmp(y),
        (Value::Int(x), Value::Float(y)) => (*x as f64).partial_cmp(y),
        (Value::Float(x), Value::Int(y)) => x.partial_cmp(&(*y as f64)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        (Value::Str(x), Value::Str(y)) => Some(x.cmp(y)),
        (Value::Bytes(x), Value::Bytes(y)) => Some(x.cmp(y)),
        (Value::List(x), Value::List(y)) => {
            for (xa, ya) in x.iter().zip(y.iter()) {
                match partial_cmp_values(xa, ya)? {
                    Ordering::Equal => continue,
                    ord => return Some(ord),
                }
            }
            Some(x.len().cmp(&y.len()))
        }
        _ => None,
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Node(node), _) => node.inner.value.borrow().eq(other),
            (_, Value::Node(node)) => self.eq(&*node.inner.value.borrow()),
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Int(a), Value::Float(b)) => (*a as f64) == *b,
            (Value::Float(a), Value::Int(b)) => *a == (*b as f64),
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Scalars delegate to their native formatting so width/precision
        // specs apply; top-level text renders bare. Containers use the repr
        // form, which quotes text nested inside them.
        match self {
            Value::Null => f.pad("null"),
            Value::Bool(b) => fmt::Display::fmt(b, f),
            Value::Int(i) => fmt::Display::fmt(i, f),
            Value::Float(x) => fmt::Display::fmt(x, f),
            Value::Str(s) => fmt::Display::fmt(s, f),
            Value::Node(node) => fmt::Display::fmt(&*node.inner.value.borrow(), f),
            other => other.write_repr(f),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_repr(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(map: IndexMap<String, Value>) -> Self {
        Value::Map(map)
    }
}

impl From<Node> for Value {
    fn from(node: Node) -> Self {
        Value::Node(node)
    }
}

/// `None` becomes `Null`; the explicit way to store an absent value without
/// it being mistaken for a missing mapping.
impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthiness() {
        assert!(!Value::Null.is_truthy());
        assert!(!Value::Int(0).is_truthy());
        assert!(!Value::text("").is_truthy());
        assert!(!Value::empty_map().is_truthy());
        assert!(Value::Float(0.5).is_truthy());
        assert!(Value::list_from([1i64]).is_truthy());
    }

    #[test]
    fn mixed_numeric_equality() {
        assert_eq!(Value::Int(3), Value::Float(3.0));
        assert_ne!(Value::Int(3), Value::Float(3.5));
        assert_ne!(Value::Int(1), Value::Bool(true));
    }

    #[test]
    fn list_ordering_is_lexicographic() {
        let a = Value::list_from([1i64, 2]);
        let b = Value::list_from([1i64, 3]);
        assert_eq!(partial_cmp_values(&a, &b), Some(Ordering::Less));
        assert_eq!(
            partial_cmp_values(&Value::empty_map(), &Value::Int(1)),
            None
        );
    }

    #[test]
    fn repr_quotes_nested_text() {
        let v = Value::map_from([("name", Value::text("ada"))]);
        assert_eq!(v.to_string(), r#"{"name": "ada"}"#);
        assert_eq!(Value::text("ada").to_string(), "ada");
    }
}
