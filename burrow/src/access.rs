//! Attribute-style and index-style access, including auto-vivification.
//!
//! Attribute access takes identifier-shaped string keys and only works on
//! mappings. Index access takes a [`Subscript`] — a mapping key, an integer
//! position (negative counts from the end), or a slice — and also covers
//! sequences, text, and byte-sequences.
//!
//! Reading a missing mapping key does not fail: it inserts an empty-mapping
//! child and returns it ("auto-vivification"), so a chain of reads can build
//! a nested tree on first touch. Raw members are upgraded to wrappers in
//! place on first read, which keeps wrapper identity stable across repeated
//! reads of the same slot.

use core::ops::{Range, RangeFrom, RangeFull, RangeTo};

use indexmap::IndexMap;
use tracing::trace;

use crate::error::NodeError;
use crate::node::Node;
use crate::value::{Value, ValueKind};

/// A single index-style key: a mapping key, an integer position, or a slice.
///
/// `From` conversions cover string, integer, and range types, so callers can
/// pass `"key"`, `3`, `-1`, or `1..4` directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subscript {
    /// Mapping key.
    Key(String),
    /// Integer position; negative values count back from the end.
    Index(i64),
    /// Contiguous range with optional bounds; negative bounds count back
    /// from the end, and out-of-range bounds clamp instead of failing.
    Slice(Option<i64>, Option<i64>),
}

impl From<&str> for Subscript {
    fn from(key: &str) -> Self {
        Subscript::Key(key.to_string())
    }
}

impl From<String> for Subscript {
    fn from(key: String) -> Self {
        Subscript::Key(key)
    }
}

impl From<i64> for Subscript {
    fn from(index: i64) -> Self {
        Subscript::Index(index)
    }
}

impl From<i32> for Subscript {
    fn from(index: i32) -> Self {
        Subscript::Index(i64::from(index))
    }
}

impl From<usize> for Subscript {
    fn from(index: usize) -> Self {
        Subscript::Index(index as i64)
    }
}

impl From<Range<i64>> for Subscript {
    fn from(range: Range<i64>) -> Self {
        Subscript::Slice(Some(range.start), Some(range.end))
    }
}

impl From<RangeFrom<i64>> for Subscript {
    fn from(range: RangeFrom<i64>) -> Self {
        Subscript::Slice(Some(range.start), None)
    }
}

impl From<RangeTo<i64>> for Subscript {
    fn from(range: RangeTo<i64>) -> Self {
        Subscript::Slice(None, Some(range.end))
    }
}

impl From<RangeFull> for Subscript {
    fn from(_: RangeFull) -> Self {
        Subscript::Slice(None, None)
    }
}

/// Iterator over a snapshot of a node's members: mapping keys, sequence
/// elements, text characters, or byte values.
pub struct ValueIter {
    items: std::vec::IntoIter<Value>,
}

impl Iterator for ValueIter {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        self.items.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.items.size_hint()
    }
}

fn check_attr_key(key: &str, kind: ValueKind) -> Result<(), NodeError> {
    let mut chars = key.chars();
    let identifier = match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {
            chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
        }
        _ => false,
    };
    if !identifier {
        return Err(NodeError::NotSupported {
            operation: "attribute access with a non-identifier key",
            kind,
        });
    }
    // Leading underscores are reserved for the wrapper's own bookkeeping
    // (root, last-written) and never name mapping slots.
    if key.starts_with('_') {
        return Err(NodeError::NotSupported {
            operation: "attribute access with a reserved key",
            kind,
        });
    }
    Ok(())
}

fn normalize_index(index: i64, len: usize) -> Result<usize, NodeError> {
    let n = len as i64;
    let adjusted = if index < 0 { index + n } else { index };
    if adjusted < 0 || adjusted >= n {
        return Err(NodeError::OutOfBounds { index, len });
    }
    Ok(adjusted as usize)
}

fn resolve_slice(start: Option<i64>, end: Option<i64>, len: usize) -> Range<usize> {
    let n = len as i64;
    let clamp = |bound: i64| -> i64 {
        let bound = if bound < 0 { bound + n } else { bound };
        bound.clamp(0, n)
    };
    let start = clamp(start.unwrap_or(0));
    let end = clamp(end.unwrap_or(n));
    (start as usize)..(end.max(start) as usize)
}

impl Node {
    /// Looks up `key` in this slot's mapping, or vivifies or upgrades it,
    /// always ending with a wrapped child in the slot.
    fn member(&self, map: &mut IndexMap<String, Value>, key: &str) -> Node {
        match map.get_mut(key) {
            None => {
                let child = Node::new_child(Value::empty_map(), self.tree());
                map.insert(key.to_string(), Value::Node(child.clone()));
                trace!(key, "vivified empty mapping");
                child
            }
            Some(slot) => match &mut *slot {
                Value::Node(node) => node.clone(),
                raw => {
                    // Lazy in-place upgrade: the wrapper replaces the raw
                    // value in the slot, so the next read sees this same
                    // child and identity stays stable.
                    let child = Node::new_child(core::mem::take(raw), self.tree());
                    *slot = Value::Node(child.clone());
                    trace!(key, kind = %child.kind(), "upgraded raw member to a wrapper");
                    child
                }
            },
        }
    }

    /// Attribute-style get.
    ///
    /// Fails with [`NodeError::NotSupported`] unless the wrapped value is a
    /// mapping. A missing key auto-vivifies: an empty-mapping child is
    /// inserted and returned. Raw members (mapping or not) are upgraded to
    /// wrappers in place on first read.
    pub fn get(&self, key: &str) -> Result<Node, NodeError> {
        let mut value = self.inner.value.borrow_mut();
        check_attr_key(key, value.kind())?;
        let Value::Map(map) = &mut *value else {
            return Err(NodeError::NotSupported {
                operation: "attribute get",
                kind: value.kind(),
            });
        };
        Ok(self.member(map, key))
    }

    /// Attribute-style set. Returns the stored child.
    ///
    /// Raw values are wrapped as children of this tree before storing
    /// (`Null` stays `Null`); already-wrapped nodes are stored unchanged.
    /// On success the tree's last-written slot points at the stored child.
    pub fn set(&self, key: &str, value: impl Into<Value>) -> Result<Node, NodeError> {
        let stored = {
            let mut wrapped = self.inner.value.borrow_mut();
            check_attr_key(key, wrapped.kind())?;
            let Value::Map(map) = &mut *wrapped else {
                return Err(NodeError::NotSupported {
                    operation: "attribute set",
                    kind: wrapped.kind(),
                });
            };
            let child = Node::new_child(value.into(), self.tree());
            map.insert(key.to_string(), Value::Node(child.clone()));
            child
        };
        self.record_write(&stored);
        trace!(key, kind = %stored.kind(), "stored attribute");
        Ok(stored)
    }

    /// Attribute-style delete. Returns the removed slot value.
    ///
    /// Fails with [`NodeError::NotSupported`] if the wrapped value is not a
    /// mapping or the key is absent.
    pub fn remove(&self, key: &str) -> Result<Value, NodeError> {
        let mut value = self.inner.value.borrow_mut();
        check_attr_key(key, value.kind())?;
        let Value::Map(map) = &mut *value else {
            return Err(NodeError::NotSupported {
                operation: "attribute delete",
                kind: value.kind(),
            });
        };
        map.shift_remove(key).ok_or(NodeError::NotSupported {
            operation: "attribute delete with a missing key",
            kind: ValueKind::Map,
        })
    }

    /// Index-style get.
    ///
    /// Mapping targets behave exactly like [`get`](Node::get) (including
    /// auto-vivification) and return the child as [`Value::Node`]. Sequence
    /// targets (`List`, `Str`, `Bytes`) take integer positions with
    /// `-len <= i < len`, or slices, which forward to native range slicing
    /// and return a raw unwrapped result.
    pub fn get_item(&self, key: impl Into<Subscript>) -> Result<Value, NodeError> {
        let key = key.into();
        let mut value = self.inner.value.borrow_mut();
        match (&mut *value, &key) {
            (Value::Map(map), Subscript::Key(k)) => Ok(Value::Node(self.member(map, k))),
            (Value::List(items), Subscript::Index(i)) => {
                let idx = normalize_index(*i, items.len())?;
                Ok(items[idx].clone())
            }
            (Value::List(items), Subscript::Slice(start, end)) => {
                let range = resolve_slice(*start, *end, items.len());
                Ok(Value::List(items[range].to_vec()))
            }
            (Value::Str(s), Subscript::Index(i)) => {
                let chars: Vec<char> = s.chars().collect();
                let idx = normalize_index(*i, chars.len())?;
                Ok(Value::Str(chars[idx].to_string()))
            }
            (Value::Str(s), Subscript::Slice(start, end)) => {
                let chars: Vec<char> = s.chars().collect();
                let range = resolve_slice(*start, *end, chars.len());
                Ok(Value::Str(chars[range].iter().collect()))
            }
            (Value::Bytes(bytes), Subscript::Index(i)) => {
                let idx = normalize_index(*i, bytes.len())?;
                Ok(Value::Int(i64::from(bytes[idx])))
            }
            (Value::Bytes(bytes), Subscript::Slice(start, end)) => {
                let range = resolve_slice(*start, *end, bytes.len());
                Ok(Value::Bytes(bytes[range].to_vec()))
            }
            (other, _) => Err(NodeError::NotSupported {
                operation: "index get",
                kind: other.kind(),
            }),
        }
    }

    /// Index-style set.
    ///
    /// Mapping targets follow [`set`](Node::set) (wrapping plus the
    /// last-written update). Sequence targets are bounds-checked stores; a
    /// slice key splices a sequence payload into place.
    pub fn set_item(
        &self,
        key: impl Into<Subscript>,
        value: impl Into<Value>,
    ) -> Result<(), NodeError> {
        let key = key.into();
        let value = value.into();
        let stored = {
            let mut wrapped = self.inner.value.borrow_mut();
            match (&mut *wrapped, key) {
                (Value::Map(map), Subscript::Key(k)) => {
                    let child = Node::new_child(value, self.tree());
                    map.insert(k, Value::Node(child.clone()));
                    Some(child)
                }
                (Value::List(items), Subscript::Index(i)) => {
                    let idx = normalize_index(i, items.len())?;
                    items[idx] = value;
                    None
                }
                (Value::List(items), Subscript::Slice(start, end)) => {
                    let payload = match value.unwrapped() {
                        Value::List(payload) => payload,
                        other => {
                            return Err(NodeError::NotSupported {
                                operation: "slice assignment from a non-sequence",
                                kind: other.kind(),
                            });
                        }
                    };
                    let range = resolve_slice(start, end, items.len());
                    items.splice(range, payload);
                    None
                }
                (other, _) => {
                    return Err(NodeError::NotSupported {
                        operation: "index set",
                        kind: other.kind(),
                    });
                }
            }
        };
        if let Some(stored) = stored {
            self.record_write(&stored);
            trace!(kind = %stored.kind(), "stored mapping item");
        }
        Ok(())
    }

    /// Index-style delete. Returns the removed value.
    pub fn remove_item(&self, key: impl Into<Subscript>) -> Result<Value, NodeError> {
        let mut value = self.inner.value.borrow_mut();
        match (&mut *value, key.into()) {
            (Value::Map(map), Subscript::Key(k)) => {
                map.shift_remove(&k).ok_or(NodeError::NotSupported {
                    operation: "index delete with a missing key",
                    kind: ValueKind::Map,
                })
            }
            (Value::List(items), Subscript::Index(i)) => {
                let idx = normalize_index(i, items.len())?;
                Ok(items.remove(idx))
            }
            (Value::List(items), Subscript::Slice(start, end)) => {
                let range = resolve_slice(start, end, items.len());
                Ok(Value::List(items.drain(range).collect()))
            }
            (other, _) => Err(NodeError::NotSupported {
                operation: "index delete",
                kind: other.kind(),
            }),
        }
    }

    /// Containment test, forwarded to the underlying value: key membership
    /// for mappings, element membership for sequences, substring for text,
    /// byte or subslice for byte-sequences.
    pub fn contains(&self, needle: impl Into<Value>) -> Result<bool, NodeError> {
        let needle = needle.into();
        let value = self.inner.value.borrow();
        match &*value {
            Value::Map(map) => Ok(match needle.unwrapped() {
                Value::Str(key) => map.contains_key(&key),
                _ => false,
            }),
            Value::List(items) => Ok(items.iter().any(|item| *item == needle)),
            Value::Str(s) => Ok(match needle.unwrapped() {
                Value::Str(sub) => s.contains(&sub),
                _ => false,
            }),
            Value::Bytes(bytes) => Ok(match needle.unwrapped() {
                Value::Int(b) => u8::try_from(b).is_ok_and(|b| bytes.contains(&b)),
                Value::Bytes(sub) => {
                    sub.is_empty() || bytes.windows(sub.len()).any(|w| w == sub)
                }
                _ => false,
            }),
            other => Err(NodeError::NotSupported {
                operation: "containment test",
                kind: other.kind(),
            }),
        }
    }

    /// Number of members: mapping entries, sequence elements, text
    /// characters, or bytes.
    pub fn len(&self) -> Result<usize, NodeError> {
        let value = self.inner.value.borrow();
        match &*value {
            Value::Map(map) => Ok(map.len()),
            Value::List(items) => Ok(items.len()),
            Value::Str(s) => Ok(s.chars().count()),
            Value::Bytes(bytes) => Ok(bytes.len()),
            other => Err(NodeError::NotSupported {
                operation: "length",
                kind: other.kind(),
            }),
        }
    }

    /// Whether the underlying container has no members.
    pub fn is_empty(&self) -> Result<bool, NodeError> {
        self.len().map(|len| len == 0)
    }

    /// Iterates a snapshot of the underlying value: mapping keys, sequence
    /// elements, text characters, or byte values.
    pub fn iter(&self) -> Result<ValueIter, NodeError> {
        let value = self.inner.value.borrow();
        let items: Vec<Value> = match &*value {
            Value::Map(map) => map.keys().map(|k| Value::Str(k.clone())).collect(),
            Value::List(items) => items.clone(),
            Value::Str(s) => s.chars().map(|c| Value::Str(c.to_string())).collect(),
            Value::Bytes(bytes) => bytes.iter().map(|&b| Value::Int(i64::from(b))).collect(),
            other => {
                return Err(NodeError::NotSupported {
                    operation: "iteration",
                    kind: other.kind(),
                });
            }
        };
        Ok(ValueIter {
            items: items.into_iter(),
        })
    }

    /// Mapping keys in insertion order.
    pub fn keys(&self) -> Result<Vec<String>, NodeError> {
        let value = self.inner.value.borrow();
        match &*value {
            Value::Map(map) => Ok(map.keys().cloned().collect()),
            other => Err(NodeError::NotSupported {
                operation: "keys",
                kind: other.kind(),
            }),
        }
    }

    /// Mapping values in insertion order.
    pub fn values(&self) -> Result<Vec<Value>, NodeError> {
        let value = self.inner.value.borrow();
        match &*value {
            Value::Map(map) => Ok(map.values().cloned().collect()),
            other => Err(NodeError::NotSupported {
                operation: "values",
                kind: other.kind(),
            }),
        }
    }

    /// Mapping entries in insertion order.
    pub fn entries(&self) -> Result<Vec<(String, Value)>, NodeError> {
        let value = self.inner.value.borrow();
        match &*value {
            Value::Map(map) => Ok(map.iter().map(|(k, v)| (k.clone(), v.clone())).collect()),
            other => Err(NodeError::NotSupported {
                operation: "entries",
                kind: other.kind(),
            }),
        }
    }

    /// Appends to a wrapped sequence.
    pub fn push(&self, value: impl Into<Value>) -> Result<(), NodeError> {
        let mut wrapped = self.inner.value.borrow_mut();
        match &mut *wrapped {
            Value::List(items) => {
                items.push(value.into());
                Ok(())
            }
            other => Err(NodeError::NotSupported {
                operation: "push",
                kind: other.kind(),
            }),
        }
    }

    /// Removes and returns the last element of a wrapped sequence.
    pub fn pop(&self) -> Result<Option<Value>, NodeError> {
        let mut wrapped = self.inner.value.borrow_mut();
        match &mut *wrapped {
            Value::List(items) => Ok(items.pop()),
            other => Err(NodeError::NotSupported {
                operation: "pop",
                kind: other.kind(),
            }),
        }
    }

    /// Empties a wrapped mapping or sequence.
    pub fn clear(&self) -> Result<(), NodeError> {
        let mut wrapped = self.inner.value.borrow_mut();
        match &mut *wrapped {
            Value::Map(map) => {
                map.clear();
                Ok(())
            }
            Value::List(items) => {
                items.clear();
                Ok(())
            }
            other => Err(NodeError::NotSupported {
                operation: "clear",
                kind: other.kind(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_accepts_negative_positions() {
        assert_eq!(normalize_index(-1, 3).unwrap(), 2);
        assert_eq!(normalize_index(-3, 3).unwrap(), 0);
        assert_eq!(normalize_index(0, 3).unwrap(), 0);
        assert!(matches!(
            normalize_index(3, 3),
            Err(NodeError::OutOfBounds { index: 3, len: 3 })
        ));
        assert!(matches!(
            normalize_index(-4, 3),
            Err(NodeError::OutOfBounds { index: -4, len: 3 })
        ));
    }

    #[test]
    fn slices_clamp_like_native_ranges() {
        assert_eq!(resolve_slice(Some(1), Some(10), 4), 1..4);
        assert_eq!(resolve_slice(Some(-2), None, 4), 2..4);
        assert_eq!(resolve_slice(None, Some(-1), 4), 0..3);
        assert_eq!(resolve_slice(Some(3), Some(1), 4), 3..3);
        assert_eq!(resolve_slice(None, None, 4), 0..4);
    }

    #[test]
    fn reserved_and_malformed_attribute_keys_are_rejected() {
        let node = Node::new();
        assert!(node.get("_last").is_err());
        assert!(node.get("not valid").is_err());
        assert!(node.set("1abc", 1i64).is_err());
        assert!(node.get("fine_2").is_ok());
    }
}
