//! Coercions between wrapped values and primitive targets.
//!
//! Each target comes in two interchangeable styles: `to_*` returns a plain
//! converted value and leaves the node untouched; `coerce_*` stores the
//! converted form back into the node and returns the handle, so calls chain.
//! Boolean coercion is the one that can never fail; everything else reports
//! [`NodeError::Conversion`] when the underlying value has no conversion.

use std::hash::{DefaultHasher, Hash, Hasher};

use indexmap::IndexMap;
use num_complex::Complex64;

use crate::error::NodeError;
use crate::node::Node;
use crate::value::Value;

fn int_of(value: &Value) -> Result<i64, NodeError> {
    let fail = || NodeError::Conversion {
        from: value.kind(),
        to: "int",
    };
    match value {
        Value::Int(i) => Ok(*i),
        Value::Bool(b) => Ok(i64::from(*b)),
        Value::Float(x) => {
            // Truncation toward zero, but only where the integer is
            // representable.
            if x.is_finite() && (i64::MIN as f64..=i64::MAX as f64).contains(x) {
                Ok(*x as i64)
            } else {
                Err(fail())
            }
        }
        Value::Str(s) => s.trim().parse::<i64>().map_err(|_| fail()),
        _ => Err(fail()),
    }
}

fn float_of(value: &Value) -> Result<f64, NodeError> {
    let fail = || NodeError::Conversion {
        from: value.kind(),
        to: "float",
    };
    match value {
        Value::Float(x) => Ok(*x),
        Value::Int(i) => Ok(*i as f64),
        Value::Bool(b) => Ok(f64::from(u8::from(*b))),
        Value::Str(s) => s.trim().parse::<f64>().map_err(|_| fail()),
        _ => Err(fail()),
    }
}

fn list_of(value: &Value) -> Result<Vec<Value>, NodeError> {
    match value {
        Value::List(items) => Ok(items.clone()),
        // A mapping converts to its keys, like iterating it.
        Value::Map(map) => Ok(map.keys().map(|k| Value::Str(k.clone())).collect()),
        Value::Str(s) => Ok(s.chars().map(|c| Value::Str(c.to_string())).collect()),
        Value::Bytes(bytes) => Ok(bytes.iter().map(|&b| Value::Int(i64::from(b))).collect()),
        _ => Err(NodeError::Conversion {
            from: value.kind(),
            to: "list",
        }),
    }
}

fn map_of(value: &Value) -> Result<IndexMap<String, Value>, NodeError> {
    match value {
        Value::Map(map) => Ok(map.clone()),
        _ => Err(NodeError::Conversion {
            from: value.kind(),
            to: "map",
        }),
    }
}

fn bytes_of(value: &Value) -> Result<Vec<u8>, NodeError> {
    let fail = || NodeError::Conversion {
        from: value.kind(),
        to: "bytes",
    };
    match value {
        Value::Bytes(bytes) => Ok(bytes.clone()),
        Value::Str(s) => Ok(s.as_bytes().to_vec()),
        Value::List(items) => items
            .iter()
            .map(|item| match item.unwrapped() {
                Value::Int(i) => u8::try_from(i).map_err(|_| fail()),
                _ => Err(fail()),
            })
            .collect(),
        _ => Err(fail()),
    }
}

fn complex_of(value: &Value) -> Result<Complex64, NodeError> {
    let fail = || NodeError::Conversion {
        from: value.kind(),
        to: "complex",
    };
    match value {
        Value::Int(i) => Ok(Complex64::new(*i as f64, 0.0)),
        Value::Float(x) => Ok(Complex64::new(*x, 0.0)),
        Value::Bool(b) => Ok(Complex64::new(f64::from(u8::from(*b)), 0.0)),
        // `a+bi` syntax.
        Value::Str(s) => s.trim().parse::<Complex64>().map_err(|_| fail()),
        _ => Err(fail()),
    }
}

fn hash_of(value: &Value) -> Result<u64, NodeError> {
    let fail = || NodeError::Conversion {
        from: value.kind(),
        to: "hash",
    };
    let mut hasher = DefaultHasher::new();
    match value {
        Value::Null => 0u8.hash(&mut hasher),
        // Numerics hash through a shared representation so equal numbers
        // (3, 3.0, true/1) hash equally, matching equality.
        Value::Bool(b) => hash_numeric(i64::from(*b) as f64, &mut hasher),
        Value::Int(i) => hash_numeric(*i as f64, &mut hasher),
        Value::Float(x) => hash_numeric(*x, &mut hasher),
        Value::Str(s) => {
            2u8.hash(&mut hasher);
            s.hash(&mut hasher);
        }
        Value::Bytes(bytes) => {
            3u8.hash(&mut hasher);
            bytes.hash(&mut hasher);
        }
        // Mutable containers are unhashable.
        Value::List(_) | Value::Map(_) => return Err(fail()),
        Value::Node(node) => return hash_of(&node.value()),
    }
    Ok(hasher.finish())
}

fn hash_numeric(x: f64, hasher: &mut DefaultHasher) {
    1u8.hash(hasher);
    // Normalize -0.0 so equal numbers hash equally.
    let x = if x == 0.0 { 0.0 } else { x };
    x.to_bits().hash(hasher);
}

impl Node {
    /// Integer form of the wrapped value (floats truncate, text parses).
    pub fn to_int(&self) -> Result<i64, NodeError> {
        int_of(&self.inner.value.borrow())
    }

    /// Floating-point form of the wrapped value.
    pub fn to_float(&self) -> Result<f64, NodeError> {
        float_of(&self.inner.value.borrow())
    }

    /// Native truthiness of the wrapped value. Never fails.
    pub fn to_bool(&self) -> bool {
        self.inner.value.borrow().is_truthy()
    }

    /// Text form of the wrapped value, via its native formatting.
    pub fn to_text(&self) -> String {
        self.inner.value.borrow().to_string()
    }

    /// Sequence form: a sequence's elements, a mapping's keys, a text's
    /// characters, or a byte-sequence's byte values.
    pub fn to_list(&self) -> Result<Vec<Value>, NodeError> {
        list_of(&self.inner.value.borrow())
    }

    /// Mapping form; only mappings convert.
    pub fn to_map(&self) -> Result<IndexMap<String, Value>, NodeError> {
        map_of(&self.inner.value.borrow())
    }

    /// Byte-sequence form: bytes, UTF-8 text, or a sequence of byte-sized
    /// integers.
    pub fn to_bytes(&self) -> Result<Vec<u8>, NodeError> {
        bytes_of(&self.inner.value.borrow())
    }

    /// Complex form of a numeric or `a+bi`-formatted text value.
    pub fn to_complex(&self) -> Result<Complex64, NodeError> {
        complex_of(&self.inner.value.borrow())
    }

    /// Hash code of the wrapped value. Mutable containers (sequences,
    /// mappings) are unhashable and fail with
    /// [`NodeError::Conversion`].
    pub fn to_hash(&self) -> Result<u64, NodeError> {
        hash_of(&self.inner.value.borrow())
    }

    /// Rounds a numeric wrapped value to `ndigits` decimal places (ties to
    /// even); `None` rounds to an integer. Non-numeric values degrade to
    /// `0` rather than failing.
    pub fn round(&self, ndigits: Option<i32>) -> Value {
        let value = self.inner.value.borrow();
        match (&*value, ndigits) {
            (Value::Int(i), None) => Value::Int(*i),
            (Value::Int(i), Some(n)) if n >= 0 => Value::Int(*i),
            (Value::Int(i), Some(n)) => {
                let scale = 10f64.powi(-n);
                Value::Int(((*i as f64 / scale).round_ties_even() * scale) as i64)
            }
            (Value::Bool(b), _) => Value::Int(i64::from(*b)),
            (Value::Float(x), None) => Value::Int(x.round_ties_even() as i64),
            (Value::Float(x), Some(n)) => {
                let scale = 10f64.powi(n);
                Value::Float((x * scale).round_ties_even() / scale)
            }
            _ => Value::Int(0),
        }
    }

    fn store(&self, value: Value) -> Node {
        self.inner.value.replace(value);
        self.clone()
    }

    /// In-place integer coercion; returns the handle for chaining.
    pub fn coerce_int(&self) -> Result<Node, NodeError> {
        let converted = self.to_int()?;
        Ok(self.store(Value::Int(converted)))
    }

    /// In-place float coercion.
    pub fn coerce_float(&self) -> Result<Node, NodeError> {
        let converted = self.to_float()?;
        Ok(self.store(Value::Float(converted)))
    }

    /// In-place boolean coercion. Never fails.
    pub fn coerce_bool(&self) -> Node {
        let converted = self.to_bool();
        self.store(Value::Bool(converted))
    }

    /// In-place text coercion.
    pub fn coerce_text(&self) -> Node {
        let converted = self.to_text();
        self.store(Value::Str(converted))
    }

    /// In-place sequence coercion.
    pub fn coerce_list(&self) -> Result<Node, NodeError> {
        let converted = self.to_list()?;
        Ok(self.store(Value::List(converted)))
    }

    /// In-place mapping coercion.
    pub fn coerce_map(&self) -> Result<Node, NodeError> {
        let converted = self.to_map()?;
        Ok(self.store(Value::Map(converted)))
    }

    /// In-place byte-sequence coercion.
    pub fn coerce_bytes(&self) -> Result<Node, NodeError> {
        let converted = self.to_bytes()?;
        Ok(self.store(Value::Bytes(converted)))
    }
}
