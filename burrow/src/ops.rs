//! Operator delegation: arithmetic, comparison, and unary forms.
//!
//! Operands are unwrapped to raw values first, then a single dispatch per
//! closed tag set applies the native operation. Unsupported operand pairs,
//! division by zero, and integer overflow all surface as
//! [`NodeError::Operation`].

use core::cmp::Ordering;

use crate::error::NodeError;
use crate::node::Node;
use crate::value::{Value, partial_cmp_values};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Rem,
    Pow,
}

impl BinOp {
    fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::FloorDiv => "//",
            BinOp::Rem => "%",
            BinOp::Pow => "**",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum CmpOp {
    Lt,
    Le,
    Gt,
    Ge,
}

impl CmpOp {
    fn symbol(self) -> &'static str {
        match self {
            CmpOp::Lt => "<",
            CmpOp::Le => "<=",
            CmpOp::Gt => ">",
            CmpOp::Ge => ">=",
        }
    }

    fn holds(self, ordering: Ordering) -> bool {
        match self {
            CmpOp::Lt => ordering.is_lt(),
            CmpOp::Le => ordering.is_le(),
            CmpOp::Gt => ordering.is_gt(),
            CmpOp::Ge => ordering.is_ge(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum UnOp {
    Neg,
    Pos,
    Abs,
    Invert,
}

impl UnOp {
    fn symbol(self) -> &'static str {
        match self {
            UnOp::Neg => "-",
            UnOp::Pos => "+",
            UnOp::Abs => "abs",
            UnOp::Invert => "~",
        }
    }
}

fn repeat_list(items: &[Value], times: i64) -> Value {
    let times = usize::try_from(times).unwrap_or(0);
    let mut out = Vec::with_capacity(items.len() * times);
    for _ in 0..times {
        out.extend_from_slice(items);
    }
    Value::List(out)
}

fn repeat_str(s: &str, times: i64) -> Value {
    let times = usize::try_from(times).unwrap_or(0);
    Value::Str(s.repeat(times))
}

pub(crate) fn binary(op: BinOp, lhs: &Value, rhs: &Value) -> Result<Value, NodeError> {
    let a = lhs.unwrapped();
    let b = rhs.unwrapped();
    let fail = || NodeError::Operation {
        operator: op.symbol(),
        lhs: a.kind(),
        rhs: Some(b.kind()),
    };

    let result = match op {
        BinOp::Add => match (&a, &b) {
            (Value::Int(x), Value::Int(y)) => x.checked_add(*y).map(Value::Int),
            (Value::Float(x), Value::Float(y)) => Some(Value::Float(x + y)),
            (Value::Int(x), Value::Float(y)) => Some(Value::Float(*x as f64 + y)),
            (Value::Float(x), Value::Int(y)) => Some(Value::Float(x + *y as f64)),
            (Value::Str(x), Value::Str(y)) => Some(Value::Str(format!("{x}{y}"))),
            (Value::Bytes(x), Value::Bytes(y)) => {
                let mut out = x.clone();
                out.extend_from_slice(y);
                Some(Value::Bytes(out))
            }
            (Value::List(x), Value::List(y)) => {
                let mut out = x.clone();
                out.extend_from_slice(y);
                Some(Value::List(out))
            }
            _ => None,
        },
        BinOp::Sub => match (&a, &b) {
            (Value::Int(x), Value::Int(y)) => x.checked_sub(*y).map(Value::Int),
            (Value::Float(x), Value::Float(y)) => Some(Value::Float(x - y)),
            (Value::Int(x), Value::Float(y)) => Some(Value::Float(*x as f64 - y)),
            (Value::Float(x), Value::Int(y)) => Some(Value::Float(x - *y as f64)),
            _ => None,
        },
        BinOp::Mul => match (&a, &b) {
            (Value::Int(x), Value::Int(y)) => x.checked_mul(*y).map(Value::Int),
            (Value::Float(x), Value::Float(y)) => Some(Value::Float(x * y)),
            (Value::Int(x), Value::Float(y)) => Some(Value::Float(*x as f64 * y)),
            (Value::Float(x), Value::Int(y)) => Some(Value::Float(x * *y as f64)),
            (Value::Str(s), Value::Int(n)) | (Value::Int(n), Value::Str(s)) => {
                Some(repeat_str(s, *n))
            }
            (Value::List(items), Value::Int(n)) | (Value::Int(n), Value::List(items)) => {
                Some(repeat_list(items, *n))
            }
            _ => None,
        },
        // True division always yields a float.
        BinOp::Div => match (&a, &b) {
            (Value::Int(x), Value::Int(y)) if *y != 0 => {
                Some(Value::Float(*x as f64 / *y as f64))
            }
            (Value::Float(x), Value::Float(y)) if *y != 0.0 => Some(Value::Float(x / y)),
            (Value::Int(x), Value::Float(y)) if *y != 0.0 => Some(Value::Float(*x as f64 / y)),
            (Value::Float(x), Value::Int(y)) if *y != 0 => Some(Value::Float(x / *y as f64)),
            _ => None,
        },
        BinOp::FloorDiv => match (&a, &b) {
            (Value::Int(x), Value::Int(y)) if *y != 0 => x.checked_div(*y).map(Value::Int),
            (Value::Float(x), Value::Float(y)) if *y != 0.0 => Some(Value::Float((x / y).floor())),
            (Value::Int(x), Value::Float(y)) if *y != 0.0 => {
                Some(Value::Float((*x as f64 / y).floor()))
            }
            (Value::Float(x), Value::Int(y)) if *y != 0 => {
                Some(Value::Float((x / *y as f64).floor()))
            }
            _ => None,
        },
        BinOp::Rem => match (&a, &b) {
            (Value::Int(x), Value::Int(y)) if *y != 0 => x.checked_rem(*y).map(Value::Int),
            (Value::Float(x), Value::Float(y)) if *y != 0.0 => Some(Value::Float(x % y)),
            (Value::Int(x), Value::Float(y)) if *y != 0.0 => Some(Value::Float(*x as f64 % y)),
            (Value::Float(x), Value::Int(y)) if *y != 0 => Some(Value::Float(x % *y as f64)),
            _ => None,
        },
        BinOp::Pow => match (&a, &b) {
            (Value::Int(x), Value::Int(y)) if *y >= 0 => u32::try_from(*y)
                .ok()
                .and_then(|exp| x.checked_pow(exp))
                .map(Value::Int),
            (Value::Int(x), Value::Int(y)) => Some(Value::Float((*x as f64).powf(*y as f64))),
            (Value::Float(x), Value::Float(y)) => Some(Value::Float(x.powf(*y))),
            (Value::Int(x), Value::Float(y)) => Some(Value::Float((*x as f64).powf(*y))),
            (Value::Float(x), Value::Int(y)) => Some(Value::Float(x.powf(*y as f64))),
            _ => None,
        },
    };
    result.ok_or_else(fail)
}

/// Three-argument modular power: `base ** exp % modulus` on integers, with
/// the intermediate squares reduced as it goes.
pub(crate) fn pow_mod(base: &Value, exp: &Value, modulus: &Value) -> Result<Value, NodeError> {
    let base_v = base.unwrapped();
    let exp_v = exp.unwrapped();
    let mod_v = modulus.unwrapped();
    let fail = || NodeError::Operation {
        operator: "** %",
        lhs: base_v.kind(),
        rhs: Some(exp_v.kind()),
    };
    let (Value::Int(b), Value::Int(e), Value::Int(m)) = (&base_v, &exp_v, &mod_v) else {
        return Err(fail());
    };
    if *e < 0 || *m == 0 {
        return Err(fail());
    }
    let m = i128::from(*m);
    let mut result: i128 = 1;
    let mut square = i128::from(*b) % m;
    let mut exp = *e;
    while exp > 0 {
        if exp & 1 == 1 {
            result = result * square % m;
        }
        square = square * square % m;
        exp >>= 1;
    }
    Ok(Value::Int(result as i64))
}

pub(crate) fn compare(op: CmpOp, lhs: &Value, rhs: &Value) -> Result<bool, NodeError> {
    let a = lhs.unwrapped();
    let b = rhs.unwrapped();
    match partial_cmp_values(&a, &b) {
        Some(ordering) => Ok(op.holds(ordering)),
        None => Err(NodeError::Operation {
            operator: op.symbol(),
            lhs: a.kind(),
            rhs: Some(b.kind()),
        }),
    }
}

pub(crate) fn unary(op: UnOp, operand: &Value) -> Result<Value, NodeError> {
    let v = operand.unwrapped();
    let fail = || NodeError::Operation {
        operator: op.symbol(),
        lhs: v.kind(),
        rhs: None,
    };

    let result = match op {
        UnOp::Neg => match &v {
            Value::Int(x) => x.checked_neg().map(Value::Int),
            Value::Float(x) => Some(Value::Float(-x)),
            Value::Bool(b) => Some(Value::Int(-i64::from(*b))),
            _ => None,
        },
        UnOp::Pos => match &v {
            Value::Int(x) => Some(Value::Int(*x)),
            Value::Float(x) => Some(Value::Float(*x)),
            Value::Bool(b) => Some(Value::Int(i64::from(*b))),
            _ => None,
        },
        UnOp::Abs => match &v {
            Value::Int(x) => x.checked_abs().map(Value::Int),
            Value::Float(x) => Some(Value::Float(x.abs())),
            Value::Bool(b) => Some(Value::Int(i64::from(*b))),
            _ => None,
        },
        UnOp::Invert => match &v {
            Value::Int(x) => Some(Value::Int(!x)),
            Value::Bool(b) => Some(Value::Int(!i64::from(*b))),
            _ => None,
        },
    };
    result.ok_or_else(fail)
}

impl Node {
    /// `self + rhs`, yielding a raw value.
    pub fn try_add(&self, rhs: impl Into<Value>) -> Result<Value, NodeError> {
        binary(BinOp::Add, &self.value(), &rhs.into())
    }

    /// `self - rhs`.
    pub fn try_sub(&self, rhs: impl Into<Value>) -> Result<Value, NodeError> {
        binary(BinOp::Sub, &self.value(), &rhs.into())
    }

    /// `self * rhs`.
    pub fn try_mul(&self, rhs: impl Into<Value>) -> Result<Value, NodeError> {
        binary(BinOp::Mul, &self.value(), &rhs.into())
    }

    /// True division `self / rhs`; always a float.
    pub fn try_div(&self, rhs: impl Into<Value>) -> Result<Value, NodeError> {
        binary(BinOp::Div, &self.value(), &rhs.into())
    }

    /// Floor division `self // rhs`.
    pub fn try_floor_div(&self, rhs: impl Into<Value>) -> Result<Value, NodeError> {
        binary(BinOp::FloorDiv, &self.value(), &rhs.into())
    }

    /// Remainder `self % rhs`.
    pub fn try_rem(&self, rhs: impl Into<Value>) -> Result<Value, NodeError> {
        binary(BinOp::Rem, &self.value(), &rhs.into())
    }

    /// Power `self ** rhs`.
    pub fn try_pow(&self, rhs: impl Into<Value>) -> Result<Value, NodeError> {
        binary(BinOp::Pow, &self.value(), &rhs.into())
    }

    /// Modular power `self ** exp % modulus` without materializing the full
    /// power.
    pub fn try_pow_mod(
        &self,
        exp: impl Into<Value>,
        modulus: impl Into<Value>,
    ) -> Result<Value, NodeError> {
        pow_mod(&self.value(), &exp.into(), &modulus.into())
    }

    /// Reflected add: `lhs + self` for a raw left operand.
    pub fn try_radd(&self, lhs: impl Into<Value>) -> Result<Value, NodeError> {
        binary(BinOp::Add, &lhs.into(), &self.value())
    }

    /// Reflected sub: `lhs - self`.
    pub fn try_rsub(&self, lhs: impl Into<Value>) -> Result<Value, NodeError> {
        binary(BinOp::Sub, &lhs.into(), &self.value())
    }

    /// Reflected mul: `lhs * self`.
    pub fn try_rmul(&self, lhs: impl Into<Value>) -> Result<Value, NodeError> {
        binary(BinOp::Mul, &lhs.into(), &self.value())
    }

    /// Reflected true division: `lhs / self`.
    pub fn try_rdiv(&self, lhs: impl Into<Value>) -> Result<Value, NodeError> {
        binary(BinOp::Div, &lhs.into(), &self.value())
    }

    /// Reflected floor division: `lhs // self`.
    pub fn try_rfloor_div(&self, lhs: impl Into<Value>) -> Result<Value, NodeError> {
        binary(BinOp::FloorDiv, &lhs.into(), &self.value())
    }

    /// Reflected remainder: `lhs % self`.
    pub fn try_rrem(&self, lhs: impl Into<Value>) -> Result<Value, NodeError> {
        binary(BinOp::Rem, &lhs.into(), &self.value())
    }

    /// Reflected power: `lhs ** self`.
    pub fn try_rpow(&self, lhs: impl Into<Value>) -> Result<Value, NodeError> {
        binary(BinOp::Pow, &lhs.into(), &self.value())
    }

    fn apply_in_place(&self, op: BinOp, rhs: Value) -> Result<Node, NodeError> {
        let result = binary(op, &self.value(), &rhs)?;
        self.inner.value.replace(result);
        Ok(self.clone())
    }

    /// In-place add: stores `self + rhs` back into this node and returns the
    /// handle for chaining.
    pub fn try_add_assign(&self, rhs: impl Into<Value>) -> Result<Node, NodeError> {
        self.apply_in_place(BinOp::Add, rhs.into())
    }

    /// In-place sub.
    pub fn try_sub_assign(&self, rhs: impl Into<Value>) -> Result<Node, NodeError> {
        self.apply_in_place(BinOp::Sub, rhs.into())
    }

    /// In-place mul.
    pub fn try_mul_assign(&self, rhs: impl Into<Value>) -> Result<Node, NodeError> {
        self.apply_in_place(BinOp::Mul, rhs.into())
    }

    /// In-place true division.
    pub fn try_div_assign(&self, rhs: impl Into<Value>) -> Result<Node, NodeError> {
        self.apply_in_place(BinOp::Div, rhs.into())
    }

    /// In-place floor division.
    pub fn try_floor_div_assign(&self, rhs: impl Into<Value>) -> Result<Node, NodeError> {
        self.apply_in_place(BinOp::FloorDiv, rhs.into())
    }

    /// In-place remainder.
    pub fn try_rem_assign(&self, rhs: impl Into<Value>) -> Result<Node, NodeError> {
        self.apply_in_place(BinOp::Rem, rhs.into())
    }

    /// In-place power.
    pub fn try_pow_assign(&self, rhs: impl Into<Value>) -> Result<Node, NodeError> {
        self.apply_in_place(BinOp::Pow, rhs.into())
    }

    /// `self < other`.
    pub fn try_lt(&self, other: impl Into<Value>) -> Result<bool, NodeError> {
        compare(CmpOp::Lt, &self.value(), &other.into())
    }

    /// `self <= other`.
    pub fn try_le(&self, other: impl Into<Value>) -> Result<bool, NodeError> {
        compare(CmpOp::Le, &self.value(), &other.into())
    }

    /// `self > other`.
    pub fn try_gt(&self, other: impl Into<Value>) -> Result<bool, NodeError> {
        compare(CmpOp::Gt, &self.value(), &other.into())
    }

    /// `self >= other`.
    pub fn try_ge(&self, other: impl Into<Value>) -> Result<bool, NodeError> {
        compare(CmpOp::Ge, &self.value(), &other.into())
    }

    /// Unary negation.
    pub fn try_neg(&self) -> Result<Value, NodeError> {
        unary(UnOp::Neg, &self.value())
    }

    /// Unary plus (numeric identity; booleans promote to integers).
    pub fn try_pos(&self) -> Result<Value, NodeError> {
        unary(UnOp::Pos, &self.value())
    }

    /// Absolute value.
    pub fn try_abs(&self) -> Result<Value, NodeError> {
        unary(UnOp::Abs, &self.value())
    }

    /// Bitwise inversion of an integer (or boolean-as-integer).
    pub fn try_invert(&self) -> Result<Value, NodeError> {
        unary(UnOp::Invert, &self.value())
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Node) -> bool {
        if Node::ptr_eq(self, other) {
            return true;
        }
        *self.inner.value.borrow() == *other.inner.value.borrow()
    }
}

impl PartialEq<Value> for Node {
    fn eq(&self, other: &Value) -> bool {
        *self.inner.value.borrow() == *other
    }
}

impl PartialEq<Node> for Value {
    fn eq(&self, other: &Node) -> bool {
        *self == *other.inner.value.borrow()
    }
}

impl PartialEq<i64> for Node {
    fn eq(&self, other: &i64) -> bool {
        *self.inner.value.borrow() == Value::Int(*other)
    }
}

impl PartialEq<f64> for Node {
    fn eq(&self, other: &f64) -> bool {
        *self.inner.value.borrow() == Value::Float(*other)
    }
}

impl PartialEq<bool> for Node {
    fn eq(&self, other: &bool) -> bool {
        *self.inner.value.borrow() == Value::Bool(*other)
    }
}

impl PartialEq<&str> for Node {
    fn eq(&self, other: &&str) -> bool {
        matches!(&*self.inner.value.borrow(), Value::Str(s) if s == other)
    }
}
