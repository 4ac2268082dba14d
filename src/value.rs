use alloc::string::String;
use core::cmp::Ordering;
use core::fmt;

use crate::comparator::NaturalOrder;
use crate::error::{Error, Result};

/// The runtime kind of a [`Value`].
///
/// The natural ordering only compares values of the same kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Undefined,
    Null,
    Boolean,
    Number,
    String,
}

impl Kind {
    /// The lowercase name used in error messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Kind::Undefined => "undefined",
            Kind::Null => "null",
            Kind::Boolean => "boolean",
            Kind::Number => "number",
            Kind::String => "string",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A dynamically kinded scalar, for maps and sets whose keys are not of one static type.
///
/// Under [`Natural`](crate::Natural) ordering, two values compare only when they are of the
/// same [`Kind`]; anything else is an [`Error::TypeMismatch`]. `Null` and `Undefined` are
/// *null-like*: they never take part in a comparison at all (see [`SoMap::set`] for what that
/// means for insertion).
///
/// Numbers order numerically with `-0.0 == 0.0`; `NaN` sorts after every other number.
///
/// # Examples
///
/// ```
/// use somap::{SoMap, Value};
///
/// let mut map = SoMap::new();
/// map.set(Value::from(10), "ten").unwrap();
/// map.set(Value::from(2), "two").unwrap();
///
/// let keys: Vec<_> = map.keys().collect();
/// assert_eq!(keys, [Value::from(2), Value::from(10)]);
/// ```
///
/// [`SoMap::set`]: crate::SoMap::set
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
}

impl Value {
    /// The dynamic kind of this value.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        match self {
            Value::Undefined => Kind::Undefined,
            Value::Null => Kind::Null,
            Value::Boolean(_) => Kind::Boolean,
            Value::Number(_) => Kind::Number,
            Value::String(_) => Kind::String,
        }
    }

    /// Returns `true` for `Null` and `Undefined`.
    #[must_use]
    pub const fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    /// The boolean inside a `Boolean`, `None` for any other kind.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// The number inside a `Number`.
    #[must_use]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Borrows the text of a `String`.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

/// Numeric order with both zeros equal; `NaN`s fall back to the IEEE total order.
pub(crate) fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or_else(|| a.total_cmp(&b))
}

impl NaturalOrder for Value {
    fn natural_cmp(&self, other: &Self) -> Result<Ordering> {
        match (self, other) {
            (Value::Boolean(a), Value::Boolean(b)) => Ok(a.cmp(b)),
            (Value::Number(a), Value::Number(b)) => Ok(cmp_f64(*a, *b)),
            (Value::String(a), Value::String(b)) => Ok(a.cmp(b)),
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => Ok(Ordering::Equal),
            _ => Err(Error::TypeMismatch {
                left: self.kind(),
                right: other.kind(),
            }),
        }
    }

    fn is_absent(&self) -> bool {
        self.is_nullish()
    }
}

/// 2^53: above this not every integer is representable.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Number(n) if n.is_nan() => f.write_str("NaN"),
            Value::Number(n) if n.is_infinite() => f.write_str(if *n > 0.0 { "Infinity" } else { "-Infinity" }),
            // Integral numbers below 2^53 print without a fractional part.
            #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss, clippy::float_cmp)]
            Value::Number(n) if n.abs() < MAX_EXACT_INTEGER && *n == (*n as i64) as f64 => {
                write!(f, "{}", *n as i64)
            }
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => f.write_str(s),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(String::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}
