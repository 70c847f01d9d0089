//! Native value representation
//!
//! The tree builder produces a nested ordered-map/array structure whose
//! leaves are [`Value`]s. The variants cover the builtin XML-Schema scalar
//! conversions; [`Value::Custom`] is the extension point for
//! caller-supplied converters producing arbitrary native types.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use std::any::Any;
use std::fmt;
use std::ops::Index;
use std::sync::Arc;

/// Ordered map of child names to values
pub type ValueMap = IndexMap<String, Value>;

/// A native value spliced into the parsed tree
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Explicit nil (empty typed text, or an `xsi:nil="true"` marker)
    Null,
    /// Plain text (passthrough conversion)
    Text(String),
    /// Integer value
    Integer(i64),
    /// Decimal value
    Decimal(Decimal),
    /// Float or double value
    Float(f64),
    /// Boolean value
    Boolean(bool),
    /// Date value
    Date(NaiveDate),
    /// DateTime value with offset
    DateTime(DateTime<FixedOffset>),
    /// Time value
    Time(NaiveTime),
    /// Ordered sequence of values (repeated sibling elements)
    Array(Vec<Value>),
    /// Ordered mapping of child element names to values
    Map(ValueMap),
    /// Caller-defined value produced by a custom converter
    Custom(CustomValue),
}

impl Value {
    /// Build a custom value from any comparable payload
    pub fn custom<T>(payload: T) -> Self
    where
        T: Any + Send + Sync + fmt::Debug + PartialEq,
    {
        Value::Custom(CustomValue::new(payload))
    }

    /// Check whether this value is `Null`
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get the text content, if this is a `Text` value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get the integer content, if this is an `Integer` value
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Get the boolean content, if this is a `Boolean` value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Look up a key, if this is a `Map` value
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Map(map) => map.get(key),
            _ => None,
        }
    }
}

static NULL: Value = Value::Null;

impl Index<&str> for Value {
    type Output = Value;

    fn index(&self, key: &str) -> &Value {
        self.get(key).unwrap_or(&NULL)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Text(s) => write!(f, "{}", s),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Decimal(d) => write!(f, "{}", d),
            Value::Float(v) => {
                if v.is_nan() {
                    write!(f, "NaN")
                } else if *v == f64::INFINITY {
                    write!(f, "INF")
                } else if *v == f64::NEG_INFINITY {
                    write!(f, "-INF")
                } else {
                    write!(f, "{}", v)
                }
            }
            Value::Boolean(b) => write!(f, "{}", if *b { "true" } else { "false" }),
            Value::Date(d) => write!(f, "{}", d),
            Value::DateTime(dt) => write!(f, "{}", dt.to_rfc3339()),
            Value::Time(t) => write!(f, "{}", t),
            Value::Array(_) | Value::Map(_) => write!(f, "{:?}", self),
            Value::Custom(c) => write!(f, "{:?}", c),
        }
    }
}

/// Type-erased payload stored inside [`Value::Custom`]
///
/// Payload equality works across the erasure boundary: two custom values
/// are equal when they hold the same concrete type and their `PartialEq`
/// agrees.
#[derive(Clone)]
pub struct CustomValue {
    inner: Arc<dyn Payload>,
}

impl CustomValue {
    /// Wrap a payload
    pub fn new<T>(payload: T) -> Self
    where
        T: Any + Send + Sync + fmt::Debug + PartialEq,
    {
        Self {
            inner: Arc::new(payload),
        }
    }

    /// Try to view the payload as a concrete type
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.as_any().downcast_ref::<T>()
    }

    /// Check whether the payload is of a concrete type
    pub fn is<T: Any>(&self) -> bool {
        self.downcast_ref::<T>().is_some()
    }
}

impl fmt::Debug for CustomValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner.fmt(f)
    }
}

impl PartialEq for CustomValue {
    fn eq(&self, other: &Self) -> bool {
        self.inner.eq_payload(other.inner.as_ref())
    }
}

trait Payload: Any + Send + Sync + fmt::Debug {
    fn as_any(&self) -> &dyn Any;
    fn eq_payload(&self, other: &dyn Payload) -> bool;
}

impl<T> Payload for T
where
    T: Any + Send + Sync + fmt::Debug + PartialEq,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn eq_payload(&self, other: &dyn Payload) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .map_or(false, |o| self == o)
    }
}
