//! Field value types for update documents.
//!
//! This module defines [`FieldValue`], a single scalar stored in a document
//! field, and [`Field`], the per-field tagged union that is either one scalar
//! or an ordered sequence of scalars (a multi-valued Solr field).
//!
//! # Supported Types
//!
//! - **Null** - Explicit null (used by atomic `set` to clear a field)
//! - **Boolean** - true/false values
//! - **Integer** - 64-bit signed integers
//! - **Float** - 64-bit floating-point numbers
//! - **Text** - String data
//! - **DateTime** - UTC timestamps, sent in Solr's `YYYY-MM-DDTHH:MM:SSZ` form
//!
//! # Conversions
//!
//! ```
//! use lucerna::document::field_value::{Field, FieldValue};
//!
//! let text: FieldValue = "hello".into();
//! assert_eq!(text.as_text(), Some("hello"));
//!
//! let missing: FieldValue = None::<i64>.into();
//! assert!(missing.is_null());
//!
//! let tags: Field = vec!["a", "b"].into();
//! assert_eq!(tags.values().len(), 2);
//! ```

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::error::{LucernaError, Result};

/// Format a timestamp the way Solr expects date fields.
pub fn format_date(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// A single scalar value of a document field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    /// Null value
    Null,
    /// Boolean value
    Boolean(bool),
    /// Integer value
    Integer(i64),
    /// Floating point value
    Float(f64),
    /// Text value
    Text(String),
    /// DateTime value
    DateTime(DateTime<Utc>),
}

impl FieldValue {
    /// Check if this is the null value.
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Convert to text if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get the integer value, if this is an integer.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Get the float value; integers are widened.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            FieldValue::Float(f) => Some(*f),
            FieldValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Get the boolean value, if this is a boolean.
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            FieldValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Get the timestamp, if this is a datetime.
    pub fn as_datetime(&self) -> Option<&DateTime<Utc>> {
        match self {
            FieldValue::DateTime(dt) => Some(dt),
            _ => None,
        }
    }

    /// Render the value as the text Solr receives in XML payloads and
    /// request parameters. Null renders as the empty string.
    pub fn to_solr_string(&self) -> String {
        match self {
            FieldValue::Null => String::new(),
            FieldValue::Boolean(b) => b.to_string(),
            FieldValue::Integer(i) => i.to_string(),
            FieldValue::Float(f) => f.to_string(),
            FieldValue::Text(s) => s.clone(),
            FieldValue::DateTime(dt) => format_date(dt),
        }
    }

    /// Convert to a JSON value for the JSON update format.
    ///
    /// Fails for NaN and infinite floats, which JSON cannot represent.
    pub fn to_json(&self) -> Result<Value> {
        Ok(match self {
            FieldValue::Null => Value::Null,
            FieldValue::Boolean(b) => Value::Bool(*b),
            FieldValue::Integer(i) => Value::Number((*i).into()),
            FieldValue::Float(f) => Number::from_f64(*f).map(Value::Number).ok_or_else(|| {
                LucernaError::invalid_argument(format!("{f} cannot be encoded as JSON"))
            })?,
            FieldValue::Text(s) => Value::String(s.clone()),
            FieldValue::DateTime(dt) => Value::String(format_date(dt)),
        })
    }

    /// Build a field value from a decoded JSON scalar.
    ///
    /// Arrays and objects are not scalars and are rejected.
    pub fn from_json(value: &Value) -> Result<Self> {
        match value {
            Value::Null => Ok(FieldValue::Null),
            Value::Bool(b) => Ok(FieldValue::Boolean(*b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(FieldValue::Integer(i))
                } else if let Some(f) = n.as_f64() {
                    Ok(FieldValue::Float(f))
                } else {
                    Ok(FieldValue::Text(n.to_string()))
                }
            }
            Value::String(s) => Ok(FieldValue::Text(s.clone())),
            other => Err(LucernaError::unexpected_value(format!(
                "expected a scalar field value, got {other}"
            ))),
        }
    }
}

macro_rules! impl_from_scalar {
    ($($ty:ty => $variant:ident as $conv:ty),* $(,)?) => {
        $(
            impl From<$ty> for FieldValue {
                fn from(value: $ty) -> Self {
                    FieldValue::$variant(<$conv>::from(value))
                }
            }

            impl From<$ty> for Field {
                fn from(value: $ty) -> Self {
                    Field::Single(FieldValue::from(value))
                }
            }
        )*
    };
}

impl_from_scalar! {
    bool => Boolean as bool,
    i8 => Integer as i64,
    i16 => Integer as i64,
    i32 => Integer as i64,
    i64 => Integer as i64,
    u8 => Integer as i64,
    u16 => Integer as i64,
    u32 => Integer as i64,
    f32 => Float as f64,
    f64 => Float as f64,
    String => Text as String,
    &str => Text as String,
    DateTime<Utc> => DateTime as DateTime<Utc>,
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Null, Into::into)
    }
}

/// The value held by one document field: a scalar or an ordered sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Field {
    /// A single-valued field.
    Single(FieldValue),
    /// A multi-valued field, in insertion order.
    Multi(Vec<FieldValue>),
}

impl Field {
    /// The null field value.
    pub fn null() -> Self {
        Field::Single(FieldValue::Null)
    }

    /// Check if this field holds only the null scalar.
    pub fn is_null(&self) -> bool {
        matches!(self, Field::Single(FieldValue::Null))
    }

    /// Check if this is a multi-valued field.
    pub fn is_multi(&self) -> bool {
        matches!(self, Field::Multi(_))
    }

    /// Get the scalar, if single-valued.
    pub fn as_single(&self) -> Option<&FieldValue> {
        match self {
            Field::Single(value) => Some(value),
            Field::Multi(_) => None,
        }
    }

    /// All values of the field as a slice (one element for scalars).
    pub fn values(&self) -> &[FieldValue] {
        match self {
            Field::Single(value) => std::slice::from_ref(value),
            Field::Multi(values) => values,
        }
    }

    /// Append values, promoting a scalar to a sequence.
    pub(crate) fn append(&mut self, other: Field) {
        let existing = std::mem::replace(self, Field::Multi(Vec::new()));
        let mut values = match existing {
            Field::Single(value) => vec![value],
            Field::Multi(values) => values,
        };
        match other {
            Field::Single(value) => values.push(value),
            Field::Multi(more) => values.extend(more),
        }
        *self = Field::Multi(values);
    }

    /// Apply `f` to every text value in place.
    pub(crate) fn map_text<F: Fn(&str) -> String>(&mut self, f: F) {
        let apply = |value: &mut FieldValue| {
            if let FieldValue::Text(s) = value {
                *s = f(s);
            }
        };
        match self {
            Field::Single(value) => apply(value),
            Field::Multi(values) => values.iter_mut().for_each(apply),
        }
    }

    /// Convert to a JSON value (an array for multi-valued fields).
    pub fn to_json(&self) -> Result<Value> {
        match self {
            Field::Single(value) => value.to_json(),
            Field::Multi(values) => values
                .iter()
                .map(FieldValue::to_json)
                .collect::<Result<Vec<_>>>()
                .map(Value::Array),
        }
    }

    /// Build a field from a decoded JSON value; arrays become multi-valued.
    pub fn from_json(value: &Value) -> Result<Self> {
        match value {
            Value::Array(items) => items
                .iter()
                .map(FieldValue::from_json)
                .collect::<Result<Vec<_>>>()
                .map(Field::Multi),
            other => FieldValue::from_json(other).map(Field::Single),
        }
    }
}

impl From<FieldValue> for Field {
    fn from(value: FieldValue) -> Self {
        Field::Single(value)
    }
}

impl<T: Into<FieldValue>> From<Vec<T>> for Field {
    fn from(values: Vec<T>) -> Self {
        Field::Multi(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for Field {
    fn from(value: Option<T>) -> Self {
        Field::Single(FieldValue::from(value))
    }
}
