//! Scalar values accepted by filter conditions.
//!
//! Every filter method on [`QueryBuilder`](crate::QueryBuilder) takes its
//! comparison value as a [`FilterValue`]. The enum is a closed union of the
//! scalar types the predicate tree can express, plus [`FilterValue::List`]
//! for membership and range operators. `From` implementations cover the
//! common Rust types so call sites can pass plain literals.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;
use uuid::Uuid;

/// A scalar (or list of scalars) usable in a filter condition.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Uuid(Uuid),
    DateTime(DateTime<Utc>),
    List(Vec<FilterValue>),
}

impl FilterValue {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Coerces the value into a list, wrapping scalars into a single-element
    /// one. Used by the `in` / `not in` / `between` operators.
    #[must_use]
    pub fn into_list(self) -> Vec<Self> {
        match self {
            Self::List(values) => values,
            scalar => vec![scalar],
        }
    }

    /// Renders the value as JSON. Timestamps use the millisecond RFC 3339
    /// form (`2024-01-01T00:00:00.000Z`), UUIDs their hyphenated form.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(value) => Value::Bool(*value),
            Self::Int(value) => Value::from(*value),
            Self::Float(value) => {
                serde_json::Number::from_f64(*value).map_or(Value::Null, Value::Number)
            }
            Self::String(value) => Value::String(value.clone()),
            Self::Uuid(value) => Value::String(value.to_string()),
            Self::DateTime(value) => {
                Value::String(value.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            Self::List(values) => Value::Array(values.iter().map(Self::to_json).collect()),
        }
    }

    /// Converts a JSON value into a filter value.
    ///
    /// Objects have no scalar meaning and yield `None`; array elements that
    /// fail conversion are dropped. Strings stay strings; coercion into
    /// numbers or dates is the job of the [`transform`](crate::transform)
    /// helpers.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(Self::Null),
            Value::Bool(flag) => Some(Self::Bool(*flag)),
            Value::Number(number) => number
                .as_i64()
                .map(Self::Int)
                .or_else(|| number.as_f64().map(Self::Float)),
            Value::String(text) => Some(Self::String(text.clone())),
            Value::Array(values) => {
                Some(Self::List(values.iter().filter_map(Self::from_json).collect()))
            }
            Value::Object(_) => None,
        }
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for FilterValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for FilterValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for FilterValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Uuid> for FilterValue {
    fn from(value: Uuid) -> Self {
        Self::Uuid(value)
    }
}

impl From<DateTime<Utc>> for FilterValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::DateTime(value)
    }
}

impl<T: Into<FilterValue>> From<Vec<T>> for FilterValue {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<FilterValue>> From<Option<T>> for FilterValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Maps enum *names* arriving in requests to their stored backing values.
///
/// Request-driven enum filters only apply when the incoming string is a
/// known name; anything else is a no-op. The backing value is whatever the
/// column actually stores, which need not equal the name:
///
/// ```rust,ignore
/// struct Role;
///
/// impl FilterEnum for Role {
///     fn parse(name: &str) -> Option<FilterValue> {
///         match name {
///             "ADMIN" => Some("admin".into()),
///             "STUDENT" => Some("student".into()),
///             _ => None,
///         }
///     }
/// }
/// ```
pub trait FilterEnum {
    fn parse(name: &str) -> Option<FilterValue>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_into_list_wraps_scalars() {
        assert_eq!(
            FilterValue::from(5).into_list(),
            vec![FilterValue::Int(5)],
            "scalar should become a single-element list"
        );
        assert_eq!(
            FilterValue::from(vec![1, 2]).into_list(),
            vec![FilterValue::Int(1), FilterValue::Int(2)],
            "existing list should pass through unchanged"
        );
    }

    #[test]
    fn test_from_json_rejects_objects() {
        assert_eq!(FilterValue::from_json(&json!({"a": 1})), None);
        assert_eq!(FilterValue::from_json(&json!(null)), Some(FilterValue::Null));
        assert_eq!(FilterValue::from_json(&json!(3)), Some(FilterValue::Int(3)));
        assert_eq!(
            FilterValue::from_json(&json!("abc")),
            Some(FilterValue::String("abc".to_owned()))
        );
    }

    #[test]
    fn test_from_json_drops_unconvertible_array_elements() {
        let value = FilterValue::from_json(&json!([1, {"bad": true}, "ok"]));
        assert_eq!(
            value,
            Some(FilterValue::List(vec![
                FilterValue::Int(1),
                FilterValue::String("ok".to_owned())
            ]))
        );
    }

    #[test]
    fn test_to_json_datetime_uses_millisecond_rfc3339() {
        let dt: DateTime<Utc> = "2024-03-05T07:00:00Z".parse().unwrap();
        assert_eq!(
            FilterValue::DateTime(dt).to_json(),
            json!("2024-03-05T07:00:00.000Z")
        );
    }

    #[test]
    fn test_option_converts_to_null() {
        assert_eq!(FilterValue::from(None::<i64>), FilterValue::Null);
        assert_eq!(FilterValue::from(Some(7)), FilterValue::Int(7));
    }
}
