//! Value coercions for request-driven filters.
//!
//! Request parameters arrive as strings more often than not. The `_map`
//! variants of the request-driven filter methods accept any
//! `Fn(&Value) -> Option<FilterValue>`; the helpers here cover the usual
//! coercions. Returning `None` aborts the filter, keeping bad input a
//! no-op.

use crate::value::FilterValue;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::Value;

/// Coerces numbers, numeric strings and booleans into a numeric value.
#[must_use]
pub fn number(value: &Value) -> Option<FilterValue> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .map(FilterValue::Int)
            .or_else(|| number.as_f64().map(FilterValue::Float)),
        Value::String(text) => {
            let trimmed = text.trim();
            trimmed
                .parse::<i64>()
                .map(FilterValue::Int)
                .or_else(|_| trimmed.parse::<f64>().map(FilterValue::Float))
                .ok()
        }
        Value::Bool(flag) => Some(FilterValue::Int(i64::from(*flag))),
        _ => None,
    }
}

/// Coerces scalars into their string form.
#[must_use]
pub fn string(value: &Value) -> Option<FilterValue> {
    match value {
        Value::String(text) => Some(FilterValue::String(text.clone())),
        Value::Number(number) => Some(FilterValue::String(number.to_string())),
        Value::Bool(flag) => Some(FilterValue::String(flag.to_string())),
        _ => None,
    }
}

/// Coerces RFC 3339 strings, plain `YYYY-MM-DD` dates and millisecond
/// timestamps into a UTC datetime.
#[must_use]
pub fn date(value: &Value) -> Option<FilterValue> {
    parse_datetime(value).map(FilterValue::DateTime)
}

pub(crate) fn parse_datetime(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(text) => {
            let trimmed = text.trim();
            trimmed.parse::<DateTime<Utc>>().ok().or_else(|| {
                NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                    .ok()
                    .and_then(|day| day.and_hms_opt(0, 0, 0))
                    .map(|naive| naive.and_utc())
            })
        }
        Value::Number(number) => number
            .as_i64()
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single()),
        _ => None,
    }
}

pub(crate) fn start_of_day(moment: DateTime<Utc>) -> Option<DateTime<Utc>> {
    moment
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc())
}

pub(crate) fn end_of_day(moment: DateTime<Utc>) -> Option<DateTime<Utc>> {
    moment
        .date_naive()
        .and_hms_milli_opt(23, 59, 59, 999)
        .map(|naive| naive.and_utc())
}
