//! In-memory delegate over JSON document rows.
//!
//! [`MemoryDelegate`] evaluates the predicate tree directly against
//! `serde_json` objects, with the same meaning a document store gives each
//! fragment:
//!
//! - equality against `null` is an is-null check (a missing key counts as
//!   null), and a null column never satisfies `not`, `in` or ordered
//!   comparisons;
//! - `gt`/`gte`/`lt`/`lte` and ranges order numbers numerically, strings
//!   lexicographically and RFC 3339 timestamps as instants;
//! - `contains`/`startsWith`/`endsWith` are case-sensitive substring
//!   anchors over strings;
//! - sorting applies the keys in order with nulls first, then the skip/take
//!   window, then the field selection. Relation includes are a no-op, since
//!   documents are self-contained.
//!
//! Rows decode into any `DeserializeOwned` item type; a row that does not
//! fit fails the call with [`QueryError::Conversion`].

use crate::delegate::ModelDelegate;
use crate::errors::QueryError;
use crate::operator::FilterFragment;
use crate::predicate::{FieldCondition, Predicate, WhereClause};
use crate::state::{QueryState, SortDirection, SortSpec};
use crate::value::FilterValue;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::marker::PhantomData;
use uuid::Uuid;

/// A delegate backed by a vector of JSON objects.
pub struct MemoryDelegate<T> {
    rows: Vec<Value>,
    _item: PhantomData<fn() -> T>,
}

impl<T> MemoryDelegate<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            _item: PhantomData,
        }
    }

    #[must_use]
    pub fn from_rows(rows: Vec<Value>) -> Self {
        Self {
            rows,
            _item: PhantomData,
        }
    }

    /// Builds a delegate by serialising `items` into rows.
    ///
    /// # Errors
    ///
    /// Fails with [`QueryError::Conversion`] when an item does not
    /// serialise to JSON.
    pub fn from_items<S: Serialize>(items: &[S]) -> Result<Self, QueryError> {
        let rows = items
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_rows(rows))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn select_rows(&self, state: &QueryState) -> Vec<Value> {
        let mut matching: Vec<&Value> = self
            .rows
            .iter()
            .filter(|row| matches_clause(&state.where_clause, row))
            .collect();

        if !state.order_by.is_empty() {
            matching.sort_by(|left, right| compare_rows(left, right, &state.order_by));
        }

        let skip = state
            .skip
            .map_or(0, |n| usize::try_from(n).unwrap_or(usize::MAX));
        let take = state
            .take
            .map_or(usize::MAX, |n| usize::try_from(n).unwrap_or(usize::MAX));

        matching
            .into_iter()
            .skip(skip)
            .take(take)
            .map(|row| project(row, state.select.as_deref()))
            .collect()
    }
}

impl<T> Default for MemoryDelegate<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T> ModelDelegate for MemoryDelegate<T>
where
    T: DeserializeOwned + Send,
{
    type Item = T;
    type Error = QueryError;

    async fn count(&self, where_clause: &WhereClause) -> Result<u64, QueryError> {
        let matching = self
            .rows
            .iter()
            .filter(|row| matches_clause(where_clause, row))
            .count();
        Ok(u64::try_from(matching).unwrap_or(u64::MAX))
    }

    async fn find_many(&self, state: &QueryState) -> Result<Vec<T>, QueryError> {
        self.select_rows(state)
            .into_iter()
            .map(|row| serde_json::from_value(row).map_err(QueryError::from))
            .collect()
    }

    async fn find_first(&self, state: &QueryState) -> Result<Option<T>, QueryError> {
        self.select_rows(state)
            .into_iter()
            .next()
            .map(|row| serde_json::from_value(row).map_err(QueryError::from))
            .transpose()
    }
}

fn matches_clause(clause: &WhereClause, row: &Value) -> bool {
    clause
        .fields()
        .iter()
        .all(|condition| matches_field(condition, row))
        && clause
            .and()
            .iter()
            .all(|predicate| matches_predicate(predicate, row))
        && (clause.or().is_empty()
            || clause
                .or()
                .iter()
                .any(|predicate| matches_predicate(predicate, row)))
}

fn matches_predicate(predicate: &Predicate, row: &Value) -> bool {
    match predicate {
        Predicate::Field(condition) => matches_field(condition, row),
        Predicate::Group(clause) => matches_clause(clause, row),
    }
}

fn matches_field(condition: &FieldCondition, row: &Value) -> bool {
    matches_fragment(row.get(&condition.field), &condition.fragment)
}

fn matches_fragment(actual: Option<&Value>, fragment: &FilterFragment) -> bool {
    match fragment {
        FilterFragment::Equals(expected) => {
            if expected.is_null() {
                is_nullish(actual)
            } else {
                actual.is_some_and(|value| value_eq(value, expected))
            }
        }
        FilterFragment::Not(expected) => {
            if expected.is_null() {
                !is_nullish(actual)
            } else {
                // SQL semantics: a null column never satisfies an inequality
                actual.is_some_and(|value| !value.is_null() && !value_eq(value, expected))
            }
        }
        FilterFragment::Gt(expected) => compare(actual, expected).is_some_and(Ordering::is_gt),
        FilterFragment::Gte(expected) => compare(actual, expected).is_some_and(Ordering::is_ge),
        FilterFragment::Lt(expected) => compare(actual, expected).is_some_and(Ordering::is_lt),
        FilterFragment::Lte(expected) => compare(actual, expected).is_some_and(Ordering::is_le),
        FilterFragment::Contains(expected) => {
            text_pair(actual, expected).is_some_and(|(hay, needle)| hay.contains(needle))
        }
        FilterFragment::StartsWith(expected) => {
            text_pair(actual, expected).is_some_and(|(hay, needle)| hay.starts_with(needle))
        }
        FilterFragment::EndsWith(expected) => {
            text_pair(actual, expected).is_some_and(|(hay, needle)| hay.ends_with(needle))
        }
        FilterFragment::In(list) => actual.is_some_and(|value| {
            !value.is_null() && list.iter().any(|expected| value_eq(value, expected))
        }),
        FilterFragment::NotIn(list) => actual.is_some_and(|value| {
            !value.is_null() && !list.iter().any(|expected| value_eq(value, expected))
        }),
        FilterFragment::Range { gte, lte } => {
            gte.as_ref()
                .is_none_or(|low| compare(actual, low).is_some_and(Ordering::is_ge))
                && lte
                    .as_ref()
                    .is_none_or(|high| compare(actual, high).is_some_and(Ordering::is_le))
        }
    }
}

fn is_nullish(actual: Option<&Value>) -> bool {
    actual.is_none_or(Value::is_null)
}

fn value_eq(actual: &Value, expected: &FilterValue) -> bool {
    match expected {
        FilterValue::Null => actual.is_null(),
        FilterValue::Bool(flag) => actual.as_bool() == Some(*flag),
        FilterValue::Int(int) => actual.as_i64() == Some(*int),
        FilterValue::Float(float) => actual
            .as_f64()
            .is_some_and(|value| value.total_cmp(float) == Ordering::Equal),
        FilterValue::String(text) => actual.as_str() == Some(text.as_str()),
        FilterValue::Uuid(uuid) => {
            actual.as_str().and_then(|value| Uuid::parse_str(value).ok()) == Some(*uuid)
        }
        FilterValue::DateTime(instant) => parse_row_datetime(actual) == Some(*instant),
        FilterValue::List(list) => actual.as_array().is_some_and(|values| {
            values.len() == list.len()
                && values
                    .iter()
                    .zip(list)
                    .all(|(value, expected)| value_eq(value, expected))
        }),
    }
}

fn compare(actual: Option<&Value>, expected: &FilterValue) -> Option<Ordering> {
    let actual = actual?;
    if actual.is_null() {
        return None;
    }
    match expected {
        FilterValue::Int(int) => {
            if let Some(left) = actual.as_i64() {
                Some(left.cmp(int))
            } else {
                let right = serde_json::Number::from(*int).as_f64()?;
                Some(actual.as_f64()?.total_cmp(&right))
            }
        }
        FilterValue::Float(float) => Some(actual.as_f64()?.total_cmp(float)),
        FilterValue::String(text) => Some(actual.as_str()?.cmp(text.as_str())),
        FilterValue::DateTime(instant) => Some(parse_row_datetime(actual)?.cmp(instant)),
        FilterValue::Uuid(uuid) => Some(actual.as_str()?.cmp(uuid.to_string().as_str())),
        FilterValue::Null | FilterValue::Bool(_) | FilterValue::List(_) => None,
    }
}

fn text_pair<'a>(
    actual: Option<&'a Value>,
    expected: &'a FilterValue,
) -> Option<(&'a str, &'a str)> {
    Some((actual?.as_str()?, expected.as_str()?))
}

fn parse_row_datetime(actual: &Value) -> Option<DateTime<Utc>> {
    actual.as_str()?.parse::<DateTime<Utc>>().ok()
}

fn compare_rows(left: &Value, right: &Value, order_by: &[SortSpec]) -> Ordering {
    for spec in order_by {
        let ordering = compare_order_values(left.get(&spec.field), right.get(&spec.field));
        let ordering = match spec.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

fn compare_order_values(left: Option<&Value>, right: Option<&Value>) -> Ordering {
    let left_rank = type_rank(left);
    let right_rank = type_rank(right);
    if left_rank != right_rank {
        return left_rank.cmp(&right_rank);
    }
    match (left, right) {
        (Some(Value::Bool(a)), Some(Value::Bool(b))) => a.cmp(b),
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .zip(b.as_f64())
            .map_or(Ordering::Equal, |(x, y)| x.total_cmp(&y)),
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        _ => Ordering::Equal,
    }
}

/// Nulls sort first; mixed kinds order by kind to stay deterministic.
fn type_rank(value: Option<&Value>) -> u8 {
    match value {
        None | Some(Value::Null) => 0,
        Some(Value::Bool(_)) => 1,
        Some(Value::Number(_)) => 2,
        Some(Value::String(_)) => 3,
        Some(Value::Array(_)) => 4,
        Some(Value::Object(_)) => 5,
    }
}

fn project(row: &Value, select: Option<&[String]>) -> Value {
    match (select, row.as_object()) {
        (Some(fields), Some(object)) => {
            let mut projected = Map::new();
            for field in fields {
                if let Some(value) = object.get(field) {
                    projected.insert(field.clone(), value.clone());
                }
            }
            Value::Object(projected)
        }
        _ => row.clone(),
    }
}
