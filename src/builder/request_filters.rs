//! Request-driven filters.
//!
//! Each method reads one (or two) request parameters and applies a filter
//! only when something usable is there, following JavaScript-style
//! truthiness: absent keys, `null`, `false`, `0` and `""` all skip the
//! filter. Deliberately so: these methods exist to translate half-filled
//! admin filter forms, where an empty input means "don't filter".
//!
//! The `_as` variants name the column when it differs from the request
//! key; the `_map` variants pass the raw JSON value through a coercion
//! (see [`transform`](crate::transform)) whose `None` aborts the filter.

use super::QueryBuilder;
use crate::operator::WhereOperator;
use crate::transform;
use crate::value::{FilterEnum, FilterValue};
use serde_json::Value;

fn coerce_list(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        scalar => vec![scalar],
    }
}

impl QueryBuilder {
    /// Equality filter on the column named like the request key.
    #[must_use]
    pub fn filter_from_request(self, key: &str) -> Self {
        self.filter_from_request_as(key, key, WhereOperator::Eq)
    }

    /// Filter on `field` with `operator`, fed by the request value under
    /// `key`.
    #[must_use]
    pub fn filter_from_request_as(self, key: &str, field: &str, operator: WhereOperator) -> Self {
        let Some(raw) = self.truthy_request_value(key) else {
            return self;
        };
        let Some(value) = FilterValue::from_json(&raw) else {
            return self;
        };
        self.where_op(field, operator, value)
    }

    /// Like [`filter_from_request_as`](Self::filter_from_request_as), with
    /// the value passed through `transform` first. `None` aborts the
    /// filter.
    #[must_use]
    pub fn filter_from_request_map(
        self,
        key: &str,
        field: &str,
        operator: WhereOperator,
        transform: impl FnOnce(&Value) -> Option<FilterValue>,
    ) -> Self {
        let Some(raw) = self.truthy_request_value(key) else {
            return self;
        };
        let Some(value) = transform(&raw) else {
            return self;
        };
        self.where_op(field, operator, value)
    }

    /// Membership filter on the column named like the request key. Useful
    /// for checkboxes and multi-selects (`?status[]=1&status[]=2`); a
    /// scalar value becomes a single-element list.
    #[must_use]
    pub fn filter_in_from_request(self, key: &str) -> Self {
        self.filter_in_from_request_as(key, key)
    }

    /// Membership filter on `field`, fed by the request value under `key`.
    #[must_use]
    pub fn filter_in_from_request_as(self, key: &str, field: &str) -> Self {
        let Some(raw) = self.truthy_request_value(key) else {
            return self;
        };
        let values: Vec<FilterValue> = coerce_list(raw)
            .iter()
            .filter_map(FilterValue::from_json)
            .collect();
        self.where_in(field, values)
    }

    /// Like [`filter_in_from_request_as`](Self::filter_in_from_request_as),
    /// mapping every element through `transform`. Elements mapping to
    /// `None` are dropped; the filter still applies with whatever remains.
    #[must_use]
    pub fn filter_in_from_request_map(
        self,
        key: &str,
        field: &str,
        transform: impl Fn(&Value) -> Option<FilterValue>,
    ) -> Self {
        let Some(raw) = self.truthy_request_value(key) else {
            return self;
        };
        let values: Vec<FilterValue> = coerce_list(raw)
            .iter()
            .filter_map(|element| transform(element))
            .collect();
        self.where_in(field, values)
    }

    /// Range filter on `field` fed by two request parameters. Both bounds
    /// present applies an inclusive range; one bound alone applies the
    /// matching one-sided comparison; neither is a no-op.
    #[must_use]
    pub fn filter_between_from_request(self, from_key: &str, to_key: &str, field: &str) -> Self {
        let from = self
            .truthy_request_value(from_key)
            .as_ref()
            .and_then(FilterValue::from_json);
        let to = self
            .truthy_request_value(to_key)
            .as_ref()
            .and_then(FilterValue::from_json);

        match (from, to) {
            (Some(low), Some(high)) => self.where_between(field, low, high),
            (Some(low), None) => self.where_op(field, WhereOperator::Gte, low),
            (None, Some(high)) => self.where_op(field, WhereOperator::Lte, high),
            (None, None) => self,
        }
    }

    /// Equality filter for an enum-backed column named like the request
    /// key. Applies only when the request value is a known enum name.
    #[must_use]
    pub fn filter_enum_from_request<E: FilterEnum>(self, key: &str) -> Self {
        self.filter_enum_from_request_as::<E>(key, key, WhereOperator::Eq)
    }

    /// Enum filter on `field` with `operator`. Unknown names (or non-string
    /// values) leave the query untouched.
    #[must_use]
    pub fn filter_enum_from_request_as<E: FilterEnum>(
        self,
        key: &str,
        field: &str,
        operator: WhereOperator,
    ) -> Self {
        let Some(raw) = self.truthy_request_value(key) else {
            return self;
        };
        let Some(value) = raw.as_str().and_then(E::parse) else {
            tracing::debug!(key, "enum filter skipped: unknown name");
            return self;
        };
        self.where_op(field, operator, value)
    }

    /// Membership filter for an enum-backed column named like the request
    /// key.
    #[must_use]
    pub fn filter_enum_in_from_request<E: FilterEnum>(self, key: &str) -> Self {
        self.filter_enum_in_from_request_as::<E>(key, key)
    }

    /// Enum membership filter on `field`. All-or-nothing: if any element
    /// is not a known enum name, the whole filter is skipped.
    #[must_use]
    pub fn filter_enum_in_from_request_as<E: FilterEnum>(self, key: &str, field: &str) -> Self {
        let Some(raw) = self.truthy_request_value(key) else {
            return self;
        };
        let mut values = Vec::new();
        for element in coerce_list(raw) {
            let Some(value) = element.as_str().and_then(E::parse) else {
                tracing::debug!(key, "enum membership filter skipped: unknown name");
                return self;
            };
            values.push(value);
        }
        self.where_in(field, values)
    }

    /// Date-range filter over `created_at`, fed by request parameters of
    /// the same name. See
    /// [`filter_date_range_from_request_on`](Self::filter_date_range_from_request_on).
    #[must_use]
    pub fn filter_date_range_from_request(self) -> Self {
        self.filter_date_range_from_request_on("created_at", "created_at")
    }

    /// Date-range filter with explicit bound columns; each column name
    /// doubles as its request key. The lower bound snaps to the start of
    /// its UTC day (00:00:00.000), the upper bound to the end of its UTC
    /// day (23:59:59.999), so a single date parameter covers that whole
    /// day. Accepts RFC 3339 strings, plain `YYYY-MM-DD` dates and
    /// millisecond timestamps; unparseable bounds are skipped
    /// individually.
    #[must_use]
    pub fn filter_date_range_from_request_on(self, from_field: &str, to_field: &str) -> Self {
        let from = self
            .truthy_request_value(from_field)
            .as_ref()
            .and_then(transform::parse_datetime)
            .and_then(transform::start_of_day);
        let to = self
            .truthy_request_value(to_field)
            .as_ref()
            .and_then(transform::parse_datetime)
            .and_then(transform::end_of_day);

        self.when(from, |query, low| {
            query.where_date(from_field, WhereOperator::Gte, low)
        })
        .when(to, |query, high| {
            query.where_date(to_field, WhereOperator::Lte, high)
        })
    }
}
