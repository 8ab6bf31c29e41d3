//! # Fluent Query Builder
//!
//! [`QueryBuilder`] accumulates filter, sort, selection and pagination
//! intent into a [`QueryState`], then executes it through a
//! [`ModelDelegate`](crate::ModelDelegate). Every non-terminal method
//! consumes and returns the builder, so queries read as one chain:
//!
//! ```rust,ignore
//! let result = QueryBuilder::with_request(source)
//!     .where_eq("status", "active")
//!     .filter_between_from_request("score_from", "score_to", "score")
//!     .search(&["name", "email"])
//!     .sort_from_request(&["name", "created_at"], SortOptions {
//!         default_field: Some("created_at"),
//!         ..SortOptions::default()
//!     })
//!     .paginate(&delegate, Some(25), None)
//!     .await?;
//! ```
//!
//! ## Composition rules
//!
//! - A flat `AND` condition becomes a top-level entry only while its field
//!   is unclaimed; a second condition on the same field joins the `AND`
//!   group instead of overwriting the first.
//! - `or_where_*` conditions always append to the `OR` group.
//! - Grouped conditions (`where_group` / `or_where_group`) run a fresh
//!   sub-builder and graft its predicate tree in as one unit, skipping
//!   empty groups.
//! - Request-driven methods (`filter_*_from_request`, `search`,
//!   `sort_from_request`) are no-ops when the bound [`RequestSource`] has
//!   nothing usable under their key; missing or invalid request input
//!   never errors.
//!
//! The builder performs no I/O until one of the terminal methods
//! ([`get`](QueryBuilder::get), [`first`](QueryBuilder::first),
//! [`paginate`](QueryBuilder::paginate)) hands the assembled state to a
//! delegate.

mod execute;
mod request_filters;
mod search;
mod sort;

pub use sort::SortOptions;

use crate::operator::WhereOperator;
use crate::predicate::{FieldCondition, Predicate, WhereClause};
use crate::request::{self, RequestSource};
use crate::state::QueryState;
use crate::value::FilterValue;
use chrono::{DateTime, Utc};
use serde_json::Value;

/// Accumulates query intent; see the [module docs](self) for the
/// composition rules.
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    state: QueryState,
    request: Option<RequestSource>,
}

impl QueryBuilder {
    /// A builder with no bound request; request-driven methods become
    /// no-ops.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A builder bound to a request source for the `*_from_request`
    /// methods.
    #[must_use]
    pub fn with_request(request: RequestSource) -> Self {
        Self {
            state: QueryState::new(),
            request: Some(request),
        }
    }

    /// The accumulated state, readable at any point of the chain.
    #[must_use]
    pub fn state(&self) -> &QueryState {
        &self.state
    }

    /// Consumes the builder, yielding the accumulated state.
    #[must_use]
    pub fn into_state(self) -> QueryState {
        self.state
    }

    // ========================================================================
    // Selection & relations
    // ========================================================================

    /// Restricts the returned fields. Clears any previous `include`.
    #[must_use]
    pub fn select(mut self, fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.state
            .set_select(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Includes a relation in the result. Clears any previous `select`.
    #[must_use]
    pub fn include(mut self, relation: impl Into<String>) -> Self {
        self.state.add_include(relation.into());
        self
    }

    /// Includes `relation` only when `condition` holds.
    #[must_use]
    pub fn include_if(self, relation: impl Into<String>, condition: bool) -> Self {
        if condition { self.include(relation) } else { self }
    }

    // ========================================================================
    // Basic filters
    // ========================================================================

    /// Adds an equality condition.
    #[must_use]
    pub fn where_eq(self, field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.where_op(field, WhereOperator::Eq, value)
    }

    /// Adds a condition with an explicit operator.
    #[must_use]
    pub fn where_op(
        mut self,
        field: impl Into<String>,
        operator: WhereOperator,
        value: impl Into<FilterValue>,
    ) -> Self {
        self.state
            .where_clause
            .merge_and(field, operator.fragment(value.into()));
        self
    }

    /// Runs `build` on a fresh sub-builder and adds its predicate tree as
    /// one grouped `AND` member. Empty groups are skipped.
    #[must_use]
    pub fn where_group(mut self, build: impl FnOnce(Self) -> Self) -> Self {
        let clause = self.nested_clause(build);
        if !clause.is_empty() {
            self.state.where_clause.push_and(Predicate::Group(clause));
        }
        self
    }

    /// Adds an equality condition to the `OR` group.
    #[must_use]
    pub fn or_where_eq(self, field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.or_where_op(field, WhereOperator::Eq, value)
    }

    /// Adds a condition with an explicit operator to the `OR` group.
    #[must_use]
    pub fn or_where_op(
        mut self,
        field: impl Into<String>,
        operator: WhereOperator,
        value: impl Into<FilterValue>,
    ) -> Self {
        self.state.where_clause.push_or(Predicate::Field(FieldCondition {
            field: field.into(),
            fragment: operator.fragment(value.into()),
        }));
        self
    }

    /// Runs `build` on a fresh sub-builder and adds its predicate tree as
    /// one grouped `OR` member. Empty groups are skipped.
    #[must_use]
    pub fn or_where_group(mut self, build: impl FnOnce(Self) -> Self) -> Self {
        let clause = self.nested_clause(build);
        if !clause.is_empty() {
            self.state.where_clause.push_or(Predicate::Group(clause));
        }
        self
    }

    // ========================================================================
    // Advanced filters
    // ========================================================================

    /// Shorthand for `where_op(field, Ne, value)`.
    #[must_use]
    pub fn where_not(self, field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.where_op(field, WhereOperator::Ne, value)
    }

    #[must_use]
    pub fn where_in(
        self,
        field: impl Into<String>,
        values: impl IntoIterator<Item = impl Into<FilterValue>>,
    ) -> Self {
        let list: Vec<FilterValue> = values.into_iter().map(Into::into).collect();
        self.where_op(field, WhereOperator::In, FilterValue::List(list))
    }

    #[must_use]
    pub fn where_not_in(
        self,
        field: impl Into<String>,
        values: impl IntoIterator<Item = impl Into<FilterValue>>,
    ) -> Self {
        let list: Vec<FilterValue> = values.into_iter().map(Into::into).collect();
        self.where_op(field, WhereOperator::NotIn, FilterValue::List(list))
    }

    /// Adds an inclusive `low..=high` range condition.
    #[must_use]
    pub fn where_between(
        self,
        field: impl Into<String>,
        low: impl Into<FilterValue>,
        high: impl Into<FilterValue>,
    ) -> Self {
        self.where_op(
            field,
            WhereOperator::Between,
            FilterValue::List(vec![low.into(), high.into()]),
        )
    }

    #[must_use]
    pub fn where_null(self, field: impl Into<String>) -> Self {
        self.where_eq(field, FilterValue::Null)
    }

    #[must_use]
    pub fn where_not_null(self, field: impl Into<String>) -> Self {
        self.where_not(field, FilterValue::Null)
    }

    /// Substring match; `like` and `contains` are the same condition.
    #[must_use]
    pub fn where_like(self, field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.where_op(field, WhereOperator::Contains, value)
    }

    #[must_use]
    pub fn where_starts_with(
        self,
        field: impl Into<String>,
        value: impl Into<FilterValue>,
    ) -> Self {
        self.where_op(field, WhereOperator::StartsWith, value)
    }

    #[must_use]
    pub fn where_ends_with(self, field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.where_op(field, WhereOperator::EndsWith, value)
    }

    /// Compares a timestamp column against a fixed instant. Meant for the
    /// ordering operators and equality; other operators are applied as
    /// given.
    #[must_use]
    pub fn where_date(
        self,
        field: impl Into<String>,
        operator: WhereOperator,
        instant: DateTime<Utc>,
    ) -> Self {
        self.where_op(field, operator, FilterValue::DateTime(instant))
    }

    // ========================================================================
    // Conditional logic
    // ========================================================================

    /// Applies `apply` only when `value` is present.
    #[must_use]
    pub fn when<V>(self, value: Option<V>, apply: impl FnOnce(Self, V) -> Self) -> Self {
        match value {
            Some(value) => apply(self, value),
            None => self,
        }
    }

    /// Like [`when`](Self::when), with a fallback branch for the absent
    /// case.
    #[must_use]
    pub fn when_or<V>(
        self,
        value: Option<V>,
        apply: impl FnOnce(Self, V) -> Self,
        otherwise: impl FnOnce(Self) -> Self,
    ) -> Self {
        match value {
            Some(value) => apply(self, value),
            None => otherwise(self),
        }
    }

    // ========================================================================
    // Internal helpers
    // ========================================================================

    /// Builds a nested clause with a sub-builder that inherits the bound
    /// request source.
    fn nested_clause(&self, build: impl FnOnce(Self) -> Self) -> WhereClause {
        let nested = build(Self {
            state: QueryState::new(),
            request: self.request.clone(),
        });
        nested.state.where_clause
    }

    /// First defined request value under `key`, if a request is bound.
    fn request_value(&self, key: &str) -> Option<Value> {
        self.request
            .as_ref()
            .and_then(|source| source.value(key))
            .cloned()
    }

    /// Like [`request_value`](Self::request_value), filtered to truthy
    /// values.
    fn truthy_request_value(&self, key: &str) -> Option<Value> {
        self.request_value(key).filter(request::truthy)
    }
}
