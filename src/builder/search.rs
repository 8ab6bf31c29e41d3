//! Free-text search over a set of columns.

use super::QueryBuilder;
use crate::operator::WhereOperator;
use crate::value::FilterValue;

impl QueryBuilder {
    /// Applies the request's `search` term as one grouped `OR` of
    /// `contains` conditions over `fields`. See
    /// [`search_as`](Self::search_as).
    #[must_use]
    pub fn search(self, fields: &[&str]) -> Self {
        self.search_as(fields, "search")
    }

    /// Like [`search`](Self::search) with a custom request key. The group
    /// joins the rest of the query as a single `AND` member, so the search
    /// never widens other filters; absent or falsy terms are a no-op.
    #[must_use]
    pub fn search_as(self, fields: &[&str], request_key: &str) -> Self {
        let Some(raw) = self.truthy_request_value(request_key) else {
            return self;
        };
        let Some(term) = FilterValue::from_json(&raw) else {
            return self;
        };
        self.where_group(|group| {
            fields.iter().fold(group, |group, field| {
                group.or_where_op(*field, WhereOperator::Contains, term.clone())
            })
        })
    }
}
