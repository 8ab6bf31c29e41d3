//! Sort resolution.
//!
//! Direct ordering (`order_by` / `order_by_desc`) appends entries; call
//! order is the tie-break order of the final sort sequence.
//! Request-driven ordering ([`sort_from_request`](QueryBuilder::sort_from_request))
//! validates the requested field against an allow-list so clients cannot
//! order by arbitrary columns.

use super::QueryBuilder;
use crate::state::{SortDirection, SortSpec};
use serde_json::Value;

/// Request keys and fallback for
/// [`sort_from_request`](QueryBuilder::sort_from_request).
///
/// The defaults read `?sort=<field>&order=<asc|desc>` with no fallback
/// sort; override individual fields with struct update syntax:
///
/// ```rust,ignore
/// SortOptions {
///     default_field: Some("created_at"),
///     default_direction: SortDirection::Desc,
///     ..SortOptions::default()
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SortOptions<'a> {
    /// Request key carrying the field name.
    pub sort_key: &'a str,
    /// Request key carrying the direction.
    pub order_key: &'a str,
    /// Sort applied when the request names no allow-listed field.
    pub default_field: Option<&'a str>,
    /// Direction of the fallback sort.
    pub default_direction: SortDirection,
}

impl Default for SortOptions<'_> {
    fn default() -> Self {
        Self {
            sort_key: "sort",
            order_key: "order",
            default_field: None,
            default_direction: SortDirection::Asc,
        }
    }
}

impl QueryBuilder {
    /// Appends an ascending sort on `field`.
    #[must_use]
    pub fn order_by(mut self, field: impl Into<String>) -> Self {
        self.state.push_order(SortSpec::new(field, SortDirection::Asc));
        self
    }

    /// Appends a descending sort on `field`.
    #[must_use]
    pub fn order_by_desc(mut self, field: impl Into<String>) -> Self {
        self.state.push_order(SortSpec::new(field, SortDirection::Desc));
        self
    }

    /// Appends the sort requested under `options.sort_key`, provided the
    /// field is in `allowed_fields`. The direction is descending iff the
    /// value under `options.order_key` case-insensitively equals `desc`.
    /// When the request names no usable field, falls back to
    /// `options.default_field` (if configured). Without a bound request
    /// this is a no-op.
    #[must_use]
    pub fn sort_from_request(mut self, allowed_fields: &[&str], options: SortOptions<'_>) -> Self {
        if self.request.is_none() {
            return self;
        }

        let direction = if self
            .request_value(options.order_key)
            .as_ref()
            .and_then(Value::as_str)
            .is_some_and(|order| order.eq_ignore_ascii_case("desc"))
        {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        };

        let requested = self
            .truthy_request_value(options.sort_key)
            .as_ref()
            .and_then(Value::as_str)
            .map(str::to_owned);

        if let Some(field) = requested {
            if allowed_fields.contains(&field.as_str()) {
                self.state.push_order(SortSpec::new(field, direction));
                return self;
            }
            tracing::debug!(field, "requested sort field not allowed, falling back");
        }

        if let Some(default_field) = options.default_field {
            self.state
                .push_order(SortSpec::new(default_field, options.default_direction));
        }
        self
    }
}
