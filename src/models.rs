//! Typed query parameters for list endpoints.

use crate::request::RequestSource;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

/// The conventional query parameters of a list endpoint.
///
/// Covers free-text search, allow-listed sorting and standard 1-based
/// pagination:
///
/// `GET /users?search=ann&sort=name&order=desc&page=2&per_page=25`
///
/// Converting into a [`RequestSource`] feeds the same values to the
/// request-driven builder methods, so a handler can take
/// `Query<ListParams>` and still use `search` / `sort_from_request` /
/// `paginate` unchanged.
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// Free-text search term, matched against the endpoint's searchable
    /// columns.
    ///
    /// Example: `ann`
    #[param(example = "ann")]
    pub search: Option<String>,
    /// Sort column; validated against the endpoint's allow-list.
    ///
    /// Example: `name`
    #[param(example = "name")]
    pub sort: Option<String>,
    /// Sort direction, `asc` or `desc` (case-insensitive).
    ///
    /// Example: `desc`
    #[param(example = "desc")]
    pub order: Option<String>,
    /// Page number (1-based).
    ///
    /// Example: `1`
    #[param(example = 1)]
    pub page: Option<u64>,
    /// Number of items per page.
    ///
    /// Example: `10`
    #[param(example = 10)]
    #[serde(alias = "perPage")]
    pub per_page: Option<u64>,
}

impl From<ListParams> for RequestSource {
    fn from(params: ListParams) -> Self {
        let mut source = Self::new();
        if let Some(search) = params.search {
            source = source.with_query_param("search", search);
        }
        if let Some(sort) = params.sort {
            source = source.with_query_param("sort", sort);
        }
        if let Some(order) = params.order {
            source = source.with_query_param("order", order);
        }
        if let Some(page) = params.page {
            source = source.with_query_param("page", page);
        }
        if let Some(per_page) = params.per_page {
            source = source.with_query_param("per_page", per_page);
        }
        source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_params_feed_the_request_source() {
        let params = ListParams {
            search: Some("ann".to_owned()),
            sort: Some("name".to_owned()),
            order: Some("desc".to_owned()),
            page: Some(2),
            per_page: None,
        };
        let source = RequestSource::from(params);
        assert_eq!(source.value("search"), Some(&json!("ann")));
        assert_eq!(source.value("sort"), Some(&json!("name")));
        assert_eq!(source.value("order"), Some(&json!("desc")));
        assert_eq!(source.value("page"), Some(&json!(2)));
        assert_eq!(source.value("per_page"), None);
    }

    #[test]
    fn test_absent_params_leave_the_source_empty() {
        let source = RequestSource::from(ListParams::default());
        assert_eq!(source, RequestSource::new());
    }
}
