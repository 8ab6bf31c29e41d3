//! Pagination end to end: page resolution, clamping, the result envelope
//! and error passthrough from a failing backend.

mod common;

use async_trait::async_trait;
use common::{User, bulk_delegate};
use querycrate::{
    ModelDelegate, Pagination, PaginatorResult, QueryBuilder, QueryState, RequestSource,
    SortOptions, WhereClause,
};
use serde_json::{Value, json};

fn ids(result: &PaginatorResult<User>) -> Vec<i64> {
    result.data.iter().map(|user| user.id).collect()
}

#[tokio::test]
async fn test_filtered_search_pagination_scenario() {
    let source = RequestSource::new().with_query_param("search", "ann");
    let options = SortOptions {
        default_field: Some("id"),
        ..SortOptions::default()
    };
    let result = QueryBuilder::with_request(source)
        .where_eq("status", "active")
        .search(&["name"])
        .sort_from_request(&["id", "name"], options)
        .paginate(&bulk_delegate(), Some(10), Some(2))
        .await
        .expect("memory query succeeds");

    assert_eq!(result.pagination, Pagination::new(25, 10, 2));
    assert_eq!(ids(&result), (11..=20).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_per_page_defaults_to_ten() {
    let result = QueryBuilder::new()
        .order_by("id")
        .paginate(&bulk_delegate(), None, None)
        .await
        .expect("memory query succeeds");

    assert_eq!(result.pagination, Pagination::new(35, 10, 1));
    assert_eq!(ids(&result), (1..=10).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_page_read_from_bound_request() {
    let source = RequestSource::new().with_query_param("page", "2");
    let result = QueryBuilder::with_request(source)
        .order_by("id")
        .paginate(&bulk_delegate(), Some(10), None)
        .await
        .expect("memory query succeeds");
    assert_eq!(result.pagination.current_page, 2);
    assert_eq!(ids(&result), (11..=20).collect::<Vec<_>>());

    let source = RequestSource::new().with_query_param("page", 3);
    let result = QueryBuilder::with_request(source)
        .order_by("id")
        .paginate(&bulk_delegate(), Some(10), None)
        .await
        .expect("memory query succeeds");
    assert_eq!(result.pagination.current_page, 3);
}

#[tokio::test]
async fn test_explicit_page_beats_request_page() {
    let source = RequestSource::new().with_query_param("page", "3");
    let result = QueryBuilder::with_request(source)
        .order_by("id")
        .paginate(&bulk_delegate(), Some(10), Some(1))
        .await
        .expect("memory query succeeds");
    assert_eq!(result.pagination.current_page, 1);
    assert_eq!(ids(&result), (1..=10).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_degenerate_page_values_clamp_to_one() {
    for source in [
        RequestSource::new().with_query_param("page", "0"),
        RequestSource::new().with_query_param("page", "last"),
        RequestSource::new(),
    ] {
        let result = QueryBuilder::with_request(source)
            .paginate(&bulk_delegate(), Some(10), None)
            .await
            .expect("memory query succeeds");
        assert_eq!(result.pagination.current_page, 1);
        assert_eq!(result.pagination.page_count, 4);
    }

    let result = QueryBuilder::new()
        .paginate(&bulk_delegate(), Some(10), Some(0))
        .await
        .expect("memory query succeeds");
    assert_eq!(result.pagination.current_page, 1);
}

#[tokio::test]
async fn test_per_page_zero_clamps_to_one() {
    let result = QueryBuilder::new()
        .order_by("id")
        .paginate(&bulk_delegate(), Some(0), None)
        .await
        .expect("memory query succeeds");

    assert_eq!(result.pagination, Pagination::new(35, 1, 1));
    assert_eq!(ids(&result), vec![1]);
}

#[tokio::test]
async fn test_page_beyond_data_is_empty_but_counted() {
    let result = QueryBuilder::new()
        .paginate(&bulk_delegate(), Some(10), Some(99))
        .await
        .expect("memory query succeeds");

    assert!(result.data.is_empty());
    assert_eq!(result.pagination.total, 35);
    assert_eq!(result.pagination.page_count, 4);
    assert_eq!(result.pagination.current_page, 99);
}

#[tokio::test]
async fn test_count_ignores_the_page_window() {
    let result = QueryBuilder::new()
        .where_eq("status", "archived")
        .paginate(&bulk_delegate(), Some(2), Some(2))
        .await
        .expect("memory query succeeds");

    assert_eq!(result.pagination, Pagination::new(5, 2, 2));
    assert_eq!(result.data.len(), 2);
}

#[tokio::test]
async fn test_envelope_serialises_with_camel_case_pagination() {
    let result = QueryBuilder::new()
        .where_eq("role", "member")
        .order_by("id")
        .paginate(&bulk_delegate(), Some(5), Some(1))
        .await
        .expect("memory query succeeds");

    let wire = serde_json::to_value(&result).expect("envelope serialises");
    assert_eq!(
        wire["pagination"],
        json!({ "total": 35, "perPage": 5, "pageCount": 7, "currentPage": 1 })
    );
    assert_eq!(wire["data"].as_array().map(Vec::len), Some(5));
    assert_eq!(wire["data"][0]["name"], "Joanne Example 01");
}

struct FailingDelegate;

#[async_trait]
impl ModelDelegate for FailingDelegate {
    type Item = Value;
    type Error = String;

    async fn count(&self, _where_clause: &WhereClause) -> Result<u64, String> {
        Err("count backend unavailable".to_owned())
    }

    async fn find_many(&self, _state: &QueryState) -> Result<Vec<Value>, String> {
        Ok(Vec::new())
    }

    async fn find_first(&self, _state: &QueryState) -> Result<Option<Value>, String> {
        Ok(None)
    }
}

#[tokio::test]
async fn test_backend_errors_pass_through_paginate() {
    let error = QueryBuilder::new()
        .paginate(&FailingDelegate, None, None)
        .await
        .expect_err("count failure must surface");
    assert_eq!(error, "count backend unavailable");
}
