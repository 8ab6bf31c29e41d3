//! Terminal execution against a [`ModelDelegate`].

use super::QueryBuilder;
use crate::delegate::ModelDelegate;
use crate::pagination::{DEFAULT_PAGE_SIZE, Pagination, PaginatorResult};
use serde_json::Value;

impl QueryBuilder {
    /// Fetches every matching row, honoring any select/include, ordering
    /// and window set on the builder.
    ///
    /// # Errors
    ///
    /// Propagates the delegate's error unmodified.
    pub async fn get<D: ModelDelegate>(self, delegate: &D) -> Result<Vec<D::Item>, D::Error> {
        delegate.find_many(&self.state).await
    }

    /// Fetches the first matching row, if any.
    ///
    /// # Errors
    ///
    /// Propagates the delegate's error unmodified.
    pub async fn first<D: ModelDelegate>(self, delegate: &D) -> Result<Option<D::Item>, D::Error> {
        delegate.find_first(&self.state).await
    }

    /// Fetches one page plus pagination metadata. The page is `page` if
    /// given, else the request's `page` parameter (number or numeric
    /// string; anything else is ignored), else 1, and never below 1; a
    /// page beyond the data yields an empty `data`. `per_page` defaults
    /// to [`DEFAULT_PAGE_SIZE`] and is clamped to at least 1.
    ///
    /// The row count (where clause only) and the page fetch run
    /// concurrently; both must succeed.
    ///
    /// # Errors
    ///
    /// Propagates the delegate's error unmodified, from whichever of the
    /// two calls fails.
    pub async fn paginate<D: ModelDelegate>(
        mut self,
        delegate: &D,
        per_page: Option<u64>,
        page: Option<u64>,
    ) -> Result<PaginatorResult<D::Item>, D::Error> {
        let per_page = per_page.unwrap_or(DEFAULT_PAGE_SIZE).max(1);
        let current_page = page.or_else(|| self.request_page()).unwrap_or(1).max(1);

        self.state.skip = Some((current_page - 1).saturating_mul(per_page));
        self.state.take = Some(per_page);

        let (total, data) = tokio::try_join!(
            delegate.count(&self.state.where_clause),
            delegate.find_many(&self.state),
        )?;

        let pagination = Pagination::new(total, per_page, current_page);
        tracing::debug!(
            total,
            per_page,
            current_page,
            page_count = pagination.page_count,
            "paginated query executed"
        );
        Ok(PaginatorResult { pagination, data })
    }

    /// The request's `page` parameter as a page number, when it parses.
    fn request_page(&self) -> Option<u64> {
        match self.request_value("page")? {
            Value::Number(number) => number.as_u64(),
            Value::String(text) => text.trim().parse().ok(),
            _ => None,
        }
    }
}
