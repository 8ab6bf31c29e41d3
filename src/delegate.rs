//! The storage seam.
//!
//! A [`ModelDelegate`] executes an assembled [`QueryState`] against some
//! backing store. The builder hands the state over at its terminal methods
//! and otherwise performs no I/O; counting considers only the predicate
//! tree while fetching sees the full state including ordering, selection
//! and the pagination window.
//!
//! The crate ships two implementations:
//! [`MemoryDelegate`](crate::MemoryDelegate) over in-memory JSON rows, and
//! [`SeaOrmDelegate`](crate::SeaOrmDelegate) over a Sea-ORM entity (behind
//! the `sea-orm` feature). Delegate failures propagate through the
//! terminal methods unmodified.

use crate::predicate::WhereClause;
use crate::state::QueryState;
use async_trait::async_trait;

#[async_trait]
pub trait ModelDelegate: Send + Sync {
    type Item: Send;
    type Error: Send;

    /// Counts the rows matching the predicate tree.
    ///
    /// # Errors
    ///
    /// Returns the backing store's error unmodified.
    async fn count(&self, where_clause: &WhereClause) -> Result<u64, Self::Error>;

    /// Fetches all rows matching the full query state.
    ///
    /// # Errors
    ///
    /// Returns the backing store's error unmodified.
    async fn find_many(&self, state: &QueryState) -> Result<Vec<Self::Item>, Self::Error>;

    /// Fetches the first row matching the full query state, if any.
    ///
    /// # Errors
    ///
    /// Returns the backing store's error unmodified.
    async fn find_first(&self, state: &QueryState) -> Result<Option<Self::Item>, Self::Error>;
}
