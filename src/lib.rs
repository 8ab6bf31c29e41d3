//! Fluent, request-driven query building for admin-style list endpoints.
//!
//! [`QueryBuilder`] turns chained filter/sort/search/pagination calls, plus
//! the raw parameters of an HTTP request, into a backend-agnostic
//! [`QueryState`] executed through a [`ModelDelegate`]: Sea-ORM
//! ([`SeaOrmDelegate`], feature `sea-orm`, on by default) or in-memory JSON
//! rows ([`MemoryDelegate`]).
//!
//! ```rust,ignore
//! let page = QueryBuilder::with_request(source)
//!     .where_eq("status", "active")
//!     .filter_between_from_request("score_from", "score_to", "score")
//!     .search(&["name", "email"])
//!     .sort_from_request(&["name", "created_at"], SortOptions::default())
//!     .paginate(&delegate, Some(25), None)
//!     .await?;
//! ```

pub mod builder;
pub mod delegate;
pub mod errors;
pub mod memory;
pub mod models;
pub mod operator;
#[cfg(feature = "sea-orm")]
pub mod orm;
pub mod pagination;
pub mod predicate;
pub mod request;
pub mod state;
pub mod transform;
pub mod value;

// Re-export commonly used items
pub use builder::{QueryBuilder, SortOptions};
pub use delegate::ModelDelegate;
pub use errors::QueryError;
pub use memory::MemoryDelegate;
pub use models::ListParams;
pub use operator::{FilterFragment, WhereOperator};
#[cfg(feature = "sea-orm")]
pub use orm::SeaOrmDelegate;
pub use pagination::{DEFAULT_PAGE_SIZE, Pagination, PaginatorResult};
pub use predicate::{FieldCondition, Predicate, WhereClause};
pub use request::RequestSource;
pub use state::{QueryState, SortDirection, SortSpec};
pub use value::{FilterEnum, FilterValue};
