//! # Sea-ORM Delegate
//!
//! [`SeaOrmDelegate`] executes assembled queries against any entity by
//! compiling the predicate tree into a [`sea_orm::Condition`]. Columns are
//! addressed by name (`Expr::col(Alias::new(..))`), so one delegate type
//! serves every entity without per-entity glue:
//!
//! ```rust,ignore
//! let delegate = SeaOrmDelegate::<users::Entity>::new(&db);
//! let page = QueryBuilder::with_request(source)
//!     .where_eq("status", "active")
//!     .search(&["name", "email"])
//!     .paginate(&delegate, Some(25), None)
//!     .await?;
//! ```
//!
//! ## Translation
//!
//! - Flat and `AND` members compile into `Condition::all()`, the `OR` group
//!   into one `Condition::any()` member, recursively.
//! - `= null` / `not null` become `IS NULL` / `IS NOT NULL`; an empty `in`
//!   list matches nothing, an empty `notIn` list everything.
//! - String anchors compile to `LIKE` with `%`/`_`/`\` escaped; the
//!   needle must be a string, anything else matches nothing. Case
//!   sensitivity follows the column's collation.
//! - `select` and `include` are not pushed down: models decode full rows,
//!   and relation loading is typed Sea-ORM territory.
//!
//! Failures are [`DbErr`], surfaced unmodified.

use crate::delegate::ModelDelegate;
use crate::operator::FilterFragment;
use crate::predicate::{Predicate, WhereClause};
use crate::state::{QueryState, SortDirection};
use crate::value::FilterValue;
use async_trait::async_trait;
use sea_orm::{
    Condition, DatabaseConnection, DbErr, EntityTrait, Order, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Select,
    sea_query::{Alias, Expr, IntoColumnRef, SimpleExpr},
};
use std::marker::PhantomData;

/// A delegate executing against entity `E` over a borrowed connection.
pub struct SeaOrmDelegate<'a, E> {
    db: &'a DatabaseConnection,
    _entity: PhantomData<fn() -> E>,
}

impl<'a, E> SeaOrmDelegate<'a, E> {
    #[must_use]
    pub const fn new(db: &'a DatabaseConnection) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }
}

impl<E> Clone for SeaOrmDelegate<'_, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for SeaOrmDelegate<'_, E> {}

#[async_trait]
impl<E> ModelDelegate for SeaOrmDelegate<'_, E>
where
    E: EntityTrait + Send + Sync,
    E::Model: Sync,
{
    type Item = E::Model;
    type Error = DbErr;

    async fn count(&self, where_clause: &WhereClause) -> Result<u64, DbErr> {
        E::find()
            .filter(where_condition(where_clause))
            .count(self.db)
            .await
    }

    async fn find_many(&self, state: &QueryState) -> Result<Vec<E::Model>, DbErr> {
        select_from::<E>(state).all(self.db).await
    }

    async fn find_first(&self, state: &QueryState) -> Result<Option<E::Model>, DbErr> {
        select_from::<E>(state).one(self.db).await
    }
}

fn select_from<E: EntityTrait>(state: &QueryState) -> Select<E> {
    let mut select = E::find().filter(where_condition(&state.where_clause));
    for sort in &state.order_by {
        let column = SimpleExpr::Column(Alias::new(sort.field.as_str()).into_column_ref());
        let order = match sort.direction {
            SortDirection::Asc => Order::Asc,
            SortDirection::Desc => Order::Desc,
        };
        select = select.order_by(column, order);
    }
    select.offset(state.skip).limit(state.take)
}

/// Compiles a predicate tree into a `Condition`, recursively.
#[must_use]
pub fn where_condition(clause: &WhereClause) -> Condition {
    let mut condition = Condition::all();
    for entry in clause.fields() {
        condition = condition.add(leaf_condition(&entry.field, &entry.fragment));
    }
    for predicate in clause.and() {
        condition = condition.add(predicate_condition(predicate));
    }
    if !clause.or().is_empty() {
        let mut any = Condition::any();
        for predicate in clause.or() {
            any = any.add(predicate_condition(predicate));
        }
        condition = condition.add(any);
    }
    condition
}

fn predicate_condition(predicate: &Predicate) -> Condition {
    match predicate {
        Predicate::Field(condition) => leaf_condition(&condition.field, &condition.fragment),
        Predicate::Group(clause) => where_condition(clause),
    }
}

fn leaf_condition(field: &str, fragment: &FilterFragment) -> Condition {
    let column = || Expr::col(Alias::new(field));
    match fragment {
        FilterFragment::Equals(FilterValue::Null) => Condition::all().add(column().is_null()),
        FilterFragment::Equals(value) => Condition::all().add(column().eq(scalar_value(value))),
        FilterFragment::Not(FilterValue::Null) => Condition::all().add(column().is_not_null()),
        FilterFragment::Not(value) => Condition::all().add(column().ne(scalar_value(value))),
        FilterFragment::Gt(value) => Condition::all().add(column().gt(scalar_value(value))),
        FilterFragment::Gte(value) => Condition::all().add(column().gte(scalar_value(value))),
        FilterFragment::Lt(value) => Condition::all().add(column().lt(scalar_value(value))),
        FilterFragment::Lte(value) => Condition::all().add(column().lte(scalar_value(value))),
        FilterFragment::Contains(value) => match value.as_str() {
            Some(needle) => Condition::all().add(column().like(like_contains(needle))),
            None => match_nothing(),
        },
        FilterFragment::StartsWith(value) => match value.as_str() {
            Some(needle) => Condition::all().add(column().like(like_starts(needle))),
            None => match_nothing(),
        },
        FilterFragment::EndsWith(value) => match value.as_str() {
            Some(needle) => Condition::all().add(column().like(like_ends(needle))),
            None => match_nothing(),
        },
        FilterFragment::In(list) => {
            if list.is_empty() {
                // IN () is always false
                match_nothing()
            } else {
                Condition::all().add(column().is_in(list.iter().map(scalar_value)))
            }
        }
        FilterFragment::NotIn(list) => {
            if list.is_empty() {
                Condition::all()
            } else {
                Condition::all().add(column().is_not_in(list.iter().map(scalar_value)))
            }
        }
        FilterFragment::Range { gte, lte } => {
            let mut range = Condition::all();
            if let Some(low) = gte {
                range = range.add(column().gte(scalar_value(low)));
            }
            if let Some(high) = lte {
                range = range.add(column().lte(scalar_value(high)));
            }
            range
        }
    }
}

fn match_nothing() -> Condition {
    Condition::all().add(Expr::cust("1=0"))
}

fn scalar_value(value: &FilterValue) -> sea_orm::Value {
    match value {
        FilterValue::Null => sea_orm::Value::Int(None),
        FilterValue::Bool(flag) => sea_orm::Value::Bool(Some(*flag)),
        FilterValue::Int(int) => sea_orm::Value::BigInt(Some(*int)),
        FilterValue::Float(float) => sea_orm::Value::Double(Some(*float)),
        FilterValue::String(text) => sea_orm::Value::String(Some(Box::new(text.clone()))),
        FilterValue::Uuid(id) => sea_orm::Value::Uuid(Some(Box::new(*id))),
        FilterValue::DateTime(instant) => {
            sea_orm::Value::ChronoDateTimeUtc(Some(Box::new(*instant)))
        }
        // A list used as a scalar compares against its JSON rendering
        FilterValue::List(_) => sea_orm::Value::String(Some(Box::new(value.to_json().to_string()))),
    }
}

fn like_escape(needle: &str) -> String {
    let mut out = String::with_capacity(needle.len());
    for ch in needle.chars() {
        match ch {
            '%' | '_' | '\\' => {
                out.push('\\');
                out.push(ch);
            }
            c => out.push(c),
        }
    }
    out
}

fn like_contains(needle: &str) -> String {
    format!("%{}%", like_escape(needle))
}

fn like_starts(needle: &str) -> String {
    format!("{}%", like_escape(needle))
}

fn like_ends(needle: &str) -> String {
    format!("%{}", like_escape(needle))
}
