//! Accumulated query intent.
//!
//! [`QueryState`] is everything one builder gathers before execution: the
//! predicate tree, field selection or relation includes (mutually
//! exclusive, last call wins), the ordered sort keys and the pagination
//! window. Delegates read it directly; [`QueryState::to_json`] renders the
//! whole state as a document-store argument object.

use crate::predicate::WhereClause;
use serde_json::{Map, Value};

/// Sort direction for one key. Defaults to ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// One sort key. Earlier entries win; later ones break ties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl SortSpec {
    #[must_use]
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }
}

/// The full intent of one query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryState {
    pub where_clause: WhereClause,
    pub select: Option<Vec<String>>,
    pub include: Option<Vec<String>>,
    pub order_by: Vec<SortSpec>,
    pub take: Option<u64>,
    pub skip: Option<u64>,
}

impl QueryState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the returned fields. Clears any relation includes, since
    /// the two are mutually exclusive.
    pub fn set_select(&mut self, fields: Vec<String>) {
        self.select = Some(fields);
        self.include = None;
    }

    /// Adds a relation to include (idempotently). Clears any field
    /// selection, since the two are mutually exclusive.
    pub fn add_include(&mut self, relation: String) {
        let relations = self.include.get_or_insert_with(Vec::new);
        if !relations.contains(&relation) {
            relations.push(relation);
        }
        self.select = None;
    }

    pub fn push_order(&mut self, spec: SortSpec) {
        self.order_by.push(spec);
    }

    /// Renders the state as a document-store argument object. `where` is
    /// always present; selection, includes, ordering and the window only
    /// when set.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut object = Map::new();
        object.insert("where".to_owned(), self.where_clause.to_json());

        if let Some(fields) = &self.select {
            let map: Map<String, Value> = fields
                .iter()
                .map(|field| (field.clone(), Value::Bool(true)))
                .collect();
            object.insert("select".to_owned(), Value::Object(map));
        }
        if let Some(relations) = &self.include {
            let map: Map<String, Value> = relations
                .iter()
                .map(|relation| (relation.clone(), Value::Bool(true)))
                .collect();
            object.insert("include".to_owned(), Value::Object(map));
        }
        if !self.order_by.is_empty() {
            let specs = self
                .order_by
                .iter()
                .map(|spec| {
                    let mut entry = Map::new();
                    entry.insert(
                        spec.field.clone(),
                        Value::String(spec.direction.as_str().to_owned()),
                    );
                    Value::Object(entry)
                })
                .collect();
            object.insert("orderBy".to_owned(), Value::Array(specs));
        }
        if let Some(take) = self.take {
            object.insert("take".to_owned(), Value::from(take));
        }
        if let Some(skip) = self.skip {
            object.insert("skip".to_owned(), Value::from(skip));
        }

        Value::Object(object)
    }
}
