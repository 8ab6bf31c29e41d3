//! The backend-agnostic predicate tree.
//!
//! A [`WhereClause`] holds a flat, insertion-ordered run of field conditions
//! plus two logic groups (`AND`, `OR`). Field conditions arriving through
//! [`WhereClause::merge_and`] only become top-level entries while their field
//! is unclaimed; a second condition on the same field is pushed into the
//! `AND` group instead, so conditions never silently replace one another.
//! Nested groups carry a whole sub-clause and render recursively.

use crate::operator::FilterFragment;
use serde_json::{Map, Value};

/// One field compared against one fragment.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldCondition {
    pub field: String,
    pub fragment: FilterFragment,
}

/// A node in the predicate tree: a single field condition or a nested group.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Field(FieldCondition),
    Group(WhereClause),
}

impl Predicate {
    fn to_json(&self) -> Value {
        match self {
            Self::Field(condition) => {
                let mut object = Map::new();
                object.insert(condition.field.clone(), condition.fragment.to_json());
                Value::Object(object)
            }
            Self::Group(clause) => clause.to_json(),
        }
    }
}

/// Accumulated filter conditions for one query.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WhereClause {
    fields: Vec<FieldCondition>,
    and: Vec<Predicate>,
    or: Vec<Predicate>,
}

impl WhereClause {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.and.is_empty() && self.or.is_empty()
    }

    /// Top-level field conditions, in insertion order.
    #[must_use]
    pub fn fields(&self) -> &[FieldCondition] {
        &self.fields
    }

    /// Members of the `AND` group.
    #[must_use]
    pub fn and(&self) -> &[Predicate] {
        &self.and
    }

    /// Members of the `OR` group.
    #[must_use]
    pub fn or(&self) -> &[Predicate] {
        &self.or
    }

    /// Whether `field` already has a top-level condition. Conditions inside
    /// the logic groups do not count.
    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.fields.iter().any(|condition| condition.field == field)
    }

    /// Adds an `AND` condition on `field`. The condition lands at the top
    /// level only if the field is unclaimed there; otherwise it joins the
    /// `AND` group, keeping the earlier condition intact.
    pub fn merge_and(&mut self, field: impl Into<String>, fragment: FilterFragment) {
        let field = field.into();
        if self.has_field(&field) {
            self.and.push(Predicate::Field(FieldCondition { field, fragment }));
        } else {
            self.fields.push(FieldCondition { field, fragment });
        }
    }

    /// Appends a predicate to the `AND` group.
    pub fn push_and(&mut self, predicate: Predicate) {
        self.and.push(predicate);
    }

    /// Appends a predicate to the `OR` group. `OR` conditions are always
    /// additive and never merge into the top level.
    pub fn push_or(&mut self, predicate: Predicate) {
        self.or.push(predicate);
    }

    /// Renders the clause as a document filter object: top-level field keys
    /// plus `AND` / `OR` arrays when the groups are non-empty.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut object = Map::new();
        for condition in &self.fields {
            object.insert(condition.field.clone(), condition.fragment.to_json());
        }
        if !self.and.is_empty() {
            object.insert(
                "AND".to_owned(),
                Value::Array(self.and.iter().map(Predicate::to_json).collect()),
            );
        }
        if !self.or.is_empty() {
            object.insert(
                "OR".to_owned(),
                Value::Array(self.or.iter().map(Predicate::to_json).collect()),
            );
        }
        Value::Object(object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::WhereOperator;
    use crate::value::FilterValue;
    use serde_json::json;

    fn equals(value: i64) -> FilterFragment {
        WhereOperator::Eq.fragment(FilterValue::Int(value))
    }

    #[test]
    fn test_first_condition_lands_top_level() {
        let mut clause = WhereClause::new();
        clause.merge_and("score", equals(1));
        assert_eq!(clause.to_json(), json!({ "score": 1 }));
    }

    #[test]
    fn test_repeated_field_goes_to_and_group() {
        let mut clause = WhereClause::new();
        clause.merge_and("score", WhereOperator::Gte.fragment(FilterValue::Int(1)));
        clause.merge_and("score", WhereOperator::Lte.fragment(FilterValue::Int(9)));

        assert_eq!(
            clause.to_json(),
            json!({
                "score": { "gte": 1 },
                "AND": [{ "score": { "lte": 9 } }]
            }),
            "second condition on a field must not overwrite the first"
        );
    }

    #[test]
    fn test_or_is_always_additive() {
        let mut clause = WhereClause::new();
        clause.push_or(Predicate::Field(FieldCondition {
            field: "role".to_owned(),
            fragment: equals(1),
        }));
        clause.push_or(Predicate::Field(FieldCondition {
            field: "role".to_owned(),
            fragment: equals(2),
        }));

        assert_eq!(
            clause.to_json(),
            json!({ "OR": [{ "role": 1 }, { "role": 2 }] })
        );
    }

    #[test]
    fn test_nested_group_renders_recursively() {
        let mut inner = WhereClause::new();
        inner.push_or(Predicate::Field(FieldCondition {
            field: "name".to_owned(),
            fragment: WhereOperator::Contains.fragment(FilterValue::from("ann")),
        }));

        let mut clause = WhereClause::new();
        clause.merge_and("status", equals(1));
        clause.push_and(Predicate::Group(inner));

        assert_eq!(
            clause.to_json(),
            json!({
                "status": 1,
                "AND": [{ "OR": [{ "name": { "contains": "ann" } }] }]
            })
        );
    }

    #[test]
    fn test_empty_clause_renders_empty_object() {
        assert_eq!(WhereClause::new().to_json(), json!({}));
        assert!(WhereClause::new().is_empty());
    }
}
