//! Operator tokens and their translation into filter fragments.
//!
//! [`WhereOperator`] is the closed vocabulary of comparisons the builder
//! understands. [`WhereOperator::fragment`] turns an operator plus a value
//! into the [`FilterFragment`] that a field condition carries; the JSON
//! rendering of each fragment follows the document-filter convention
//! (`gt`/`gte`/`lt`/`lte`/`contains`/`startsWith`/`endsWith`/`in`/`notIn`,
//! with equality rendered bare and ranges as a `gte`+`lte` pair).

use crate::value::FilterValue;
use serde_json::{Map, Value, json};

/// Comparison operator for a single field condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhereOperator {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    Like,
    Contains,
    StartsWith,
    EndsWith,
    In,
    NotIn,
    Between,
}

impl WhereOperator {
    /// Parses an operator token. Matching is case-insensitive and total:
    /// unrecognised tokens (for example `not like`) fall back to equality.
    #[must_use]
    pub fn parse(token: &str) -> Self {
        match token.trim().to_ascii_lowercase().as_str() {
            "!=" => Self::Ne,
            ">" => Self::Gt,
            ">=" => Self::Gte,
            "<" => Self::Lt,
            "<=" => Self::Lte,
            "like" => Self::Like,
            "contains" => Self::Contains,
            "startswith" => Self::StartsWith,
            "endswith" => Self::EndsWith,
            "in" => Self::In,
            "not in" => Self::NotIn,
            "between" => Self::Between,
            _ => Self::Eq,
        }
    }

    /// Builds the filter fragment for this operator over `value`.
    ///
    /// `in` / `not in` coerce scalars into single-element lists. `between`
    /// reads its bounds from the first two list elements; a single element
    /// (or a scalar) is used for both bounds and an empty list produces an
    /// unbounded range.
    #[must_use]
    pub fn fragment(self, value: FilterValue) -> FilterFragment {
        match self {
            Self::Eq => FilterFragment::Equals(value),
            Self::Ne => FilterFragment::Not(value),
            Self::Gt => FilterFragment::Gt(value),
            Self::Gte => FilterFragment::Gte(value),
            Self::Lt => FilterFragment::Lt(value),
            Self::Lte => FilterFragment::Lte(value),
            Self::Like | Self::Contains => FilterFragment::Contains(value),
            Self::StartsWith => FilterFragment::StartsWith(value),
            Self::EndsWith => FilterFragment::EndsWith(value),
            Self::In => FilterFragment::In(value.into_list()),
            Self::NotIn => FilterFragment::NotIn(value.into_list()),
            Self::Between => {
                let mut bounds = value.into_list().into_iter();
                let low = bounds.next();
                let high = bounds.next().or_else(|| low.clone());
                FilterFragment::Range { gte: low, lte: high }
            }
        }
    }
}

/// The translated comparison a field condition carries.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterFragment {
    Equals(FilterValue),
    Not(FilterValue),
    Gt(FilterValue),
    Gte(FilterValue),
    Lt(FilterValue),
    Lte(FilterValue),
    Contains(FilterValue),
    StartsWith(FilterValue),
    EndsWith(FilterValue),
    In(Vec<FilterValue>),
    NotIn(Vec<FilterValue>),
    Range {
        gte: Option<FilterValue>,
        lte: Option<FilterValue>,
    },
}

impl FilterFragment {
    /// Renders the fragment as it appears under its field key. Equality is
    /// bare (`"field": value`); every other fragment is a keyed object.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Equals(value) => value.to_json(),
            Self::Not(value) => json!({ "not": value.to_json() }),
            Self::Gt(value) => json!({ "gt": value.to_json() }),
            Self::Gte(value) => json!({ "gte": value.to_json() }),
            Self::Lt(value) => json!({ "lt": value.to_json() }),
            Self::Lte(value) => json!({ "lte": value.to_json() }),
            Self::Contains(value) => json!({ "contains": value.to_json() }),
            Self::StartsWith(value) => json!({ "startsWith": value.to_json() }),
            Self::EndsWith(value) => json!({ "endsWith": value.to_json() }),
            Self::In(values) => {
                json!({ "in": values.iter().map(FilterValue::to_json).collect::<Vec<_>>() })
            }
            Self::NotIn(values) => {
                json!({ "notIn": values.iter().map(FilterValue::to_json).collect::<Vec<_>>() })
            }
            Self::Range { gte, lte } => {
                let mut range = Map::new();
                if let Some(low) = gte {
                    range.insert("gte".to_owned(), low.to_json());
                }
                if let Some(high) = lte {
                    range.insert("lte".to_owned(), high.to_json());
                }
                Value::Object(range)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(WhereOperator::parse("STARTSWITH"), WhereOperator::StartsWith);
        assert_eq!(WhereOperator::parse(" NOT IN "), WhereOperator::NotIn);
        assert_eq!(WhereOperator::parse("Between"), WhereOperator::Between);
    }

    #[test]
    fn test_parse_falls_back_to_equality() {
        assert_eq!(WhereOperator::parse("not like"), WhereOperator::Eq);
        assert_eq!(WhereOperator::parse("~"), WhereOperator::Eq);
        assert_eq!(WhereOperator::parse(""), WhereOperator::Eq);
    }

    #[test]
    fn test_fragment_json_shapes() {
        let cases = [
            (WhereOperator::Eq, json!("x")),
            (WhereOperator::Ne, json!({ "not": "x" })),
            (WhereOperator::Gt, json!({ "gt": "x" })),
            (WhereOperator::Gte, json!({ "gte": "x" })),
            (WhereOperator::Lt, json!({ "lt": "x" })),
            (WhereOperator::Lte, json!({ "lte": "x" })),
            (WhereOperator::Like, json!({ "contains": "x" })),
            (WhereOperator::Contains, json!({ "contains": "x" })),
            (WhereOperator::StartsWith, json!({ "startsWith": "x" })),
            (WhereOperator::EndsWith, json!({ "endsWith": "x" })),
            (WhereOperator::In, json!({ "in": ["x"] })),
            (WhereOperator::NotIn, json!({ "notIn": ["x"] })),
        ];

        for (operator, expected) in cases {
            assert_eq!(
                operator.fragment(FilterValue::from("x")).to_json(),
                expected,
                "unexpected rendering for {operator:?}"
            );
        }
    }

    #[test]
    fn test_between_reads_both_bounds() {
        let fragment = WhereOperator::Between.fragment(FilterValue::from(vec![1, 10]));
        assert_eq!(fragment.to_json(), json!({ "gte": 1, "lte": 10 }));
    }

    #[test]
    fn test_between_normalises_degenerate_input() {
        let scalar = WhereOperator::Between.fragment(FilterValue::from(5));
        assert_eq!(
            scalar.to_json(),
            json!({ "gte": 5, "lte": 5 }),
            "scalar bounds collapse to an exact range"
        );

        let empty = WhereOperator::Between.fragment(FilterValue::List(vec![]));
        assert_eq!(empty.to_json(), json!({}), "no bounds leaves the range open");
    }
}
