//! Mapbox GL (legacy syntax) layer filters.
//!
//! Filters are compiled once from JSON when the style sheet loads and then
//! evaluated per feature.

use crate::codec::{Feature, PropertyValue};
use serde_json::Value;
use std::borrow::Cow;
use std::cmp::Ordering;

/// Pseudo-property resolving to the feature's geometry kind.
const TYPE_KEY: &str = "$type";

/// Comparison operator of a [`Filter::Compare`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

/// A compiled filter expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    All(Vec<Filter>),
    Any(Vec<Filter>),
    None(Vec<Filter>),
    Compare {
        op: CompareOp,
        key: String,
        value: PropertyValue,
    },
    In {
        key: String,
        values: Vec<PropertyValue>,
        negate: bool,
    },
    Has {
        key: String,
        negate: bool,
    },
    /// Unknown operator or malformed expression; matches nothing.
    Never,
}

impl Filter {
    /// Compile a JSON filter expression.
    ///
    /// Anything that is not a well-formed expression compiles to
    /// [`Filter::Never`] instead of failing the whole style sheet.
    pub fn from_json(value: &Value) -> Self {
        let Some(items) = value.as_array() else {
            return Filter::Never;
        };
        let Some(op) = items.first().and_then(Value::as_str) else {
            return Filter::Never;
        };
        let args = &items[1..];

        match op {
            "all" => Filter::All(args.iter().map(Filter::from_json).collect()),
            "any" => Filter::Any(args.iter().map(Filter::from_json).collect()),
            "none" => Filter::None(args.iter().map(Filter::from_json).collect()),
            "==" => compare(CompareOp::Eq, args),
            "!=" => compare(CompareOp::Ne, args),
            "<" => compare(CompareOp::Lt, args),
            "<=" => compare(CompareOp::Le, args),
            ">" => compare(CompareOp::Gt, args),
            ">=" => compare(CompareOp::Ge, args),
            "in" | "!in" => match args.split_first() {
                Some((Value::String(key), rest)) => Filter::In {
                    key: key.clone(),
                    values: rest.iter().filter_map(scalar).collect(),
                    negate: op == "!in",
                },
                _ => Filter::Never,
            },
            "has" | "!has" => match args.first() {
                Some(Value::String(key)) => Filter::Has {
                    key: key.clone(),
                    negate: op == "!has",
                },
                _ => Filter::Never,
            },
            _ => Filter::Never,
        }
    }

    /// Evaluate the filter against a feature.
    pub fn matches(&self, feature: &Feature) -> bool {
        match self {
            Filter::All(filters) => filters.iter().all(|f| f.matches(feature)),
            Filter::Any(filters) => filters.iter().any(|f| f.matches(feature)),
            Filter::None(filters) => !filters.iter().any(|f| f.matches(feature)),
            Filter::Compare { op, key, value } => {
                let actual = lookup(feature, key);
                match op {
                    CompareOp::Eq => actual.as_deref() == Some(value),
                    CompareOp::Ne => actual.as_deref() != Some(value),
                    _ => {
                        let Some(ordering) = actual.and_then(|a| order(&a, value)) else {
                            return false;
                        };
                        match op {
                            CompareOp::Lt => ordering == Ordering::Less,
                            CompareOp::Le => ordering != Ordering::Greater,
                            CompareOp::Gt => ordering == Ordering::Greater,
                            _ => ordering != Ordering::Less,
                        }
                    }
                }
            }
            Filter::In {
                key,
                values,
                negate,
            } => {
                let found = lookup(feature, key).is_some_and(|actual| values.contains(&*actual));
                found != *negate
            }
            Filter::Has { key, negate } => {
                let present = key == TYPE_KEY || feature.properties.contains_key(key);
                present != *negate
            }
            Filter::Never => false,
        }
    }
}

fn compare(op: CompareOp, args: &[Value]) -> Filter {
    match args {
        [Value::String(key), value] => match scalar(value) {
            Some(value) => Filter::Compare {
                op,
                key: key.clone(),
                value,
            },
            None => Filter::Never,
        },
        _ => Filter::Never,
    }
}

fn scalar(value: &Value) -> Option<PropertyValue> {
    match value {
        Value::String(s) => Some(PropertyValue::String(s.clone())),
        Value::Number(n) => n.as_f64().map(PropertyValue::Number),
        Value::Bool(b) => Some(PropertyValue::Bool(*b)),
        _ => None,
    }
}

fn lookup<'a>(feature: &'a Feature, key: &str) -> Option<Cow<'a, PropertyValue>> {
    if key == TYPE_KEY {
        return Some(Cow::Owned(PropertyValue::String(
            feature.kind.as_str().to_string(),
        )));
    }
    feature.property(key).map(Cow::Borrowed)
}

/// Ordering between values of the same scalar type; mixed types do not order.
fn order(a: &PropertyValue, b: &PropertyValue) -> Option<Ordering> {
    match (a, b) {
        (PropertyValue::Number(a), PropertyValue::Number(b)) => a.partial_cmp(b),
        (PropertyValue::String(a), PropertyValue::String(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::FeatureKind;
    use serde_json::json;
    use std::collections::HashMap;

    fn feature(kind: FeatureKind, props: &[(&str, PropertyValue)]) -> Feature {
        Feature {
            id: None,
            kind,
            geometry: Vec::new(),
            properties: props
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect::<HashMap<_, _>>(),
        }
    }

    fn road() -> Feature {
        feature(
            FeatureKind::LineString,
            &[
                ("class", PropertyValue::String("motorway".into())),
                ("scalerank", PropertyValue::Number(3.0)),
            ],
        )
    }

    #[test]
    fn test_type_equality() {
        let filter = Filter::from_json(&json!(["==", "$type", "LineString"]));
        assert!(filter.matches(&road()));

        let filter = Filter::from_json(&json!(["==", "$type", "Polygon"]));
        assert!(!filter.matches(&road()));
    }

    #[test]
    fn test_not_equal_matches_missing_property() {
        let filter = Filter::from_json(&json!(["!=", "brunnel", "tunnel"]));
        assert!(filter.matches(&road()));
    }

    #[test]
    fn test_numeric_comparisons() {
        let f = road();
        assert!(Filter::from_json(&json!(["<", "scalerank", 4])).matches(&f));
        assert!(Filter::from_json(&json!(["<=", "scalerank", 3])).matches(&f));
        assert!(!Filter::from_json(&json!([">", "scalerank", 3])).matches(&f));
        assert!(Filter::from_json(&json!([">=", "scalerank", 3])).matches(&f));
        assert!(!Filter::from_json(&json!(["<", "missing", 3])).matches(&f));
    }

    #[test]
    fn test_mixed_type_comparison_never_matches() {
        let filter = Filter::from_json(&json!(["<", "class", 3]));
        assert!(!filter.matches(&road()));
    }

    #[test]
    fn test_in_and_not_in() {
        let f = road();
        assert!(Filter::from_json(&json!(["in", "class", "trunk", "motorway"])).matches(&f));
        assert!(!Filter::from_json(&json!(["!in", "class", "trunk", "motorway"])).matches(&f));
        assert!(Filter::from_json(&json!(["!in", "class", "path"])).matches(&f));
    }

    #[test]
    fn test_has_and_not_has() {
        let f = road();
        assert!(Filter::from_json(&json!(["has", "class"])).matches(&f));
        assert!(Filter::from_json(&json!(["!has", "name"])).matches(&f));
        assert!(Filter::from_json(&json!(["has", "$type"])).matches(&f));
    }

    #[test]
    fn test_combinators() {
        let f = road();
        let all = json!(["all", ["==", "$type", "LineString"], ["==", "class", "motorway"]]);
        assert!(Filter::from_json(&all).matches(&f));

        let any = json!(["any", ["==", "class", "path"], ["has", "scalerank"]]);
        assert!(Filter::from_json(&any).matches(&f));

        let none = json!(["none", ["==", "class", "path"], ["has", "name"]]);
        assert!(Filter::from_json(&none).matches(&f));

        assert!(Filter::from_json(&json!(["all"])).matches(&f));
        assert!(!Filter::from_json(&json!(["any"])).matches(&f));
    }

    #[test]
    fn test_unknown_operator_never_matches() {
        let f = road();
        assert_eq!(Filter::from_json(&json!(["within", {}])), Filter::Never);
        assert!(!Filter::from_json(&json!(["within", {}])).matches(&f));
        assert!(!Filter::from_json(&json!("class")).matches(&f));
        assert!(!Filter::from_json(&json!(["=="])).matches(&f));
    }
}
