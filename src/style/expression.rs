//! Typed subset of the renderer's style expression language
//!
//! Expressions serialize to the renderer's JSON array form (`["==", ["get", "x"], "CA"]`)
//! and can be evaluated locally against a feature's properties and feature state,
//! which is how filters and hover paint rules are checked without a renderer.

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// A style expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Constant value; arrays and objects are wrapped in `["literal", ...]` on output
    Literal(Value),
    /// `["get", property]`
    Get(String),
    /// `["feature-state", key]`
    FeatureState(String),
    /// `["boolean", value, fallback]`
    Boolean(Box<Expression>, Box<Expression>),
    /// `["==", a, b]`
    Eq(Box<Expression>, Box<Expression>),
    /// `["in", needle, haystack]`
    In(Box<Expression>, Box<Expression>),
    /// `["any", ...]`
    Any(Vec<Expression>),
    /// `["all", ...]`
    All(Vec<Expression>),
    /// `["case", cond, out, ..., fallback]`
    Case {
        branches: Vec<(Expression, Expression)>,
        fallback: Box<Expression>,
    },
}

impl Expression {
    pub fn literal(value: impl Into<Value>) -> Self {
        Self::Literal(value.into())
    }

    pub fn get(property: impl Into<String>) -> Self {
        Self::Get(property.into())
    }

    pub fn feature_state(key: impl Into<String>) -> Self {
        Self::FeatureState(key.into())
    }

    pub fn boolean(value: Expression, fallback: bool) -> Self {
        Self::Boolean(Box::new(value), Box::new(Self::literal(fallback)))
    }

    pub fn eq(left: Expression, right: Expression) -> Self {
        Self::Eq(Box::new(left), Box::new(right))
    }

    pub fn contains(needle: Expression, haystack: Expression) -> Self {
        Self::In(Box::new(needle), Box::new(haystack))
    }

    pub fn any(items: Vec<Expression>) -> Self {
        Self::Any(items)
    }

    pub fn all(items: Vec<Expression>) -> Self {
        Self::All(items)
    }

    /// Two-way `case`: `when_true` if `condition` holds, `otherwise` else
    pub fn when(condition: Expression, when_true: Expression, otherwise: Expression) -> Self {
        Self::Case {
            branches: vec![(condition, when_true)],
            fallback: Box::new(otherwise),
        }
    }

    /// Converts to the renderer's JSON representation
    pub fn to_json(&self) -> Value {
        match self {
            Self::Literal(value @ (Value::Array(_) | Value::Object(_))) => {
                Value::Array(vec![Value::from("literal"), value.clone()])
            }
            Self::Literal(value) => value.clone(),
            Self::Get(property) => op("get", [Value::from(property.as_str())]),
            Self::FeatureState(key) => op("feature-state", [Value::from(key.as_str())]),
            Self::Boolean(value, fallback) => op("boolean", [value.to_json(), fallback.to_json()]),
            Self::Eq(left, right) => op("==", [left.to_json(), right.to_json()]),
            Self::In(needle, haystack) => op("in", [needle.to_json(), haystack.to_json()]),
            Self::Any(items) => op("any", items.iter().map(Expression::to_json)),
            Self::All(items) => op("all", items.iter().map(Expression::to_json)),
            Self::Case { branches, fallback } => op(
                "case",
                branches
                    .iter()
                    .flat_map(|(condition, output)| [condition.to_json(), output.to_json()])
                    .chain(std::iter::once(fallback.to_json())),
            ),
        }
    }

    /// Evaluates the expression for a single feature
    pub fn evaluate(&self, ctx: &EvaluationContext<'_>) -> Value {
        match self {
            Self::Literal(value) => value.clone(),
            Self::Get(property) => ctx.property(property),
            Self::FeatureState(key) => ctx.state(key),
            Self::Boolean(value, fallback) => match value.evaluate(ctx) {
                Value::Bool(b) => Value::Bool(b),
                _ => match fallback.evaluate(ctx) {
                    Value::Bool(b) => Value::Bool(b),
                    _ => Value::Null,
                },
            },
            Self::Eq(left, right) => {
                Value::Bool(values_equal(&left.evaluate(ctx), &right.evaluate(ctx)))
            }
            Self::In(needle, haystack) => {
                Value::Bool(value_in(&needle.evaluate(ctx), &haystack.evaluate(ctx)))
            }
            Self::Any(items) => Value::Bool(items.iter().any(|item| item.matches(ctx))),
            Self::All(items) => Value::Bool(items.iter().all(|item| item.matches(ctx))),
            Self::Case { branches, fallback } => branches
                .iter()
                .find(|(condition, _)| condition.matches(ctx))
                .map(|(_, output)| output.evaluate(ctx))
                .unwrap_or_else(|| fallback.evaluate(ctx)),
        }
    }

    /// True when the expression evaluates to boolean `true`
    pub fn matches(&self, ctx: &EvaluationContext<'_>) -> bool {
        matches!(self.evaluate(ctx), Value::Bool(true))
    }
}

impl Serialize for Expression {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl From<f64> for Expression {
    fn from(value: f64) -> Self {
        Self::literal(value)
    }
}

impl From<&str> for Expression {
    fn from(value: &str) -> Self {
        Self::literal(value)
    }
}

fn op(name: &str, args: impl IntoIterator<Item = Value>) -> Value {
    Value::Array(
        std::iter::once(Value::from(name))
            .chain(args)
            .collect::<Vec<_>>(),
    )
}

fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        _ => left == right,
    }
}

/// String haystacks match by substring, arrays by element
fn value_in(needle: &Value, haystack: &Value) -> bool {
    match haystack {
        Value::String(text) => needle.as_str().is_some_and(|n| text.contains(n)),
        Value::Array(items) => items.iter().any(|item| values_equal(item, needle)),
        _ => false,
    }
}

/// Feature properties and feature state visible to an expression
#[derive(Debug, Clone, Copy)]
pub struct EvaluationContext<'a> {
    properties: &'a Map<String, Value>,
    state: Option<&'a Map<String, Value>>,
}

impl<'a> EvaluationContext<'a> {
    pub fn new(properties: &'a Map<String, Value>) -> Self {
        Self {
            properties,
            state: None,
        }
    }

    pub fn with_state(mut self, state: &'a Map<String, Value>) -> Self {
        self.state = Some(state);
        self
    }

    fn property(&self, name: &str) -> Value {
        self.properties.get(name).cloned().unwrap_or(Value::Null)
    }

    fn state(&self, key: &str) -> Value {
        self.state
            .and_then(|state| state.get(key))
            .cloned()
            .unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn props(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    #[test]
    fn test_json_shape() {
        let expr = Expression::all(vec![
            Expression::eq(Expression::get("iso_3166_1"), "CA".into()),
            Expression::contains("US".into(), Expression::get("worldview")),
        ]);
        assert_eq!(
            expr.to_json(),
            json!(["all", ["==", ["get", "iso_3166_1"], "CA"], ["in", "US", ["get", "worldview"]]])
        );
    }

    #[test]
    fn test_array_literal_is_wrapped() {
        let expr = Expression::literal(json!(["US", "CA"]));
        assert_eq!(expr.to_json(), json!(["literal", ["US", "CA"]]));
    }

    #[test]
    fn test_case_serialization() {
        let expr = Expression::when(
            Expression::boolean(Expression::feature_state("hover"), false),
            Expression::literal(0.15),
            Expression::literal(0.0),
        );
        assert_eq!(
            expr.to_json(),
            json!(["case", ["boolean", ["feature-state", "hover"], false], 0.15, 0.0])
        );
    }

    #[test]
    fn test_in_matches_substring_and_array() {
        let p = props(json!({ "worldview": "US,CN", "codes": ["US", "JP"] }));
        let ctx = EvaluationContext::new(&p);
        assert!(Expression::contains("US".into(), Expression::get("worldview")).matches(&ctx));
        assert!(Expression::contains("JP".into(), Expression::get("codes")).matches(&ctx));
        assert!(!Expression::contains("IN".into(), Expression::get("worldview")).matches(&ctx));
        assert!(!Expression::contains("US".into(), Expression::get("missing")).matches(&ctx));
    }

    #[test]
    fn test_case_follows_feature_state() {
        let expr = Expression::when(
            Expression::boolean(Expression::feature_state("hover"), false),
            Expression::literal(3.0),
            Expression::literal(0.0),
        );
        let p = Map::new();
        let hovered = props(json!({ "hover": true }));
        let unhovered = props(json!({ "hover": false }));

        assert_eq!(expr.evaluate(&EvaluationContext::new(&p)), json!(0.0));
        assert_eq!(
            expr.evaluate(&EvaluationContext::new(&p).with_state(&hovered)),
            json!(3.0)
        );
        assert_eq!(
            expr.evaluate(&EvaluationContext::new(&p).with_state(&unhovered)),
            json!(0.0)
        );
    }

    #[test]
    fn test_numeric_equality_ignores_representation() {
        let p = props(json!({ "n": 3 }));
        let ctx = EvaluationContext::new(&p);
        assert!(Expression::eq(Expression::get("n"), Expression::literal(3.0)).matches(&ctx));
    }
}
