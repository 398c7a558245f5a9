use crate::style::expression::{EvaluationContext, Expression};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Renderer layer types this crate creates or inspects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayerKind {
    Fill,
    Line,
    Symbol,
    #[serde(other)]
    Other,
}

impl std::fmt::Display for LayerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayerKind::Fill => write!(f, "fill"),
            LayerKind::Line => write!(f, "line"),
            LayerKind::Symbol => write!(f, "symbol"),
            LayerKind::Other => write!(f, "other"),
        }
    }
}

/// A layer to be added to the map
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerDefinition {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: LayerKind,
    pub source: String,
    #[serde(rename = "source-layer")]
    pub source_layer: String,
    pub filter: Expression,
    pub paint: BTreeMap<String, Expression>,
}

impl LayerDefinition {
    pub fn new(
        id: impl Into<String>,
        kind: LayerKind,
        source: impl Into<String>,
        source_layer: impl Into<String>,
        filter: Expression,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            source: source.into(),
            source_layer: source_layer.into(),
            filter,
            paint: BTreeMap::new(),
        }
    }

    /// Adds or replaces a paint property
    pub fn with_paint(mut self, property: &str, value: impl Into<Expression>) -> Self {
        self.paint.insert(property.to_string(), value.into());
        self
    }

    /// Whether the filter admits a feature with these properties
    pub fn accepts(&self, properties: &Map<String, Value>) -> bool {
        self.filter.matches(&EvaluationContext::new(properties))
    }

    /// Resolves a paint property for a feature, `None` if the layer does not set it
    pub fn paint_value(&self, property: &str, ctx: &EvaluationContext<'_>) -> Option<Value> {
        self.paint.get(property).map(|expr| expr.evaluate(ctx))
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// A layer already present in the loaded style, as reported by the renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleLayer {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: LayerKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<Map<String, Value>>,
}

impl StyleLayer {
    pub fn new(id: impl Into<String>, kind: LayerKind) -> Self {
        Self {
            id: id.into(),
            kind,
            layout: None,
        }
    }

    /// A symbol layer that draws text
    pub fn text_label(id: impl Into<String>) -> Self {
        let mut layout = Map::new();
        layout.insert("text-field".to_string(), Value::from(["get", "name"].to_vec()));
        Self {
            id: id.into(),
            kind: LayerKind::Symbol,
            layout: Some(layout),
        }
    }

    pub fn is_text_label(&self) -> bool {
        self.kind == LayerKind::Symbol
            && self
                .layout
                .as_ref()
                .is_some_and(|layout| layout.contains_key("text-field"))
    }
}

/// Id of the first text label layer, which new layers are inserted beneath
pub fn first_text_label(layers: &[StyleLayer]) -> Option<&str> {
    layers
        .iter()
        .find(|layer| layer.is_text_label())
        .map(|layer| layer.id.as_str())
}
