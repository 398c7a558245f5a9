use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A remote vector tile source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceDefinition {
    /// Source id; passed alongside the JSON rather than inside it
    #[serde(skip)]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
    /// Feature property promoted to the feature id
    #[serde(rename = "promoteId", skip_serializing_if = "Option::is_none")]
    pub promote_id: Option<String>,
}

impl SourceDefinition {
    pub fn vector(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: "vector".to_string(),
            url: url.into(),
            promote_id: None,
        }
    }

    pub fn with_promote_id(mut self, field: impl Into<String>) -> Self {
        self.promote_id = Some(field.into());
        self
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
