use crate::engine::FeatureId;
use serde::{Deserialize, Serialize};

/// Events delivered by the renderer to a running map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum MapEvent {
    /// The style and its layers finished loading
    StyleLoaded,
    /// Pointer moved over a layer
    PointerMove { layer_id: String, hit: FeatureHit },
    /// Pointer left a layer
    PointerLeave { layer_id: String },
    /// Asynchronous style, tile or source failure
    Error(ErrorEvent),
}

impl MapEvent {
    pub fn pointer_move(layer_id: impl Into<String>, hit: FeatureHit) -> Self {
        MapEvent::PointerMove {
            layer_id: layer_id.into(),
            hit,
        }
    }

    pub fn pointer_leave(layer_id: impl Into<String>) -> Self {
        MapEvent::PointerLeave {
            layer_id: layer_id.into(),
        }
    }

    /// Name of the renderer event this corresponds to
    pub fn event_type(&self) -> &'static str {
        match self {
            MapEvent::StyleLoaded => "load",
            MapEvent::PointerMove { .. } => "mousemove",
            MapEvent::PointerLeave { .. } => "mouseleave",
            MapEvent::Error(_) => "error",
        }
    }
}

/// Topmost feature under the pointer, if any
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeatureHit {
    #[default]
    None,
    Feature(FeatureId),
}

impl FeatureHit {
    /// First of the picked features; features without an id count as no hit
    pub fn first_of<I>(ids: I) -> Self
    where
        I: IntoIterator<Item = Option<FeatureId>>,
    {
        match ids.into_iter().next() {
            Some(Some(id)) => FeatureHit::Feature(id),
            _ => FeatureHit::None,
        }
    }

    pub fn id(&self) -> Option<&FeatureId> {
        match self {
            FeatureHit::Feature(id) => Some(id),
            FeatureHit::None => None,
        }
    }
}

impl From<FeatureId> for FeatureHit {
    fn from(id: FeatureId) -> Self {
        FeatureHit::Feature(id)
    }
}

/// Error reported by the renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEvent {
    pub message: String,
    /// HTTP status of the failed request, when the failure came from a fetch
    #[serde(default)]
    pub status: Option<u16>,
}

impl ErrorEvent {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
        }
    }

    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: Some(status),
        }
    }

    /// 401/403 responses, or messages the renderer words that way
    pub fn is_authorization_failure(&self) -> bool {
        matches!(self.status, Some(401 | 403))
            || ["Unauthorized", "401", "403"]
                .iter()
                .any(|needle| self.message.contains(needle))
    }
}
