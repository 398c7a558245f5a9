//! Types exchanged with the map renderer and the engines that implement it

pub mod headless;
#[cfg(feature = "wasm")]
pub mod mapbox;

pub use headless::{EngineCall, HeadlessEngine, HeadlessPlatform};
#[cfg(feature = "wasm")]
pub use mapbox::{MapboxEngine, MapboxPlatform};

use crate::core::geo::LatLngBounds;
use serde::{Deserialize, Serialize};

/// Errors raised by renderer calls
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("There is already a source with ID \"{0}\"")]
    DuplicateSource(String),

    #[error("Layer with id \"{0}\" already exists on this map")]
    DuplicateLayer(String),

    #[error("Source \"{0}\" not found")]
    UnknownSource(String),

    #[error("Layer with id \"{0}\" does not exist on this map")]
    UnknownLayer(String),

    #[error("Renderer rejected the call: {0}")]
    Rejected(String),
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;

/// Feature identifier as promoted by a source; tiles may carry numbers or strings
///
/// Numeric ids stay numeric so feature-state calls address the same feature the
/// renderer reported.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureId {
    Number(u64),
    Signed(i64),
    Float(f64),
    Text(String),
}

impl FeatureId {
    /// Id from a JS number, choosing the narrowest variant that holds it exactly
    pub fn from_number(n: f64) -> Self {
        if n.fract() == 0.0 && n >= 0.0 && n <= u64::MAX as f64 {
            FeatureId::Number(n as u64)
        } else if n.fract() == 0.0 && n >= i64::MIN as f64 && n < 0.0 {
            FeatureId::Signed(n as i64)
        } else {
            FeatureId::Float(n)
        }
    }
}

impl PartialEq for FeatureId {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FeatureId::Number(a), FeatureId::Number(b)) => a == b,
            (FeatureId::Signed(a), FeatureId::Signed(b)) => a == b,
            (FeatureId::Float(a), FeatureId::Float(b)) => a.to_bits() == b.to_bits(),
            (FeatureId::Text(a), FeatureId::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for FeatureId {}

impl std::hash::Hash for FeatureId {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            FeatureId::Number(n) => n.hash(state),
            FeatureId::Signed(n) => n.hash(state),
            FeatureId::Float(n) => n.to_bits().hash(state),
            FeatureId::Text(s) => s.hash(state),
        }
    }
}

impl std::fmt::Display for FeatureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeatureId::Number(n) => write!(f, "{}", n),
            FeatureId::Signed(n) => write!(f, "{}", n),
            FeatureId::Float(n) => write!(f, "{}", n),
            FeatureId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<u64> for FeatureId {
    fn from(id: u64) -> Self {
        FeatureId::Number(id)
    }
}

impl From<&str> for FeatureId {
    fn from(id: &str) -> Self {
        FeatureId::Text(id.to_string())
    }
}

/// Address of one feature's ephemeral state
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeatureTarget {
    pub source: String,
    #[serde(rename = "sourceLayer")]
    pub source_layer: String,
    pub id: FeatureId,
}

impl FeatureTarget {
    pub fn new(source: impl Into<String>, source_layer: impl Into<String>, id: FeatureId) -> Self {
        Self {
            source: source.into(),
            source_layer: source_layer.into(),
            id,
        }
    }
}

/// Pointer cursor over the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Default,
    Pointer,
}

impl Cursor {
    /// Value for the canvas `style.cursor` property
    pub fn css_value(&self) -> &'static str {
        match self {
            Cursor::Default => "",
            Cursor::Pointer => "pointer",
        }
    }
}

/// Corner a control is docked to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ControlPosition {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl ControlPosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlPosition::TopLeft => "top-left",
            ControlPosition::TopRight => "top-right",
            ControlPosition::BottomLeft => "bottom-left",
            ControlPosition::BottomRight => "bottom-right",
        }
    }
}

/// Zoom buttons, optionally with a compass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationControl {
    pub show_compass: bool,
    pub position: ControlPosition,
}

impl Default for NavigationControl {
    fn default() -> Self {
        Self {
            show_compass: false,
            position: ControlPosition::TopRight,
        }
    }
}

/// Everything needed to construct a map view
#[derive(Debug, Clone, PartialEq)]
pub struct MapViewOptions {
    pub container: String,
    pub style_url: String,
    pub bounds: LatLngBounds,
    pub antialias: bool,
    pub access_token: String,
}
