//! Shared trait abstractions at the renderer boundary
//!
//! Everything the crate asks of the map renderer goes through [`MapEngine`],
//! so the same configuration and hover logic drives the browser renderer
//! and the in-memory [`HeadlessEngine`](crate::engine::HeadlessEngine).

use crate::{
    engine::{Cursor, EngineResult, FeatureTarget, MapViewOptions, NavigationControl},
    style::{LayerDefinition, SourceDefinition, StyleLayer},
};
use serde_json::{Map, Value};

/// Imperative API of a running map view
pub trait MapEngine {
    /// Register a data source under `source.id`
    fn add_source(&mut self, source: &SourceDefinition) -> EngineResult<()>;

    /// Add a layer, below `before` when given, otherwise on top of the stack
    fn add_layer(&mut self, layer: &LayerDefinition, before: Option<&str>) -> EngineResult<()>;

    /// Layers of the loaded style, bottom to top
    fn style_layers(&self) -> Vec<StyleLayer>;

    /// Merge `state` into the ephemeral state of one feature
    fn set_feature_state(
        &mut self,
        target: &FeatureTarget,
        state: &Map<String, Value>,
    ) -> EngineResult<()>;

    /// Change the pointer cursor over the map canvas
    fn set_cursor(&mut self, cursor: Cursor);

    /// Attach a navigation (zoom) control
    fn add_navigation_control(&mut self, control: &NavigationControl) -> EngineResult<()>;
}

/// Creates map views, after checking the host can render them
pub trait EnginePlatform {
    type Engine: MapEngine;

    /// Whether the required graphics capability is available
    fn is_supported(&self) -> bool;

    /// Construct a map view
    fn create(&self, options: &MapViewOptions) -> EngineResult<Self::Engine>;
}

/// Destination for user-visible error messages
pub trait ErrorSink {
    /// Display a message to the user
    fn show(&mut self, message: &str);
}

impl<T: ErrorSink + ?Sized> ErrorSink for &mut T {
    fn show(&mut self, message: &str) {
        (**self).show(message)
    }
}
