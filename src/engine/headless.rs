//! In-memory renderer used by the inspector app and the tests
//!
//! `HeadlessEngine` keeps the layer stack, sources and per-feature state the
//! way the browser renderer would, and records every call so callers can
//! assert on ordering.

use crate::{
    engine::{
        Cursor, EngineError, EngineResult, FeatureId, FeatureTarget, MapViewOptions,
        NavigationControl,
    },
    prelude::{HashMap, HashSet},
    style::{LayerDefinition, SourceDefinition, StyleLayer},
    traits::{EnginePlatform, MapEngine},
};
use serde_json::{Map, Value};
use std::cell::Cell;

/// One recorded renderer call
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    AddSource(String),
    AddLayer {
        id: String,
        before: Option<String>,
    },
    SetFeatureState {
        target: FeatureTarget,
        state: Map<String, Value>,
    },
    SetCursor(Cursor),
    AddControl(NavigationControl),
}

#[derive(Debug, Default)]
pub struct HeadlessEngine {
    options: Option<MapViewOptions>,
    style_layers: Vec<StyleLayer>,
    /// Every layer id, bottom to top, including the style's own
    stack: Vec<String>,
    sources: HashMap<String, SourceDefinition>,
    layers: HashMap<String, LayerDefinition>,
    feature_states: HashMap<FeatureTarget, Map<String, Value>>,
    cursor: Cursor,
    controls: Vec<NavigationControl>,
    calls: Vec<EngineCall>,
    rejected_sources: HashSet<String>,
    rejected_layers: HashSet<String>,
}

impl HeadlessEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine whose loaded style already contains `layers`
    pub fn with_style_layers(layers: Vec<StyleLayer>) -> Self {
        let stack = layers.iter().map(|layer| layer.id.clone()).collect();
        Self {
            style_layers: layers,
            stack,
            ..Self::default()
        }
    }

    /// Make `add_source` fail for this source id
    pub fn reject_source(&mut self, id: impl Into<String>) {
        self.rejected_sources.insert(id.into());
    }

    /// Make `add_layer` fail for this layer id
    pub fn reject_layer(&mut self, id: impl Into<String>) {
        self.rejected_layers.insert(id.into());
    }

    pub fn options(&self) -> Option<&MapViewOptions> {
        self.options.as_ref()
    }

    pub fn layer_order(&self) -> &[String] {
        &self.stack
    }

    pub fn layer(&self, id: &str) -> Option<&LayerDefinition> {
        self.layers.get(id)
    }

    pub fn source(&self, id: &str) -> Option<&SourceDefinition> {
        self.sources.get(id)
    }

    pub fn feature_state(&self, target: &FeatureTarget) -> Option<&Map<String, Value>> {
        self.feature_states.get(target)
    }

    /// Value of a boolean state flag, `None` if it was never set
    pub fn flag(&self, target: &FeatureTarget, key: &str) -> Option<bool> {
        self.feature_state(target)
            .and_then(|state| state.get(key))
            .and_then(Value::as_bool)
    }

    /// Features of a source layer whose `key` flag is currently true
    pub fn flagged(&self, source: &str, source_layer: &str, key: &str) -> Vec<FeatureId> {
        let mut ids: Vec<FeatureId> = self
            .feature_states
            .iter()
            .filter(|(target, state)| {
                target.source == source
                    && target.source_layer == source_layer
                    && state.get(key).and_then(Value::as_bool) == Some(true)
            })
            .map(|(target, _)| target.id.clone())
            .collect();
        ids.sort_by_key(|id| id.to_string());
        ids
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn controls(&self) -> &[NavigationControl] {
        &self.controls
    }

    pub fn calls(&self) -> &[EngineCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }
}

impl MapEngine for HeadlessEngine {
    fn add_source(&mut self, source: &SourceDefinition) -> EngineResult<()> {
        if self.rejected_sources.contains(&source.id) {
            return Err(EngineError::Rejected(format!(
                "source \"{}\" is not available",
                source.id
            )));
        }
        if self.sources.contains_key(&source.id) {
            return Err(EngineError::DuplicateSource(source.id.clone()));
        }

        self.sources.insert(source.id.clone(), source.clone());
        self.calls.push(EngineCall::AddSource(source.id.clone()));
        Ok(())
    }

    fn add_layer(&mut self, layer: &LayerDefinition, before: Option<&str>) -> EngineResult<()> {
        if self.rejected_layers.contains(&layer.id) {
            return Err(EngineError::Rejected(format!(
                "layer \"{}\" is not valid",
                layer.id
            )));
        }
        if self.stack.iter().any(|id| id == &layer.id) {
            return Err(EngineError::DuplicateLayer(layer.id.clone()));
        }
        if !self.sources.contains_key(&layer.source) {
            return Err(EngineError::UnknownSource(layer.source.clone()));
        }

        let insert_pos = match before {
            Some(before_id) => self
                .stack
                .iter()
                .position(|id| id == before_id)
                .ok_or_else(|| EngineError::UnknownLayer(before_id.to_string()))?,
            None => self.stack.len(),
        };

        self.stack.insert(insert_pos, layer.id.clone());
        self.layers.insert(layer.id.clone(), layer.clone());
        self.calls.push(EngineCall::AddLayer {
            id: layer.id.clone(),
            before: before.map(str::to_string),
        });
        Ok(())
    }

    fn style_layers(&self) -> Vec<StyleLayer> {
        self.style_layers.clone()
    }

    fn set_feature_state(
        &mut self,
        target: &FeatureTarget,
        state: &Map<String, Value>,
    ) -> EngineResult<()> {
        if !self.sources.contains_key(&target.source) {
            return Err(EngineError::UnknownSource(target.source.clone()));
        }

        let entry = self.feature_states.entry(target.clone()).or_default();
        for (key, value) in state {
            entry.insert(key.clone(), value.clone());
        }
        self.calls.push(EngineCall::SetFeatureState {
            target: target.clone(),
            state: state.clone(),
        });
        Ok(())
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        self.cursor = cursor;
        self.calls.push(EngineCall::SetCursor(cursor));
    }

    fn add_navigation_control(&mut self, control: &NavigationControl) -> EngineResult<()> {
        self.controls.push(control.clone());
        self.calls.push(EngineCall::AddControl(control.clone()));
        Ok(())
    }
}

/// Platform producing [`HeadlessEngine`]s, with a switchable capability check
#[derive(Debug)]
pub struct HeadlessPlatform {
    supported: bool,
    style_layers: Vec<StyleLayer>,
    created: Cell<usize>,
}

impl HeadlessPlatform {
    pub fn new() -> Self {
        Self {
            supported: true,
            style_layers: Vec::new(),
            created: Cell::new(0),
        }
    }

    /// Platform whose capability check fails
    pub fn unsupported() -> Self {
        Self {
            supported: false,
            ..Self::new()
        }
    }

    /// Layers every created engine reports as its loaded style
    pub fn with_style_layers(mut self, layers: Vec<StyleLayer>) -> Self {
        self.style_layers = layers;
        self
    }

    /// Number of map views constructed so far
    pub fn created(&self) -> usize {
        self.created.get()
    }
}

impl Default for HeadlessPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl EnginePlatform for HeadlessPlatform {
    type Engine = HeadlessEngine;

    fn is_supported(&self) -> bool {
        self.supported
    }

    fn create(&self, options: &MapViewOptions) -> EngineResult<HeadlessEngine> {
        let mut engine = HeadlessEngine::with_style_layers(self.style_layers.clone());
        engine.options = Some(options.clone());
        self.created.set(self.created.get() + 1);
        Ok(engine)
    }
}
