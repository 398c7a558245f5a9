//! Hover state synchronisation
//!
//! Each boundary granularity owns one [`HoverState`], which remembers the
//! single feature currently flagged as hovered. The states live in a
//! [`HoverRegistry`] that the map hands to the pointer handlers, so every
//! flag change goes through one place.

use crate::{
    core::{
        config::{BoundaryLayerConfig, Granularity},
        constants::HOVER_STATE_KEY,
    },
    engine::{Cursor, EngineResult, FeatureId, FeatureTarget},
    input::events::{FeatureHit, MapEvent},
    prelude::HashMap,
    traits::MapEngine,
};
use serde_json::{Map, Value};

/// What a pointer event did to a hover state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HoverTransition {
    /// Nothing was hovered; now `0` is
    Entered(FeatureId),
    /// Hover moved from one feature to another
    Switched { from: FeatureId, to: FeatureId },
    /// Pointer is still over the hovered feature
    Unchanged,
    /// Move event without a feature
    Ignored,
    /// Hover on `0` was cleared
    Left(FeatureId),
    /// Leave event with nothing hovered
    AlreadyIdle,
}

/// Hovered-feature holder for one granularity
#[derive(Debug, Clone)]
pub struct HoverState {
    granularity: Granularity,
    source: String,
    source_layer: String,
    current: Option<FeatureId>,
}

impl HoverState {
    pub fn new(boundary: &BoundaryLayerConfig) -> Self {
        Self {
            granularity: boundary.granularity,
            source: boundary.source_id.clone(),
            source_layer: boundary.source_layer.clone(),
            current: None,
        }
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// Currently hovered feature
    pub fn current(&self) -> Option<&FeatureId> {
        self.current.as_ref()
    }

    pub fn target(&self, id: FeatureId) -> FeatureTarget {
        FeatureTarget::new(&self.source, &self.source_layer, id)
    }

    /// Pointer moved over the hit layer
    pub fn on_move<E>(&mut self, engine: &mut E, hit: &FeatureHit) -> EngineResult<HoverTransition>
    where
        E: MapEngine + ?Sized,
    {
        let Some(id) = hit.id() else {
            return Ok(HoverTransition::Ignored);
        };

        if self.current.as_ref() == Some(id) {
            engine.set_cursor(Cursor::Pointer);
            return Ok(HoverTransition::Unchanged);
        }

        // Cleared before the unset call so a failed unset never leaves two ids recorded.
        let previous = self.current.take();
        if let Some(previous) = &previous {
            self.set_flag(engine, previous, false)?;
        }

        self.set_flag(engine, id, true)?;
        self.current = Some(id.clone());
        engine.set_cursor(Cursor::Pointer);

        Ok(match previous {
            Some(from) => HoverTransition::Switched {
                from,
                to: id.clone(),
            },
            None => HoverTransition::Entered(id.clone()),
        })
    }

    /// Pointer left the hit layer
    pub fn on_leave<E>(&mut self, engine: &mut E) -> EngineResult<HoverTransition>
    where
        E: MapEngine + ?Sized,
    {
        let result = match self.current.take() {
            Some(previous) => self
                .set_flag(engine, &previous, false)
                .map(|_| HoverTransition::Left(previous)),
            None => Ok(HoverTransition::AlreadyIdle),
        };
        engine.set_cursor(Cursor::Default);
        result
    }

    fn set_flag<E>(&self, engine: &mut E, id: &FeatureId, hovered: bool) -> EngineResult<()>
    where
        E: MapEngine + ?Sized,
    {
        let mut state = Map::new();
        state.insert(HOVER_STATE_KEY.to_string(), Value::Bool(hovered));
        engine.set_feature_state(&self.target(id.clone()), &state)
    }
}

/// Hover states of all granularities, addressed by hit layer
#[derive(Debug, Clone, Default)]
pub struct HoverRegistry {
    states: HashMap<Granularity, HoverState>,
    hit_layers: HashMap<String, Granularity>,
}

impl HoverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking hover for a boundary; pointer events on its hit layer are routed here
    pub fn register(&mut self, boundary: &BoundaryLayerConfig) {
        self.hit_layers
            .insert(boundary.hit_layer_id(), boundary.granularity);
        self.states
            .insert(boundary.granularity, HoverState::new(boundary));
    }

    pub fn state(&self, granularity: Granularity) -> Option<&HoverState> {
        self.states.get(&granularity)
    }

    /// Currently hovered feature of a granularity
    pub fn hovered(&self, granularity: Granularity) -> Option<&FeatureId> {
        self.state(granularity).and_then(HoverState::current)
    }

    pub fn granularity_for_layer(&self, layer_id: &str) -> Option<Granularity> {
        self.hit_layers.get(layer_id).copied()
    }

    /// Hit layer ids with registered handlers
    pub fn hit_layers(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.hit_layers.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Route a pointer event to the state owning its layer.
    /// Returns `Ok(None)` for events that are not pointer events on a registered hit layer.
    pub fn handle<E>(
        &mut self,
        engine: &mut E,
        event: &MapEvent,
    ) -> EngineResult<Option<(Granularity, HoverTransition)>>
    where
        E: MapEngine + ?Sized,
    {
        let (layer_id, hit) = match event {
            MapEvent::PointerMove { layer_id, hit } => (layer_id, Some(hit)),
            MapEvent::PointerLeave { layer_id } => (layer_id, None),
            _ => return Ok(None),
        };

        let Some(granularity) = self.granularity_for_layer(layer_id) else {
            return Ok(None);
        };
        let Some(state) = self.states.get_mut(&granularity) else {
            return Ok(None);
        };

        let transition = match hit {
            Some(hit) => state.on_move(engine, hit)?,
            None => state.on_leave(engine)?,
        };
        log::trace!("{} hover: {:?}", granularity, transition);
        Ok(Some((granularity, transition)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        engine::{EngineCall, HeadlessEngine},
        style::SourceDefinition,
    };

    fn engine_with(boundary: &BoundaryLayerConfig) -> HeadlessEngine {
        let mut engine = HeadlessEngine::new();
        engine
            .add_source(&SourceDefinition::vector(&boundary.source_id, &boundary.tileset_url))
            .unwrap();
        engine
    }

    fn hit(id: u64) -> FeatureHit {
        FeatureHit::Feature(FeatureId::Number(id))
    }

    #[test]
    fn test_enter_switch_leave() {
        let provinces = BoundaryLayerConfig::provinces("CA");
        let mut engine = engine_with(&provinces);
        let mut state = HoverState::new(&provinces);

        assert_eq!(
            state.on_move(&mut engine, &hit(1)).unwrap(),
            HoverTransition::Entered(FeatureId::Number(1))
        );
        assert_eq!(
            state.on_move(&mut engine, &hit(2)).unwrap(),
            HoverTransition::Switched {
                from: FeatureId::Number(1),
                to: FeatureId::Number(2)
            }
        );
        assert_eq!(state.current(), Some(&FeatureId::Number(2)));
        assert_eq!(engine.cursor(), Cursor::Pointer);

        assert_eq!(
            state.on_leave(&mut engine).unwrap(),
            HoverTransition::Left(FeatureId::Number(2))
        );
        assert_eq!(state.current(), None);
        assert_eq!(engine.cursor(), Cursor::Default);
        assert!(engine.flagged("adm1", "boundaries_admin_1", "hover").is_empty());
    }

    #[test]
    fn test_move_without_feature_changes_nothing() {
        let provinces = BoundaryLayerConfig::provinces("CA");
        let mut engine = engine_with(&provinces);
        let mut state = HoverState::new(&provinces);

        state.on_move(&mut engine, &hit(5)).unwrap();
        engine.clear_calls();

        assert_eq!(
            state.on_move(&mut engine, &FeatureHit::None).unwrap(),
            HoverTransition::Ignored
        );
        assert!(engine.calls().is_empty());
        assert_eq!(state.current(), Some(&FeatureId::Number(5)));
    }

    #[test]
    fn test_repeat_move_keeps_flag() {
        let provinces = BoundaryLayerConfig::provinces("CA");
        let mut engine = engine_with(&provinces);
        let mut state = HoverState::new(&provinces);

        state.on_move(&mut engine, &hit(5)).unwrap();
        engine.clear_calls();

        assert_eq!(
            state.on_move(&mut engine, &hit(5)).unwrap(),
            HoverTransition::Unchanged
        );
        assert_eq!(engine.calls(), [EngineCall::SetCursor(Cursor::Pointer)]);
    }

    #[test]
    fn test_failed_unset_still_clears_current() {
        let provinces = BoundaryLayerConfig::provinces("CA");
        let mut engine = engine_with(&provinces);
        let mut state = HoverState {
            current: Some(FeatureId::Number(9)),
            source: "gone".to_string(),
            ..HoverState::new(&provinces)
        };

        assert!(state.on_leave(&mut engine).is_err());
        assert_eq!(state.current(), None);
        assert_eq!(engine.cursor(), Cursor::Default);
    }

    #[test]
    fn test_failed_unset_during_switch_clears_current() {
        let provinces = BoundaryLayerConfig::provinces("CA");
        let mut engine = engine_with(&provinces);
        let mut state = HoverState {
            current: Some(FeatureId::Number(9)),
            source: "gone".to_string(),
            ..HoverState::new(&provinces)
        };

        assert!(state.on_move(&mut engine, &hit(10)).is_err());
        assert_eq!(state.current(), None);
        assert!(engine.calls().is_empty());

        state.source = provinces.source_id.clone();
        assert_eq!(
            state.on_move(&mut engine, &hit(10)).unwrap(),
            HoverTransition::Entered(FeatureId::Number(10))
        );
    }

    #[test]
    fn test_registry_routes_by_hit_layer() {
        let provinces = BoundaryLayerConfig::provinces("CA");
        let counties = BoundaryLayerConfig::counties("US");
        let mut engine = engine_with(&provinces);
        engine
            .add_source(&SourceDefinition::vector(&counties.source_id, &counties.tileset_url))
            .unwrap();

        let mut registry = HoverRegistry::new();
        registry.register(&provinces);
        registry.register(&counties);
        assert_eq!(registry.hit_layers(), ["ca-provinces-hit", "us-counties-hit"]);

        let routed = registry
            .handle(&mut engine, &MapEvent::pointer_move("us-counties-hit", hit(7)))
            .unwrap();
        assert_eq!(
            routed,
            Some((
                Granularity::County,
                HoverTransition::Entered(FeatureId::Number(7))
            ))
        );
        assert_eq!(registry.hovered(Granularity::Province), None);

        let ignored = registry
            .handle(&mut engine, &MapEvent::pointer_move("ca-provinces-hover-fill", hit(1)))
            .unwrap();
        assert_eq!(ignored, None);
        assert_eq!(registry.handle(&mut engine, &MapEvent::StyleLoaded).unwrap(), None);
    }
}
