//! A boundaries map shared between host event handlers
//!
//! Renderers fire some events synchronously from inside the call that caused
//! them: `addLayer` with a bad definition emits `error` before returning. The
//! handler for that event cannot reach the map while the outer handler still
//! holds it, so the event is queued and handled as soon as the outer one ends.

use crate::{
    core::map::BoundaryMap,
    input::MapEvent,
    traits::{ErrorSink, MapEngine},
};
use std::{cell::RefCell, collections::VecDeque, rc::Rc};

/// Shared handle to a [`BoundaryMap`] with a queue for re-entrant events
pub struct SharedMap<E: MapEngine, S: ErrorSink> {
    map: Rc<RefCell<BoundaryMap<E, S>>>,
    pending: Rc<RefCell<VecDeque<MapEvent>>>,
}

impl<E: MapEngine, S: ErrorSink> Clone for SharedMap<E, S> {
    fn clone(&self) -> Self {
        Self {
            map: Rc::clone(&self.map),
            pending: Rc::clone(&self.pending),
        }
    }
}

impl<E: MapEngine, S: ErrorSink> SharedMap<E, S> {
    pub fn new(map: BoundaryMap<E, S>) -> Self {
        Self {
            map: Rc::new(RefCell::new(map)),
            pending: Rc::new(RefCell::new(VecDeque::new())),
        }
    }

    /// Handle `event`, then everything queued meanwhile. When another event is
    /// being handled the event is queued instead and `false` is returned.
    pub fn dispatch(&self, event: MapEvent) -> bool {
        let Ok(mut map) = self.map.try_borrow_mut() else {
            log::debug!("map busy; deferring {} event", event.event_type());
            self.pending.borrow_mut().push_back(event);
            return false;
        };

        map.handle_event(&event);
        loop {
            let next = self.pending.borrow_mut().pop_front();
            match next {
                Some(queued) => map.handle_event(&queued),
                None => break,
            }
        }
        true
    }

    /// Events waiting for the map
    pub fn pending_events(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Read the map; `None` while an event is being handled
    pub fn with_map<R>(&self, f: impl FnOnce(&BoundaryMap<E, S>) -> R) -> Option<R> {
        self.map.try_borrow().ok().map(|map| f(&map))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::config::{AccessToken, BoundaryPreset, Granularity},
        engine::{FeatureId, HeadlessPlatform},
        input::FeatureHit,
        style::StyleLayer,
        ui::ErrorBanner,
    };

    fn shared() -> SharedMap<crate::engine::HeadlessEngine, ErrorBanner> {
        let platform =
            HeadlessPlatform::new().with_style_layers(vec![StyleLayer::text_label("place-label")]);
        let map = BoundaryMap::bootstrap(
            &platform,
            BoundaryPreset::NorthAmerica.resolve(),
            &AccessToken::new("pk.test").unwrap(),
            ErrorBanner::new(),
        )
        .unwrap();
        SharedMap::new(map)
    }

    #[test]
    fn test_dispatch_handles_immediately_when_idle() {
        let map = shared();
        assert!(map.dispatch(MapEvent::StyleLoaded));
        assert!(map.dispatch(MapEvent::pointer_move(
            "ca-provinces-hit",
            FeatureHit::Feature(FeatureId::Number(4)),
        )));

        let hovered = map.with_map(|m| m.hover().hovered(Granularity::Province).cloned());
        assert_eq!(hovered, Some(Some(FeatureId::Number(4))));
        assert_eq!(map.pending_events(), 0);
    }

    #[test]
    fn test_busy_map_queues_then_drains() {
        let map = shared();
        let handle = map.clone();

        let guard = map.map.borrow();
        assert!(!handle.dispatch(MapEvent::StyleLoaded));
        assert_eq!(handle.pending_events(), 1);
        drop(guard);

        assert!(handle.dispatch(MapEvent::pointer_leave("ca-provinces-hit")));
        assert_eq!(handle.pending_events(), 0);
        assert_eq!(handle.with_map(|m| m.is_loaded()), Some(true));
    }
}
