//! Browser entry point
//!
//! `start` builds the map on the page and wires the renderer's `load`,
//! `error`, `mousemove` and `mouseleave` events into a shared [`BoundaryMap`].
//! The page's event loop is single threaded, so the map lives in a
//! [`SharedMap`] owned by the registered handlers for the page's lifetime.
//! Events the renderer fires from inside one of our own calls are queued there.

use crate::{
    core::{
        builder::MapConfigBuilder,
        config::{AccessToken, BoundaryPreset},
        constants::ERROR_BANNER_ID,
        map::BoundaryMap,
        shared::SharedMap,
    },
    engine::{
        mapbox::{js_message, sys},
        FeatureId, MapboxEngine, MapboxPlatform,
    },
    input::{ErrorEvent, FeatureHit, MapEvent},
    traits::ErrorSink,
};
use log::{Level, LevelFilter, Log, Metadata, Record};
use wasm_bindgen::{prelude::*, JsCast};

type WebMap = SharedMap<MapboxEngine, DomBanner>;

/// Forwards `log` records to the browser console
struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Debug
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            Level::Error => web_sys::console::error_1(&line),
            Level::Warn => web_sys::console::warn_1(&line),
            Level::Info => web_sys::console::info_1(&line),
            Level::Debug | Level::Trace => web_sys::console::debug_1(&line),
        }
    }

    fn flush(&self) {}
}

fn init_logging() {
    // Already installed when `start` runs twice on one page.
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Debug);
    }
}

/// The page's `#err` element
#[derive(Debug, Default)]
pub struct DomBanner;

impl ErrorSink for DomBanner {
    fn show(&mut self, message: &str) {
        log::warn!("[Map error] {}", message);
        let element = web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.get_element_by_id(ERROR_BANNER_ID))
            .and_then(|element| element.dyn_into::<web_sys::HtmlElement>().ok());
        let Some(element) = element else {
            return;
        };
        element.set_text_content(Some(message));
        if let Err(err) = element.style().set_property("display", "block") {
            log::debug!("could not reveal the error banner: {}", js_message(&err));
        }
    }
}

/// Create the boundaries map in `container` (default `map`) using a named preset
/// (`north-america` by default, or `light`).
#[wasm_bindgen]
pub fn start(token: &str, container: Option<String>, preset: Option<String>) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    init_logging();

    let token = AccessToken::new(token).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let preset = match preset.as_deref() {
        None => BoundaryPreset::default(),
        Some(name) => BoundaryPreset::from_name(name)
            .ok_or_else(|| JsValue::from_str(&format!("unknown preset `{}`", name)))?,
    };
    let mut builder = MapConfigBuilder::from_preset(preset);
    if let Some(container) = container {
        builder = builder.with_container(container);
    }
    let config = builder
        .build()
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    let map = BoundaryMap::bootstrap(&MapboxPlatform, config, &token, DomBanner)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    let raw = map.engine().raw().clone();
    let map = SharedMap::new(map);

    let on_load = {
        let map = map.clone();
        let raw = raw.clone();
        Closure::<dyn FnMut()>::new(move || {
            map.dispatch(MapEvent::StyleLoaded);
            let hit_layers = map
                .with_map(|map| map.hover().hit_layers())
                .unwrap_or_default();
            for layer_id in hit_layers {
                register_hover_handlers(&raw, &map, layer_id);
            }
        })
    };
    raw.on("load", on_load.as_ref().unchecked_ref());
    on_load.forget();

    let on_error = {
        let map = map.clone();
        Closure::<dyn FnMut(JsValue)>::new(move |event: JsValue| {
            if let Some(error) = error_event(&event) {
                map.dispatch(MapEvent::Error(error));
            }
        })
    };
    raw.on("error", on_error.as_ref().unchecked_ref());
    on_error.forget();

    Ok(())
}

fn register_hover_handlers(raw: &sys::Map, map: &WebMap, layer_id: String) {
    let on_move = {
        let map = map.clone();
        let layer_id = layer_id.clone();
        Closure::<dyn FnMut(JsValue)>::new(move |event: JsValue| {
            map.dispatch(MapEvent::pointer_move(layer_id.clone(), feature_hit(&event)));
        })
    };
    raw.on_layer("mousemove", &layer_id, on_move.as_ref().unchecked_ref());
    on_move.forget();

    let on_leave = {
        let map = map.clone();
        let layer_id = layer_id.clone();
        Closure::<dyn FnMut(JsValue)>::new(move |_event: JsValue| {
            map.dispatch(MapEvent::pointer_leave(layer_id.clone()));
        })
    };
    raw.on_layer("mouseleave", &layer_id, on_leave.as_ref().unchecked_ref());
    on_leave.forget();
}

fn get(target: &JsValue, key: &str) -> JsValue {
    js_sys::Reflect::get(target, &JsValue::from_str(key)).unwrap_or(JsValue::UNDEFINED)
}

/// First entry of `event.features`
fn feature_hit(event: &JsValue) -> FeatureHit {
    let features = get(event, "features");
    let Some(features) = features.dyn_ref::<js_sys::Array>() else {
        return FeatureHit::None;
    };
    FeatureHit::first_of(features.iter().map(|feature| feature_id(&get(&feature, "id"))))
}

fn feature_id(id: &JsValue) -> Option<FeatureId> {
    match id.as_f64() {
        Some(number) => Some(FeatureId::from_number(number)),
        None => id.as_string().map(FeatureId::Text),
    }
}

fn error_event(event: &JsValue) -> Option<ErrorEvent> {
    let error = get(event, "error");
    if error.is_undefined() || error.is_null() {
        return None;
    }
    let message = js_message(&error);
    Some(match get(&error, "status").as_f64() {
        Some(status) => ErrorEvent::http(status as u16, message),
        None => ErrorEvent::new(message),
    })
}
