//! `mapboxgl` bindings for the browser
//!
//! Requires the Mapbox GL JS script to be loaded on the page, exposing the
//! global `mapboxgl` namespace.

use crate::{
    engine::{
        Cursor, EngineError, EngineResult, FeatureTarget, MapViewOptions, NavigationControl,
    },
    style::{LayerDefinition, SourceDefinition, StyleLayer},
    traits::{EnginePlatform, MapEngine},
};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use wasm_bindgen::{JsCast, JsValue};

pub(crate) mod sys {
    use wasm_bindgen::prelude::*;

    #[wasm_bindgen]
    extern "C" {
        #[wasm_bindgen(js_namespace = mapboxgl, js_name = supported)]
        pub fn supported() -> bool;

        #[wasm_bindgen(js_namespace = mapboxgl)]
        #[derive(Debug, Clone)]
        pub type Map;

        #[wasm_bindgen(constructor, catch, js_namespace = mapboxgl)]
        pub fn new(options: &JsValue) -> Result<Map, JsValue>;

        #[wasm_bindgen(method, catch, js_name = addSource)]
        pub fn add_source(this: &Map, id: &str, source: &JsValue) -> Result<(), JsValue>;

        #[wasm_bindgen(method, catch, js_name = addLayer)]
        pub fn add_layer(this: &Map, layer: &JsValue, before: Option<String>) -> Result<(), JsValue>;

        #[wasm_bindgen(method, js_name = getSource)]
        pub fn get_source(this: &Map, id: &str) -> JsValue;

        #[wasm_bindgen(method, js_name = getLayer)]
        pub fn get_layer(this: &Map, id: &str) -> JsValue;

        #[wasm_bindgen(method, js_name = getStyle)]
        pub fn get_style(this: &Map) -> JsValue;

        #[wasm_bindgen(method, catch, js_name = setFeatureState)]
        pub fn set_feature_state(this: &Map, target: &JsValue, state: &JsValue) -> Result<(), JsValue>;

        #[wasm_bindgen(method, js_name = getCanvas)]
        pub fn get_canvas(this: &Map) -> web_sys::HtmlElement;

        #[wasm_bindgen(method, js_name = addControl)]
        pub fn add_control(this: &Map, control: &NavigationControl, position: &str);

        #[wasm_bindgen(method)]
        pub fn on(this: &Map, event: &str, handler: &js_sys::Function);

        #[wasm_bindgen(method, js_name = on)]
        pub fn on_layer(this: &Map, event: &str, layer_id: &str, handler: &js_sys::Function);

        #[wasm_bindgen(js_namespace = mapboxgl)]
        pub type NavigationControl;

        #[wasm_bindgen(constructor, js_namespace = mapboxgl)]
        pub fn new(options: &JsValue) -> NavigationControl;
    }
}

/// Convert a JSON value to a JS object
pub(crate) fn to_js(value: &Value) -> EngineResult<JsValue> {
    js_sys::JSON::parse(&value.to_string()).map_err(js_error)
}

/// Readable message for a thrown JS value
pub(crate) fn js_message(err: &JsValue) -> String {
    err.dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.to_string()))
        .or_else(|| err.as_string())
        .unwrap_or_else(|| format!("{:?}", err))
}

fn js_error(err: JsValue) -> EngineError {
    EngineError::Rejected(js_message(&err))
}

/// `addSource`/`addLayer` report invalid definitions through an `error` event
/// and return normally, so success is confirmed by looking the item up.
fn confirm_added(found: JsValue, kind: &str, id: &str) -> EngineResult<()> {
    if found.is_undefined() || found.is_null() {
        Err(EngineError::Rejected(format!(
            "{} \"{}\" is not on the map after adding it",
            kind, id
        )))
    } else {
        Ok(())
    }
}

#[derive(Deserialize)]
struct StyleDocument {
    #[serde(default)]
    layers: Vec<StyleLayer>,
}

/// A live `mapboxgl.Map`
#[derive(Debug, Clone)]
pub struct MapboxEngine {
    map: sys::Map,
}

impl MapboxEngine {
    /// The underlying JS map, for registering event handlers
    pub(crate) fn raw(&self) -> &sys::Map {
        &self.map
    }
}

impl MapEngine for MapboxEngine {
    fn add_source(&mut self, source: &SourceDefinition) -> EngineResult<()> {
        self.map
            .add_source(&source.id, &to_js(&source.to_json())?)
            .map_err(js_error)?;
        confirm_added(self.map.get_source(&source.id), "source", &source.id)
    }

    fn add_layer(&mut self, layer: &LayerDefinition, before: Option<&str>) -> EngineResult<()> {
        self.map
            .add_layer(&to_js(&layer.to_json())?, before.map(str::to_string))
            .map_err(js_error)?;
        confirm_added(self.map.get_layer(&layer.id), "layer", &layer.id)
    }

    fn style_layers(&self) -> Vec<StyleLayer> {
        let style = self.map.get_style();
        let parsed = js_sys::JSON::stringify(&style)
            .ok()
            .map(String::from)
            .and_then(|json| serde_json::from_str::<StyleDocument>(&json).ok());
        match parsed {
            Some(document) => document.layers,
            None => {
                log::warn!("could not read the loaded style's layers");
                Vec::new()
            }
        }
    }

    fn set_feature_state(
        &mut self,
        target: &FeatureTarget,
        state: &Map<String, Value>,
    ) -> EngineResult<()> {
        let target = serde_json::to_value(target)
            .map_err(|e| EngineError::Rejected(e.to_string()))?;
        self.map
            .set_feature_state(&to_js(&target)?, &to_js(&Value::Object(state.clone()))?)
            .map_err(js_error)
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        let canvas = self.map.get_canvas();
        if let Err(err) = canvas.style().set_property("cursor", cursor.css_value()) {
            log::debug!("cursor update failed: {}", js_message(&err));
        }
    }

    fn add_navigation_control(&mut self, control: &NavigationControl) -> EngineResult<()> {
        let options = to_js(&json!({ "showCompass": control.show_compass }))?;
        let js_control = sys::NavigationControl::new(&options);
        self.map.add_control(&js_control, control.position.as_str());
        Ok(())
    }
}

/// Creates `mapboxgl.Map`s on the current page
#[derive(Debug, Clone, Copy, Default)]
pub struct MapboxPlatform;

impl EnginePlatform for MapboxPlatform {
    type Engine = MapboxEngine;

    fn is_supported(&self) -> bool {
        sys::supported()
    }

    fn create(&self, options: &MapViewOptions) -> EngineResult<MapboxEngine> {
        let namespace = js_sys::Reflect::get(&js_sys::global(), &JsValue::from_str("mapboxgl"))
            .map_err(js_error)?;
        js_sys::Reflect::set(
            &namespace,
            &JsValue::from_str("accessToken"),
            &JsValue::from_str(&options.access_token),
        )
        .map_err(js_error)?;

        let js_options = to_js(&json!({
            "container": options.container,
            "style": options.style_url,
            "bounds": options.bounds.to_lng_lat_pairs(),
            "antialias": options.antialias,
        }))?;
        let map = sys::Map::new(&js_options).map_err(js_error)?;
        Ok(MapboxEngine { map })
    }
}
