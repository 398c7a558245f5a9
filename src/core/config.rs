//! Map configuration and presets
//!
//! A [`MapConfig`] describes one boundaries map completely: style, initial
//! extent, worldview and the boundary granularities to highlight. Presets
//! resolve to a full config the same way a custom one would be written by hand.

use crate::{
    core::{
        constants::{
            ADM1_SOURCE_LAYER, ADM1_TILESET_URL, ADM2_SOURCE_LAYER, ADM2_TILESET_URL,
            COUNTRY_PROPERTY, DEFAULT_CONTAINER_ID, DEFAULT_STYLE_URL, HIGHLIGHT_COLOR,
            HIT_FILL_COLOR, HOVER_STATE_KEY, LIGHT_STYLE_URL, NORTH_AMERICA_EXTENT,
            PROMOTE_ID_FIELD, PUBLIC_TOKEN_PREFIX, WORLDVIEW_PROPERTY,
        },
        geo::LatLngBounds,
    },
    engine::{MapViewOptions, NavigationControl},
    prelude::HashSet,
    style::{Expression, LayerDefinition, LayerKind, SourceDefinition},
    MapError, Result,
};
use serde::{Deserialize, Serialize};

/// Administrative level a boundary source covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    /// Provinces and states (admin level 1)
    Province,
    /// Counties (admin level 2)
    County,
}

impl Granularity {
    pub const ALL: [Granularity; 2] = [Granularity::Province, Granularity::County];

    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Province => "province",
            Granularity::County => "county",
        }
    }
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Paint values of the visible hover layers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighlightStyle {
    pub color: String,
    /// Fill opacity of the hovered feature
    pub fill_opacity: f64,
    /// Outline width of the hovered feature, in pixels
    pub line_width: f64,
}

impl HighlightStyle {
    pub fn new(fill_opacity: f64, line_width: f64) -> Self {
        Self {
            color: HIGHLIGHT_COLOR.to_string(),
            fill_opacity,
            line_width,
        }
    }
}

/// One highlighted boundary source and its three layers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryLayerConfig {
    pub granularity: Granularity,
    pub source_id: String,
    pub tileset_url: String,
    pub source_layer: String,
    pub promote_id: String,
    /// ISO 3166-1 alpha-2 code of the country whose features are shown
    pub country: String,
    /// Prefix of the layer ids, e.g. `ca-provinces`
    pub layer_prefix: String,
    pub highlight: HighlightStyle,
}

impl BoundaryLayerConfig {
    /// Admin-1 boundaries of `country`
    pub fn provinces(country: &str) -> Self {
        Self {
            granularity: Granularity::Province,
            source_id: "adm1".to_string(),
            tileset_url: ADM1_TILESET_URL.to_string(),
            source_layer: ADM1_SOURCE_LAYER.to_string(),
            promote_id: PROMOTE_ID_FIELD.to_string(),
            country: country.to_string(),
            layer_prefix: format!("{}-provinces", country.to_lowercase()),
            highlight: HighlightStyle::new(0.15, 3.0),
        }
    }

    /// Admin-2 boundaries of `country`
    pub fn counties(country: &str) -> Self {
        Self {
            granularity: Granularity::County,
            source_id: "adm2".to_string(),
            tileset_url: ADM2_TILESET_URL.to_string(),
            source_layer: ADM2_SOURCE_LAYER.to_string(),
            promote_id: PROMOTE_ID_FIELD.to_string(),
            country: country.to_string(),
            layer_prefix: format!("{}-counties", country.to_lowercase()),
            highlight: HighlightStyle::new(0.12, 2.5),
        }
    }

    pub fn hit_layer_id(&self) -> String {
        format!("{}-hit", self.layer_prefix)
    }

    pub fn fill_layer_id(&self) -> String {
        format!("{}-hover-fill", self.layer_prefix)
    }

    pub fn outline_layer_id(&self) -> String {
        format!("{}-hover-outline", self.layer_prefix)
    }

    pub fn source(&self) -> SourceDefinition {
        SourceDefinition::vector(&self.source_id, &self.tileset_url)
            .with_promote_id(&self.promote_id)
    }

    /// Features visible in `worldview` and belonging to the configured country
    pub fn filter(&self, worldview: &str) -> Expression {
        let worldview_filter = Expression::any(vec![
            Expression::eq(Expression::get(WORLDVIEW_PROPERTY), "all".into()),
            Expression::contains(worldview.into(), Expression::get(WORLDVIEW_PROPERTY)),
        ]);
        Expression::all(vec![
            worldview_filter,
            Expression::eq(
                Expression::get(COUNTRY_PROPERTY),
                self.country.as_str().into(),
            ),
        ])
    }

    /// Hit, hover-fill and hover-outline layers, in insertion order
    pub fn layers(&self, worldview: &str) -> [LayerDefinition; 3] {
        let filter = self.filter(worldview);
        let layer = |id: String, kind: LayerKind| {
            LayerDefinition::new(id, kind, &self.source_id, &self.source_layer, filter.clone())
        };

        [
            layer(self.hit_layer_id(), LayerKind::Fill)
                .with_paint("fill-color", HIT_FILL_COLOR)
                .with_paint("fill-opacity", 0.0),
            layer(self.fill_layer_id(), LayerKind::Fill)
                .with_paint("fill-color", self.highlight.color.as_str())
                .with_paint("fill-opacity", hover_switch(self.highlight.fill_opacity)),
            layer(self.outline_layer_id(), LayerKind::Line)
                .with_paint("line-color", self.highlight.color.as_str())
                .with_paint("line-width", hover_switch(self.highlight.line_width)),
        ]
    }
}

/// `on` while the feature's hover flag is set, 0 otherwise
fn hover_switch(on: f64) -> Expression {
    Expression::when(
        Expression::boolean(Expression::feature_state(HOVER_STATE_KEY), false),
        Expression::literal(on),
        Expression::literal(0),
    )
}

/// Complete description of a boundaries map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    pub style_url: String,
    #[serde(default = "default_container")]
    pub container: String,
    pub bounds: LatLngBounds,
    #[serde(default = "default_true")]
    pub antialias: bool,
    /// Worldview code the boundaries are drawn for, e.g. `US`
    pub worldview: String,
    #[serde(default)]
    pub navigation: NavigationControl,
    pub boundaries: Vec<BoundaryLayerConfig>,
}

fn default_container() -> String {
    DEFAULT_CONTAINER_ID.to_string()
}

fn default_true() -> bool {
    true
}

impl MapConfig {
    /// Parse and validate a JSON config
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: MapConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.style_url.trim().is_empty() {
            return Err(MapError::Config("style url is empty".to_string()));
        }
        if self.container.trim().is_empty() {
            return Err(MapError::Config("container id is empty".to_string()));
        }
        if !self.bounds.is_valid() {
            return Err(MapError::Config(format!(
                "invalid initial bounds {:?}",
                self.bounds.to_lng_lat_pairs()
            )));
        }
        if !is_region_code(&self.worldview) {
            return Err(MapError::Config(format!(
                "worldview `{}` is not a two-letter code",
                self.worldview
            )));
        }

        let mut granularities = HashSet::default();
        let mut sources = HashSet::default();
        let mut layer_ids = HashSet::default();
        for boundary in &self.boundaries {
            if !granularities.insert(boundary.granularity) {
                return Err(MapError::Config(format!(
                    "more than one {} boundary configured",
                    boundary.granularity
                )));
            }
            if !sources.insert(boundary.source_id.as_str()) {
                return Err(MapError::Config(format!(
                    "source id `{}` used twice",
                    boundary.source_id
                )));
            }
            for id in [
                boundary.hit_layer_id(),
                boundary.fill_layer_id(),
                boundary.outline_layer_id(),
            ] {
                if !layer_ids.insert(id.clone()) {
                    return Err(MapError::Config(format!("layer id `{}` used twice", id)));
                }
            }
            if !is_region_code(&boundary.country) {
                return Err(MapError::Config(format!(
                    "country `{}` is not an ISO 3166-1 alpha-2 code",
                    boundary.country
                )));
            }
            if !(0.0..=1.0).contains(&boundary.highlight.fill_opacity) {
                return Err(MapError::Config(format!(
                    "{} fill opacity {} is outside 0..=1",
                    boundary.granularity, boundary.highlight.fill_opacity
                )));
            }
            if boundary.highlight.line_width < 0.0 {
                return Err(MapError::Config(format!(
                    "{} line width {} is negative",
                    boundary.granularity, boundary.highlight.line_width
                )));
            }
        }

        Ok(())
    }

    pub fn boundary(&self, granularity: Granularity) -> Option<&BoundaryLayerConfig> {
        self.boundaries
            .iter()
            .find(|boundary| boundary.granularity == granularity)
    }

    /// Constructor options for the map view
    pub fn view_options(&self, token: &AccessToken) -> MapViewOptions {
        MapViewOptions {
            container: self.container.clone(),
            style_url: self.style_url.clone(),
            bounds: self.bounds.clone(),
            antialias: self.antialias,
            access_token: token.as_str().to_string(),
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        BoundaryPreset::default().resolve()
    }
}

fn is_region_code(code: &str) -> bool {
    code.len() == 2 && code.chars().all(|c| c.is_ascii_uppercase())
}

/// Ready-made map configurations
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryPreset {
    /// Canadian provinces and US counties on the custom boundaries style
    NorthAmerica,
    /// Same boundaries on the core light style
    LightBase,
    Custom(MapConfig),
}

impl BoundaryPreset {
    pub fn resolve(&self) -> MapConfig {
        let (south, west, north, east) = NORTH_AMERICA_EXTENT;
        match self {
            Self::NorthAmerica => MapConfig {
                style_url: DEFAULT_STYLE_URL.to_string(),
                container: default_container(),
                bounds: LatLngBounds::from_coords(south, west, north, east),
                antialias: true,
                worldview: "US".to_string(),
                navigation: NavigationControl::default(),
                boundaries: vec![
                    BoundaryLayerConfig::provinces("CA"),
                    BoundaryLayerConfig::counties("US"),
                ],
            },
            Self::LightBase => MapConfig {
                style_url: LIGHT_STYLE_URL.to_string(),
                ..Self::NorthAmerica.resolve()
            },
            Self::Custom(config) => config.clone(),
        }
    }

    /// Looks a built-in preset up by name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "north-america" => Some(Self::NorthAmerica),
            "light" => Some(Self::LightBase),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::NorthAmerica => "north-america",
            Self::LightBase => "light",
            Self::Custom(_) => "custom",
        }
    }
}

impl Default for BoundaryPreset {
    fn default() -> Self {
        Self::NorthAmerica
    }
}

/// Renderer access token
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let token: String = token.into();
        let token = token.trim().to_string();
        if token.is_empty() {
            return Err(MapError::Config("access token is empty".to_string()));
        }
        let token = Self(token);
        if !token.is_public() {
            log::warn!(
                "access token is not a public ({}…) token; use an origin-restricted public token",
                PUBLIC_TOKEN_PREFIX
            );
        }
        Ok(token)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_public(&self) -> bool {
        self.0.starts_with(PUBLIC_TOKEN_PREFIX)
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let visible: String = self.0.chars().take(8).collect();
        write!(f, "AccessToken({}…)", visible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn properties(value: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
        match value {
            serde_json::Value::Object(map) => map,
            _ => serde_json::Map::new(),
        }
    }

    #[test]
    fn test_preset_resolution() {
        let north_america = BoundaryPreset::NorthAmerica.resolve();
        let light = BoundaryPreset::LightBase.resolve();

        assert_eq!(north_america.style_url, DEFAULT_STYLE_URL);
        assert_eq!(light.style_url, LIGHT_STYLE_URL);
        assert_eq!(light.boundaries, north_america.boundaries);
        assert_eq!(north_america.worldview, "US");
        assert!(north_america.validate().is_ok());

        let custom = BoundaryPreset::Custom(light.clone()).resolve();
        assert_eq!(custom, light);
    }

    #[test]
    fn test_preset_names() {
        for preset in [BoundaryPreset::NorthAmerica, BoundaryPreset::LightBase] {
            assert_eq!(BoundaryPreset::from_name(preset.name()), Some(preset));
        }
        assert_eq!(BoundaryPreset::from_name("europe"), None);
    }

    #[test]
    fn test_layer_ids() {
        let provinces = BoundaryLayerConfig::provinces("CA");
        assert_eq!(provinces.hit_layer_id(), "ca-provinces-hit");
        assert_eq!(provinces.fill_layer_id(), "ca-provinces-hover-fill");
        assert_eq!(provinces.outline_layer_id(), "ca-provinces-hover-outline");
        assert_eq!(BoundaryLayerConfig::counties("US").hit_layer_id(), "us-counties-hit");
    }

    #[test]
    fn test_filter_accepts_canada_rejects_mexico() {
        let provinces = BoundaryLayerConfig::provinces("CA");
        let [hit, _, _] = provinces.layers("US");

        assert!(hit.accepts(&properties(json!({ "worldview": "all", "iso_3166_1": "CA" }))));
        assert!(!hit.accepts(&properties(json!({ "worldview": "all", "iso_3166_1": "MX" }))));
    }

    #[test]
    fn test_filter_worldview() {
        let filter = BoundaryLayerConfig::counties("US").filter("US");
        let ctx_props = properties(json!({ "worldview": "US", "iso_3166_1": "US" }));
        let other_props = properties(json!({ "worldview": "CN", "iso_3166_1": "US" }));

        assert!(filter.matches(&crate::style::EvaluationContext::new(&ctx_props)));
        assert!(!filter.matches(&crate::style::EvaluationContext::new(&other_props)));
    }

    #[test]
    fn test_filter_json() {
        let filter = BoundaryLayerConfig::provinces("CA").filter("US");
        assert_eq!(
            filter.to_json(),
            json!(["all",
                ["any", ["==", ["get", "worldview"], "all"], ["in", "US", ["get", "worldview"]]],
                ["==", ["get", "iso_3166_1"], "CA"]
            ])
        );
    }

    #[test]
    fn test_hover_paint() {
        let [hit, fill, outline] = BoundaryLayerConfig::provinces("CA").layers("US");
        assert_eq!(hit.paint["fill-opacity"].to_json(), json!(0.0));
        assert_eq!(
            fill.paint["fill-opacity"].to_json(),
            json!(["case", ["boolean", ["feature-state", "hover"], false], 0.15, 0])
        );
        assert_eq!(outline.kind, LayerKind::Line);
        assert_eq!(
            outline.paint["line-width"].to_json(),
            json!(["case", ["boolean", ["feature-state", "hover"], false], 3.0, 0])
        );
    }

    #[test]
    fn test_validation_rejects_bad_configs() {
        let mut config = MapConfig::default();
        config.worldview = "usa".to_string();
        assert!(matches!(config.validate(), Err(MapError::Config(_))));

        let mut config = MapConfig::default();
        config.boundaries.push(BoundaryLayerConfig::provinces("US"));
        assert!(config.validate().is_err());

        let mut config = MapConfig::default();
        config.boundaries[0].highlight.fill_opacity = 1.5;
        assert!(config.validate().is_err());

        let mut config = MapConfig::default();
        config.bounds = LatLngBounds::from_coords(75.0, -40.0, 15.0, -170.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_json_round_trip_with_defaults() {
        let json = r#"{
            "style_url": "mapbox://styles/mapbox/light-v11",
            "bounds": { "south_west": { "lat": 15.0, "lng": -170.0 },
                        "north_east": { "lat": 75.0, "lng": -40.0 } },
            "worldview": "US",
            "boundaries": []
        }"#;
        let config = MapConfig::from_json_str(json).unwrap();
        assert_eq!(config.container, "map");
        assert!(config.antialias);
        assert_eq!(config.navigation, NavigationControl::default());
        assert!(config.boundary(Granularity::Province).is_none());
    }

    #[test]
    fn test_access_token() {
        assert!(AccessToken::new("   ").is_err());
        let token = AccessToken::new("pk.eyJ1IjoiZXhhbXBsZSJ9.abc").unwrap();
        assert!(token.is_public());
        assert!(!format!("{:?}", token).contains("abc"));
        assert!(!AccessToken::new("sk.secret").unwrap().is_public());
    }
}
