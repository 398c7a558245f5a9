//! Map config builder for fluent configuration
//!
//! Starts from a preset and overrides individual fields; `build` validates
//! the result.

use crate::{
    core::{
        config::{BoundaryLayerConfig, BoundaryPreset, Granularity, HighlightStyle, MapConfig},
        geo::LatLngBounds,
    },
    engine::NavigationControl,
    Result,
};

/// Builder for [`MapConfig`]
#[derive(Debug, Clone)]
pub struct MapConfigBuilder {
    config: MapConfig,
}

impl MapConfigBuilder {
    /// Create a builder seeded with the default preset
    pub fn new() -> Self {
        Self::from_preset(BoundaryPreset::default())
    }

    pub fn from_preset(preset: BoundaryPreset) -> Self {
        Self {
            config: preset.resolve(),
        }
    }

    pub fn with_style_url(mut self, style_url: impl Into<String>) -> Self {
        self.config.style_url = style_url.into();
        self
    }

    /// Set the DOM id of the map container
    pub fn with_container(mut self, container: impl Into<String>) -> Self {
        self.config.container = container.into();
        self
    }

    /// Set the initial extent
    pub fn with_bounds(mut self, bounds: LatLngBounds) -> Self {
        self.config.bounds = bounds;
        self
    }

    pub fn with_antialias(mut self, enabled: bool) -> Self {
        self.config.antialias = enabled;
        self
    }

    pub fn with_worldview(mut self, worldview: impl Into<String>) -> Self {
        self.config.worldview = worldview.into();
        self
    }

    pub fn with_navigation(mut self, control: NavigationControl) -> Self {
        self.config.navigation = control;
        self
    }

    /// Add a boundary, replacing any existing one of the same granularity
    pub fn with_boundary(mut self, boundary: BoundaryLayerConfig) -> Self {
        self.config
            .boundaries
            .retain(|existing| existing.granularity != boundary.granularity);
        self.config.boundaries.push(boundary);
        self
    }

    pub fn without_boundary(mut self, granularity: Granularity) -> Self {
        self.config
            .boundaries
            .retain(|existing| existing.granularity != granularity);
        self
    }

    /// Override the highlight paint of one granularity; no-op if it is not configured
    pub fn with_highlight(mut self, granularity: Granularity, highlight: HighlightStyle) -> Self {
        if let Some(boundary) = self
            .config
            .boundaries
            .iter_mut()
            .find(|boundary| boundary.granularity == granularity)
        {
            boundary.highlight = highlight;
        }
        self
    }

    /// Validate and return the config
    pub fn build(self) -> Result<MapConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for MapConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::LIGHT_STYLE_URL;

    #[test]
    fn test_builder_defaults_match_preset() {
        let config = MapConfigBuilder::new().build().unwrap();
        assert_eq!(config, BoundaryPreset::NorthAmerica.resolve());
    }

    #[test]
    fn test_builder_overrides() {
        let config = MapConfigBuilder::from_preset(BoundaryPreset::LightBase)
            .with_container("boundaries")
            .with_worldview("CA")
            .with_boundary(BoundaryLayerConfig::counties("CA"))
            .with_highlight(Granularity::Province, HighlightStyle::new(0.3, 4.0))
            .build()
            .unwrap();

        assert_eq!(config.style_url, LIGHT_STYLE_URL);
        assert_eq!(config.container, "boundaries");
        assert_eq!(config.boundaries.len(), 2);
        assert_eq!(
            config.boundary(Granularity::County).map(|b| b.country.as_str()),
            Some("CA")
        );
        assert_eq!(
            config
                .boundary(Granularity::Province)
                .map(|b| b.highlight.fill_opacity),
            Some(0.3)
        );
    }

    #[test]
    fn test_builder_rejects_invalid() {
        assert!(MapConfigBuilder::new().with_style_url("").build().is_err());
        assert!(MapConfigBuilder::new().with_worldview("").build().is_err());
    }

    #[test]
    fn test_without_boundary() {
        let config = MapConfigBuilder::new()
            .without_boundary(Granularity::County)
            .build()
            .unwrap();
        assert!(config.boundary(Granularity::County).is_none());
        assert!(config.boundary(Granularity::Province).is_some());
    }
}
