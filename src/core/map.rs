use crate::{
    core::config::{AccessToken, MapConfig},
    input::{ErrorEvent, HoverRegistry, HoverTransition, MapEvent},
    layers::{configure_boundaries, ConfigureReport},
    traits::{EnginePlatform, ErrorSink, MapEngine},
    ui::banner::{AUTHORIZATION_MESSAGE, UNSUPPORTED_MESSAGE},
    MapError, Result,
};

/// A running boundaries map: the renderer, its config and the hover state
///
/// All behaviour is driven by [`MapEvent`]s delivered by the host's event loop.
pub struct BoundaryMap<E: MapEngine, S: ErrorSink> {
    engine: E,
    config: MapConfig,
    sink: S,
    hover: HoverRegistry,
    report: Option<ConfigureReport>,
    authorization_reported: bool,
}

impl<E: MapEngine, S: ErrorSink> BoundaryMap<E, S> {
    /// Check the graphics capability, construct the map view and attach its controls.
    ///
    /// Fails with [`MapError::CapabilityUnavailable`], after putting one message
    /// on the banner, when the platform cannot render maps; the view is not constructed.
    pub fn bootstrap<P>(platform: &P, config: MapConfig, token: &AccessToken, mut sink: S) -> Result<Self>
    where
        P: EnginePlatform<Engine = E>,
    {
        config.validate()?;

        if !platform.is_supported() {
            sink.show(UNSUPPORTED_MESSAGE);
            return Err(MapError::CapabilityUnavailable(
                "WebGL not supported".to_string(),
            ));
        }

        let mut engine = platform.create(&config.view_options(token))?;
        engine.add_navigation_control(&config.navigation)?;
        log::info!(
            "map created in #{} with style {}",
            config.container,
            config.style_url
        );

        Ok(Self {
            engine,
            config,
            sink,
            hover: HoverRegistry::new(),
            report: None,
            authorization_reported: false,
        })
    }

    /// Dispatch one renderer event
    pub fn handle_event(&mut self, event: &MapEvent) {
        match event {
            MapEvent::StyleLoaded => {
                self.on_style_loaded();
            }
            MapEvent::PointerMove { .. } | MapEvent::PointerLeave { .. } => {
                self.on_pointer(event);
            }
            MapEvent::Error(error) => self.on_error(error),
        }
    }

    /// Add the boundary sources and layers, then start tracking hover on every granularity
    /// whose hit layer made it onto the map. Only the first call configures.
    pub fn on_style_loaded(&mut self) -> &ConfigureReport {
        if self.report.is_none() {
            log::info!("[Map] style loaded");
            let report = configure_boundaries(&mut self.engine, &self.config, &mut self.sink);
            for granularity in &report.interactive {
                if let Some(boundary) = self.config.boundary(*granularity) {
                    self.hover.register(boundary);
                }
            }
            self.report = Some(report);
        }
        self.report.get_or_insert_with(ConfigureReport::default)
    }

    /// Pointer move/leave on a layer. Renderer failures are logged and the
    /// hover state stays consistent.
    pub fn on_pointer(&mut self, event: &MapEvent) -> Option<HoverTransition> {
        match self.hover.handle(&mut self.engine, event) {
            Ok(routed) => routed.map(|(_, transition)| transition),
            Err(err) => {
                log::warn!("hover update failed: {}", err);
                None
            }
        }
    }

    /// Renderer error. Authorization failures go on the banner, once.
    pub fn on_error(&mut self, error: &ErrorEvent) {
        log::error!("[Mapbox GL JS error] {}", error.message);
        if error.is_authorization_failure() && !self.authorization_reported {
            self.authorization_reported = true;
            self.sink.show(AUTHORIZATION_MESSAGE);
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn hover(&self) -> &HoverRegistry {
        &self.hover
    }

    /// Outcome of layer configuration, once the style has loaded
    pub fn report(&self) -> Option<&ConfigureReport> {
        self.report.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.report.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::config::{BoundaryPreset, Granularity},
        engine::{FeatureId, HeadlessPlatform},
        input::FeatureHit,
        style::StyleLayer,
        ui::ErrorBanner,
    };

    fn token() -> AccessToken {
        AccessToken::new("pk.test-token").unwrap()
    }

    #[test]
    fn test_bootstrap_passes_view_options() {
        let platform = HeadlessPlatform::new();
        let mut banner = ErrorBanner::new();
        let map = BoundaryMap::bootstrap(
            &platform,
            BoundaryPreset::NorthAmerica.resolve(),
            &token(),
            &mut banner,
        )
        .unwrap();

        let options = map.engine().options().unwrap();
        assert_eq!(options.container, "map");
        assert!(options.antialias);
        assert_eq!(options.access_token, "pk.test-token");
        assert_eq!(
            options.bounds.to_lng_lat_pairs(),
            [[-170.0, 15.0], [-40.0, 75.0]]
        );
        assert_eq!(map.engine().controls().len(), 1);
        assert!(!map.engine().controls()[0].show_compass);
        assert!(!map.is_loaded());
    }

    #[test]
    fn test_invalid_config_is_rejected_before_creation() {
        let platform = HeadlessPlatform::new();
        let mut config = BoundaryPreset::NorthAmerica.resolve();
        config.style_url.clear();

        let result = BoundaryMap::bootstrap(&platform, config, &token(), ErrorBanner::new());
        assert!(matches!(result, Err(MapError::Config(_))));
        assert_eq!(platform.created(), 0);
    }

    #[test]
    fn test_style_loaded_only_configures_once() {
        let platform =
            HeadlessPlatform::new().with_style_layers(vec![StyleLayer::text_label("place-label")]);
        let mut map = BoundaryMap::bootstrap(
            &platform,
            BoundaryPreset::NorthAmerica.resolve(),
            &token(),
            ErrorBanner::new(),
        )
        .unwrap();

        map.handle_event(&MapEvent::StyleLoaded);
        map.handle_event(&MapEvent::StyleLoaded);

        assert!(map.report().is_some_and(|r| r.is_complete()));
        assert!(!map.sink().is_visible());
        assert_eq!(map.engine().layer_order().len(), 7);
    }

    #[test]
    fn test_pointer_before_load_is_ignored() {
        let platform = HeadlessPlatform::new();
        let mut map = BoundaryMap::bootstrap(
            &platform,
            BoundaryPreset::NorthAmerica.resolve(),
            &token(),
            ErrorBanner::new(),
        )
        .unwrap();

        let event = MapEvent::pointer_move("ca-provinces-hit", FeatureHit::from(FeatureId::Number(1)));
        assert_eq!(map.on_pointer(&event), None);
        assert_eq!(map.hover().hovered(Granularity::Province), None);
    }

    #[test]
    fn test_non_auth_errors_stay_off_the_banner() {
        let platform = HeadlessPlatform::new();
        let mut map = BoundaryMap::bootstrap(
            &platform,
            BoundaryPreset::NorthAmerica.resolve(),
            &token(),
            ErrorBanner::new(),
        )
        .unwrap();

        map.handle_event(&MapEvent::Error(ErrorEvent::http(404, "Not Found")));
        assert!(!map.sink().is_visible());

        map.handle_event(&MapEvent::Error(ErrorEvent::http(401, "Unauthorized")));
        map.handle_event(&MapEvent::Error(ErrorEvent::http(403, "Forbidden")));
        assert_eq!(map.sink().history(), [AUTHORIZATION_MESSAGE]);
    }
}
