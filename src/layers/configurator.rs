//! Adds the boundary sources and highlight layers once the style is loaded
//!
//! Insertion order matches the stacking we want: all sources, then every
//! hit layer, then each granularity's fill and outline. When the style has a
//! text label layer, everything goes directly beneath it so highlights never
//! cover place names.
//!
//! Failures are per item. A failed source or layer is logged, shown on the
//! banner and recorded in the [`ConfigureReport`]; the remaining items are
//! still added. Layers of a source that failed to register are skipped.

use crate::{
    core::config::{Granularity, MapConfig},
    engine::EngineError,
    style::{first_text_label, LayerDefinition},
    traits::{ErrorSink, MapEngine},
    ui::banner::{layer_failed_message, source_failed_message},
};

/// Result of adding one source or layer
#[derive(Debug, Clone, PartialEq)]
pub enum ItemOutcome {
    Added,
    Failed(EngineError),
    /// Not attempted because its source failed
    Skipped,
}

/// What the configurator did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigureReport {
    /// Layer the new layers were inserted beneath
    pub before: Option<String>,
    pub sources: Vec<(String, ItemOutcome)>,
    pub layers: Vec<(String, ItemOutcome)>,
    /// Granularities whose hit layer exists, i.e. that can track hover
    pub interactive: Vec<Granularity>,
}

impl ConfigureReport {
    pub fn layer_outcome(&self, id: &str) -> Option<&ItemOutcome> {
        self.layers
            .iter()
            .find(|(layer_id, _)| layer_id == id)
            .map(|(_, outcome)| outcome)
    }

    pub fn source_outcome(&self, id: &str) -> Option<&ItemOutcome> {
        self.sources
            .iter()
            .find(|(source_id, _)| source_id == id)
            .map(|(_, outcome)| outcome)
    }

    pub fn added_layers(&self) -> Vec<&str> {
        self.layers
            .iter()
            .filter(|(_, outcome)| *outcome == ItemOutcome::Added)
            .map(|(id, _)| id.as_str())
            .collect()
    }

    /// Sources and layers that failed or were skipped
    pub fn failures(&self) -> usize {
        self.sources
            .iter()
            .chain(self.layers.iter())
            .filter(|(_, outcome)| *outcome != ItemOutcome::Added)
            .count()
    }

    pub fn is_complete(&self) -> bool {
        self.failures() == 0
    }
}

/// Add every configured boundary source and its layers to a loaded map
pub fn configure_boundaries<E, S>(engine: &mut E, config: &MapConfig, sink: &mut S) -> ConfigureReport
where
    E: MapEngine + ?Sized,
    S: ErrorSink + ?Sized,
{
    let style_layers = engine.style_layers();
    let before = first_text_label(&style_layers).map(str::to_string);
    match &before {
        Some(id) => log::debug!("inserting boundary layers below `{}`", id),
        None => log::debug!("no text label layer in style; appending boundary layers on top"),
    }

    let mut report = ConfigureReport {
        before,
        ..ConfigureReport::default()
    };

    let mut registered = Vec::with_capacity(config.boundaries.len());
    for boundary in &config.boundaries {
        let source = boundary.source();
        match engine.add_source(&source) {
            Ok(()) => {
                log::debug!("added source `{}` ({})", source.id, source.url);
                report.sources.push((source.id.clone(), ItemOutcome::Added));
                registered.push(boundary);
            }
            Err(err) => {
                log::error!("addSource failed: {}: {}", source.id, err);
                sink.show(&source_failed_message(&source.id));
                report.sources.push((source.id.clone(), ItemOutcome::Failed(err)));
                for id in [
                    boundary.hit_layer_id(),
                    boundary.fill_layer_id(),
                    boundary.outline_layer_id(),
                ] {
                    report.layers.push((id, ItemOutcome::Skipped));
                }
            }
        }
    }

    let layer_sets: Vec<_> = registered
        .iter()
        .map(|boundary| (boundary.granularity, boundary.layers(&config.worldview)))
        .collect();

    for (granularity, [hit, _, _]) in &layer_sets {
        if add_layer(engine, hit, &mut report, sink) {
            report.interactive.push(*granularity);
        }
    }
    for (_, [_, fill, outline]) in &layer_sets {
        add_layer(engine, fill, &mut report, sink);
        add_layer(engine, outline, &mut report, sink);
    }

    log::info!(
        "boundary configuration finished: {} layers added, {} failures",
        report.added_layers().len(),
        report.failures()
    );
    report
}

fn add_layer<E, S>(
    engine: &mut E,
    layer: &LayerDefinition,
    report: &mut ConfigureReport,
    sink: &mut S,
) -> bool
where
    E: MapEngine + ?Sized,
    S: ErrorSink + ?Sized,
{
    let before = report.before.clone();
    match engine.add_layer(layer, before.as_deref()) {
        Ok(()) => {
            report.layers.push((layer.id.clone(), ItemOutcome::Added));
            true
        }
        Err(err) => {
            log::error!("addLayer failed: {}: {}", layer.id, err);
            sink.show(&layer_failed_message(&layer.id));
            report.layers.push((layer.id.clone(), ItemOutcome::Failed(err)));
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::config::BoundaryPreset,
        engine::HeadlessEngine,
        style::{LayerKind, StyleLayer},
        ui::ErrorBanner,
    };

    #[test]
    fn test_layers_go_below_first_label() {
        let mut engine = HeadlessEngine::with_style_layers(vec![
            StyleLayer::new("land", LayerKind::Fill),
            StyleLayer::text_label("settlement-label"),
            StyleLayer::text_label("country-label"),
        ]);
        let mut banner = ErrorBanner::new();
        let config = BoundaryPreset::NorthAmerica.resolve();

        let report = configure_boundaries(&mut engine, &config, &mut banner);

        assert!(report.is_complete());
        assert_eq!(report.before.as_deref(), Some("settlement-label"));
        assert_eq!(
            engine.layer_order(),
            [
                "land",
                "ca-provinces-hit",
                "us-counties-hit",
                "ca-provinces-hover-fill",
                "ca-provinces-hover-outline",
                "us-counties-hover-fill",
                "us-counties-hover-outline",
                "settlement-label",
                "country-label",
            ]
        );
        assert_eq!(report.interactive, [Granularity::Province, Granularity::County]);
        assert!(!banner.is_visible());
    }

    #[test]
    fn test_layers_appended_without_label() {
        let mut engine = HeadlessEngine::with_style_layers(vec![StyleLayer::new(
            "water",
            LayerKind::Fill,
        )]);
        let mut banner = ErrorBanner::new();
        let report = configure_boundaries(
            &mut engine,
            &BoundaryPreset::NorthAmerica.resolve(),
            &mut banner,
        );

        assert_eq!(report.before, None);
        assert_eq!(engine.layer_order().first().map(String::as_str), Some("water"));
        assert_eq!(
            engine.layer_order().last().map(String::as_str),
            Some("us-counties-hover-outline")
        );
    }

    #[test]
    fn test_failed_layer_does_not_stop_the_rest() {
        let mut engine = HeadlessEngine::new();
        engine.reject_layer("ca-provinces-hover-fill");
        let mut banner = ErrorBanner::new();

        let report = configure_boundaries(
            &mut engine,
            &BoundaryPreset::NorthAmerica.resolve(),
            &mut banner,
        );

        assert!(matches!(
            report.layer_outcome("ca-provinces-hover-fill"),
            Some(ItemOutcome::Failed(EngineError::Rejected(_)))
        ));
        assert_eq!(report.added_layers().len(), 5);
        assert_eq!(report.failures(), 1);
        assert_eq!(banner.history().len(), 1);
        assert!(banner.current().is_some_and(|m| m.contains("ca-provinces-hover-fill")));
    }

    #[test]
    fn test_failed_source_skips_its_layers() {
        let mut engine = HeadlessEngine::new();
        engine.reject_source("adm2");
        let mut banner = ErrorBanner::new();

        let report = configure_boundaries(
            &mut engine,
            &BoundaryPreset::NorthAmerica.resolve(),
            &mut banner,
        );

        assert_eq!(report.source_outcome("adm1"), Some(&ItemOutcome::Added));
        assert_eq!(report.layer_outcome("us-counties-hit"), Some(&ItemOutcome::Skipped));
        assert_eq!(report.interactive, [Granularity::Province]);
        assert_eq!(report.added_layers().len(), 3);
        assert_eq!(banner.history().len(), 1);
        assert!(engine.layer("us-counties-hover-fill").is_none());
    }
}
