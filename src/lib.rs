//! # boundary-hover
//!
//! Administrative-boundary hover highlighting for vector-tile web maps.
//!
//! The crate turns a [`MapConfig`] into the sources, layers and pointer
//! handlers a Mapbox GL style needs to highlight provinces and counties under
//! the pointer. The renderer is reached through the [`MapEngine`] trait: the
//! `wasm` feature binds it to `mapboxgl` in the browser, and [`HeadlessEngine`]
//! implements it in memory for tooling and tests.

pub mod core;
pub mod engine;
pub mod input;
pub mod layers;
pub mod prelude;
pub mod style;
pub mod traits;
pub mod ui;
#[cfg(feature = "wasm")]
pub mod web;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    builder::MapConfigBuilder,
    config::{AccessToken, BoundaryLayerConfig, BoundaryPreset, Granularity, MapConfig},
    geo::{LatLng, LatLngBounds},
    map::BoundaryMap,
    shared::SharedMap,
};

pub use engine::{EngineError, FeatureId, FeatureTarget, HeadlessEngine, HeadlessPlatform};

pub use input::{ErrorEvent, FeatureHit, HoverRegistry, HoverTransition, MapEvent};

pub use layers::{configure_boundaries, ConfigureReport, ItemOutcome};

pub use style::{Expression, LayerDefinition, SourceDefinition};

pub use traits::{EnginePlatform, ErrorSink, MapEngine};

pub use ui::ErrorBanner;

/// Install `env_logger` as the `log` backend, honouring `RUST_LOG` (default `info`).
/// Safe to call more than once.
#[cfg(feature = "debug")]
pub fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("info");
    if env_logger::Builder::from_env(env).try_init().is_err() {
        log::debug!("logger already installed");
    }
}

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("Capability unavailable: {0}")]
    CapabilityUnavailable(String),

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Error type alias for convenience
pub type Error = MapError;
