//! Prelude module for common boundary-hover types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use boundary_hover::prelude::*;`

pub use crate::core::{
    builder::MapConfigBuilder,
    config::{
        AccessToken, BoundaryLayerConfig, BoundaryPreset, Granularity, HighlightStyle, MapConfig,
    },
    geo::{LatLng, LatLngBounds},
    map::BoundaryMap,
    shared::SharedMap,
};

pub use crate::engine::{
    ControlPosition, Cursor, EngineCall, EngineError, EngineResult, FeatureId, FeatureTarget,
    HeadlessEngine, HeadlessPlatform, MapViewOptions, NavigationControl,
};

pub use crate::input::{ErrorEvent, FeatureHit, HoverRegistry, HoverState, HoverTransition, MapEvent};

pub use crate::layers::{configure_boundaries, ConfigureReport, ItemOutcome};

pub use crate::style::{
    EvaluationContext, Expression, LayerDefinition, LayerKind, SourceDefinition, StyleLayer,
};

pub use crate::traits::{EnginePlatform, ErrorSink, MapEngine};

pub use crate::ui::ErrorBanner;

pub use crate::{Error as MapError, Result};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
