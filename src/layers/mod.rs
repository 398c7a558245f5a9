pub mod configurator;

pub use configurator::{configure_boundaries, ConfigureReport, ItemOutcome};
