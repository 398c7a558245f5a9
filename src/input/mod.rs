pub mod events;
pub mod hover;

// Re-export the essential types
pub use events::{ErrorEvent, FeatureHit, MapEvent};
pub use hover::{HoverRegistry, HoverState, HoverTransition};
