//! Renderer style building blocks: expressions, layers and sources

pub mod expression;
pub mod layer;
pub mod source;

pub use expression::{EvaluationContext, Expression};
pub use layer::{first_text_label, LayerDefinition, LayerKind, StyleLayer};
pub use source::SourceDefinition;
