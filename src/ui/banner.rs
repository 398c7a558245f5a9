//! User-visible error banner
//!
//! The banner has a single text slot: a new message replaces the one on
//! screen. Every message is also written to the log.

use crate::traits::ErrorSink;

pub const UNSUPPORTED_MESSAGE: &str =
    "WebGL is not supported by your browser/device. Try a modern browser or enable hardware acceleration.";

pub const AUTHORIZATION_MESSAGE: &str =
    "Map authorization failed (401/403). Check your token scopes and Allowed URLs in Mapbox account.";

pub fn source_failed_message(source_id: &str) -> String {
    format!("Failed to add Boundaries source \"{}\". See console.", source_id)
}

pub fn layer_failed_message(layer_id: &str) -> String {
    format!(
        "Layer \"{}\" failed to add. Check console for details.",
        layer_id
    )
}

/// In-memory banner, used wherever there is no DOM
#[derive(Debug, Clone, Default)]
pub struct ErrorBanner {
    current: Option<String>,
    history: Vec<String>,
}

impl ErrorBanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Message currently displayed
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn is_visible(&self) -> bool {
        self.current.is_some()
    }

    /// Every message shown, oldest first
    pub fn history(&self) -> &[String] {
        &self.history
    }
}

impl ErrorSink for ErrorBanner {
    fn show(&mut self, message: &str) {
        log::warn!("[Map error] {}", message);
        self.current = Some(message.to_string());
        self.history.push(message.to_string());
    }
}
