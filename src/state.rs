//! Application state management
//!
//! Contains shared state accessible across all routes. Everything here is
//! read-only after startup.

use crate::handler::ContentHandler;
use std::sync::Arc;

/// Application state shared across all routes
pub struct AppState {
    /// Content handler, with or without a configured database
    pub handler: ContentHandler,
}

impl AppState {
    pub fn new(handler: ContentHandler) -> Self {
        Self { handler }
    }
}

/// Type alias for shared state
pub type SharedState = Arc<AppState>;
