//! Data models and DTOs (Data Transfer Objects)
//!
//! Contains the request payloads and response structures used by the handler.

pub mod content;

// Re-export commonly used types
pub use content::*;

use serde::Serialize;

/// A stored row, column name to scalar value
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Aggregate read over every entity
#[derive(Debug, Default, Serialize)]
pub struct Dashboard {
    pub services: Vec<Record>,
    pub regions: Vec<Record>,
    pub news: Vec<Record>,
    pub schedule: Vec<Record>,
    pub company_info: Vec<Record>,
}

impl Dashboard {
    /// Most recent news items carried by the aggregate read
    pub const NEWS_LIMIT: i64 = 10;
}

/// Deletion acknowledgement
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

impl Default for DeleteResponse {
    fn default() -> Self {
        Self { success: true }
    }
}
