//! Response bodies.

use serde::{Deserialize, Serialize};

/// Acknowledgement for operations without a payload.
///
/// An empty response body decodes to the default (all fields absent).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Error envelope sent with failing responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub status: Option<String>,
    pub error_code: String,
    pub error_message: String,
    #[serde(default)]
    pub error_details: Option<serde_json::Value>,
    #[serde(default)]
    pub timestamp: Option<String>,
}
