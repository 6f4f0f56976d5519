pub mod gpu;
pub mod price_history;

use serde::{Deserialize, Serialize};

/// Error body returned by every API handler
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Machine-readable error code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}
