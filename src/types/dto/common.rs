use poem_openapi::{Object, payload::Json};

/// Response model for health check endpoint
#[derive(Object, Debug)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,

    /// Timestamp of the health check (ISO 8601 format)
    pub timestamp: String,
}

/// Standardized error response model
#[derive(Object, Debug, Clone, PartialEq)]
pub struct ErrorResponse {
    /// Error code identifier (e.g. `invalid_credentials`)
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code
    pub status_code: u16,
}

impl ErrorResponse {
    pub fn json(error: &str, message: impl Into<String>, status_code: u16) -> Json<Self> {
        Json(Self {
            error: error.to_string(),
            message: message.into(),
            status_code,
        })
    }
}

/// Generic acknowledgement for operations without a richer payload
#[derive(Object, Debug)]
pub struct MessageResponse {
    /// Human-readable message describing the result
    pub message: String,
}
