//! Error types for the Storyloom domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all Storyloom operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Generation errors ---
    #[error("Generation error: {0}")]
    Generate(#[from] GenerateError),

    // --- State update errors ---
    #[error("State error: {0}")]
    State(#[from] StateError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Failures surfaced by the generation pipeline.
///
/// Every variant is retried identically by the retry policy; the
/// classification exists so the caller can report the final cause.
#[derive(Debug, Clone, Error)]
pub enum GenerateError {
    #[error("API request failed: {message} (status: {status_code})")]
    Api { status_code: u16, message: String },

    #[error("Rate limited by service, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Malformed response body: {0}")]
    BadResponse(String),

    #[error("Generator not configured: {0}")]
    NotConfigured(String),

    #[error("Network error: {0}")]
    Network(String),
}

/// Rejected state updates. The state itself is never left half-applied;
/// a failed command returns one of these and the previous state stands.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StateError {
    #[error("Unknown asset: {0}")]
    UnknownAsset(String),

    #[error("Unknown canvas node: {0}")]
    UnknownNode(String),

    #[error("Unknown connection: {0}")]
    UnknownConnection(String),

    #[error("Unknown track: {0}")]
    UnknownTrack(String),

    #[error("Unknown timeline item: {0}")]
    UnknownItem(String),

    #[error("Invalid timeline span: start {start} must precede end {end}")]
    InvalidSpan { start: f64, end: f64 },

    #[error("Connection already exists: {from} -> {to}")]
    DuplicateConnection { from: String, to: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_error_displays_correctly() {
        let err = Error::Generate(GenerateError::Api {
            status_code: 429,
            message: "Too many requests".into(),
        });
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("Too many requests"));
    }

    #[test]
    fn state_error_displays_correctly() {
        let err = Error::State(StateError::InvalidSpan {
            start: 4.0,
            end: 2.0,
        });
        assert!(err.to_string().contains("start 4"));
        assert!(err.to_string().contains("end 2"));
    }
}
