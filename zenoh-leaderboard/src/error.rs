/// Error types for the zenoh-leaderboard library
use thiserror::Error;

/// Result type alias for leaderboard operations
pub type Result<T> = std::result::Result<T, LeaderboardError>;

/// Errors that can occur while storing or fetching scores
#[derive(Debug, Error)]
pub enum LeaderboardError {
    /// Zenoh-related errors
    #[error("Zenoh error: {0}")]
    Zenoh(#[from] zenoh::Error),

    /// IO error (local cache file)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Username cannot be used as a leaderboard identity
    #[error("Invalid username: {0}. Must be 1-32 chars, no /, *, $, ?, #, @")]
    InvalidUsername(String),

    /// Invalid keyexpr pattern
    #[error("Invalid keyexpr: {0}")]
    InvalidKeyexpr(String),

    /// Payload could not be converted to or from zenoh bytes
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The score store answered with an error reply
    #[error("Rejected by score store: {0}")]
    Rejected(String),

    /// The score store did not answer in time
    #[error("No response: {0}")]
    NoResponse(String),
}
