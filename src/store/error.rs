use thiserror::Error as ThisError;

/// Result type for document store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for document store operations
#[derive(Debug, ThisError)]
pub enum Error {
    /// Credential discovery or token refresh failed
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// The store answered with a non-success status
    #[error("Store HTTP error (status {status}): {body}")]
    Http { status: u16, body: String },

    /// Request or response body could not be encoded/decoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A document returned by the store is missing required parts
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// The client was built with unusable settings
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Convert JSON errors to store errors
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Convert transport failures to store errors
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Http {
            status: err.status().map(|s| s.as_u16()).unwrap_or(0),
            body: err.to_string(),
        }
    }
}
