//! Error types used throughout the client

use thiserror::Error;

/// Main error type for the Emploi Store client
#[derive(Error, Debug)]
pub enum EmploiStoreError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    /// A data endpoint answered with a non-2xx status.
    #[error("{url} returned status {status}")]
    Transport { status: u16, url: String },

    /// The request never produced a response (DNS, connect, timeout).
    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    Decode(String),

    /// A package or resource name matched nothing.
    #[error("No match for {query}. Here are the names available:\n{}", .available.join("\n"))]
    Lookup { query: String, available: Vec<String> },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EmploiStoreError {
    /// Stable label suitable for structured logging.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Auth(_) => "auth",
            Self::Transport { .. } => "transport",
            Self::Network(_) => "network",
            Self::Decode(_) => "decode",
            Self::Lookup { .. } => "lookup",
            Self::InvalidInput(_) => "invalid_input",
            Self::Io(_) => "io",
        }
    }

    /// HTTP status carried by a transport error, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for EmploiStoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Result type alias for Emploi Store operations
pub type Result<T> = std::result::Result<T, EmploiStoreError>;
