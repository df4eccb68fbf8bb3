//! Error types for Sift.

/// Errors that can occur while building queries or talking to the engine.
///
/// All error variants are marked with `#[non_exhaustive]` to allow
/// adding new error types without breaking changes.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Malformed caller input (bad index name, missing sort field, etc.)
    #[error("Validation error: {message}")]
    Validation {
        /// Field or aspect that failed validation
        field: Option<String>,
        /// What went wrong
        message: String,
    },

    /// No engine node reachable, or the connection failed mid-request
    #[error("Connection error: {message}")]
    Connection {
        /// Human-readable error message
        message: String,
        /// Source error if available
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The engine did not answer in time
    #[error("Request timed out: {message}")]
    Timeout {
        /// What timed out
        message: String,
    },

    /// The engine answered but reported a failed operation
    #[error("Engine error{}: {message}", status_suffix(.status))]
    Engine {
        /// HTTP-like status code, when the engine reports one
        status: Option<u16>,
        /// Engine-provided reason
        message: String,
    },

    /// The engine answered with a body missing parts we rely on
    #[error("Malformed engine response: {message}")]
    MalformedResponse {
        /// What was missing or unexpected
        message: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error (configuration files)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// What configuration is problematic
        message: String,
    },
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" ({s})")).unwrap_or_default()
}

/// Convenience `Result` type alias for Sift operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns whether this error is a connectivity/transport failure.
    ///
    /// Covers unreachable nodes, connection faults and request timeouts.
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Error::Connection { .. } | Error::Timeout { .. })
    }

    /// Creates a new validation error.
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Error::Validation {
            field: None,
            message: message.into(),
        }
    }

    /// Creates a new validation error with a field name.
    pub fn validation_field<F, M>(field: F, message: M) -> Self
    where
        F: Into<String>,
        M: Into<String>,
    {
        Error::Validation {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    /// Creates a new connection error with a message.
    pub fn connection<S: Into<String>>(message: S) -> Self {
        Error::Connection {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new connection error with a message and source error.
    pub fn connection_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Connection {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new timeout error.
    pub fn timeout<S: Into<String>>(message: S) -> Self {
        Error::Timeout {
            message: message.into(),
        }
    }

    /// Creates a new engine error without a status code.
    pub fn engine<S: Into<String>>(message: S) -> Self {
        Error::Engine {
            status: None,
            message: message.into(),
        }
    }

    /// Creates a new engine error carrying the reported status.
    pub fn engine_status<S: Into<String>>(status: u16, message: S) -> Self {
        Error::Engine {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Creates a new malformed-response error.
    pub fn malformed<S: Into<String>>(message: S) -> Self {
        Error::MalformedResponse {
            message: message.into(),
        }
    }

    /// Creates a new configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config {
            message: message.into(),
        }
    }
}
