use std::time::Duration;

/// Errors surfaced by publishing and topic reconciliation.
///
/// The taxonomy matters for retry behavior: `Timeout` is the only variant the
/// send path retries. Everything else propagates unchanged to the caller so
/// real faults (auth, rejection, malformed config) are never masked by a
/// retry loop.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PublishError {
    /// The transport's request-timeout condition. Retried with backoff.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Any non-timeout transport fault: connection refused, authentication
    /// failure, serialization error inside the transport.
    #[error("Transport failure: {0}")]
    Transport(String),

    /// Broker-side rejection of an admin or produce request.
    #[error("Broker rejected request: {0}")]
    Rejected(String),

    /// Invalid configuration: empty topic name, malformed TOML, repeated
    /// initialization of the shared publisher.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl PublishError {
    /// Check if this is the transient timeout class eligible for retry.
    pub fn is_timeout(&self) -> bool {
        matches!(self, PublishError::Timeout(_))
    }

    /// Check if this is a broker-side rejection.
    pub fn is_rejected(&self) -> bool {
        matches!(self, PublishError::Rejected(_))
    }

    /// Create a timeout error
    pub fn timeout(elapsed: Duration) -> Self {
        PublishError::Timeout(elapsed)
    }

    /// Create a transport failure error
    pub fn transport(msg: impl Into<String>) -> Self {
        PublishError::Transport(msg.into())
    }

    /// Create a broker rejection error
    pub fn rejected(msg: impl Into<String>) -> Self {
        PublishError::Rejected(msg.into())
    }

    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        PublishError::InvalidConfig(msg.into())
    }
}

impl From<std::io::Error> for PublishError {
    fn from(err: std::io::Error) -> Self {
        PublishError::Io(err.to_string())
    }
}
