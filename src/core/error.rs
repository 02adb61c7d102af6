use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashError {
    #[error("Configuration error: {0}")] Config(String),

    #[error("Network error: {0}")] Network(String),

    #[error("Request timed out after {seconds} seconds")] Timeout {
        seconds: u64,
    },

    #[error("Stats backend has not finished computing initial data")] NotReady,

    #[error("API error: HTTP {status}")] Api {
        status: u16,
    },

    #[error("Storage error: {0}")] Storage(String),

    #[error("Serialization error: {0}")] Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")] Io(#[from] std::io::Error),

    #[error("Unknown error: {0}")] Unknown(String),
}

impl DashError {
    /// Transient failures that the caller may retry without operator action.
    pub fn is_retryable(&self) -> bool {
        match self {
            DashError::Network(_) => true,
            DashError::Timeout { .. } => true,
            DashError::NotReady => true,
            DashError::Api { status } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// The backend accepted the request but is still computing first-ever
    /// stats. Handled with a single delayed retry, never surfaced as an error.
    pub fn is_not_ready(&self) -> bool {
        matches!(self, DashError::NotReady)
    }

    /// Failures of the local cache layer. These degrade the feature to
    /// in-memory caching and are never propagated to the caller.
    pub fn is_storage(&self) -> bool {
        matches!(self, DashError::Storage(_) | DashError::Io(_))
    }
}

pub type DashResult<T> = Result<T, DashError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(DashError::Network("connection reset".to_string()).is_retryable());
        assert!(DashError::Timeout { seconds: 10 }.is_retryable());
        assert!(DashError::NotReady.is_retryable());
        assert!(DashError::Api { status: 503 }.is_retryable());
        assert!(DashError::Api { status: 429 }.is_retryable());
        assert!(!DashError::Api { status: 404 }.is_retryable());
        assert!(!DashError::Config("bad url".to_string()).is_retryable());
    }

    #[test]
    fn test_not_ready_is_distinct() {
        assert!(DashError::NotReady.is_not_ready());
        assert!(!DashError::Network("down".to_string()).is_not_ready());
    }
}
