//! Errors returned by region monitor calls.

#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Location manager not initialized")]
    NotInitialized,
}

impl MonitorError {
    /// Stable code reported across the bridge.
    pub fn code(&self) -> &'static str {
        match self {
            MonitorError::InvalidArguments(_) => "INVALID_ARGUMENTS",
            MonitorError::NotInitialized => "LOCATION_MANAGER_NOT_INITIALIZED",
        }
    }
}

pub type Result<T> = std::result::Result<T, MonitorError>;
