use serde::{ser::SerializeStruct, Serialize, Serializer};

#[derive(Debug, thiserror::Error)]
pub enum RegionMonitorError {
    #[error(transparent)]
    Monitor(#[from] region_monitor_core::MonitorError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("App data directory unavailable: {0}")]
    AppDataDir(String),

    #[error("Background task failed: {0}")]
    Task(String),
}

impl RegionMonitorError {
    /// Stable code reported across the bridge.
    pub fn code(&self) -> &'static str {
        match self {
            RegionMonitorError::Monitor(e) => e.code(),
            RegionMonitorError::Database(_) => "DATABASE_ERROR",
            RegionMonitorError::AppDataDir(_) => "APP_DATA_DIR_UNAVAILABLE",
            RegionMonitorError::Task(_) => "TASK_FAILED",
        }
    }
}

/// Serialized as `{code, message}` for the frontend.
impl Serialize for RegionMonitorError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut error = serializer.serialize_struct("RegionMonitorError", 2)?;
        error.serialize_field("code", self.code())?;
        error.serialize_field("message", &self.to_string())?;
        error.end()
    }
}

impl From<region_monitor_storage::StorageError> for RegionMonitorError {
    fn from(e: region_monitor_storage::StorageError) -> Self {
        RegionMonitorError::Database(e.to_string())
    }
}

impl From<tauri::Error> for RegionMonitorError {
    fn from(e: tauri::Error) -> Self {
        RegionMonitorError::AppDataDir(e.to_string())
    }
}

impl From<tokio::task::JoinError> for RegionMonitorError {
    fn from(e: tokio::task::JoinError) -> Self {
        RegionMonitorError::Task(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RegionMonitorError>;

#[cfg(test)]
mod tests {
    use super::*;
    use region_monitor_core::MonitorError;
    use serde_json::json;

    #[test]
    fn test_not_initialized_carries_code() {
        let error = RegionMonitorError::from(MonitorError::NotInitialized);
        assert_eq!(
            serde_json::to_value(&error).unwrap(),
            json!({
                "code": "LOCATION_MANAGER_NOT_INITIALIZED",
                "message": "Location manager not initialized"
            })
        );
    }

    #[test]
    fn test_invalid_arguments_carries_code() {
        let error = RegionMonitorError::from(MonitorError::InvalidArguments(
            "identifier must not be empty".to_string(),
        ));
        assert_eq!(
            serde_json::to_value(&error).unwrap(),
            json!({
                "code": "INVALID_ARGUMENTS",
                "message": "Invalid arguments: identifier must not be empty"
            })
        );
    }

    #[test]
    fn test_plugin_errors_have_own_codes() {
        assert_eq!(
            RegionMonitorError::Database("locked".to_string()).code(),
            "DATABASE_ERROR"
        );
        assert_eq!(
            RegionMonitorError::AppDataDir("missing".to_string()).code(),
            "APP_DATA_DIR_UNAVAILABLE"
        );
    }
}
