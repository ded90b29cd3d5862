//! Plugin state management for the region monitor.

use region_monitor_core::{
    LocationService, MonitorError, NotificationCenter, RegionMonitor, RegionMonitorConfig,
    Subscribers,
};
use region_monitor_storage::Database;
use std::path::Path;
use std::sync::Arc;

/// Native services the monitor drives.
#[derive(Clone)]
pub struct Platform {
    pub location: Arc<dyn LocationService>,
    pub notifications: Arc<dyn NotificationCenter>,
}

pub type SharedState = tokio::sync::Mutex<State>;

pub struct State {
    /// Constructed by the `initialize` command.
    monitor: Option<RegionMonitor<Database>>,
    /// Stream subscribers, attachable before initialization.
    subscribers: Arc<Subscribers>,
    platform: Platform,
    config: RegionMonitorConfig,
}

impl State {
    pub fn new(platform: Platform, config: RegionMonitorConfig) -> Self {
        Self {
            monitor: None,
            subscribers: Arc::new(Subscribers::default()),
            platform,
            config,
        }
    }

    pub fn config(&self) -> &RegionMonitorConfig {
        &self.config
    }

    pub fn subscribers(&self) -> &Arc<Subscribers> {
        &self.subscribers
    }

    pub fn is_initialized(&self) -> bool {
        self.monitor.is_some()
    }

    /// Build the monitor over `database` unless one already exists.
    pub fn initialize(&mut self, database: Database) -> &mut RegionMonitor<Database> {
        self.monitor.get_or_insert_with(|| {
            RegionMonitor::new(
                database,
                Arc::clone(&self.platform.location),
                Arc::clone(&self.platform.notifications),
                self.config.clone(),
            )
            .with_subscribers(Arc::clone(&self.subscribers))
        })
    }

    pub fn monitor(&self) -> Result<&RegionMonitor<Database>, MonitorError> {
        self.monitor.as_ref().ok_or(MonitorError::NotInitialized)
    }

    pub fn monitor_mut(&mut self) -> Result<&mut RegionMonitor<Database>, MonitorError> {
        self.monitor.as_mut().ok_or(MonitorError::NotInitialized)
    }
}

/// Open the database used to persist notification content.
pub fn open_database(app_data_dir: &Path, file_name: &str) -> crate::Result<Database> {
    let db = Database::open(&app_data_dir.join(file_name))?;
    Ok(db)
}

#[cfg(test)]
mod tests {
    use super::*;
    use region_monitor_core::{
        GeofenceRequest, InMemoryLocationService, LoggingNotificationCenter,
    };

    fn create_state() -> State {
        let platform = Platform {
            location: Arc::new(InMemoryLocationService::new()),
            notifications: Arc::new(LoggingNotificationCenter::default()),
        };
        State::new(platform, RegionMonitorConfig::default())
    }

    #[test]
    fn test_monitor_requires_initialize() {
        let mut state = create_state();
        assert!(matches!(state.monitor(), Err(MonitorError::NotInitialized)));
        assert!(matches!(
            state.monitor_mut(),
            Err(MonitorError::NotInitialized)
        ));
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let mut state = create_state();
        state
            .initialize(Database::open_in_memory().unwrap())
            .setup_geofence(&GeofenceRequest::new("A", 0.0, 0.0, 100.0).with_notification("T", "B"))
            .unwrap();

        state.initialize(Database::open_in_memory().unwrap());

        let monitor = state.monitor().unwrap();
        assert!(monitor.registry().store().get("A").is_some());
    }

    #[test]
    fn test_monitor_shares_subscribers() {
        let mut state = create_state();
        let subscribers = Arc::clone(state.subscribers());
        let monitor = state.initialize(Database::open_in_memory().unwrap());

        assert!(Arc::ptr_eq(&subscribers, monitor.subscribers()));
    }
}
