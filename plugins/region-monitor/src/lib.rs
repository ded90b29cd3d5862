use std::sync::Arc;

use region_monitor_core::{
    InMemoryLocationService, LocationService, LoggingNotificationCenter, NotificationCenter,
    RegionMonitorConfig,
};
use tauri::{
    plugin::{Builder, TauriPlugin},
    Manager, Runtime,
};

mod commands;
mod error;
mod handler;
mod state;

pub use error::{RegionMonitorError, Result};
pub use handler::{dispatch_platform_event, handle_platform_event};
pub use region_monitor_core::{
    AuthorizationStatus, GeofenceRequest, PlatformEvent, RegionDescriptor,
};
pub use region_monitor_events::{LocationUpdateEvent, RegionEvent, RegionEventKind};
pub use state::{Platform, SharedState, State};

const PLUGIN_NAME: &str = "region-monitor";

/// Access the plugin state from any Tauri manager.
pub trait RegionMonitorExt<R: Runtime> {
    fn region_monitor(&self) -> &SharedState;
}

impl<R: Runtime, T: Manager<R>> RegionMonitorExt<R> for T {
    fn region_monitor(&self) -> &SharedState {
        self.state::<SharedState>().inner()
    }
}

/// Plugin backed by the in-process location service.
pub fn init<R: Runtime>() -> TauriPlugin<R, Option<RegionMonitorConfig>> {
    init_with_platform(
        Arc::new(InMemoryLocationService::new()),
        Arc::new(LoggingNotificationCenter::default()),
    )
}

/// Plugin driving the given native services. The native side reports its
/// callbacks through [`dispatch_platform_event`].
pub fn init_with_platform<R: Runtime>(
    location: Arc<dyn LocationService>,
    notifications: Arc<dyn NotificationCenter>,
) -> TauriPlugin<R, Option<RegionMonitorConfig>> {
    Builder::<R, Option<RegionMonitorConfig>>::new(PLUGIN_NAME)
        .invoke_handler(tauri::generate_handler![
            commands::initialize,
            commands::setup_geofence,
            commands::start_monitoring,
            commands::stop_monitoring,
            commands::stop_all_monitoring,
            commands::request_notification_permission,
            commands::check_location_permission,
            commands::get_active_regions,
            commands::remove_region,
            commands::remove_all_regions,
            commands::set_notifications_enabled,
            commands::listen_region_events,
            commands::cancel_region_events,
            commands::listen_location_updates,
            commands::cancel_location_updates,
        ])
        .setup(move |app, api| {
            let config = api.config().clone().unwrap_or_default();
            tracing::info!(
                database_file = %config.database_file,
                default_regions = config.default_regions.len(),
                "region_monitor_plugin_setup"
            );

            let platform = Platform {
                location,
                notifications,
            };
            app.manage(SharedState::new(State::new(platform, config)));
            Ok(())
        })
        .build()
}
