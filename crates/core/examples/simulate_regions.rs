//! Example: Drive the monitor with simulated platform callbacks.
//!
//! Run with: cargo run -p region-monitor-core --example simulate_regions

use region_monitor_core::{
    new_sink, AuthorizationStatus, GeofenceRequest, InMemoryLocationService,
    LocationUpdateEvent, LoggingNotificationCenter, MemoryStore, NotificationCenter,
    PlatformEvent, RegionEvent, RegionMonitor, RegionMonitorConfig,
};
use std::sync::Arc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing for debug output
    tracing_subscriber::fmt()
        .with_env_filter("region_monitor_core=debug,region_monitor_events=debug")
        .init();

    let location = Arc::new(InMemoryLocationService::new());
    let notifications = Arc::new(LoggingNotificationCenter::default());
    let mut monitor = RegionMonitor::new(
        MemoryStore::new(),
        location.clone(),
        notifications.clone(),
        RegionMonitorConfig::default(),
    );

    monitor.subscribers().region_events.listen(new_sink(|event: RegionEvent| {
        println!("region event: {}", serde_json::to_string(&event).unwrap_or_default());
    }));
    monitor.subscribers().location_updates.listen(new_sink(|update: LocationUpdateEvent| {
        println!("location: {}", serde_json::to_string(&update).unwrap_or_default());
    }));

    notifications.request_authorization();
    monitor.initialize();
    for status in [
        AuthorizationStatus::AuthorizedWhenInUse,
        AuthorizationStatus::AuthorizedAlways,
    ] {
        location.set_authorization_status(status);
        monitor.handle_platform_event(PlatformEvent::AuthorizationChanged(status));
    }
    println!("permission: {}", monitor.check_location_permission());

    monitor.setup_geofence(
        &GeofenceRequest::new("office", 52.5200, 13.4050, 150.0)
            .with_notification("Office", "Welcome to the office"),
    )?;
    monitor.setup_geofence(&GeofenceRequest::new("gym", 52.5300, 13.4100, 80.0))?;

    monitor.handle_platform_event(PlatformEvent::LocationUpdated {
        latitude: 52.5201,
        longitude: 13.4049,
    });
    monitor.handle_platform_event(PlatformEvent::RegionEntered("office".to_string()));
    monitor.handle_platform_event(PlatformEvent::RegionExited("office".to_string()));
    monitor.handle_platform_event(PlatformEvent::RegionEntered("gym".to_string()));
    location.evict("gym");
    monitor.handle_platform_event(PlatformEvent::MonitoringFailed {
        identifier: Some("gym".to_string()),
        message: "region limit exceeded".to_string(),
    });

    println!("\nActive regions:");
    for region in monitor.get_active_regions() {
        println!("  {}", serde_json::to_string(&region)?);
    }

    println!("\nDelivered notifications: {}", notifications.delivered().len());
    monitor.stop_all_monitoring();
    println!("Done.");
    Ok(())
}
