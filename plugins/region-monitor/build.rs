const COMMANDS: &[&str] = &[
    "initialize",
    "setup_geofence",
    "start_monitoring",
    "stop_monitoring",
    "stop_all_monitoring",
    "request_notification_permission",
    "check_location_permission",
    "get_active_regions",
    "remove_region",
    "remove_all_regions",
    "set_notifications_enabled",
    "listen_region_events",
    "cancel_region_events",
    "listen_location_updates",
    "cancel_location_updates",
];

fn main() {
    tauri_plugin::Builder::new(COMMANDS).build();
}
