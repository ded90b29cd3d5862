use std::sync::Arc;

use region_monitor_core::{GeofenceRequest, NotificationCenter, RegionDescriptor};
use region_monitor_events::{new_sink, LocationUpdateEvent, RegionEvent};
use tauri::{command, ipc::Channel, AppHandle, Manager, Runtime, State};

use crate::{state::open_database, Result, SharedState};

#[command]
pub async fn initialize<R: Runtime>(
    app: AppHandle<R>,
    state: State<'_, SharedState>,
) -> Result<bool> {
    let mut guard = state.lock().await;
    if !guard.is_initialized() {
        let app_data_dir = app.path().app_data_dir()?;
        let database = open_database(&app_data_dir, &guard.config().database_file)?;
        guard.initialize(database);
    }
    let monitor = guard.monitor_mut()?;
    let started = monitor.initialize();
    let notifications = Arc::clone(monitor.notification_center());
    drop(guard);

    // The permission prompt may block until the user answers it.
    tokio::task::spawn_blocking(move || {
        let granted = notifications.request_authorization();
        tracing::info!(granted, "notification_permission");
    });

    Ok(started)
}

#[command]
#[allow(clippy::too_many_arguments)]
pub async fn setup_geofence(
    state: State<'_, SharedState>,
    latitude: f64,
    longitude: f64,
    radius: f64,
    identifier: String,
    notify_on_entry: Option<bool>,
    notify_on_exit: Option<bool>,
    notification_title: Option<String>,
    notification_body: Option<String>,
) -> Result<()> {
    let request = GeofenceRequest {
        latitude,
        longitude,
        radius,
        identifier,
        notify_on_entry: notify_on_entry.unwrap_or(true),
        notify_on_exit: notify_on_exit.unwrap_or(false),
        notification_title,
        notification_body,
    };

    let mut guard = state.lock().await;
    guard.monitor_mut()?.setup_geofence(&request)?;
    Ok(())
}

#[command]
pub async fn start_monitoring(state: State<'_, SharedState>) -> Result<()> {
    let guard = state.lock().await;
    guard.monitor()?.start_monitoring();
    Ok(())
}

#[command]
pub async fn stop_monitoring(state: State<'_, SharedState>, identifier: String) -> Result<()> {
    let mut guard = state.lock().await;
    guard.monitor_mut()?.stop_monitoring(&identifier)?;
    Ok(())
}

#[command]
pub async fn stop_all_monitoring(state: State<'_, SharedState>) -> Result<()> {
    let mut guard = state.lock().await;
    guard.monitor_mut()?.stop_all_monitoring();
    Ok(())
}

#[command]
pub async fn request_notification_permission(state: State<'_, SharedState>) -> Result<bool> {
    request_permission(&state).await
}

/// Ask for notification permission on a blocking thread, outside the state
/// lock.
async fn request_permission(state: &SharedState) -> Result<bool> {
    let guard = state.lock().await;
    let notifications: Arc<dyn NotificationCenter> =
        Arc::clone(guard.monitor()?.notification_center());
    drop(guard);

    let granted = tokio::task::spawn_blocking(move || notifications.request_authorization()).await?;
    tracing::info!(granted, "notification_permission");
    Ok(granted)
}

#[command]
pub async fn check_location_permission(state: State<'_, SharedState>) -> Result<String> {
    let guard = state.lock().await;
    Ok(guard.monitor()?.check_location_permission().to_string())
}

#[command]
pub async fn get_active_regions(state: State<'_, SharedState>) -> Result<Vec<RegionDescriptor>> {
    let guard = state.lock().await;
    Ok(guard.monitor()?.get_active_regions())
}

#[command]
pub async fn remove_region(state: State<'_, SharedState>, identifier: String) -> Result<bool> {
    let mut guard = state.lock().await;
    Ok(guard.monitor_mut()?.remove_region(&identifier)?)
}

#[command]
pub async fn remove_all_regions(state: State<'_, SharedState>) -> Result<bool> {
    let mut guard = state.lock().await;
    Ok(guard.monitor_mut()?.remove_all_regions())
}

#[command]
pub async fn set_notifications_enabled(
    state: State<'_, SharedState>,
    enabled: bool,
) -> Result<()> {
    let mut guard = state.lock().await;
    guard.monitor_mut()?.set_notifications_enabled(enabled);
    Ok(())
}

/// Attach the region event stream. Replaces any previous listener.
#[command]
pub async fn listen_region_events(
    state: State<'_, SharedState>,
    on_event: Channel<RegionEvent>,
) -> Result<()> {
    let guard = state.lock().await;
    guard
        .subscribers()
        .region_events
        .listen(new_sink(move |event: RegionEvent| {
            if let Err(e) = on_event.send(event) {
                tracing::warn!("failed to send region event: {:?}", e);
            }
        }));
    Ok(())
}

#[command]
pub async fn cancel_region_events(state: State<'_, SharedState>) -> Result<()> {
    let guard = state.lock().await;
    guard.subscribers().region_events.cancel();
    Ok(())
}

/// Attach the location update stream. Replaces any previous listener.
#[command]
pub async fn listen_location_updates(
    state: State<'_, SharedState>,
    on_event: Channel<LocationUpdateEvent>,
) -> Result<()> {
    let guard = state.lock().await;
    guard
        .subscribers()
        .location_updates
        .listen(new_sink(move |event: LocationUpdateEvent| {
            if let Err(e) = on_event.send(event) {
                tracing::warn!("failed to send location update: {:?}", e);
            }
        }));
    Ok(())
}

#[command]
pub async fn cancel_location_updates(state: State<'_, SharedState>) -> Result<()> {
    let guard = state.lock().await;
    guard.subscribers().location_updates.cancel();
    Ok(())
}
