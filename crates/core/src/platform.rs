//! Traits for the platform services the monitor drives.
//!
//! These traits abstract the native location and notification APIs,
//! allowing the registry and monitor to remain pure and testable.

use std::sync::Mutex;

use crate::authorization::AuthorizationStatus;
use crate::region::MonitoredRegion;
use crate::store::NotificationContent;

/// Native geofencing and location service.
pub trait LocationService: Send + Sync {
    /// Begin monitoring a region. Re-registering an identifier replaces it.
    fn start_monitoring_region(&self, region: &MonitoredRegion);

    fn stop_monitoring_region(&self, identifier: &str);

    /// Regions the platform currently monitors, in platform order.
    fn monitored_regions(&self) -> Vec<MonitoredRegion>;

    fn start_location_updates(&self);

    fn stop_location_updates(&self);

    fn authorization_status(&self) -> AuthorizationStatus;

    fn request_when_in_use_authorization(&self);

    fn request_always_authorization(&self);
}

/// Local notification delivery.
pub trait NotificationCenter: Send + Sync {
    /// Ask the user for permission to show notifications.
    fn request_authorization(&self) -> bool;

    /// Show a notification immediately. Fire-and-forget.
    fn deliver(&self, content: &NotificationContent);
}

/// Callbacks delivered by the platform location service.
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformEvent {
    RegionEntered(String),
    RegionExited(String),
    LocationUpdated { latitude: f64, longitude: f64 },
    MonitoringFailed {
        identifier: Option<String>,
        message: String,
    },
    AuthorizationChanged(AuthorizationStatus),
}

/// Authorization request recorded by [`InMemoryLocationService`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationRequest {
    WhenInUse,
    Always,
}

#[derive(Debug)]
struct InMemoryLocationState {
    regions: Vec<MonitoredRegion>,
    updating: bool,
    status: AuthorizationStatus,
    requests: Vec<AuthorizationRequest>,
}

/// Location service kept entirely in process.
///
/// Records registered regions and requests without touching any device API.
/// Used on platforms without native geofencing and in tests.
#[derive(Debug)]
pub struct InMemoryLocationService {
    state: Mutex<InMemoryLocationState>,
}

impl Default for InMemoryLocationService {
    fn default() -> Self {
        Self::with_status(AuthorizationStatus::NotDetermined)
    }
}

impl InMemoryLocationService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(status: AuthorizationStatus) -> Self {
        Self {
            state: Mutex::new(InMemoryLocationState {
                regions: Vec::new(),
                updating: false,
                status,
                requests: Vec::new(),
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, InMemoryLocationState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn set_authorization_status(&self, status: AuthorizationStatus) {
        self.lock().status = status;
    }

    pub fn is_updating_location(&self) -> bool {
        self.lock().updating
    }

    pub fn authorization_requests(&self) -> Vec<AuthorizationRequest> {
        self.lock().requests.clone()
    }

    /// Drop a region as if the OS had evicted it.
    pub fn evict(&self, identifier: &str) {
        self.lock().regions.retain(|r| r.identifier != identifier);
    }
}

impl LocationService for InMemoryLocationService {
    fn start_monitoring_region(&self, region: &MonitoredRegion) {
        let mut state = self.lock();
        match state
            .regions
            .iter_mut()
            .find(|r| r.identifier == region.identifier)
        {
            Some(existing) => *existing = region.clone(),
            None => state.regions.push(region.clone()),
        }
    }

    fn stop_monitoring_region(&self, identifier: &str) {
        self.lock().regions.retain(|r| r.identifier != identifier);
    }

    fn monitored_regions(&self) -> Vec<MonitoredRegion> {
        self.lock().regions.clone()
    }

    fn start_location_updates(&self) {
        self.lock().updating = true;
    }

    fn stop_location_updates(&self) {
        self.lock().updating = false;
    }

    fn authorization_status(&self) -> AuthorizationStatus {
        self.lock().status
    }

    fn request_when_in_use_authorization(&self) {
        self.lock().requests.push(AuthorizationRequest::WhenInUse);
    }

    fn request_always_authorization(&self) {
        self.lock().requests.push(AuthorizationRequest::Always);
    }
}

/// Notification center that logs deliveries instead of showing them.
#[derive(Debug)]
pub struct LoggingNotificationCenter {
    granted: bool,
    delivered: Mutex<Vec<NotificationContent>>,
}

impl Default for LoggingNotificationCenter {
    fn default() -> Self {
        Self::new(true)
    }
}

impl LoggingNotificationCenter {
    pub fn new(granted: bool) -> Self {
        Self {
            granted,
            delivered: Mutex::new(Vec::new()),
        }
    }

    pub fn delivered(&self) -> Vec<NotificationContent> {
        self.delivered
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl NotificationCenter for LoggingNotificationCenter {
    fn request_authorization(&self) -> bool {
        tracing::info!(granted = self.granted, "notification_permission");
        self.granted
    }

    fn deliver(&self, content: &NotificationContent) {
        if !self.granted {
            tracing::debug!(title = %content.title, "notification_not_permitted");
            return;
        }
        tracing::info!(title = %content.title, body = %content.body, "notification_delivered");
        self.delivered
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(content.clone());
    }
}
