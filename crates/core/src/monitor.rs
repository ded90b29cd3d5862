//! Region monitor: the call surface exposed to the application layer.
//!
//! Inbound calls are forwarded to the registry and the location service.
//! Platform callbacks are turned into notifications and stream events.

use std::sync::Arc;

use region_monitor_events::{
    event_names, LocationUpdateEvent, RegionEvent, SubscriberSlot,
};

use crate::authorization::{AuthorizationAction, AuthorizationFlow, AuthorizationStatus};
use crate::config::RegionMonitorConfig;
use crate::error::Result;
use crate::platform::{LocationService, NotificationCenter, PlatformEvent};
use crate::region::{GeofenceRequest, RegionDescriptor};
use crate::registry::RegionRegistry;
use crate::store::{KeyValueStore, NotificationContent};

/// The two outbound streams, one subscriber each.
pub struct Subscribers {
    pub region_events: SubscriberSlot<RegionEvent>,
    pub location_updates: SubscriberSlot<LocationUpdateEvent>,
}

impl Default for Subscribers {
    fn default() -> Self {
        Self {
            region_events: SubscriberSlot::new(event_names::REGION_EVENTS),
            location_updates: SubscriberSlot::new(event_names::LOCATION_UPDATES),
        }
    }
}

impl Subscribers {
    /// Route an event to the slot of its stream.
    pub fn publish(&self, event: StreamEvent) -> bool {
        match event {
            StreamEvent::Region(event) => self.region_events.send(event),
            StreamEvent::Location(update) => self.location_updates.send(update),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    Region(RegionEvent),
    Location(LocationUpdateEvent),
}

/// Outbound work produced by a platform callback. Run it after releasing
/// any lock held around the monitor.
#[derive(Debug, Default, PartialEq)]
#[must_use]
pub struct Dispatch {
    pub notification: Option<NotificationContent>,
    pub event: Option<StreamEvent>,
}

impl Dispatch {
    fn event(event: StreamEvent) -> Self {
        Self {
            notification: None,
            event: Some(event),
        }
    }

    pub fn run(self, notifications: &dyn NotificationCenter, subscribers: &Subscribers) {
        if let Some(content) = &self.notification {
            notifications.deliver(content);
        }
        if let Some(event) = self.event {
            subscribers.publish(event);
        }
    }
}

pub struct RegionMonitor<S: KeyValueStore> {
    registry: RegionRegistry<S>,
    location: Arc<dyn LocationService>,
    notifications: Arc<dyn NotificationCenter>,
    authorization: AuthorizationFlow,
    config: RegionMonitorConfig,
    subscribers: Arc<Subscribers>,
}

impl<S: KeyValueStore> RegionMonitor<S> {
    pub fn new(
        backend: S,
        location: Arc<dyn LocationService>,
        notifications: Arc<dyn NotificationCenter>,
        config: RegionMonitorConfig,
    ) -> Self {
        let mut registry = RegionRegistry::with_config(backend, Arc::clone(&location), &config);
        registry.prune();

        Self {
            registry,
            location,
            notifications,
            authorization: AuthorizationFlow::new(config.request_always_authorization),
            config,
            subscribers: Arc::new(Subscribers::default()),
        }
    }

    /// Share subscriber slots that outlive this monitor.
    pub fn with_subscribers(mut self, subscribers: Arc<Subscribers>) -> Self {
        self.subscribers = subscribers;
        self
    }

    pub fn subscribers(&self) -> &Arc<Subscribers> {
        &self.subscribers
    }

    pub fn registry(&self) -> &RegionRegistry<S> {
        &self.registry
    }

    pub fn config(&self) -> &RegionMonitorConfig {
        &self.config
    }

    pub fn notification_center(&self) -> &Arc<dyn NotificationCenter> {
        &self.notifications
    }

    /// Start the location authorization flow from the platform's current
    /// status.
    ///
    /// Notification permission is requested separately through
    /// [`NotificationCenter::request_authorization`], which may block on a
    /// system prompt.
    pub fn initialize(&mut self) -> bool {
        let status = self.location.authorization_status();
        self.handle_authorization(status);
        true
    }

    pub fn setup_geofence(&mut self, request: &GeofenceRequest) -> Result<()> {
        let region = request.region();
        region.validate()?;

        self.location.start_monitoring_region(&region);
        self.registry.register(
            &request.identifier,
            request.notification_title.as_deref(),
            request.notification_body.as_deref(),
        )?;

        tracing::info!(
            identifier = %region.identifier,
            latitude = region.latitude,
            longitude = region.longitude,
            radius = region.radius,
            "geofence_set"
        );
        Ok(())
    }

    pub fn start_monitoring(&self) {
        self.location.start_location_updates();
        tracing::info!("location_updates_started");
    }

    pub fn stop_monitoring(&mut self, identifier: &str) -> Result<()> {
        self.registry.unregister(identifier)?;
        Ok(())
    }

    /// Stop every region and location updates.
    pub fn stop_all_monitoring(&mut self) {
        self.registry.unregister_all();
        self.location.stop_location_updates();
        tracing::info!("stopped_all_monitoring");
    }

    pub fn check_location_permission(&self) -> AuthorizationStatus {
        self.location.authorization_status()
    }

    pub fn get_active_regions(&self) -> Vec<RegionDescriptor> {
        self.registry.list_active_regions()
    }

    pub fn remove_region(&mut self, identifier: &str) -> Result<bool> {
        self.registry.unregister(identifier)
    }

    pub fn remove_all_regions(&mut self) -> bool {
        self.registry.unregister_all();
        true
    }

    pub fn notifications_enabled(&self) -> bool {
        self.registry.notifications_enabled()
    }

    pub fn set_notifications_enabled(&mut self, enabled: bool) {
        self.registry.set_notifications_enabled(enabled);
    }

    /// Dispatch a callback from the platform location service.
    pub fn handle_platform_event(&mut self, event: PlatformEvent) {
        let dispatch = self.prepare_platform_event(event);
        dispatch.run(self.notifications.as_ref(), &self.subscribers);
    }

    /// Apply a platform callback to the monitor's state and return the
    /// notification and stream event it produces.
    pub fn prepare_platform_event(&mut self, event: PlatformEvent) -> Dispatch {
        match event {
            PlatformEvent::RegionEntered(identifier) => {
                tracing::info!(identifier = %identifier, "entered_region");
                let notification = self.registry.resolve_notification(&identifier);
                if notification.is_none() {
                    tracing::debug!(identifier = %identifier, "notifications_disabled");
                }
                Dispatch {
                    notification,
                    event: Some(StreamEvent::Region(RegionEvent::entered(identifier))),
                }
            }
            PlatformEvent::RegionExited(identifier) => {
                tracing::info!(identifier = %identifier, "exited_region");
                Dispatch::event(StreamEvent::Region(RegionEvent::exited(identifier)))
            }
            PlatformEvent::LocationUpdated {
                latitude,
                longitude,
            } => Dispatch::event(StreamEvent::Location(LocationUpdateEvent::new(
                latitude, longitude,
            ))),
            PlatformEvent::MonitoringFailed {
                identifier,
                message,
            } => {
                tracing::warn!(
                    identifier = identifier.as_deref().unwrap_or("unknown"),
                    error = %message,
                    "monitoring_failed"
                );
                if let Some(id) = identifier.as_deref() {
                    self.registry.release(id);
                }
                Dispatch::event(StreamEvent::Region(RegionEvent::monitoring_failed(
                    identifier, message,
                )))
            }
            PlatformEvent::AuthorizationChanged(status) => {
                self.handle_authorization(status);
                Dispatch::default()
            }
        }
    }

    fn handle_authorization(&mut self, status: AuthorizationStatus) {
        match self.authorization.on_change(status) {
            AuthorizationAction::RequestWhenInUse => {
                self.location.request_when_in_use_authorization()
            }
            AuthorizationAction::RequestAlways => self.location.request_always_authorization(),
            AuthorizationAction::StartServices => {
                self.start_monitoring();
                self.install_default_regions();
            }
            AuthorizationAction::None => {}
        }
    }

    fn install_default_regions(&mut self) {
        let defaults = self.config.default_regions.clone();
        for request in &defaults {
            if let Err(e) = self.setup_geofence(request) {
                tracing::warn!(identifier = %request.identifier, error = %e, "default_region_rejected");
            }
        }
    }
}
