//! Region registry: notification content kept in step with the live region set.
//!
//! The platform owns region geometry. The registry only tracks notification
//! content per identifier and guarantees that no content outlives its region:
//! content is removed and persisted before the platform stops the region.

use std::sync::Arc;

use crate::config::{render_template, RegionMonitorConfig};
use crate::error::Result;
use crate::platform::LocationService;
use crate::region::{validate_identifier, RegionDescriptor};
use crate::store::{KeyValueStore, NotificationContent, NotificationStore};

pub struct RegionRegistry<S: KeyValueStore> {
    store: NotificationStore<S>,
    location: Arc<dyn LocationService>,
    fallback_title: String,
    fallback_body_template: String,
}

impl<S: KeyValueStore> RegionRegistry<S> {
    pub fn new(backend: S, location: Arc<dyn LocationService>) -> Self {
        Self::with_config(backend, location, &RegionMonitorConfig::default())
    }

    pub fn with_config(
        backend: S,
        location: Arc<dyn LocationService>,
        config: &RegionMonitorConfig,
    ) -> Self {
        Self {
            store: NotificationStore::open(backend),
            location,
            fallback_title: config.fallback_title.clone(),
            fallback_body_template: config.fallback_body_template.clone(),
        }
    }

    pub fn store(&self) -> &NotificationStore<S> {
        &self.store
    }

    /// Record notification content for a region.
    ///
    /// Content is stored only when both title and body are given. Omitting
    /// either leaves any existing entry in place. Returns true if the stored
    /// content changed.
    pub fn register(
        &mut self,
        identifier: &str,
        title: Option<&str>,
        body: Option<&str>,
    ) -> Result<bool> {
        validate_identifier(identifier)?;
        match (title, body) {
            (Some(title), Some(body)) => {
                let changed = self
                    .store
                    .insert(identifier, NotificationContent::new(title, body));
                if changed {
                    tracing::debug!(identifier = %identifier, "notification_content_stored");
                }
                Ok(changed)
            }
            _ => Ok(false),
        }
    }

    /// Remove a region and its content. Returns whether the platform was
    /// monitoring a region with this identifier.
    pub fn unregister(&mut self, identifier: &str) -> Result<bool> {
        validate_identifier(identifier)?;
        self.store.remove(identifier);

        let monitored = self.is_monitored(identifier);
        if monitored {
            self.location.stop_monitoring_region(identifier);
            tracing::info!(identifier = %identifier, "stopped_monitoring_region");
        } else {
            tracing::debug!(identifier = %identifier, "region_not_monitored");
        }
        Ok(monitored)
    }

    /// Drop content for `identifier` once the platform has stopped monitoring
    /// it, for example after a monitoring failure. Returns true if content
    /// was removed.
    pub fn release(&mut self, identifier: &str) -> bool {
        if self.is_monitored(identifier) {
            return false;
        }
        let removed = self.store.remove(identifier);
        if removed {
            tracing::info!(identifier = %identifier, "released_notification_content");
        }
        removed
    }

    fn is_monitored(&self, identifier: &str) -> bool {
        self.location
            .monitored_regions()
            .iter()
            .any(|r| r.identifier == identifier)
    }

    /// Remove every region and all content.
    pub fn unregister_all(&mut self) {
        self.store.clear();

        let regions = self.location.monitored_regions();
        for region in &regions {
            self.location.stop_monitoring_region(&region.identifier);
        }
        tracing::info!(count = regions.len(), "stopped_monitoring_all_regions");
    }

    /// Notification to show when the device enters `identifier`.
    ///
    /// Returns `None` while notifications are disabled.
    pub fn resolve_notification(&self, identifier: &str) -> Option<NotificationContent> {
        if !self.store.enabled() {
            return None;
        }
        match self.store.get(identifier) {
            Some(content) => Some(content.clone()),
            None => Some(NotificationContent::new(
                self.fallback_title.clone(),
                render_template(&self.fallback_body_template, identifier),
            )),
        }
    }

    /// Regions the platform currently monitors, merged with stored content.
    pub fn list_active_regions(&self) -> Vec<RegionDescriptor> {
        self.location
            .monitored_regions()
            .into_iter()
            .map(|region| {
                let content = self.store.get(&region.identifier);
                RegionDescriptor::new(region, content)
            })
            .collect()
    }

    pub fn notifications_enabled(&self) -> bool {
        self.store.enabled()
    }

    pub fn set_notifications_enabled(&mut self, enabled: bool) {
        self.store.set_enabled(enabled);
        tracing::info!(enabled, "notifications_enabled_changed");
    }

    /// Re-read persisted state.
    pub fn reload(&mut self) {
        self.store.reload();
    }

    /// Drop content for regions the platform no longer monitors.
    pub fn prune(&mut self) -> usize {
        let live: Vec<String> = self
            .location
            .monitored_regions()
            .into_iter()
            .map(|r| r.identifier)
            .collect();
        let removed = self.store.retain(|id| live.iter().any(|l| l == id));
        if removed > 0 {
            tracing::info!(removed, "pruned_orphaned_notification_content");
        }
        removed
    }
}
