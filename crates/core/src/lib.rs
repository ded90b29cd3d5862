//! Geofence registry and platform bridge logic.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Domain Layer                             │
//! │  region.rs        - Region geometry and descriptors          │
//! │  store.rs         - Persisted notification content           │
//! │  registry.rs      - Content kept in step with live regions   │
//! │  authorization.rs - Permission escalation state machine      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Platform Boundary                           │
//! │  platform.rs - Location and notification service traits     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Application Layer                          │
//! │  monitor.rs - Call surface and platform callback dispatch   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use region_monitor_core::*;
//! use std::sync::Arc;
//!
//! let mut monitor = RegionMonitor::new(
//!     MemoryStore::new(),
//!     Arc::new(InMemoryLocationService::new()),
//!     Arc::new(LoggingNotificationCenter::default()),
//!     RegionMonitorConfig::default(),
//! );
//!
//! monitor.setup_geofence(
//!     &GeofenceRequest::new("office", 52.52, 13.40, 150.0).with_notification("Office", "Welcome"),
//! )?;
//! ```

mod authorization;
mod config;
mod error;
mod monitor;
mod platform;
mod region;
mod registry;
mod store;

pub use authorization::{AuthorizationAction, AuthorizationFlow, AuthorizationStatus};
pub use config::{RegionMonitorConfig, IDENTIFIER_PLACEHOLDER};
pub use error::{MonitorError, Result};
pub use monitor::{Dispatch, RegionMonitor, StreamEvent, Subscribers};
pub use platform::{
    AuthorizationRequest, InMemoryLocationService, LocationService, LoggingNotificationCenter,
    NotificationCenter, PlatformEvent,
};
pub use region::{GeofenceRequest, MonitoredRegion, RegionDescriptor};
pub use registry::RegionRegistry;
pub use store::{
    KeyValueStore, MemoryStore, MemoryStoreError, NotificationContent, NotificationStore,
    NOTIFICATIONS_ENABLED_KEY, NOTIFICATIONS_KEY,
};

// Re-export event types that appear in our public API
pub use region_monitor_events::{
    new_sink, EventSink, LocationUpdateEvent, RegionEvent, RegionEventKind, SubscriberSlot,
};
