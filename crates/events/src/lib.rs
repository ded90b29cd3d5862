//! Event contracts for the two outbound streams of the region monitor.
//!
//! Region transition events and location fixes are serialized with the field
//! names the application layer expects. Using shared types keeps the core and
//! the plugin from drifting apart on field names.
//!
//! Also provides the single-slot subscriber used to deliver each stream.

mod subscriber;

pub use subscriber::{new_sink, EventSink, SubscriberSlot};

use serde::{Deserialize, Serialize};

/// Seconds since the Unix epoch, with millisecond precision.
pub fn timestamp_now() -> f64 {
    chrono::Utc::now().timestamp_millis() as f64 / 1000.0
}

/// Kind of region transition reported on the region stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegionEventKind {
    #[serde(rename = "didEnterRegion")]
    DidEnterRegion,
    #[serde(rename = "didExitRegion")]
    DidExitRegion,
    #[serde(rename = "monitoringDidFail")]
    MonitoringDidFail,
}

/// Item of the region event stream.
///
/// Producers: core monitor (platform callbacks)
/// Consumers: application layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionEvent {
    pub event: RegionEventKind,
    /// Region identifier. Empty when a failure is not tied to a region.
    pub identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Seconds since epoch.
    pub timestamp: f64,
}

impl RegionEvent {
    pub fn entered(identifier: impl Into<String>) -> Self {
        Self {
            event: RegionEventKind::DidEnterRegion,
            identifier: identifier.into(),
            error: None,
            timestamp: timestamp_now(),
        }
    }

    pub fn exited(identifier: impl Into<String>) -> Self {
        Self {
            event: RegionEventKind::DidExitRegion,
            identifier: identifier.into(),
            error: None,
            timestamp: timestamp_now(),
        }
    }

    pub fn monitoring_failed(identifier: Option<String>, error: impl Into<String>) -> Self {
        Self {
            event: RegionEventKind::MonitoringDidFail,
            identifier: identifier.unwrap_or_default(),
            error: Some(error.into()),
            timestamp: timestamp_now(),
        }
    }
}

/// Item of the location update stream.
///
/// Producers: core monitor (location fixes)
/// Consumers: application layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationUpdateEvent {
    pub latitude: f64,
    pub longitude: f64,
    /// Seconds since epoch.
    pub timestamp: f64,
}

impl LocationUpdateEvent {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            timestamp: timestamp_now(),
        }
    }
}

/// Stream names as constants to prevent typos.
pub mod event_names {
    /// Region transition stream.
    pub const REGION_EVENTS: &str = "region-monitor:region_events";
    /// Location update stream.
    pub const LOCATION_UPDATES: &str = "region-monitor:location_updates";
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_enter_event_serializes_without_error_field() {
        let mut event = RegionEvent::entered("home");
        event.timestamp = 12.5;

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(
            value,
            json!({"event": "didEnterRegion", "identifier": "home", "timestamp": 12.5})
        );
    }

    #[test]
    fn test_failure_without_region_uses_empty_identifier() {
        let event = RegionEvent::monitoring_failed(None, "region limit exceeded");

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["event"], "monitoringDidFail");
        assert_eq!(value["identifier"], "");
        assert_eq!(value["error"], "region limit exceeded");
    }

    #[test]
    fn test_exit_event_deserialize() {
        let json = r#"{"event": "didExitRegion", "identifier": "office", "timestamp": 1.0}"#;
        let event: RegionEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.event, RegionEventKind::DidExitRegion);
        assert_eq!(event.identifier, "office");
        assert_eq!(event.error, None);
    }

    #[test]
    fn test_location_update_fields() {
        let event = LocationUpdateEvent::new(24.8615, 67.0099);
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["latitude"], 24.8615);
        assert_eq!(value["longitude"], 67.0099);
        assert!(value["timestamp"].as_f64().unwrap() > 0.0);
    }
}
