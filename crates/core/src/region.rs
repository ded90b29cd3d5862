//! Region geometry and the descriptors exchanged with the application layer.

use serde::{Deserialize, Serialize};

use crate::error::{MonitorError, Result};
use crate::store::NotificationContent;

/// A circular region as registered with the platform location service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitoredRegion {
    pub identifier: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Meters.
    pub radius: f64,
    pub notify_on_entry: bool,
    pub notify_on_exit: bool,
}

impl MonitoredRegion {
    pub fn validate(&self) -> Result<()> {
        validate_identifier(&self.identifier)?;
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(MonitorError::InvalidArguments(format!(
                "latitude out of range: {}",
                self.latitude
            )));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(MonitorError::InvalidArguments(format!(
                "longitude out of range: {}",
                self.longitude
            )));
        }
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(MonitorError::InvalidArguments(format!(
                "radius must be positive: {}",
                self.radius
            )));
        }
        Ok(())
    }
}

pub(crate) fn validate_identifier(identifier: &str) -> Result<()> {
    if identifier.trim().is_empty() {
        return Err(MonitorError::InvalidArguments(
            "identifier must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn default_notify_on_entry() -> bool {
    true
}

/// Arguments of a `setupGeofence` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeofenceRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub radius: f64,
    pub identifier: String,
    #[serde(default = "default_notify_on_entry")]
    pub notify_on_entry: bool,
    #[serde(default)]
    pub notify_on_exit: bool,
    #[serde(default)]
    pub notification_title: Option<String>,
    #[serde(default)]
    pub notification_body: Option<String>,
}

impl GeofenceRequest {
    pub fn new(identifier: impl Into<String>, latitude: f64, longitude: f64, radius: f64) -> Self {
        Self {
            latitude,
            longitude,
            radius,
            identifier: identifier.into(),
            notify_on_entry: true,
            notify_on_exit: false,
            notification_title: None,
            notification_body: None,
        }
    }

    pub fn with_notification(mut self, title: impl Into<String>, body: impl Into<String>) -> Self {
        self.notification_title = Some(title.into());
        self.notification_body = Some(body.into());
        self
    }

    pub fn region(&self) -> MonitoredRegion {
        MonitoredRegion {
            identifier: self.identifier.clone(),
            latitude: self.latitude,
            longitude: self.longitude,
            radius: self.radius,
            notify_on_entry: self.notify_on_entry,
            notify_on_exit: self.notify_on_exit,
        }
    }
}

/// A monitored region merged with its stored notification content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionDescriptor {
    pub identifier: String,
    pub latitude: f64,
    pub longitude: f64,
    pub radius: f64,
    pub notify_on_entry: bool,
    pub notify_on_exit: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_body: Option<String>,
}

impl RegionDescriptor {
    pub fn new(region: MonitoredRegion, content: Option<&NotificationContent>) -> Self {
        Self {
            identifier: region.identifier,
            latitude: region.latitude,
            longitude: region.longitude,
            radius: region.radius,
            notify_on_entry: region.notify_on_entry,
            notify_on_exit: region.notify_on_exit,
            notification_title: content.map(|c| c.title.clone()),
            notification_body: content.map(|c| c.body.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_defaults_from_json() {
        let request: GeofenceRequest = serde_json::from_value(json!({
            "latitude": 24.8615,
            "longitude": 67.0099,
            "radius": 200.0,
            "identifier": "KarachiDangerZone"
        }))
        .unwrap();

        assert!(request.notify_on_entry);
        assert!(!request.notify_on_exit);
        assert_eq!(request.notification_title, None);
        assert_eq!(request.notification_body, None);
    }

    #[test]
    fn test_validate_rejects_bad_geometry() {
        let mut region = GeofenceRequest::new("a", 10.0, 10.0, 100.0).region();
        assert!(region.validate().is_ok());

        region.radius = 0.0;
        assert!(matches!(
            region.validate(),
            Err(MonitorError::InvalidArguments(_))
        ));

        region.radius = f64::NAN;
        assert!(region.validate().is_err());

        region.radius = 50.0;
        region.latitude = 91.0;
        assert!(region.validate().is_err());

        region.latitude = 0.0;
        region.longitude = -181.0;
        assert!(region.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_blank_identifier() {
        let region = GeofenceRequest::new("  ", 0.0, 0.0, 10.0).region();
        assert!(matches!(
            region.validate(),
            Err(MonitorError::InvalidArguments(_))
        ));
    }

    #[test]
    fn test_descriptor_omits_missing_content() {
        let region = GeofenceRequest::new("a", 1.0, 2.0, 3.0).region();
        let value = serde_json::to_value(RegionDescriptor::new(region, None)).unwrap();

        assert_eq!(value["identifier"], "a");
        assert_eq!(value["notifyOnEntry"], true);
        assert!(value.get("notificationTitle").is_none());
        assert!(value.get("notificationBody").is_none());
    }
}
