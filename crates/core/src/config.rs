//! Plugin configuration and the fallback notification text.

use serde::{Deserialize, Serialize};

use crate::region::GeofenceRequest;

/// Placeholder replaced by the region identifier in the fallback body.
pub const IDENTIFIER_PLACEHOLDER: &str = "{identifier}";

/// Plugin configuration, read from the `plugins.region-monitor` section of
/// the host application's config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegionMonitorConfig {
    /// SQLite file name inside the app data directory.
    pub database_file: String,
    pub fallback_title: String,
    /// Body used for regions without stored content.
    pub fallback_body_template: String,
    /// Ask for "always" access once "when in use" is granted.
    pub request_always_authorization: bool,
    /// Geofences installed once location services start.
    pub default_regions: Vec<GeofenceRequest>,
}

impl Default for RegionMonitorConfig {
    fn default() -> Self {
        Self {
            database_file: "region-monitor.db".to_string(),
            fallback_title: "📍 Region Alert".to_string(),
            fallback_body_template: format!("You've entered region: {IDENTIFIER_PLACEHOLDER}"),
            request_always_authorization: true,
            default_regions: Vec::new(),
        }
    }
}

pub(crate) fn render_template(template: &str, identifier: &str) -> String {
    template.replace(IDENTIFIER_PLACEHOLDER, identifier)
}
