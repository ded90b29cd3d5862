//! Location authorization status and the escalation state machine.
//!
//! The platform reports authorization changes asynchronously. The flow turns
//! each reported status into the next step: ask for when-in-use access, then
//! escalate to always, then start location services.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AuthorizationStatus {
    NotDetermined,
    Restricted,
    Denied,
    AuthorizedWhenInUse,
    AuthorizedAlways,
    Unknown,
}

impl AuthorizationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthorizationStatus::NotDetermined => "notDetermined",
            AuthorizationStatus::Restricted => "restricted",
            AuthorizationStatus::Denied => "denied",
            AuthorizationStatus::AuthorizedWhenInUse => "authorizedWhenInUse",
            AuthorizationStatus::AuthorizedAlways => "authorizedAlways",
            AuthorizationStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for AuthorizationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Step to take after an authorization change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationAction {
    RequestWhenInUse,
    RequestAlways,
    /// Start location updates and install default regions.
    StartServices,
    None,
}

/// Escalation state machine: not determined -> when in use -> always.
#[derive(Debug, Clone)]
pub struct AuthorizationFlow {
    escalate_to_always: bool,
    last: Option<AuthorizationStatus>,
    services_started: bool,
}

impl AuthorizationFlow {
    pub fn new(escalate_to_always: bool) -> Self {
        Self {
            escalate_to_always,
            last: None,
            services_started: false,
        }
    }

    pub fn services_started(&self) -> bool {
        self.services_started
    }

    /// Feed a status reported by the platform.
    pub fn on_change(&mut self, status: AuthorizationStatus) -> AuthorizationAction {
        if self.last == Some(status) {
            return AuthorizationAction::None;
        }
        let previous = self.last.replace(status);
        tracing::info!(
            from = previous.map(|s| s.as_str()).unwrap_or("none"),
            to = %status,
            "authorization_changed"
        );

        match status {
            AuthorizationStatus::NotDetermined => {
                self.services_started = false;
                AuthorizationAction::RequestWhenInUse
            }
            AuthorizationStatus::AuthorizedWhenInUse if self.escalate_to_always => {
                AuthorizationAction::RequestAlways
            }
            AuthorizationStatus::AuthorizedWhenInUse | AuthorizationStatus::AuthorizedAlways => {
                if self.services_started {
                    AuthorizationAction::None
                } else {
                    self.services_started = true;
                    AuthorizationAction::StartServices
                }
            }
            AuthorizationStatus::Denied | AuthorizationStatus::Restricted => {
                tracing::warn!(status = %status, "location permission denied");
                self.services_started = false;
                AuthorizationAction::None
            }
            AuthorizationStatus::Unknown => AuthorizationAction::None,
        }
    }
}
