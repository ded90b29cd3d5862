use std::sync::Arc;

use region_monitor_core::{Dispatch, NotificationCenter, PlatformEvent, Subscribers};
use tauri::{AppHandle, Manager, Runtime};

use crate::SharedState;

/// Forward a callback from the native location service.
///
/// Native delegates call this from their own threads. It blocks on the state
/// lock and must not be called from an async task; use
/// [`handle_platform_event`] there.
pub fn dispatch_platform_event<R: Runtime>(app: &AppHandle<R>, event: PlatformEvent) {
    dispatch_blocking(&app.state::<SharedState>(), event);
}

/// Async variant of [`dispatch_platform_event`].
pub async fn handle_platform_event<R: Runtime>(app: &AppHandle<R>, event: PlatformEvent) {
    dispatch(&app.state::<SharedState>(), event).await;
}

fn dispatch_blocking(state: &SharedState, event: PlatformEvent) {
    let mut state_guard = state.blocking_lock();
    let outbound = prepare(&mut state_guard, event);
    drop(state_guard);

    if let Some(outbound) = outbound {
        outbound.run();
    }
}

async fn dispatch(state: &SharedState, event: PlatformEvent) {
    let mut state_guard = state.lock().await;
    let outbound = prepare(&mut state_guard, event);
    drop(state_guard);

    if let Some(outbound) = outbound {
        outbound.run();
    }
}

/// Work to run once the state lock is released.
struct Outbound {
    dispatch: Dispatch,
    notifications: Arc<dyn NotificationCenter>,
    subscribers: Arc<Subscribers>,
}

impl Outbound {
    fn run(self) {
        self.dispatch
            .run(self.notifications.as_ref(), &self.subscribers);
    }
}

fn prepare(state: &mut crate::State, event: PlatformEvent) -> Option<Outbound> {
    match state.monitor_mut() {
        Ok(monitor) => Some(Outbound {
            dispatch: monitor.prepare_platform_event(event),
            notifications: Arc::clone(monitor.notification_center()),
            subscribers: Arc::clone(monitor.subscribers()),
        }),
        Err(_) => {
            tracing::warn!(?event, reason = "not_initialized", "platform_event_dropped");
            None
        }
    }
}
