//! Notification dispatch
//!
//! The transport layer calls into this for every GATT notification, from the
//! weight characteristic and the command characteristic alike; byte 1 of
//! the frame says what it is. Each `DeviceState` has a single writer: the
//! caller must not dispatch into the same device from two tasks at once.

use crate::protocol::parse_notification;
use crate::state::{apply, DeltaSet};
use crate::system::config::ScaleConfig;
use crate::system::events::{StateChange, StateChangeChannel};
use crate::types::DeviceState;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::sync::Arc;

/// Parse `raw` and merge it into `state`.
pub fn on_notification(state: &mut DeviceState, raw: &[u8]) -> DeltaSet {
    let parsed = parse_notification(raw);
    if parsed.is_none() {
        debug!(
            "Notification from {} was not parsed into usable data: {:02X?}",
            state.address, raw
        );
    }
    apply(state, parsed.as_ref())
}

/// Forwards non-empty change sets to observers
#[derive(Clone, Default)]
pub struct NotificationDispatcher {
    change_channel: Option<Arc<StateChangeChannel>>,
}

impl NotificationDispatcher {
    pub fn new(change_channel: Arc<StateChangeChannel>) -> Self {
        Self {
            change_channel: Some(change_channel),
        }
    }

    /// Dispatcher that only updates state
    pub fn without_observer() -> Self {
        Self::default()
    }

    pub fn dispatch(&self, state: &mut DeviceState, raw: &[u8]) -> DeltaSet {
        let changes = on_notification(state, raw);

        if let (Some(channel), false) = (&self.change_channel, changes.is_empty()) {
            let event = StateChange {
                address: state.address.clone(),
                changes: changes.clone(),
            };
            if channel.try_send(event).is_err() {
                warn!(
                    "Failed to publish state change for {} - channel full",
                    state.address
                );
            }
        }

        changes
    }
}

/// Devices tracked by one session, keyed by address
pub struct DeviceRegistry {
    devices: HashMap<String, DeviceState>,
    dispatcher: NotificationDispatcher,
    default_name: String,
}

impl DeviceRegistry {
    pub fn new(config: &ScaleConfig, dispatcher: NotificationDispatcher) -> Self {
        Self {
            devices: HashMap::new(),
            dispatcher,
            default_name: config.name.clone(),
        }
    }

    /// Returns the record for `address`, creating it on first sight. An
    /// existing record keeps its name and readings.
    pub fn track(&mut self, address: &str, name: Option<&str>) -> &mut DeviceState {
        let default_name = &self.default_name;
        self.devices.entry(address.to_string()).or_insert_with(|| {
            let device_name = name.filter(|n| !n.is_empty()).unwrap_or(default_name.as_str());
            info!("Tracking new scale {} ({})", address, device_name);
            DeviceState::new(address, device_name)
        })
    }

    pub fn handle_notification(
        &mut self,
        address: &str,
        name: Option<&str>,
        raw: &[u8],
    ) -> DeltaSet {
        let dispatcher = self.dispatcher.clone();
        let state = self.track(address, name);
        dispatcher.dispatch(state, raw)
    }

    pub fn get(&self, address: &str) -> Option<&DeviceState> {
        self.devices.get(address)
    }

    pub fn get_mut(&mut self, address: &str) -> Option<&mut DeviceState> {
        self.devices.get_mut(address)
    }

    pub fn remove(&mut self, address: &str) -> Option<DeviceState> {
        let removed = self.devices.remove(address);
        if removed.is_some() {
            info!("Stopped tracking scale {}", address);
        }
        removed
    }

    pub fn addresses(&self) -> impl Iterator<Item = &str> {
        self.devices.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}
