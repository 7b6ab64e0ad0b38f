//! State change events published to observers (sensor/UI layers)

use crate::state::DeltaSet;
use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, channel::Channel};
use serde::{Deserialize, Serialize};

pub const STATE_CHANGE_CHANNEL_SIZE: usize = 16;

/// Attributes of one device changed by a single notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateChange {
    pub address: String,
    pub changes: DeltaSet,
}

impl StateChange {
    pub fn to_json(&self) -> serde_json::Value {
        let changes = self
            .changes
            .iter()
            .map(|delta| {
                (
                    delta.attribute.as_str().to_string(),
                    serde_json::to_value(&delta.value).unwrap_or(serde_json::Value::Null),
                )
            })
            .collect::<serde_json::Map<_, _>>();

        serde_json::json!({
            "address": self.address,
            "changes": changes,
        })
    }
}

pub type StateChangeChannel =
    Channel<CriticalSectionRawMutex, StateChange, STATE_CHANGE_CHANNEL_SIZE>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Attribute, AttributeValue, Delta};
    use crate::types::TimerStatus;

    #[test]
    fn test_state_change_json_is_keyed_by_attribute() {
        let mut changes = DeltaSet::new();
        changes
            .push(Delta {
                attribute: Attribute::BatteryLevel,
                value: AttributeValue::Integer(80),
            })
            .unwrap();
        changes
            .push(Delta {
                attribute: Attribute::TimerStatus,
                value: AttributeValue::Status(TimerStatus::Stopped),
            })
            .unwrap();

        let event = StateChange {
            address: "AA:BB".to_string(),
            changes,
        };
        let json = event.to_json();
        assert_eq!(json["address"], "AA:BB");
        assert_eq!(json["changes"]["battery_level"], 80);
        assert_eq!(json["changes"]["timer_status"], "stopped");
    }
}
