use serde::{Deserialize, Serialize};

pub const DEFAULT_DEVICE_NAME: &str = "Bookoo Scale";
pub const DEFAULT_MODEL: &str = "Bookoo Mini Scale";
pub const MANUFACTURER: &str = "Bookoo Coffee";

pub const BEEP_LEVEL_MIN: u8 = 0;
pub const BEEP_LEVEL_MAX: u8 = 5;
pub const AUTO_OFF_MINUTES_MIN: u8 = 1;
pub const AUTO_OFF_MINUTES_MAX: u8 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    Started,
    Stopped,
}

impl TimerStatus {
    pub fn from_status_byte(byte: u8) -> Self {
        if byte == 0x01 {
            TimerStatus::Started
        } else {
            TimerStatus::Stopped
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimerStatus::Started => "started",
            TimerStatus::Stopped => "stopped",
        }
    }
}

/// Decoded weight notification (frame kind 0x0B)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightTelemetry {
    pub timer_ms: u32,
    pub weight_g: f64,
    pub flow_rate_g_per_s: f64,
    pub battery_percent: u8,
    pub auto_off_minutes: u16,
    pub beep_level: u8,
    pub flow_smoothing: bool,
}

/// Decoded timer status notification (frame kind 0x0D)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerStatusReport {
    pub status: TimerStatus,
    pub raw_status_byte: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ParsedFrame {
    Weight(WeightTelemetry),
    Status(TimerStatusReport),
}

impl ParsedFrame {
    pub fn kind(&self) -> &'static str {
        match self {
            ParsedFrame::Weight(_) => "weight",
            ParsedFrame::Status(_) => "status",
        }
    }
}

/// Latest known readings and settings of one scale.
///
/// `is_stable` and `tare_active` have no encoding in any known frame and are
/// never written by the decoder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceData {
    pub weight: Option<f64>,
    pub flow_rate: Option<f64>,
    pub timer: Option<String>,
    pub raw_timer_ms: Option<u32>,
    pub battery_level: Option<u8>,
    pub is_stable: Option<bool>,
    pub tare_active: Option<bool>,
    pub beep_level: Option<u8>,
    pub auto_off_minutes: Option<u16>,
    pub flow_smoothing: Option<bool>,
    pub timer_status: Option<TimerStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceState {
    pub address: String,
    pub device_name: String,
    pub model: String,
    pub manufacturer: String,
    pub firmware_version: Option<String>,
    pub hardware_version: Option<String>,
    pub data: DeviceData,
}

impl DeviceState {
    pub fn new(address: impl Into<String>, device_name: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            device_name: device_name.into(),
            model: DEFAULT_MODEL.to_string(),
            manufacturer: MANUFACTURER.to_string(),
            firmware_version: None,
            hardware_version: None,
            data: DeviceData::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_status_from_byte() {
        assert_eq!(TimerStatus::from_status_byte(0x01), TimerStatus::Started);
        assert_eq!(TimerStatus::from_status_byte(0x00), TimerStatus::Stopped);
        assert_eq!(TimerStatus::from_status_byte(0x02), TimerStatus::Stopped);
        assert_eq!(TimerStatus::Started.as_str(), "started");
    }

    #[test]
    fn test_new_device_state_is_empty() {
        let state = DeviceState::new("AA:BB:CC:DD:EE:FF", "BOOKOO_SC 1234");
        assert_eq!(state.model, DEFAULT_MODEL);
        assert_eq!(state.manufacturer, MANUFACTURER);
        assert_eq!(state.data, DeviceData::default());
        assert!(state.data.is_stable.is_none());
    }

    #[test]
    fn test_parsed_frame_serializes_with_kind_tag() {
        let frame = ParsedFrame::Status(TimerStatusReport {
            status: TimerStatus::Started,
            raw_status_byte: 1,
        });
        let json = serde_json::to_value(&frame).unwrap();
        assert_eq!(json["kind"], "status");
        assert_eq!(json["status"], "started");
        assert_eq!(frame.kind(), "status");
    }
}
