use crate::types::{ParsedFrame, TimerStatus, TimerStatusReport, WeightTelemetry};
use log::debug;

pub const PRODUCT_ID: u8 = 0x03;
pub const COMMAND_GROUP: u8 = 0x0A;
pub const MSG_TYPE_WEIGHT: u8 = 0x0B;
pub const MSG_TYPE_TIMER_STATUS: u8 = 0x0D;

pub const NOTIFICATION_LEN: usize = 21;
pub const COMMAND_LEN: usize = 6;

pub const OP_TARE: u8 = 0x01;
pub const OP_SET_BEEP: u8 = 0x02;
pub const OP_SET_AUTO_OFF: u8 = 0x03;
pub const OP_START_TIMER: u8 = 0x04;
pub const OP_STOP_TIMER: u8 = 0x05;
pub const OP_RESET_TIMER: u8 = 0x06;
pub const OP_TARE_AND_START: u8 = 0x07;
pub const OP_SET_FLOW_SMOOTHING: u8 = 0x08;

/// Why a notification was not turned into a [`ParsedFrame`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    TooShort(usize),
    InvalidLength(usize),
    InvalidProductId(u8),
    ChecksumMismatch { expected: u8, actual: u8 },
    UnknownKind(u8),
}

impl std::fmt::Display for FrameError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            FrameError::TooShort(len) => write!(f, "frame too short: {} bytes", len),
            FrameError::InvalidLength(len) => write!(
                f,
                "invalid frame length: expected {}, got {}",
                NOTIFICATION_LEN, len
            ),
            FrameError::InvalidProductId(id) => {
                write!(f, "invalid product id: expected 0x03, got 0x{:02X}", id)
            }
            FrameError::ChecksumMismatch { expected, actual } => write!(
                f,
                "checksum mismatch: calculated 0x{:02X}, received 0x{:02X}",
                expected, actual
            ),
            FrameError::UnknownKind(kind) => write!(f, "unknown frame kind: 0x{:02X}", kind),
        }
    }
}

impl std::error::Error for FrameError {}

pub fn calculate_xor_checksum(data: &[u8]) -> u8 {
    data.iter().fold(0, |acc, &byte| acc ^ byte)
}

pub fn verify_checksum(data: &[u8]) -> bool {
    if data.len() < 2 {
        return false;
    }

    let payload = &data[..data.len() - 1];
    let expected_checksum = data[data.len() - 1];
    let calculated_checksum = calculate_xor_checksum(payload);

    if calculated_checksum != expected_checksum {
        debug!(
            "Checksum mismatch: calculated={:02X}, received={:02X}",
            calculated_checksum, expected_checksum
        );
        return false;
    }

    true
}

/// Parse a notification, reporting why it was rejected.
pub fn parse_frame(data: &[u8]) -> Result<ParsedFrame, FrameError> {
    if data.len() < 2 {
        return Err(FrameError::TooShort(data.len()));
    }

    match data[1] {
        MSG_TYPE_WEIGHT => {
            check_frame(data)?;
            Ok(ParsedFrame::Weight(decode_weight(data)))
        }
        MSG_TYPE_TIMER_STATUS if data[0] == PRODUCT_ID => {
            check_frame(data)?;
            Ok(ParsedFrame::Status(TimerStatusReport {
                status: TimerStatus::from_status_byte(data[2]),
                raw_status_byte: data[2],
            }))
        }
        kind => Err(FrameError::UnknownKind(kind)),
    }
}

/// Parse a notification from either characteristic. Malformed or unknown
/// frames are logged and yield `None`.
pub fn parse_notification(data: &[u8]) -> Option<ParsedFrame> {
    debug!("Parsing notification: {:02X?}", data);

    match parse_frame(data) {
        Ok(frame) => Some(frame),
        Err(e) => {
            debug!("Dropping notification ({}): {:02X?}", e, data);
            None
        }
    }
}

fn check_frame(data: &[u8]) -> Result<(), FrameError> {
    if data.len() != NOTIFICATION_LEN {
        return Err(FrameError::InvalidLength(data.len()));
    }

    if data[0] != PRODUCT_ID {
        return Err(FrameError::InvalidProductId(data[0]));
    }

    if !verify_checksum(data) {
        return Err(FrameError::ChecksumMismatch {
            expected: calculate_xor_checksum(&data[..NOTIFICATION_LEN - 1]),
            actual: data[NOTIFICATION_LEN - 1],
        });
    }

    Ok(())
}

fn read_u24_be(bytes: &[u8]) -> u32 {
    u32::from_be_bytes([0, bytes[0], bytes[1], bytes[2]])
}

fn signed_hundredths(sign: u8, magnitude: u32) -> f64 {
    let value = magnitude as f64 / 100.0;
    if sign != 0 {
        -value
    } else {
        value
    }
}

// Caller has checked the length, so every index below is in bounds.
fn decode_weight(data: &[u8]) -> WeightTelemetry {
    let timer_ms = read_u24_be(&data[2..5]);
    let weight_g = signed_hundredths(data[6], read_u24_be(&data[7..10]));
    let flow_raw = u16::from_be_bytes([data[11], data[12]]) as u32;
    let flow_rate_g_per_s = signed_hundredths(data[10], flow_raw);

    WeightTelemetry {
        timer_ms,
        weight_g,
        flow_rate_g_per_s,
        battery_percent: data[13],
        auto_off_minutes: u16::from_be_bytes([data[14], data[15]]),
        beep_level: data[16],
        flow_smoothing: data[17] != 0,
    }
}

fn build_command(opcode: u8, param: u8) -> [u8; COMMAND_LEN] {
    let mut command = [PRODUCT_ID, COMMAND_GROUP, opcode, param, 0x00, 0x00];
    command[COMMAND_LEN - 1] = calculate_xor_checksum(&command[..COMMAND_LEN - 1]);
    command
}

pub fn build_tare() -> [u8; COMMAND_LEN] {
    build_command(OP_TARE, 0x00)
}

pub fn build_start_timer() -> [u8; COMMAND_LEN] {
    build_command(OP_START_TIMER, 0x00)
}

pub fn build_stop_timer() -> [u8; COMMAND_LEN] {
    build_command(OP_STOP_TIMER, 0x00)
}

pub fn build_reset_timer() -> [u8; COMMAND_LEN] {
    build_command(OP_RESET_TIMER, 0x00)
}

pub fn build_tare_and_start() -> [u8; COMMAND_LEN] {
    build_command(OP_TARE_AND_START, 0x00)
}

/// Encodes `level` as-is; range clamping belongs to the command layer.
pub fn build_set_beep_level(level: u8) -> [u8; COMMAND_LEN] {
    build_command(OP_SET_BEEP, level)
}

/// Encodes `minutes` as-is; range clamping belongs to the command layer.
pub fn build_set_auto_off(minutes: u8) -> [u8; COMMAND_LEN] {
    build_command(OP_SET_AUTO_OFF, minutes)
}

pub fn build_set_flow_smoothing(enabled: bool) -> [u8; COMMAND_LEN] {
    build_command(OP_SET_FLOW_SMOOTHING, enabled as u8)
}

#[cfg(test)]
pub(crate) mod test_frames {
    use super::*;

    pub fn with_checksum(mut frame: [u8; NOTIFICATION_LEN]) -> [u8; NOTIFICATION_LEN] {
        frame[NOTIFICATION_LEN - 1] = calculate_xor_checksum(&frame[..NOTIFICATION_LEN - 1]);
        frame
    }

    /// 1234.5g, 5.6g/s, 85%, 5 min standby, buzzer 3, smoothing on, 123456ms
    pub fn weight_frame() -> [u8; NOTIFICATION_LEN] {
        with_checksum([
            0x03, 0x0B, // product, kind
            0x01, 0xE2, 0x40, // timer 123456ms
            0x00, // unit
            0x00, 0x01, 0xE2, 0x3A, // +123450
            0x00, 0x02, 0x30, // +560
            0x55, // battery
            0x00, 0x05, // standby
            0x03, // buzzer
            0x01, // smoothing
            0x00, 0x00, // reserved
            0x00,
        ])
    }

    pub fn status_frame(status: u8) -> [u8; NOTIFICATION_LEN] {
        let mut frame = [0u8; NOTIFICATION_LEN];
        frame[0] = PRODUCT_ID;
        frame[1] = MSG_TYPE_TIMER_STATUS;
        frame[2] = status;
        with_checksum(frame)
    }
}
