// bookoo.rs - Bookoo Mini Scale protocol descriptor and command layer

use crate::protocol::{
    build_reset_timer, build_set_auto_off, build_set_beep_level, build_set_flow_smoothing,
    build_start_timer, build_stop_timer, build_tare, build_tare_and_start, parse_frame,
    FrameError,
};
use crate::scales::traits::{ScaleCommand, ScaleProtocol};
use crate::types::{
    ParsedFrame, AUTO_OFF_MINUTES_MAX, AUTO_OFF_MINUTES_MIN, BEEP_LEVEL_MAX, BEEP_LEVEL_MIN,
};
use log::{debug, info};

pub const DEVICE_NAME_PREFIX: &str = "BOOKOO_SC";

// Bookoo scale UUIDs - scale uses 16-bit UUIDs on the Bluetooth base UUID
pub const BOOKOO_SERVICE_UUID: uuid::Uuid =
    uuid::Uuid::from_u128(0x0000_0FFE_0000_1000_8000_00805F9B34FB);
pub const WEIGHT_CHAR_UUID: uuid::Uuid =
    uuid::Uuid::from_u128(0x0000_FF11_0000_1000_8000_00805F9B34FB);
pub const COMMAND_CHAR_UUID: uuid::Uuid =
    uuid::Uuid::from_u128(0x0000_FF12_0000_1000_8000_00805F9B34FB);

pub fn is_bookoo_device_name(name: &str) -> bool {
    let is_bookoo = name.starts_with(DEVICE_NAME_PREFIX) || name.contains("BOOKOO");
    if is_bookoo {
        debug!("Bookoo scale detected by name: {}", name);
    }
    is_bookoo
}

pub fn clamp_beep_level(level: u8) -> u8 {
    level.clamp(BEEP_LEVEL_MIN, BEEP_LEVEL_MAX)
}

pub fn clamp_auto_off_minutes(minutes: u8) -> u8 {
    minutes.clamp(AUTO_OFF_MINUTES_MIN, AUTO_OFF_MINUTES_MAX)
}

#[derive(Debug, Default, Clone, Copy)]
pub struct BookooScale;

impl BookooScale {
    pub fn new() -> Self {
        Self
    }

    /// Command frame for `command`, with settings clamped to the range the
    /// scale accepts. Does not touch device state: timer status only
    /// changes once the scale reports it.
    pub fn command_frame(&self, command: ScaleCommand) -> [u8; 6] {
        let frame = match command {
            ScaleCommand::Tare => build_tare(),
            ScaleCommand::StartTimer => build_start_timer(),
            ScaleCommand::StopTimer => build_stop_timer(),
            ScaleCommand::ResetTimer => build_reset_timer(),
            ScaleCommand::TareAndStartTimer => build_tare_and_start(),
            ScaleCommand::SetBeepLevel(level) => build_set_beep_level(clamp_beep_level(level)),
            ScaleCommand::SetAutoOffMinutes(minutes) => {
                build_set_auto_off(clamp_auto_off_minutes(minutes))
            }
            ScaleCommand::SetFlowSmoothing(enabled) => build_set_flow_smoothing(enabled),
        };
        info!("Prepared {} command: {:02X?}", command.name(), frame);
        frame
    }
}

impl ScaleProtocol for BookooScale {
    fn get_ble_name_pattern(&self) -> &str {
        DEVICE_NAME_PREFIX
    }

    fn get_service_uuid(&self) -> uuid::Uuid {
        BOOKOO_SERVICE_UUID
    }

    fn get_data_characteristic_uuid(&self) -> uuid::Uuid {
        WEIGHT_CHAR_UUID
    }

    fn get_command_characteristic_uuid(&self) -> Option<uuid::Uuid> {
        Some(COMMAND_CHAR_UUID)
    }

    fn parse_data(&self, raw_data: &[u8]) -> Result<ParsedFrame, FrameError> {
        parse_frame(raw_data)
    }

    fn format_command(&self, command: ScaleCommand) -> Vec<u8> {
        self.command_frame(command).to_vec()
    }
}
