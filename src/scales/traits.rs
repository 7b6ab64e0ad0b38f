//! Scale abstraction traits
//!
//! The transport layer talks to a scale through these: it matches devices by
//! name, subscribes to the characteristics it is told about, feeds
//! notifications into `parse_data` and writes whatever `format_command`
//! returns.

use crate::protocol::FrameError;
use crate::types::ParsedFrame;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScaleCommand {
    Tare,
    StartTimer,
    StopTimer,
    ResetTimer,
    TareAndStartTimer,
    SetBeepLevel(u8),
    SetAutoOffMinutes(u8),
    SetFlowSmoothing(bool),
}

impl ScaleCommand {
    pub fn name(&self) -> &'static str {
        match self {
            ScaleCommand::Tare => "tare",
            ScaleCommand::StartTimer => "start timer",
            ScaleCommand::StopTimer => "stop timer",
            ScaleCommand::ResetTimer => "reset timer",
            ScaleCommand::TareAndStartTimer => "tare and start timer",
            ScaleCommand::SetBeepLevel(_) => "set beep level",
            ScaleCommand::SetAutoOffMinutes(_) => "set auto-off minutes",
            ScaleCommand::SetFlowSmoothing(_) => "set flow smoothing",
        }
    }
}

/// Wire-level description of a BLE scale
pub trait ScaleProtocol {
    /// Device name prefix advertised by the scale
    fn get_ble_name_pattern(&self) -> &str;

    fn get_service_uuid(&self) -> uuid::Uuid;

    fn get_data_characteristic_uuid(&self) -> uuid::Uuid;

    fn get_command_characteristic_uuid(&self) -> Option<uuid::Uuid>;

    fn parse_data(&self, raw_data: &[u8]) -> Result<ParsedFrame, FrameError>;

    /// Encode a command for writing to the command characteristic
    fn format_command(&self, command: ScaleCommand) -> Vec<u8>;
}
