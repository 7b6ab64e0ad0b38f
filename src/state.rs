use crate::format::format_timer;
use crate::types::{DeviceState, ParsedFrame, TimerStatus, TimerStatusReport, WeightTelemetry};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

/// A weight frame touches at most this many attributes.
pub const MAX_CHANGES_PER_FRAME: usize = 8;

pub type DeltaSet = heapless::Vec<Delta, MAX_CHANGES_PER_FRAME>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    Weight,
    FlowRate,
    Timer,
    RawTimerMs,
    BatteryLevel,
    BeepLevel,
    AutoOffMinutes,
    FlowSmoothing,
    TimerStatus,
}

impl Attribute {
    pub fn as_str(&self) -> &'static str {
        match self {
            Attribute::Weight => "weight",
            Attribute::FlowRate => "flow_rate",
            Attribute::Timer => "timer",
            Attribute::RawTimerMs => "raw_timer_ms",
            Attribute::BatteryLevel => "battery_level",
            Attribute::BeepLevel => "beep_level",
            Attribute::AutoOffMinutes => "auto_off_minutes",
            Attribute::FlowSmoothing => "flow_smoothing",
            Attribute::TimerStatus => "timer_status",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Float(f64),
    Integer(u32),
    Bool(bool),
    Text(String),
    Status(TimerStatus),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delta {
    pub attribute: Attribute,
    pub value: AttributeValue,
}

fn update_field<T: PartialEq>(
    slot: &mut Option<T>,
    new_value: T,
    attribute: Attribute,
    to_value: impl FnOnce(&T) -> AttributeValue,
    changes: &mut DeltaSet,
) {
    if slot.as_ref() == Some(&new_value) {
        return;
    }
    let value = to_value(&new_value);
    *slot = Some(new_value);
    if changes.push(Delta { attribute, value }).is_err() {
        warn!("Change set full, not reporting {} change", attribute.as_str());
    }
}

/// Merge a parsed frame into `state`, returning only the attributes whose
/// value actually changed. `None` leaves the state untouched.
pub fn apply(state: &mut DeviceState, parsed: Option<&ParsedFrame>) -> DeltaSet {
    match parsed {
        Some(frame) => apply_frame(state, frame),
        None => DeltaSet::new(),
    }
}

pub fn apply_frame(state: &mut DeviceState, frame: &ParsedFrame) -> DeltaSet {
    let changes = match frame {
        ParsedFrame::Weight(weight) => apply_weight(state, weight),
        ParsedFrame::Status(status) => apply_timer_status(state, status),
    };

    if !changes.is_empty() {
        debug!(
            "{}: {} frame changed {} attribute(s)",
            state.address,
            frame.kind(),
            changes.len()
        );
    }

    changes
}

fn apply_weight(state: &mut DeviceState, weight: &WeightTelemetry) -> DeltaSet {
    let data = &mut state.data;
    let mut changes = DeltaSet::new();

    update_field(
        &mut data.weight,
        weight.weight_g,
        Attribute::Weight,
        |v| AttributeValue::Float(*v),
        &mut changes,
    );
    update_field(
        &mut data.flow_rate,
        weight.flow_rate_g_per_s,
        Attribute::FlowRate,
        |v| AttributeValue::Float(*v),
        &mut changes,
    );
    update_field(
        &mut data.timer,
        format_timer(weight.timer_ms),
        Attribute::Timer,
        |v| AttributeValue::Text(v.clone()),
        &mut changes,
    );
    update_field(
        &mut data.raw_timer_ms,
        weight.timer_ms,
        Attribute::RawTimerMs,
        |v| AttributeValue::Integer(*v),
        &mut changes,
    );
    update_field(
        &mut data.battery_level,
        weight.battery_percent,
        Attribute::BatteryLevel,
        |v| AttributeValue::Integer(*v as u32),
        &mut changes,
    );
    update_field(
        &mut data.beep_level,
        weight.beep_level,
        Attribute::BeepLevel,
        |v| AttributeValue::Integer(*v as u32),
        &mut changes,
    );
    update_field(
        &mut data.auto_off_minutes,
        weight.auto_off_minutes,
        Attribute::AutoOffMinutes,
        |v| AttributeValue::Integer(*v as u32),
        &mut changes,
    );
    update_field(
        &mut data.flow_smoothing,
        weight.flow_smoothing,
        Attribute::FlowSmoothing,
        |v| AttributeValue::Bool(*v),
        &mut changes,
    );

    changes
}

fn apply_timer_status(state: &mut DeviceState, report: &TimerStatusReport) -> DeltaSet {
    let mut changes = DeltaSet::new();
    let previous = state.data.timer_status;

    update_field(
        &mut state.data.timer_status,
        report.status,
        Attribute::TimerStatus,
        |v| AttributeValue::Status(*v),
        &mut changes,
    );

    if !changes.is_empty() {
        info!(
            "{}: timer status changed: {:?} -> {:?}",
            state.address, previous, report.status
        );
    }

    changes
}
