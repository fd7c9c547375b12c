//! MQTT topic names.
//!
//! Single source of truth for every topic the node publishes or
//! subscribes to.  Inbound topics are resolved to [`InboundTopic`] once,
//! at decode time.

use crate::app::actuators::Actuator;

// ---------------------------------------------------------------------------
// Outbound: telemetry
// ---------------------------------------------------------------------------

/// Aggregate telemetry (authoritative schema).
pub const SENSORS_AGGREGATED: &str = "plant-iot/sensors/aggregated";
pub const SENSORS_TEMPERATURE: &str = "plant-iot/sensors/temperature";
pub const SENSORS_HUMIDITY: &str = "plant-iot/sensors/humidity";
pub const SENSORS_SOIL_MOISTURE: &str = "plant-iot/sensors/soil-moisture";
pub const SENSORS_LIGHT: &str = "plant-iot/sensors/light";

// ---------------------------------------------------------------------------
// Outbound: status
// ---------------------------------------------------------------------------

pub const STATUS_PUMP: &str = "plant-iot/status/pump";
pub const STATUS_FAN: &str = "plant-iot/status/fan";
pub const STATUS_GROW_LIGHT: &str = "plant-iot/status/grow-light";
/// Aggregate status: all actuators + RSSI + uptime.
pub const STATUS_ALL: &str = "plant-iot/status/all";

// ---------------------------------------------------------------------------
// Inbound: commands
// ---------------------------------------------------------------------------

pub const CMD_PUMP: &str = "plant-iot/actuators/pump";
pub const CMD_FAN: &str = "plant-iot/actuators/fan";
pub const CMD_GROW_LIGHT: &str = "plant-iot/actuators/grow-light";
/// Bulk on/off for every actuator.
pub const CMD_ALL: &str = "plant-iot/control/all";

/// Topics (re-)subscribed on every transition into Connected.
pub const SUBSCRIPTIONS: [&str; 4] = [CMD_PUMP, CMD_FAN, CMD_GROW_LIGHT, CMD_ALL];

/// Per-actuator status topic.
pub fn status_topic(actuator: Actuator) -> &'static str {
    match actuator {
        Actuator::Pump => STATUS_PUMP,
        Actuator::Fan => STATUS_FAN,
        Actuator::GrowLight => STATUS_GROW_LIGHT,
    }
}

/// A recognised inbound topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboundTopic {
    Actuator(Actuator),
    ControlAll,
}

impl InboundTopic {
    /// Resolve a topic string; `None` for anything the node does not handle.
    pub fn parse(topic: &str) -> Option<Self> {
        match topic {
            CMD_PUMP => Some(Self::Actuator(Actuator::Pump)),
            CMD_FAN => Some(Self::Actuator(Actuator::Fan)),
            CMD_GROW_LIGHT => Some(Self::Actuator(Actuator::GrowLight)),
            CMD_ALL => Some(Self::ControlAll),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Actuator(Actuator::Pump) => CMD_PUMP,
            Self::Actuator(Actuator::Fan) => CMD_FAN,
            Self::Actuator(Actuator::GrowLight) => CMD_GROW_LIGHT,
            Self::ControlAll => CMD_ALL,
        }
    }
}
