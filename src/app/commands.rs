//! Inbound actuator commands and their wire payloads.
//!
//! Commands arrive over MQTT as JSON.  [`decode`] resolves the topic and
//! payload into a typed [`Command`] exactly once; nothing downstream ever
//! compares strings again.

use serde::{Deserialize, Serialize};

use crate::app::actuators::Actuator;
use crate::error::DecodeError;
use crate::topics::InboundTopic;

/// `plant-iot/actuators/{pump,fan,grow-light}` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActuatorCommandPayload {
    pub action: heapless::String<16>,
}

/// `plant-iot/control/all` payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkCommandPayload {
    pub enable: bool,
}

/// Wire value of `action` for switching an actuator on.
pub const ACTION_ON: &str = "ON";
/// Wire value of `action` for switching an actuator off.
pub const ACTION_OFF: &str = "OFF";

/// A decoded, validated actuator command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Switch one actuator.
    Set { actuator: Actuator, on: bool },
    /// Switch every actuator to the same state.
    SetAll(bool),
}

/// Why an inbound message did not produce a [`Command`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Not one of the subscribed command topics.
    UnknownTopic,
    /// Payload is not the expected JSON shape.
    Malformed(DecodeError),
    /// Well-formed payload, but `action` is neither `ON` nor `OFF`.
    UnrecognizedAction,
}

/// Resolve an inbound `(topic, payload)` pair into a [`Command`].
pub fn decode(topic: &str, payload: &[u8]) -> Result<Command, Rejection> {
    let topic = InboundTopic::parse(topic).ok_or(Rejection::UnknownTopic)?;

    match topic {
        InboundTopic::Actuator(actuator) => {
            let msg: ActuatorCommandPayload = serde_json::from_slice(payload)
                .map_err(|_| Rejection::Malformed(DecodeError::MalformedPayload))?;
            let on = match msg.action.as_str() {
                ACTION_ON => true,
                ACTION_OFF => false,
                _ => return Err(Rejection::UnrecognizedAction),
            };
            Ok(Command::Set { actuator, on })
        }
        InboundTopic::ControlAll => {
            let msg: BulkCommandPayload = serde_json::from_slice(payload)
                .map_err(|_| Rejection::Malformed(DecodeError::MalformedPayload))?;
            Ok(Command::SetAll(msg.enable))
        }
    }
}

impl Command {
    /// Topic and JSON payload that [`decode`] maps back to `self`.
    pub fn encode(&self) -> (&'static str, serde_json::Result<Vec<u8>>) {
        match *self {
            Command::Set { actuator, on } => {
                let mut action = heapless::String::new();
                // Both literals fit the 16-byte buffer.
                let _ = action.push_str(if on { ACTION_ON } else { ACTION_OFF });
                (
                    InboundTopic::Actuator(actuator).as_str(),
                    serde_json::to_vec(&ActuatorCommandPayload { action }),
                )
            }
            Command::SetAll(enable) => (
                InboundTopic::ControlAll.as_str(),
                serde_json::to_vec(&BulkCommandPayload { enable }),
            ),
        }
    }
}
