//! Command dispatcher: inbound message → actuator state + outputs.
//!
//! Runs synchronously on the control thread for every delivered message.
//! Never blocks, never panics; anything it cannot use is discarded.

use log::{info, warn};

use crate::app::actuators::{Actuator, ActuatorState};
use crate::app::commands::{self, Command, Rejection};
use crate::app::ports::ActuatorPort;

/// What happened to one inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Applied(Command),
    Rejected(Rejection),
}

impl DispatchOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }
}

/// Decode `(topic, payload)` and, if valid, apply it.
pub fn dispatch(
    state: &mut ActuatorState,
    outputs: &mut impl ActuatorPort,
    topic: &str,
    payload: &[u8],
) -> DispatchOutcome {
    match commands::decode(topic, payload) {
        Ok(cmd) => {
            apply(state, outputs, cmd);
            DispatchOutcome::Applied(cmd)
        }
        Err(rejection) => {
            match rejection {
                Rejection::UnknownTopic => info!("dispatch: ignoring topic {}", topic),
                Rejection::Malformed(e) => warn!("dispatch: {} on {}, discarded", e, topic),
                Rejection::UnrecognizedAction => {
                    warn!("dispatch: unrecognised action on {}, state unchanged", topic);
                }
            }
            DispatchOutcome::Rejected(rejection)
        }
    }
}

/// Record the commanded state and drive the matching outputs.
///
/// The state flag is updated even if the GPIO write fails: it records
/// what was commanded, and the next command retries the write.
pub fn apply(state: &mut ActuatorState, outputs: &mut impl ActuatorPort, cmd: Command) {
    match cmd {
        Command::Set { actuator, on } => {
            state.set(actuator, on);
            drive(outputs, actuator, on);
        }
        Command::SetAll(on) => {
            state.set_all(on);
            for actuator in Actuator::ALL {
                drive(outputs, actuator, on);
            }
        }
    }
}

fn drive(outputs: &mut impl ActuatorPort, actuator: Actuator, on: bool) {
    if let Err(e) = outputs.drive(actuator, on) {
        warn!("dispatch: {} output write failed: {}", actuator, e);
    }
    info!("{} turned {}", actuator, if on { "ON" } else { "OFF" });
}
