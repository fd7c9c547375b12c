//! Fuzz target: `dispatcher::dispatch`
//!
//! Splits the input into a topic selector and a payload, runs it through
//! the command dispatcher, and checks that rejected commands never touch
//! the actuator state or the outputs.
//!
//! cargo fuzz run fuzz_command_dispatch

#![no_main]

use libfuzzer_sys::fuzz_target;
use plantnode::app::actuators::{Actuator, ActuatorState};
use plantnode::app::dispatcher::{dispatch, DispatchOutcome};
use plantnode::app::ports::ActuatorPort;
use plantnode::error::ActuatorError;
use plantnode::topics;

#[derive(Default)]
struct Outputs {
    writes: usize,
}

impl ActuatorPort for Outputs {
    fn drive(&mut self, _actuator: Actuator, _on: bool) -> Result<(), ActuatorError> {
        self.writes += 1;
        Ok(())
    }
}

fuzz_target!(|data: &[u8]| {
    let Some((&selector, payload)) = data.split_first() else {
        return;
    };
    // Mostly real topics, occasionally an unknown one.
    let topic = match selector % 5 {
        4 => "plant-iot/actuators/unknown",
        i => topics::SUBSCRIPTIONS[usize::from(i)],
    };

    let mut state = ActuatorState::new();
    let before = state;
    let mut outputs = Outputs::default();

    match dispatch(&mut state, &mut outputs, topic, payload) {
        DispatchOutcome::Applied(_) => assert!(outputs.writes >= 1),
        DispatchOutcome::Rejected(_) => {
            assert_eq!(outputs.writes, 0);
            assert_eq!(state, before);
        }
    }
});
