//! Authoritative in-memory actuator state.
//!
//! One flag per actuator, all OFF at start-up.  Only the command
//! dispatcher writes here; telemetry and advisory rules read.

use core::fmt;

/// The three switched outputs on the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Actuator {
    Pump,
    Fan,
    GrowLight,
}

impl Actuator {
    pub const ALL: [Actuator; 3] = [Actuator::Pump, Actuator::Fan, Actuator::GrowLight];

    /// Topic segment / status key used on the wire.
    pub fn slug(self) -> &'static str {
        match self {
            Self::Pump => "pump",
            Self::Fan => "fan",
            Self::GrowLight => "grow-light",
        }
    }
}

impl fmt::Display for Actuator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pump => write!(f, "Pump"),
            Self::Fan => write!(f, "Fan"),
            Self::GrowLight => write!(f, "Grow Light"),
        }
    }
}

/// Commanded ON/OFF state of every actuator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActuatorState {
    pump: bool,
    fan: bool,
    grow_light: bool,
}

impl ActuatorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_on(&self, actuator: Actuator) -> bool {
        match actuator {
            Actuator::Pump => self.pump,
            Actuator::Fan => self.fan,
            Actuator::GrowLight => self.grow_light,
        }
    }

    pub fn set(&mut self, actuator: Actuator, on: bool) {
        match actuator {
            Actuator::Pump => self.pump = on,
            Actuator::Fan => self.fan = on,
            Actuator::GrowLight => self.grow_light = on,
        }
    }

    pub fn set_all(&mut self, on: bool) {
        self.pump = on;
        self.fan = on;
        self.grow_light = on;
    }

    /// `(actuator, on)` pairs in wire order.
    pub fn iter(&self) -> impl Iterator<Item = (Actuator, bool)> + '_ {
        Actuator::ALL.into_iter().map(|a| (a, self.is_on(a)))
    }
}
