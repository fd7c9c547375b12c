//! Local advisory rules.
//!
//! Evaluated after each publish tick over the latest snapshot and the
//! current actuator state.  Output is advisory only; nothing here
//! touches actuators.

use core::fmt;

use crate::app::actuators::{Actuator, ActuatorState};
use crate::config::NodeConfig;
use crate::sensors::SensorSnapshot;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Advisory {
    /// Too hot and the fan is off.
    HighTemperature { temperature_c: f32 },
    /// Soil too dry and the pump is off.
    LowMoisture { moisture_percent: u8 },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HighTemperature { temperature_c } => write!(
                f,
                "high temperature ({:.1}\u{00b0}C), consider turning on the fan",
                temperature_c
            ),
            Self::LowMoisture { moisture_percent } => write!(
                f,
                "low soil moisture ({}%), consider watering",
                moisture_percent
            ),
        }
    }
}

/// Threshold pair, copied out of [`NodeConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdvisoryRules {
    pub max_temperature_c: f32,
    pub min_moisture_percent: u8,
}

impl AdvisoryRules {
    pub fn from_config(config: &NodeConfig) -> Self {
        Self {
            max_temperature_c: config.advisory_max_temperature_c,
            min_moisture_percent: config.advisory_min_moisture_percent,
        }
    }

    /// Every rule that fires for `snap` given `actuators`.
    pub fn evaluate(
        &self,
        snap: &SensorSnapshot,
        actuators: &ActuatorState,
    ) -> heapless::Vec<Advisory, 2> {
        let mut out = heapless::Vec::new();

        if snap.temperature_c > self.max_temperature_c && !actuators.is_on(Actuator::Fan) {
            let _ = out.push(Advisory::HighTemperature {
                temperature_c: snap.temperature_c,
            });
        }

        let moisture = snap.moisture_percent();
        if moisture < self.min_moisture_percent && !actuators.is_on(Actuator::Pump) {
            let _ = out.push(Advisory::LowMoisture {
                moisture_percent: moisture,
            });
        }

        out
    }
}

impl Default for AdvisoryRules {
    fn default() -> Self {
        Self::from_config(&NodeConfig::default())
    }
}
