//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the DHT22 hygrometer and the three relay drivers, and reads the
//! analog channels, exposing all of it through [`SensorPort`] and
//! [`ActuatorPort`].  This is the only module in the system that touches
//! sensor or relay hardware.  On non-espidf targets the analog reads come
//! from the simulation atomics in [`analog`].

use embedded_hal::digital::OutputPin;

use crate::app::actuators::Actuator;
use crate::app::ports::{ActuatorPort, SensorPort};
use crate::drivers::relay::RelayDriver;
use crate::error::{ActuatorError, SensorError};
use crate::sensors::analog::{self, AnalogChannel};
use crate::sensors::dht::{DhtReading, Hygrometer};

/// The three relays, one per actuator.
pub struct Relays<P> {
    pub pump: RelayDriver<P>,
    pub fan: RelayDriver<P>,
    pub grow_light: RelayDriver<P>,
}

impl<P: OutputPin> Relays<P> {
    fn get(&mut self, actuator: Actuator) -> &mut RelayDriver<P> {
        match actuator {
            Actuator::Pump => &mut self.pump,
            Actuator::Fan => &mut self.fan,
            Actuator::GrowLight => &mut self.grow_light,
        }
    }
}

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<H, P> {
    hygrometer: H,
    relays: Relays<P>,
    /// One DHT frame serves both the temperature and the humidity read
    /// of a sampling tick; the sensor cannot be polled faster than 0.5 Hz.
    pending: Option<Result<DhtReading, SensorError>>,
}

impl<H: Hygrometer, P: OutputPin> HardwareAdapter<H, P> {
    pub fn new(hygrometer: H, relays: Relays<P>) -> Self {
        Self {
            hygrometer,
            relays,
            pending: None,
        }
    }

    pub fn relays(&self) -> &Relays<P> {
        &self.relays
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<H: Hygrometer, P: OutputPin> SensorPort for HardwareAdapter<H, P> {
    /// Reads a fresh DHT frame and keeps it for the humidity read.
    fn read_temperature(&mut self) -> Result<f32, SensorError> {
        let frame = self.hygrometer.read();
        self.pending = Some(frame);
        frame.map(|r| r.temperature_c)
    }

    fn read_humidity(&mut self) -> Result<f32, SensorError> {
        let frame = match self.pending.take() {
            Some(frame) => frame,
            None => self.hygrometer.read(),
        };
        frame.map(|r| r.humidity_pct)
    }

    fn read_soil_moisture(&mut self) -> Result<u16, SensorError> {
        analog::read_raw(AnalogChannel::SoilMoisture)
    }

    fn read_light(&mut self) -> Result<u16, SensorError> {
        analog::read_raw(AnalogChannel::Light)
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<H: Hygrometer, P: OutputPin> ActuatorPort for HardwareAdapter<H, P> {
    fn drive(&mut self, actuator: Actuator, on: bool) -> Result<(), ActuatorError> {
        self.relays.get(actuator).set(on)
    }
}
