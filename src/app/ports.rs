//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ NodeService (domain)
//! ```
//!
//! Driven adapters (sensors, relays, MQTT, clock, event sinks) implement
//! these traits.  The [`NodeService`](super::service::NodeService) consumes
//! them via generics, so the domain core never touches hardware directly.
//!
//! All port errors are typed; the domain absorbs every one of them.

use crate::app::actuators::Actuator;
use crate::error::{ActuatorError, CommsError, SensorError};

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: raw, unsmoothed sensor values.
///
/// Implementations may return `Ok(f32::NAN)`; the smoother treats it the
/// same as an error.
pub trait SensorPort {
    /// Air temperature in °C.
    fn read_temperature(&mut self) -> Result<f32, SensorError>;

    /// Relative humidity in %.
    fn read_humidity(&mut self) -> Result<f32, SensorError>;

    /// Raw soil moisture ADC count.
    fn read_soil_moisture(&mut self) -> Result<u16, SensorError>;

    /// Raw light ADC count.
    fn read_light(&mut self) -> Result<u16, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: drives the digital output behind each actuator.
pub trait ActuatorPort {
    /// Drive `actuator`'s output high (`on`) or low.
    fn drive(&mut self, actuator: Actuator, on: bool) -> Result<(), ActuatorError>;
}

// ───────────────────────────────────────────────────────────────
// Transport port (driven adapter: domain ↔ MQTT broker)
// ───────────────────────────────────────────────────────────────

/// Publish/subscribe transport primitives.
///
/// `connect` may block for a bounded handshake; every other method must
/// return promptly.
pub trait TransportPort {
    /// Open a fresh session under `client_id`.  Any previous session is
    /// discarded, subscriptions included.
    fn connect(&mut self, client_id: &str) -> Result<(), CommsError>;

    /// Whether the session is currently up.
    fn is_connected(&self) -> bool;

    fn subscribe(&mut self, topic: &str) -> Result<(), CommsError>;

    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), CommsError>;

    /// Deliver every pending inbound message to `handler`, synchronously,
    /// on the caller's thread.  Returns the number delivered.
    fn poll(&mut self, handler: &mut dyn FnMut(&str, &[u8])) -> usize;

    /// Link signal strength in dBm, if known.
    fn rssi(&self) -> Option<i8>;
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic time source.
pub trait ClockPort {
    /// Milliseconds since boot.  Never decreases.
    fn uptime_ms(&self) -> u64;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
