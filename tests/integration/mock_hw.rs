//! Mock adapters for integration tests.
//!
//! Every port has a recording double here so tests can drive
//! [`NodeService`](plantnode::app::service::NodeService) end to end and
//! assert on the full history without real GPIO, ADC, or a broker.

use std::cell::Cell;
use std::collections::VecDeque;

use plantnode::app::actuators::Actuator;
use plantnode::app::events::AppEvent;
use plantnode::app::ports::{ActuatorPort, ClockPort, EventSink, SensorPort, TransportPort};
use plantnode::error::{ActuatorError, CommsError, SensorError};

// ── MockHardware ──────────────────────────────────────────────

/// Sensor source with settable readings plus a recording relay bank.
pub struct MockHardware {
    pub temperature: Result<f32, SensorError>,
    pub humidity: Result<f32, SensorError>,
    pub soil_moisture: Result<u16, SensorError>,
    pub light: Result<u16, SensorError>,
    pub writes: Vec<(Actuator, bool)>,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            temperature: Ok(24.0),
            humidity: Ok(50.0),
            soil_moisture: Ok(500),
            light: Ok(2000),
            writes: Vec::new(),
        }
    }

    /// Current output level of `actuator` (LOW if never written).
    pub fn output(&self, actuator: Actuator) -> bool {
        self.writes
            .iter()
            .rev()
            .find(|(a, _)| *a == actuator)
            .is_some_and(|(_, on)| *on)
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorPort for MockHardware {
    fn read_temperature(&mut self) -> Result<f32, SensorError> {
        self.temperature
    }
    fn read_humidity(&mut self) -> Result<f32, SensorError> {
        self.humidity
    }
    fn read_soil_moisture(&mut self) -> Result<u16, SensorError> {
        self.soil_moisture
    }
    fn read_light(&mut self) -> Result<u16, SensorError> {
        self.light
    }
}

impl ActuatorPort for MockHardware {
    fn drive(&mut self, actuator: Actuator, on: bool) -> Result<(), ActuatorError> {
        self.writes.push((actuator, on));
        Ok(())
    }
}

// ── MockBroker ────────────────────────────────────────────────

/// In-memory broker session.
pub struct MockBroker {
    /// Outcomes for upcoming connect attempts; empty means accept.
    pub connect_script: VecDeque<bool>,
    pub connected: bool,
    pub client_ids: Vec<String>,
    pub subscriptions: Vec<String>,
    pub published: Vec<(String, String)>,
    pub inbound: VecDeque<(String, Vec<u8>)>,
    pub rssi: Option<i8>,
    /// Subscribe calls to reject before accepting again.
    pub reject_subscriptions: usize,
}

#[allow(dead_code)]
impl MockBroker {
    pub fn new() -> Self {
        Self {
            connect_script: VecDeque::new(),
            connected: false,
            client_ids: Vec::new(),
            subscriptions: Vec::new(),
            published: Vec::new(),
            inbound: VecDeque::new(),
            rssi: Some(-60),
            reject_subscriptions: 0,
        }
    }

    /// Broker that refuses the next `n` connects.
    pub fn refusing(n: usize) -> Self {
        let mut b = Self::new();
        b.connect_script.extend(std::iter::repeat_n(false, n));
        b
    }

    pub fn deliver(&mut self, topic: &str, payload: &str) {
        self.inbound
            .push_back((topic.to_string(), payload.as_bytes().to_vec()));
    }

    pub fn drop_session(&mut self) {
        self.connected = false;
    }

    pub fn topics(&self) -> Vec<&str> {
        self.published.iter().map(|(t, _)| t.as_str()).collect()
    }

    pub fn count(&self, topic: &str) -> usize {
        self.published.iter().filter(|(t, _)| t == topic).count()
    }

    pub fn last_payload(&self, topic: &str) -> Option<serde_json::Value> {
        self.published
            .iter()
            .rev()
            .find(|(t, _)| t == topic)
            .and_then(|(_, p)| serde_json::from_str(p).ok())
    }
}

impl Default for MockBroker {
    fn default() -> Self {
        Self::new()
    }
}

impl TransportPort for MockBroker {
    fn connect(&mut self, client_id: &str) -> Result<(), CommsError> {
        self.client_ids.push(client_id.to_string());
        let accept = self.connect_script.pop_front().unwrap_or(true);
        self.connected = accept;
        if accept {
            Ok(())
        } else {
            Err(CommsError::ConnectFailed)
        }
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn subscribe(&mut self, topic: &str) -> Result<(), CommsError> {
        if !self.connected {
            return Err(CommsError::NotConnected);
        }
        if self.reject_subscriptions > 0 {
            self.reject_subscriptions -= 1;
            return Err(CommsError::SubscribeFailed);
        }
        self.subscriptions.push(topic.to_string());
        Ok(())
    }

    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), CommsError> {
        if !self.connected {
            return Err(CommsError::NotConnected);
        }
        self.published.push((
            topic.to_string(),
            String::from_utf8_lossy(payload).into_owned(),
        ));
        Ok(())
    }

    fn poll(&mut self, handler: &mut dyn FnMut(&str, &[u8])) -> usize {
        let mut n = 0;
        while let Some((topic, payload)) = self.inbound.pop_front() {
            handler(&topic, &payload);
            n += 1;
        }
        n
    }

    fn rssi(&self) -> Option<i8> {
        self.rssi
    }
}

// ── ManualClock ───────────────────────────────────────────────

/// Clock advanced explicitly by the test.
pub struct ManualClock {
    now: Cell<u64>,
}

#[allow(dead_code)]
impl ManualClock {
    pub fn new() -> Self {
        Self { now: Cell::new(0) }
    }

    pub fn set(&self, ms: u64) {
        self.now.set(ms);
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
    }
}

impl ClockPort for ManualClock {
    fn uptime_ms(&self) -> u64 {
        self.now.get()
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
