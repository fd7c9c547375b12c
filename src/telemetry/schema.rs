//! JSON wire schema for every outbound message.
//!
//! Field names are part of the backend contract; do not rename.

use serde::Serialize;

use crate::app::actuators::{Actuator, ActuatorState};
use crate::sensors::SensorSnapshot;

pub const UNIT_CELSIUS: &str = "celsius";
pub const UNIT_PERCENT: &str = "percent";
pub const UNIT_ADC: &str = "adc_0-4095";

/// Status string for an actuator flag.
pub fn on_off(on: bool) -> &'static str {
    if on { "ON" } else { "OFF" }
}

/// `plant-iot/sensors/aggregated`
#[derive(Debug, Clone, Serialize)]
pub struct AggregateTelemetry<'a> {
    pub temperature: f32,
    pub humidity: f32,
    pub soil_moisture: u16,
    pub soil_moisture_percent: u8,
    pub light_intensity: u16,
    pub light_percent: u8,
    pub timestamp: u64,
    pub device_id: &'a str,
    pub quality: &'a str,
}

impl<'a> AggregateTelemetry<'a> {
    pub fn new(snap: &SensorSnapshot, device_id: &'a str, quality: &'a str) -> Self {
        Self {
            temperature: snap.temperature_c,
            humidity: snap.humidity_pct,
            soil_moisture: snap.soil_moisture_raw,
            soil_moisture_percent: snap.moisture_percent(),
            light_intensity: snap.light_raw,
            light_percent: snap.light_percent(),
            timestamp: snap.timestamp_ms,
            device_id,
            quality,
        }
    }
}

/// `plant-iot/sensors/temperature`
#[derive(Debug, Clone, Serialize)]
pub struct TemperatureReading {
    pub temperature: f32,
    pub unit: &'static str,
    pub timestamp: u64,
}

/// `plant-iot/sensors/humidity`
#[derive(Debug, Clone, Serialize)]
pub struct HumidityReading {
    pub humidity: f32,
    pub unit: &'static str,
    pub timestamp: u64,
}

/// `plant-iot/sensors/soil-moisture`
#[derive(Debug, Clone, Serialize)]
pub struct SoilMoistureReading {
    pub moisture: u16,
    pub unit: &'static str,
    pub moisture_percent: u8,
    pub timestamp: u64,
}

/// `plant-iot/sensors/light`
#[derive(Debug, Clone, Serialize)]
pub struct LightReading {
    pub light: u16,
    pub unit: &'static str,
    pub light_percent: u8,
    pub timestamp: u64,
}

/// The four per-channel messages kept for older dashboards.
pub struct LegacyReadings {
    pub temperature: TemperatureReading,
    pub humidity: HumidityReading,
    pub soil_moisture: SoilMoistureReading,
    pub light: LightReading,
}

impl LegacyReadings {
    pub fn new(snap: &SensorSnapshot) -> Self {
        let timestamp = snap.timestamp_ms;
        Self {
            temperature: TemperatureReading {
                temperature: snap.temperature_c,
                unit: UNIT_CELSIUS,
                timestamp,
            },
            humidity: HumidityReading {
                humidity: snap.humidity_pct,
                unit: UNIT_PERCENT,
                timestamp,
            },
            soil_moisture: SoilMoistureReading {
                moisture: snap.soil_moisture_raw,
                unit: UNIT_ADC,
                moisture_percent: snap.moisture_percent(),
                timestamp,
            },
            light: LightReading {
                light: snap.light_raw,
                unit: UNIT_ADC,
                light_percent: snap.light_percent(),
                timestamp,
            },
        }
    }
}

/// `plant-iot/status/{pump,fan,grow-light}`
#[derive(Debug, Clone, Serialize)]
pub struct ActuatorStatus {
    pub status: &'static str,
    pub timestamp: u64,
}

impl ActuatorStatus {
    pub fn new(state: &ActuatorState, actuator: Actuator, now_ms: u64) -> Self {
        Self {
            status: on_off(state.is_on(actuator)),
            timestamp: now_ms,
        }
    }
}

/// `plant-iot/status/all`
///
/// `rssi` is `null` when the radio cannot report it.
#[derive(Debug, Clone, Serialize)]
pub struct NodeStatus {
    pub pump: &'static str,
    pub fan: &'static str,
    pub grow_light: &'static str,
    pub rssi: Option<i8>,
    pub uptime: u64,
}

impl NodeStatus {
    pub fn new(state: &ActuatorState, rssi: Option<i8>, uptime_ms: u64) -> Self {
        Self {
            pump: on_off(state.is_on(Actuator::Pump)),
            fan: on_off(state.is_on(Actuator::Fan)),
            grow_light: on_off(state.is_on(Actuator::GrowLight)),
            rssi,
            uptime: uptime_ms,
        }
    }
}
