//! Telemetry publisher.
//!
//! One publish tick, while connected:
//!
//! 1. Ask the [`ChangeDetector`] whether the snapshot moved.  If it did,
//!    send the aggregate message and, only if that succeeded, the four
//!    legacy per-channel messages.  The fingerprint is committed only
//!    after the aggregate is out.
//! 2. Always send the three per-actuator status messages and the
//!    aggregate status message.
//!
//! While disconnected the tick is a no-op.  Nothing is buffered.

use log::{debug, warn};
use serde::Serialize;

use crate::app::actuators::{Actuator, ActuatorState};
use crate::app::ports::TransportPort;
use crate::config::NodeConfig;
use crate::error::CommsError;
use crate::sensors::SensorSnapshot;
use crate::topics;

use super::dedup::ChangeDetector;
use super::schema::{ActuatorStatus, AggregateTelemetry, LegacyReadings, NodeStatus};

/// What happened to the sensor half of a publish tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TelemetryOutcome {
    /// Link down; nothing attempted.
    Offline,
    /// Fingerprint unchanged; aggregate and legacy skipped.
    Unchanged,
    /// Aggregate published; `legacy` of 4 per-channel messages succeeded.
    Published { legacy: u8 },
    /// Aggregate publish failed; retried on the next connected tick.
    Failed(CommsError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishReport {
    pub telemetry: TelemetryOutcome,
    /// Status messages (per-actuator + aggregate) that went out.
    pub status_sent: u8,
    /// Publishes attempted but rejected by the transport.
    pub failures: u8,
}

impl PublishReport {
    fn offline() -> Self {
        Self {
            telemetry: TelemetryOutcome::Offline,
            status_sent: 0,
            failures: 0,
        }
    }

    pub fn published_telemetry(&self) -> bool {
        matches!(self.telemetry, TelemetryOutcome::Published { .. })
    }
}

/// Serialise `msg` and hand it to the transport.
fn send<T: Serialize>(
    transport: &mut impl TransportPort,
    topic: &str,
    msg: &T,
) -> Result<(), CommsError> {
    let payload = serde_json::to_vec(msg).map_err(|_| CommsError::EncodeFailed)?;
    transport.publish(topic, &payload)
}

pub struct TelemetryPublisher {
    device_id: heapless::String<32>,
    quality: heapless::String<16>,
    detector: ChangeDetector,
}

impl TelemetryPublisher {
    pub fn new(config: &NodeConfig) -> Self {
        Self {
            device_id: config.device_id.clone(),
            quality: config.quality.clone(),
            detector: ChangeDetector::new(config.dedup_resolution),
        }
    }

    pub fn detector(&self) -> &ChangeDetector {
        &self.detector
    }

    /// Run one publish tick.
    ///
    /// `connected` is the connectivity state machine's view of the link;
    /// `now_ms` stamps the status messages.
    pub fn publish_tick(
        &mut self,
        connected: bool,
        transport: &mut impl TransportPort,
        snap: &SensorSnapshot,
        actuators: &ActuatorState,
        now_ms: u64,
    ) -> PublishReport {
        if !connected {
            debug!("telemetry: offline, tick skipped");
            return PublishReport::offline();
        }

        let mut failures = 0u8;
        let telemetry = self.publish_readings(transport, snap, &mut failures);
        let status_sent = self.publish_status(transport, actuators, now_ms, &mut failures);

        PublishReport {
            telemetry,
            status_sent,
            failures,
        }
    }

    fn publish_readings(
        &mut self,
        transport: &mut impl TransportPort,
        snap: &SensorSnapshot,
        failures: &mut u8,
    ) -> TelemetryOutcome {
        let Some(fp) = self.detector.check(snap) else {
            debug!("telemetry: unchanged, skipping");
            return TelemetryOutcome::Unchanged;
        };

        let aggregate = AggregateTelemetry::new(snap, &self.device_id, &self.quality);
        if let Err(e) = send(transport, topics::SENSORS_AGGREGATED, &aggregate) {
            warn!("telemetry: aggregate publish failed: {}", e);
            *failures += 1;
            return TelemetryOutcome::Failed(e);
        }
        self.detector.commit(fp);
        debug!("telemetry: published {}", fp);

        let legacy = LegacyReadings::new(snap);
        let results = [
            send(transport, topics::SENSORS_TEMPERATURE, &legacy.temperature),
            send(transport, topics::SENSORS_HUMIDITY, &legacy.humidity),
            send(transport, topics::SENSORS_SOIL_MOISTURE, &legacy.soil_moisture),
            send(transport, topics::SENSORS_LIGHT, &legacy.light),
        ];
        let mut ok = 0;
        for r in results {
            match r {
                Ok(()) => ok += 1,
                Err(e) => {
                    warn!("telemetry: legacy publish failed: {}", e);
                    *failures += 1;
                }
            }
        }
        TelemetryOutcome::Published { legacy: ok }
    }

    fn publish_status(
        &self,
        transport: &mut impl TransportPort,
        actuators: &ActuatorState,
        now_ms: u64,
        failures: &mut u8,
    ) -> u8 {
        let mut sent = 0;
        for actuator in Actuator::ALL {
            let msg = ActuatorStatus::new(actuators, actuator, now_ms);
            match send(transport, topics::status_topic(actuator), &msg) {
                Ok(()) => sent += 1,
                Err(e) => {
                    warn!("status: {} publish failed: {}", actuator.slug(), e);
                    *failures += 1;
                }
            }
        }

        let all = NodeStatus::new(actuators, transport.rssi(), now_ms);
        match send(transport, topics::STATUS_ALL, &all) {
            Ok(()) => sent += 1,
            Err(e) => {
                warn!("status: aggregate publish failed: {}", e);
                *failures += 1;
            }
        }
        sent
    }
}
