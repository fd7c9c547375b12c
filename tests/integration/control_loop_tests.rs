//! End-to-end tests of `NodeService::iterate` against mock adapters.

use std::sync::atomic::{AtomicU16, Ordering};

use plantnode::app::actuators::Actuator;
use plantnode::app::advisory::Advisory;
use plantnode::app::events::AppEvent;
use plantnode::app::service::{IterationReport, NodeService};
use plantnode::config::NodeConfig;
use plantnode::error::SensorError;
use plantnode::net::{ConnectionState, Connectivity, LinkTransition};
use plantnode::telemetry::TelemetryOutcome;
use plantnode::topics;

use crate::mock_hw::{ManualClock, MockBroker, MockHardware, RecordingSink};

fn next_entropy() -> u16 {
    static N: AtomicU16 = AtomicU16::new(0x1000);
    N.fetch_add(1, Ordering::Relaxed)
}

struct Rig {
    svc: NodeService,
    hw: MockHardware,
    broker: MockBroker,
    clock: ManualClock,
    sink: RecordingSink,
}

impl Rig {
    fn new(broker: MockBroker) -> Self {
        let config = NodeConfig::default();
        let link = Connectivity::with_entropy(&config, next_entropy);
        let mut rig = Self {
            svc: NodeService::with_link(config, link),
            hw: MockHardware::new(),
            broker,
            clock: ManualClock::new(),
            sink: RecordingSink::new(),
        };
        rig.svc.start(&mut rig.hw, &mut rig.sink);
        rig
    }

    fn at(&mut self, ms: u64) -> IterationReport {
        self.clock.set(ms);
        self.svc
            .iterate(&mut self.hw, &mut self.broker, &self.clock, &mut self.sink)
    }

    /// Run publish ticks until the 5-slot window is full of the mock's
    /// current readings.  Returns the time of the last tick.
    fn fill_window(&mut self) -> u64 {
        let mut t = 0;
        for _ in 0..5 {
            t += 2_000;
            self.at(t);
        }
        t
    }
}

#[test]
fn boot_forces_outputs_low() {
    let rig = Rig::new(MockBroker::new());
    assert_eq!(
        rig.hw.writes,
        vec![
            (Actuator::Pump, false),
            (Actuator::Fan, false),
            (Actuator::GrowLight, false)
        ]
    );
    assert_eq!(rig.sink.events.first(), Some(&AppEvent::Started));
}

#[test]
fn first_iteration_connects_and_subscribes() {
    let mut rig = Rig::new(MockBroker::new());
    let r = rig.at(0);
    assert_eq!(r.link, LinkTransition::Connected);
    assert_eq!(rig.svc.connection_state(), ConnectionState::Connected);
    assert_eq!(rig.broker.subscriptions, topics::SUBSCRIPTIONS);
    assert!(rig.broker.client_ids[0].starts_with("ESP32-"));
    // Timers have not elapsed yet.
    assert!(!r.sampled);
    assert!(r.publish.is_none());
}

#[test]
fn unchanged_snapshot_skips_aggregate_but_not_status() {
    let mut rig = Rig::new(MockBroker::new());
    rig.at(0);
    let t = rig.fill_window();

    let snap = rig.svc.latest_snapshot();
    assert!((snap.temperature_c - 24.0).abs() < 1e-4);
    assert!((snap.humidity_pct - 50.0).abs() < 1e-4);
    assert_eq!(snap.soil_moisture_raw, 500);
    assert_eq!(snap.light_raw, 2000);

    let aggregate = rig.broker.last_payload(topics::SENSORS_AGGREGATED).unwrap();
    assert_eq!(aggregate["soil_moisture"], 500);
    assert_eq!(aggregate["light_intensity"], 2000);
    assert_eq!(aggregate["device_id"], "ESP32-Plant-01");
    assert_eq!(aggregate["quality"], "excellent");

    let aggregates = rig.broker.count(topics::SENSORS_AGGREGATED);
    let statuses = rig.broker.count(topics::STATUS_ALL);

    let r = rig.at(t + 2_000);
    assert_eq!(r.publish.unwrap().telemetry, TelemetryOutcome::Unchanged);
    assert_eq!(rig.broker.count(topics::SENSORS_AGGREGATED), aggregates);
    assert_eq!(rig.broker.count(topics::SENSORS_TEMPERATURE), aggregates);
    assert_eq!(rig.broker.count(topics::STATUS_ALL), statuses + 1);
    assert_eq!(rig.broker.count(topics::STATUS_PUMP), statuses + 1);
}

#[test]
fn window_fill_publishes_every_tick() {
    let mut rig = Rig::new(MockBroker::new());
    rig.at(0);
    rig.fill_window();
    // 4.8, 9.6, 14.4, 19.2, 24.0 °C: every truncated value differs.
    assert_eq!(rig.broker.count(topics::SENSORS_AGGREGATED), 5);
    assert_eq!(rig.broker.count(topics::SENSORS_LIGHT), 5);
}

#[test]
fn pump_command_sets_state_and_output() {
    let mut rig = Rig::new(MockBroker::new());
    rig.at(0);
    rig.broker.deliver(topics::CMD_PUMP, r#"{"action":"ON"}"#);
    let r = rig.at(100);
    assert_eq!(r.commands_applied, 1);
    assert!(rig.svc.actuators().is_on(Actuator::Pump));
    assert!(rig.hw.output(Actuator::Pump));

    rig.at(2_000);
    let status = rig.broker.last_payload(topics::STATUS_PUMP).unwrap();
    assert_eq!(status["status"], "ON");
    let all = rig.broker.last_payload(topics::STATUS_ALL).unwrap();
    assert_eq!(all["pump"], "ON");
    assert_eq!(all["fan"], "OFF");
    assert_eq!(all["rssi"], -60);
    assert_eq!(all["uptime"], 2_000);
}

#[test]
fn bogus_and_malformed_commands_change_nothing() {
    let mut rig = Rig::new(MockBroker::new());
    rig.at(0);
    let writes = rig.hw.writes.len();

    rig.broker.deliver(topics::CMD_PUMP, r#"{"action":"BOGUS"}"#);
    rig.broker.deliver(topics::CMD_FAN, "not json");
    rig.broker.deliver("plant-iot/actuators/heater", r#"{"action":"ON"}"#);
    let r = rig.at(100);

    assert_eq!(r.commands_applied, 0);
    assert_eq!(r.commands_rejected, 3);
    assert!(rig.svc.actuators().iter().all(|(_, on)| !on));
    assert_eq!(rig.hw.writes.len(), writes);
}

#[test]
fn bulk_command_switches_everything() {
    let mut rig = Rig::new(MockBroker::new());
    rig.at(0);
    rig.broker.deliver(topics::CMD_ALL, r#"{"enable":true}"#);
    rig.at(100);
    for a in Actuator::ALL {
        assert!(rig.svc.actuators().is_on(a));
        assert!(rig.hw.output(a));
    }
    rig.broker.deliver(topics::CMD_ALL, r#"{"enable":false}"#);
    rig.at(200);
    assert!(rig.svc.actuators().iter().all(|(_, on)| !on));
}

#[test]
fn offline_publish_tick_is_a_noop() {
    let mut rig = Rig::new(MockBroker::refusing(3));
    rig.at(0);
    let r = rig.at(2_000);
    assert!(r.sampled);
    assert_eq!(r.publish.unwrap().telemetry, TelemetryOutcome::Offline);
    assert!(rig.broker.published.is_empty());
}

#[test]
fn three_failures_then_independent_episode_succeeds() {
    let mut rig = Rig::new(MockBroker::refusing(3));

    assert_eq!(rig.at(0).link, LinkTransition::AttemptFailed { attempt: 1 });
    // Sampling keeps running while the link waits out the delay.
    assert!(rig.at(2_000).sampled);
    assert_eq!(rig.at(5_000).link, LinkTransition::AttemptFailed { attempt: 2 });
    assert_eq!(rig.at(10_000).link, LinkTransition::EpisodeExhausted);
    assert_eq!(rig.svc.connection_state(), ConnectionState::Disconnected);

    assert_eq!(rig.at(15_000).link, LinkTransition::Connected);
    let ids = &rig.broker.client_ids;
    assert_eq!(ids.len(), 4);
    assert_eq!(ids[0], ids[2]);
    assert_ne!(ids[2], ids[3]);
    assert_eq!(
        rig.sink
            .count(|e| matches!(e, AppEvent::EpisodeExhausted { .. })),
        1
    );
}

#[test]
fn lost_session_is_detected_and_resubscribed() {
    let mut rig = Rig::new(MockBroker::new());
    rig.at(0);
    rig.broker.drop_session();
    assert_eq!(rig.at(100).link, LinkTransition::Lost);
    assert_eq!(rig.at(200).link, LinkTransition::Connected);
    assert_eq!(
        rig.broker.subscriptions.len(),
        2 * topics::SUBSCRIPTIONS.len()
    );
}

#[test]
fn advisories_fire_without_touching_actuators() {
    let mut rig = Rig::new(MockBroker::new());
    rig.hw.temperature = Ok(35.0);
    rig.at(0);
    let t = rig.fill_window();

    let writes = rig.hw.writes.len();
    let r = rig.at(t + 2_000);
    assert!(
        r.advisories
            .iter()
            .any(|a| matches!(a, Advisory::HighTemperature { .. }))
    );
    assert!(!rig.svc.actuators().is_on(Actuator::Fan));
    assert_eq!(rig.hw.writes.len(), writes);

    rig.broker.deliver(topics::CMD_FAN, r#"{"action":"ON"}"#);
    let r = rig.at(t + 4_000);
    assert!(r.advisories.is_empty());
}

#[test]
fn failing_sensor_keeps_stale_value() {
    let mut rig = Rig::new(MockBroker::new());
    rig.at(0);
    let t = rig.fill_window();

    rig.hw.temperature = Err(SensorError::Timeout);
    rig.hw.humidity = Ok(f32::NAN);
    let r = rig.at(t + 2_000);
    assert!(r.sampled);
    let snap = rig.svc.latest_snapshot();
    assert!((snap.temperature_c - 24.0).abs() < 1e-4);
    assert!((snap.humidity_pct - 50.0).abs() < 1e-4);
}

#[test]
fn snapshot_from_offline_tick_goes_out_after_reconnect() {
    let mut rig = Rig::new(MockBroker::refusing(1));
    assert_eq!(rig.at(0).link, LinkTransition::AttemptFailed { attempt: 1 });
    let r = rig.at(2_000);
    assert_eq!(r.publish.unwrap().telemetry, TelemetryOutcome::Offline);
    let offline = rig.svc.latest_snapshot();

    // Every later read fails, so the window keeps the offline tick's values.
    rig.hw.temperature = Err(SensorError::Timeout);
    rig.hw.humidity = Err(SensorError::Timeout);
    rig.hw.soil_moisture = Err(SensorError::AdcReadFailed);
    rig.hw.light = Err(SensorError::AdcReadFailed);

    let r = rig.at(5_000);
    assert_eq!(r.link, LinkTransition::Connected);
    assert_eq!(
        r.publish.unwrap().telemetry,
        TelemetryOutcome::Published { legacy: 4 }
    );
    assert_eq!(rig.broker.count(topics::SENSORS_AGGREGATED), 1);
    let aggregate = rig.broker.last_payload(topics::SENSORS_AGGREGATED).unwrap();
    assert_eq!(aggregate["soil_moisture"], offline.soil_moisture_raw);
    assert_eq!(aggregate["light_intensity"], offline.light_raw);
    assert_eq!(aggregate["timestamp"], 5_000);

    let r = rig.at(7_000);
    assert_eq!(r.publish.unwrap().telemetry, TelemetryOutcome::Unchanged);
    assert_eq!(rig.broker.count(topics::SENSORS_AGGREGATED), 1);
}

#[test]
fn rejected_subscription_retries_until_all_topics_are_held() {
    let mut broker = MockBroker::new();
    broker.reject_subscriptions = 1;
    let mut rig = Rig::new(broker);

    assert_eq!(rig.at(0).link, LinkTransition::AttemptFailed { attempt: 1 });
    assert_eq!(rig.svc.connection_state(), ConnectionState::Disconnected);
    assert_eq!(rig.at(5_000).link, LinkTransition::Connected);
    let held = &rig.broker.subscriptions[rig.broker.subscriptions.len() - 4..];
    assert_eq!(held, topics::SUBSCRIPTIONS);
}
