//! Node service: the hexagonal core and its control loop.
//!
//! [`NodeService`] owns every piece of mutable domain state: the sensor
//! hub, actuator flags, link state machine, and telemetry publisher.  All
//! I/O flows through port traits passed in at call sites, so the whole
//! loop runs against mocks on the host.
//!
//! ```text
//!  SensorPort ──▶ ┌─────────────────────────────┐ ──▶ EventSink
//!                 │         NodeService          │
//! ActuatorPort ◀──│ link · dispatch · sample ·   │ ◀─▶ TransportPort
//!                 │ publish · advise             │
//!  ClockPort ───▶ └─────────────────────────────┘
//! ```
//!
//! One [`iterate`](NodeService::iterate) call is one pass of the loop:
//!
//! 1. maintain the broker link,
//! 2. drain inbound messages into the dispatcher,
//! 3. sample sensors if the sample timer elapsed,
//! 4. publish and evaluate advisories if the publish timer elapsed.
//!
//! Nothing in here sleeps; the caller paces iterations.

use log::{info, warn};

use crate::config::NodeConfig;
use crate::net::{ConnectionState, Connectivity, LinkTransition};
use crate::sensors::{SensorHub, SensorSnapshot};
use crate::telemetry::{PublishReport, TelemetryPublisher};

use super::actuators::{Actuator, ActuatorState};
use super::advisory::{Advisory, AdvisoryRules};
use super::dispatcher::{self, DispatchOutcome};
use super::events::AppEvent;
use super::ports::{ActuatorPort, ClockPort, EventSink, SensorPort, TransportPort};

// ───────────────────────────────────────────────────────────────
// Iteration report
// ───────────────────────────────────────────────────────────────

/// Everything one control-loop pass did.
#[derive(Debug, Clone, PartialEq)]
pub struct IterationReport {
    pub now_ms: u64,
    pub link: LinkTransition,
    pub commands_applied: u8,
    pub commands_rejected: u8,
    pub sampled: bool,
    /// `Some` on publish ticks, even when offline.
    pub publish: Option<PublishReport>,
    pub advisories: heapless::Vec<Advisory, 2>,
}

/// `true` once `interval_ms` has passed since `last_ms`.
fn elapsed(now_ms: u64, last_ms: u64, interval_ms: u32) -> bool {
    now_ms.saturating_sub(last_ms) >= u64::from(interval_ms)
}

// ───────────────────────────────────────────────────────────────
// NodeService
// ───────────────────────────────────────────────────────────────

pub struct NodeService {
    config: NodeConfig,
    sensors: SensorHub,
    actuators: ActuatorState,
    link: Connectivity,
    publisher: TelemetryPublisher,
    rules: AdvisoryRules,
    last_sample_ms: u64,
    last_publish_ms: u64,
}

impl NodeService {
    /// Build the service with hardware entropy for client ids.
    pub fn new(config: NodeConfig) -> Self {
        let link = Connectivity::new(&config);
        Self::with_link(config, link)
    }

    /// Build the service around a pre-configured link (tests inject
    /// deterministic client-id entropy this way).
    pub fn with_link(config: NodeConfig, link: Connectivity) -> Self {
        Self {
            sensors: SensorHub::new(),
            actuators: ActuatorState::new(),
            publisher: TelemetryPublisher::new(&config),
            rules: AdvisoryRules::from_config(&config),
            link,
            config,
            last_sample_ms: 0,
            last_publish_ms: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Force every output to match the (all OFF) actuator state.
    pub fn start(&mut self, outputs: &mut impl ActuatorPort, sink: &mut impl EventSink) {
        for actuator in Actuator::ALL {
            if let Err(e) = outputs.drive(actuator, self.actuators.is_on(actuator)) {
                warn!("start: {} output write failed: {}", actuator, e);
            }
        }
        sink.emit(&AppEvent::Started);
        info!(
            "NodeService started (sample {} ms, publish {} ms)",
            self.config.sample_interval_ms, self.config.publish_interval_ms
        );
    }

    // ── Per-iteration orchestration ───────────────────────────

    /// Run one pass of the control loop.
    ///
    /// `hw` satisfies both [`SensorPort`] and [`ActuatorPort`], which
    /// keeps the port boundary explicit without a double mutable borrow.
    pub fn iterate(
        &mut self,
        hw: &mut (impl SensorPort + ActuatorPort),
        transport: &mut impl TransportPort,
        clock: &impl ClockPort,
        sink: &mut impl EventSink,
    ) -> IterationReport {
        let now_ms = clock.uptime_ms();

        // 1. Link maintenance
        let link = self.link.maintain(now_ms, transport, sink);

        // 2. Inbound commands
        let mut applied = 0u8;
        let mut rejected = 0u8;
        {
            let actuators = &mut self.actuators;
            transport.poll(&mut |topic: &str, payload: &[u8]| {
                match dispatcher::dispatch(&mut *actuators, &mut *hw, topic, payload) {
                    DispatchOutcome::Applied(cmd) => {
                        applied = applied.saturating_add(1);
                        sink.emit(&AppEvent::CommandApplied(cmd));
                    }
                    DispatchOutcome::Rejected(why) => {
                        rejected = rejected.saturating_add(1);
                        sink.emit(&AppEvent::CommandRejected(why));
                    }
                }
            });
        }

        // 3. Sampling
        let sampled = elapsed(now_ms, self.last_sample_ms, self.config.sample_interval_ms);
        if sampled {
            self.sensors.sample(hw, now_ms);
            self.last_sample_ms = now_ms;
        }

        // 4. Publish + advisories
        let mut publish = None;
        let mut advisories = heapless::Vec::new();
        if elapsed(now_ms, self.last_publish_ms, self.config.publish_interval_ms) {
            let snap = self.sensors.latest();
            let report = self.publisher.publish_tick(
                self.link.is_connected(),
                transport,
                &snap,
                &self.actuators,
                now_ms,
            );
            if report.published_telemetry() {
                sink.emit(&AppEvent::Telemetry(snap));
            }
            publish = Some(report);

            advisories = self.rules.evaluate(&snap, &self.actuators);
            for advisory in &advisories {
                sink.emit(&AppEvent::Advisory(*advisory));
            }
            self.last_publish_ms = now_ms;
        }

        IterationReport {
            now_ms,
            link,
            commands_applied: applied,
            commands_rejected: rejected,
            sampled,
            publish,
            advisories,
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn actuators(&self) -> &ActuatorState {
        &self.actuators
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.link.state()
    }

    pub fn latest_snapshot(&self) -> SensorSnapshot {
        self.sensors.latest()
    }
}
