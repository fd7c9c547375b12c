//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the logger (UART / USB-CDC in production).

use log::{info, warn};

use crate::app::commands::{Command, Rejection};
use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::telemetry::schema::on_off;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started => info!("START | control loop running"),
            AppEvent::Connecting { client_id, attempt } => {
                info!("LINK | connecting as {} (attempt {})", client_id, attempt);
            }
            AppEvent::Connected { client_id } => info!("LINK | connected as {}", client_id),
            AppEvent::ConnectFailed {
                attempt,
                max_attempts,
            } => warn!("LINK | attempt {}/{} failed", attempt, max_attempts),
            AppEvent::EpisodeExhausted { retry_in_ms } => {
                warn!("LINK | giving up for now, retry in {} ms", retry_in_ms);
            }
            AppEvent::ConnectionLost => warn!("LINK | connection lost"),
            AppEvent::CommandApplied(Command::Set { actuator, on }) => {
                info!("CMD | {} -> {}", actuator, on_off(*on));
            }
            AppEvent::CommandApplied(Command::SetAll(on)) => {
                info!("CMD | all -> {}", on_off(*on));
            }
            AppEvent::CommandRejected(Rejection::UnknownTopic) => info!("CMD | unknown topic"),
            AppEvent::CommandRejected(why) => warn!("CMD | rejected: {:?}", why),
            AppEvent::Telemetry(s) => {
                info!(
                    "TELEM | T={:.1}\u{00b0}C | H={:.1}% | M={} ({}%) | L={} ({}%) | t={}",
                    s.temperature_c,
                    s.humidity_pct,
                    s.soil_moisture_raw,
                    s.moisture_percent(),
                    s.light_raw,
                    s.light_percent(),
                    s.timestamp_ms,
                );
            }
            AppEvent::Advisory(a) => warn!("ADVISORY | {}", a),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::actuators::Actuator;
    use crate::app::advisory::Advisory;
    use crate::error::DecodeError;
    use crate::net::client_id::client_id;
    use crate::sensors::SensorSnapshot;

    #[test]
    fn every_event_logs_without_panicking() {
        let mut sink = LogEventSink::new();
        let id = client_id("ESP32-", 0xbeef);
        for event in [
            AppEvent::Started,
            AppEvent::Connecting {
                client_id: id.clone(),
                attempt: 1,
            },
            AppEvent::Connected { client_id: id },
            AppEvent::ConnectFailed {
                attempt: 3,
                max_attempts: 3,
            },
            AppEvent::EpisodeExhausted { retry_in_ms: 5_000 },
            AppEvent::ConnectionLost,
            AppEvent::CommandApplied(Command::Set {
                actuator: Actuator::Pump,
                on: true,
            }),
            AppEvent::CommandApplied(Command::SetAll(false)),
            AppEvent::CommandRejected(Rejection::UnknownTopic),
            AppEvent::CommandRejected(Rejection::Malformed(DecodeError::MalformedPayload)),
            AppEvent::Telemetry(SensorSnapshot::default()),
            AppEvent::Advisory(Advisory::LowMoisture {
                moisture_percent: 12,
            }),
        ] {
            sink.emit(&event);
        }
    }
}
