//! Outbound application events.
//!
//! The [`NodeService`](super::service::NodeService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them; the stock one logs to serial.

use crate::app::advisory::Advisory;
use crate::app::commands::{Command, Rejection};
use crate::net::client_id::ClientId;
use crate::sensors::SensorSnapshot;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The service has started.
    Started,

    /// A connect attempt is about to be made.
    Connecting { client_id: ClientId, attempt: u8 },

    /// Broker session established and subscriptions issued.
    Connected { client_id: ClientId },

    /// A connect attempt failed.
    ConnectFailed { attempt: u8, max_attempts: u8 },

    /// Every attempt of the current episode failed; the next episode
    /// starts after `retry_in_ms`.
    EpisodeExhausted { retry_in_ms: u32 },

    /// A live session was lost.
    ConnectionLost,

    /// An inbound command changed actuator state.
    CommandApplied(Command),

    /// An inbound message was discarded.
    CommandRejected(Rejection),

    /// An aggregate telemetry message went out.
    Telemetry(SensorSnapshot),

    /// A local advisory rule fired.
    Advisory(Advisory),
}
