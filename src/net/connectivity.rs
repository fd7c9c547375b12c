//! Broker connectivity state machine.
//!
//! ```text
//!                 not connected, retry timer elapsed
//!  Disconnected ─────────────────────────────────────▶ Connecting
//!       ▲  ▲                                              │   │
//!       │  └──────────── connect failed (attempt+1) ──────┘   │ connect ok
//!       │                                                     ▼  (resubscribe)
//!       └─────────────── transport dropped ─────────────── Connected
//! ```
//!
//! Driven by [`Connectivity::maintain`] once per control-loop iteration.
//! Waiting between attempts is a timer comparison, never a sleep, so
//! inbound delivery and sampling keep running while the link is down.
//!
//! Attempts are grouped into *episodes* of at most `max_connect_attempts`.
//! Each episode draws a fresh client id.  There is no terminal failure
//! state and no exponential backoff: an exhausted episode is followed by
//! a new one after the same fixed delay.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::{EventSink, TransportPort};
use crate::config::NodeConfig;
use crate::error::CommsError;
use crate::topics;

use super::client_id::{self, ClientId, EntropySource};

/// Link state as seen by the control loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

/// What a single [`Connectivity::maintain`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkTransition {
    /// Nothing happened (connected and healthy, or waiting out the delay).
    Idle,
    /// Session established; subscriptions issued.
    Connected,
    /// One attempt failed; more remain in this episode.
    AttemptFailed { attempt: u8 },
    /// The last attempt of the episode failed.
    EpisodeExhausted,
    /// A live session dropped.
    Lost,
}

#[derive(Debug, Clone)]
struct Episode {
    client_id: ClientId,
    attempts: u8,
}

/// Reconnect policy plus the current link state.
pub struct Connectivity {
    state: ConnectionState,
    max_attempts: u8,
    retry_delay_ms: u32,
    prefix: heapless::String<16>,
    entropy: EntropySource,
    episode: Option<Episode>,
    /// Earliest uptime at which the next attempt may be made.
    next_attempt_ms: u64,
    episodes_started: u32,
    client_id: Option<ClientId>,
}

impl Connectivity {
    /// Policy from `config`, hardware entropy for client ids.
    pub fn new(config: &NodeConfig) -> Self {
        Self::with_entropy(config, client_id::hardware_entropy)
    }

    pub fn with_entropy(config: &NodeConfig, entropy: EntropySource) -> Self {
        Self {
            state: ConnectionState::Disconnected,
            max_attempts: config.max_connect_attempts.max(1),
            retry_delay_ms: config.retry_delay_ms,
            prefix: config.client_id_prefix.clone(),
            entropy,
            episode: None,
            next_attempt_ms: 0,
            episodes_started: 0,
            client_id: None,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    /// Client id of the live session, if any.
    pub fn client_id(&self) -> Option<&str> {
        self.client_id.as_deref()
    }

    /// Attempts made so far in the current episode (0 between episodes).
    pub fn attempts_in_episode(&self) -> u8 {
        self.episode.as_ref().map_or(0, |e| e.attempts)
    }

    pub fn episodes_started(&self) -> u32 {
        self.episodes_started
    }

    /// Run one step of the state machine.
    pub fn maintain(
        &mut self,
        now_ms: u64,
        transport: &mut impl TransportPort,
        sink: &mut impl EventSink,
    ) -> LinkTransition {
        if self.state == ConnectionState::Connected {
            if transport.is_connected() {
                return LinkTransition::Idle;
            }
            warn!("link: connection lost");
            self.state = ConnectionState::Disconnected;
            self.client_id = None;
            // Reconnect straight away; the delay only separates failures.
            self.next_attempt_ms = now_ms;
            sink.emit(&AppEvent::ConnectionLost);
            return LinkTransition::Lost;
        }

        if now_ms < self.next_attempt_ms {
            return LinkTransition::Idle;
        }

        let episode = self.episode.get_or_insert_with(|| {
            self.episodes_started += 1;
            let id = client_id::client_id(&self.prefix, (self.entropy)());
            info!("link: new episode {} as {}", self.episodes_started, id);
            Episode {
                client_id: id,
                attempts: 0,
            }
        });
        episode.attempts += 1;
        let attempt = episode.attempts;
        let id = episode.client_id.clone();

        self.state = ConnectionState::Connecting;
        sink.emit(&AppEvent::Connecting {
            client_id: id.clone(),
            attempt,
        });
        info!("link: connecting as {} ({}/{})", id, attempt, self.max_attempts);

        // A session missing any subscription counts as a failed attempt.
        match transport.connect(&id).and_then(|()| subscribe_all(transport)) {
            Ok(()) => {
                self.state = ConnectionState::Connected;
                self.episode = None;
                info!("link: connected as {}", id);
                sink.emit(&AppEvent::Connected {
                    client_id: id.clone(),
                });
                self.client_id = Some(id);
                LinkTransition::Connected
            }
            Err(e) => {
                warn!("link: attempt {} failed: {}", attempt, e);
                self.state = ConnectionState::Disconnected;
                self.next_attempt_ms = now_ms.saturating_add(u64::from(self.retry_delay_ms));
                sink.emit(&AppEvent::ConnectFailed {
                    attempt,
                    max_attempts: self.max_attempts,
                });
                if attempt >= self.max_attempts {
                    self.episode = None;
                    warn!(
                        "link: giving up after {} attempts, new episode in {} ms",
                        attempt, self.retry_delay_ms
                    );
                    sink.emit(&AppEvent::EpisodeExhausted {
                        retry_in_ms: self.retry_delay_ms,
                    });
                    LinkTransition::EpisodeExhausted
                } else {
                    LinkTransition::AttemptFailed { attempt }
                }
            }
        }
    }
}

/// Issue every subscription, stopping at the first rejection.
fn subscribe_all(transport: &mut impl TransportPort) -> Result<(), CommsError> {
    for topic in topics::SUBSCRIPTIONS {
        transport.subscribe(topic).inspect_err(|e| {
            warn!("link: subscribe {} failed: {}", topic, e);
        })?;
    }
    Ok(())
}
