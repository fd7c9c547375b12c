//! ESP-IDF MQTT transport adapter.
//!
//! Implements [`TransportPort`] on top of `esp_idf_svc::mqtt::client`.
//!
//! ## Threading
//!
//! The ESP-IDF client delivers events on its own connection, which a
//! small receiver thread drains.  That thread never touches domain
//! state: it flips the session's `connected` flag and pushes inbound
//! messages onto a bounded [`InboundQueue`].  The control thread drains the
//! queue in [`TransportPort::poll`] and runs the dispatcher itself.
//!
//! ## Sessions
//!
//! Every [`connect`](TransportPort::connect) builds a new client with the
//! episode's client id and a new `connected` flag, so a receiver thread
//! left over from a dead session can never mark the new one as up.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use esp_idf_svc::mqtt::client::{
    Details, EspMqttClient, EspMqttConnection, EventPayload, MqttClientConfiguration, QoS,
};
use log::{debug, info, warn};

use crate::app::ports::TransportPort;
use crate::config::NodeConfig;
use crate::error::CommsError;

use super::inbound::InboundQueue;

/// Longest `connect` will block waiting for CONNACK.
const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(5);
const HANDSHAKE_POLL: Duration = Duration::from_millis(50);
const RX_STACK_SIZE: usize = 6 * 1024;

pub struct EspMqttTransport {
    url: heapless::String<96>,
    client: Option<EspMqttClient<'static>>,
    connected: Arc<AtomicBool>,
    inbound: Arc<InboundQueue>,
}

impl EspMqttTransport {
    pub fn new(config: &NodeConfig) -> Self {
        let url = config.broker_url();
        info!("mqtt: broker {}", url);
        Self {
            url,
            client: None,
            connected: Arc::new(AtomicBool::new(false)),
            inbound: Arc::new(InboundQueue::new()),
        }
    }

    /// Drop the current session, if any.
    fn teardown(&mut self) {
        if self.client.take().is_some() {
            debug!("mqtt: previous session dropped");
        }
        self.connected.store(false, Ordering::Relaxed);
    }
}

fn spawn_receiver(
    mut conn: EspMqttConnection,
    connected: Arc<AtomicBool>,
    inbound: Arc<InboundQueue>,
) -> Result<(), CommsError> {
    thread::Builder::new()
        .name("mqtt-rx".into())
        .stack_size(RX_STACK_SIZE)
        .spawn(move || {
            // Ends when the owning client is dropped.
            while let Ok(event) = conn.next() {
                match event.payload() {
                    EventPayload::Connected(_) => connected.store(true, Ordering::Relaxed),
                    EventPayload::Disconnected => connected.store(false, Ordering::Relaxed),
                    EventPayload::Received {
                        topic: Some(topic),
                        data,
                        details: Details::Complete,
                        ..
                    } => {
                        inbound.push(topic, data);
                    }
                    _ => {}
                }
            }
            connected.store(false, Ordering::Relaxed);
            debug!("mqtt: receiver exiting");
        })
        .map(|_| ())
        .map_err(|e| {
            warn!("mqtt: receiver thread spawn failed: {}", e);
            CommsError::ConnectFailed
        })
}

impl TransportPort for EspMqttTransport {
    fn connect(&mut self, client_id: &str) -> Result<(), CommsError> {
        self.teardown();

        let conf = MqttClientConfiguration {
            client_id: Some(client_id),
            ..Default::default()
        };
        let (client, conn) = EspMqttClient::new(self.url.as_str(), &conf).map_err(|e| {
            warn!("mqtt: client init failed: {:?}", e);
            CommsError::ConnectFailed
        })?;

        let connected = Arc::new(AtomicBool::new(false));
        spawn_receiver(conn, connected.clone(), self.inbound.clone())?;
        self.client = Some(client);
        self.connected = connected;

        let started = Instant::now();
        while !self.connected.load(Ordering::Relaxed) {
            if started.elapsed() >= HANDSHAKE_TIMEOUT {
                self.teardown();
                return Err(CommsError::ConnectFailed);
            }
            thread::sleep(HANDSHAKE_POLL);
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.client.is_some() && self.connected.load(Ordering::Relaxed)
    }

    fn subscribe(&mut self, topic: &str) -> Result<(), CommsError> {
        let client = self.client.as_mut().ok_or(CommsError::NotConnected)?;
        client
            .subscribe(topic, QoS::AtMostOnce)
            .map(|_| ())
            .map_err(|_| CommsError::SubscribeFailed)
    }

    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), CommsError> {
        let client = self.client.as_mut().ok_or(CommsError::NotConnected)?;
        client
            .publish(topic, QoS::AtMostOnce, false, payload)
            .map(|_| ())
            .map_err(|_| CommsError::PublishFailed)
    }

    fn poll(&mut self, handler: &mut dyn FnMut(&str, &[u8])) -> usize {
        self.inbound.drain(handler)
    }

    fn rssi(&self) -> Option<i8> {
        let mut ap = esp_idf_svc::sys::wifi_ap_record_t::default();
        // SAFETY: `ap` is a valid, exclusively owned record for the call.
        let ret = unsafe { esp_idf_svc::sys::esp_wifi_sta_get_ap_info(&mut ap) };
        (ret == esp_idf_svc::sys::ESP_OK as i32).then_some(ap.rssi)
    }
}
