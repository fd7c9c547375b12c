//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements    | Connects to                   |
//! |------------|---------------|-------------------------------|
//! | `hardware` | SensorPort    | DHT22, ESP32 ADC1             |
//! |            | ActuatorPort  | Relay GPIOs                   |
//! | `inbound`  | (used by mqtt)| Receiver thread hand-off      |
//! | `log_sink` | EventSink     | Serial log output             |
//! | `mqtt`     | TransportPort | ESP-IDF MQTT client (espidf)  |
//! | `time`     | ClockPort     | ESP32 system timer            |

pub mod hardware;
pub mod inbound;
pub mod log_sink;
#[cfg(target_os = "espidf")]
pub mod mqtt;
pub mod time;
