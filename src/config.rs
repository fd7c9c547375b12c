//! Node configuration parameters
//!
//! All tunable parameters for the plant node.  Defaults match the
//! deployed firmware; there is no persistent store, so every boot starts
//! from [`NodeConfig::default()`] plus compile-time broker overrides.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Core node configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    // --- Identity ---
    /// Constant device id reported in aggregate telemetry.
    pub device_id: heapless::String<32>,
    /// Constant quality tag reported in aggregate telemetry.
    pub quality: heapless::String<16>,

    // --- Broker ---
    /// Broker host name or IP address.
    pub broker_host: heapless::String<64>,
    /// Broker TCP port.
    pub broker_port: u16,
    /// Prefix for the per-episode randomised MQTT client id.
    pub client_id_prefix: heapless::String<16>,

    // --- Reconnect policy ---
    /// Connect attempts per reconnect episode.
    pub max_connect_attempts: u8,
    /// Delay between failed attempts (milliseconds).
    pub retry_delay_ms: u32,

    // --- Timing ---
    /// Sensor sampling interval (milliseconds)
    pub sample_interval_ms: u32,
    /// Telemetry + status publish interval (milliseconds)
    pub publish_interval_ms: u32,
    /// Idle delay at the end of every control-loop iteration (milliseconds)
    pub loop_idle_ms: u32,

    // --- Change detection ---
    /// Quantisation step for temperature / humidity before dedup
    /// comparison.  1.0 = compare integer parts.
    pub dedup_resolution: f32,

    // --- Advisory thresholds ---
    /// Advise the fan above this temperature (Celsius).
    pub advisory_max_temperature_c: f32,
    /// Advise the pump below this soil moisture (percent).
    pub advisory_min_moisture_percent: u8,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            device_id: fixed("ESP32-Plant-01"),
            quality: fixed("excellent"),

            broker_host: fixed("192.168.240.1"),
            broker_port: 1883,
            client_id_prefix: fixed("ESP32-"),

            max_connect_attempts: 3,
            retry_delay_ms: 5_000,

            sample_interval_ms: 2_000,
            publish_interval_ms: 2_000,
            loop_idle_ms: 100,

            dedup_resolution: 1.0,

            advisory_max_temperature_c: 30.0,
            advisory_min_moisture_percent: 30,
        }
    }
}

impl NodeConfig {
    /// Reject values the control loop cannot run with.
    pub fn validate(&self) -> Result<(), Error> {
        if self.sample_interval_ms == 0 || self.publish_interval_ms == 0 {
            return Err(Error::Config("intervals must be non-zero"));
        }
        if self.sample_interval_ms > self.publish_interval_ms {
            return Err(Error::Config("sampling must not be slower than publishing"));
        }
        if self.max_connect_attempts == 0 {
            return Err(Error::Config("at least one connect attempt per episode"));
        }
        if !(self.dedup_resolution.is_finite() && self.dedup_resolution > 0.0) {
            return Err(Error::Config("dedup resolution must be positive"));
        }
        if self.broker_host.is_empty() {
            return Err(Error::Config("broker host is empty"));
        }
        if self.advisory_min_moisture_percent > 100 {
            return Err(Error::Config("moisture threshold above 100%"));
        }
        Ok(())
    }

    /// Replace the broker host.  Over-long hosts are rejected unchanged.
    pub fn set_broker_host(&mut self, host: &str) -> Result<(), Error> {
        let mut s = heapless::String::new();
        s.push_str(host)
            .map_err(|()| Error::Config("broker host too long"))?;
        self.broker_host = s;
        Ok(())
    }

    /// `mqtt://host:port` form used by the ESP-IDF client.
    pub fn broker_url(&self) -> heapless::String<96> {
        use core::fmt::Write;
        let mut url = heapless::String::new();
        let _ = write!(url, "mqtt://{}:{}", self.broker_host, self.broker_port);
        url
    }
}

/// Build a fixed-capacity string from a literal known to fit.
fn fixed<const N: usize>(s: &str) -> heapless::String<N> {
    let mut out = heapless::String::new();
    for c in s.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let c = NodeConfig::default();
        assert!(c.validate().is_ok());
        assert_eq!(c.device_id.as_str(), "ESP32-Plant-01");
        assert_eq!(c.broker_port, 1883);
        assert_eq!(c.max_connect_attempts, 3);
        assert_eq!(c.retry_delay_ms, 5_000);
    }

    #[test]
    fn timing_ratios_make_sense() {
        let c = NodeConfig::default();
        assert!(
            c.sample_interval_ms <= c.publish_interval_ms,
            "every publish tick should see a fresh snapshot"
        );
        assert!(c.loop_idle_ms < c.sample_interval_ms);
    }

    #[test]
    fn rejects_slow_sampling() {
        let c = NodeConfig {
            sample_interval_ms: 10_000,
            publish_interval_ms: 2_000,
            ..NodeConfig::default()
        };
        assert!(matches!(c.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn rejects_zero_attempts_and_bad_resolution() {
        let c = NodeConfig {
            max_connect_attempts: 0,
            ..NodeConfig::default()
        };
        assert!(c.validate().is_err());

        let c = NodeConfig {
            dedup_resolution: 0.0,
            ..NodeConfig::default()
        };
        assert!(c.validate().is_err());

        let c = NodeConfig {
            dedup_resolution: f32::NAN,
            ..NodeConfig::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn broker_url_format() {
        let mut c = NodeConfig::default();
        c.set_broker_host("broker.local").unwrap();
        assert_eq!(c.broker_url().as_str(), "mqtt://broker.local:1883");
    }

    #[test]
    fn overlong_host_rejected() {
        let mut c = NodeConfig::default();
        let long = "h".repeat(80);
        assert!(c.set_broker_host(&long).is_err());
        assert_eq!(c.broker_host.as_str(), "192.168.240.1");
    }

    #[test]
    fn serde_roundtrip() {
        let c = NodeConfig::default();
        let json = serde_json::to_string(&c).unwrap();
        let c2: NodeConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(c.device_id, c2.device_id);
        assert_eq!(c.publish_interval_ms, c2.publish_interval_ms);
        assert!((c.dedup_resolution - c2.dedup_resolution).abs() < f32::EPSILON);
    }
}
