//! Sensor subsystem: smoothing, scaling, drivers, and the sampling [`SensorHub`].
//!
//! The hub owns the [`RingSmoother`] and produces a [`SensorSnapshot`]
//! every sampling tick.  Raw values come in through the
//! [`SensorPort`](crate::app::ports::SensorPort); failed reads are
//! absorbed here and never reach downstream consumers.

pub mod analog;
pub mod dht;
pub mod scaling;
pub mod smoother;

use log::{debug, warn};

use crate::app::ports::SensorPort;
use smoother::{RingSmoother, Sample, WINDOW};

// ---------------------------------------------------------------------------
// Sensor snapshot
// ---------------------------------------------------------------------------

/// Smoothed readings of every channel at one sampling tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SensorSnapshot {
    /// Air temperature (°C).
    pub temperature_c: f32,
    /// Relative humidity (%).
    pub humidity_pct: f32,
    /// Raw soil moisture ADC count (higher = drier).
    pub soil_moisture_raw: u16,
    /// Raw light ADC count (higher = brighter).
    pub light_raw: u16,
    /// Milliseconds since boot when the snapshot was taken.
    pub timestamp_ms: u64,
}

impl SensorSnapshot {
    pub fn moisture_percent(&self) -> u8 {
        scaling::moisture_percent(self.soil_moisture_raw)
    }

    pub fn light_percent(&self) -> u8 {
        scaling::light_percent(self.light_raw)
    }
}

// ---------------------------------------------------------------------------
// SensorHub
// ---------------------------------------------------------------------------

/// Samples every channel, smooths, and keeps the latest snapshot.
pub struct SensorHub<const N: usize = WINDOW> {
    smoother: RingSmoother<N>,
    latest: SensorSnapshot,
    ticks: u64,
}

impl<const N: usize> SensorHub<N> {
    pub fn new() -> Self {
        Self {
            smoother: RingSmoother::new(),
            latest: SensorSnapshot::default(),
            ticks: 0,
        }
    }

    /// Read all channels once, advance the window, and publish a new snapshot.
    ///
    /// Individual read failures are logged and the stale slot is retained;
    /// a flaky sensor must not stall the control loop.
    pub fn sample(&mut self, port: &mut impl SensorPort, now_ms: u64) -> SensorSnapshot {
        let reads = [
            port.read_temperature().map(Sample::Temperature),
            port.read_humidity().map(Sample::Humidity),
            port.read_soil_moisture().map(Sample::SoilMoisture),
            port.read_light().map(Sample::Light),
        ];

        for read in reads {
            match read {
                Ok(sample) => {
                    if !self.smoother.record(sample) {
                        warn!("sensor: rejected {:?}, keeping stale slot", sample);
                    }
                }
                Err(e) => warn!("sensor: read failed ({}), keeping stale slot", e),
            }
        }
        self.smoother.advance();
        self.ticks += 1;

        // Snapshot timestamps never go backwards, even if the clock does.
        let timestamp_ms = now_ms.max(self.latest.timestamp_ms);
        self.latest = SensorSnapshot {
            temperature_c: self.smoother.temperature(),
            humidity_pct: self.smoother.humidity(),
            soil_moisture_raw: self.smoother.soil_moisture(),
            light_raw: self.smoother.light(),
            timestamp_ms,
        };

        debug!(
            "sensor: smoothed T={:.1}C H={:.1}% M={} L={}",
            self.latest.temperature_c,
            self.latest.humidity_pct,
            self.latest.soil_moisture_raw,
            self.latest.light_raw,
        );
        self.latest
    }

    /// Most recent snapshot (all-zero before the first tick).
    pub fn latest(&self) -> SensorSnapshot {
        self.latest
    }

    /// Sampling ticks since start-up.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

impl<const N: usize> Default for SensorHub<N> {
    fn default() -> Self {
        Self::new()
    }
}
