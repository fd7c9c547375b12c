//! Change detector: suppresses telemetry when nothing meaningful moved.
//!
//! A [`Fingerprint`] is a lossy, integer-quantised image of a snapshot.
//! Sub-resolution jitter in the float channels (and the timestamp, which
//! is not part of the fingerprint) never triggers a publish.

use core::fmt;

use crate::sensors::SensorSnapshot;

/// Quantised reading set, compared for equality only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    pub temperature: i32,
    pub humidity: i32,
    pub moisture: u16,
    pub light: u16,
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "T:{}H:{}M:{}L:{}",
            self.temperature, self.humidity, self.moisture, self.light
        )
    }
}

/// Float → bucket index, truncating toward zero.  `resolution` of 1.0
/// is plain integer truncation.
fn quantise(value: f32, resolution: f32) -> i32 {
    if !value.is_finite() {
        return i32::MIN;
    }
    (value / resolution).trunc() as i32
}

/// Remembers the last *published* fingerprint.
#[derive(Debug, Clone)]
pub struct ChangeDetector {
    resolution: f32,
    last: Option<Fingerprint>,
}

impl ChangeDetector {
    /// `resolution` must be positive; anything else falls back to 1.0.
    pub fn new(resolution: f32) -> Self {
        let resolution = if resolution.is_finite() && resolution > 0.0 {
            resolution
        } else {
            1.0
        };
        Self {
            resolution,
            last: None,
        }
    }

    pub fn fingerprint(&self, snap: &SensorSnapshot) -> Fingerprint {
        Fingerprint {
            temperature: quantise(snap.temperature_c, self.resolution),
            humidity: quantise(snap.humidity_pct, self.resolution),
            moisture: snap.soil_moisture_raw,
            light: snap.light_raw,
        }
    }

    /// `Some(fp)` if `snap` differs from the stored fingerprint.  Does not
    /// update it; call [`commit`](Self::commit) once the data is out.
    pub fn check(&self, snap: &SensorSnapshot) -> Option<Fingerprint> {
        let fp = self.fingerprint(snap);
        (self.last != Some(fp)).then_some(fp)
    }

    pub fn commit(&mut self, fp: Fingerprint) {
        self.last = Some(fp);
    }

    /// Check and, if changed, store.  A second call with the same
    /// snapshot returns `false`.
    pub fn has_changed(&mut self, snap: &SensorSnapshot) -> bool {
        match self.check(snap) {
            Some(fp) => {
                self.commit(fp);
                true
            }
            None => false,
        }
    }

    pub fn last(&self) -> Option<Fingerprint> {
        self.last
    }
}

impl Default for ChangeDetector {
    fn default() -> Self {
        Self::new(1.0)
    }
}
