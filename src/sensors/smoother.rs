//! Rolling-average smoothing across all sensor channels.
//!
//! Every channel keeps a fixed window of the last `N` raw samples.  All
//! channels share one write index so the windows stay time-aligned: a
//! sampling tick calls [`RingSmoother::record`] once per channel and then
//! [`RingSmoother::advance`] exactly once.
//!
//! The mean is always taken over all `N` slots, including the zeroes the
//! window starts with.  A rejected sample (NaN temperature, failed read)
//! leaves the previous slot content in place, so one bad read degrades
//! the average instead of corrupting it.

/// Default smoothing window length.
pub const WINDOW: usize = 5;

/// Sensor channel tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Temperature,
    Humidity,
    SoilMoisture,
    Light,
}

impl Channel {
    pub const ALL: [Channel; 4] = [
        Channel::Temperature,
        Channel::Humidity,
        Channel::SoilMoisture,
        Channel::Light,
    ];
}

/// A raw sample tagged with its channel.
///
/// Float channels come from the DHT22; integer channels are raw ADC counts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sample {
    Temperature(f32),
    Humidity(f32),
    SoilMoisture(u16),
    Light(u16),
}

impl Sample {
    pub fn channel(&self) -> Channel {
        match self {
            Self::Temperature(_) => Channel::Temperature,
            Self::Humidity(_) => Channel::Humidity,
            Self::SoilMoisture(_) => Channel::SoilMoisture,
            Self::Light(_) => Channel::Light,
        }
    }
}

// ── Per-type window arithmetic ────────────────────────────────

/// Value types a smoothing window can hold.
pub trait WindowValue: Copy + Default {
    /// Whether a freshly read value may enter the window.
    fn is_valid(&self) -> bool;
    /// Arithmetic mean of all slots.
    fn mean(slots: &[Self]) -> Self;
}

impl WindowValue for f32 {
    fn is_valid(&self) -> bool {
        self.is_finite()
    }

    fn mean(slots: &[Self]) -> Self {
        if slots.is_empty() {
            return 0.0;
        }
        slots.iter().sum::<f32>() / slots.len() as f32
    }
}

impl WindowValue for u16 {
    fn is_valid(&self) -> bool {
        true
    }

    /// Summed in `u32` so `N * u16::MAX` cannot overflow; result truncates.
    fn mean(slots: &[Self]) -> Self {
        if slots.is_empty() {
            return 0;
        }
        let sum: u32 = slots.iter().map(|&v| u32::from(v)).sum();
        (sum / slots.len() as u32) as u16
    }
}

/// Fixed window of `N` slots.  The write position is owned by the
/// [`RingSmoother`], not the window.
#[derive(Debug, Clone)]
pub struct Window<T, const N: usize> {
    slots: [T; N],
}

impl<T: WindowValue, const N: usize> Window<T, N> {
    pub fn new() -> Self {
        Self {
            slots: [T::default(); N],
        }
    }

    /// Store `value` at `index` if it is valid.  Returns whether it was stored.
    fn store(&mut self, index: usize, value: T) -> bool {
        if !value.is_valid() {
            return false;
        }
        self.slots[index] = value;
        true
    }

    pub fn mean(&self) -> T {
        T::mean(&self.slots)
    }

    pub fn slots(&self) -> &[T; N] {
        &self.slots
    }
}

impl<T: WindowValue, const N: usize> Default for Window<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

// ── RingSmoother ──────────────────────────────────────────────

/// Time-aligned rolling averages for the four sensor channels.
#[derive(Debug, Clone)]
pub struct RingSmoother<const N: usize = WINDOW> {
    temperature: Window<f32, N>,
    humidity: Window<f32, N>,
    moisture: Window<u16, N>,
    light: Window<u16, N>,
    index: usize,
}

impl<const N: usize> RingSmoother<N> {
    pub fn new() -> Self {
        Self {
            temperature: Window::new(),
            humidity: Window::new(),
            moisture: Window::new(),
            light: Window::new(),
            index: 0,
        }
    }

    /// Store a raw sample at the current write index of its channel.
    ///
    /// Returns `false` when the sample was rejected (non-finite float); the
    /// stale slot is kept.
    pub fn record(&mut self, sample: Sample) -> bool {
        let i = self.index;
        match sample {
            Sample::Temperature(v) => self.temperature.store(i, v),
            Sample::Humidity(v) => self.humidity.store(i, v),
            Sample::SoilMoisture(v) => self.moisture.store(i, v),
            Sample::Light(v) => self.light.store(i, v),
        }
    }

    /// Move the shared write index forward for all channels.
    pub fn advance(&mut self) {
        self.index = (self.index + 1) % N;
    }

    /// Current write index (next slot to be overwritten).
    pub fn index(&self) -> usize {
        self.index
    }

    /// Rolling mean of `channel`.  Integer channels are truncated before
    /// widening to `f32`.
    pub fn smoothed(&self, channel: Channel) -> f32 {
        match channel {
            Channel::Temperature => self.temperature.mean(),
            Channel::Humidity => self.humidity.mean(),
            Channel::SoilMoisture => f32::from(self.moisture.mean()),
            Channel::Light => f32::from(self.light.mean()),
        }
    }

    pub fn temperature(&self) -> f32 {
        self.temperature.mean()
    }

    pub fn humidity(&self) -> f32 {
        self.humidity.mean()
    }

    pub fn soil_moisture(&self) -> u16 {
        self.moisture.mean()
    }

    pub fn light(&self) -> u16 {
        self.light.mean()
    }
}

impl<const N: usize> Default for RingSmoother<N> {
    fn default() -> Self {
        Self::new()
    }
}
