//! DHT22 (AM2302) temperature / humidity sensor driver.
//!
//! Single-wire protocol on one open-drain GPIO:
//!
//! ```text
//!  host  ▔▔▔▁▁▁▁▁▁(≥1 ms)▁▔▔(30 µs)
//!  dht                          ▁▁(80 µs)▔▔(80 µs) [40 bits]
//!  bit   ▁▁(50 µs)▔▔(26–28 µs = 0 | 70 µs = 1)
//! ```
//!
//! Frame: humidity ×10 (u16 BE), temperature ×10 (sign-magnitude u16 BE),
//! checksum = low byte of the sum of the first four bytes.
//!
//! Generic over `embedded-hal` 1.0 pin and delay traits, so it runs on the
//! ESP-IDF `PinDriver` in production and only the frame decoding is
//! exercised on host.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::error::SensorError;

/// Longest wait for any single line transition (µs).
const EDGE_TIMEOUT_US: u32 = 100;
/// High pulses longer than this encode a `1` bit (µs).
const ONE_THRESHOLD_US: u32 = 40;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DhtReading {
    pub humidity_pct: f32,
    pub temperature_c: f32,
}

/// Anything that can produce a combined temperature / humidity reading.
pub trait Hygrometer {
    fn read(&mut self) -> Result<DhtReading, SensorError>;
}

/// Verify the checksum and convert a raw 5-byte frame.
pub fn decode_frame(frame: [u8; 5]) -> Result<DhtReading, SensorError> {
    let sum = frame[..4]
        .iter()
        .fold(0u8, |acc, &b| acc.wrapping_add(b));
    if sum != frame[4] {
        return Err(SensorError::ChecksumMismatch);
    }

    let humidity = u16::from_be_bytes([frame[0], frame[1]]) as f32 / 10.0;
    let magnitude = u16::from_be_bytes([frame[2] & 0x7F, frame[3]]) as f32 / 10.0;
    let temperature = if frame[2] & 0x80 != 0 {
        -magnitude
    } else {
        magnitude
    };

    if !(0.0..=100.0).contains(&humidity) || !(-40.0..=80.0).contains(&temperature) {
        return Err(SensorError::InvalidReading);
    }

    Ok(DhtReading {
        humidity_pct: humidity,
        temperature_c: temperature,
    })
}

/// DHT22 on an open-drain input/output pin.
pub struct Dht22<P, D> {
    pin: P,
    delay: D,
}

impl<P, D> Dht22<P, D>
where
    P: InputPin + OutputPin,
    D: DelayNs,
{
    pub fn new(pin: P, delay: D) -> Self {
        Self { pin, delay }
    }

    /// Wait until the line reads `high`; returns the elapsed microseconds.
    fn wait_for(&mut self, high: bool) -> Result<u32, SensorError> {
        let mut elapsed = 0;
        loop {
            let level = self.pin.is_high().map_err(|_| SensorError::Timeout)?;
            if level == high {
                return Ok(elapsed);
            }
            if elapsed >= EDGE_TIMEOUT_US {
                return Err(SensorError::Timeout);
            }
            self.delay.delay_us(1);
            elapsed += 1;
        }
    }

    fn read_frame(&mut self) -> Result<[u8; 5], SensorError> {
        // Start signal.
        self.pin.set_low().map_err(|_| SensorError::Timeout)?;
        self.delay.delay_us(1_100);
        self.pin.set_high().map_err(|_| SensorError::Timeout)?;
        self.delay.delay_us(30);

        // Sensor response: 80 µs low, 80 µs high.
        self.wait_for(false)?;
        self.wait_for(true)?;
        self.wait_for(false)?;

        let mut frame = [0u8; 5];
        for bit in 0..40 {
            self.wait_for(true)?;
            let high_us = self.wait_for(false)?;
            if high_us > ONE_THRESHOLD_US {
                frame[bit / 8] |= 0x80 >> (bit % 8);
            }
        }
        Ok(frame)
    }
}

impl<P, D> Hygrometer for Dht22<P, D>
where
    P: InputPin + OutputPin,
    D: DelayNs,
{
    fn read(&mut self) -> Result<DhtReading, SensorError> {
        let frame = self.read_frame();
        // Release the line whatever happened so the next start pulse is clean.
        let _ = self.pin.set_high();
        decode_frame(frame?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_checksum(b: [u8; 4]) -> [u8; 5] {
        let sum = b.iter().fold(0u8, |a, &x| a.wrapping_add(x));
        [b[0], b[1], b[2], b[3], sum]
    }

    #[test]
    fn decodes_positive_temperature() {
        // 65.2 % RH, 35.1 °C
        let r = decode_frame(with_checksum([0x02, 0x8C, 0x01, 0x5F])).unwrap();
        assert!((r.humidity_pct - 65.2).abs() < 1e-4);
        assert!((r.temperature_c - 35.1).abs() < 1e-4);
    }

    #[test]
    fn decodes_negative_temperature() {
        // -10.1 °C
        let r = decode_frame(with_checksum([0x01, 0xF4, 0x80, 0x65])).unwrap();
        assert!((r.temperature_c + 10.1).abs() < 1e-4);
        assert!((r.humidity_pct - 50.0).abs() < 1e-4);
    }

    #[test]
    fn rejects_bad_checksum() {
        let mut frame = with_checksum([0x02, 0x8C, 0x01, 0x5F]);
        frame[4] ^= 0x01;
        assert_eq!(decode_frame(frame), Err(SensorError::ChecksumMismatch));
    }

    #[test]
    fn rejects_implausible_humidity() {
        // 120.0 %
        let frame = with_checksum([0x04, 0xB0, 0x00, 0xC8]);
        assert_eq!(decode_frame(frame), Err(SensorError::InvalidReading));
    }

    #[test]
    fn checksum_wraps() {
        let frame = with_checksum([0x03, 0xE8, 0x00, 0xFA]);
        assert_eq!(frame[4], 0xE5);
        let r = decode_frame(frame).unwrap();
        assert!((r.humidity_pct - 100.0).abs() < 1e-4);
        assert!((r.temperature_c - 25.0).abs() < 1e-4);
    }
}
