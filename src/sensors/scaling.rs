//! Raw-count to percent conversions for the analog channels.
//!
//! Both use integer linear interpolation with truncation toward zero, the
//! same arithmetic the dashboard was calibrated against.  Results are
//! clamped to 0–100 because the ESP32 ADC is 12-bit while the moisture
//! probe is specified for a 10-bit range.

/// Raw moisture reading for a saturated probe.
pub const MOISTURE_RAW_WET: i64 = 0;
/// Raw moisture reading for a dry probe.
pub const MOISTURE_RAW_DRY: i64 = 1023;
/// Full-scale light reading (12-bit ADC).
pub const LIGHT_RAW_MAX: i64 = 4095;

/// Integer linear re-mapping of `x` from `[in_min, in_max]` onto
/// `[out_min, out_max]`.  Either range may be inverted.
pub fn map_range(x: i64, in_min: i64, in_max: i64, out_min: i64, out_max: i64) -> i64 {
    if in_max == in_min {
        return out_min;
    }
    (x - in_min) * (out_max - out_min) / (in_max - in_min) + out_min
}

fn clamp_percent(v: i64) -> u8 {
    v.clamp(0, 100) as u8
}

/// Soil moisture percent: dry (1023) → 0 %, wet (0) → 100 %.
pub fn moisture_percent(raw: u16) -> u8 {
    clamp_percent(map_range(
        i64::from(raw),
        MOISTURE_RAW_DRY,
        MOISTURE_RAW_WET,
        0,
        100,
    ))
}

/// Light percent: dark (0) → 0 %, full scale (4095) → 100 %.
pub fn light_percent(raw: u16) -> u8 {
    clamp_percent(map_range(i64::from(raw), 0, LIGHT_RAW_MAX, 0, 100))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moisture_boundaries() {
        assert_eq!(moisture_percent(1023), 0);
        assert_eq!(moisture_percent(0), 100);
    }

    #[test]
    fn light_boundaries() {
        assert_eq!(light_percent(0), 0);
        assert_eq!(light_percent(4095), 100);
    }

    #[test]
    fn midpoints_truncate() {
        // (500 - 1023) * 100 / -1023 = 51.12
        assert_eq!(moisture_percent(500), 51);
        // 2000 * 100 / 4095 = 48.84
        assert_eq!(light_percent(2000), 48);
    }

    #[test]
    fn moisture_beyond_dry_point_clamps() {
        assert_eq!(moisture_percent(4095), 0);
        assert_eq!(moisture_percent(2000), 0);
    }

    #[test]
    fn degenerate_input_range() {
        assert_eq!(map_range(5, 3, 3, 7, 9), 7);
    }
}
