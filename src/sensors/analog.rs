//! Analog channels: soil moisture probe and light sensor on ADC1.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: ADC1 oneshot driver, 12 dB attenuation, 12-bit width.
//! On host/test: reads from static atomics for injection.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicBool, AtomicU16, Ordering};

use crate::error::SensorError;
use crate::pins;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

/// ADC1 channels used by the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalogChannel {
    /// GPIO 34 (ADC1_CH6).
    SoilMoisture,
    /// GPIO 35 (ADC1_CH7).
    Light,
}

impl AnalogChannel {
    pub const ALL: [Self; 2] = [Self::SoilMoisture, Self::Light];

    /// Pad the channel is wired to.
    pub fn gpio(self) -> i32 {
        match self {
            Self::SoilMoisture => pins::SOIL_MOISTURE_GPIO,
            Self::Light => pins::LIGHT_GPIO,
        }
    }
}

#[cfg(not(target_os = "espidf"))]
static SIM_MOISTURE_RAW: AtomicU16 = AtomicU16::new(0);
#[cfg(not(target_os = "espidf"))]
static SIM_LIGHT_RAW: AtomicU16 = AtomicU16::new(0);
#[cfg(not(target_os = "espidf"))]
static SIM_FAIL: AtomicBool = AtomicBool::new(false);

/// Host simulation: set the raw count returned for `channel`.
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_raw(channel: AnalogChannel, raw: u16) {
    match channel {
        AnalogChannel::SoilMoisture => SIM_MOISTURE_RAW.store(raw, Ordering::Relaxed),
        AnalogChannel::Light => SIM_LIGHT_RAW.store(raw, Ordering::Relaxed),
    }
}

/// Host simulation: make every read fail until cleared.
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_failing(failing: bool) {
    SIM_FAIL.store(failing, Ordering::Relaxed);
}

// ── ESP-IDF oneshot ADC ──────────────────────────────────────

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

#[cfg(target_os = "espidf")]
fn channel_id(channel: AnalogChannel) -> adc_channel_t {
    match channel {
        AnalogChannel::SoilMoisture => adc_channel_t_ADC_CHANNEL_6,
        AnalogChannel::Light => adc_channel_t_ADC_CHANNEL_7,
    }
}

/// Configure ADC1 and both channels.  Call once from `main()` before the
/// control loop starts.
#[cfg(target_os = "espidf")]
pub fn init() -> Result<(), SensorError> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is only written here, once at boot, before any read.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) };
    if ret != ESP_OK as i32 {
        return Err(SensorError::AdcReadFailed);
    }

    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };
    for ch in AnalogChannel::ALL {
        // SAFETY: handle initialised above; single-threaded boot path.
        let ret = unsafe { adc_oneshot_config_channel(ADC1_HANDLE, channel_id(ch), &chan_cfg) };
        if ret != ESP_OK as i32 {
            return Err(SensorError::AdcReadFailed);
        }
    }
    log::info!(
        "analog: ADC1 configured (soil GPIO{}, light GPIO{})",
        AnalogChannel::SoilMoisture.gpio(),
        AnalogChannel::Light.gpio()
    );
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init() -> Result<(), SensorError> {
    log::info!("analog(sim): ADC init skipped");
    Ok(())
}

/// Read one raw 12-bit count.
#[cfg(target_os = "espidf")]
pub fn read_raw(channel: AnalogChannel) -> Result<u16, SensorError> {
    let mut raw: i32 = 0;
    // SAFETY: ADC1_HANDLE is written once in init() before the control loop;
    // reads happen only on the control thread.
    let ret = unsafe { adc_oneshot_read(ADC1_HANDLE, channel_id(channel), &mut raw) };
    if ret != ESP_OK as i32 {
        return Err(SensorError::AdcReadFailed);
    }
    Ok(raw.clamp(0, 4095) as u16)
}

/// Read one raw count from the simulation atomics.
#[cfg(not(target_os = "espidf"))]
pub fn read_raw(channel: AnalogChannel) -> Result<u16, SensorError> {
    if SIM_FAIL.load(Ordering::Relaxed) {
        return Err(SensorError::AdcReadFailed);
    }
    Ok(match channel {
        AnalogChannel::SoilMoisture => SIM_MOISTURE_RAW.load(Ordering::Relaxed),
        AnalogChannel::Light => SIM_LIGHT_RAW.load(Ordering::Relaxed),
    })
}

#[cfg(all(test, not(target_os = "espidf")))]
mod tests {
    use super::*;

    #[test]
    fn channels_map_to_adc1_pads() {
        assert_eq!(AnalogChannel::SoilMoisture.gpio(), 34);
        assert_eq!(AnalogChannel::Light.gpio(), 35);
    }

    // Single test: the simulation atomics are process-wide.
    #[test]
    fn sim_channels_read_back_and_fail_on_demand() {
        assert!(init().is_ok());
        sim_set_raw(AnalogChannel::SoilMoisture, 612);
        sim_set_raw(AnalogChannel::Light, 3_100);
        assert_eq!(read_raw(AnalogChannel::SoilMoisture), Ok(612));
        assert_eq!(read_raw(AnalogChannel::Light), Ok(3_100));

        sim_set_failing(true);
        assert_eq!(
            read_raw(AnalogChannel::Light),
            Err(SensorError::AdcReadFailed)
        );
        sim_set_failing(false);
        assert_eq!(read_raw(AnalogChannel::Light), Ok(3_100));
    }
}
