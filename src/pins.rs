//! GPIO pin assignments for the plant node (ESP32 DevKit).
//!
//! Single source of truth: `main` claims exactly these pins from the HAL
//! and drivers log them.  Change a pin here and in the matching
//! `peripherals.pins.gpioN` claim together.

// ---------------------------------------------------------------------------
// Sensors
// ---------------------------------------------------------------------------

/// DHT22 data line (open-drain, external 10 kΩ pull-up).
pub const DHT_GPIO: i32 = 4;
/// Capacitive soil-moisture probe, ADC1 channel 6.
pub const SOIL_MOISTURE_GPIO: i32 = 34;
/// LDR light sensor divider, ADC1 channel 7.
pub const LIGHT_GPIO: i32 = 35;

// ---------------------------------------------------------------------------
// Relays (active HIGH)
// ---------------------------------------------------------------------------

pub const PUMP_GPIO: i32 = 5;
pub const FAN_GPIO: i32 = 18;
pub const GROW_LIGHT_GPIO: i32 = 19;
