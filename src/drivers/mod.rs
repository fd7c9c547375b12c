//! Actuator drivers and chip-level helpers.

pub mod relay;
pub mod watchdog;
