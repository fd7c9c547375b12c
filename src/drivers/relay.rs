//! Relay output driver.
//!
//! One active-HIGH relay per actuator.  Generic over `embedded-hal` 1.0
//! [`OutputPin`], so the ESP-IDF `PinDriver` plugs in on target and a
//! recording pin is enough for host tests.
//!
//! The relay is forced LOW on construction: nothing switches on at boot
//! until a command says so.

use embedded_hal::digital::OutputPin;
use log::debug;

use crate::error::ActuatorError;

pub struct RelayDriver<P> {
    pin: P,
    gpio: i32,
    on: bool,
}

impl<P: OutputPin> RelayDriver<P> {
    /// Take ownership of `pin` and drive it LOW.
    pub fn new(mut pin: P, gpio: i32) -> Result<Self, ActuatorError> {
        pin.set_low().map_err(|_| ActuatorError::GpioWriteFailed)?;
        debug!("relay: GPIO{} initialised LOW", gpio);
        Ok(Self {
            pin,
            gpio,
            on: false,
        })
    }

    pub fn set(&mut self, on: bool) -> Result<(), ActuatorError> {
        let res = if on {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        res.map_err(|_| ActuatorError::GpioWriteFailed)?;
        self.on = on;
        Ok(())
    }

    /// Last level successfully written.
    pub fn is_on(&self) -> bool {
        self.on
    }

    pub fn gpio(&self) -> i32 {
        self.gpio
    }
}
