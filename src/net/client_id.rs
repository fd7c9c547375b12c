//! Randomised MQTT client identifiers.
//!
//! Every reconnect episode uses a fresh id of the form `<prefix><hex>`,
//! e.g. `ESP32-3fa2`, so a half-open session on the broker never
//! collides with the new one.

use core::fmt::Write;

/// Prefix (≤ 16) + up to 4 hex digits.
pub type ClientId = heapless::String<24>;

/// Source of 16 bits of entropy.  Injectable so tests are deterministic.
pub type EntropySource = fn() -> u16;

/// Build `<prefix><entropy as lowercase hex>`.
pub fn client_id(prefix: &str, entropy: u16) -> ClientId {
    let mut id = ClientId::new();
    let _ = write!(id, "{}{:x}", prefix, entropy);
    id
}

/// Hardware RNG.
#[cfg(target_os = "espidf")]
pub fn hardware_entropy() -> u16 {
    let mut buf = [0u8; 2];
    // SAFETY: esp_fill_random writes exactly `buf.len()` bytes into a
    // buffer we own.
    unsafe {
        esp_idf_svc::sys::esp_fill_random(buf.as_mut_ptr().cast(), buf.len());
    }
    u16::from_le_bytes(buf)
}

/// Simulation: non-cryptographic entropy from `RandomState`.
#[cfg(not(target_os = "espidf"))]
pub fn hardware_entropy() -> u16 {
    use std::collections::hash_map::RandomState;
    use std::hash::{BuildHasher, Hasher};

    RandomState::new().build_hasher().finish() as u16
}
