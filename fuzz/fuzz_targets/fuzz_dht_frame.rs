//! Fuzz target: `dht::decode_frame`
//!
//! Any accepted frame must decode to an in-range reading.
//!
//! cargo fuzz run fuzz_dht_frame

#![no_main]

use libfuzzer_sys::fuzz_target;
use plantnode::sensors::dht::decode_frame;

fuzz_target!(|data: [u8; 5]| {
    if let Ok(r) = decode_frame(data) {
        assert!((0.0..=100.0).contains(&r.humidity_pct));
        assert!((-40.0..=80.0).contains(&r.temperature_c));
    }
});
