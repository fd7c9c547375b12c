//! Plant monitoring node firmware library.
//!
//! Exposes the pure-logic modules for integration testing and the ESP-IDF
//! binary.  All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod error;
pub mod net;
pub mod pins;
pub mod sensors;
pub mod telemetry;
pub mod topics;

pub mod adapters;
pub mod drivers;
