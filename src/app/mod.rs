//! Application core: pure domain logic, zero I/O.
//!
//! Actuator state, command decoding and dispatch, advisory rules, and the
//! [`NodeService`](service::NodeService) control loop that ties them to
//! sensing, telemetry, and the broker link.  All interaction with
//! hardware and the network happens through **port traits** defined in
//! [`ports`], keeping this layer fully testable without real peripherals.

pub mod actuators;
pub mod advisory;
pub mod commands;
pub mod dispatcher;
pub mod events;
pub mod ports;
pub mod service;
