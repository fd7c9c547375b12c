//! Broker link: client identity and the reconnect state machine.

pub mod client_id;
pub mod connectivity;

pub use connectivity::{ConnectionState, Connectivity, LinkTransition};
