//! Outbound telemetry: change detection, wire schema, and the publisher.

pub mod dedup;
pub mod publisher;
pub mod schema;

pub use dedup::{ChangeDetector, Fingerprint};
pub use publisher::{PublishReport, TelemetryOutcome, TelemetryPublisher};
