//! Telemetry setup shared by the entity sync binaries and tests.

pub mod tracing;
