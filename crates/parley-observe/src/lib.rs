//! Observability setup for parley: structured logging via `tracing` with
//! optional OpenTelemetry export.

pub mod tracing_setup;
