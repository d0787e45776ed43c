//! Observability setup for Consulta: structured logging and optional
//! OpenTelemetry trace export.

pub mod tracing_setup;
