//! Frame sinks for rendered scroll sweeps.

/// Sink trait plus in-memory and PNG-sequence sinks.
pub mod sink;
