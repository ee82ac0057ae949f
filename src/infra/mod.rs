//! Transport, query encoding and runtime bootstrap.

pub mod error;
pub mod http;
pub mod params;
pub mod telemetry;
