//! Infrastructure adapters and runtime bootstrap.

pub mod contentful;
pub mod error;
pub mod export;
pub mod http;
pub mod telemetry;
