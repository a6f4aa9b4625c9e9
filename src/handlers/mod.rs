//! HTTP handlers: service endpoints and one POST handler per provider.

pub mod files;
pub mod meta;

pub use meta::{heartbeat, providers, HeartbeatResponse, ProvidersResponse};
