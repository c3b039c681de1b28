//! Replay host: loads a flow definition and drives messages through it.

pub mod config;
pub mod replay;

pub use config::{HostConfig, HostConfigError};
pub use replay::{ReplayStats, registry, replay};
