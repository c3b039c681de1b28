//! `rolegate-core` — shared building blocks.
//!
//! Identifiers and the configuration error model used by the flow runtime and
//! the authorization gate. No IO lives here.

pub mod error;
pub mod id;

pub use error::{ConfigError, ConfigResult};
pub use id::{MessageId, NodeId};
