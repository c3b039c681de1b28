//! `rolegate-auth` — role-based access gate for flow messages.
//!
//! Authentication happens upstream; this crate only reads the claim it left
//! on the message and decides which of two outputs the message takes.

pub mod claims;
pub mod explain;
pub mod gate;
pub mod roles;

pub use claims::{CLAIM_SOURCE, claim_role};
pub use explain::{DecisionExplanation, DenialReason, explain_decision};
pub use gate::{
    ALLOW_PORT, DENY_PORT, Decision, DenialBody, DenialKind, FORBIDDEN, GateConfig, RoleGate,
    Routed, decide, evaluate, register,
};
pub use roles::Role;
