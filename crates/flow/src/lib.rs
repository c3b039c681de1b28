//! `rolegate-flow` — messages, nodes and the wiring between them.
//!
//! The production flow engine is somebody else's job; this crate holds the
//! contracts nodes are written against plus a small in-memory flow used for
//! tests and replay tooling.

pub mod flow;
pub mod message;
pub mod node;
pub mod registry;
pub mod tap;

pub use flow::{DEFAULT_MAX_DELIVERIES, Delivery, Flow, FlowError};
pub use message::{AuthToken, Message};
pub use node::{CaptureNode, Node, Outputs};
pub use registry::{NodeDef, NodeFactory, NodeRegistry};
pub use tap::Tap;
