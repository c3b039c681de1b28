//! In-memory flow: live nodes plus the wires between them.
//!
//! This is a small synchronous stand-in for a flow engine, used by tests and
//! the replay tool. A message injected at one node is delivered breadth-first
//! along wires until no node emits anything further.

use std::collections::{BTreeMap, HashSet, VecDeque};

use anyhow::Context;
use thiserror::Error;

use rolegate_core::{ConfigError, ConfigResult, NodeId};

use crate::node::Node;
use crate::registry::{NodeDef, NodeRegistry};
use crate::tap::{Tap, TapSet};
use crate::Message;

/// Upper bound on deliveries triggered by one injected message.
pub const DEFAULT_MAX_DELIVERIES: usize = 10_000;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FlowError {
    #[error("unknown node '{0}'")]
    UnknownNode(NodeId),

    /// The wiring kept producing messages past the configured bound
    /// (usually a cycle).
    #[error("delivery limit of {limit} exceeded")]
    DeliveryLimit { limit: usize },
}

/// A message arriving at a node.
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    pub node: NodeId,
    pub message: Message,
}

struct LiveNode {
    node: Box<dyn Node>,
    wires: Vec<Vec<NodeId>>,
    taps: TapSet,
}

pub struct Flow {
    nodes: BTreeMap<NodeId, LiveNode>,
    max_deliveries: usize,
}

impl Flow {
    /// Instantiate every definition through `registry` and validate wiring.
    pub fn load(defs: Vec<NodeDef>, registry: &NodeRegistry) -> ConfigResult<Self> {
        let ids: HashSet<&NodeId> = defs.iter().map(|d| &d.id).collect();
        let mut nodes = BTreeMap::new();

        for def in &defs {
            if nodes.contains_key(&def.id) {
                return Err(ConfigError::DuplicateNode(def.id.clone()));
            }

            for target in def.wires.iter().flatten() {
                if !ids.contains(target) {
                    return Err(ConfigError::UnknownWireTarget {
                        from: def.id.clone(),
                        to: target.clone(),
                    });
                }
            }

            let node = registry.create(def)?;
            if def.wires.len() > node.output_count() {
                return Err(ConfigError::TooManyOutputs {
                    node: def.id.clone(),
                    wired: def.wires.len(),
                    outputs: node.output_count(),
                });
            }

            tracing::debug!(node = %def.id, node_type = %def.type_name, "node loaded");
            nodes.insert(
                def.id.clone(),
                LiveNode {
                    node,
                    wires: def.wires.clone(),
                    taps: TapSet::default(),
                },
            );
        }

        Ok(Self {
            nodes,
            max_deliveries: DEFAULT_MAX_DELIVERIES,
        })
    }

    /// Parse a JSON array of node definitions and load it.
    pub fn from_json(json: &str, registry: &NodeRegistry) -> anyhow::Result<Self> {
        let defs: Vec<NodeDef> =
            serde_json::from_str(json).context("flow definition is not a JSON array of nodes")?;
        let flow = Self::load(defs, registry).context("flow definition rejected")?;
        Ok(flow)
    }

    pub fn with_max_deliveries(mut self, limit: usize) -> Self {
        self.max_deliveries = limit;
        self
    }

    pub fn node(&self, id: &NodeId) -> Option<&dyn Node> {
        self.nodes.get(id).map(|live| live.node.as_ref())
    }

    /// Observe every message delivered to `id` from now on.
    pub fn tap(&self, id: &NodeId) -> Result<Tap, FlowError> {
        self.nodes
            .get(id)
            .map(|live| live.taps.attach())
            .ok_or_else(|| FlowError::UnknownNode(id.clone()))
    }

    /// Deliver `message` to `entry` and follow the wires.
    ///
    /// Returns every delivery in the order it happened, starting with the one
    /// to `entry`. A message sent on a port wired to several nodes is copied
    /// to each of them.
    pub fn inject(&self, entry: &NodeId, message: Message) -> Result<Vec<Delivery>, FlowError> {
        if !self.nodes.contains_key(entry) {
            return Err(FlowError::UnknownNode(entry.clone()));
        }

        let mut queue = VecDeque::from([(entry.clone(), message)]);
        let mut deliveries = Vec::new();

        while let Some((target, message)) = queue.pop_front() {
            if deliveries.len() == self.max_deliveries {
                tracing::warn!(limit = self.max_deliveries, "flow delivery limit exceeded");
                return Err(FlowError::DeliveryLimit {
                    limit: self.max_deliveries,
                });
            }

            // Wires are validated at load time.
            let Some(live) = self.nodes.get(&target) else {
                return Err(FlowError::UnknownNode(target));
            };

            tracing::trace!(node = %target, msg_id = %message.msg_id(), "delivering message");
            live.taps.notify(&message);
            deliveries.push(Delivery {
                node: target,
                message: message.clone(),
            });

            for (port, out) in live.node.receive(message).into_sent() {
                match live.wires.get(port) {
                    Some(targets) => {
                        for next in targets {
                            queue.push_back((next.clone(), out.clone()));
                        }
                    }
                    None => {
                        tracing::trace!(node = %live.node.id(), port, "output not wired; dropped");
                    }
                }
            }
        }

        Ok(deliveries)
    }
}

impl core::fmt::Debug for Flow {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Flow")
            .field("nodes", &self.nodes.keys().collect::<Vec<_>>())
            .field("max_deliveries", &self.max_deliveries)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Outputs;
    use serde_json::json;

    /// Forwards every message on output 0.
    struct Relay(NodeId);

    impl Node for Relay {
        fn id(&self) -> &NodeId {
            &self.0
        }

        fn type_name(&self) -> &str {
            "relay"
        }

        fn output_count(&self) -> usize {
            1
        }

        fn receive(&self, message: Message) -> Outputs {
            Outputs::on(0, message)
        }
    }

    fn registry() -> NodeRegistry {
        let mut registry = NodeRegistry::with_builtins();
        registry.register("relay", |def: &NodeDef| {
            Ok(Box::new(Relay(def.id.clone())) as Box<dyn Node>)
        });
        registry
    }

    #[test]
    fn fan_out_copies_to_every_wire() {
        let flow = Flow::load(
            vec![
                NodeDef::new("r", "relay").with_wires(vec![vec!["a".into(), "b".into()]]),
                NodeDef::new("a", "helper"),
                NodeDef::new("b", "helper"),
            ],
            &registry(),
        )
        .unwrap();

        let msg = Message::new(json!({ "x": 1 }));
        let deliveries = flow.inject(&"r".into(), msg.clone()).unwrap();

        let nodes: Vec<&str> = deliveries.iter().map(|d| d.node.as_str()).collect();
        assert_eq!(nodes, vec!["r", "a", "b"]);
        assert!(deliveries.iter().all(|d| d.message == msg));
    }

    #[test]
    fn tap_sees_deliveries() {
        let flow = Flow::load(
            vec![
                NodeDef::new("r", "relay").with_wires(vec![vec!["a".into()]]),
                NodeDef::new("a", "helper"),
            ],
            &registry(),
        )
        .unwrap();
        let tap = flow.tap(&"a".into()).unwrap();

        flow.inject(&"r".into(), Message::new(json!(1))).unwrap();

        let seen = tap.drain();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].payload(), &json!(1));
    }

    #[test]
    fn tap_on_unknown_node_is_rejected() {
        let flow = Flow::load(vec![NodeDef::new("a", "helper")], &registry()).unwrap();
        let err = flow.tap(&"b".into()).unwrap_err();
        assert_eq!(err, FlowError::UnknownNode("b".into()));
    }

    #[test]
    fn cycles_hit_the_delivery_limit() {
        let flow = Flow::load(
            vec![
                NodeDef::new("a", "relay").with_wires(vec![vec!["b".into()]]),
                NodeDef::new("b", "relay").with_wires(vec![vec!["a".into()]]),
            ],
            &registry(),
        )
        .unwrap()
        .with_max_deliveries(16);

        let err = flow.inject(&"a".into(), Message::new(json!(null))).unwrap_err();
        assert_eq!(err, FlowError::DeliveryLimit { limit: 16 });
    }

    #[test]
    fn load_rejects_bad_wiring() {
        let err = Flow::load(
            vec![NodeDef::new("r", "relay").with_wires(vec![vec!["ghost".into()]])],
            &registry(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnknownWireTarget {
                from: "r".into(),
                to: "ghost".into(),
            }
        );

        let err = Flow::load(
            vec![
                NodeDef::new("r", "relay").with_wires(vec![vec![], vec![]]),
            ],
            &registry(),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::TooManyOutputs { wired: 2, outputs: 1, .. }));

        let err = Flow::load(
            vec![NodeDef::new("a", "helper"), NodeDef::new("a", "helper")],
            &registry(),
        )
        .unwrap_err();
        assert_eq!(err, ConfigError::DuplicateNode("a".into()));
    }

    #[test]
    fn from_json_reports_context() {
        let err = Flow::from_json("{\"not\": \"an array\"}", &registry()).unwrap_err();
        assert!(err.to_string().contains("flow definition is not a JSON array"));
    }

    #[test]
    fn inject_into_unknown_node() {
        let flow = Flow::load(vec![], &registry()).unwrap();
        let err = flow.inject(&"nope".into(), Message::new(json!(null))).unwrap_err();
        assert_eq!(err, FlowError::UnknownNode("nope".into()));
    }
}
