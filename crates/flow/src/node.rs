use rolegate_core::NodeId;

use crate::Message;

/// What a node emitted for one input: at most one message per output port.
///
/// Port `i` feeds every node wired to output `i`. An empty slot means nothing
/// is sent on that port for this input.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Outputs(Vec<Option<Message>>);

impl Outputs {
    /// Nothing sent on any port.
    pub fn none() -> Self {
        Self(Vec::new())
    }

    /// Send `message` on `port` only.
    pub fn on(port: usize, message: Message) -> Self {
        let mut slots = vec![None; port + 1];
        slots[port] = Some(message);
        Self(slots)
    }

    pub fn port(&self, port: usize) -> Option<&Message> {
        self.0.get(port).and_then(Option::as_ref)
    }

    /// Number of ports that carry a message.
    pub fn sent(&self) -> usize {
        self.0.iter().filter(|slot| slot.is_some()).count()
    }

    /// `(port, message)` pairs for every occupied port, in port order.
    pub fn into_sent(self) -> impl Iterator<Item = (usize, Message)> {
        self.0
            .into_iter()
            .enumerate()
            .filter_map(|(port, slot)| slot.map(|m| (port, m)))
    }
}

/// A unit of processing in a flow.
///
/// Implementations must be synchronous and must not hold per-message state
/// across calls: the host may call `receive` concurrently for independent
/// messages.
pub trait Node: Send + Sync {
    fn id(&self) -> &NodeId;

    /// Registered type name (e.g. `"role-check"`).
    fn type_name(&self) -> &str;

    fn name(&self) -> Option<&str> {
        None
    }

    /// Number of output ports this node exposes.
    fn output_count(&self) -> usize;

    /// Process one message and say where it goes next.
    fn receive(&self, message: Message) -> Outputs;
}

/// Terminal node that accepts anything and emits nothing.
///
/// Registered as `"helper"`; pair it with [`crate::Flow::tap`] to observe what
/// reaches a point in the flow.
#[derive(Debug, Clone)]
pub struct CaptureNode {
    id: NodeId,
    name: Option<String>,
}

impl CaptureNode {
    pub const TYPE_NAME: &'static str = "helper";

    pub fn new(id: NodeId, name: Option<String>) -> Self {
        Self { id, name }
    }
}

impl Node for CaptureNode {
    fn id(&self) -> &NodeId {
        &self.id
    }

    fn type_name(&self) -> &str {
        Self::TYPE_NAME
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn output_count(&self) -> usize {
        0
    }

    fn receive(&self, _message: Message) -> Outputs {
        Outputs::none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn on_fills_only_the_requested_port() {
        let msg = Message::new(json!({ "a": 1 }));
        let out = Outputs::on(1, msg.clone());

        assert_eq!(out.sent(), 1);
        assert!(out.port(0).is_none());
        assert_eq!(out.port(1), Some(&msg));
        assert!(out.port(2).is_none());

        let sent: Vec<_> = out.into_sent().collect();
        assert_eq!(sent, vec![(1, msg)]);
    }

    #[test]
    fn capture_node_swallows_input() {
        let node = CaptureNode::new(NodeId::new("n2"), None);
        assert_eq!(node.output_count(), 0);
        assert_eq!(node.receive(Message::new(json!(null))).sent(), 0);
    }
}
