//! Decision explanation (audit trail) for role-check gates.

use serde::Serialize;

use rolegate_core::{MessageId, NodeId};
use rolegate_flow::{Message, Node};

use crate::claims::{CLAIM_SOURCE, claim_role};
use crate::gate::{Decision, DenialKind, RoleGate};

/// Auditable account of why a gate allowed or denied a message.
///
/// Producing it has no effect on routing; it reads the same inputs
/// [`RoleGate::evaluate`] does.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionExplanation {
    pub node: NodeId,
    pub msg_id: MessageId,

    /// Role as configured on the gate.
    pub required_role: String,

    /// Uppercased requirement, absent when the gate is misconfigured.
    pub normalized_role: Option<String>,

    pub claim_source: &'static str,
    pub observed_claim: Option<String>,

    pub granted: bool,

    /// Human-readable reason for the decision.
    pub reason: String,

    pub denial_reason: Option<DenialReason>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DenialReason {
    pub kind: DenialKind,
    pub message: String,
    pub suggestions: Vec<String>,
}

/// Explain what `gate` decides for `message`.
pub fn explain_decision(gate: &RoleGate, message: &Message) -> DecisionExplanation {
    let config = gate.config();
    let required = config.required_role().to_string();
    let normalized = config.normalized_role().map(|r| r.as_str().to_string());
    let observed = claim_role(message).map(str::to_string);

    let (granted, reason, denial_reason) = match gate.decide(message) {
        Decision::Allowed => (
            true,
            format!("Claim '{}' equals required role", normalized.as_deref().unwrap_or_default()),
            None,
        ),
        Decision::Denied(kind) => {
            let (message, suggestions) =
                denial_detail(kind, &required, normalized.as_deref(), observed.as_deref());
            (
                false,
                format!("Access denied: {required} only"),
                Some(DenialReason {
                    kind,
                    message,
                    suggestions,
                }),
            )
        }
    };

    DecisionExplanation {
        node: gate.id().clone(),
        msg_id: message.msg_id().clone(),
        required_role: required,
        normalized_role: normalized,
        claim_source: CLAIM_SOURCE,
        observed_claim: observed,
        granted,
        reason,
        denial_reason,
    }
}

fn denial_detail(
    kind: DenialKind,
    required: &str,
    normalized: Option<&str>,
    observed: Option<&str>,
) -> (String, Vec<String>) {
    match kind {
        DenialKind::Misconfigured => (
            format!("Gate has no usable required role (configured: {required:?})"),
            vec!["Set a non-empty requiredRole on the node and redeploy".to_string()],
        ),
        DenialKind::MissingClaim => (
            format!("Message carries no role at '{CLAIM_SOURCE}'"),
            vec![
                "Ensure the authentication step runs before this gate".to_string(),
                "Check that the issued token includes a role claim".to_string(),
            ],
        ),
        DenialKind::RoleMismatch => {
            let normalized = normalized.unwrap_or_default();
            let observed = observed.unwrap_or_default();
            let mut suggestions = vec![format!("Issue a token whose role is '{normalized}'")];
            if observed.to_uppercase() == normalized {
                suggestions.insert(
                    0,
                    format!("Claim '{observed}' differs only by case; claims are compared exactly"),
                );
            }
            (
                format!("Claim '{observed}' does not equal required role '{normalized}'"),
                suggestions,
            )
        }
    }
}
