//! Replay newline-delimited JSON messages through a flow.

use std::io::{BufRead, Write};

use anyhow::Context;
use serde::Serialize;

use rolegate_core::NodeId;
use rolegate_flow::{Flow, Message, NodeRegistry};

/// Registry with every node type this host knows about.
pub fn registry() -> NodeRegistry {
    let mut registry = NodeRegistry::with_builtins();
    rolegate_auth::register(&mut registry);
    registry
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReplayStats {
    /// Input lines accepted as messages.
    pub messages: usize,
    /// Deliveries written to the output.
    pub deliveries: usize,
    /// Input lines that were not valid messages.
    pub rejected: usize,
}

#[derive(Serialize)]
struct DeliveryLine<'a> {
    node: &'a NodeId,
    msg: &'a Message,
}

/// Read one message per line from `input`, inject each at `entry`, and write
/// one JSON line per delivery to `output`.
///
/// Blank lines are skipped. Lines that do not parse as a message are logged
/// and counted, not fatal. Flow errors (unknown entry, delivery limit) and
/// IO failures abort the replay.
pub fn replay<R, W>(flow: &Flow, entry: &NodeId, input: R, mut output: W) -> anyhow::Result<ReplayStats>
where
    R: BufRead,
    W: Write,
{
    let mut stats = ReplayStats::default();

    for (idx, line) in input.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.with_context(|| format!("failed to read input line {line_no}"))?;
        if line.trim().is_empty() {
            continue;
        }

        let message: Message = match serde_json::from_str(&line) {
            Ok(m) => m,
            Err(err) => {
                tracing::warn!(line = line_no, %err, "skipping malformed message");
                stats.rejected += 1;
                continue;
            }
        };
        stats.messages += 1;

        let deliveries = flow
            .inject(entry, message)
            .with_context(|| format!("routing message from line {line_no}"))?;

        for delivery in &deliveries {
            serde_json::to_writer(
                &mut output,
                &DeliveryLine {
                    node: &delivery.node,
                    msg: &delivery.message,
                },
            )
            .context("failed to encode delivery")?;
            output.write_all(b"\n").context("failed to write delivery")?;
            stats.deliveries += 1;
        }
    }

    output.flush().context("failed to flush output")?;
    Ok(stats)
}
