use std::io;

use anyhow::Context;

use rolegate_flow::Flow;
use rolegate_host::{HostConfig, registry, replay};

fn main() -> anyhow::Result<()> {
    let config = HostConfig::from_env().context("invalid configuration")?;
    rolegate_observability::init(config.log_format);

    let raw = std::fs::read_to_string(&config.flow_path)
        .with_context(|| format!("failed to read {}", config.flow_path.display()))?;
    let flow = Flow::from_json(&raw, &registry())?.with_max_deliveries(config.max_deliveries);

    if flow.node(&config.entry).is_none() {
        anyhow::bail!("entry node '{}' is not part of the flow", config.entry);
    }

    tracing::info!(flow = %config.flow_path.display(), entry = %config.entry, "replaying stdin");

    let stats = replay(&flow, &config.entry, io::stdin().lock(), io::stdout().lock())?;

    tracing::info!(
        messages = stats.messages,
        deliveries = stats.deliveries,
        rejected = stats.rejected,
        "replay finished"
    );
    Ok(())
}
