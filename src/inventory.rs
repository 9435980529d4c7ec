use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::model::{Inventory, VirtualMachine};

/// Load and decode an inventory document exported by the collector.
pub fn load(path: &Path) -> Result<Inventory> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading inventory file {}", path.display()))?;
    let inventory: Inventory = serde_json::from_str(&raw)
        .with_context(|| format!("decoding inventory file {}", path.display()))?;

    debug!(
        source = %inventory.source,
        machines = inventory.virtual_machines.len(),
        "inventory loaded"
    );

    Ok(inventory)
}

/// Drop machines whose names appear in the ignore list.
pub fn exclude_vms_by_name(
    vms: Vec<VirtualMachine>,
    ignore_list: &[String],
) -> Vec<VirtualMachine> {
    if ignore_list.is_empty() {
        return vms;
    }
    vms.into_iter()
        .filter(|vm| !ignore_list.iter().any(|name| name == &vm.name))
        .collect()
}

/// Keep only machines that have at least one snapshot. Later steps decide
/// whether those snapshots place the machine in a non-OK state.
pub fn vms_with_snapshots(vms: Vec<VirtualMachine>) -> Vec<VirtualMachine> {
    vms.into_iter()
        .filter(|vm| {
            vm.snapshot
                .as_ref()
                .is_some_and(|info| !info.root_snapshot_list.is_empty())
        })
        .collect()
}
