pub mod attribution;
pub mod chains;
pub mod file_index;
pub mod summary;
pub mod thresholds;

use chrono::{DateTime, Utc};
use rayon::prelude::*;

use crate::model::VirtualMachine;
use summary::{SnapshotSummarySet, SnapshotSummarySets};
use thresholds::SnapshotThresholds;

/// Evaluate every machine against the thresholds, one summary set per
/// machine. Machines are independent, so they are evaluated in parallel;
/// the ordered collect keeps set order aligned with input order.
pub fn build_summary_sets(
    vms: &[VirtualMachine],
    thresholds: &SnapshotThresholds,
    now: DateTime<Utc>,
) -> SnapshotSummarySets {
    let sets: Vec<SnapshotSummarySet> = vms
        .par_iter()
        .map(|vm| SnapshotSummarySet::new(vm, thresholds, now))
        .collect();

    SnapshotSummarySets(sets)
}
