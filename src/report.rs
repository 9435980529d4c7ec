use std::fmt::Write as _;

use chrono::{DateTime, Utc};

use crate::model::VirtualMachine;
use crate::snapshot::summary::{SnapshotSummary, SnapshotSummarySet, SnapshotSummarySets};
use crate::snapshot::thresholds::SnapshotThresholds;
use crate::state::CheckState;

/// Run-level facts shown in report footers.
pub struct ReportContext<'a> {
    pub source: &'a str,
    pub total_vms: usize,
    pub evaluated_vms: usize,
    pub vms_with_snapshots: usize,
    pub excluded_vms: &'a [String],
}

/// One-line service summary for the age check. This is the line most
/// prominent in notifications.
pub fn one_line_age_summary(
    state: CheckState,
    sets: &SnapshotSummarySets,
    thresholds: &SnapshotThresholds,
    ctx: &ReportContext<'_>,
    now: DateTime<Utc>,
) -> String {
    match state {
        CheckState::Critical => {
            let (vms, snapshots) = sets.exceeds_age(thresholds.age_critical_days, now);
            format!(
                "{}: {} VMs with {} snapshots older than {} days detected (evaluated {} VMs, {} Snapshots)",
                state.label(),
                vms,
                snapshots,
                thresholds.age_critical_days,
                ctx.evaluated_vms,
                sets.snapshots(),
            )
        }
        CheckState::Warning => {
            let (vms, snapshots) = sets.exceeds_age(thresholds.age_warning_days, now);
            format!(
                "{}: {} VMs with {} snapshots older than {} days detected (evaluated {} VMs, {} Snapshots)",
                state.label(),
                vms,
                snapshots,
                thresholds.age_warning_days,
                ctx.evaluated_vms,
                sets.snapshots(),
            )
        }
        CheckState::Ok => format!(
            "{}: No snapshots older than {} days detected (evaluated {} VMs, {} Snapshots)",
            state.label(),
            thresholds.age_warning_days,
            ctx.evaluated_vms,
            sets.snapshots(),
        ),
    }
}

/// One-line service summary for the size check.
pub fn one_line_size_summary(
    state: CheckState,
    sets: &SnapshotSummarySets,
    thresholds: &SnapshotThresholds,
    ctx: &ReportContext<'_>,
) -> String {
    match state {
        CheckState::Critical => {
            let (vms, snapshots) = sets.exceeds_size(thresholds.size_critical_gb);
            format!(
                "{}: {} VMs with combined snapshots ({}) exceeding {} GB detected (evaluated {} VMs, {} Snapshots)",
                state.label(),
                vms,
                snapshots,
                thresholds.size_critical_gb,
                ctx.evaluated_vms,
                sets.snapshots(),
            )
        }
        CheckState::Warning => {
            let (vms, snapshots) = sets.exceeds_size(thresholds.size_warning_gb);
            format!(
                "{}: {} VMs with combined snapshots ({}) exceeding {} GB detected (evaluated {} VMs, {} Snapshots)",
                state.label(),
                vms,
                snapshots,
                thresholds.size_warning_gb,
                ctx.evaluated_vms,
                sets.snapshots(),
            )
        }
        CheckState::Ok => format!(
            "{}: No VMs with combined snapshots exceeding {} GB detected (evaluated {} VMs, {} Snapshots)",
            state.label(),
            thresholds.size_warning_gb,
            ctx.evaluated_vms,
            sets.snapshots(),
        ),
    }
}

/// Detailed age-check report: snapshots past thresholds, snapshots not yet
/// past them, then the run footer. Intended for the long service output
/// shown in the web UI and notification bodies.
pub fn age_report(
    sets: &SnapshotSummarySets,
    thresholds: &SnapshotThresholds,
    ctx: &ReportContext<'_>,
    now: DateTime<Utc>,
) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Snapshots exceeding WARNING ({}d) or CRITICAL ({}d) age thresholds:",
        thresholds.age_warning_days, thresholds.age_critical_days,
    );
    let _ = writeln!(out);

    if sets.is_age_critical_state() || sets.is_age_warning_state() {
        for set in sets {
            for snap in &set.snapshots {
                if snap.is_age_critical_state() || snap.is_age_warning_state() {
                    write_list_entry(&mut out, snap, set, now);
                }
            }
        }
    } else {
        let _ = writeln!(out, "* None detected");
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Snapshots *not yet* exceeding age thresholds:");
    let _ = writeln!(out);

    if sets.has_not_yet_exceeded_age(thresholds.age_warning_days, now) {
        for set in sets {
            for snap in &set.snapshots {
                if !(snap.is_age_critical_state() || snap.is_age_warning_state()) {
                    write_list_entry(&mut out, snap, set, now);
                }
            }
        }
    } else {
        let _ = writeln!(out, "* None detected");
    }

    write_report_footer(&mut out, ctx);
    out
}

/// Detailed size-check report. Size states are set-level: every snapshot of
/// a crossing set is listed so the cumulative total can be traced.
pub fn size_report(
    sets: &SnapshotSummarySets,
    thresholds: &SnapshotThresholds,
    ctx: &ReportContext<'_>,
    now: DateTime<Utc>,
) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Snapshots exceeding WARNING ({} GB) or CRITICAL ({} GB) size thresholds:",
        thresholds.size_warning_gb, thresholds.size_critical_gb,
    );
    let _ = writeln!(out);

    if sets.is_size_critical_state() || sets.is_size_warning_state() {
        for set in sets {
            if set.is_size_warning_state() || set.is_size_critical_state() {
                for snap in &set.snapshots {
                    write_list_entry(&mut out, snap, set, now);
                }
            }
        }
    } else {
        let _ = writeln!(out, "* None detected");
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Snapshots *not yet* exceeding size thresholds:");
    let _ = writeln!(out);

    if sets.has_not_yet_exceeded_size(thresholds.size_warning_gb) {
        for set in sets {
            if !(set.is_size_warning_state() || set.is_size_critical_state()) {
                for snap in &set.snapshots {
                    write_list_entry(&mut out, snap, set, now);
                }
            }
        }
    } else {
        let _ = writeln!(out, "* None detected");
    }

    write_report_footer(&mut out, ctx);
    out
}

/// Quick per-machine snapshot listing for the list-snapshots subcommand.
pub fn list_snapshots(vm: &VirtualMachine, now: DateTime<Utc>) -> String {
    let mut out = String::new();

    let Some(info) = &vm.snapshot else {
        return out;
    };

    let mut stack: Vec<&crate::model::SnapshotTree> =
        info.root_snapshot_list.iter().rev().collect();
    while let Some(node) = stack.pop() {
        let age_days = (now - node.create_time).num_seconds() as f64 / 86_400.0;
        let active = info.current_snapshot.as_deref() == Some(node.moid.as_str());
        let _ = writeln!(
            out,
            "Snapshot [VM: {}, Name: {}, Age: {:.2} days, ID: {}, MOID: {}, Active: {}]",
            vm.name, node.name, age_days, node.id, node.moid, active,
        );
        stack.extend(node.child_snapshot_list.iter().rev());
    }

    out
}

fn write_list_entry(
    out: &mut String,
    snap: &SnapshotSummary,
    set: &SnapshotSummarySet,
    now: DateTime<Utc>,
) {
    let _ = writeln!(
        out,
        "* {:?} [Age: {}, Size (item: {}, sum: {}), Name: {:?}, ID: {}]",
        snap.vm_name,
        snap.age(now),
        snap.size_human(),
        set.size_human(),
        snap.name,
        snap.moid,
    );
}

fn write_report_footer(out: &mut String, ctx: &ReportContext<'_>) {
    let _ = writeln!(out);
    let _ = writeln!(out, "---");
    let _ = writeln!(out);
    let _ = writeln!(out, "* Inventory source: {}", ctx.source);
    let _ = writeln!(
        out,
        "* VMs (evaluated: {}, total: {})",
        ctx.evaluated_vms, ctx.total_vms,
    );
    let _ = writeln!(out, "* VMs with snapshots: {}", ctx.vms_with_snapshots);
    let _ = writeln!(
        out,
        "* Specified VMs to exclude ({}): [{}]",
        ctx.excluded_vms.len(),
        ctx.excluded_vms.join(", "),
    );
}
