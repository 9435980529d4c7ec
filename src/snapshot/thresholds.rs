use anyhow::{bail, Result};
use chrono::{DateTime, Duration, Utc};

/// Binary gigabyte, matching the units the hypervisor reports sizes in.
pub const GIB: u64 = 1024 * 1024 * 1024;

/// Warning/critical thresholds for snapshot age (days) and size (GB).
///
/// Age and size pairs are independent; a snapshot can cross one, both, or
/// neither. Validation happens at the configuration boundary, before any
/// evaluation runs.
#[derive(Debug, Clone, Copy)]
pub struct SnapshotThresholds {
    pub age_warning_days: u32,
    pub age_critical_days: u32,
    pub size_warning_gb: u64,
    pub size_critical_gb: u64,
}

impl SnapshotThresholds {
    /// Reject configurations where a critical threshold is tighter than its
    /// warning counterpart; such a pair cannot produce a coherent verdict.
    pub fn validate(&self) -> Result<()> {
        if self.age_critical_days < self.age_warning_days {
            bail!(
                "age critical threshold ({} days) must not be lower than warning threshold ({} days)",
                self.age_critical_days,
                self.age_warning_days,
            );
        }
        if self.size_critical_gb < self.size_warning_gb {
            bail!(
                "size critical threshold ({} GB) must not be lower than warning threshold ({} GB)",
                self.size_critical_gb,
                self.size_warning_gb,
            );
        }
        Ok(())
    }
}

/// Whether a snapshot created at `created` is older than `days` as of `now`.
///
/// The boundary is exclusive: a snapshot created exactly `days` ago has not
/// yet exceeded the threshold.
pub fn exceeds_age(created: DateTime<Utc>, days: u32, now: DateTime<Utc>) -> bool {
    created < now - Duration::days(i64::from(days))
}

/// Whether a size in bytes is larger than `threshold_gb` binary gigabytes.
///
/// The boundary is exclusive: exactly `threshold_gb * GIB` bytes has not
/// yet exceeded the threshold.
pub fn exceeds_size(size_bytes: u64, threshold_gb: u64) -> bool {
    size_bytes > threshold_gb * GIB
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thresholds(aw: u32, ac: u32, sw: u64, sc: u64) -> SnapshotThresholds {
        SnapshotThresholds {
            age_warning_days: aw,
            age_critical_days: ac,
            size_warning_gb: sw,
            size_critical_gb: sc,
        }
    }

    #[test]
    fn age_boundary_is_exclusive() {
        let now = Utc::now();
        let exactly_30_days = now - Duration::days(30);
        let just_over = exactly_30_days - Duration::seconds(1);

        assert!(!exceeds_age(exactly_30_days, 30, now));
        assert!(exceeds_age(just_over, 30, now));
    }

    #[test]
    fn newer_snapshot_does_not_exceed_age() {
        let now = Utc::now();
        assert!(!exceeds_age(now - Duration::days(5), 30, now));
    }

    #[test]
    fn size_boundary_is_exclusive() {
        assert!(!exceeds_size(10 * GIB, 10));
        assert!(exceeds_size(10 * GIB + 1, 10));
    }

    #[test]
    fn zero_threshold_flags_any_nonzero_size() {
        assert!(!exceeds_size(0, 0));
        assert!(exceeds_size(1, 0));
    }

    #[test]
    fn validate_accepts_equal_and_ordered_pairs() {
        assert!(thresholds(30, 60, 10, 20).validate().is_ok());
        assert!(thresholds(30, 30, 10, 10).validate().is_ok());
    }

    #[test]
    fn validate_rejects_swapped_age_pair() {
        assert!(thresholds(60, 30, 10, 20).validate().is_err());
    }

    #[test]
    fn validate_rejects_swapped_size_pair() {
        assert!(thresholds(30, 60, 20, 10).validate().is_err());
    }
}
