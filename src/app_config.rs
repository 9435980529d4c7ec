use config::{Config, ConfigError, File as ConfigFile};
use serde::Deserialize;

use crate::cli::CheckArgs;
use crate::snapshot::thresholds::SnapshotThresholds;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_age_warning_days")]
    pub age_warning_days: u32,
    #[serde(default = "default_age_critical_days")]
    pub age_critical_days: u32,
    #[serde(default = "default_size_warning_gb")]
    pub size_warning_gb: u64,
    #[serde(default = "default_size_critical_gb")]
    pub size_critical_gb: u64,
    /// Machine names always excluded from evaluation.
    #[serde(default)]
    pub ignored_vms: Vec<String>,
}

fn default_age_warning_days() -> u32 {
    30
}

fn default_age_critical_days() -> u32 {
    60
}

fn default_size_warning_gb() -> u64 {
    10
}

fn default_size_critical_gb() -> u64 {
    20
}

impl AppConfig {
    pub fn load() -> Result<AppConfig, ConfigError> {
        // Start by creating a ConfigBuilder
        let builder = Config::builder()
            // Add configuration values from a file named 'Snapcheck.toml', if present
            .add_source(ConfigFile::with_name("Snapcheck").required(false))
            .build()?;

        // Try to deserialize the configuration into our AppConfig struct
        builder.try_deserialize::<AppConfig>()
    }

    /// Effective thresholds for a run: file/default values, with any
    /// command-line flags taking precedence. Ordering is validated by the
    /// caller before evaluation starts.
    pub fn thresholds(&self, args: &CheckArgs) -> SnapshotThresholds {
        SnapshotThresholds {
            age_warning_days: args.age_warning.unwrap_or(self.age_warning_days),
            age_critical_days: args.age_critical.unwrap_or(self.age_critical_days),
            size_warning_gb: args.size_warning.unwrap_or(self.size_warning_gb),
            size_critical_gb: args.size_critical.unwrap_or(self.size_critical_gb),
        }
    }
}
