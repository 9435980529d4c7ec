use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)] // requires `derive` feature
#[command(name = "snapcheck")]
#[command(about = "Snapshot age and size checks for virtualization inventories", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Evaluate snapshot age against warning/critical thresholds
    SnapshotsAge(CheckArgs),
    /// Evaluate snapshot size against warning/critical thresholds
    SnapshotsSize(CheckArgs),
    /// List every snapshot in the inventory
    ListSnapshots(ListArgs),
    /// Print effective configuration values
    PrintConfig,
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Path to the exported inventory JSON document
    #[arg(long)]
    pub inventory: PathBuf,

    /// Snapshot age in days considered a WARNING
    #[arg(long)]
    pub age_warning: Option<u32>,

    /// Snapshot age in days considered CRITICAL
    #[arg(long)]
    pub age_critical: Option<u32>,

    /// Snapshot size in GB considered a WARNING
    #[arg(long)]
    pub size_warning: Option<u64>,

    /// Snapshot size in GB considered CRITICAL
    #[arg(long)]
    pub size_critical: Option<u64>,

    /// Machine names to exclude from evaluation
    #[arg(long, value_delimiter = ',')]
    pub ignore_vms: Vec<String>,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Path to the exported inventory JSON document
    #[arg(long)]
    pub inventory: PathBuf,
}
