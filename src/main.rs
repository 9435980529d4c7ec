mod app_config;
mod cli;
mod inventory;
mod logging;
mod model;
mod report;
mod snapshot;
mod state;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use dotenv::dotenv;
use tracing::{debug, error, info};

use app_config::AppConfig;
use cli::{CheckArgs, Cli, Commands, ListArgs};
use report::ReportContext;
use state::CheckState;

#[derive(Debug, Clone, Copy)]
enum CheckKind {
    Age,
    Size,
}

fn main() {
    dotenv().ok();

    let _guard = logging::init_logger();

    let args = Cli::parse();

    let exit_code = match args.command {
        Commands::SnapshotsAge(check) => run_check(CheckKind::Age, &check),
        Commands::SnapshotsSize(check) => run_check(CheckKind::Size, &check),
        Commands::ListSnapshots(list) => run_list(&list),
        Commands::PrintConfig => run_print_config(),
    };

    std::process::exit(exit_code);
}

/// Run one check to completion. Any failure before a verdict is reached
/// surfaces as a CRITICAL verdict with a descriptive message, per the
/// plugin exit-state convention.
fn run_check(kind: CheckKind, args: &CheckArgs) -> i32 {
    match evaluate(kind, args) {
        Ok(state) => state.exit_code(),
        Err(err) => {
            error!("Error: {err:#}");
            println!("{}: {err:#}", CheckState::Critical.label());
            CheckState::Critical.exit_code()
        }
    }
}

fn evaluate(kind: CheckKind, args: &CheckArgs) -> Result<CheckState> {
    let cfg = AppConfig::load().context("loading configuration")?;

    let thresholds = cfg.thresholds(args);
    thresholds.validate()?;

    let inventory = inventory::load(&args.inventory)?;
    let now = Utc::now();

    let total_vms = inventory.virtual_machines.len();

    let mut ignore_list = cfg.ignored_vms.clone();
    ignore_list.extend(args.ignore_vms.iter().cloned());

    let filtered = inventory::exclude_vms_by_name(inventory.virtual_machines, &ignore_list);
    let evaluated_vms = filtered.len();

    let with_snapshots = inventory::vms_with_snapshots(filtered);
    debug!(
        total = total_vms,
        evaluated = evaluated_vms,
        with_snapshots = with_snapshots.len(),
        "evaluating inventory"
    );

    let sets = snapshot::build_summary_sets(&with_snapshots, &thresholds, now);

    let ctx = ReportContext {
        source: &inventory.source,
        total_vms,
        evaluated_vms,
        vms_with_snapshots: with_snapshots.len(),
        excluded_vms: &ignore_list,
    };

    let state = match kind {
        CheckKind::Age => sets.overall_age_state(),
        CheckKind::Size => sets.overall_size_state(),
    };

    let (summary_line, long_output) = match kind {
        CheckKind::Age => (
            report::one_line_age_summary(state, &sets, &thresholds, &ctx, now),
            report::age_report(&sets, &thresholds, &ctx, now),
        ),
        CheckKind::Size => (
            report::one_line_size_summary(state, &sets, &thresholds, &ctx),
            report::size_report(&sets, &thresholds, &ctx, now),
        ),
    };

    println!("{summary_line}");
    println!();
    print!("{long_output}");

    info!(state = state.label(), sets = sets.len(), "check finished");

    Ok(state)
}

fn run_list(args: &ListArgs) -> i32 {
    let result = inventory::load(&args.inventory).map(|inventory| {
        let now = Utc::now();
        for vm in &inventory.virtual_machines {
            print!("{}", report::list_snapshots(vm, now));
        }
    });

    match result {
        Ok(()) => 0,
        Err(err) => {
            error!("Error: {err:#}");
            CheckState::Critical.exit_code()
        }
    }
}

fn run_print_config() -> i32 {
    match AppConfig::load() {
        Ok(cfg) => {
            println!("{cfg:#?}");
            0
        }
        Err(err) => {
            error!("Error loading configuration: {err}");
            CheckState::Critical.exit_code()
        }
    }
}
