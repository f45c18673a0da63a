//! CLI command handlers for `degreeplanner`.
//!
//! Each command is implemented in its own submodule. The helpers here open
//! the dataset, build the service from configuration and write reports.

pub mod audit;
pub mod check;
pub mod config;
pub mod optimize;

use crate::args::{OutputArgs, TimelineArgs};
use chrono::{Local, NaiveDate};
use degree_planner::config::Config;
use degree_planner::core::report::{reporter, ReportContext, ReportFormat};
use degree_planner::core::service::PlanningService;
use degree_planner::core::store::InMemoryStore;
use degree_planner::{error, info};
use std::path::{Path, PathBuf};

/// Dataset file looked up in `data_dir` when no path is given
const DEFAULT_DATASET: &str = "dataset.json";

/// Resolve the dataset path from the argument or the configured data directory
fn dataset_path(args: &TimelineArgs, config: &Config) -> PathBuf {
    args.dataset
        .clone()
        .unwrap_or_else(|| Path::new(&config.paths.data_dir).join(DEFAULT_DATASET))
}

/// Load the dataset named by the arguments
pub(crate) fn open_store(args: &TimelineArgs, config: &Config) -> Result<InMemoryStore, String> {
    let path = dataset_path(args, config);
    let store = InMemoryStore::load(&path).map_err(|e| {
        error!("Failed to load dataset {}: {e}", path.display());
        format!("✗ Failed to load {}: {e}", path.display())
    })?;
    info!("Dataset loaded: {}", path.display());
    Ok(store)
}

/// Build a service configured from the planner settings
pub(crate) fn service<'s>(
    store: &'s InMemoryStore,
    config: &Config,
) -> Result<PlanningService<'s, InMemoryStore>, String> {
    config
        .planner
        .validate()
        .map_err(|e| format!("✗ Invalid planner settings: {e}"))?;
    Ok(PlanningService::new(store)
        .with_audit_config(config.planner.audit_config())
        .with_optimizer_config(config.planner.optimizer_config()))
}

/// Evaluation date: the `--today` argument or the local date
pub(crate) fn today(args: &TimelineArgs) -> NaiveDate {
    args.today.unwrap_or_else(|| Local::now().date_naive())
}

/// Render a report and print it or write it to disk
pub(crate) fn emit(
    ctx: &ReportContext,
    output: &OutputArgs,
    config: &Config,
    stem: &str,
) -> Result<(), String> {
    let format = ReportFormat::from(output.format);
    let generator = reporter(format);

    let target = if output.save {
        Some(Path::new(&config.paths.reports_dir).join(format!("{stem}.{}", format.extension())))
    } else {
        output.output.clone()
    };

    match target {
        Some(path) => {
            generator.generate(ctx, &path).map_err(|e| {
                error!("Failed to write report {}: {e}", path.display());
                format!("✗ Failed to write {}: {e}", path.display())
            })?;
            println!("✓ Report generated: {}", path.display());
        }
        None => {
            let content = generator
                .render(ctx)
                .map_err(|e| format!("✗ Failed to render report: {e}"))?;
            println!("{content}");
        }
    }
    Ok(())
}
