//! Audit command handler

use super::{emit, open_store, service, today};
use crate::args::{OutputArgs, TimelineArgs};
use degree_planner::config::Config;
use degree_planner::core::report::ReportContext;
use degree_planner::{error, verbose};

/// Run the audit command, printing failures to stderr
pub fn run(timeline: &TimelineArgs, output: &OutputArgs, config: &Config) {
    if let Err(err) = audit(timeline, output, config) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn audit(args: &TimelineArgs, output: &OutputArgs, config: &Config) -> Result<(), String> {
    let store = open_store(args, config)?;
    let service = service(&store, config)?;

    let report = service
        .audit(&args.timeline, &args.user, today(args))
        .map_err(|e| {
            error!("Audit failed for timeline {}: {e}", args.timeline);
            format!("✗ Audit failed: {e}")
        })?;

    verbose!(
        "Audited {}: {}% complete, {} notice(s)",
        args.timeline,
        report.progress.percentage,
        report.notices.len()
    );

    emit(
        &ReportContext::Audit(&report),
        output,
        config,
        &format!("{}-audit", args.timeline),
    )
}
