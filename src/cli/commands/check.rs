//! Check command handler

use super::{open_store, service, today};
use crate::args::TimelineArgs;
use degree_planner::config::Config;
use degree_planner::error;

/// Run the check command; exits non-zero when problems are found
pub fn run(timeline: &TimelineArgs, config: &Config) {
    match check(timeline, config) {
        Ok(true) => {}
        Ok(false) => std::process::exit(2),
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}

/// Returns whether the timeline is clean
fn check(args: &TimelineArgs, config: &Config) -> Result<bool, String> {
    let store = open_store(args, config)?;
    let service = service(&store, config)?;

    let report = service
        .check(&args.timeline, &args.user, today(args))
        .map_err(|e| {
            error!("Check failed for timeline {}: {e}", args.timeline);
            format!("✗ Check failed: {e}")
        })?;

    if report.is_clean() {
        println!("✓ Timeline {} has no requisite problems", report.timeline_id);
        return Ok(true);
    }

    for issue in &report.requisite_issues {
        println!("✗ {issue}");
    }
    for reference in &report.unknown_references {
        println!("✗ {reference}");
    }
    Ok(false)
}
