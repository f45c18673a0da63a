//! Optimize command handler

use super::{emit, open_store, service, today};
use crate::args::{OutputArgs, TimelineArgs};
use degree_planner::config::Config;
use degree_planner::core::report::ReportContext;
use degree_planner::{error, verbose};

/// Run the optimize command, printing failures to stderr
pub fn run(timeline: &TimelineArgs, output: &OutputArgs, with_audit: bool, config: &Config) {
    if let Err(err) = optimize(timeline, output, with_audit, config) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn optimize(
    args: &TimelineArgs,
    output: &OutputArgs,
    with_audit: bool,
    config: &Config,
) -> Result<(), String> {
    let store = open_store(args, config)?;
    let service = service(&store, config)?;
    let today = today(args);

    let ctx = service.load(&args.timeline, &args.user, today).map_err(|e| {
        error!("Optimization failed for timeline {}: {e}", args.timeline);
        format!("✗ Optimization failed: {e}")
    })?;

    let plan = service.optimize_context(&ctx);
    let projected = with_audit.then(|| service.audit_context(&ctx, &plan.projected_progress(), today));

    verbose!(
        "Placed {} course(s) in {} new term(s); {} unplaced",
        plan.placed_count,
        plan.new_semester_count,
        plan.unplaced_count
    );
    if !plan.is_complete() {
        eprintln!(
            "✗ {} course(s) could not be placed within the term horizon",
            plan.unplaced_count
        );
    }

    emit(
        &ReportContext::Plan {
            plan: &plan,
            catalog: &ctx.catalog,
            projected: projected.as_ref(),
        },
        output,
        config,
        &format!("{}-plan", args.timeline),
    )
}
