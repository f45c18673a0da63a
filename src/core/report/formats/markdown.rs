//! Markdown report generator
//!
//! Renders audits and plans through askama templates (`templates/audit.md`,
//! `templates/plan.md`). Values are formatted into plain strings first so the
//! templates only lay out tables.

use crate::core::audit::{format_credits, AuditReport, CategoryKind, CourseProgress, NoticeKind};
use crate::core::models::{Catalog, Term};
use crate::core::optimizer::OptimizerResult;
use crate::core::report::{ReportContext, ReportGenerator};
use askama::Template;
use std::error::Error;

/// Placeholder for empty cells
const NONE: &str = "-";

struct NoticeRow {
    kind: &'static str,
    message: String,
}

struct CourseRow {
    code: String,
    title: String,
    credits: String,
    status: &'static str,
    term: String,
}

struct RequirementRow {
    title: String,
    status: &'static str,
    completed: String,
    in_progress: String,
    total: String,
    courses: Vec<CourseRow>,
}

#[derive(Template)]
#[template(path = "audit.md", escape = "none")]
struct AuditTemplate {
    student_name: String,
    student_id: String,
    degree: String,
    graduation: String,
    completed: String,
    in_progress: String,
    remaining: String,
    total: String,
    percentage: u8,
    notices: Vec<NoticeRow>,
    rows: Vec<RequirementRow>,
}

fn term_cell(term: Option<Term>) -> String {
    term.map_or_else(|| NONE.to_string(), |t| t.to_string())
}

impl AuditTemplate {
    fn from_report(report: &AuditReport) -> Self {
        let student_name = if report.student.name.is_empty() {
            report.student.id.clone()
        } else {
            report.student.name.clone()
        };

        let notices = report
            .notices
            .iter()
            .map(|n| NoticeRow {
                kind: match n.kind {
                    NoticeKind::Warning => "Warning",
                    NoticeKind::Info => "Info",
                    NoticeKind::Success => "Success",
                },
                message: n.message.clone(),
            })
            .collect();

        let rows = report
            .requirements
            .iter()
            .map(|r| RequirementRow {
                title: r.title.clone(),
                status: r.status.label(),
                completed: format_credits(r.credits_completed),
                in_progress: format_credits(r.credits_in_progress),
                total: format_credits(r.credits_total),
                courses: r
                    .courses
                    .iter()
                    .map(|c| CourseRow {
                        code: c.code.clone(),
                        title: c.title.clone(),
                        credits: format_credits(c.credits),
                        status: c.status.label(),
                        term: term_cell(c.term),
                    })
                    .collect(),
            })
            .collect();

        Self {
            student_name,
            student_id: report.student.id.clone(),
            degree: report.student.degree.clone(),
            graduation: term_cell(report.estimated_graduation),
            completed: format_credits(report.progress.completed),
            in_progress: format_credits(report.progress.in_progress),
            remaining: format_credits(report.progress.remaining),
            total: format_credits(report.progress.total),
            percentage: report.progress.percentage,
            notices,
            rows,
        }
    }
}

struct PlannedCourseRow {
    code: String,
    title: String,
    credits: String,
}

struct TermRow {
    name: String,
    generated: bool,
    credits: String,
    courses: Vec<PlannedCourseRow>,
}

struct UnplacedRow {
    code: String,
    reason: String,
}

#[derive(Template)]
#[template(path = "plan.md", escape = "none")]
struct PlanTemplate {
    placed: usize,
    unplaced_count: usize,
    new_terms: usize,
    graduation: String,
    terms: Vec<TermRow>,
    unplaced: Vec<UnplacedRow>,
    projected: String,
}

impl PlanTemplate {
    fn from_plan(plan: &OptimizerResult, catalog: &Catalog, projected: Option<&AuditReport>) -> Self {
        let first_new = plan.semesters.len().saturating_sub(plan.new_semester_count);
        let terms = plan
            .semesters
            .iter()
            .enumerate()
            .map(|(i, semester)| {
                let courses: Vec<PlannedCourseRow> = semester
                    .courses
                    .iter()
                    .map(|code| PlannedCourseRow {
                        code: code.clone(),
                        title: catalog
                            .get(code)
                            .map_or_else(|| NONE.to_string(), |c| c.title.clone()),
                        credits: format_credits(catalog.credits_or_default(code)),
                    })
                    .collect();
                let credits: f32 = semester
                    .courses
                    .iter()
                    .map(|code| catalog.credits_or_default(code))
                    .sum();
                TermRow {
                    name: semester.term.to_string(),
                    generated: i >= first_new,
                    credits: format_credits(credits),
                    courses,
                }
            })
            .collect();

        let unplaced = plan
            .unplaced
            .iter()
            .map(|u| UnplacedRow {
                code: u.code.clone(),
                reason: u.reason.to_string(),
            })
            .collect();

        let projected = projected.map_or_else(String::new, |audit| {
            let unscheduled = audit
                .requirements
                .iter()
                .filter(|r| r.kind == CategoryKind::Pool)
                .flat_map(|r| &r.courses)
                .filter(|c| c.status == CourseProgress::Missing)
                .count();
            format!(
                "{}% of degree credits completed; {unscheduled} requirement course(s) still unscheduled.",
                audit.progress.percentage
            )
        });

        Self {
            placed: plan.placed_count,
            unplaced_count: plan.unplaced_count,
            new_terms: plan.new_semester_count,
            graduation: term_cell(plan.estimated_graduation),
            terms,
            unplaced,
            projected,
        }
    }
}

/// Markdown report generator
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownReporter;

impl MarkdownReporter {
    /// Create a new Markdown reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ReportGenerator for MarkdownReporter {
    fn render(&self, ctx: &ReportContext) -> Result<String, Box<dyn Error>> {
        let rendered = match *ctx {
            ReportContext::Audit(report) => AuditTemplate::from_report(report).render()?,
            ReportContext::Plan {
                plan,
                catalog,
                projected,
            } => PlanTemplate::from_plan(plan, catalog, projected).render()?,
        };
        Ok(rendered)
    }
}
