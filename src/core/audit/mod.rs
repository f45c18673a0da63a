//! Degree audit engine
//!
//! Evaluates a student's progress against a degree: one breakdown per
//! requirement category, aggregate credit statistics, advisory notices and a
//! rough graduation estimate. The engine is a pure function of its inputs;
//! the only wall-clock dependency is the `today` date passed in.

pub mod notices;
pub mod requirements;
pub mod requisites;

pub use notices::{format_credits, generate_notices, Notice, NoticeKind};
pub use requirements::{
    evaluate_category, evaluate_deficiencies, evaluate_exemptions, CategoryKind, CourseProgress,
    CourseResult, RequirementResult, RequirementStatus,
};
pub use requisites::{check_requisites, RequisiteIssue, RequisiteKind};

use crate::core::models::{Catalog, Degree, Student, StudentProgress, Term};
use crate::info;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Audit engine settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AuditConfig {
    /// Credits per term assumed by the graduation estimate
    pub estimate_credits_per_term: f32,
}

impl AuditConfig {
    /// Default credits per term for the graduation estimate
    pub const ESTIMATE_CREDITS_PER_TERM: f32 = 15.0;
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            estimate_credits_per_term: Self::ESTIMATE_CREDITS_PER_TERM,
        }
    }
}

/// Snapshot of the audited student
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentSummary {
    /// Student identifier
    pub id: String,
    /// Student name
    pub name: String,
    /// Degree identifier
    pub degree_id: String,
    /// Degree name
    pub degree: String,
}

/// Aggregate credit statistics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressStats {
    /// Completed credits
    pub completed: f32,
    /// Credits in progress
    pub in_progress: f32,
    /// Credits neither completed nor in progress (never negative)
    pub remaining: f32,
    /// Degree credit total
    pub total: f32,
    /// Completed share of the total, 0 to 100
    pub percentage: u8,
}

impl ProgressStats {
    /// Build statistics from credit sums.
    ///
    /// A non-positive total yields 0%.
    #[must_use]
    pub fn new(completed: f32, in_progress: f32, total: f32) -> Self {
        let remaining = (total - completed - in_progress).max(0.0);
        let percentage = if total > 0.0 {
            // clamped to 0..=100 before the cast
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let pct = (completed / total * 100.0).round().clamp(0.0, 100.0) as u8;
            pct
        } else {
            0
        };
        Self {
            completed,
            in_progress,
            remaining,
            total,
            percentage,
        }
    }
}

/// Result of a degree audit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditReport {
    /// Audited student
    pub student: StudentSummary,
    /// Aggregate statistics
    pub progress: ProgressStats,
    /// Advisory notices in generation order
    pub notices: Vec<Notice>,
    /// Requirement breakdowns sorted by status priority
    pub requirements: Vec<RequirementResult>,
    /// Advisory graduation term
    pub estimated_graduation: Option<Term>,
}

/// Estimate the graduation term from the remaining credits.
///
/// Walks `ceil(remaining / per_term)` terms forward from the regular term
/// containing `today`. Returns `None` when `per_term` is not positive.
#[must_use]
pub fn estimate_graduation(remaining: f32, per_term: f32, today: NaiveDate) -> Option<Term> {
    if per_term <= 0.0 || !per_term.is_finite() {
        return None;
    }
    // remaining and per_term are small positive credit values
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let steps = (remaining.max(0.0) / per_term).ceil() as usize;
    Some(Term::containing(today).advance(steps))
}

/// Audit engine bound to one configuration
#[derive(Debug, Clone, Copy, Default)]
pub struct AuditEngine {
    config: AuditConfig,
}

impl AuditEngine {
    /// Create an engine with the given settings
    #[must_use]
    pub const fn new(config: AuditConfig) -> Self {
        Self { config }
    }

    /// Run the audit.
    ///
    /// # Arguments
    /// * `student` - Student being audited
    /// * `degree` - Degree with its requirement categories
    /// * `catalog` - Courses referenced by the degree and the timeline
    /// * `progress` - Course statuses derived from the student's timeline
    /// * `today` - Date used for the graduation estimate
    ///
    /// # Returns
    /// The audit report; inputs are not modified
    #[must_use]
    pub fn audit(
        &self,
        student: &Student,
        degree: &Degree,
        catalog: &Catalog,
        progress: &StudentProgress,
        today: NaiveDate,
    ) -> AuditReport {
        let mut results: Vec<RequirementResult> = degree
            .requirements
            .iter()
            .map(|category| evaluate_category(category, catalog, progress))
            .collect();

        if !progress.deficiencies.is_empty() {
            results.push(evaluate_deficiencies(&progress.deficiencies, catalog, progress));
        }
        if !progress.exemptions.is_empty() {
            results.push(evaluate_exemptions(&progress.exemptions, catalog, progress));
        }

        let (completed, in_progress) = results
            .iter()
            .filter(|r| r.kind != CategoryKind::Exemption)
            .fold((0.0, 0.0), |(done, doing), r| {
                (done + r.credits_completed, doing + r.credits_in_progress)
            });
        let stats = ProgressStats::new(completed, in_progress, degree.total_credits);

        let notices = generate_notices(&results, stats.percentage);
        results.sort_by_key(|r| r.status);

        let estimated_graduation = estimate_graduation(
            stats.remaining,
            self.config.estimate_credits_per_term,
            today,
        );

        info!(
            "Audited {} against {}: {}% complete, {} requirement(s), {} notice(s)",
            student.id,
            degree.id,
            stats.percentage,
            results.len(),
            notices.len()
        );

        AuditReport {
            student: StudentSummary {
                id: student.id.clone(),
                name: student.name.clone(),
                degree_id: degree.id.clone(),
                degree: degree.name.clone(),
            },
            progress: stats,
            notices,
            requirements: results,
            estimated_graduation,
        }
    }
}

/// Run an audit with default settings
#[must_use]
pub fn run_audit(
    student: &Student,
    degree: &Degree,
    catalog: &Catalog,
    progress: &StudentProgress,
    today: NaiveDate,
) -> AuditReport {
    AuditEngine::default().audit(student, degree, catalog, progress, today)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{Course, RequirementCategory, Season, Timeline};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 1).unwrap()
    }

    #[test]
    fn test_progress_stats_bounds() {
        let stats = ProgressStats::new(6.0, 3.0, 120.0);
        assert_eq!(stats.percentage, 5);
        assert!((stats.remaining - 111.0).abs() < f32::EPSILON);

        let over = ProgressStats::new(150.0, 0.0, 120.0);
        assert_eq!(over.percentage, 100);
        assert!(over.remaining.abs() < f32::EPSILON);

        let zero = ProgressStats::new(6.0, 0.0, 0.0);
        assert_eq!(zero.percentage, 0);
    }

    #[test]
    fn test_estimate_graduation() {
        // October is Fall; 30 credits at 15 per term is two terms out
        let term = estimate_graduation(30.0, 15.0, today()).unwrap();
        assert_eq!(term, Term::new(Season::Summer, 2026));
        assert_eq!(
            estimate_graduation(0.0, 15.0, today()),
            Some(Term::new(Season::Fall, 2025))
        );
        assert_eq!(
            estimate_graduation(16.0, 15.0, today()),
            Some(Term::new(Season::Summer, 2026))
        );
        assert_eq!(estimate_graduation(30.0, 0.0, today()), None);
    }

    #[test]
    fn test_core_complete_scenario() {
        let catalog: Catalog = vec![
            Course::new("A", "Course A", 3.0),
            Course::new("B", "Course B", 3.0),
        ]
        .into();
        let degree = Degree::new("d", "Degree", 120.0)
            .with_requirement(RequirementCategory::new("core", "Core", 6.0).with_courses(["A", "B"]));
        let timeline =
            Timeline::new("t", "s").with_semester(Term::new(Season::Winter, 2025), ["A", "B"]);
        let progress = StudentProgress::derive(&timeline, &catalog, today());
        let student = Student::new("s", "Sam", "d");

        let report = run_audit(&student, &degree, &catalog, &progress, today());
        assert_eq!(report.requirements.len(), 1);
        assert_eq!(report.requirements[0].status, RequirementStatus::Complete);
        assert_eq!(report.progress.percentage, 5);
        assert!((report.progress.completed - 6.0).abs() < f32::EPSILON);
        assert_eq!(report.student.degree, "Degree");
    }

    #[test]
    fn test_exemptions_excluded_from_aggregate() {
        let catalog: Catalog = vec![Course::new("A", "Course A", 3.0)].into();
        let degree = Degree::new("d", "Degree", 30.0);
        let mut timeline = Timeline::new("t", "s");
        timeline.exemptions.push("A".to_string());
        let progress = StudentProgress::derive(&timeline, &catalog, today());

        let report = run_audit(&Student::new("s", "", "d"), &degree, &catalog, &progress, today());
        assert_eq!(report.requirements.len(), 1);
        assert_eq!(report.requirements[0].kind, CategoryKind::Exemption);
        assert!(report.progress.completed.abs() < f32::EPSILON);
    }

    #[test]
    fn test_requirements_sorted_by_status() {
        let catalog: Catalog = vec![Course::new("A", "Course A", 3.0)].into();
        let degree = Degree::new("d", "Degree", 120.0)
            .with_requirement(RequirementCategory::new("done", "Done", 3.0).with_courses(["A"]))
            .with_requirement(RequirementCategory::new("todo", "Todo", 3.0).with_courses(["B"]));
        let timeline =
            Timeline::new("t", "s").with_semester(Term::new(Season::Winter, 2025), ["A"]);
        let progress = StudentProgress::derive(&timeline, &catalog, today());

        let report = run_audit(&Student::new("s", "", "d"), &degree, &catalog, &progress, today());
        let ids: Vec<&str> = report.requirements.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["todo", "done"]);
        assert_eq!(report.requirements[0].status, RequirementStatus::NotStarted);
    }
}
