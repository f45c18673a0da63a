//! Per-category requirement evaluation

use crate::core::models::{
    Catalog, RequirementCategory, StatusKind, StudentProgress, Term, DEFAULT_COURSE_CREDITS,
    DEFICIENCY_CATEGORY_ID, EXEMPTION_CATEGORY_ID,
};
use serde::{Deserialize, Serialize};

/// Tolerance for credit comparisons
const CREDIT_EPSILON: f32 = 1e-4;

/// Status of a requirement category.
///
/// Declaration order is the output sort priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RequirementStatus {
    /// Sorts ahead of every other status; never produced by [`RequirementStatus::classify`]
    Missing,
    /// No credits completed or in progress
    #[serde(rename = "Not Started")]
    NotStarted,
    /// Some credits, but not enough even counting courses in progress
    Incomplete,
    /// Enough credits once the courses in progress finish
    #[serde(rename = "In Progress")]
    InProgress,
    /// Quota met
    Complete,
}

impl RequirementStatus {
    /// Classify a category from its credit sums
    #[must_use]
    pub fn classify(completed: f32, in_progress: f32, required: f32) -> Self {
        if completed + CREDIT_EPSILON >= required {
            Self::Complete
        } else if completed + in_progress + CREDIT_EPSILON >= required {
            Self::InProgress
        } else if completed > 0.0 || in_progress > 0.0 {
            Self::Incomplete
        } else {
            Self::NotStarted
        }
    }

    /// Display label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Missing => "Missing",
            Self::NotStarted => "Not Started",
            Self::Incomplete => "Incomplete",
            Self::InProgress => "In Progress",
            Self::Complete => "Complete",
        }
    }
}

/// Display status of a course inside a requirement.
///
/// Declaration order is the display sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CourseProgress {
    /// Completed or exempted
    Completed,
    /// Taken this term
    #[serde(rename = "In Progress")]
    InProgress,
    /// Planned for a future term
    #[serde(rename = "Not Started")]
    NotStarted,
    /// Not on the timeline
    Missing,
}

impl CourseProgress {
    /// Display label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Completed => "Completed",
            Self::InProgress => "In Progress",
            Self::NotStarted => "Not Started",
            Self::Missing => "Missing",
        }
    }
}

impl From<StatusKind> for CourseProgress {
    fn from(kind: StatusKind) -> Self {
        match kind {
            StatusKind::Completed => Self::Completed,
            StatusKind::InProgress => Self::InProgress,
            StatusKind::Planned => Self::NotStarted,
            StatusKind::Incomplete => Self::Missing,
        }
    }
}

/// Where a requirement result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    /// Catalog course pool
    Pool,
    /// Synthesized from the deficiency list
    Deficiency,
    /// Synthesized from the exemption list
    Exemption,
}

/// One course row of a requirement breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseResult {
    /// Course code
    pub code: String,
    /// Course title (the code when the course is not in the catalog)
    pub title: String,
    /// Credit weight
    pub credits: f32,
    /// Display status
    pub status: CourseProgress,
    /// Term the course is assigned to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term: Option<Term>,
}

/// Breakdown of a single requirement category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequirementResult {
    /// Category identifier
    pub id: String,
    /// Display name
    pub title: String,
    /// Category kind
    pub kind: CategoryKind,
    /// Category status
    pub status: RequirementStatus,
    /// Credits from completed courses
    pub credits_completed: f32,
    /// Credits from courses in progress
    pub credits_in_progress: f32,
    /// Credits required
    pub credits_total: f32,
    /// Member courses, sorted by display status
    pub courses: Vec<CourseResult>,
}

impl RequirementResult {
    /// Credits still missing from the quota (never negative)
    #[must_use]
    pub fn credits_missing(&self) -> f32 {
        (self.credits_total - self.credits_completed).max(0.0)
    }

    /// Whether any member course is in progress
    #[must_use]
    pub fn has_courses_in_progress(&self) -> bool {
        self.courses
            .iter()
            .any(|c| c.status == CourseProgress::InProgress)
    }
}

/// Running credit sums while walking a category's courses
#[derive(Default)]
struct Tally {
    completed: f32,
    in_progress: f32,
    rows: Vec<CourseResult>,
}

impl Tally {
    fn add(&mut self, code: &str, catalog: &Catalog, progress: &StudentProgress, forced: Option<StatusKind>) {
        let course = catalog.get(code);
        let status = progress.status_of(code);
        let kind = forced.unwrap_or(status.status);
        let credits = course.map_or(DEFAULT_COURSE_CREDITS, |c| c.credits);

        match kind {
            StatusKind::Completed => self.completed += credits,
            StatusKind::InProgress => self.in_progress += credits,
            StatusKind::Planned | StatusKind::Incomplete => {}
        }

        self.rows.push(CourseResult {
            code: code.to_string(),
            title: course.map_or_else(|| code.to_string(), |c| c.title.clone()),
            credits,
            status: kind.into(),
            term: status.term,
        });
    }

    fn into_result(
        mut self,
        id: &str,
        title: &str,
        kind: CategoryKind,
        status: RequirementStatus,
        credits_total: f32,
    ) -> RequirementResult {
        // stable: keeps member order inside each status group
        self.rows.sort_by_key(|row| row.status);
        RequirementResult {
            id: id.to_string(),
            title: title.to_string(),
            kind,
            status,
            credits_completed: self.completed,
            credits_in_progress: self.in_progress,
            credits_total,
            courses: self.rows,
        }
    }
}

/// Evaluate a catalog course pool.
///
/// Codes that are not in the catalog count with the default credit weight and
/// show as [`CourseProgress::Missing`] rows; the pool status still follows
/// [`RequirementStatus::classify`].
#[must_use]
pub fn evaluate_category(
    category: &RequirementCategory,
    catalog: &Catalog,
    progress: &StudentProgress,
) -> RequirementResult {
    let mut tally = Tally::default();
    for code in &category.courses {
        tally.add(code, catalog, progress, None);
    }

    let status =
        RequirementStatus::classify(tally.completed, tally.in_progress, category.credits_required);

    tally.into_result(
        &category.id,
        &category.name,
        CategoryKind::Pool,
        status,
        category.credits_required,
    )
}

/// Evaluate the deficiency list. Complete only once every deficiency credit is completed.
#[must_use]
pub fn evaluate_deficiencies(
    codes: &[String],
    catalog: &Catalog,
    progress: &StudentProgress,
) -> RequirementResult {
    let mut tally = Tally::default();
    for code in codes {
        tally.add(code, catalog, progress, None);
    }
    let total: f32 = codes.iter().map(|c| catalog.credits_or_default(c)).sum();
    let status = if tally.completed + CREDIT_EPSILON >= total {
        RequirementStatus::Complete
    } else {
        RequirementStatus::Incomplete
    };

    tally.into_result(
        DEFICIENCY_CATEGORY_ID,
        "Deficiencies",
        CategoryKind::Deficiency,
        status,
        total,
    )
}

/// Evaluate the exemption list. Every exempted course counts as completed.
#[must_use]
pub fn evaluate_exemptions(
    codes: &[String],
    catalog: &Catalog,
    progress: &StudentProgress,
) -> RequirementResult {
    let mut tally = Tally::default();
    for code in codes {
        tally.add(code, catalog, progress, Some(StatusKind::Completed));
    }
    let total = tally.completed;

    tally.into_result(
        EXEMPTION_CATEGORY_ID,
        "Exemptions",
        CategoryKind::Exemption,
        RequirementStatus::Complete,
        total,
    )
}
