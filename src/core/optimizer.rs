//! Graduation path optimizer
//!
//! Greedily schedules the student's remaining degree courses into new terms
//! after the last term of the timeline:
//! 1. Collects incomplete catalog courses that belong to a regular requirement pool
//! 2. Opens one term per pass, starting right after the timeline's last term
//! 3. Places each candidate, in catalog order, that fits under the credit cap,
//!    runs in the term's season and has every prerequisite group satisfied by a
//!    completed course or one scheduled in an earlier term
//! 4. Stops when nothing is left or the pass bound is reached
//!
//! Courses that remain unplaced are reported with the reason they could not
//! be scheduled. The input progress is never modified.

use crate::core::models::{
    degree_course_codes, Catalog, Course, CourseStatus, RequirementCategory, Semester, StatusKind,
    StatusMap, StudentProgress, Term,
};
use crate::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Default credit cap per generated term
pub const MAX_CREDITS_PER_SEMESTER: f32 = 19.0;

/// Default bound on term-filling passes
pub const MAX_EXTRA_SEMESTERS: usize = 24;

/// Tolerance for the credit cap comparison
const CREDIT_EPSILON: f32 = 1e-4;

/// Configuration for the optimizer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptimizerConfig {
    /// Maximum credits in a generated term (hard limit)
    pub max_credits_per_term: f32,
    /// Maximum number of term-filling passes
    pub max_extra_terms: usize,
}

impl OptimizerConfig {
    /// Create a config with explicit limits
    #[must_use]
    pub const fn new(max_credits_per_term: f32, max_extra_terms: usize) -> Self {
        Self {
            max_credits_per_term,
            max_extra_terms,
        }
    }
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self::new(MAX_CREDITS_PER_SEMESTER, MAX_EXTRA_SEMESTERS)
    }
}

/// Why a course could not be placed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum UnplacedReason {
    /// The course alone is heavier than the per-term cap
    ExceedsCreditCap {
        /// Course credits
        credits: f32,
        /// Configured cap
        cap: f32,
    },
    /// The course is not offered in any season
    NotOffered,
    /// The course is part of a prerequisite loop among unplaced courses
    PrerequisiteCycle {
        /// Courses in the loop, in candidate order
        members: Vec<String>,
    },
    /// A prerequisite group has no completed or scheduled alternative
    UnsatisfiedPrerequisite {
        /// Alternatives of the blocking group
        alternatives: Vec<String>,
    },
    /// The pass bound ran out before the course found a slot
    PassLimitReached,
    /// The timeline has no term to schedule after
    NoStartingTerm,
}

impl fmt::Display for UnplacedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExceedsCreditCap { credits, cap } => {
                write!(f, "{credits} credits exceed the {cap} credit term cap")
            }
            Self::NotOffered => f.write_str("not offered in any season"),
            Self::PrerequisiteCycle { members } => {
                write!(f, "prerequisite cycle between {}", members.join(", "))
            }
            Self::UnsatisfiedPrerequisite { alternatives } => {
                write!(f, "needs one of [{}] first", alternatives.join(", "))
            }
            Self::PassLimitReached => f.write_str("no slot found within the term limit"),
            Self::NoStartingTerm => f.write_str("timeline has no terms to extend"),
        }
    }
}

/// A course left out of the generated plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnplacedCourse {
    /// Course code
    pub code: String,
    /// Diagnosis
    pub reason: UnplacedReason,
}

/// Extended timeline produced by the optimizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizerResult {
    /// Existing terms followed by the generated ones
    pub semesters: Vec<Semester>,
    /// Course statuses with newly placed courses marked planned
    pub courses: StatusMap,
    /// Number of courses placed
    pub placed_count: usize,
    /// Number of courses left unplaced
    pub unplaced_count: usize,
    /// Number of terms added to the timeline
    pub new_semester_count: usize,
    /// Last generated term, or the last existing term when nothing was added
    pub estimated_graduation: Option<Term>,
    /// Diagnosis for every unplaced course
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unplaced: Vec<UnplacedCourse>,
    #[serde(skip)]
    exemptions: Vec<String>,
    #[serde(skip)]
    deficiencies: Vec<String>,
}

impl OptimizerResult {
    /// Whether every candidate course was placed
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.unplaced_count == 0
    }

    /// Progress as it would look with the generated plan, ready to be audited
    #[must_use]
    pub fn projected_progress(&self) -> StudentProgress {
        StudentProgress {
            semesters: self.semesters.clone(),
            courses: self.courses.clone(),
            exemptions: self.exemptions.clone(),
            deficiencies: self.deficiencies.clone(),
        }
    }

    /// Terms generated by the run
    #[must_use]
    pub fn new_semesters(&self) -> &[Semester] {
        let start = self.semesters.len().saturating_sub(self.new_semester_count);
        &self.semesters[start..]
    }
}

/// Greedy graduation path optimizer
#[derive(Debug, Clone, Copy, Default)]
pub struct GraduationPathOptimizer {
    config: OptimizerConfig,
}

impl GraduationPathOptimizer {
    /// Create an optimizer
    #[must_use]
    pub const fn new(config: OptimizerConfig) -> Self {
        Self { config }
    }

    /// Configured limits
    #[must_use]
    pub const fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Schedule the remaining degree courses.
    ///
    /// # Arguments
    /// * `categories` - Requirement categories of the degree; special pools are ignored
    /// * `catalog` - Course catalog, whose order decides candidate order
    /// * `progress` - Current course statuses and timeline terms
    ///
    /// # Returns
    /// A new extended plan; `progress` is left untouched
    #[must_use]
    pub fn optimize(
        &self,
        categories: &[RequirementCategory],
        catalog: &Catalog,
        progress: &StudentProgress,
    ) -> OptimizerResult {
        let degree_codes = degree_course_codes(categories);
        let candidates: Vec<&Course> = catalog
            .iter()
            .filter(|c| degree_codes.contains(c.code.as_str()))
            .filter(|c| progress.status_of(&c.code).status == StatusKind::Incomplete)
            .collect();

        let mut result = OptimizerResult {
            semesters: progress.semesters.clone(),
            courses: progress.courses.clone(),
            placed_count: 0,
            unplaced_count: 0,
            new_semester_count: 0,
            estimated_graduation: progress.last_term(),
            unplaced: Vec::new(),
            exemptions: progress.exemptions.clone(),
            deficiencies: progress.deficiencies.clone(),
        };

        if candidates.is_empty() {
            debug!("Nothing to schedule");
            return result;
        }
        let Some(last_term) = progress.last_term() else {
            warn!(
                "Timeline has no terms; {} course(s) cannot be scheduled",
                candidates.len()
            );
            result.unplaced_count = candidates.len();
            result.unplaced = candidates
                .iter()
                .map(|c| UnplacedCourse {
                    code: c.code.clone(),
                    reason: UnplacedReason::NoStartingTerm,
                })
                .collect();
            return result;
        };

        let mut pending = candidates;
        let mut current = last_term.next();
        for _ in 0..self.config.max_extra_terms {
            if pending.is_empty() {
                break;
            }
            let (semester, rest) = self.fill_term(current, pending, &mut result.courses);
            pending = rest;

            if !semester.courses.is_empty() {
                result.placed_count += semester.courses.len();
                result.new_semester_count += 1;
                result.estimated_graduation = Some(current);
                result.semesters.push(semester);
            }
            current = current.next();
        }

        result.unplaced_count = pending.len();
        result.unplaced = self.diagnose(&pending, &result.courses);

        if pending.is_empty() {
            info!(
                "Placed {} course(s) in {} new term(s)",
                result.placed_count, result.new_semester_count
            );
        } else {
            warn!(
                "Placed {} course(s) in {} new term(s); {} left unplaced",
                result.placed_count, result.new_semester_count, result.unplaced_count
            );
        }
        result
    }

    /// Fill one term from the pending list.
    ///
    /// Returns the term and the courses that did not fit, in their original order.
    fn fill_term<'c>(
        &self,
        term: Term,
        pending: Vec<&'c Course>,
        statuses: &mut StatusMap,
    ) -> (Semester, Vec<&'c Course>) {
        let mut semester = Semester::new(term);
        let mut load = 0.0_f32;
        let mut rest = Vec::new();

        for course in pending {
            if load + course.credits > self.config.max_credits_per_term + CREDIT_EPSILON {
                debug!("{term}: skip {} (credit cap)", course.code);
                rest.push(course);
            } else if !course.offered.includes(&term) {
                debug!("{term}: skip {} (not offered)", course.code);
                rest.push(course);
            } else if !course.prerequisites_satisfied(|alt| satisfied_before(statuses, alt, term)) {
                debug!("{term}: skip {} (prerequisites)", course.code);
                rest.push(course);
            } else {
                debug!("{term}: place {}", course.code);
                statuses.insert(
                    course.code.clone(),
                    CourseStatus::new(StatusKind::Planned, Some(term)),
                );
                semester.add_course(course.code.clone());
                load += course.credits;
            }
        }

        (semester, rest)
    }

    /// Explain why each pending course was never placed
    fn diagnose(&self, pending: &[&Course], statuses: &StatusMap) -> Vec<UnplacedCourse> {
        let pending_codes: HashSet<&str> = pending.iter().map(|c| c.code.as_str()).collect();
        let scheduled = |code: &str| {
            statuses
                .get(code)
                .is_some_and(|s| s.status != StatusKind::Incomplete)
        };

        // blocked-by edges between pending courses, through unsatisfied groups
        let mut edges: HashMap<&str, Vec<&str>> = HashMap::new();
        for course in pending {
            let targets = course
                .unsatisfied_prerequisites(&scheduled)
                .into_iter()
                .flat_map(|group| group.any_of.iter().map(String::as_str))
                .filter(|alt| pending_codes.contains(alt))
                .collect();
            edges.insert(course.code.as_str(), targets);
        }
        let reach: HashMap<&str, HashSet<&str>> = pending
            .iter()
            .map(|c| (c.code.as_str(), reachable_from(c.code.as_str(), &edges)))
            .collect();

        pending
            .iter()
            .map(|course| {
                let code = course.code.as_str();
                let reason = if course.credits > self.config.max_credits_per_term + CREDIT_EPSILON {
                    UnplacedReason::ExceedsCreditCap {
                        credits: course.credits,
                        cap: self.config.max_credits_per_term,
                    }
                } else if !course.offered.is_ever_offered() {
                    UnplacedReason::NotOffered
                } else if reach[code].contains(code) {
                    let members = pending
                        .iter()
                        .map(|c| c.code.as_str())
                        .filter(|other| reach[code].contains(other) && reach[other].contains(code))
                        .map(str::to_string)
                        .collect();
                    UnplacedReason::PrerequisiteCycle { members }
                } else if let Some(group) = course.unsatisfied_prerequisites(&scheduled).first() {
                    UnplacedReason::UnsatisfiedPrerequisite {
                        alternatives: group.any_of.clone(),
                    }
                } else {
                    UnplacedReason::PassLimitReached
                };
                UnplacedCourse {
                    code: course.code.clone(),
                    reason,
                }
            })
            .collect()
    }
}

/// Schedule remaining degree courses with default limits
#[must_use]
pub fn optimize(
    categories: &[RequirementCategory],
    catalog: &Catalog,
    progress: &StudentProgress,
) -> OptimizerResult {
    GraduationPathOptimizer::default().optimize(categories, catalog, progress)
}

/// Whether `code` is completed, or scheduled in a term strictly before `term`
fn satisfied_before(statuses: &StatusMap, code: &str, term: Term) -> bool {
    statuses.get(code).is_some_and(|status| match status.status {
        StatusKind::Completed => true,
        StatusKind::InProgress | StatusKind::Planned => status.term.is_some_and(|t| t < term),
        StatusKind::Incomplete => false,
    })
}

/// Nodes reachable from `start` through at least one edge
fn reachable_from<'a>(start: &'a str, edges: &HashMap<&'a str, Vec<&'a str>>) -> HashSet<&'a str> {
    let mut seen = HashSet::new();
    let mut stack: Vec<&str> = edges.get(start).cloned().unwrap_or_default();
    while let Some(node) = stack.pop() {
        if seen.insert(node) {
            if let Some(next) = edges.get(node) {
                stack.extend(next.iter().copied());
            }
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{Offering, RequisiteGroup, Season, Timeline};
    use chrono::NaiveDate;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 15).unwrap()
    }

    fn core(codes: &[&str]) -> Vec<RequirementCategory> {
        vec![RequirementCategory::new("core", "Core", 30.0).with_courses(codes.iter().copied())]
    }

    fn progress_for(catalog: &Catalog) -> StudentProgress {
        let timeline = Timeline::new("t", "u").with_semester(Term::new(Season::Fall, 2025), ["DONE"]);
        StudentProgress::derive(&timeline, catalog, today())
    }

    #[test]
    fn test_satisfied_before_requires_earlier_term() {
        let mut statuses = StatusMap::new();
        let fall = Term::new(Season::Fall, 2025);
        statuses.insert("A".into(), CourseStatus::new(StatusKind::Planned, Some(fall)));
        assert!(!satisfied_before(&statuses, "A", fall));
        assert!(satisfied_before(&statuses, "A", fall.next()));
        assert!(!satisfied_before(&statuses, "MISSING", fall.next()));
    }

    #[test]
    fn test_reachable_from_detects_loops() {
        let mut edges: HashMap<&str, Vec<&str>> = HashMap::new();
        edges.insert("A", vec!["B"]);
        edges.insert("B", vec!["A"]);
        edges.insert("C", vec!["A"]);
        assert!(reachable_from("A", &edges).contains("A"));
        assert!(!reachable_from("C", &edges).contains("C"));
    }

    #[test]
    fn test_no_terms_reports_every_candidate() {
        let catalog: Catalog = vec![Course::new("A", "A", 3.0)].into();
        let progress = StudentProgress::derive(&Timeline::new("t", "u"), &catalog, today());
        let result = optimize(&core(&["A"]), &catalog, &progress);
        assert_eq!(result.placed_count, 0);
        assert_eq!(result.unplaced_count, 1);
        assert_eq!(result.unplaced[0].reason, UnplacedReason::NoStartingTerm);
        assert_eq!(result.estimated_graduation, None);
    }

    #[test]
    fn test_heavy_course_exceeds_cap() {
        let catalog: Catalog = vec![Course::new("BIG", "Thesis", 24.0)].into();
        let result = optimize(&core(&["BIG"]), &catalog, &progress_for(&catalog));
        assert_eq!(result.new_semester_count, 0);
        assert!(matches!(
            result.unplaced[0].reason,
            UnplacedReason::ExceedsCreditCap { .. }
        ));
        assert_eq!(result.estimated_graduation, Some(Term::new(Season::Fall, 2025)));
    }

    #[test]
    fn test_never_offered_course() {
        let catalog: Catalog = vec![Course::new("X", "X", 3.0).with_offering(Offering::never())].into();
        let result = optimize(&core(&["X"]), &catalog, &progress_for(&catalog));
        assert_eq!(result.unplaced[0].reason, UnplacedReason::NotOffered);
    }

    #[test]
    fn test_unsatisfiable_prerequisite_is_named() {
        let mut x = Course::new("X", "X", 3.0);
        x.add_prerequisite_group(RequisiteGroup::any_of(["GONE"]));
        let catalog: Catalog = vec![x].into();
        let result = optimize(&core(&["X"]), &catalog, &progress_for(&catalog));
        assert_eq!(
            result.unplaced[0].reason,
            UnplacedReason::UnsatisfiedPrerequisite {
                alternatives: vec!["GONE".to_string()]
            }
        );
    }

    #[test]
    fn test_new_semesters_slice() {
        let catalog: Catalog = vec![Course::new("A", "A", 3.0)].into();
        let result = optimize(&core(&["A"]), &catalog, &progress_for(&catalog));
        assert_eq!(result.new_semesters().len(), 1);
        assert_eq!(result.new_semesters()[0].term, Term::new(Season::Winter, 2026));
        assert!(result.is_complete());
    }
}
