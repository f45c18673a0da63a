//! Prerequisite and corequisite checks over an existing timeline

use crate::core::models::{Catalog, StatusKind, StudentProgress, Term};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which requisite list a violated group belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequisiteKind {
    /// Must be satisfied in an earlier term
    Prerequisite,
    /// May be satisfied in the same term
    Corequisite,
}

/// A requisite group a scheduled course does not satisfy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequisiteIssue {
    /// Course with the unsatisfied group
    pub code: String,
    /// Term the course is scheduled in
    pub term: Term,
    /// Requisite list
    pub kind: RequisiteKind,
    /// Alternatives of the unsatisfied group
    pub alternatives: Vec<String>,
}

impl fmt::Display for RequisiteIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            RequisiteKind::Prerequisite => "prerequisite",
            RequisiteKind::Corequisite => "corequisite",
        };
        write!(
            f,
            "{} ({}): missing {kind}, one of [{}]",
            self.code,
            self.term,
            self.alternatives.join(", ")
        )
    }
}

/// List requisite violations for courses on the timeline that are not yet
/// completed.
///
/// A prerequisite alternative counts when it is completed or scheduled in a
/// strictly earlier term. A corequisite alternative also counts when it is
/// scheduled in the same term. Courses missing from the catalog are skipped.
#[must_use]
pub fn check_requisites(catalog: &Catalog, progress: &StudentProgress) -> Vec<RequisiteIssue> {
    let mut issues = Vec::new();

    for semester in &progress.semesters {
        let term = semester.term;
        for code in &semester.courses {
            if progress.status_of(code).status == StatusKind::Completed {
                continue;
            }
            let Some(course) = catalog.get(code) else {
                continue;
            };

            let satisfied_before = |alt: &str| {
                let status = progress.status_of(alt);
                status.status == StatusKind::Completed || status.term.is_some_and(|t| t < term)
            };
            for group in course.unsatisfied_prerequisites(satisfied_before) {
                issues.push(RequisiteIssue {
                    code: code.clone(),
                    term,
                    kind: RequisiteKind::Prerequisite,
                    alternatives: group.any_of.clone(),
                });
            }

            let satisfied_by_now = |alt: &str| {
                let status = progress.status_of(alt);
                status.status == StatusKind::Completed || status.term.is_some_and(|t| t <= term)
            };
            for group in &course.corequisites {
                if !group.is_satisfied_by(&satisfied_by_now) {
                    issues.push(RequisiteIssue {
                        code: code.clone(),
                        term,
                        kind: RequisiteKind::Corequisite,
                        alternatives: group.any_of.clone(),
                    });
                }
            }
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{Course, RequisiteGroup, Season, Timeline};
    use chrono::NaiveDate;

    fn catalog() -> Catalog {
        let mut calc2 = Course::new("MATH2", "Calculus II", 3.0);
        calc2.add_prerequisite_group(RequisiteGroup::any_of(["MATH1"]));
        let mut lab = Course::new("PHYS1L", "Physics Lab", 1.0);
        lab.add_corequisite_group(RequisiteGroup::any_of(["PHYS1"]));
        vec![
            Course::new("MATH1", "Calculus I", 3.0),
            calc2,
            Course::new("PHYS1", "Physics I", 3.0),
            lab,
        ]
        .into()
    }

    fn progress(timeline: &Timeline) -> StudentProgress {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        StudentProgress::derive(timeline, &catalog(), today)
    }

    #[test]
    fn test_prerequisite_in_same_term_is_flagged() {
        let timeline = Timeline::new("t", "u")
            .with_semester(Term::new(Season::Fall, 2024), ["MATH1", "MATH2"]);
        let issues = check_requisites(&catalog(), &progress(&timeline));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, "MATH2");
        assert_eq!(issues[0].kind, RequisiteKind::Prerequisite);
        assert_eq!(
            issues[0].to_string(),
            "MATH2 (Fall 2024): missing prerequisite, one of [MATH1]"
        );
    }

    #[test]
    fn test_prerequisite_in_earlier_term_is_fine() {
        let timeline = Timeline::new("t", "u")
            .with_semester(Term::new(Season::Fall, 2024), ["MATH1"])
            .with_semester(Term::new(Season::Winter, 2025), ["MATH2"]);
        assert!(check_requisites(&catalog(), &progress(&timeline)).is_empty());
    }

    #[test]
    fn test_corequisite_same_term_is_fine() {
        let same = Timeline::new("t", "u")
            .with_semester(Term::new(Season::Fall, 2024), ["PHYS1", "PHYS1L"]);
        assert!(check_requisites(&catalog(), &progress(&same)).is_empty());

        let later = Timeline::new("t", "u")
            .with_semester(Term::new(Season::Fall, 2024), ["PHYS1L"])
            .with_semester(Term::new(Season::Winter, 2025), ["PHYS1"]);
        let issues = check_requisites(&catalog(), &progress(&later));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, RequisiteKind::Corequisite);
    }

    #[test]
    fn test_completed_courses_are_not_checked() {
        // Winter 2024 has ended by June 2024
        let timeline = Timeline::new("t", "u")
            .with_semester(Term::new(Season::Winter, 2024), ["MATH2"]);
        assert!(check_requisites(&catalog(), &progress(&timeline)).is_empty());
    }
}
