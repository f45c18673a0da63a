//! Student timeline and per-course progress
//!
//! A [`Timeline`] is the stored plan: an ordered list of terms with the course
//! codes assigned to each, plus exemption and deficiency lists. A
//! [`StudentProgress`] is derived from it once per request and carries the
//! status of every course the run cares about.

use super::catalog::Catalog;
use super::term::Term;
use crate::core::error::PlannerError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// One term of a timeline with its assigned courses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Semester {
    /// The academic term
    pub term: Term,

    /// Course codes assigned to this term (order within a term carries no meaning)
    #[serde(default)]
    pub courses: Vec<String>,
}

impl Semester {
    /// Create an empty semester
    #[must_use]
    pub const fn new(term: Term) -> Self {
        Self {
            term,
            courses: Vec::new(),
        }
    }

    /// Add a course code (duplicates are ignored)
    pub fn add_course(&mut self, code: String) {
        if !self.courses.contains(&code) {
            self.courses.push(code);
        }
    }
}

/// A student's stored plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    /// Timeline identifier
    pub id: String,

    /// User that owns the timeline
    pub owner_id: String,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// Terms in strictly increasing order
    #[serde(default)]
    pub semesters: Vec<Semester>,

    /// Waived courses, always counted as satisfied
    #[serde(default)]
    pub exemptions: Vec<String>,

    /// Courses the student must complete on top of the degree requirements
    #[serde(default)]
    pub deficiencies: Vec<String>,
}

impl Timeline {
    /// Create an empty timeline
    pub fn new(id: impl Into<String>, owner_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            owner_id: owner_id.into(),
            name: String::new(),
            semesters: Vec::new(),
            exemptions: Vec::new(),
            deficiencies: Vec::new(),
        }
    }

    /// Builder-style semester append
    #[must_use]
    pub fn with_semester<I, S>(mut self, term: Term, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut semester = Semester::new(term);
        for code in codes {
            semester.add_course(code.into());
        }
        self.semesters.push(semester);
        self
    }

    /// Last term of the timeline
    #[must_use]
    pub fn last_term(&self) -> Option<Term> {
        self.semesters.last().map(|s| s.term)
    }

    /// Check the structural invariants: terms strictly increase and a course
    /// appears in at most one term.
    ///
    /// # Errors
    /// Returns [`PlannerError::InvalidTimeline`] describing the first violation.
    pub fn validate(&self) -> Result<(), PlannerError> {
        for pair in self.semesters.windows(2) {
            if pair[0].term >= pair[1].term {
                return Err(PlannerError::InvalidTimeline(format!(
                    "timeline '{}': term {} does not come after {}",
                    self.id, pair[1].term, pair[0].term
                )));
            }
        }

        let mut seen: HashMap<&str, Term> = HashMap::new();
        for semester in &self.semesters {
            for code in &semester.courses {
                if let Some(first) = seen.insert(code.as_str(), semester.term) {
                    return Err(PlannerError::InvalidTimeline(format!(
                        "timeline '{}': course {code} appears in both {first} and {}",
                        self.id, semester.term
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Progress of a single course
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatusKind {
    /// Taken in a finished term, or exempted
    Completed,
    /// Assigned to the term in progress
    InProgress,
    /// Assigned to a future term
    Planned,
    /// Not placed on the timeline
    Incomplete,
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Completed => "completed",
            Self::InProgress => "in-progress",
            Self::Planned => "planned",
            Self::Incomplete => "incomplete",
        };
        f.write_str(label)
    }
}

/// Status of a course plus the term it is (or was) taken in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseStatus {
    /// Progress state
    pub status: StatusKind,

    /// Term the course is assigned to, when there is one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term: Option<Term>,
}

impl CourseStatus {
    /// Status of a course not on the timeline
    pub const INCOMPLETE: Self = Self {
        status: StatusKind::Incomplete,
        term: None,
    };

    /// Create a status
    #[must_use]
    pub const fn new(status: StatusKind, term: Option<Term>) -> Self {
        Self { status, term }
    }
}

/// Course statuses keyed by course code, iterated in code order
pub type StatusMap = BTreeMap<String, CourseStatus>;

/// Derived per-request view of a student's progress
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentProgress {
    /// Timeline terms, copied from the stored timeline
    pub semesters: Vec<Semester>,

    /// Status of every timeline, exempted and catalog course
    pub courses: StatusMap,

    /// Waived course codes
    pub exemptions: Vec<String>,

    /// Deficiency course codes
    pub deficiencies: Vec<String>,
}

impl StudentProgress {
    /// Derive course statuses from a timeline.
    ///
    /// Courses in terms that ended before `today` are completed, courses in the
    /// term containing `today` are in progress and later ones are planned.
    /// Exempted courses are completed regardless of placement. Catalog courses
    /// absent from the timeline are incomplete.
    #[must_use]
    pub fn derive(timeline: &Timeline, catalog: &Catalog, today: NaiveDate) -> Self {
        let mut courses = StatusMap::new();

        for semester in &timeline.semesters {
            let status = if semester.term.has_ended(today) {
                StatusKind::Completed
            } else if semester.term.is_active(today) {
                StatusKind::InProgress
            } else {
                StatusKind::Planned
            };
            for code in &semester.courses {
                courses.insert(code.clone(), CourseStatus::new(status, Some(semester.term)));
            }
        }

        for code in &timeline.exemptions {
            let entry = courses.entry(code.clone()).or_insert(CourseStatus::INCOMPLETE);
            entry.status = StatusKind::Completed;
        }

        for course in catalog.iter() {
            courses
                .entry(course.code.clone())
                .or_insert(CourseStatus::INCOMPLETE);
        }

        Self {
            semesters: timeline.semesters.clone(),
            courses,
            exemptions: timeline.exemptions.clone(),
            deficiencies: timeline.deficiencies.clone(),
        }
    }

    /// Status of a course, defaulting to incomplete when unknown
    #[must_use]
    pub fn status_of(&self, code: &str) -> CourseStatus {
        self.courses
            .get(code)
            .copied()
            .unwrap_or(CourseStatus::INCOMPLETE)
    }

    /// Last term of the timeline
    #[must_use]
    pub fn last_term(&self) -> Option<Term> {
        self.semesters.last().map(|s| s.term)
    }
}
