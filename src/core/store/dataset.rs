//! JSON dataset loading

use crate::core::error::Result;
use crate::core::models::{
    normalize_code, Course, Degree, RequisiteGroup, Student, Timeline, DEFAULT_COURSE_CREDITS,
};
use crate::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Every record a planning run can look up, as stored on disk.
///
/// ```json
/// {
///   "courses":   [{"code": "COMP248", "title": "...", "credits": 3.5,
///                  "offered": ["Fall", "Winter"],
///                  "prerequisites": [{"anyOf": ["COMP201", "MATH204"]}]}],
///   "degrees":   [{"id": "BCompSc", "name": "...", "totalCredits": 120,
///                  "requirements": [{"id": "core", "name": "Core",
///                                    "courses": ["COMP248"], "creditsRequired": 3.5}]}],
///   "students":  [{"id": "u1", "name": "...", "degreeId": "BCompSc"}],
///   "timelines": [{"id": "t1", "ownerId": "u1",
///                  "semesters": [{"term": "Fall 2024", "courses": ["COMP248"]}],
///                  "exemptions": [], "deficiencies": []}]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Course catalog
    #[serde(default)]
    pub courses: Vec<Course>,
    /// Degree programs with their requirement categories
    #[serde(default)]
    pub degrees: Vec<Degree>,
    /// Student records
    #[serde(default)]
    pub students: Vec<Student>,
    /// Stored timelines
    #[serde(default)]
    pub timelines: Vec<Timeline>,
}

impl Dataset {
    /// Parse a dataset from JSON and normalize its course codes.
    ///
    /// # Errors
    /// Returns [`PlannerError::Json`](crate::core::error::PlannerError::Json) on
    /// malformed input, including unparseable term strings.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut dataset: Self = serde_json::from_str(json)?;
        dataset.normalize();
        Ok(dataset)
    }

    /// Serialize the dataset as pretty-printed JSON
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Canonicalize course codes everywhere and repair unusable credit values
    pub fn normalize(&mut self) {
        for course in &mut self.courses {
            course.code = normalize_code(&course.code);
            normalize_groups(&mut course.prerequisites);
            normalize_groups(&mut course.corequisites);
            if !course.has_valid_credits() {
                warn!(
                    "Course {} has invalid credits {}; using {DEFAULT_COURSE_CREDITS}",
                    course.code, course.credits
                );
                course.credits = DEFAULT_COURSE_CREDITS;
            }
        }

        for degree in &mut self.degrees {
            for category in &mut degree.requirements {
                normalize_codes(&mut category.courses);
            }
        }

        for timeline in &mut self.timelines {
            for semester in &mut timeline.semesters {
                normalize_codes(&mut semester.courses);
            }
            normalize_codes(&mut timeline.exemptions);
            normalize_codes(&mut timeline.deficiencies);
        }
    }
}

fn normalize_codes(codes: &mut [String]) {
    for code in codes {
        *code = normalize_code(code);
    }
}

fn normalize_groups(groups: &mut [RequisiteGroup]) {
    for group in groups {
        normalize_codes(&mut group.any_of);
    }
}

/// Read a dataset file.
///
/// # Errors
/// Returns [`PlannerError::Io`](crate::core::error::PlannerError::Io) when the
/// file cannot be read and `PlannerError::Json` when it is malformed.
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    let content = fs::read_to_string(path)?;
    Dataset::from_json(&content)
}
