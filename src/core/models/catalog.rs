//! Request-scoped course catalog

use super::course::{Course, DEFAULT_COURSE_CREDITS};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Courses available to a single audit or optimization run.
///
/// Courses keep their insertion order, which the optimizer relies on for
/// deterministic placement. The code index is derived from that sequence and
/// is never iterated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Course>", into = "Vec<Course>")]
pub struct Catalog {
    courses: Vec<Course>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Create an empty catalog
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a course
    ///
    /// # Returns
    /// `true` if the course was added, `false` if a course with that code already exists
    pub fn insert(&mut self, course: Course) -> bool {
        if self.index.contains_key(&course.code) {
            return false;
        }
        self.index.insert(course.code.clone(), self.courses.len());
        self.courses.push(course);
        true
    }

    /// Get a course by code
    #[must_use]
    pub fn get(&self, code: &str) -> Option<&Course> {
        self.index.get(code).map(|&idx| &self.courses[idx])
    }

    /// Whether a course with this code exists
    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.index.contains_key(code)
    }

    /// Courses in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Course> {
        self.courses.iter()
    }

    /// Number of courses
    #[must_use]
    pub fn len(&self) -> usize {
        self.courses.len()
    }

    /// Whether the catalog is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    /// Credit weight of a course, or the default weight when it is not in the catalog
    #[must_use]
    pub fn credits_or_default(&self, code: &str) -> f32 {
        self.get(code).map_or(DEFAULT_COURSE_CREDITS, |c| c.credits)
    }

    /// Validate that every prerequisite and corequisite names a known course
    ///
    /// # Errors
    /// Returns one message per dangling reference
    pub fn validate_references(&self) -> Result<(), Vec<String>> {
        let errors: Vec<String> = self
            .courses
            .iter()
            .flat_map(|course| {
                course
                    .requisite_codes()
                    .filter(move |code| !self.contains(code))
                    .map(move |code| {
                        format!("Course '{}': unknown requisite '{code}'", course.code)
                    })
            })
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate that every course carries a positive credit weight
    ///
    /// # Errors
    /// Returns one message per offending course
    pub fn validate_credits(&self) -> Result<(), Vec<String>> {
        let errors: Vec<String> = self
            .courses
            .iter()
            .filter(|c| !c.has_valid_credits())
            .map(|c| format!("Course '{}': invalid credit weight {}", c.code, c.credits))
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl From<Vec<Course>> for Catalog {
    fn from(courses: Vec<Course>) -> Self {
        courses.into_iter().collect()
    }
}

impl From<Catalog> for Vec<Course> {
    fn from(catalog: Catalog) -> Self {
        catalog.courses
    }
}

impl FromIterator<Course> for Catalog {
    fn from_iter<T: IntoIterator<Item = Course>>(iter: T) -> Self {
        let mut catalog = Self::new();
        for course in iter {
            catalog.insert(course);
        }
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::course::RequisiteGroup;

    fn sample() -> Catalog {
        let mut advanced = Course::new("COMP352", "Data Structures", 3.0);
        advanced.add_prerequisite_group(RequisiteGroup::any_of(["COMP249"]));
        [
            Course::new("COMP248", "OOP I", 3.5),
            Course::new("COMP249", "OOP II", 3.5),
            advanced,
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut catalog = sample();
        assert_eq!(catalog.len(), 3);
        assert!(catalog.contains("COMP249"));
        assert_eq!(catalog.get("COMP352").map(|c| c.title.as_str()), Some("Data Structures"));
        assert!(!catalog.insert(Course::new("COMP248", "duplicate", 1.0)));
        assert_eq!(catalog.get("COMP248").unwrap().title, "OOP I");
    }

    #[test]
    fn test_iteration_keeps_insertion_order() {
        let catalog = sample();
        let codes: Vec<&str> = catalog.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, vec!["COMP248", "COMP249", "COMP352"]);
    }

    #[test]
    fn test_credits_default_for_unknown() {
        let catalog = sample();
        assert!((catalog.credits_or_default("COMP248") - 3.5).abs() < f32::EPSILON);
        assert!((catalog.credits_or_default("NOPE") - DEFAULT_COURSE_CREDITS).abs() < f32::EPSILON);
    }

    #[test]
    fn test_validate_references() {
        let mut catalog = sample();
        assert!(catalog.validate_references().is_ok());

        let mut orphan = Course::new("SOEN390", "Capstone", 3.5);
        orphan.add_corequisite_group(RequisiteGroup::any_of(["SOEN341"]));
        catalog.insert(orphan);
        let errors = catalog.validate_references().unwrap_err();
        assert_eq!(errors, vec!["Course 'SOEN390': unknown requisite 'SOEN341'"]);
    }

    #[test]
    fn test_validate_credits() {
        let mut catalog = sample();
        assert!(catalog.validate_credits().is_ok());
        catalog.insert(Course::new("BAD1", "Zero", 0.0));
        assert_eq!(catalog.validate_credits().unwrap_err().len(), 1);
    }
}
