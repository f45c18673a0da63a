//! Data collaborators
//!
//! The engine never talks to storage directly. A [`PlannerStore`] hands it
//! records by identifier; [`InMemoryStore`] serves them from a loaded
//! [`Dataset`].

pub mod dataset;

pub use dataset::{load_dataset, Dataset};

use crate::core::error::{Entity, PlannerError, Result};
use crate::core::models::{Course, Degree, RequirementCategory, Student, Timeline};
use std::collections::HashMap;
use std::path::Path;

/// Record lookups the engine depends on.
///
/// Every lookup fails with [`PlannerError::NotFound`] when the record is absent.
pub trait PlannerStore {
    /// Look up a course by (normalized) code
    ///
    /// # Errors
    /// `NotFound` when no course has this code.
    fn course(&self, code: &str) -> Result<Course>;

    /// Look up a degree by id
    ///
    /// # Errors
    /// `NotFound` when no degree has this id.
    fn degree(&self, id: &str) -> Result<Degree>;

    /// Requirement categories of a degree, in display order
    ///
    /// # Errors
    /// `NotFound` when the degree does not exist.
    fn requirements(&self, degree_id: &str) -> Result<Vec<RequirementCategory>> {
        Ok(self.degree(degree_id)?.requirements)
    }

    /// Look up a timeline by id
    ///
    /// # Errors
    /// `NotFound` when no timeline has this id.
    fn timeline(&self, id: &str) -> Result<Timeline>;

    /// Look up a student by user id
    ///
    /// # Errors
    /// `NotFound` when no student has this id.
    fn student(&self, id: &str) -> Result<Student>;
}

/// Builds an id → position index; the first record with an id wins
fn index_by<T>(items: &[T], key: impl Fn(&T) -> &str) -> HashMap<String, usize> {
    let mut index = HashMap::with_capacity(items.len());
    for (pos, item) in items.iter().enumerate() {
        index.entry(key(item).to_string()).or_insert(pos);
    }
    index
}

/// Store backed by an in-memory dataset
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    dataset: Dataset,
    courses: HashMap<String, usize>,
    degrees: HashMap<String, usize>,
    students: HashMap<String, usize>,
    timelines: HashMap<String, usize>,
}

impl InMemoryStore {
    /// Wrap a dataset, building the lookup maps once
    #[must_use]
    pub fn new(dataset: Dataset) -> Self {
        let courses = index_by(&dataset.courses, |c| c.code.as_str());
        let degrees = index_by(&dataset.degrees, |d| d.id.as_str());
        let students = index_by(&dataset.students, |s| s.id.as_str());
        let timelines = index_by(&dataset.timelines, |t| t.id.as_str());
        Self {
            dataset,
            courses,
            degrees,
            students,
            timelines,
        }
    }

    /// Load a store from a dataset file
    ///
    /// # Errors
    /// Propagates I/O and parse failures.
    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self::new(load_dataset(path)?))
    }

    /// Parse a store from dataset JSON
    ///
    /// # Errors
    /// Propagates parse failures.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::new(Dataset::from_json(json)?))
    }

    /// The underlying dataset
    #[must_use]
    pub const fn dataset(&self) -> &Dataset {
        &self.dataset
    }
}

impl From<Dataset> for InMemoryStore {
    fn from(dataset: Dataset) -> Self {
        Self::new(dataset)
    }
}

fn lookup<T: Clone>(
    items: &[T],
    index: &HashMap<String, usize>,
    entity: Entity,
    id: &str,
) -> Result<T> {
    index
        .get(id)
        .and_then(|&pos| items.get(pos))
        .cloned()
        .ok_or_else(|| PlannerError::not_found(entity, id))
}

impl PlannerStore for InMemoryStore {
    fn course(&self, code: &str) -> Result<Course> {
        lookup(&self.dataset.courses, &self.courses, Entity::Course, code)
    }

    fn degree(&self, id: &str) -> Result<Degree> {
        lookup(&self.dataset.degrees, &self.degrees, Entity::Degree, id)
    }

    fn timeline(&self, id: &str) -> Result<Timeline> {
        lookup(&self.dataset.timelines, &self.timelines, Entity::Timeline, id)
    }

    fn student(&self, id: &str) -> Result<Student> {
        lookup(&self.dataset.students, &self.students, Entity::Student, id)
    }
}
