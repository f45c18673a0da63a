//! Degree model

use super::requirement::RequirementCategory;
use crate::core::error::PlannerError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Total credit requirement assumed when source data omits it
pub const DEFAULT_TOTAL_CREDITS: f32 = 120.0;

const fn default_total_credits() -> f32 {
    DEFAULT_TOTAL_CREDITS
}

/// Represents a degree program
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Degree {
    /// Degree identifier (e.g., "BCompSc")
    pub id: String,

    /// Degree name (e.g., "Bachelor of Computer Science")
    pub name: String,

    /// Credits needed to graduate
    #[serde(default = "default_total_credits")]
    pub total_credits: f32,

    /// Requirement categories in display order
    #[serde(default)]
    pub requirements: Vec<RequirementCategory>,
}

impl Degree {
    /// Create a degree without requirement categories
    pub fn new(id: impl Into<String>, name: impl Into<String>, total_credits: f32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            total_credits,
            requirements: Vec::new(),
        }
    }

    /// Builder-style requirement category append
    #[must_use]
    pub fn with_requirement(mut self, category: RequirementCategory) -> Self {
        self.requirements.push(category);
        self
    }

    /// Codes of every course in a non-special requirement category
    #[must_use]
    pub fn degree_course_codes(&self) -> HashSet<&str> {
        degree_course_codes(&self.requirements)
    }

    /// Validate credit quotas and category identifiers.
    ///
    /// A zero total is allowed (progress reports 0%).
    ///
    /// # Errors
    /// Returns [`PlannerError::Configuration`] for negative or non-finite credit
    /// values and for duplicate category ids.
    pub fn validate(&self) -> Result<(), PlannerError> {
        if !self.total_credits.is_finite() || self.total_credits < 0.0 {
            return Err(PlannerError::Configuration(format!(
                "degree '{}' has invalid total credits {}",
                self.id, self.total_credits
            )));
        }

        let mut seen = HashSet::new();
        for category in &self.requirements {
            if !category.credits_required.is_finite() || category.credits_required < 0.0 {
                return Err(PlannerError::Configuration(format!(
                    "requirement '{}' of degree '{}' has invalid required credits {}",
                    category.id, self.id, category.credits_required
                )));
            }
            if !seen.insert(category.id.as_str()) {
                return Err(PlannerError::Configuration(format!(
                    "degree '{}' lists requirement '{}' more than once",
                    self.id, category.id
                )));
            }
        }
        Ok(())
    }
}

/// Union of member codes across all non-special categories
#[must_use]
pub fn degree_course_codes(categories: &[RequirementCategory]) -> HashSet<&str> {
    categories
        .iter()
        .filter(|c| !c.is_special())
        .flat_map(|c| c.courses.iter().map(String::as_str))
        .collect()
}
