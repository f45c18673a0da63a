//! Course model

use super::term::{Season, Term};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Credit weight assumed when source data omits it
pub const DEFAULT_COURSE_CREDITS: f32 = 3.0;

/// Marker written for courses that are offered in no known season
const NEVER_OFFERED: &str = "Never";

const fn default_credits() -> f32 {
    DEFAULT_COURSE_CREDITS
}

/// Normalize a course code for lookups: uppercase with whitespace removed
/// (e.g., `"comp 248"` becomes `"COMP248"`)
#[must_use]
pub fn normalize_code(code: &str) -> String {
    code.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Seasons in which a course runs.
///
/// In source data an empty season list means the course runs every season.
/// A non-empty list whose names are all unknown to the calendar (for example
/// `["Spring"]`) leaves the course with no season at all, so it can never be
/// scheduled.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub enum Offering {
    /// Offered in every season
    #[default]
    EverySeason,
    /// Offered only in the listed seasons
    Seasons(BTreeSet<Season>),
}

impl Offering {
    /// Build from a list of seasons (empty means every season)
    pub fn from_seasons(seasons: impl IntoIterator<Item = Season>) -> Self {
        let set: BTreeSet<Season> = seasons.into_iter().collect();
        if set.is_empty() {
            Self::EverySeason
        } else {
            Self::Seasons(set)
        }
    }

    /// An offering that matches no term
    #[must_use]
    pub const fn never() -> Self {
        Self::Seasons(BTreeSet::new())
    }

    /// Whether the course runs during `term` (either half of a combined term counts)
    #[must_use]
    pub fn includes(&self, term: &Term) -> bool {
        match self {
            Self::EverySeason => true,
            Self::Seasons(set) => term.seasons().iter().any(|s| set.contains(s)),
        }
    }

    /// Whether the course runs in at least one season
    #[must_use]
    pub fn is_ever_offered(&self) -> bool {
        match self {
            Self::EverySeason => true,
            Self::Seasons(set) => !set.is_empty(),
        }
    }
}

impl From<Vec<String>> for Offering {
    fn from(raw: Vec<String>) -> Self {
        if raw.is_empty() {
            return Self::EverySeason;
        }
        Self::Seasons(raw.iter().filter_map(|s| Season::parse(s)).collect())
    }
}

impl From<Offering> for Vec<String> {
    fn from(offering: Offering) -> Self {
        match offering {
            Offering::EverySeason => Self::new(),
            Offering::Seasons(set) if set.is_empty() => vec![NEVER_OFFERED.to_string()],
            Offering::Seasons(set) => set.iter().map(|s| s.name().to_string()).collect(),
        }
    }
}

/// A set of alternative courses, any one of which satisfies the group
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RequisiteGroup {
    /// Alternative course codes
    #[serde(rename = "anyOf", default)]
    pub any_of: Vec<String>,
}

impl RequisiteGroup {
    /// Create a group from its alternatives
    pub fn any_of<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            any_of: codes.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether at least one alternative satisfies `is_met`.
    ///
    /// A group with no alternatives places no constraint and is satisfied.
    pub fn is_satisfied_by(&self, mut is_met: impl FnMut(&str) -> bool) -> bool {
        self.any_of.is_empty() || self.any_of.iter().any(|code| is_met(code))
    }
}

/// Represents a course in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    /// Unique course code (e.g., "COMP248")
    pub code: String,

    /// Course title
    #[serde(default)]
    pub title: String,

    /// Credit weight (defaults to [`DEFAULT_COURSE_CREDITS`])
    #[serde(default = "default_credits")]
    pub credits: f32,

    /// Seasons in which the course runs
    #[serde(default)]
    pub offered: Offering,

    /// Prerequisites: every group must be satisfied
    #[serde(default)]
    pub prerequisites: Vec<RequisiteGroup>,

    /// Corequisites: same shape as prerequisites
    #[serde(default)]
    pub corequisites: Vec<RequisiteGroup>,
}

impl Course {
    /// Create a course offered every season with no requisites
    #[must_use]
    pub fn new(code: impl Into<String>, title: impl Into<String>, credits: f32) -> Self {
        Self {
            code: code.into(),
            title: title.into(),
            credits,
            offered: Offering::EverySeason,
            prerequisites: Vec::new(),
            corequisites: Vec::new(),
        }
    }

    /// Builder-style offering override
    #[must_use]
    pub fn with_offering(mut self, offered: Offering) -> Self {
        self.offered = offered;
        self
    }

    /// Add a prerequisite group (skipped if an identical group exists)
    pub fn add_prerequisite_group(&mut self, group: RequisiteGroup) {
        if !self.prerequisites.contains(&group) {
            self.prerequisites.push(group);
        }
    }

    /// Add a corequisite group (skipped if an identical group exists)
    pub fn add_corequisite_group(&mut self, group: RequisiteGroup) {
        if !self.corequisites.contains(&group) {
            self.corequisites.push(group);
        }
    }

    /// Whether every prerequisite group has an alternative satisfying `is_met`
    pub fn prerequisites_satisfied(&self, mut is_met: impl FnMut(&str) -> bool) -> bool {
        self.prerequisites
            .iter()
            .all(|group| group.is_satisfied_by(&mut is_met))
    }

    /// Prerequisite groups with no alternative satisfying `is_met`
    pub fn unsatisfied_prerequisites(
        &self,
        mut is_met: impl FnMut(&str) -> bool,
    ) -> Vec<&RequisiteGroup> {
        self.prerequisites
            .iter()
            .filter(|group| !group.is_satisfied_by(&mut is_met))
            .collect()
    }

    /// Every course code named by a prerequisite or corequisite group
    pub fn requisite_codes(&self) -> impl Iterator<Item = &str> {
        self.prerequisites
            .iter()
            .chain(&self.corequisites)
            .flat_map(|group| group.any_of.iter().map(String::as_str))
    }

    /// Whether the credit weight is a usable positive number
    #[must_use]
    pub fn has_valid_credits(&self) -> bool {
        self.credits.is_finite() && self.credits > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_creation() {
        let course = Course::new("COMP248", "Object-Oriented Programming I", 3.5);
        assert_eq!(course.code, "COMP248");
        assert!((course.credits - 3.5).abs() < f32::EPSILON);
        assert_eq!(course.offered, Offering::EverySeason);
        assert!(course.prerequisites.is_empty());
        assert!(course.has_valid_credits());
        assert!(!Course::new("X", "", 0.0).has_valid_credits());
    }

    #[test]
    fn test_normalize_code() {
        assert_eq!(normalize_code("comp 248"), "COMP248");
        assert_eq!(normalize_code(" SOEN\t287 "), "SOEN287");
    }

    #[test]
    fn test_and_of_or_prerequisites() {
        let mut course = Course::new("X", "X", 3.0);
        course.add_prerequisite_group(RequisiteGroup::any_of(["A", "B"]));
        course.add_prerequisite_group(RequisiteGroup::any_of(["C"]));
        course.add_prerequisite_group(RequisiteGroup::any_of(["C"]));
        assert_eq!(course.prerequisites.len(), 2);

        assert!(course.prerequisites_satisfied(|c| c == "B" || c == "C"));
        assert!(!course.prerequisites_satisfied(|c| c == "A" || c == "B"));
        let missing = course.unsatisfied_prerequisites(|c| c == "A");
        assert_eq!(missing, vec![&RequisiteGroup::any_of(["C"])]);
    }

    #[test]
    fn test_empty_group_is_satisfied() {
        assert!(RequisiteGroup::default().is_satisfied_by(|_| false));
    }

    #[test]
    fn test_offering_matches_terms() {
        let fall = Term::new(Season::Fall, 2025);
        let winter = Term::new(Season::Winter, 2026);
        let fall_only = Offering::from_seasons([Season::Fall]);
        assert!(fall_only.includes(&fall));
        assert!(!fall_only.includes(&winter));
        assert!(Offering::from_seasons([Season::Winter]).includes(&Term::fall_winter(2025)));
        assert!(Offering::EverySeason.includes(&winter));
        assert!(!Offering::never().includes(&fall));
        assert!(!Offering::never().is_ever_offered());
    }

    #[test]
    fn test_offering_from_raw_names() {
        assert_eq!(Offering::from(Vec::<String>::new()), Offering::EverySeason);
        assert_eq!(
            Offering::from(vec!["fall".to_string(), "WINTER".to_string()]),
            Offering::from_seasons([Season::Fall, Season::Winter])
        );
        assert_eq!(Offering::from(vec!["Spring".to_string()]), Offering::never());
        assert_eq!(Offering::from(Vec::<String>::from(Offering::never())), Offering::never());
    }

    #[test]
    fn test_deserialize_defaults() {
        let course: Course = serde_json::from_str(
            r#"{"code": "ENGR201", "prerequisites": [{"anyOf": ["ENGR101"]}]}"#,
        )
        .unwrap();
        assert!((course.credits - DEFAULT_COURSE_CREDITS).abs() < f32::EPSILON);
        assert_eq!(course.offered, Offering::EverySeason);
        assert_eq!(course.requisite_codes().collect::<Vec<_>>(), vec!["ENGR101"]);
    }
}
