//! Data models for the audit and planning engine

pub mod catalog;
pub mod course;
pub mod degree;
pub mod requirement;
pub mod student;
pub mod term;
pub mod timeline;

pub use catalog::Catalog;
pub use course::{normalize_code, Course, Offering, RequisiteGroup, DEFAULT_COURSE_CREDITS};
pub use degree::{degree_course_codes, Degree, DEFAULT_TOTAL_CREDITS};
pub use requirement::{RequirementCategory, DEFICIENCY_CATEGORY_ID, EXEMPTION_CATEGORY_ID};
pub use student::Student;
pub use term::{parse_term, season_date_range, DateRange, Season, Term};
pub use timeline::{CourseStatus, Semester, StatusKind, StatusMap, StudentProgress, Timeline};
