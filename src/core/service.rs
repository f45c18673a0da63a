//! Request flows on top of a [`PlannerStore`]
//!
//! Each entry point loads the requested timeline, checks that it belongs to
//! the requester, resolves the student, degree and catalog, and then runs the
//! pure engine over the loaded data. Lookup failures propagate unchanged.

use crate::core::audit::{check_requisites, AuditConfig, AuditEngine, AuditReport, RequisiteIssue};
use crate::core::error::{Entity, PlannerError, Result};
use crate::core::models::{Catalog, Degree, Student, StudentProgress, Timeline};
use crate::core::optimizer::{GraduationPathOptimizer, OptimizerConfig, OptimizerResult};
use crate::core::store::PlannerStore;
use crate::{debug, info};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

/// Everything loaded for one request
#[derive(Debug, Clone)]
pub struct PlanningContext {
    /// Timeline owner
    pub student: Student,
    /// Student's degree with its requirement categories
    pub degree: Degree,
    /// The requested timeline
    pub timeline: Timeline,
    /// Courses reachable from the degree and the timeline
    pub catalog: Catalog,
    /// Course statuses derived from the timeline
    pub progress: StudentProgress,
}

/// Findings of a timeline consistency check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckReport {
    /// Timeline that was checked
    pub timeline_id: String,
    /// Requisite groups not satisfied by the timeline
    pub requisite_issues: Vec<RequisiteIssue>,
    /// Requisite references to courses missing from the catalog
    pub unknown_references: Vec<String>,
}

impl CheckReport {
    /// Whether nothing was found
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.requisite_issues.is_empty() && self.unknown_references.is_empty()
    }
}

/// Entry points used by the CLI and embedding hosts
pub struct PlanningService<'s, S: PlannerStore + ?Sized> {
    store: &'s S,
    audit: AuditConfig,
    optimizer: OptimizerConfig,
}

impl<'s, S: PlannerStore + ?Sized> PlanningService<'s, S> {
    /// Create a service with default engine settings
    pub fn new(store: &'s S) -> Self {
        Self {
            store,
            audit: AuditConfig::default(),
            optimizer: OptimizerConfig::default(),
        }
    }

    /// Override the audit settings
    #[must_use]
    pub const fn with_audit_config(mut self, config: AuditConfig) -> Self {
        self.audit = config;
        self
    }

    /// Override the optimizer settings
    #[must_use]
    pub const fn with_optimizer_config(mut self, config: OptimizerConfig) -> Self {
        self.optimizer = config;
        self
    }

    /// Load and validate everything a request needs.
    ///
    /// # Arguments
    /// * `timeline_id` - Timeline to load
    /// * `requester` - User making the request; must own the timeline
    /// * `today` - Date deciding which terms are finished or in progress
    ///
    /// # Errors
    /// `NotFound` for a missing timeline, student or degree,
    /// `Authorization` when the requester does not own the timeline,
    /// `Configuration` for an invalid degree and `InvalidTimeline` for a
    /// malformed timeline. Store failures propagate as-is.
    pub fn load(&self, timeline_id: &str, requester: &str, today: NaiveDate) -> Result<PlanningContext> {
        let timeline = self.store.timeline(timeline_id)?;
        if timeline.owner_id != requester {
            return Err(PlannerError::Authorization {
                timeline_id: timeline_id.to_string(),
                requester: requester.to_string(),
            });
        }

        let student = self.store.student(&timeline.owner_id)?;
        let mut degree = self.store.degree(&student.degree_id)?;
        degree.requirements = self.store.requirements(&degree.id)?;
        degree.validate()?;
        timeline.validate()?;

        let catalog = assemble_catalog(self.store, &degree, &timeline)?;
        let progress = StudentProgress::derive(&timeline, &catalog, today);
        debug!(
            "Loaded timeline {} for {}: {} term(s), {} catalog course(s)",
            timeline.id,
            student.id,
            timeline.semesters.len(),
            catalog.len()
        );

        Ok(PlanningContext {
            student,
            degree,
            timeline,
            catalog,
            progress,
        })
    }

    /// Audit a timeline.
    ///
    /// # Errors
    /// See [`PlanningService::load`].
    pub fn audit(&self, timeline_id: &str, requester: &str, today: NaiveDate) -> Result<AuditReport> {
        let ctx = self.load(timeline_id, requester, today)?;
        Ok(self.audit_context(&ctx, &ctx.progress, today))
    }

    /// Extend a timeline with the remaining degree courses.
    ///
    /// # Errors
    /// See [`PlanningService::load`].
    pub fn optimize(
        &self,
        timeline_id: &str,
        requester: &str,
        today: NaiveDate,
    ) -> Result<OptimizerResult> {
        let ctx = self.load(timeline_id, requester, today)?;
        Ok(self.optimize_context(&ctx))
    }

    /// Optimize a timeline and audit the projected result.
    ///
    /// # Errors
    /// See [`PlanningService::load`].
    pub fn optimize_and_audit(
        &self,
        timeline_id: &str,
        requester: &str,
        today: NaiveDate,
    ) -> Result<(OptimizerResult, AuditReport)> {
        let ctx = self.load(timeline_id, requester, today)?;
        let plan = self.optimize_context(&ctx);
        let projected = self.audit_context(&ctx, &plan.projected_progress(), today);
        Ok((plan, projected))
    }

    /// Check requisite ordering and catalog references of a timeline.
    ///
    /// # Errors
    /// See [`PlanningService::load`].
    pub fn check(&self, timeline_id: &str, requester: &str, today: NaiveDate) -> Result<CheckReport> {
        let ctx = self.load(timeline_id, requester, today)?;
        let requisite_issues = check_requisites(&ctx.catalog, &ctx.progress);
        let unknown_references = ctx.catalog.validate_references().err().unwrap_or_default();
        info!(
            "Checked timeline {}: {} requisite issue(s), {} unknown reference(s)",
            ctx.timeline.id,
            requisite_issues.len(),
            unknown_references.len()
        );
        Ok(CheckReport {
            timeline_id: ctx.timeline.id,
            requisite_issues,
            unknown_references,
        })
    }

    /// Audit already loaded data against the given progress
    #[must_use]
    pub fn audit_context(
        &self,
        ctx: &PlanningContext,
        progress: &StudentProgress,
        today: NaiveDate,
    ) -> AuditReport {
        AuditEngine::new(self.audit).audit(&ctx.student, &ctx.degree, &ctx.catalog, progress, today)
    }

    /// Optimize already loaded data
    #[must_use]
    pub fn optimize_context(&self, ctx: &PlanningContext) -> OptimizerResult {
        GraduationPathOptimizer::new(self.optimizer).optimize(
            &ctx.degree.requirements,
            &ctx.catalog,
            &ctx.progress,
        )
    }
}

/// Resolve every course a request can touch.
///
/// Starts from the degree's categories, then the timeline's terms,
/// deficiencies and exemptions, and follows requisite groups transitively.
/// Courses the store does not know are left out of the catalog; any other
/// store failure is returned.
///
/// # Errors
/// Propagates store errors other than a course `NotFound`.
pub fn assemble_catalog<S: PlannerStore + ?Sized>(
    store: &S,
    degree: &Degree,
    timeline: &Timeline,
) -> Result<Catalog> {
    let roots = degree
        .requirements
        .iter()
        .flat_map(|c| c.courses.iter())
        .chain(timeline.semesters.iter().flat_map(|s| s.courses.iter()))
        .chain(timeline.deficiencies.iter())
        .chain(timeline.exemptions.iter());

    let mut seen: HashSet<String> = HashSet::new();
    let mut queue: VecDeque<String> = VecDeque::new();
    for code in roots {
        if seen.insert(code.clone()) {
            queue.push_back(code.clone());
        }
    }

    let mut catalog = Catalog::new();
    while let Some(code) = queue.pop_front() {
        match store.course(&code) {
            Ok(course) => {
                for requisite in course.requisite_codes() {
                    if seen.insert(requisite.to_string()) {
                        queue.push_back(requisite.to_string());
                    }
                }
                catalog.insert(course);
            }
            Err(err) if err.is_not_found(Entity::Course) => {
                debug!("Course {code} is not in the catalog");
            }
            Err(err) => return Err(err),
        }
    }
    Ok(catalog)
}
