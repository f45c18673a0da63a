//! Report generation for audits and graduation plans
//!
//! Results can be written as JSON (the camelCase output contracts) or as
//! Markdown rendered from askama templates.

pub mod formats;

use crate::core::audit::AuditReport;
use crate::core::models::Catalog;
use crate::core::optimizer::OptimizerResult;
use std::error::Error;
use std::fs;
use std::path::Path;

pub use formats::{JsonReporter, MarkdownReporter, ReportFormat};

/// Data a report is rendered from
#[derive(Debug, Clone, Copy)]
pub enum ReportContext<'a> {
    /// A degree audit
    Audit(&'a AuditReport),
    /// An optimized timeline
    Plan {
        /// Optimizer output
        plan: &'a OptimizerResult,
        /// Catalog used for course titles and credits
        catalog: &'a Catalog,
        /// Audit of the projected progress, when requested
        projected: Option<&'a AuditReport>,
    },
}

/// Trait for report generators
pub trait ReportGenerator {
    /// Generate report content as a string
    ///
    /// # Errors
    /// Returns an error if report generation fails
    fn render(&self, ctx: &ReportContext) -> Result<String, Box<dyn Error>>;

    /// Generate a report to a file, creating parent directories as needed
    ///
    /// # Errors
    /// Returns an error if report generation or file writing fails
    fn generate(&self, ctx: &ReportContext, output_path: &Path) -> Result<(), Box<dyn Error>> {
        let report_content = self.render(ctx)?;
        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(output_path, report_content)?;
        Ok(())
    }
}

/// Reporter for a format
#[must_use]
pub fn reporter(format: ReportFormat) -> Box<dyn ReportGenerator> {
    match format {
        ReportFormat::Json => Box::new(JsonReporter::new()),
        ReportFormat::Markdown => Box::new(MarkdownReporter::new()),
    }
}
