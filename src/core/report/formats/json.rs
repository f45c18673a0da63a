//! JSON report generator

use crate::core::audit::AuditReport;
use crate::core::optimizer::OptimizerResult;
use crate::core::report::{ReportContext, ReportGenerator};
use serde::Serialize;
use std::error::Error;

/// Plan together with the audit of its projected progress
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PlanWithAudit<'a> {
    plan: &'a OptimizerResult,
    projected_audit: &'a AuditReport,
}

/// JSON report generator
#[derive(Debug, Clone, Copy)]
pub struct JsonReporter {
    pretty: bool,
}

impl JsonReporter {
    /// Create a reporter producing indented output
    #[must_use]
    pub const fn new() -> Self {
        Self { pretty: true }
    }

    /// Create a reporter producing single-line output
    #[must_use]
    pub const fn compact() -> Self {
        Self { pretty: false }
    }

    fn encode<T: Serialize>(&self, value: &T) -> serde_json::Result<String> {
        if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        }
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for JsonReporter {
    fn render(&self, ctx: &ReportContext) -> Result<String, Box<dyn Error>> {
        let json = match *ctx {
            ReportContext::Audit(report) => self.encode(report)?,
            ReportContext::Plan {
                plan,
                projected: None,
                ..
            } => self.encode(plan)?,
            ReportContext::Plan {
                plan,
                projected: Some(projected_audit),
                ..
            } => self.encode(&PlanWithAudit {
                plan,
                projected_audit,
            })?,
        };
        Ok(json)
    }
}
