//! Advisory notices attached to an audit

use super::requirements::{CategoryKind, RequirementResult, RequirementStatus};
use serde::{Deserialize, Serialize};

/// Percentage at which the success notice is emitted
pub const SUCCESS_THRESHOLD: u8 = 75;

/// Percentage at which the halfway notice is emitted
pub const HALFWAY_THRESHOLD: u8 = 50;

/// Severity of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    /// Something needs attention
    Warning,
    /// Informational
    Info,
    /// Positive milestone
    Success,
}

/// A human-readable advisory notice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// Stable identifier within one report (`notice-1`, `notice-2`, ...)
    pub id: String,

    /// Severity
    #[serde(rename = "type")]
    pub kind: NoticeKind,

    /// Message text
    pub message: String,
}

/// Format a credit amount, dropping the fraction when it is whole
#[must_use]
pub fn format_credits(credits: f32) -> String {
    let rounded = (credits * 100.0).round() / 100.0;
    format!("{rounded}")
}

/// Build notices for evaluated requirements.
///
/// `results` must be in degree order (before the status sort) so the
/// notice order follows the degree's category order. Category rules run one
/// after another across all catalog pools, followed by the progress
/// milestone and the deficiency reminder.
#[must_use]
pub fn generate_notices(results: &[RequirementResult], percentage: u8) -> Vec<Notice> {
    let mut pending: Vec<(NoticeKind, String)> = Vec::new();
    let pools: Vec<&RequirementResult> = results
        .iter()
        .filter(|r| r.kind == CategoryKind::Pool)
        .collect();

    for result in &pools {
        if result.status == RequirementStatus::NotStarted && result.credits_total > 0.0 {
            pending.push((
                NoticeKind::Warning,
                format!(
                    "{} requirements not yet started ({} credits needed)",
                    result.title,
                    format_credits(result.credits_total)
                ),
            ));
        }
    }

    for result in &pools {
        let missing = result.credits_missing();
        if missing > 0.0
            && result.status != RequirementStatus::NotStarted
            && !result.has_courses_in_progress()
        {
            pending.push((
                NoticeKind::Warning,
                format!(
                    "{} credits remaining in {} requirements",
                    format_credits(missing),
                    result.title
                ),
            ));
        }
    }

    for result in &pools {
        let capstone = result.title.to_lowercase().contains("capstone");
        if capstone
            && !matches!(
                result.status,
                RequirementStatus::Complete | RequirementStatus::InProgress
            )
        {
            pending.push((
                NoticeKind::Warning,
                "Capstone project must be completed before graduation".to_string(),
            ));
        }
    }

    if percentage >= SUCCESS_THRESHOLD {
        pending.push((
            NoticeKind::Success,
            format!("Great progress! You have completed {percentage}% of your degree requirements"),
        ));
    } else if percentage >= HALFWAY_THRESHOLD {
        pending.push((
            NoticeKind::Info,
            format!("You are more than halfway to your degree ({percentage}% complete)"),
        ));
    }

    for result in results.iter().filter(|r| r.kind == CategoryKind::Deficiency) {
        let outstanding = result.credits_missing();
        if outstanding > 0.0 {
            pending.push((
                NoticeKind::Warning,
                format!(
                    "{} credits of deficiency courses still outstanding",
                    format_credits(outstanding)
                ),
            ));
        }
    }

    pending
        .into_iter()
        .enumerate()
        .map(|(i, (kind, message))| Notice {
            id: format!("notice-{}", i + 1),
            kind,
            message,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(title: &str, status: RequirementStatus, completed: f32, total: f32) -> RequirementResult {
        RequirementResult {
            id: title.to_lowercase(),
            title: title.to_string(),
            kind: CategoryKind::Pool,
            status,
            credits_completed: completed,
            credits_in_progress: 0.0,
            credits_total: total,
            courses: Vec::new(),
        }
    }

    #[test]
    fn test_format_credits() {
        assert_eq!(format_credits(6.0), "6");
        assert_eq!(format_credits(4.5), "4.5");
        assert_eq!(format_credits(0.0), "0");
    }

    #[test]
    fn test_not_started_and_remaining() {
        let results = vec![
            pool("Core", RequirementStatus::NotStarted, 0.0, 9.0),
            pool("Electives", RequirementStatus::Incomplete, 3.0, 12.0),
        ];
        let notices = generate_notices(&results, 10);
        assert_eq!(notices.len(), 2);
        assert_eq!(notices[0].id, "notice-1");
        assert_eq!(notices[0].message, "Core requirements not yet started (9 credits needed)");
        assert_eq!(notices[1].message, "9 credits remaining in Electives requirements");
        assert!(notices.iter().all(|n| n.kind == NoticeKind::Warning));
    }

    #[test]
    fn test_capstone_notice() {
        let results = vec![pool("Capstone Project", RequirementStatus::Incomplete, 3.0, 6.0)];
        let notices = generate_notices(&results, 0);
        assert!(notices
            .iter()
            .any(|n| n.message == "Capstone project must be completed before graduation"));

        let done = vec![pool("Capstone Project", RequirementStatus::Complete, 6.0, 6.0)];
        assert!(generate_notices(&done, 0).is_empty());
    }

    #[test]
    fn test_milestones_are_exclusive() {
        let success = generate_notices(&[], 80);
        assert_eq!(success.len(), 1);
        assert_eq!(success[0].kind, NoticeKind::Success);

        let info = generate_notices(&[], 50);
        assert_eq!(info.len(), 1);
        assert_eq!(info[0].kind, NoticeKind::Info);

        assert!(generate_notices(&[], 49).is_empty());
    }

    #[test]
    fn test_deficiency_notice() {
        let mut deficiency = pool("Deficiencies", RequirementStatus::Incomplete, 3.0, 9.0);
        deficiency.kind = CategoryKind::Deficiency;
        let notices = generate_notices(&[deficiency], 0);
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].message, "6 credits of deficiency courses still outstanding");
    }

    #[test]
    fn test_notice_serializes_type_field() {
        let notice = Notice {
            id: "notice-1".to_string(),
            kind: NoticeKind::Info,
            message: "hi".to_string(),
        };
        let json = serde_json::to_string(&notice).unwrap();
        assert_eq!(json, r#"{"id":"notice-1","type":"info","message":"hi"}"#);
    }
}
