//! End-to-end tests over the sample dataset

use chrono::NaiveDate;
use degree_planner::core::audit::{CategoryKind, NoticeKind, RequirementStatus};
use degree_planner::core::error::{Entity, PlannerError};
use degree_planner::core::models::{Season, StatusKind, Term};
use degree_planner::core::optimizer::OptimizerConfig;
use degree_planner::core::service::PlanningService;
use degree_planner::core::store::{Dataset, InMemoryStore, PlannerStore};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn sample_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("samples/dataset.json")
}

fn store() -> InMemoryStore {
    InMemoryStore::load(&sample_path()).expect("sample dataset should load")
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, 1).unwrap()
}

#[test]
fn test_sample_dataset_is_normalized() {
    let store = store();
    let timeline = store.timeline("t1").unwrap();
    assert_eq!(timeline.semesters[1].courses[0], "COMP249");
    assert_eq!(store.course("COMP249").unwrap().credits, 3.5);
    assert!(store.course("NOPE").unwrap_err().is_not_found(Entity::Course));
}

#[test]
fn test_audit_sample_timeline() {
    let store = store();
    let service = PlanningService::new(&store);

    let report = service.audit("t1", "s1", today()).expect("audit should succeed");

    assert_eq!(report.student.name, "Ada Lovelace");
    assert_eq!(report.student.degree, "Bachelor of Computer Science");
    assert!((report.progress.completed - 16.0).abs() < 1e-4);
    assert!((report.progress.in_progress - 4.5).abs() < 1e-4);
    assert!((report.progress.remaining - 19.5).abs() < 1e-4);
    assert_eq!(report.progress.percentage, 40);
    assert_eq!(
        report.estimated_graduation,
        Some(Term::new(Season::Summer, 2026))
    );

    let ids: Vec<&str> = report.requirements.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(
        ids,
        ["capstone", "core", "math", "deficiencies", "gened", "exemptions"]
    );
    let statuses: Vec<RequirementStatus> = report.requirements.iter().map(|r| r.status).collect();
    assert_eq!(
        statuses,
        [
            RequirementStatus::NotStarted,
            RequirementStatus::Incomplete,
            RequirementStatus::Incomplete,
            RequirementStatus::Incomplete,
            RequirementStatus::InProgress,
            RequirementStatus::Complete,
        ]
    );
    assert_eq!(report.requirements[5].kind, CategoryKind::Exemption);

    let messages: Vec<&str> = report.notices.iter().map(|n| n.message.as_str()).collect();
    assert_eq!(
        messages,
        [
            "Capstone Project requirements not yet started (4 credits needed)",
            "3 credits remaining in Mathematics requirements",
            "Capstone project must be completed before graduation",
            "3 credits of deficiency courses still outstanding",
        ]
    );
    assert!(report.notices.iter().all(|n| n.kind == NoticeKind::Warning));
    assert_eq!(report.notices[3].id, "notice-4");
}

#[test]
fn test_optimize_sample_timeline() {
    let store = store();
    let service = PlanningService::new(&store);

    let plan = service.optimize("t1", "s1", today()).expect("optimize should succeed");

    assert!(plan.is_complete());
    assert_eq!(plan.placed_count, 4);
    assert_eq!(plan.new_semester_count, 2);
    assert_eq!(plan.semesters.len(), 5);
    let new_terms = plan.new_semesters();
    assert_eq!(new_terms[0].term, Term::new(Season::Winter, 2026));
    assert_eq!(new_terms[0].courses, ["COMP346", "COMP228", "MATH205"]);
    assert_eq!(new_terms[1].term, Term::new(Season::Fall, 2026));
    assert_eq!(new_terms[1].courses, ["SOEN490"]);
    assert_eq!(plan.estimated_graduation, Some(Term::new(Season::Fall, 2026)));
    // deficiencies are audited but never scheduled
    assert_eq!(plan.courses["MATH201"].status, StatusKind::Incomplete);
}

#[test]
fn test_optimize_respects_configured_cap() {
    let store = store();
    let service =
        PlanningService::new(&store).with_optimizer_config(OptimizerConfig::new(7.0, 24));

    let plan = service.optimize("t1", "s1", today()).unwrap();

    assert_eq!(plan.new_semesters()[0].courses, ["COMP346", "COMP228"]);
    assert!(plan.is_complete());
}

#[test]
fn test_optimize_and_audit_projects_plan() {
    let store = store();
    let service = PlanningService::new(&store);

    let (plan, projected) = service.optimize_and_audit("t1", "s1", today()).unwrap();

    assert_eq!(plan.placed_count, 4);
    let capstone = projected
        .requirements
        .iter()
        .find(|r| r.id == "capstone")
        .unwrap();
    assert_eq!(capstone.courses[0].term, Some(Term::new(Season::Fall, 2026)));
    // planned courses do not count as completed
    assert_eq!(projected.progress.percentage, 40);
}

#[test]
fn test_check_reports_requisite_order() {
    let store = store();
    let service = PlanningService::new(&store);

    assert!(service.check("t1", "s1", today()).unwrap().is_clean());

    let report = service.check("t3", "s1", today()).unwrap();
    assert!(!report.is_clean());
    assert_eq!(report.requisite_issues.len(), 1);
    assert_eq!(
        report.requisite_issues[0].to_string(),
        "SOEN490 (Winter 2026): missing prerequisite, one of [COMP346]"
    );
}

#[test]
fn test_foreign_timeline_is_rejected() {
    let store = store();
    let service = PlanningService::new(&store);

    let err = service.audit("t1", "s2", today()).unwrap_err();
    assert!(matches!(err, PlannerError::Authorization { .. }));
}

#[test]
fn test_unknown_timeline_is_not_found() {
    let store = store();
    let service = PlanningService::new(&store);

    let err = service.optimize("missing", "s1", today()).unwrap_err();
    assert!(err.is_not_found(Entity::Timeline));
}

#[test]
fn test_empty_timeline_cannot_be_extended() {
    let store = store();
    let service = PlanningService::new(&store);

    let plan = service.optimize("t2", "s2", today()).unwrap();
    assert_eq!(plan.placed_count, 0);
    assert_eq!(plan.unplaced_count, 11);
}

#[test]
fn test_dataset_round_trip_through_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("copy.json");
    let dataset = store().dataset().clone();
    fs::write(&path, dataset.to_json().unwrap()).unwrap();

    let reloaded = InMemoryStore::load(&path).unwrap();
    assert_eq!(reloaded.dataset(), &dataset);
}

#[test]
fn test_malformed_dataset_is_reported() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("broken.json");
    fs::write(
        &path,
        r#"{"timelines": [{"id": "t", "ownerId": "s", "semesters": [{"term": "Spring 2025"}]}]}"#,
    )
    .unwrap();

    assert!(matches!(
        InMemoryStore::load(&path),
        Err(PlannerError::Json(_))
    ));
    assert!(matches!(
        InMemoryStore::load(&temp_dir.path().join("absent.json")),
        Err(PlannerError::Io(_))
    ));
    assert!(Dataset::from_json("{}").unwrap().courses.is_empty());
}
