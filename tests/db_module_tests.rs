//! Tests for database module exports and the global repository singleton.

mod support;

use lsm_rust::api::SuggestPolicy;
use lsm_rust::db::{self, services};
use lsm_rust::db::models::{ClassFilter, PageRequest};
use lsm_rust::engine::policy::POLICY_FILE_ENV;

use support::with_env_var;

#[test]
fn test_db_module_has_service_functions() {
    // Naming each export as a fn item fails the build if a signature
    // disappears or changes shape.
    let _: fn() = || {
        let _ = db::health_check::<db::repositories::LocalRepository>;
        let _ = db::check_and_suggest::<db::repositories::LocalRepository>;
        let _ = db::create_class::<db::repositories::LocalRepository>;
        let _ = db::get_class::<db::repositories::LocalRepository>;
        let _ = db::update_class::<db::repositories::LocalRepository>;
        let _ = db::change_class_status::<db::repositories::LocalRepository>;
        let _ = db::list_classes::<db::repositories::LocalRepository>;
        let _ = db::weekly_schedule::<db::repositories::LocalRepository>;
        let _ = db::list_rooms::<db::repositories::LocalRepository>;
        let _ = db::list_lecturers::<db::repositories::LocalRepository>;
        let _ = db::list_courses::<db::repositories::LocalRepository>;
    };
}

#[test]
fn test_db_module_exports_repository_types() {
    // Compile-time check that the repository pattern surface is public
    use lsm_rust::db::{
        CatalogRepository, ClassRepository, FullRepository, RepositoryError, ScheduleRepository,
    };

    let _: Option<&dyn FullRepository> = None;
    let _: Option<&dyn ClassRepository> = None;
    let _: Option<&dyn ScheduleRepository> = None;
    let _: Option<&dyn CatalogRepository> = None;
    let _: Option<RepositoryError> = None;
}

#[tokio::test]
async fn test_global_repository_initializes_once() {
    // Initialize with the policy override unset, so the policy tests in
    // this binary cannot leak their file into the singleton.
    with_env_var(POLICY_FILE_ENV, None, || {
        db::init_repository().unwrap();
        // A second call is a no-op and must not replace the instance.
        db::init_repository().unwrap();
    });

    let first = db::get_repository().unwrap();
    let second = db::get_repository().unwrap();
    assert!(std::sync::Arc::ptr_eq(first, second));
}

#[tokio::test]
async fn test_global_repository_carries_demo_roster() {
    let repo = with_env_var(POLICY_FILE_ENV, None, || db::get_repository().unwrap());

    let rooms = services::list_rooms(repo.as_ref()).await.unwrap();
    assert_eq!(rooms.len(), 5);

    let classes = services::list_classes(
        repo.as_ref(),
        &ClassFilter::default(),
        &PageRequest::default(),
    )
    .await
    .unwrap();
    assert_eq!(classes.total, 3);

    let token = services::roster_token(repo.as_ref()).await.unwrap();
    assert_eq!(token.len(), 64);
}

// ==================== Policy loading ====================

#[test]
fn test_policy_env_unset_uses_defaults() {
    let policy = with_env_var(POLICY_FILE_ENV, None, || SuggestPolicy::from_env().unwrap());
    assert_eq!(policy, SuggestPolicy::default());
}

#[test]
fn test_policy_loads_file_named_by_env() {
    let path = std::env::temp_dir().join(format!("lsm-policy-{}.toml", std::process::id()));
    std::fs::write(&path, "max_suggestions = 2\nroom_penalty = 99.5\n").unwrap();

    let policy = with_env_var(POLICY_FILE_ENV, Some(path.to_str().unwrap()), || {
        SuggestPolicy::from_env().unwrap()
    });
    std::fs::remove_file(&path).ok();

    assert_eq!(policy.max_suggestions, 2);
    assert_eq!(policy.room_penalty, 99.5);
    // Unnamed fields keep their defaults.
    assert_eq!(policy.pattern_weight, 40.0);
    assert_eq!(policy.time_offsets_minutes, vec![-30, 30, -60, 60]);
}

#[test]
fn test_policy_missing_file_is_an_error() {
    let result = with_env_var(POLICY_FILE_ENV, Some("/nonexistent/policy.toml"), || {
        SuggestPolicy::from_env()
    });
    assert!(result.is_err());
}
