use tasklet::commands::*;
use tasklet::config::{Config, DEFAULT_STORAGE_KEY};
use tasklet::error::TaskError;
use tasklet::models::Task;
use tasklet::storage::{FileStorage, TaskStore};
use std::env;
use std::path::PathBuf;
use std::sync::Mutex;

// Use a mutex to ensure tests run serially since they modify the environment variable
static TEST_MUTEX: Mutex<()> = Mutex::new(());

fn with_test_db<F>(f: F)
where
    F: FnOnce(PathBuf),
{
    let _guard = TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("storage.json");

    env::set_var("TASKLET_DB", &db_path);
    env::set_var("TASKLET_CONFIG", dir.path().join("missing.toml"));

    f(db_path);

    env::remove_var("TASKLET_DB");
    env::remove_var("TASKLET_CONFIG");
}

fn load_tasks(path: &PathBuf) -> Vec<Task> {
    let backend = FileStorage::open(path).unwrap();
    TaskStore::new(Box::new(backend), DEFAULT_STORAGE_KEY).load()
}

#[test]
fn test_add_and_reload() {
    with_test_db(|path| {
        cmd_add("Buy milk".into(), Some("2024-01-01".into()), true).unwrap();

        let tasks = load_tasks(&path);
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].text, "Buy milk");
        assert_eq!(tasks[0].date, "2024-01-01");
        assert!(!tasks[0].completed);
    });
}

#[test]
fn test_add_without_date_stores_empty_string() {
    with_test_db(|path| {
        cmd_add("Call mum".into(), None, true).unwrap();

        let tasks = load_tasks(&path);
        assert_eq!(tasks[0].date, "");
    });
}

#[test]
fn test_add_blank_is_rejected() {
    with_test_db(|path| {
        let err = cmd_add("   ".into(), Some("2024-01-01".into()), true).unwrap_err();
        assert!(matches!(err, TaskError::EmptyText));
        assert!(load_tasks(&path).is_empty());
    });
}

#[test]
fn test_toggle_task() {
    with_test_db(|path| {
        cmd_add("Task to complete".into(), None, true).unwrap();
        let id = load_tasks(&path)[0].id;

        cmd_toggle(id, true).unwrap();
        assert!(load_tasks(&path)[0].completed);

        cmd_toggle(id, true).unwrap();
        assert!(!load_tasks(&path)[0].completed);
    });
}

#[test]
fn test_remove_task() {
    with_test_db(|path| {
        cmd_add("One".into(), None, true).unwrap();
        cmd_add("Two".into(), None, true).unwrap();
        let tasks = load_tasks(&path);

        cmd_remove(tasks[0].id, true).unwrap();

        let tasks = load_tasks(&path);
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].text, "Two");
    });
}

#[test]
fn test_remove_missing_is_noop() {
    with_test_db(|path| {
        cmd_add("Keep me".into(), None, true).unwrap();
        let before = load_tasks(&path);

        cmd_remove(42, true).unwrap();
        cmd_toggle(42, true).unwrap();

        assert_eq!(load_tasks(&path), before);
    });
}

#[test]
fn test_clear_forced() {
    with_test_db(|path| {
        cmd_add("One".into(), None, true).unwrap();
        cmd_add("Two".into(), None, true).unwrap();

        cmd_clear(true, true).unwrap();

        assert!(load_tasks(&path).is_empty());
    });
}

#[test]
fn test_storage_path_honours_env() {
    with_test_db(|path| {
        assert_eq!(Config::default().storage_path(), path);
    });
}
