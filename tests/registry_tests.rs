use std::io;

use tasklet::error::{StorageError, TaskError};
use tasklet::registry::TaskRegistry;
use tasklet::storage::{FileStorage, MemoryStorage, Storage, TaskStore};

fn registry() -> TaskRegistry {
    TaskRegistry::open(TaskStore::in_memory("todos"))
}

/// Reads the store the way a fresh page load would.
fn reloaded(reg: &TaskRegistry) -> Vec<(u64, String, String, bool)> {
    reg.store()
        .load()
        .into_iter()
        .map(|t| (t.id, t.text, t.date, t.completed))
        .collect()
}

fn snapshot(reg: &TaskRegistry) -> Vec<(u64, String, String, bool)> {
    reg.list()
        .iter()
        .cloned()
        .map(|t| (t.id, t.text, t.date, t.completed))
        .collect()
}

#[test]
fn test_add_appends_in_order() {
    let mut reg = registry();
    let a = reg.add("First", "").unwrap();
    let b = reg.add("Second", "2024-02-02").unwrap();

    assert!(b.id > a.id);
    let texts: Vec<&str> = reg.list().iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, vec!["First", "Second"]);
    assert_eq!(snapshot(&reg), reloaded(&reg));
}

#[test]
fn test_add_rejects_blank_text() {
    let mut reg = registry();
    reg.add("Existing", "").unwrap();
    let before = reloaded(&reg);

    assert!(matches!(reg.add("", "2024-01-01"), Err(TaskError::EmptyText)));
    assert!(matches!(reg.add("   ", "2024-01-01"), Err(TaskError::EmptyText)));

    assert_eq!(reg.len(), 1);
    assert_eq!(reloaded(&reg), before);
}

#[test]
fn test_add_keeps_text_and_date_verbatim() {
    let mut reg = registry();
    let t = reg.add("  padded  ", "next friday").unwrap();
    assert_eq!(t.text, "  padded  ");
    assert_eq!(t.date, "next friday");
    assert!(!t.completed);
}

#[test]
fn test_ids_unique_when_added_quickly() {
    let mut reg = registry();
    for i in 0..50 {
        reg.add(&format!("task {}", i), "").unwrap();
    }
    let mut ids: Vec<u64> = reg.list().iter().map(|t| t.id).collect();
    let sorted = ids.clone();
    ids.dedup();
    assert_eq!(ids.len(), 50);
    assert!(sorted.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_toggle_twice_persists_each_step() {
    let mut reg = registry();
    let id = reg.add("Flip", "").unwrap().id;

    assert_eq!(reg.toggle_completed(id).unwrap(), Some(true));
    assert!(reg.store().load()[0].completed);

    assert_eq!(reg.toggle_completed(id).unwrap(), Some(false));
    assert!(!reg.store().load()[0].completed);
}

#[test]
fn test_missing_targets_are_noops() {
    let mut reg = registry();
    reg.add("Only", "").unwrap();
    let before = reloaded(&reg);

    assert!(!reg.remove(1).unwrap());
    assert_eq!(reg.toggle_completed(1).unwrap(), None);
    assert_eq!(reloaded(&reg), before);
}

#[test]
fn test_remove_and_clear() {
    let mut reg = registry();
    let a = reg.add("A", "").unwrap();
    reg.add("B", "").unwrap();

    assert!(reg.remove(a.id).unwrap());
    assert_eq!(reg.len(), 1);
    assert!(reg.get(a.id).is_none());
    assert_eq!(snapshot(&reg), reloaded(&reg));

    reg.clear().unwrap();
    assert!(reg.is_empty());
    assert!(reloaded(&reg).is_empty());
}

#[test]
fn test_mixed_sequence_matches_store() {
    let mut reg = registry();
    let a = reg.add("A", "").unwrap().id;
    let b = reg.add("B", "2024-03-03").unwrap().id;
    reg.toggle_completed(a).unwrap();
    let c = reg.add("C", "").unwrap().id;
    reg.remove(b).unwrap();
    reg.toggle_completed(c).unwrap();
    reg.toggle_completed(c).unwrap();

    assert_eq!(snapshot(&reg), reloaded(&reg));

    reg.reload();
    let ids: Vec<u64> = reg.list().iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![a, c]);
}

#[test]
fn test_file_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("storage.json");

    let id = {
        let store = TaskStore::new(Box::new(FileStorage::open(&path).unwrap()), "todos");
        let mut reg = TaskRegistry::open(store);
        reg.add("Buy milk", "2024-01-01").unwrap().id
    };

    let store = TaskStore::new(Box::new(FileStorage::open(&path).unwrap()), "todos");
    let reg = TaskRegistry::open(store);
    assert_eq!(reg.len(), 1);
    let t = reg.get(id).unwrap();
    assert_eq!(t.text, "Buy milk");
    assert_eq!(t.date, "2024-01-01");
    assert!(!t.completed);
}

#[test]
fn test_corrupt_store_rehydrates_empty() {
    let mut store = TaskStore::in_memory("todos");
    store.backend_mut().set_item("todos", "{not json").unwrap();

    let mut reg = TaskRegistry::open(store);
    assert!(reg.is_empty());

    reg.add("Fresh start", "").unwrap();
    assert_eq!(reg.store().load().len(), 1);
}

#[test]
fn test_wrong_shape_rehydrates_empty() {
    let mut store = TaskStore::in_memory("todos");
    store.backend_mut().set_item("todos", r#"{"id": 1}"#).unwrap();
    assert!(store.load().is_empty());
}

/// Serves a fixed value and refuses every write.
struct ReadOnlyStorage {
    inner: MemoryStorage,
}

impl Storage for ReadOnlyStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get_item(key)
    }

    fn set_item(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "read only").into())
    }

    fn remove_item(&mut self, _key: &str) -> Result<(), StorageError> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "read only").into())
    }
}

fn read_only_registry() -> TaskRegistry {
    let mut inner = MemoryStorage::new();
    inner
        .set_item(
            "todos",
            r#"[{"id": 1, "text": "A", "date": "", "completed": false},
                {"id": 2, "text": "B", "date": "2024-01-01", "completed": false}]"#,
        )
        .unwrap();
    TaskRegistry::open(TaskStore::new(Box::new(ReadOnlyStorage { inner }), "todos"))
}

#[test]
fn test_failed_save_leaves_registry_matching_store() {
    let mut reg = read_only_registry();
    assert_eq!(reg.len(), 2);

    assert!(matches!(reg.toggle_completed(1), Err(TaskError::Storage(_))));
    assert!(!reg.get(1).unwrap().completed);
    assert_eq!(snapshot(&reg), reloaded(&reg));

    assert!(matches!(reg.remove(2), Err(TaskError::Storage(_))));
    assert_eq!(reg.len(), 2);
    assert_eq!(snapshot(&reg), reloaded(&reg));

    assert!(matches!(reg.add("C", ""), Err(TaskError::Storage(_))));
    assert!(matches!(reg.clear(), Err(TaskError::Storage(_))));
    assert_eq!(snapshot(&reg), reloaded(&reg));
}
