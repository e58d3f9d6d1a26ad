use super::*;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("session-client-{}-{name}.json", std::process::id()))
}

// =============================================================================
// MemoryStore
// =============================================================================

#[test]
fn memory_store_starts_empty() {
    let store = MemoryStore::new();
    assert!(store.is_empty());
    assert_eq!(store.get_item("k"), None);
}

#[test]
fn memory_store_set_get_remove() {
    let store = MemoryStore::new();
    store.set_item("k", "v").unwrap();
    assert_eq!(store.get_item("k").as_deref(), Some("v"));
    assert_eq!(store.len(), 1);

    store.set_item("k", "w").unwrap();
    assert_eq!(store.get_item("k").as_deref(), Some("w"));

    store.remove_item("k").unwrap();
    assert_eq!(store.get_item("k"), None);
}

#[test]
fn memory_store_remove_missing_is_ok() {
    let store = MemoryStore::new();
    assert!(store.remove_item("never").is_ok());
}

// =============================================================================
// FileStore
// =============================================================================

#[test]
fn file_store_missing_file_reads_empty() {
    let store = FileStore::new(temp_path("missing"));
    assert_eq!(store.get_item("k"), None);
}

#[test]
fn file_store_persists_across_instances() {
    let path = temp_path("persist");
    FileStore::new(&path).set_item("app.auth.token", "abc").unwrap();

    let reopened = FileStore::new(&path);
    assert_eq!(reopened.get_item("app.auth.token").as_deref(), Some("abc"));

    reopened.remove_item("app.auth.token").unwrap();
    assert_eq!(FileStore::new(&path).get_item("app.auth.token"), None);

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn file_store_keys_are_independent() {
    let path = temp_path("independent");
    let store = FileStore::new(&path);
    store.set_item("a", "1").unwrap();
    store.set_item("b", "2").unwrap();
    store.remove_item("a").unwrap();

    assert_eq!(store.get_item("a"), None);
    assert_eq!(store.get_item("b").as_deref(), Some("2"));

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn file_store_corrupt_file_reads_empty() {
    let path = temp_path("corrupt");
    std::fs::write(&path, "not json").unwrap();

    let store = FileStore::new(&path);
    assert_eq!(store.get_item("k"), None);

    store.set_item("k", "v").unwrap();
    assert_eq!(store.get_item("k").as_deref(), Some("v"));

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn file_store_creates_parent_directories() {
    let dir = std::env::temp_dir().join(format!("session-client-{}-nested", std::process::id()));
    let path = dir.join("deeper").join("session.json");
    let store = FileStore::new(&path);
    store.set_item("k", "v").unwrap();
    assert!(path.exists());

    std::fs::remove_dir_all(&dir).unwrap();
}
