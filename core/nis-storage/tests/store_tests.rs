use nis_crypto::{generate_random_key, KdfParams};
use nis_storage::{EncryptedFileStore, FileStore, KeyValueStore, MemoryStore, StorageError};
use tempfile::TempDir;

fn fast_kdf() -> KdfParams {
    KdfParams::low_memory()
}

fn exercise(store: &dyn KeyValueStore) {
    assert_eq!(store.get("a").unwrap(), None);
    store.set("a", "1").unwrap();
    store.set("b", "2").unwrap();
    assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
    store.set("a", "3").unwrap();
    assert_eq!(store.get("a").unwrap().as_deref(), Some("3"));
    store.delete("a").unwrap();
    assert_eq!(store.get("a").unwrap(), None);
    // deleting a missing key is fine
    store.delete("a").unwrap();
    assert_eq!(store.get("b").unwrap().as_deref(), Some("2"));
}

// ── MemoryStore ──────────────────────────────────────────────────

#[test]
fn memory_store_semantics() {
    let store = MemoryStore::new();
    exercise(&store);
    assert_eq!(store.len(), 1);
}

// ── FileStore ────────────────────────────────────────────────────

#[test]
fn file_store_semantics() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::open(dir.path(), "com.example.app").unwrap();
    exercise(&store);
    assert_eq!(store.path(), dir.path().join("com.example.app.json"));
}

#[test]
fn file_store_persists_across_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let store = FileStore::open(dir.path(), "app").unwrap();
        store.set("topics", r#"["all","news"]"#).unwrap();
    }
    let store = FileStore::open(dir.path(), "app").unwrap();
    assert_eq!(store.get("topics").unwrap().as_deref(), Some(r#"["all","news"]"#));
}

#[test]
fn file_store_leaves_no_temp_file() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::open(dir.path(), "app").unwrap();
    store.set("k", "v").unwrap();
    let names: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(names, vec!["app.json".to_string()]);
}

#[test]
fn file_store_namespaces_are_independent() {
    let dir = TempDir::new().unwrap();
    let a = FileStore::open(dir.path(), "a").unwrap();
    let b = FileStore::open(dir.path(), "b").unwrap();
    a.set("k", "from-a").unwrap();
    assert_eq!(b.get("k").unwrap(), None);
}

#[test]
fn file_store_rejects_path_namespace() {
    let dir = TempDir::new().unwrap();
    for ns in ["", "..", "../escape", "a/b"] {
        assert!(matches!(
            FileStore::open(dir.path(), ns),
            Err(StorageError::InvalidData(_))
        ));
    }
}

#[test]
fn file_store_corrupt_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("app.json"), "{not json").unwrap();
    assert!(matches!(
        FileStore::open(dir.path(), "app"),
        Err(StorageError::Serialization(_))
    ));
}

#[test]
fn file_store_write_failure_keeps_previous_state() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::open(dir.path(), "app").unwrap();
    store.set("k", "old").unwrap();

    // Replace the directory with nothing writable: remove it entirely.
    let path = store.path().to_path_buf();
    std::fs::remove_file(&path).unwrap();
    std::fs::remove_dir(dir.path()).unwrap();

    assert!(store.set("k", "new").is_err());
    assert_eq!(store.get("k").unwrap().as_deref(), Some("old"));
}

// ── EncryptedFileStore ───────────────────────────────────────────

#[test]
fn encrypted_store_semantics() {
    let dir = TempDir::new().unwrap();
    let store = EncryptedFileStore::open(dir.path(), "app", generate_random_key()).unwrap();
    exercise(&store);
}

#[test]
fn encrypted_store_does_not_write_plaintext() {
    let dir = TempDir::new().unwrap();
    let store = EncryptedFileStore::open(dir.path(), "app", generate_random_key()).unwrap();
    store.set("identity", "secret-token-value").unwrap();
    let raw = std::fs::read_to_string(store.path()).unwrap();
    assert!(raw.contains("identity"));
    assert!(!raw.contains("secret-token-value"));
}

#[test]
fn encrypted_store_reopens_with_same_passphrase() {
    let dir = TempDir::new().unwrap();
    {
        let store = EncryptedFileStore::open_with_passphrase_and_params(
            dir.path(),
            "app",
            "hunter2",
            &fast_kdf(),
        )
        .unwrap();
        store.set("identity", "value").unwrap();
    }
    assert!(dir.path().join("app.salt").exists());

    let store =
        EncryptedFileStore::open_with_passphrase_and_params(dir.path(), "app", "hunter2", &fast_kdf())
            .unwrap();
    assert_eq!(store.get("identity").unwrap().as_deref(), Some("value"));
}

#[test]
fn encrypted_store_wrong_passphrase_fails_reads() {
    let dir = TempDir::new().unwrap();
    let store =
        EncryptedFileStore::open_with_passphrase_and_params(dir.path(), "app", "right", &fast_kdf())
            .unwrap();
    store.set("identity", "value").unwrap();
    drop(store);

    let store =
        EncryptedFileStore::open_with_passphrase_and_params(dir.path(), "app", "wrong", &fast_kdf())
            .unwrap();
    assert!(matches!(
        store.get("identity"),
        Err(StorageError::Encryption(_))
    ));
}

#[test]
fn encrypted_store_opens_with_encoded_key() {
    let dir = TempDir::new().unwrap();
    let encoded = generate_random_key().to_base64();
    {
        let store = EncryptedFileStore::open_with_encoded_key(dir.path(), "app", &encoded).unwrap();
        store.set("identity", "value").unwrap();
    }
    assert!(!dir.path().join("app.salt").exists());

    let store =
        EncryptedFileStore::open_with_encoded_key(dir.path(), "app", &format!("{encoded}\n"))
            .unwrap();
    assert_eq!(store.get("identity").unwrap().as_deref(), Some("value"));

    let other = generate_random_key().to_base64();
    let store = EncryptedFileStore::open_with_encoded_key(dir.path(), "app", &other).unwrap();
    assert!(matches!(store.get("identity"), Err(StorageError::Encryption(_))));
}

#[test]
fn encrypted_store_rejects_malformed_encoded_key() {
    let dir = TempDir::new().unwrap();
    for bad in ["not base64!", "c2hvcnQ="] {
        assert!(
            matches!(
                EncryptedFileStore::open_with_encoded_key(dir.path(), "app", bad),
                Err(StorageError::Encryption(_))
            ),
            "{bad:?}"
        );
    }
}

#[test]
fn encrypted_store_rejects_empty_passphrase() {
    let dir = TempDir::new().unwrap();
    assert!(matches!(
        EncryptedFileStore::open_with_passphrase_and_params(dir.path(), "app", "", &fast_kdf()),
        Err(StorageError::InvalidData(_))
    ));
}

#[test]
fn encrypted_store_detects_swapped_values() {
    let dir = TempDir::new().unwrap();
    let key = generate_random_key();
    let store = EncryptedFileStore::open(dir.path(), "app", key.clone()).unwrap();
    store.set("a", "value-a").unwrap();
    store.set("b", "value-b").unwrap();
    let path = store.path().to_path_buf();
    drop(store);

    let mut map: serde_json::Map<String, serde_json::Value> =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let a = map["a"].clone();
    map.insert("b".to_string(), a);
    std::fs::write(&path, serde_json::to_string(&map).unwrap()).unwrap();

    let store = EncryptedFileStore::open(dir.path(), "app", key).unwrap();
    assert_eq!(store.get("a").unwrap().as_deref(), Some("value-a"));
    assert!(store.get("b").is_err());
}

#[test]
fn encrypted_and_plain_stores_share_a_directory() {
    let dir = TempDir::new().unwrap();
    let plain = FileStore::open(dir.path(), "app").unwrap();
    let secure = EncryptedFileStore::open(dir.path(), "app", generate_random_key()).unwrap();
    plain.set("k", "plain").unwrap();
    secure.set("k", "secure").unwrap();
    assert_eq!(plain.get("k").unwrap().as_deref(), Some("plain"));
    assert_eq!(secure.get("k").unwrap().as_deref(), Some("secure"));
}
