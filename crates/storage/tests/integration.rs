//! Integration tests for the storage crate.
//!
//! Uses in-memory SQLite for fast, isolated tests.

use region_monitor_core::{
    KeyValueStore, NotificationContent, NotificationStore, NOTIFICATIONS_ENABLED_KEY,
    NOTIFICATIONS_KEY,
};
use region_monitor_storage::{Database, StorageError};
use serde_json::json;

fn create_test_db() -> Database {
    Database::open_in_memory().expect("Failed to create in-memory database")
}

// =============================================================================
// Database Initialization Tests
// =============================================================================

mod initialization {
    use super::*;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[test]
    fn test_open_in_memory() {
        let db = Database::open_in_memory();
        assert!(db.is_ok(), "Should create in-memory database");
    }

    #[test]
    fn test_open_file_database() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("region-monitor.db");

        let db = Database::open(&db_path);
        assert!(db.is_ok(), "Should create file-based database");
        assert!(db_path.exists(), "Database file should exist");
    }

    #[test]
    fn test_open_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("nested").join("data").join("region-monitor.db");

        Database::open(&db_path).unwrap();
        assert!(db_path.exists());
    }

    #[test]
    fn test_reopen_existing_database() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("region-monitor.db");

        {
            let db = Database::open(&db_path).unwrap();
            db.set("answer", json!(42)).unwrap();
        }

        {
            let db = Database::open(&db_path).unwrap();
            assert_eq!(db.get("answer").unwrap(), Some(json!(42)));
        }
    }

    #[test]
    fn test_invalid_path_fails() {
        let result = Database::open(&PathBuf::from("/dev/null/region-monitor.db"));
        assert!(result.is_err(), "Should fail with invalid path");
    }
}

// =============================================================================
// Key-Value Tests
// =============================================================================

mod key_value {
    use super::*;

    #[test]
    fn test_get_missing_key() {
        let db = create_test_db();
        assert_eq!(db.get("missing").unwrap(), None);
    }

    #[test]
    fn test_set_overwrites() {
        let db = create_test_db();

        db.set("flag", json!(true)).unwrap();
        db.set("flag", json!(false)).unwrap();

        assert_eq!(db.get("flag").unwrap(), Some(json!(false)));
    }

    #[test]
    fn test_nested_map_value() {
        let db = create_test_db();
        let value = json!({
            "home": {"title": "Home", "body": "Welcome back"},
            "office": {"title": "Office", "body": "Focus time"}
        });

        db.set(NOTIFICATIONS_KEY, value.clone()).unwrap();
        assert_eq!(db.get(NOTIFICATIONS_KEY).unwrap(), Some(value));
    }

    #[test]
    fn test_unicode_values() {
        let db = create_test_db();
        db.set("title", json!("📍 Region Alert · 日本語")).unwrap();

        assert_eq!(
            db.get("title").unwrap(),
            Some(json!("📍 Region Alert · 日本語"))
        );
    }
}

// =============================================================================
// Notification Store over SQLite
// =============================================================================

mod notification_store {
    use super::*;
    use std::sync::Arc;
    use tempfile::tempdir;

    #[test]
    fn test_store_round_trips_through_file() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("region-monitor.db");

        {
            let mut store = NotificationStore::open(Database::open(&db_path).unwrap());
            store.insert("A", NotificationContent::new("Alert", "Body"));
            store.set_enabled(false);
        }

        let store = NotificationStore::open(Database::open(&db_path).unwrap());
        assert_eq!(
            store.get("A"),
            Some(&NotificationContent::new("Alert", "Body"))
        );
        assert!(!store.enabled());
    }

    #[test]
    fn test_store_writes_expected_layout() {
        let db = Arc::new(create_test_db());
        let mut store = NotificationStore::open(Arc::clone(&db));

        store.insert("A", NotificationContent::new("T", "B"));
        store.set_enabled(false);

        assert_eq!(
            db.get(NOTIFICATIONS_KEY).unwrap(),
            Some(json!({"A": {"title": "T", "body": "B"}}))
        );
        assert_eq!(db.get(NOTIFICATIONS_ENABLED_KEY).unwrap(), Some(json!(false)));
    }

    #[test]
    fn test_clear_persists_empty_map() {
        let db = Arc::new(create_test_db());
        let mut store = NotificationStore::open(Arc::clone(&db));

        store.insert("A", NotificationContent::new("T", "B"));
        store.clear();

        assert_eq!(db.get(NOTIFICATIONS_KEY).unwrap(), Some(json!({})));
    }

    #[test]
    fn test_corrupt_row_is_reported() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("region-monitor.db");
        {
            let conn = rusqlite::Connection::open(&db_path).unwrap();
            conn.execute_batch(
                "CREATE TABLE settings (key TEXT PRIMARY KEY, value TEXT NOT NULL);
                 INSERT INTO settings (key, value) VALUES ('region_notifications', '{not json');",
            )
            .unwrap();
        }

        let db = Database::open(&db_path).unwrap();
        assert!(matches!(
            db.get(NOTIFICATIONS_KEY),
            Err(StorageError::SerializationError(_))
        ));

        // The store degrades to an empty map.
        let store = NotificationStore::open(db);
        assert!(store.is_empty());
    }
}

// =============================================================================
// Concurrency Tests
// =============================================================================

mod concurrency {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_concurrent_writes() {
        let db = Arc::new(create_test_db());

        let handles: Vec<_> = (0..5)
            .map(|i| {
                let db_clone = Arc::clone(&db);
                thread::spawn(move || {
                    for j in 0..10 {
                        db_clone.set(&format!("key-{i}-{j}"), json!(j)).unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().expect("Thread panicked");
        }

        for i in 0..5 {
            for j in 0..10 {
                assert_eq!(
                    db.get(&format!("key-{i}-{j}")).unwrap(),
                    Some(json!(j)),
                    "key-{i}-{j} should be saved"
                );
            }
        }
    }
}
