//! Integration tests for the durable preference store
//!
//! These tests verify against a real prefs file that:
//! - Values survive a backend reopen (the process-restart scenario)
//! - The first observation of each key never touches the file
//! - The StateManager round-trips its preferences through the store

use camino::Utf8PathBuf;
use gamedex::state::{COUNTER_KEY, SEARCH_TERM_KEY};
use gamedex::{PersistentValueStore, StateManager, YamlFileBackend};
use tempfile::TempDir;

fn prefs_path(temp_dir: &TempDir) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(temp_dir.path().join("GameDex Data").join("prefs.yaml"))
        .expect("temp path is valid UTF-8")
}

#[test]
fn test_values_survive_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let path = prefs_path(&temp_dir);

    let mut store =
        PersistentValueStore::new(Box::new(YamlFileBackend::open(&path).unwrap()));
    store.write(SEARCH_TERM_KEY, "").unwrap(); // first observation, suppressed
    store.write(SEARCH_TERM_KEY, "metroid").unwrap();

    let reopened = PersistentValueStore::new(Box::new(YamlFileBackend::open(&path).unwrap()));
    assert_eq!(reopened.load(SEARCH_TERM_KEY, ""), "metroid");
}

#[test]
fn test_first_observation_leaves_file_untouched() {
    let temp_dir = TempDir::new().unwrap();
    let path = prefs_path(&temp_dir);

    let mut store =
        PersistentValueStore::new(Box::new(YamlFileBackend::open(&path).unwrap()));
    store.write(SEARCH_TERM_KEY, "mario").unwrap();

    // Suppressed write: the file was never created
    assert!(!path.exists());

    store.write(SEARCH_TERM_KEY, "tetris").unwrap();
    assert!(path.exists());
}

#[test]
fn test_open_creates_data_directory() {
    let temp_dir = TempDir::new().unwrap();
    let path = prefs_path(&temp_dir);

    let _ = YamlFileBackend::open(&path).unwrap();

    assert!(path.parent().unwrap().exists());
}

#[test]
fn test_state_manager_preferences_survive_restart() {
    let temp_dir = TempDir::new().unwrap();
    let path = prefs_path(&temp_dir);

    {
        let backend = YamlFileBackend::open(&path).unwrap();
        let manager = StateManager::new(PersistentValueStore::new(Box::new(backend)));

        manager.change_search_term("zelda");
        manager.increment_counter();
        manager.increment_counter();
    }

    // Simulated restart: a fresh manager over the same file
    let backend = YamlFileBackend::open(&path).unwrap();
    let manager = StateManager::new(PersistentValueStore::new(Box::new(backend)));

    assert_eq!(manager.read(|s| s.search_term.clone()), "zelda");
    assert_eq!(manager.read(|s| s.interaction_count), 2);
}

#[test]
fn test_restart_does_not_rewrite_loaded_values() {
    let temp_dir = TempDir::new().unwrap();
    let path = prefs_path(&temp_dir);

    {
        let backend = YamlFileBackend::open(&path).unwrap();
        let manager = StateManager::new(PersistentValueStore::new(Box::new(backend)));
        manager.change_search_term("zelda");
    }

    let written = std::fs::read_to_string(&path).unwrap();

    // A second construction only loads; its initial observations are
    // suppressed, so the file content is unchanged
    {
        let backend = YamlFileBackend::open(&path).unwrap();
        let _manager = StateManager::new(PersistentValueStore::new(Box::new(backend)));
    }

    assert_eq!(std::fs::read_to_string(&path).unwrap(), written);
}

#[test]
fn test_keys_are_independent() {
    let temp_dir = TempDir::new().unwrap();
    let path = prefs_path(&temp_dir);

    let mut store =
        PersistentValueStore::new(Box::new(YamlFileBackend::open(&path).unwrap()));

    store.write(SEARCH_TERM_KEY, "").unwrap();
    store.write(SEARCH_TERM_KEY, "mario").unwrap();
    // The counter key still has its own suppressed first observation
    store.write(COUNTER_KEY, "0").unwrap();

    let reopened = PersistentValueStore::new(Box::new(YamlFileBackend::open(&path).unwrap()));
    assert_eq!(reopened.load(SEARCH_TERM_KEY, ""), "mario");
    assert_eq!(reopened.load(COUNTER_KEY, "7"), "7");
}
