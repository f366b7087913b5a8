use cadence_core::db::open_db;
use cadence_core::{FormatCycler, PreferenceStore, RepoError, SqlitePreferenceStore};

/// 2026-01-05T14:03:09Z
const AT: i64 = 1_767_621_789_000;

#[test]
fn sqlite_store_round_trips_and_overwrites() {
    let dir = tempfile::tempdir().unwrap();
    let conn = open_db(dir.path().join("prefs.sqlite3")).unwrap();
    let store = SqlitePreferenceStore::new(&conn);

    assert_eq!(store.get("dateFormat").unwrap(), None);
    store.set("dateFormat", "1").unwrap();
    store.set("dateFormat", "0").unwrap();
    assert_eq!(store.get("dateFormat").unwrap().as_deref(), Some("0"));
}

#[test]
fn sqlite_store_rejects_invalid_keys() {
    let dir = tempfile::tempdir().unwrap();
    let conn = open_db(dir.path().join("prefs.sqlite3")).unwrap();
    let store = SqlitePreferenceStore::new(&conn);

    assert!(matches!(store.set("", "1"), Err(RepoError::InvalidKey(_))));
    assert!(matches!(store.get(" timeFormat "), Err(RepoError::InvalidKey(_))));
}

#[test]
fn format_choice_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.sqlite3");

    {
        let conn = open_db(&path).unwrap();
        let mut formats = FormatCycler::new(SqlitePreferenceStore::new(&conn), Some(0));
        assert_eq!(formats.cycle_date_format().unwrap(), 1);
        assert_eq!(formats.cycle_time_format().unwrap(), 1);
    }

    let conn = open_db(&path).unwrap();
    let formats = FormatCycler::new(SqlitePreferenceStore::new(&conn), Some(0));
    assert_eq!(formats.date_index(), 1);
    assert_eq!(formats.time_index(), 1);
    assert_eq!(formats.format_date(AT), "01/05/2026");
    assert_eq!(formats.format_time(AT), "2:03:09 PM");
}

#[test]
fn garbage_stored_index_falls_back_to_default() {
    let dir = tempfile::tempdir().unwrap();
    let conn = open_db(dir.path().join("prefs.sqlite3")).unwrap();
    let store = SqlitePreferenceStore::new(&conn);
    store.set("timeFormat", "not-a-number").unwrap();

    let formats = FormatCycler::new(&store, Some(0));
    assert_eq!(formats.time_index(), 0);
    assert_eq!(formats.format_time(AT), "14:03:09");
}
