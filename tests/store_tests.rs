// tests/store_tests.rs
// SQLite round trips and day-bucket deletion against a temp database.

use chrono::{NaiveDate, TimeZone, Utc};
use serde_json::json;
use tempfile::TempDir;

use codex_core::entry::{Annotation, MediaKind, MediaRef, Role, StabilityFlags};
use codex_core::services::store::{EntryStore, NewEntry};

fn open_store(dir: &TempDir) -> EntryStore {
    let db = dir.path().join("entries.db");
    EntryStore::open(db.to_str().unwrap()).unwrap()
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
}

fn annotation() -> Annotation {
    Annotation {
        motifs: vec!["Recovery Arc".to_string()],
        emotional_tone: "grounded, clear".to_string(),
        intent: "reflection".to_string(),
        dictionary_terms: vec!["occlumency".to_string()],
        stability_flags: Some(StabilityFlags {
            slept: true,
            ate: true,
            spikes: false,
            containment_used: false,
        }),
    }
}

#[test]
fn entry_round_trips_with_all_fields() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);

    let mut new = NewEntry::from_annotation("held steady today", annotation());
    new.media = Some(MediaRef {
        kind: MediaKind::Voice,
        location: "clips/evening.ogg".to_string(),
        duration_secs: Some(42),
        caption: None,
    });
    new.metadata = Some(json!({ "entryType": "wind_down" }));

    let written = store.create_entry("u1", day(5), Role::User, new).unwrap();
    let listed = store.list_entries("u1").unwrap();

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0], written);
    assert_eq!(listed[0].entry_type(), Some("wind_down"));
    assert_eq!(listed[0].dictionary_terms, vec!["occlumency"]);
    assert_eq!(
        listed[0].media.as_ref().map(|m| m.duration_secs),
        Some(Some(42))
    );
}

#[test]
fn list_is_newest_first_and_per_user() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);

    let t1 = Utc.with_ymd_and_hms(2026, 3, 5, 9, 0, 0).unwrap();
    let t2 = Utc.with_ymd_and_hms(2026, 3, 6, 9, 0, 0).unwrap();
    store
        .create_entry_at(
            "u1",
            day(5),
            Role::User,
            NewEntry::from_annotation("older", annotation()),
            t1,
        )
        .unwrap();
    store
        .create_entry_at(
            "u1",
            day(6),
            Role::User,
            NewEntry::from_annotation("newer", annotation()),
            t2,
        )
        .unwrap();
    store
        .create_entry_at(
            "u2",
            day(6),
            Role::User,
            NewEntry::from_annotation("someone else", annotation()),
            t2,
        )
        .unwrap();

    let listed = store.list_entries("u1").unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].content, "newer");
    assert_eq!(listed[1].content, "older");
}

#[test]
fn delete_removes_only_the_named_day() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);

    for (d, text) in [(5, "keep me"), (6, "first out"), (6, "second out")] {
        store
            .create_entry(
                "u1",
                day(d),
                Role::User,
                NewEntry::from_annotation(text, annotation()),
            )
            .unwrap();
    }

    let removed = store.delete_entries("u1", day(6)).unwrap();
    assert_eq!(removed, 2);

    let listed = store.list_entries("u1").unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].content, "keep me");
    assert_eq!(store.count_entries("u1").unwrap(), 1);
}

#[test]
fn entry_ids_are_unique_per_timestamp_and_content() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);

    let t = Utc.with_ymd_and_hms(2026, 3, 5, 9, 0, 0).unwrap();
    let a = store
        .create_entry_at(
            "u1",
            day(5),
            Role::User,
            NewEntry::from_annotation("one", annotation()),
            t,
        )
        .unwrap();
    let b = store
        .create_entry_at(
            "u1",
            day(5),
            Role::User,
            NewEntry::from_annotation("two", annotation()),
            t,
        )
        .unwrap();
    assert_ne!(a.id, b.id);
    assert!(a.id.starts_with(&t.timestamp_millis().to_string()));
}
