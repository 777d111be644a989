// src/services/store.rs
//! Minimal single-writer entry store.
//!
//! - Owns a single SQLite connection (WAL) to avoid multi-writer contention.
//! - Persists the full annotated entry; structured fields are JSON columns.
//! - Entries are immutable: there is insert and delete-by-day, nothing else.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::Connection;
use serde_json::Value;
use std::path::Path;

use crate::entry::{Annotation, Entry, MediaRef, Role, StabilityFlags, entry_id};

/// Everything a flow supplies for one new entry beyond the store keys.
#[derive(Debug, Clone)]
pub struct NewEntry {
    pub content: String,
    pub annotation: Annotation,
    pub media: Option<MediaRef>,
    pub metadata: Option<Value>,
}

impl NewEntry {
    pub fn from_annotation(content: impl Into<String>, annotation: Annotation) -> Self {
        Self {
            content: content.into(),
            annotation,
            media: None,
            metadata: None,
        }
    }
}

/// EntryStore is the single authority for writing to SQLite.
pub struct EntryStore {
    pub(crate) db: Connection,
}

impl EntryStore {
    /// Open/create the SQLite DB and ensure schema.
    ///
    /// Behavior:
    /// - Creates the parent directory if missing.
    /// - Opens SQLite and enables WAL (good for 1 writer + many readers).
    /// - Creates the `entries` table and `(user_id, day)` index if absent.
    pub fn open(db_path: &str) -> Result<Self> {
        if let Some(parent) = Path::new(db_path).parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Connection::open(db_path)?;

        db.execute_batch(
            r#"
            PRAGMA journal_mode = WAL;

            CREATE TABLE IF NOT EXISTS entries (
              entry_id    TEXT PRIMARY KEY,  -- "{ts_ms}-{hash12}", sortable
              user_id     TEXT NOT NULL,
              day         TEXT NOT NULL,     -- calendar bucket, YYYY-MM-DD
              role        TEXT NOT NULL,     -- "user" | "assistant"
              content     TEXT NOT NULL,
              motifs      TEXT NOT NULL,     -- JSON array, never empty
              tone        TEXT NOT NULL,
              intent      TEXT NOT NULL,
              dict_terms  TEXT NOT NULL,     -- JSON array
              stability   TEXT,              -- JSON object (wind-down only)
              media       TEXT,              -- JSON object
              metadata    TEXT,              -- JSON object
              created_at  TEXT NOT NULL      -- RFC3339 UTC
            );

            -- Speeds up per-user listing and day-bucket deletion.
            CREATE INDEX IF NOT EXISTS idx_entries_user_day ON entries(user_id, day);
            "#,
        )?;

        Ok(Self { db })
    }

    /// Append one entry for a given calendar date bucket. Returns the
    /// stored row so the caller sees the id and timestamp the store chose.
    pub fn create_entry(
        &self,
        user_id: &str,
        day: NaiveDate,
        role: Role,
        new: NewEntry,
    ) -> Result<Entry> {
        let now = Utc::now();
        self.create_entry_at(user_id, day, role, new, now)
    }

    /// Same as [`create_entry`] with an explicit timestamp. Exposed for
    /// tests and backfills; the timestamp is immutable once written.
    ///
    /// [`create_entry`]: EntryStore::create_entry
    pub fn create_entry_at(
        &self,
        user_id: &str,
        day: NaiveDate,
        role: Role,
        new: NewEntry,
        ts: DateTime<Utc>,
    ) -> Result<Entry> {
        let entry = Entry {
            id: entry_id(ts, &new.content),
            user_id: user_id.to_string(),
            day,
            role,
            content: new.content,
            motifs: new.annotation.motifs,
            timestamp: ts,
            emotional_tone: new.annotation.emotional_tone,
            intent: new.annotation.intent,
            dictionary_terms: new.annotation.dictionary_terms,
            stability_flags: new.annotation.stability_flags,
            media: new.media,
            metadata: new.metadata,
        };

        self.db.execute(
            r#"
            INSERT INTO entries(entry_id, user_id, day, role, content, motifs, tone,
                                intent, dict_terms, stability, media, metadata, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
            (
                &entry.id,
                &entry.user_id,
                entry.day.to_string(),
                entry.role.as_str(),
                &entry.content,
                serde_json::to_string(&entry.motifs)?,
                &entry.emotional_tone,
                &entry.intent,
                serde_json::to_string(&entry.dictionary_terms)?,
                entry
                    .stability_flags
                    .map(|f| serde_json::to_string(&f))
                    .transpose()?,
                entry
                    .media
                    .as_ref()
                    .map(serde_json::to_string)
                    .transpose()?,
                entry
                    .metadata
                    .as_ref()
                    .map(serde_json::to_string)
                    .transpose()?,
                entry.timestamp.to_rfc3339(),
            ),
        )?;

        Ok(entry)
    }

    /// All of one user's entries, newest first. Callers that care about
    /// order re-sort anyway; newest-first just matches the common case.
    pub fn list_entries(&self, user_id: &str) -> Result<Vec<Entry>> {
        let mut stmt = self.db.prepare(
            "SELECT entry_id, user_id, day, role, content, motifs, tone, intent,
                    dict_terms, stability, media, metadata, created_at
             FROM entries
             WHERE user_id = ?1
             ORDER BY created_at DESC",
        )?;
        let mut rows = stmt.query([user_id])?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            out.push(row_to_entry(row)?);
        }
        Ok(out)
    }

    /// Remove every entry in one calendar date bucket. Returns the number
    /// of rows deleted.
    pub fn delete_entries(&self, user_id: &str, day: NaiveDate) -> Result<usize> {
        let n = self.db.execute(
            "DELETE FROM entries WHERE user_id = ?1 AND day = ?2",
            (user_id, day.to_string()),
        )?;
        Ok(n)
    }

    /// Count of one user's entries, mostly for stats and tests.
    pub fn count_entries(&self, user_id: &str) -> Result<u64> {
        let mut stmt = self
            .db
            .prepare("SELECT COUNT(*) FROM entries WHERE user_id = ?1")?;
        let cnt: i64 = stmt.query_row([user_id], |r| r.get(0))?;
        Ok(cnt as u64)
    }
}

fn row_to_entry(row: &rusqlite::Row<'_>) -> Result<Entry> {
    let day_str: String = row.get(2)?;
    let role_str: String = row.get(3)?;
    let motifs_json: String = row.get(5)?;
    let terms_json: String = row.get(8)?;
    let stability_json: Option<String> = row.get(9)?;
    let media_json: Option<String> = row.get(10)?;
    let metadata_json: Option<String> = row.get(11)?;
    let created_at: String = row.get(12)?;

    let stability: Option<StabilityFlags> = stability_json
        .as_deref()
        .map(serde_json::from_str)
        .transpose()?;
    let media: Option<MediaRef> = media_json.as_deref().map(serde_json::from_str).transpose()?;
    let metadata: Option<Value> = metadata_json
        .as_deref()
        .map(serde_json::from_str)
        .transpose()?;

    Ok(Entry {
        id: row.get(0)?,
        user_id: row.get(1)?,
        day: day_str.parse()?,
        role: Role::parse(&role_str)
            .ok_or_else(|| anyhow::anyhow!("unknown role in store: {role_str}"))?,
        content: row.get(4)?,
        motifs: serde_json::from_str(&motifs_json)?,
        timestamp: DateTime::parse_from_rfc3339(&created_at)?.with_timezone(&Utc),
        emotional_tone: row.get(6)?,
        intent: row.get(7)?,
        dictionary_terms: serde_json::from_str(&terms_json)?,
        stability_flags: stability,
        media,
        metadata,
    })
}
