// src/entry.rs
//! Core entry types shared by the store, the classifiers, and the derived
//! views. An `Entry` is immutable once created; the only mutation the rest
//! of the crate performs is deletion through the store.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Who authored a stored entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "user" => Some(Role::User),
            "assistant" => Some(Role::Assistant),
            _ => None,
        }
    }
}

/// Wind-down ritual checkboxes. Only the wind-down flow sets these;
/// everything else leaves the whole record absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StabilityFlags {
    pub slept: bool,
    pub ate: bool,
    pub spikes: bool,
    pub containment_used: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Photo,
    Voice,
}

/// Reference to one attached photo or voice clip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaRef {
    pub kind: MediaKind,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

/// Structured output of a classifier strategy. Both the heuristic and the
/// oracle path produce exactly this shape; field names follow the wire
/// format of the pattern-analysis endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    pub motifs: Vec<String>,
    pub emotional_tone: String,
    pub intent: String,
    #[serde(default)]
    pub dictionary_terms: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stability_flags: Option<StabilityFlags>,
}

impl Annotation {
    /// Fixed annotation used whenever the oracle path fails or returns a
    /// payload we cannot parse. Classification never raises; it degrades
    /// to this.
    pub fn fallback() -> Self {
        Self {
            motifs: vec!["Personal Reflection".to_string()],
            emotional_tone: "reflective".to_string(),
            intent: "self-exploration".to_string(),
            dictionary_terms: Vec::new(),
            stability_flags: Some(StabilityFlags::default()),
        }
    }
}

/// One journal/chat entry. Timestamps never change after creation; there is
/// no update-in-place anywhere in the crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    pub user_id: String,
    /// Calendar date bucket (`YYYY-MM-DD`), the deletion key.
    pub day: NaiveDate,
    pub role: Role,
    pub content: String,
    pub motifs: Vec<String>,
    pub timestamp: DateTime<Utc>,
    pub emotional_tone: String,
    pub intent: String,
    #[serde(default)]
    pub dictionary_terms: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stability_flags: Option<StabilityFlags>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<MediaRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl Entry {
    /// Motifs deduplicated within this one entry, insertion order kept.
    /// Used wherever per-entry tags feed a frequency count.
    pub fn unique_motifs(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::with_capacity(self.motifs.len());
        for m in &self.motifs {
            if !seen.contains(&m.as_str()) {
                seen.push(m.as_str());
            }
        }
        seen
    }

    /// The `entryType` marker specialized flows leave in `metadata`
    /// (`wind_down`, `translated`, `repackaged`).
    pub fn entry_type(&self) -> Option<&str> {
        self.metadata.as_ref()?.get("entryType")?.as_str()
    }
}

/// Build an entry id: sortable millisecond timestamp plus a short content
/// hash, the same scheme the store uses for every row.
pub fn entry_id(ts: DateTime<Utc>, content: &str) -> String {
    let hash = blake3::hash(content.as_bytes()).to_hex().to_string();
    format!("{}-{}", ts.timestamp_millis(), &hash[..12])
}
