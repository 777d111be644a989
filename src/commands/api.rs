// src/commands/api.rs
use anyhow::{anyhow, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::json;

use crate::config::CoreConfig;
use crate::entry::{Annotation, Entry, MediaRef, Role, StabilityFlags};
use crate::services::classifier::{Classify, HeuristicClassifier};
use crate::services::mantra::select_mantra;
use crate::services::moves::{suggest_moves, NextMove};
use crate::services::oracle::{Oracle, OracleClassifier};
use crate::services::recap::{build_recap, WeeklyRecap};
use crate::services::rewriter::{
    containment_rewrite, detect_containment_triggers, translator_rewrite, OCCLUMENCY_TAGS,
    TRANSLATOR_TAGS,
};
use crate::services::store::{EntryStore, NewEntry};
use crate::services::threads::{build_threads, collection_stats, CollectionStats, Thread};
use crate::utils::logbook::Logbook;

/// Facade over the whole core. One store connection lives here; every
/// flow routes its writes through it.
pub struct Commands {
    store: EntryStore,
    classifier: Box<dyn Classify>,
    heuristic: HeuristicClassifier,
    oracle: Oracle,
    logbook: Logbook,
    cfg: CoreConfig,
}

/// What a journal save hands back beyond the stored entry.
#[derive(Debug)]
pub struct JournalOutcome {
    pub entry: Entry,
    /// Most recent earlier entry sharing a motif, when one exists.
    pub replay: Option<Entry>,
    /// True when the text tripped a containment trigger.
    pub containment_suggested: bool,
    /// True when the text carries an assist phrase that should switch the
    /// caller into its emergency flow right away.
    pub emergency: bool,
}

/// Phrases that switch the journal flow into an assist mode immediately.
const EMERGENCY_PHRASES: &[&str] = &["display personal id", "initiate translator mode"];

impl Commands {
    /// Open the core rooted at `root`: config, store, logbook, and the
    /// classifier strategy the config selects.
    pub fn open(root: &std::path::Path) -> Result<Self> {
        let cfg = CoreConfig::load(root)?;
        Self::with_config(cfg)
    }

    pub fn with_config(cfg: CoreConfig) -> Result<Self> {
        let db_path = cfg
            .store
            .db_path
            .to_str()
            .ok_or_else(|| anyhow!("invalid UTF-8 db path"))?;
        let store = EntryStore::open(db_path)?;
        let logbook = Logbook::open(&cfg.logbook.path)?;
        let heuristic = HeuristicClassifier::new(cfg.analysis.clone());
        let classifier: Box<dyn Classify> = if cfg.oracle.enabled {
            Box::new(OracleClassifier::new(cfg.oracle.clone()))
        } else {
            Box::new(HeuristicClassifier::new(cfg.analysis.clone()))
        };
        let oracle = Oracle::new(cfg.oracle.clone());
        Ok(Self {
            store,
            classifier,
            heuristic,
            oracle,
            logbook,
            cfg,
        })
    }

    /// Save a journal entry: classify (writer-picked motifs win outright),
    /// attach any captured media, persist, and surface a replay candidate
    /// plus containment hints.
    pub fn journal_entry(
        &self,
        user_id: &str,
        text: &str,
        selected_motifs: &[String],
        media: Option<MediaRef>,
    ) -> Result<JournalOutcome> {
        let prior = self.store.list_entries(user_id)?;
        let mut annotation = self.classifier.classify(text, &prior);

        // Any writer-picked motifs replace the suggestions outright.
        if !selected_motifs.is_empty() {
            annotation.motifs = selected_motifs.to_vec();
        }

        let containment_suggested = detect_containment_triggers(text, &annotation.motifs);
        let emergency = is_emergency(text);

        let mut new = NewEntry::from_annotation(text, annotation);
        new.media = media;
        let entry = self.store.create_entry(user_id, today(), Role::User, new)?;

        // Replay: the newest earlier entry touching any of the same motifs.
        let replay = prior
            .iter()
            .find(|p| p.motifs.iter().any(|m| entry.motifs.contains(m)))
            .cloned();

        self.logbook.emit(
            "entry_logged",
            json!({ "entry_id": entry.id, "motifs": entry.motifs }),
        );

        Ok(JournalOutcome {
            entry,
            replay,
            containment_suggested,
            emergency,
        })
    }

    /// Capture a chat message as a reflection entry when it passes the
    /// worthiness gate. Below the gate nothing is stored.
    pub fn chat_capture(&self, user_id: &str, text: &str) -> Result<Option<Entry>> {
        if !self.heuristic.reflection_worthy(text) {
            self.logbook
                .emit("reflection_skipped", json!({ "len": text.chars().count() }));
            return Ok(None);
        }

        let annotation = Annotation {
            motifs: vec!["AI Conversation".to_string(), "Self-Reflection".to_string()],
            emotional_tone: "thoughtful".to_string(),
            intent: "exploration".to_string(),
            dictionary_terms: self.heuristic.dictionary_terms(text),
            stability_flags: None,
        };
        let mut new = NewEntry::from_annotation(text, annotation);
        new.metadata = Some(json!({ "entryType": "chat_reflection" }));

        let entry = self
            .store
            .create_entry(user_id, today(), Role::User, new)?;
        self.logbook
            .emit("reflection_captured", json!({ "entry_id": entry.id }));
        Ok(Some(entry))
    }

    /// Store an evening wind-down with its stability flags.
    pub fn wind_down(&self, user_id: &str, text: &str, flags: StabilityFlags) -> Result<Entry> {
        let annotation = Annotation {
            motifs: vec![
                "Wind-Down".to_string(),
                "Stability Signal".to_string(),
                "Recovery Check-In".to_string(),
            ],
            emotional_tone: "reflective, winding down".to_string(),
            intent: "evening_reflection".to_string(),
            dictionary_terms: self.heuristic.dictionary_terms(text),
            stability_flags: Some(flags),
        };
        let mut new = NewEntry::from_annotation(text, annotation);
        new.metadata = Some(json!({ "entryType": "wind_down" }));

        let entry = self
            .store
            .create_entry(user_id, today(), Role::User, new)?;
        self.logbook
            .emit("entry_logged", json!({ "entry_id": entry.id, "kind": "wind_down" }));
        Ok(entry)
    }

    /// Rewrite raw text into its softened form and store the result with
    /// the original preserved in metadata.
    pub fn save_translation(&self, user_id: &str, original: &str) -> Result<Entry> {
        let translated = translator_rewrite(original);
        let annotation = Annotation {
            motifs: TRANSLATOR_TAGS.iter().map(|s| s.to_string()).collect(),
            emotional_tone: "measured, intentional".to_string(),
            intent: "translation".to_string(),
            dictionary_terms: self.heuristic.dictionary_terms(original),
            stability_flags: None,
        };
        let mut new = NewEntry::from_annotation(translated.clone(), annotation);
        new.metadata = Some(json!({
            "entryType": "translated",
            "originalText": original,
            "translatedText": translated,
        }));

        let entry = self
            .store
            .create_entry(user_id, today(), Role::User, new)?;
        self.logbook
            .emit("entry_logged", json!({ "entry_id": entry.id, "kind": "translated" }));
        Ok(entry)
    }

    /// Produce a containment-safe line for the raw text and store it,
    /// marking the containment flag for the recap counters.
    pub fn save_containment(&self, user_id: &str, original: &str) -> Result<Entry> {
        let repackaged = containment_rewrite(original);
        let annotation = Annotation {
            motifs: OCCLUMENCY_TAGS.iter().map(|s| s.to_string()).collect(),
            emotional_tone: "contained, steady".to_string(),
            intent: "containment".to_string(),
            dictionary_terms: self.heuristic.dictionary_terms(original),
            stability_flags: Some(StabilityFlags {
                containment_used: true,
                ..StabilityFlags::default()
            }),
        };
        let mut new = NewEntry::from_annotation(repackaged.clone(), annotation);
        new.metadata = Some(json!({
            "entryType": "repackaged",
            "originalText": original,
            "repackagedText": repackaged,
        }));

        let entry = self
            .store
            .create_entry(user_id, today(), Role::User, new)?;
        self.logbook
            .emit("entry_logged", json!({ "entry_id": entry.id, "kind": "repackaged" }));
        Ok(entry)
    }

    /// One conversational exchange with the remote assistant. Recent entry
    /// context rides along; failures surface, nothing is stored.
    pub fn chat_reply(&self, user_id: &str, message: &str, chat_history: &str) -> Result<String> {
        let entries = self.store.list_entries(user_id)?;
        let context: String = entries
            .iter()
            .take(self.cfg.oracle.context_entries)
            .map(|e| format!("[{}] {}", e.motifs.join(", "), e.content))
            .collect::<Vec<_>>()
            .join("\n");
        let reply = self.oracle.chat(message, &context, chat_history)?;
        Ok(reply)
    }

    pub fn list_entries(&self, user_id: &str) -> Result<Vec<Entry>> {
        self.store.list_entries(user_id)
    }

    /// Remove everything stored under one calendar date bucket.
    pub fn delete_day(&self, user_id: &str, day: NaiveDate) -> Result<usize> {
        let removed = self.store.delete_entries(user_id, day)?;
        self.logbook.emit(
            "day_deleted",
            json!({ "day": day.to_string(), "removed": removed }),
        );
        Ok(removed)
    }

    // Derived views. All recomputed from the current snapshot per call.

    pub fn threads(&self, user_id: &str) -> Result<Vec<Thread>> {
        let entries = self.store.list_entries(user_id)?;
        Ok(build_threads(&entries))
    }

    pub fn stats(&self, user_id: &str) -> Result<CollectionStats> {
        self.stats_at(user_id, Utc::now())
    }

    pub fn stats_at(&self, user_id: &str, now: DateTime<Utc>) -> Result<CollectionStats> {
        let entries = self.store.list_entries(user_id)?;
        Ok(collection_stats(&entries, now))
    }

    pub fn weekly_recap(&self, user_id: &str) -> Result<WeeklyRecap> {
        self.weekly_recap_at(user_id, Utc::now())
    }

    pub fn weekly_recap_at(&self, user_id: &str, now: DateTime<Utc>) -> Result<WeeklyRecap> {
        let entries = self.store.list_entries(user_id)?;
        Ok(build_recap(&entries, now))
    }

    pub fn mantra(&self, user_id: &str) -> Result<String> {
        let entries = self.store.list_entries(user_id)?;
        Ok(select_mantra(&entries))
    }

    pub fn next_moves(&self, user_id: &str, hour: u32) -> Result<Vec<NextMove>> {
        let entries = self.store.list_entries(user_id)?;
        Ok(suggest_moves(&entries, hour))
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Assist phrases are matched case-insensitively anywhere in the text.
fn is_emergency(text: &str) -> bool {
    let lower = text.to_lowercase();
    EMERGENCY_PHRASES.iter().any(|p| lower.contains(p))
}
