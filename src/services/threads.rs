// src/services/threads.rs
//! Narrative threads: the derived, motif-grouped view of the collection.
//!
//! Threads are recomputed from the entry snapshot on every read and never
//! persisted. An entry with N motifs contributes to N threads.

use chrono::{DateTime, Utc};

use crate::entry::Entry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Improving,
    Stable,
    NeedsAttention,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Improving => "improving",
            Trend::Stable => "stable",
            Trend::NeedsAttention => "needs_attention",
        }
    }
}

/// One motif's view across the collection.
#[derive(Debug, Clone)]
pub struct Thread {
    pub motif: String,
    /// Most recent first.
    pub entries: Vec<Entry>,
    pub trend: Trend,
    pub summary: String,
}

/// Tone words that read as settling.
const POSITIVE_TONE_WORDS: &[&str] = &["calm", "clear", "steady", "proud", "grounded", "confident"];

/// Tone words that read as strain.
const CONCERN_TONE_WORDS: &[&str] = &["spiral", "chaos", "overwhelm", "stuck", "heavy"];

/// How many recent entries the trend inspection looks at.
const TREND_WINDOW: usize = 3;

/// Group entries by motif into threads, newest entries first within each,
/// sorted descending by entry count. The sort is stable: equal-count
/// threads keep the order their motifs were first encountered in.
pub fn build_threads(entries: &[Entry]) -> Vec<Thread> {
    let mut sorted: Vec<&Entry> = entries.iter().collect();
    sorted.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    // Encounter-order grouping; a map would scramble tie order. Tags are
    // deduplicated per entry so a repeated tag never double-counts.
    let mut groups: Vec<(String, Vec<Entry>)> = Vec::new();
    for entry in &sorted {
        for motif in entry.unique_motifs() {
            match groups.iter_mut().find(|(m, _)| m.as_str() == motif) {
                Some((_, list)) => list.push((*entry).clone()),
                None => groups.push((motif.to_string(), vec![(*entry).clone()])),
            }
        }
    }

    let mut threads: Vec<Thread> = groups
        .into_iter()
        .map(|(motif, list)| {
            let trend = classify_trend(&list);
            let summary = summarize(&list, trend);
            Thread {
                motif,
                entries: list,
                trend,
                summary,
            }
        })
        .collect();

    threads.sort_by(|a, b| b.entries.len().cmp(&a.entries.len()));
    threads
}

/// Trend from the most recent tones: positive-only improves, concern-only
/// needs attention, both or neither is stable.
fn classify_trend(entries: &[Entry]) -> Trend {
    let recent_tones: Vec<String> = entries
        .iter()
        .take(TREND_WINDOW)
        .map(|e| e.emotional_tone.to_lowercase())
        .collect();

    let has_positive = recent_tones
        .iter()
        .any(|tone| POSITIVE_TONE_WORDS.iter().any(|w| tone.contains(w)));
    let has_concern = recent_tones
        .iter()
        .any(|tone| CONCERN_TONE_WORDS.iter().any(|w| tone.contains(w)));

    match (has_positive, has_concern) {
        (true, false) => Trend::Improving,
        (false, true) => Trend::NeedsAttention,
        _ => Trend::Stable,
    }
}

/// "N entries" + optional day span + one trend phrase.
fn summarize(entries: &[Entry], trend: Trend) -> String {
    let mut summary = format!("{} entries", entries.len());

    if entries.len() > 1 {
        let newest = entries.first().map(|e| e.timestamp).unwrap_or_default();
        let oldest = entries.last().map(|e| e.timestamp).unwrap_or_default();
        let span_days = ceil_days(newest - oldest);
        if span_days > 0 {
            summary.push_str(&format!(" over {span_days} days"));
        }
    }

    summary.push_str(match trend {
        Trend::Improving => ". Growing clarity and regulation.",
        Trend::NeedsAttention => ". May need gentle attention.",
        Trend::Stable => ". Stable pattern.",
    });
    summary
}

fn ceil_days(span: chrono::Duration) -> i64 {
    let ms = span.num_milliseconds().max(0);
    const DAY_MS: i64 = 24 * 60 * 60 * 1000;
    (ms + DAY_MS - 1) / DAY_MS
}

/// Whole-collection statistics for the overview surfaces.
#[derive(Debug, Clone)]
pub struct CollectionStats {
    pub total_entries: usize,
    pub entries_today: usize,
    /// Consecutive days (ending today) with at least one entry. Zero when
    /// nothing was written today.
    pub streak_days: u32,
    /// Most frequent tone among today's entries; first-seen wins ties.
    pub dominant_tone: Option<String>,
    /// Today's motifs, deduplicated, first-seen order.
    pub todays_motifs: Vec<String>,
}

/// Streak scanning stops after this many days back.
const STREAK_CAP_DAYS: u32 = 30;

pub fn collection_stats(entries: &[Entry], now: DateTime<Utc>) -> CollectionStats {
    let today = now.date_naive();
    let todays: Vec<&Entry> = entries
        .iter()
        .filter(|e| e.timestamp.date_naive() == today)
        .collect();

    // Walk back day by day; a gap ends the streak, no entry today means 0.
    let mut streak = 0u32;
    let mut check = today;
    for _ in 0..STREAK_CAP_DAYS {
        let any = entries.iter().any(|e| e.timestamp.date_naive() == check);
        if !any {
            break;
        }
        streak += 1;
        check = match check.pred_opt() {
            Some(prev) => prev,
            None => break,
        };
    }

    // First-seen-order frequency count keeps tie-breaking deterministic.
    let mut tone_counts: Vec<(String, usize)> = Vec::new();
    for e in &todays {
        if e.emotional_tone.is_empty() {
            continue;
        }
        match tone_counts.iter_mut().find(|(t, _)| *t == e.emotional_tone) {
            Some((_, c)) => *c += 1,
            None => tone_counts.push((e.emotional_tone.clone(), 1)),
        }
    }
    // Strict comparison so the first-seen tone wins a tie.
    let mut dominant_tone: Option<String> = None;
    let mut best = 0usize;
    for (tone, count) in &tone_counts {
        if *count > best {
            best = *count;
            dominant_tone = Some(tone.clone());
        }
    }

    let mut todays_motifs: Vec<String> = Vec::new();
    for e in &todays {
        for m in e.unique_motifs() {
            if !todays_motifs.iter().any(|x| x == m) {
                todays_motifs.push(m.to_string());
            }
        }
    }

    CollectionStats {
        total_entries: entries.len(),
        entries_today: todays.len(),
        streak_days: streak,
        dominant_tone,
        todays_motifs,
    }
}
