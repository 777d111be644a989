// src/services/recap.rs
//! Weekly recap: a derived summary of the current week's entries.
//!
//! The week runs Monday 00:00 UTC (inclusive) through the following
//! Monday (exclusive). Recaps are recomputed per read, never stored.

use chrono::{DateTime, Datelike, Duration, Utc};

use crate::entry::Entry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoodTrend {
    Rising,
    Falling,
    Steady,
}

impl MoodTrend {
    pub fn as_str(&self) -> &'static str {
        match self {
            MoodTrend::Rising => "rising",
            MoodTrend::Falling => "falling",
            MoodTrend::Steady => "steady",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestedAction {
    /// The week's dominant motif is active enough to revisit.
    ThreadFollowup { motif: String },
    /// Evening wind-downs fell short of a nightly rhythm.
    StabilityCheck,
    /// Nothing stands out; invite open reflection.
    Reflection,
}

#[derive(Debug, Clone)]
pub struct WeeklyRecap {
    pub week_start: DateTime<Utc>,
    pub entry_count: usize,
    /// Motif and its frequency this week, highest first; ties keep
    /// first-seen order.
    pub top_motifs: Vec<(String, usize)>,
    pub mood_trend: MoodTrend,
    pub wind_downs: usize,
    pub occlumency_uses: usize,
    pub replays: usize,
    /// Entries carrying more than two motifs.
    pub motif_rich_entries: usize,
    /// Entries long enough to count as substantial reflection.
    pub reflections: usize,
    pub suggested_action: SuggestedAction,
}

const POSITIVE_MOOD_WORDS: &[&str] = &["clarity", "peace", "hope", "strength", "grounded"];
const NEGATIVE_MOOD_WORDS: &[&str] = &["conflict", "anxiety", "overwhelm", "stuck", "frustrated"];

/// Trend needs a margin of more than two before it moves off steady.
const MOOD_MARGIN: usize = 2;

/// Motif frequency that makes a thread worth following up.
const FOLLOWUP_THRESHOLD: usize = 3;

/// Wind-downs per week below this suggest checking the evening routine.
const WIND_DOWN_TARGET: usize = 5;

/// Character length at which an entry counts as a reflection.
const REFLECTION_LEN: usize = 100;

/// Start of the week containing `now`: Monday 00:00 UTC.
pub fn week_start(now: DateTime<Utc>) -> DateTime<Utc> {
    let days_back = now.weekday().num_days_from_monday() as i64;
    let monday = now.date_naive() - Duration::days(days_back);
    monday
        .and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc())
        .unwrap_or(now)
}

pub fn build_recap(entries: &[Entry], now: DateTime<Utc>) -> WeeklyRecap {
    let start = week_start(now);
    let end = start + Duration::days(7);

    let mut week: Vec<&Entry> = entries
        .iter()
        .filter(|e| e.timestamp >= start && e.timestamp < end)
        .collect();
    week.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    let top_motifs = count_motifs(&week);
    let mood_trend = classify_mood(&week);

    let wind_downs = week
        .iter()
        .filter(|e| e.entry_type() == Some("wind_down"))
        .count();
    let occlumency_uses = week
        .iter()
        .filter(|e| {
            e.stability_flags
                .as_ref()
                .map(|f| f.containment_used)
                .unwrap_or(false)
        })
        .count();
    let replays = week
        .iter()
        .filter(|e| {
            let text = e.content.to_lowercase();
            text.contains("replay") || text.contains("review")
        })
        .count();
    let motif_rich_entries = week.iter().filter(|e| e.motifs.len() > 2).count();
    let reflections = week
        .iter()
        .filter(|e| e.content.chars().count() > REFLECTION_LEN)
        .count();

    let suggested_action = suggest_action(&top_motifs, wind_downs);

    WeeklyRecap {
        week_start: start,
        entry_count: week.len(),
        top_motifs,
        mood_trend,
        wind_downs,
        occlumency_uses,
        replays,
        motif_rich_entries,
        reflections,
        suggested_action,
    }
}

/// Frequency count in first-seen order, then a stable sort by count so
/// equally frequent motifs keep their encounter order. Each entry
/// contributes a tag at most once.
fn count_motifs(week: &[&Entry]) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for entry in week {
        for motif in entry.unique_motifs() {
            match counts.iter_mut().find(|(m, _)| m.as_str() == motif) {
                Some((_, c)) => *c += 1,
                None => counts.push((motif.to_string(), 1)),
            }
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

fn classify_mood(week: &[&Entry]) -> MoodTrend {
    let tones: Vec<String> = week.iter().map(|e| e.emotional_tone.to_lowercase()).collect();
    let positive = tones
        .iter()
        .filter(|t| POSITIVE_MOOD_WORDS.iter().any(|w| t.contains(w)))
        .count();
    let negative = tones
        .iter()
        .filter(|t| NEGATIVE_MOOD_WORDS.iter().any(|w| t.contains(w)))
        .count();

    if positive > negative + MOOD_MARGIN {
        MoodTrend::Rising
    } else if negative > positive + MOOD_MARGIN {
        MoodTrend::Falling
    } else {
        MoodTrend::Steady
    }
}

fn suggest_action(top_motifs: &[(String, usize)], wind_downs: usize) -> SuggestedAction {
    if let Some((motif, count)) = top_motifs.first() {
        if *count >= FOLLOWUP_THRESHOLD {
            return SuggestedAction::ThreadFollowup {
                motif: motif.clone(),
            };
        }
    }
    if wind_downs < WIND_DOWN_TARGET {
        return SuggestedAction::StabilityCheck;
    }
    SuggestedAction::Reflection
}
