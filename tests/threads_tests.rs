// tests/threads_tests.rs
// Thread grouping, trend classification, and collection stats.

use chrono::{DateTime, TimeZone, Utc};

use codex_core::entry::{entry_id, Entry, Role};
use codex_core::services::threads::{build_threads, collection_stats, Trend};

fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, day, hour, 0, 0).unwrap()
}

fn entry(content: &str, motifs: &[&str], tone: &str, ts: DateTime<Utc>) -> Entry {
    Entry {
        id: entry_id(ts, content),
        user_id: "u1".to_string(),
        day: ts.date_naive(),
        role: Role::User,
        content: content.to_string(),
        motifs: motifs.iter().map(|m| m.to_string()).collect(),
        timestamp: ts,
        emotional_tone: tone.to_string(),
        intent: "reflection".to_string(),
        dictionary_terms: vec![],
        stability_flags: None,
        media: None,
        metadata: None,
    }
}

// ----------------------- Grouping -------------------------

#[test]
fn entry_with_two_motifs_appears_in_both_threads() {
    let entries = vec![entry("x", &["A", "B"], "calm", at(1, 9))];
    let threads = build_threads(&entries);
    assert_eq!(threads.len(), 2);
    assert!(threads.iter().all(|t| t.entries.len() == 1));
}

#[test]
fn repeated_tag_within_one_entry_counts_once() {
    // A remote annotation can repeat a tag; the thread must not list the
    // entry twice.
    let entries = vec![entry("x", &["A", "A"], "calm", at(1, 9))];
    let threads = build_threads(&entries);
    assert_eq!(threads.len(), 1);
    assert_eq!(threads[0].entries.len(), 1);
}

#[test]
fn threads_sort_by_count_then_encounter_order() {
    let entries = vec![
        entry("one", &["A"], "calm", at(3, 9)),
        entry("two", &["B"], "calm", at(2, 9)),
        entry("three", &["B"], "calm", at(1, 9)),
        entry("four", &["C"], "calm", at(1, 8)),
    ];
    let threads = build_threads(&entries);
    let motifs: Vec<&str> = threads.iter().map(|t| t.motif.as_str()).collect();
    // B has two entries; A and C tie and keep newest-first encounter order.
    assert_eq!(motifs, vec!["B", "A", "C"]);
}

#[test]
fn thread_entries_are_newest_first() {
    let entries = vec![
        entry("old", &["A"], "calm", at(1, 9)),
        entry("new", &["A"], "calm", at(5, 9)),
    ];
    let threads = build_threads(&entries);
    assert_eq!(threads[0].entries[0].content, "new");
    assert_eq!(threads[0].entries[1].content, "old");
}

// ----------------------- Trends ---------------------------

#[test]
fn positive_recent_tones_read_as_improving() {
    let entries = vec![
        entry("a", &["A"], "grounded, clear", at(2, 9)),
        entry("b", &["A"], "quiet confidence, proud", at(3, 9)),
    ];
    let threads = build_threads(&entries);
    assert_eq!(threads[0].trend, Trend::Improving);
}

#[test]
fn concern_tones_read_as_needing_attention() {
    let entries = vec![entry("a", &["A"], "intense spiral", at(2, 9))];
    let threads = build_threads(&entries);
    assert_eq!(threads[0].trend, Trend::NeedsAttention);
}

#[test]
fn mixed_tones_read_as_stable() {
    let entries = vec![
        entry("a", &["A"], "grounded", at(2, 9)),
        entry("b", &["A"], "heavy", at(3, 9)),
    ];
    let threads = build_threads(&entries);
    assert_eq!(threads[0].trend, Trend::Stable);
    assert!(threads[0].summary.contains("Stable pattern"));
}

#[test]
fn summary_counts_entries_and_day_span() {
    let entries = vec![
        entry("a", &["A"], "neutral", at(1, 9)),
        entry("b", &["A"], "neutral", at(4, 9)),
    ];
    let threads = build_threads(&entries);
    assert!(threads[0].summary.starts_with("2 entries over 3 days"));
}

// ----------------------- Stats ----------------------------

#[test]
fn streak_counts_consecutive_days_ending_today() {
    let now = at(5, 12);
    let entries = vec![
        entry("a", &["A"], "calm", at(5, 9)),
        entry("b", &["A"], "calm", at(4, 9)),
        entry("c", &["A"], "calm", at(3, 9)),
        // Gap on day 2 ends the streak.
        entry("d", &["A"], "calm", at(1, 9)),
    ];
    let stats = collection_stats(&entries, now);
    assert_eq!(stats.streak_days, 3);
    assert_eq!(stats.total_entries, 4);
    assert_eq!(stats.entries_today, 1);
}

#[test]
fn no_entry_today_means_zero_streak() {
    let now = at(5, 12);
    let entries = vec![entry("a", &["A"], "calm", at(4, 9))];
    let stats = collection_stats(&entries, now);
    assert_eq!(stats.streak_days, 0);
}

#[test]
fn dominant_tone_ties_go_to_first_seen() {
    let now = at(5, 12);
    let entries = vec![
        entry("a", &["A"], "calm", at(5, 8)),
        entry("b", &["B"], "heavy", at(5, 9)),
    ];
    let stats = collection_stats(&entries, now);
    assert_eq!(stats.dominant_tone.as_deref(), Some("calm"));
    assert_eq!(stats.todays_motifs, vec!["A", "B"]);
}

#[test]
fn span_is_ceiling_of_partial_days() {
    let entries = vec![
        entry("a", &["A"], "neutral", at(1, 9)),
        entry("b", &["A"], "neutral", at(2, 10)),
    ];
    let threads = build_threads(&entries);
    // 25 hours rounds up to 2 days.
    assert!(threads[0].summary.starts_with("2 entries over 2 days"));
}
