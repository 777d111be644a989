// src/services/mantra.rs
//! Mantra selection: one short line distilled from the collection.
//!
//! Rules run as a ladder; the first that fires wins. An empty collection
//! always gets the onboarding line.

use crate::entry::Entry;

const ONBOARDING_MANTRA: &str = "Let's Get Started";
const FORMING_MANTRA: &str = "Your patterns are forming";
const LANGUAGE_MANTRA: &str = "Building your language";

/// A dictionary term worth surfacing appears in at least this many entries.
const TERM_THRESHOLD: usize = 2;

/// A motif worth surfacing appears at least this many times.
const MOTIF_THRESHOLD: usize = 3;

/// Fragment candidates come from the most recent few entries.
const FRAGMENT_WINDOW: usize = 5;

const FRAGMENT_MIN_LEN: usize = 20;
const FRAGMENT_MAX_LEN: usize = 60;
const FRAGMENT_QUOTE_LEN: usize = 50;

pub fn select_mantra(entries: &[Entry]) -> String {
    if entries.is_empty() {
        return ONBOARDING_MANTRA.to_string();
    }

    let mut sorted: Vec<&Entry> = entries.iter().collect();
    sorted.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    // Rule 1: a personal dictionary term used across multiple entries.
    if let Some(term) = recurring_term(&sorted) {
        return format!("\"{term}\"");
    }

    // Rule 2: a motif frequent enough to name.
    if let Some(motif) = frequent_motif(&sorted) {
        return format!("{motif} continues");
    }

    // Rule 3: a short entry fragment from the recent window.
    if let Some(line) = recent_fragment(&sorted) {
        return line;
    }

    FORMING_MANTRA.to_string()
}

/// First-seen term appearing in `TERM_THRESHOLD` or more entries.
fn recurring_term(sorted: &[&Entry]) -> Option<String> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for entry in sorted {
        for term in &entry.dictionary_terms {
            match counts.iter_mut().find(|(t, _)| t == term) {
                Some((_, c)) => *c += 1,
                None => counts.push((term.clone(), 1)),
            }
        }
    }
    counts
        .into_iter()
        .find(|(_, c)| *c >= TERM_THRESHOLD)
        .map(|(t, _)| t)
}

/// Motif frequency, counting each entry's tag at most once.
fn frequent_motif(sorted: &[&Entry]) -> Option<String> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for entry in sorted {
        for motif in entry.unique_motifs() {
            match counts.iter_mut().find(|(m, _)| m.as_str() == motif) {
                Some((_, c)) => *c += 1,
                None => counts.push((motif.to_string(), 1)),
            }
        }
    }
    counts
        .into_iter()
        .find(|(_, c)| *c >= MOTIF_THRESHOLD)
        .map(|(m, _)| m)
}

/// A compact recent entry yields either its first sentence fragment,
/// quoted, or the generic language line when the fragment runs long.
fn recent_fragment(sorted: &[&Entry]) -> Option<String> {
    for entry in sorted.iter().take(FRAGMENT_WINDOW) {
        let len = entry.content.chars().count();
        if len > FRAGMENT_MIN_LEN && len < FRAGMENT_MAX_LEN {
            let fragment = entry
                .content
                .split('.')
                .next()
                .unwrap_or(&entry.content)
                .trim();
            if fragment.chars().count() < FRAGMENT_QUOTE_LEN {
                return Some(format!("\"{fragment}\""));
            }
            return Some(LANGUAGE_MANTRA.to_string());
        }
    }
    None
}
