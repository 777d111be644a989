// src/services/rewriter.rs
//! Deterministic rewrites of a single entry's text.
//!
//! Two independent pure functions: a containment ("Occlumency") rewrite
//! that minimizes disclosure, and a translator rewrite that converts
//! blame/absolute phrasing into needs-based phrasing. Neither touches the
//! store or the network; callers persist the result as a new entry if they
//! want to keep it.

use once_cell::sync::Lazy;
use regex::Regex;

/// Motifs attached when a containment rewrite is saved as an entry.
pub const OCCLUMENCY_TAGS: &[&str] = &["Occlumency", "Containment", "Repackaged"];

/// Motifs attached when a translator rewrite is saved as an entry.
pub const TRANSLATOR_TAGS: &[&str] = &["Translator Mode", "Containment"];

/// Containment rule table, first match wins. Later rules never see text a
/// prior rule matched; the output is always one fixed sentence.
const CONTAINMENT_RULES: &[(&[&str], &str)] = &[
    (
        &["spiral", "spiraling", "overwhelm", "chaos", "breaking down"],
        "Settling in. Staying grounded. No action needed.",
    ),
    (
        &["watching", "monitoring", "checking on me", "being evaluated"],
        "Just keeping things quiet tonight. All good on my end.",
    ),
    (
        &["parent", "mom", "dad", "family tension", "they're gonna"],
        "Just decompressing. Taking space for now.",
    ),
    (
        &["hate it", "furious", "rage", "can't handle", "losing it"],
        "Winding down for the evening. Everything's manageable.",
    ),
];

/// Long entries that matched no keyword rule still get a specific line.
const CONTAINMENT_LONG_THRESHOLD: usize = 200;
const CONTAINMENT_LONG: &str = "Just processing some thoughts. All's good here.";
const CONTAINMENT_DEFAULT: &str = "Just landing at home. All's good on my end. Winding down soon.";

/// Low-disclosure paraphrase for sharing with a third party. Pure and
/// deterministic: same input, same output.
pub fn containment_rewrite(text: &str) -> String {
    let lower = text.to_lowercase();

    for (patterns, replacement) in CONTAINMENT_RULES {
        if patterns.iter().any(|p| lower.contains(p)) {
            return replacement.to_string();
        }
    }
    if text.len() > CONTAINMENT_LONG_THRESHOLD {
        return CONTAINMENT_LONG.to_string();
    }
    CONTAINMENT_DEFAULT.to_string()
}

/// Presence of any of these in the original marks it high-intensity and
/// may earn the grounding append.
const INTENSITY_WORDS: &[&str] = &[
    "insane",
    "crazy",
    "hate",
    "furious",
    "rage",
    "spiral",
    "overwhelming",
    "everyone",
    "never",
    "always",
    "can't",
    "impossible",
];

const GROUNDING_APPEND: &str = " I need space to recenter.";

/// Ordered substitution table. Order matters: later rules may act on text
/// an earlier rule introduced, so this stays a list, not a map.
static SUBSTITUTIONS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    const TABLE: &[(&str, &str)] = &[
        // Blame/fury into needs or boundaries.
        ("I hate when", "I need"),
        ("everyone is", "I'm experiencing"),
        ("no one understands", "I need to be heard"),
        ("I can't keep", "I'm finding it difficult to"),
        ("makes me feel insane", "leaves me feeling overwhelmed"),
        ("makes me feel invisible", "leaves me feeling unseen"),
        // Excess qualifiers.
        ("I'm probably just", "I am"),
        ("Maybe I'm crazy", "I'm questioning"),
        ("I guess", "I believe"),
        // Absolutes into present-tense observations.
        ("always", "often"),
        ("never", "rarely"),
        ("can't trust anyone", "am experiencing a loss of trust"),
        ("refuse to listen", "aren't hearing me"),
    ];
    TABLE
        .iter()
        .map(|(pat, repl)| {
            let re = Regex::new(&format!("(?i){}", regex::escape(pat)))
                .expect("substitution patterns are literals");
            (re, *repl)
        })
        .collect()
});

/// De-escalated paraphrase: whole-string substitutions in table order,
/// then a grounding sentence when the original ran hot, then a softened
/// opener. Pure and deterministic.
pub fn translator_rewrite(text: &str) -> String {
    let lower = text.to_lowercase();
    let has_intensity = INTENSITY_WORDS.iter().any(|w| lower.contains(w));

    let mut translated = text.to_string();
    for (re, repl) in SUBSTITUTIONS.iter() {
        translated = re.replace_all(&translated, *repl).into_owned();
    }

    if has_intensity && !translated.contains("I need") {
        translated.push_str(GROUNDING_APPEND);
    }

    if translated.starts_with("I feel like") {
        translated = translated.replacen("I feel like", "I am experiencing", 1);
    }

    translated.trim().to_string()
}

const TRIGGER_MOTIFS: &[&str] = &["Parental Tension", "Spiral", "Surveillance", "Containment"];
const TRIGGER_PHRASES: &[&str] = &["occlumency check", "being watched", "they're gonna", "spiral"];

/// Should the UI offer a containment rewrite for this entry? Fires on
/// either a trigger motif or a trigger phrase in the text.
pub fn detect_containment_triggers(text: &str, motifs: &[String]) -> bool {
    if motifs.iter().any(|m| TRIGGER_MOTIFS.contains(&m.as_str())) {
        return true;
    }
    let lower = text.to_lowercase();
    TRIGGER_PHRASES.iter().any(|p| lower.contains(p))
}
