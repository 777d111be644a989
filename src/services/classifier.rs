// src/services/classifier.rs
//! Deterministic keyword classifier, plus the strategy trait both the
//! heuristic and the oracle path implement.
//!
//! Every table here is an ordered list iterated front to back; first match
//! wins where the original behavior is first-match. Do not turn these into
//! maps; the order is part of the contract and the tests lock it.

use crate::config::AnalysisConfig;
use crate::entry::{Annotation, Entry};

/// One interface, two interchangeable strategies: the deterministic
/// classifier below and the oracle-backed one in `services::oracle`. The
/// deterministic one always serves as the guaranteed local path.
pub trait Classify {
    fn classify(&self, text: &str, prior: &[Entry]) -> Annotation;
}

/// Emotional tone rules, first match wins.
const TONE_RULES: &[(&[&str], &str)] = &[
    (&["spiral", "chaos"], "intense, seeking stability"),
    (&["calm", "steady"], "grounded, clear"),
    (&["tired", "heavy"], "weary but aware"),
    (&["proud", "growth"], "quiet confidence"),
];

const DEFAULT_TONE: &str = "reflective, present";

/// The user's own coined vocabulary; all matches are reported.
const DICTIONARY: &[&str] = &[
    "occlumency",
    "ghost mode",
    "phoenix logic",
    "signal mining",
    "butterfly thread",
    "containment",
];

/// Keyword groups to motif labels, checked in order. A group may carry
/// more than one label; suggestions stop once the cap is reached.
const MOTIF_GROUPS: &[(&[&str], &[&str])] = &[
    (&["parent", "mom", "dad"], &["Parental Tension"]),
    (
        &["recover", "healing", "progress"],
        &["Recovery Arc", "Narrator/Recovery"],
    ),
    (
        &["contain", "regulate", "careful"],
        &["Containment", "Occlumency"],
    ),
    (&["distance", "float", "dissociat"], &["Cloudperson"]),
    (&["pattern", "signal", "meaning"], &["Signal Mining"]),
    (&["stable", "routine", "anchor"], &["Stability Signal"]),
];

/// Returned when no motif group fires.
const DEFAULT_MOTIFS: &[&str] = &["Recovery Arc", "Signal Mining"];

/// Words that mark a chat message as worth capturing.
const REFLECTION_TRIGGERS: &[&str] = &[
    "feel",
    "think",
    "realize",
    "notice",
    "struggle",
    "grateful",
    "worry",
    "hope",
    "learn",
    "understand",
    "difficult",
    "proud",
];

const DEFAULT_INTENT: &str = "reflection";

/// Deterministic classifier: pure functions over the fixed tables above.
/// Same `(text, prior)` in, same annotation out, always.
#[derive(Debug, Clone)]
pub struct HeuristicClassifier {
    cfg: AnalysisConfig,
}

impl HeuristicClassifier {
    pub fn new(cfg: AnalysisConfig) -> Self {
        Self { cfg }
    }

    /// First-match tone label for a piece of text.
    pub fn emotional_tone(&self, text: &str) -> &'static str {
        let lower = text.to_lowercase();
        for (keywords, label) in TONE_RULES {
            if keywords.iter().any(|k| lower.contains(k)) {
                return label;
            }
        }
        DEFAULT_TONE
    }

    /// Every dictionary term present in the text, fixed vocabulary order.
    pub fn dictionary_terms(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        DICTIONARY
            .iter()
            .filter(|term| lower.contains(*term))
            .map(|term| term.to_string())
            .collect()
    }

    /// Motif labels for the text: group rules in order, capped, with the
    /// fixed default pair when nothing matched.
    pub fn suggest_motifs(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        let mut suggestions: Vec<String> = Vec::new();

        'groups: for (keywords, labels) in MOTIF_GROUPS {
            if keywords.iter().any(|k| lower.contains(k)) {
                for label in *labels {
                    if suggestions.len() >= self.cfg.motif_suggestion_cap {
                        break 'groups;
                    }
                    suggestions.push(label.to_string());
                }
            }
        }

        if suggestions.is_empty() {
            suggestions = DEFAULT_MOTIFS.iter().map(|m| m.to_string()).collect();
        }
        suggestions
    }

    /// Chat-flow capture gate: minimum length always applies; past it,
    /// either a trigger word or sheer length qualifies the message.
    pub fn reflection_worthy(&self, text: &str) -> bool {
        let trimmed = text.trim();
        if trimmed.len() < self.cfg.reflection_min_len {
            return false;
        }
        if trimmed.len() >= self.cfg.reflection_long_len {
            return true;
        }
        let lower = trimmed.to_lowercase();
        REFLECTION_TRIGGERS.iter().any(|t| lower.contains(t))
    }
}

impl Classify for HeuristicClassifier {
    fn classify(&self, text: &str, _prior: &[Entry]) -> Annotation {
        Annotation {
            motifs: self.suggest_motifs(text),
            emotional_tone: self.emotional_tone(text).to_string(),
            intent: DEFAULT_INTENT.to_string(),
            dictionary_terms: self.dictionary_terms(text),
            stability_flags: None,
        }
    }
}
