// src/services/moves.rs
//! Next-move suggestions: small concrete prompts derived from the recent
//! window and the hour of day.

use crate::entry::Entry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    WindDown,
    RecoveryCheck,
    WellnessPrep,
    PatternReview,
    StabilityAnchor,
    Starter,
}

impl MoveKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MoveKind::WindDown => "wind_down",
            MoveKind::RecoveryCheck => "recovery_check",
            MoveKind::WellnessPrep => "wellness_prep",
            MoveKind::PatternReview => "pattern_review",
            MoveKind::StabilityAnchor => "stability_anchor",
            MoveKind::Starter => "starter",
        }
    }
}

#[derive(Debug, Clone)]
pub struct NextMove {
    pub id: String,
    pub text: String,
    pub kind: MoveKind,
    /// The motif that triggered the suggestion, when one did.
    pub motif: Option<String>,
}

/// How many recent entries motif triggers look at.
const RECENT_WINDOW: usize = 5;

/// Evening starts at this hour (inclusive).
const EVENING_HOUR: u32 = 20;

/// Early morning ends at this hour (inclusive).
const MORNING_HOUR: u32 = 6;

/// Entries needed before the stability anchor fires.
const ANCHOR_THRESHOLD: usize = 3;

/// Suggest moves from the recent motif mix and the local hour. An empty
/// result never happens; collections with no triggers get two starters.
pub fn suggest_moves(entries: &[Entry], hour: u32) -> Vec<NextMove> {
    let mut sorted: Vec<&Entry> = entries.iter().collect();
    sorted.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    let mut recent_motifs: Vec<String> = Vec::new();
    for entry in sorted.iter().take(RECENT_WINDOW) {
        for motif in &entry.motifs {
            if !recent_motifs.iter().any(|m| m == motif) {
                recent_motifs.push(motif.clone());
            }
        }
    }
    let has = |name: &str| recent_motifs.iter().any(|m| m == name);

    let mut moves: Vec<NextMove> = Vec::new();

    if hour >= EVENING_HOUR || hour <= MORNING_HOUR {
        moves.push(NextMove {
            id: "wind-down-ritual".to_string(),
            text: "Start your wind-down ritual. Note how today landed.".to_string(),
            kind: MoveKind::WindDown,
            motif: None,
        });
    }

    if has("Recovery Arc") || has("Narrator/Recovery") {
        moves.push(NextMove {
            id: "recovery-check".to_string(),
            text: "Check in on your recovery arc. What moved this week?".to_string(),
            kind: MoveKind::RecoveryCheck,
            motif: Some("Recovery Arc".to_string()),
        });
    }

    if has("Parental Tension") || has("Occlumency") {
        moves.push(NextMove {
            id: "wellness-prep".to_string(),
            text: "Prep a containment line before the next family contact.".to_string(),
            kind: MoveKind::WellnessPrep,
            motif: Some("Parental Tension".to_string()),
        });
    }

    if has("Signal Mining") || has("Phoenix Logic") {
        moves.push(NextMove {
            id: "pattern-review".to_string(),
            text: "Review your recent signals. Any pattern worth naming?".to_string(),
            kind: MoveKind::PatternReview,
            motif: Some("Signal Mining".to_string()),
        });
    }

    if entries.len() >= ANCHOR_THRESHOLD {
        moves.push(NextMove {
            id: "stability-anchor".to_string(),
            text: "Name one thing keeping you steady right now.".to_string(),
            kind: MoveKind::StabilityAnchor,
            motif: None,
        });
    }

    if moves.is_empty() {
        moves.push(NextMove {
            id: "starter-first-entry".to_string(),
            text: "Write your first entry. Anything on your mind counts.".to_string(),
            kind: MoveKind::Starter,
            motif: None,
        });
        moves.push(NextMove {
            id: "starter-dictionary".to_string(),
            text: "Try one of your own words for how today felt.".to_string(),
            kind: MoveKind::Starter,
            motif: None,
        });
    }

    moves
}
