// src/lib.rs
//! Core engine for a motif-aware personal journal.
//!
//! Entries flow in through the command facade, get annotated by a
//! classifier strategy (deterministic keyword rules, or an optional
//! remote oracle that degrades to a fixed fallback), and land in a
//! single-writer SQLite store. Everything above the store is derived on
//! read: narrative threads, weekly recaps, mantras, next moves.

pub mod commands;
pub mod config;
pub mod entry;
pub mod services;
pub mod utils;

pub use commands::{Commands, JournalOutcome};
pub use config::CoreConfig;
pub use entry::{Annotation, Entry, MediaKind, MediaRef, Role, StabilityFlags};
pub use services::classifier::{Classify, HeuristicClassifier};
pub use services::oracle::{Oracle, OracleClassifier, OracleError};
pub use services::recap::{MoodTrend, SuggestedAction, WeeklyRecap};
pub use services::store::{EntryStore, NewEntry};
pub use services::threads::{CollectionStats, Thread, Trend};
