// src/services/mod.rs

pub mod classifier;   // deterministic heuristic annotation
pub mod mantra;
pub mod moves;
pub mod oracle;       // optional LLM-backed annotation and chat
pub mod recap;
pub mod rewriter;     // containment + translator rewrites (pure text)
pub mod store;        // the ONLY SQLite writer
pub mod threads;

// Public API
pub use classifier::{Classify, HeuristicClassifier};
pub use oracle::{Oracle, OracleClassifier};
pub use store::{EntryStore, NewEntry};
