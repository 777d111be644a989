// src/utils/logbook.rs
use anyhow::Result;
use chrono::Utc;
use serde_json::Value;
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

/// Append-only JSONL event trail. Logging failures are reported through
/// tracing and never bubble into the calling operation.
pub struct Logbook {
    base: PathBuf,
}

impl Logbook {
    pub fn open(base: impl Into<PathBuf>) -> Result<Self> {
        let base = base.into();
        fs::create_dir_all(&base)?;
        Ok(Self { base })
    }

    /// Best-effort append. One line per event.
    pub fn emit(&self, event: &str, data: Value) {
        if let Err(err) = self.write_line(event, data) {
            tracing::warn!(event, error = %err, "logbook append failed");
        }
    }

    fn write_line(&self, event: &str, data: Value) -> Result<()> {
        let line = serde_json::json!({
            "timestamp": Utc::now().to_rfc3339(),
            "event": event,
            "data": data
        });
        let json = serde_json::to_string(&line)?;
        let mut f = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.base.join("logbook.jsonl"))?;
        writeln!(f, "{}", json)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.base
    }
}
