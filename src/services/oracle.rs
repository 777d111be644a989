// src/services/oracle.rs
//! Client for the two remote analysis endpoints (`ai-chat` and
//! `pattern-analysis`) and the oracle-backed classifier strategy.
//!
//! The classifier strategy never surfaces a failure: any network error,
//! non-2xx status, or unparsable payload degrades to the fixed default
//! annotation so the user action still completes locally.

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::OracleConfig;
use crate::entry::{Annotation, Entry};
use crate::services::classifier::Classify;

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {0}")]
    Api(String),

    #[error("unexpected payload: {0}")]
    Payload(String),

    #[error("oracle is disabled by configuration")]
    Disabled,
}

pub type OracleResult<T> = Result<T, OracleError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisType {
    MotifDetection,
    WeeklyRecap,
    ThreadAnalysis,
}

impl AnalysisType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisType::MotifDetection => "motif_detection",
            AnalysisType::WeeklyRecap => "weekly_recap",
            AnalysisType::ThreadAnalysis => "thread_analysis",
        }
    }
}

/// Context rides along as content + motifs only; never the full row.
#[derive(Debug, Serialize)]
struct PriorEntry<'a> {
    content: &'a str,
    motifs: &'a [String],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalysisRequest<'a> {
    content: &'a str,
    analysis_type: &'a str,
    previous_entries: Vec<PriorEntry<'a>>,
}

#[derive(Debug, Deserialize)]
struct AnalysisResponse {
    analysis: Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChatRequest<'a> {
    message: &'a str,
    context: &'a str,
    chat_history: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    response: String,
}

/// Blocking HTTP client for the analysis proxy. One request per user
/// action; no retries, no deduplication. The caller's fallback handles
/// everything that can go wrong here.
pub struct Oracle {
    client: Client,
    cfg: OracleConfig,
}

impl Oracle {
    pub fn new(cfg: OracleConfig) -> Self {
        Self {
            client: Client::new(),
            cfg,
        }
    }

    /// Run one pattern analysis. Returns the raw `analysis` payload; motif
    /// detection callers parse it further via [`parse_annotation`].
    pub fn analyze(
        &self,
        content: &str,
        analysis_type: AnalysisType,
        prior: &[Entry],
    ) -> OracleResult<Value> {
        if !self.cfg.enabled {
            return Err(OracleError::Disabled);
        }

        let previous_entries: Vec<PriorEntry<'_>> = prior
            .iter()
            .take(self.cfg.context_entries)
            .map(|e| PriorEntry {
                content: &e.content,
                motifs: &e.motifs,
            })
            .collect();

        let url = format!("{}/pattern-analysis", self.cfg.api_base);
        debug!(%url, analysis_type = analysis_type.as_str(), "oracle analyze");

        let mut req = self.client.post(&url).json(&AnalysisRequest {
            content,
            analysis_type: analysis_type.as_str(),
            previous_entries,
        });
        if let Some(key) = &self.cfg.api_key {
            req = req.bearer_auth(key);
        }

        let resp = req.send()?;
        if !resp.status().is_success() {
            return Err(OracleError::Api(format!("status {}", resp.status())));
        }
        let body: AnalysisResponse = resp
            .json()
            .map_err(|e| OracleError::Payload(e.to_string()))?;
        Ok(body.analysis)
    }

    /// One conversational round trip. Unlike classification, chat failures
    /// surface to the caller, since there is nothing sensible to fall back to.
    pub fn chat(&self, message: &str, context: &str, chat_history: &str) -> OracleResult<String> {
        if !self.cfg.enabled {
            return Err(OracleError::Disabled);
        }

        let url = format!("{}/ai-chat", self.cfg.api_base);
        let mut req = self.client.post(&url).json(&ChatRequest {
            message,
            context,
            chat_history,
        });
        if let Some(key) = &self.cfg.api_key {
            req = req.bearer_auth(key);
        }

        let resp = req.send()?;
        if !resp.status().is_success() {
            return Err(OracleError::Api(format!("status {}", resp.status())));
        }
        let body: ChatResponse = resp
            .json()
            .map_err(|e| OracleError::Payload(e.to_string()))?;
        Ok(body.response)
    }
}

/// Parse a motif-detection payload into an [`Annotation`]. `None` when the
/// shape is wrong or the motif list came back empty; the classifier
/// substitutes the fixed fallback in both cases.
pub fn parse_annotation(value: &Value) -> Option<Annotation> {
    let ann: Annotation = serde_json::from_value(value.clone()).ok()?;
    if ann.motifs.is_empty() {
        return None;
    }
    Some(ann)
}

/// Oracle-backed classifier strategy. Satisfies the same contract as the
/// heuristic path; on any failure it returns [`Annotation::fallback`].
pub struct OracleClassifier {
    oracle: Oracle,
}

impl OracleClassifier {
    pub fn new(cfg: OracleConfig) -> Self {
        Self {
            oracle: Oracle::new(cfg),
        }
    }
}

impl Classify for OracleClassifier {
    fn classify(&self, text: &str, prior: &[Entry]) -> Annotation {
        match self.oracle.analyze(text, AnalysisType::MotifDetection, prior) {
            Ok(payload) => parse_annotation(&payload).unwrap_or_else(|| {
                warn!("oracle returned an unusable annotation payload; using fallback");
                Annotation::fallback()
            }),
            Err(e) => {
                warn!(error = %e, "oracle classification failed; using fallback");
                Annotation::fallback()
            }
        }
    }
}
