use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::dispatch::{map_reqwest_error, DispatchSettings, ReqwestClassifier};
use crate::PredictionRow;

/// Snapshot of one completed run, in the history service's wire shape.
/// Written once, never read back by this side.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunRecord {
    pub model_name: String,
    pub issue_url: String,
    pub issue_title: String,
    pub issue_number: String,
    /// `"system"` or `"custom"`.
    pub source_type: String,
    pub result_json: Vec<PredictionRow>,
}

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history request failed: {0}")]
    Network(String),
    #[error("history endpoint rejected the record: {0}")]
    Rejected(String),
}

#[async_trait::async_trait]
pub trait HistorySink: Send + Sync {
    /// Persists one run record. Callers treat any failure as
    /// best-effort noise; a run that cannot be recorded is still a
    /// successful run.
    async fn record(&self, record: &RunRecord, token: &str) -> Result<(), HistoryError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestHistorySink {
    settings: DispatchSettings,
}

impl ReqwestHistorySink {
    pub fn new(settings: DispatchSettings) -> Self {
        Self { settings }
    }
}

#[async_trait::async_trait]
impl HistorySink for ReqwestHistorySink {
    async fn record(&self, record: &RunRecord, token: &str) -> Result<(), HistoryError> {
        let client = ReqwestClassifier::build_client(&self.settings)
            .map_err(|err| HistoryError::Network(err.message))?;

        let response = client
            .post(format!(
                "{}/api/history/save",
                self.settings.endpoints.system_base
            ))
            .bearer_auth(token)
            .json(record)
            .send()
            .await
            .map_err(|err| HistoryError::Network(map_reqwest_error(err).message))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|value| value.get("error").and_then(Value::as_str).map(String::from))
            .unwrap_or_else(|| status.to_string());
        Err(HistoryError::Rejected(message))
    }
}
