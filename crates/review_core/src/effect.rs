use crate::state::{ModelSource, PredictionRow, RunRecord};

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Invoke the remote classification service for the submitted request.
    Dispatch {
        source: ModelSource,
        model_ref: String,
        issue_url: String,
        token: String,
    },
    /// Best-effort persistence of a completed run; never reported back.
    RecordHistory { record: RunRecord, token: String },
    /// Produce the CSV artifact for the current rows.
    ExportCsv {
        issue_number: String,
        rows: Vec<PredictionRow>,
    },
    /// Load the system-model catalog.
    FetchModels { token: String },
}
