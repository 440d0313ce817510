//! Review engine: classification dispatch, response normalization, and
//! artifact export for the review workflow.
mod catalog;
mod dispatch;
mod engine;
mod export;
mod filename;
mod history;
mod normalize;
mod persist;
mod types;

pub use catalog::ModelCatalog;
pub use dispatch::{Classifier, DispatchSettings, Endpoints, ReqwestClassifier};
pub use engine::{EngineEvent, EngineHandle};
pub use export::csv_content;
pub use filename::export_filename;
pub use history::{HistoryError, HistorySink, ReqwestHistorySink, RunRecord};
pub use normalize::normalize;
pub use persist::{write_artifact, PersistError};
pub use types::{
    ClassifyRequest, DispatchError, DispatchFailureKind, Label, ModelSource, NormalizedRun,
    PredictionRow,
};
