//! Review core: pure classification-review state machine and view-model helpers.
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use state::{
    Label, ModelSource, NormalizedRun, PredictionRow, ReviewState, RunFailure, RunRecord,
    SessionPhase,
};
pub use update::update;
pub use view_model::{ConfidenceBand, DetailView, RowView, SessionView, COMMENT_PREVIEW_CHARS};
