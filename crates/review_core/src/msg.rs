use crate::state::{Label, ModelSource, NormalizedRun, RunFailure};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User switched between the system-model and custom-model tabs.
    SourceSelected(ModelSource),
    /// User picked a system model from the catalog selector.
    ModelSelected(String),
    /// User edited the custom (externally hosted) model reference.
    CustomModelChanged(String),
    /// User edited the GitHub issue URL input.
    IssueUrlChanged(String),
    /// Identity layer supplied (or cleared) the auth token.
    TokenProvided(String),
    /// UI asked for the system-model catalog to be (re)loaded.
    ModelsRequested,
    /// Catalog fetch finished; failures arrive as an empty list plus a hint.
    ModelsLoaded(Vec<String>),
    /// User clicked the classify button.
    SubmitClicked,
    /// Dispatch + normalization finished for the in-flight run.
    RunArrived(Result<NormalizedRun, RunFailure>),
    /// Reviewer overrode the predicted label of one row.
    RowCorrected { index: usize, label: Label },
    /// Reviewer opened the full-comment detail view for one row.
    DetailOpened(usize),
    /// Reviewer closed the detail view.
    DetailClosed,
    /// User asked for the CSV artifact of the current run.
    ExportClicked,
    /// User discarded the current run.
    ResetClicked,
}
