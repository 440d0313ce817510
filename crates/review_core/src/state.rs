use crate::view_model::{DetailView, RowView, SessionView};

/// Where a classification run is served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelSource {
    /// Curated model from the catalog.
    #[default]
    System,
    /// Arbitrary externally-hosted model reference.
    Custom,
}

impl ModelSource {
    pub fn as_str(self) -> &'static str {
        match self {
            ModelSource::System => "system",
            ModelSource::Custom => "custom",
        }
    }
}

/// The closed three-way label set. Corrections can only pick from here,
/// so a row's prediction is in-set by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    /// New Feature Request.
    Nfr,
    /// Feature Improvement Request.
    Fir,
    /// General comment.
    Komen,
}

impl Label {
    pub const ALL: [Label; 3] = [Label::Nfr, Label::Fir, Label::Komen];

    pub fn as_str(self) -> &'static str {
        match self {
            Label::Nfr => "NFR",
            Label::Fir => "FIR",
            Label::Komen => "Komen",
        }
    }

    /// Parses the canonical wire string; anything else is `None`.
    pub fn parse(value: &str) -> Option<Label> {
        match value {
            "NFR" => Some(Label::Nfr),
            "FIR" => Some(Label::Fir),
            "Komen" => Some(Label::Komen),
            _ => None,
        }
    }
}

/// One classified comment of the current run.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionRow {
    /// Parent issue number as reported per row; empty when the producer
    /// omitted it.
    pub issue_number: String,
    pub author: String,
    pub comment: String,
    pub prediction: Label,
    /// Producer-assigned, already clamped to `[0, 1]` by the normalizer.
    pub confidence: f64,
}

/// Canonical run shape every producer response is reduced to before it
/// reaches this state machine.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRun {
    /// Display number for the run header: the first row's number, or
    /// `"unknown"` when no row carried one.
    pub issue_number: String,
    pub issue_title: String,
    pub rows: Vec<PredictionRow>,
}

/// Failure of a dispatch, reduced to what the session needs to display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunFailure {
    /// Transport-level failure (connection refused, timeout).
    Network(String),
    /// The service answered with a structured failure payload.
    Upstream(String),
}

impl RunFailure {
    /// Human-readable message shown in the `Error` phase. Upstream
    /// messages pass through verbatim.
    pub fn message(&self) -> String {
        match self {
            RunFailure::Network(detail) => format!("Classification failed: {detail}"),
            RunFailure::Upstream(message) => message.clone(),
        }
    }
}

/// Snapshot of a completed run, handed to the history recorder once and
/// never read back.
#[derive(Debug, Clone, PartialEq)]
pub struct RunRecord {
    pub model_name: String,
    pub issue_url: String,
    pub issue_title: String,
    pub issue_number: String,
    pub source: ModelSource,
    pub rows: Vec<PredictionRow>,
}

/// Lifecycle of the review session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    Idle,
    Loading,
    Error(String),
    Ready,
}

/// Request context captured at submit time, so a late arrival is matched
/// against the run that actually produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct InFlight {
    pub source: ModelSource,
    pub model_ref: String,
    pub issue_url: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReviewState {
    phase: SessionPhase,
    rows: Vec<PredictionRow>,
    issue_number: String,
    issue_title: String,
    source: ModelSource,
    system_model: String,
    custom_model: String,
    issue_url: String,
    auth_token: String,
    models: Vec<String>,
    detail: Option<usize>,
    validation_hint: Option<String>,
    in_flight: Option<InFlight>,
    dirty: bool,
}

impl ReviewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    pub fn rows(&self) -> &[PredictionRow] {
        &self.rows
    }

    pub fn issue_number(&self) -> &str {
        &self.issue_number
    }

    pub fn issue_title(&self) -> &str {
        &self.issue_title
    }

    pub fn source(&self) -> ModelSource {
        self.source
    }

    pub fn auth_token(&self) -> &str {
        &self.auth_token
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }

    /// The model reference the active source tab would submit with.
    pub fn active_model_ref(&self) -> &str {
        match self.source {
            ModelSource::System => &self.system_model,
            ModelSource::Custom => &self.custom_model,
        }
    }

    /// True once the render layer should repaint; reading clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn view(&self) -> SessionView {
        let rows = self.rows.iter().map(RowView::from_row).collect();
        let detail = self.detail.and_then(|index| {
            self.rows.get(index).map(|row| DetailView {
                index,
                issue_number: row.issue_number.clone(),
                author: row.author.clone(),
                comment: row.comment.clone(),
                prediction: row.prediction,
                confidence: row.confidence,
            })
        });
        SessionView {
            phase: self.phase.clone(),
            issue_number: self.issue_number.clone(),
            issue_title: self.issue_title.clone(),
            model_ref: self.active_model_ref().to_string(),
            source: self.source,
            rows,
            detail,
            models: self.models.clone(),
            validation_hint: self.validation_hint.clone(),
        }
    }

    pub(crate) fn set_source(&mut self, source: ModelSource) {
        self.source = source;
        self.dirty = true;
    }

    pub(crate) fn set_system_model(&mut self, model: String) {
        self.system_model = model;
        self.dirty = true;
    }

    pub(crate) fn set_custom_model(&mut self, model: String) {
        self.custom_model = model;
        self.dirty = true;
    }

    pub(crate) fn set_issue_url(&mut self, url: String) {
        self.issue_url = url;
        self.dirty = true;
    }

    pub(crate) fn set_auth_token(&mut self, token: String) {
        self.auth_token = token;
    }

    pub(crate) fn set_models(&mut self, models: Vec<String>) {
        // The catalog occasionally carries blank identifiers; drop them
        // so the selector never offers an unsubmittable entry.
        self.models = models
            .into_iter()
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .collect();
        self.dirty = true;
    }

    pub(crate) fn set_validation_hint(&mut self, hint: Option<String>) {
        self.validation_hint = hint;
        self.dirty = true;
    }

    pub(crate) fn issue_url_input(&self) -> &str {
        &self.issue_url
    }

    pub(crate) fn in_flight(&self) -> Option<&InFlight> {
        self.in_flight.as_ref()
    }

    /// Enters `Loading`, discarding the previous run wholesale.
    pub(crate) fn begin_run(&mut self, request: InFlight) {
        self.phase = SessionPhase::Loading;
        self.rows.clear();
        self.issue_number.clear();
        self.issue_title.clear();
        self.detail = None;
        self.validation_hint = None;
        self.in_flight = Some(request);
        self.dirty = true;
    }

    /// Materializes a normalized run; an empty run is still `Ready`.
    pub(crate) fn apply_run(&mut self, run: NormalizedRun) {
        self.phase = SessionPhase::Ready;
        self.issue_number = run.issue_number;
        self.issue_title = run.issue_title;
        self.rows = run.rows;
        self.in_flight = None;
        self.dirty = true;
    }

    pub(crate) fn fail_run(&mut self, message: String) {
        self.phase = SessionPhase::Error(message);
        self.rows.clear();
        self.issue_number.clear();
        self.issue_title.clear();
        self.detail = None;
        self.in_flight = None;
        self.dirty = true;
    }

    /// Replaces one row's prediction. Returns false for an out-of-range
    /// index or when no run is materialized.
    pub(crate) fn correct_row(&mut self, index: usize, label: Label) -> bool {
        if self.phase != SessionPhase::Ready {
            return false;
        }
        match self.rows.get_mut(index) {
            Some(row) => {
                row.prediction = label;
                self.dirty = true;
                true
            }
            None => false,
        }
    }

    pub(crate) fn open_detail(&mut self, index: usize) {
        if self.phase == SessionPhase::Ready && index < self.rows.len() {
            self.detail = Some(index);
            self.dirty = true;
        }
    }

    pub(crate) fn close_detail(&mut self) {
        if self.detail.take().is_some() {
            self.dirty = true;
        }
    }

    /// Back to `Idle`. Inputs and the catalog survive; run data does not.
    pub(crate) fn reset(&mut self) {
        self.phase = SessionPhase::Idle;
        self.rows.clear();
        self.issue_number.clear();
        self.issue_title.clear();
        self.detail = None;
        self.validation_hint = None;
        self.in_flight = None;
        self.dirty = true;
    }
}
