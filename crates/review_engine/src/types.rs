use std::fmt;

use serde::Serialize;

/// Classification label as carried on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Label {
    #[serde(rename = "NFR")]
    Nfr,
    #[serde(rename = "FIR")]
    Fir,
    #[serde(rename = "Komen")]
    Komen,
}

impl Label {
    pub fn as_str(self) -> &'static str {
        match self {
            Label::Nfr => "NFR",
            Label::Fir => "FIR",
            Label::Komen => "Komen",
        }
    }

    pub fn parse(value: &str) -> Option<Label> {
        match value {
            "NFR" => Some(Label::Nfr),
            "FIR" => Some(Label::Fir),
            "Komen" => Some(Label::Komen),
            _ => None,
        }
    }
}

/// One classified comment in canonical form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRow {
    pub issue_number: String,
    pub author: String,
    pub comment: String,
    pub prediction: Label,
    pub confidence: f64,
}

/// Canonical result of one classification run, regardless of which
/// producer served it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NormalizedRun {
    pub issue_number: String,
    pub issue_title: String,
    pub rows: Vec<PredictionRow>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelSource {
    System,
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

/// A dispatch-ready classification request.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifyRequest {
    pub source: ModelSource,
    pub model_ref: String,
    pub issue_url: String,
    /// Opaque bearer token; required on the system path, ignored on the
    /// custom path.
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchError {
    pub kind: DispatchFailureKind,
    pub message: String,
}

impl DispatchError {
    pub(crate) fn new(kind: DispatchFailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchFailureKind {
    /// Request was malformed before it reached the wire.
    Validation,
    /// Transport-level failure.
    Network,
    /// The request timed out.
    Timeout,
    /// The service answered with a structured failure.
    Upstream,
}

impl fmt::Display for DispatchFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchFailureKind::Validation => write!(f, "validation error"),
            DispatchFailureKind::Network => write!(f, "network error"),
            DispatchFailureKind::Timeout => write!(f, "timeout"),
            DispatchFailureKind::Upstream => write!(f, "upstream error"),
        }
    }
}
