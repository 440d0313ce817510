use crate::state::{Label, ModelSource, PredictionRow, SessionPhase};

/// Characters of a comment shown in the table before truncation.
pub const COMMENT_PREVIEW_CHARS: usize = 60;

/// Coarse confidence bucket for table styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceBand {
    High,
    Medium,
    Low,
}

impl ConfidenceBand {
    pub fn for_confidence(confidence: f64) -> Self {
        if confidence >= 0.8 {
            ConfidenceBand::High
        } else if confidence >= 0.6 {
            ConfidenceBand::Medium
        } else {
            ConfidenceBand::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionView {
    pub phase: SessionPhase,
    pub issue_number: String,
    pub issue_title: String,
    pub model_ref: String,
    pub source: ModelSource,
    pub rows: Vec<RowView>,
    pub detail: Option<DetailView>,
    pub models: Vec<String>,
    pub validation_hint: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowView {
    pub issue_number: String,
    pub author: String,
    pub comment_preview: String,
    pub prediction: Label,
    pub confidence: f64,
    pub band: ConfidenceBand,
}

impl RowView {
    pub(crate) fn from_row(row: &PredictionRow) -> Self {
        Self {
            issue_number: row.issue_number.clone(),
            author: row.author.clone(),
            comment_preview: preview(&row.comment),
            prediction: row.prediction,
            confidence: row.confidence,
            band: ConfidenceBand::for_confidence(row.confidence),
        }
    }
}

/// Full-comment view opened from one table row.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub index: usize,
    pub issue_number: String,
    pub author: String,
    pub comment: String,
    pub prediction: Label,
    pub confidence: f64,
}

fn preview(comment: &str) -> String {
    if comment.chars().count() > COMMENT_PREVIEW_CHARS {
        let truncated: String = comment.chars().take(COMMENT_PREVIEW_CHARS).collect();
        format!("{truncated}...")
    } else {
        comment.to_string()
    }
}
