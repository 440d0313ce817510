use serde_json::Value;

use crate::{Label, NormalizedRun, PredictionRow};

/// Reduces a raw producer response to the canonical run shape. Pure;
/// both the system and the custom path feed through here, so nothing
/// downstream ever branches on the producer.
///
/// A response whose `result` field is absent or not an array is a run
/// with zero matches, not an error.
pub fn normalize(raw: &Value) -> NormalizedRun {
    let rows: Vec<PredictionRow> = raw
        .get("result")
        .and_then(Value::as_array)
        .map(|items| items.iter().map(normalize_row).collect())
        .unwrap_or_default();

    // The first row's number doubles as the run header; "unknown" when
    // the producer reported none.
    let issue_number = rows
        .first()
        .map(|row| row.issue_number.as_str())
        .filter(|number| !number.is_empty())
        .unwrap_or("unknown")
        .to_string();

    let issue_title = raw
        .get("issue_title")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    NormalizedRun {
        issue_number,
        issue_title,
        rows,
    }
}

fn normalize_row(item: &Value) -> PredictionRow {
    let prediction = item
        .get("prediction")
        .and_then(Value::as_str)
        .and_then(Label::parse)
        .unwrap_or(Label::Komen);

    let confidence = item
        .get("confidence")
        .and_then(Value::as_f64)
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
        .clamp(0.0, 1.0);

    PredictionRow {
        issue_number: field_string(item, "issue_number"),
        author: field_string(item, "author"),
        comment: field_string(item, "comment"),
        prediction,
        confidence,
    }
}

/// Producers are loose about numeric vs string issue numbers.
fn field_string(item: &Value, key: &str) -> String {
    match item.get(key) {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        _ => String::new(),
    }
}
