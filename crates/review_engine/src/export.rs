use crate::PredictionRow;

const HEADER: &str = "Issue Number,Author,Comment,Prediction,Confidence";

/// Renders the reviewed rows as the downloadable CSV artifact: header
/// row plus one line per row in result-set order, UTF-8, comma
/// delimited, every field quoted. Confidence is a percentage with two
/// decimals.
pub fn csv_content(rows: &[PredictionRow]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(HEADER.to_string());
    for row in rows {
        lines.push(format!(
            "\"{}\",\"{}\",\"{}\",\"{}\",\"{:.2}%\"",
            row.issue_number,
            row.author,
            escape_comment(&row.comment),
            row.prediction.as_str(),
            row.confidence * 100.0,
        ));
    }
    lines.join("\n")
}

/// Comment text is the only free-form field: inner quotes are doubled
/// and embedded line breaks become single spaces so the row stays on
/// one line.
fn escape_comment(comment: &str) -> String {
    comment
        .replace('"', "\"\"")
        .replace("\r\n", " ")
        .replace(['\n', '\r'], " ")
}
