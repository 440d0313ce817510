use pretty_assertions::assert_eq;
use review_engine::{csv_content, export_filename, Label, PredictionRow};

fn row(comment: &str, prediction: Label, confidence: f64) -> PredictionRow {
    PredictionRow {
        issue_number: "42".to_string(),
        author: "alice".to_string(),
        comment: comment.to_string(),
        prediction,
        confidence,
    }
}

#[test]
fn empty_result_set_yields_only_the_header() {
    assert_eq!(
        csv_content(&[]),
        "Issue Number,Author,Comment,Prediction,Confidence"
    );
}

#[test]
fn rows_render_in_order_with_percent_confidence() {
    let rows = vec![
        row("add dark mode", Label::Nfr, 0.875),
        row("thanks", Label::Komen, 0.0),
    ];
    let content = csv_content(&rows);
    let lines: Vec<&str> = content.lines().collect();

    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "Issue Number,Author,Comment,Prediction,Confidence");
    assert_eq!(lines[1], r#""42","alice","add dark mode","NFR","87.50%""#);
    assert_eq!(lines[2], r#""42","alice","thanks","Komen","0.00%""#);
}

#[test]
fn comment_quotes_are_doubled_and_newlines_flattened() {
    let rows = vec![row("first line\nsays \"hi\"", Label::Fir, 1.0)];
    let content = csv_content(&rows);
    assert!(content.contains(r#""first line says ""hi""","FIR","100.00%""#));
    // The escaped row must stay on a single line.
    assert_eq!(content.lines().count(), 2);
}

#[test]
fn filename_embeds_the_issue_number() {
    assert_eq!(export_filename("42"), "klasifikasi_issue_42.csv");
    assert_eq!(export_filename("unknown"), "klasifikasi_issue_unknown.csv");
}

#[test]
fn filename_falls_back_when_no_number_survives() {
    assert_eq!(export_filename(""), "klasifikasi_issue_result.csv");
    assert_eq!(export_filename("  .."), "klasifikasi_issue_result.csv");
}

#[test]
fn filename_is_sanitized_for_the_filesystem() {
    assert_eq!(export_filename("4/2:a"), "klasifikasi_issue_4_2_a.csv");
    assert_eq!(export_filename("??42??"), "klasifikasi_issue_42.csv");
}

#[test]
fn multibyte_issue_numbers_are_capped_on_character_boundaries() {
    let name = export_filename(&format!("a{}", "é".repeat(60)));
    assert_eq!(name, format!("klasifikasi_issue_a{}.csv", "é".repeat(39)));

    // Shorter multibyte input passes through untouched.
    assert_eq!(export_filename("№42"), "klasifikasi_issue_№42.csv");
}
