/// Windows-safe artifact name: `klasifikasi_issue_{number}.csv`, with
/// `result` standing in when no usable issue number survives sanitizing.
pub fn export_filename(issue_number: &str) -> String {
    let cleaned = sanitize_component(issue_number);
    if cleaned.is_empty() {
        "klasifikasi_issue_result.csv".to_string()
    } else {
        format!("klasifikasi_issue_{cleaned}.csv")
    }
}

fn sanitize_component(input: &str) -> String {
    let mut cleaned: String = input
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect();
    cleaned = cleaned.trim_matches(&['_', ' ', '.'][..]).to_string();

    // Collapse runs of underscores left behind by the replacement.
    let mut compacted = String::with_capacity(cleaned.len());
    let mut prev_underscore = false;
    for c in cleaned.chars() {
        if c == '_' {
            if !prev_underscore {
                compacted.push(c);
            }
            prev_underscore = true;
        } else {
            compacted.push(c);
            prev_underscore = false;
        }
    }
    // Cap length on a character boundary; issue numbers are free text
    // from the producer and may be multibyte.
    if compacted.chars().count() > 40 {
        compacted = compacted.chars().take(40).collect();
    }
    compacted
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}
