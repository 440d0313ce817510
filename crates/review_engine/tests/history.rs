use review_engine::{
    DispatchSettings, Endpoints, HistoryError, HistorySink, Label, PredictionRow,
    ReqwestHistorySink, RunRecord,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn record() -> RunRecord {
    RunRecord {
        model_name: "org/feedback-base".to_string(),
        issue_url: "https://github.com/owner/repo/issues/42".to_string(),
        issue_title: "Dark mode".to_string(),
        issue_number: "42".to_string(),
        source_type: "system".to_string(),
        result_json: vec![PredictionRow {
            issue_number: "42".to_string(),
            author: "alice".to_string(),
            comment: "add dark mode".to_string(),
            prediction: Label::Nfr,
            confidence: 0.91,
        }],
    }
}

fn sink_for(server: &MockServer) -> ReqwestHistorySink {
    ReqwestHistorySink::new(DispatchSettings {
        endpoints: Endpoints::same(server.uri()),
        ..DispatchSettings::default()
    })
}

#[tokio::test]
async fn record_posts_the_run_with_canonical_labels() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/history/save"))
        .and(header("authorization", "Bearer jwt-token"))
        .and(body_partial_json(json!({
            "model_name": "org/feedback-base",
            "source_type": "system",
            "issue_number": "42",
            "result_json": [{"prediction": "NFR", "confidence": 0.91}],
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"status": "saved"})))
        .expect(1)
        .mount(&server)
        .await;

    let sink = sink_for(&server);
    sink.record(&record(), "jwt-token").await.expect("saved");
}

#[tokio::test]
async fn rejection_carries_the_service_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/history/save"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "Invalid token"})))
        .mount(&server)
        .await;

    let sink = sink_for(&server);
    let err = sink.record(&record(), "expired").await.unwrap_err();
    match err {
        HistoryError::Rejected(message) => assert_eq!(message, "Invalid token"),
        other => panic!("expected Rejected, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_history_service_is_a_network_error() {
    let sink = ReqwestHistorySink::new(DispatchSettings {
        endpoints: Endpoints::same("http://127.0.0.1:9"),
        connect_timeout: std::time::Duration::from_millis(200),
        request_timeout: std::time::Duration::from_millis(500),
    });
    let err = sink.record(&record(), "jwt-token").await.unwrap_err();
    assert!(matches!(err, HistoryError::Network(_)));
}
