use std::time::{Duration, Instant};

use review_engine::{
    ClassifyRequest, DispatchSettings, Endpoints, EngineEvent, EngineHandle, Label, ModelSource,
    PredictionRow, RunRecord,
};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn wait_for_event(engine: &EngineHandle) -> EngineEvent {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        if let Some(event) = engine.try_recv() {
            return event;
        }
        assert!(Instant::now() < deadline, "no engine event within 5s");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn classify_command_emits_a_normalized_run() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/ml/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [
                {"issue_number": "42", "author": "alice", "comment": "add dark mode",
                 "prediction": "NFR", "confidence": 0.91}
            ],
            "issue_title": "Dark mode",
        })))
        .mount(&server)
        .await;

    let engine = EngineHandle::new(DispatchSettings {
        endpoints: Endpoints::same(server.uri()),
        ..DispatchSettings::default()
    });
    engine.classify(ClassifyRequest {
        source: ModelSource::Custom,
        model_ref: "someone/custom-model".to_string(),
        issue_url: "https://github.com/owner/repo/issues/42".to_string(),
        token: String::new(),
    });

    match wait_for_event(&engine).await {
        EngineEvent::RunFinished { result } => {
            let run = result.expect("run ok");
            assert_eq!(run.issue_number, "42");
            assert_eq!(run.issue_title, "Dark mode");
            assert_eq!(run.rows.len(), 1);
            assert_eq!(run.rows[0].prediction, Label::Nfr);
        }
        other => panic!("expected RunFinished, got {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn fetch_models_command_emits_the_catalog() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/ml/models"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!(["org/base", "org/large"])),
        )
        .mount(&server)
        .await;

    let engine = EngineHandle::new(DispatchSettings {
        endpoints: Endpoints::same(server.uri()),
        ..DispatchSettings::default()
    });
    engine.fetch_models("jwt-token");

    match wait_for_event(&engine).await {
        EngineEvent::ModelsFetched { result } => {
            assert_eq!(result.expect("ok"), vec!["org/base", "org/large"]);
        }
        other => panic!("expected ModelsFetched, got {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_history_record_emits_no_event() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/history/save"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let engine = EngineHandle::new(DispatchSettings {
        endpoints: Endpoints::same(server.uri()),
        ..DispatchSettings::default()
    });
    engine.record_history(
        RunRecord {
            model_name: "org/feedback-base".to_string(),
            issue_url: "https://github.com/owner/repo/issues/42".to_string(),
            issue_title: String::new(),
            issue_number: "42".to_string(),
            source_type: "system".to_string(),
            result_json: vec![PredictionRow {
                issue_number: "42".to_string(),
                author: "alice".to_string(),
                comment: "hi".to_string(),
                prediction: Label::Komen,
                confidence: 0.5,
            }],
        },
        "jwt-token",
    );

    // Give the detached task time to run, then confirm silence.
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert!(engine.try_recv().is_none());
    // The server's expect(1) verifies the request actually went out.
}

#[tokio::test(flavor = "multi_thread")]
async fn shutdown_waits_for_a_history_post_still_on_the_wire() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/history/save"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_delay(Duration::from_millis(300))
                .set_body_json(json!({"status": "saved"})),
        )
        .mount(&server)
        .await;

    let engine = EngineHandle::new(DispatchSettings {
        endpoints: Endpoints::same(server.uri()),
        ..DispatchSettings::default()
    });
    engine.record_history(
        RunRecord {
            model_name: "org/feedback-base".to_string(),
            issue_url: "https://github.com/owner/repo/issues/42".to_string(),
            issue_title: String::new(),
            issue_number: "42".to_string(),
            source_type: "system".to_string(),
            result_json: Vec::new(),
        },
        "jwt-token",
    );

    // Returns only once the slow POST has been answered; a caller that
    // exits right after this cannot lose the record.
    let handle = tokio::task::spawn_blocking(move || engine.shutdown());
    handle.await.expect("shutdown");

    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}
