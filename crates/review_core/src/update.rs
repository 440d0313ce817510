use crate::state::InFlight;
use crate::{Effect, ModelSource, Msg, ReviewState, RunRecord, SessionPhase};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: ReviewState, msg: Msg) -> (ReviewState, Vec<Effect>) {
    let effects = match msg {
        Msg::SourceSelected(source) => {
            state.set_source(source);
            Vec::new()
        }
        Msg::ModelSelected(model) => {
            state.set_system_model(model);
            Vec::new()
        }
        Msg::CustomModelChanged(model) => {
            state.set_custom_model(model);
            Vec::new()
        }
        Msg::IssueUrlChanged(url) => {
            state.set_issue_url(url);
            Vec::new()
        }
        Msg::TokenProvided(token) => {
            state.set_auth_token(token);
            Vec::new()
        }
        Msg::ModelsRequested => {
            vec![Effect::FetchModels {
                token: state.auth_token().to_string(),
            }]
        }
        Msg::ModelsLoaded(models) => {
            state.set_models(models);
            Vec::new()
        }
        Msg::SubmitClicked => submit(&mut state),
        Msg::RunArrived(outcome) => {
            // Arrivals without a matching in-flight request (reset raced
            // the network) are dropped on the floor.
            let Some(request) = state.in_flight().cloned() else {
                return (state, Vec::new());
            };
            if *state.phase() != SessionPhase::Loading {
                return (state, Vec::new());
            }
            match outcome {
                Ok(run) => {
                    let mut effects = Vec::new();
                    if !run.rows.is_empty() && !state.auth_token().is_empty() {
                        // The record carries the first row's reported
                        // number as-is; the "unknown" fallback is a
                        // display concern only.
                        let issue_number = run
                            .rows
                            .first()
                            .map(|row| row.issue_number.clone())
                            .unwrap_or_default();
                        effects.push(Effect::RecordHistory {
                            record: RunRecord {
                                model_name: request.model_ref,
                                issue_url: request.issue_url,
                                issue_title: run.issue_title.clone(),
                                issue_number,
                                source: request.source,
                                rows: run.rows.clone(),
                            },
                            token: state.auth_token().to_string(),
                        });
                    }
                    state.apply_run(run);
                    effects
                }
                Err(failure) => {
                    state.fail_run(failure.message());
                    Vec::new()
                }
            }
        }
        Msg::RowCorrected { index, label } => {
            state.correct_row(index, label);
            Vec::new()
        }
        Msg::DetailOpened(index) => {
            state.open_detail(index);
            Vec::new()
        }
        Msg::DetailClosed => {
            state.close_detail();
            Vec::new()
        }
        Msg::ExportClicked => {
            if *state.phase() == SessionPhase::Ready {
                vec![Effect::ExportCsv {
                    issue_number: state.issue_number().to_string(),
                    rows: state.rows().to_vec(),
                }]
            } else {
                Vec::new()
            }
        }
        Msg::ResetClicked => {
            state.reset();
            Vec::new()
        }
    };

    (state, effects)
}

/// Submit guard: refused while a run is in flight, and never dispatches
/// with a missing model reference, URL, or (system path) token.
fn submit(state: &mut ReviewState) -> Vec<Effect> {
    if *state.phase() == SessionPhase::Loading {
        return Vec::new();
    }

    let model_ref = state.active_model_ref().trim().to_string();
    let issue_url = state.issue_url_input().trim().to_string();
    if model_ref.is_empty() || issue_url.is_empty() {
        state.set_validation_hint(Some(
            "Please select a model and enter a GitHub issue URL".to_string(),
        ));
        return Vec::new();
    }
    if state.source() == ModelSource::System && state.auth_token().is_empty() {
        state.set_validation_hint(Some(
            "Sign in before classifying with a system model".to_string(),
        ));
        return Vec::new();
    }

    let source = state.source();
    let token = state.auth_token().to_string();
    state.begin_run(InFlight {
        source,
        model_ref: model_ref.clone(),
        issue_url: issue_url.clone(),
    });

    vec![Effect::Dispatch {
        source,
        model_ref,
        issue_url,
        token,
    }]
}
