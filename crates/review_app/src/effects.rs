use std::path::PathBuf;

use review_core::{Effect, Msg};
use review_engine::{
    csv_content, export_filename, write_artifact, ClassifyRequest, DispatchError,
    DispatchFailureKind, EngineEvent, EngineHandle,
};
use review_logging::{review_error, review_info, review_warn};

/// Bridges the pure core to the engine: executes effects, polls engine
/// events back into messages.
pub struct EffectRunner {
    engine: EngineHandle,
    out_dir: PathBuf,
}

impl EffectRunner {
    pub fn new(settings: review_engine::DispatchSettings, out_dir: PathBuf) -> Self {
        Self {
            engine: EngineHandle::new(settings),
            out_dir,
        }
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Dispatch {
                    source,
                    model_ref,
                    issue_url,
                    token,
                } => {
                    review_info!(
                        "dispatch source={} model={} url={}",
                        source.as_str(),
                        model_ref,
                        issue_url
                    );
                    self.engine.classify(ClassifyRequest {
                        source: map_source(source),
                        model_ref,
                        issue_url,
                        token,
                    });
                }
                Effect::RecordHistory { record, token } => {
                    self.engine.record_history(map_record(record), token);
                }
                Effect::ExportCsv { issue_number, rows } => {
                    self.export(&issue_number, &rows);
                }
                Effect::FetchModels { token } => {
                    self.engine.fetch_models(token);
                }
            }
        }
    }

    /// Lets outstanding engine work (history posts in particular)
    /// finish before the process goes away.
    pub fn shutdown(self) {
        self.engine.shutdown();
    }

    /// Maps the next engine event, if any, back into a core message.
    pub fn poll(&self) -> Option<Msg> {
        self.engine.try_recv().map(|event| match event {
            EngineEvent::RunFinished { result } => Msg::RunArrived(map_run_result(result)),
            EngineEvent::ModelsFetched { result } => match result {
                Ok(models) => Msg::ModelsLoaded(models),
                Err(err) => {
                    review_warn!("failed to fetch models: {}", err);
                    Msg::ModelsLoaded(Vec::new())
                }
            },
        })
    }

    fn export(&self, issue_number: &str, rows: &[review_core::PredictionRow]) {
        let rows: Vec<review_engine::PredictionRow> = rows.iter().map(map_row).collect();
        let content = csv_content(&rows);
        let filename = export_filename(issue_number);
        match write_artifact(&self.out_dir, &filename, &content) {
            Ok(path) => {
                review_info!("exported {} rows to {}", rows.len(), path.display());
                println!("CSV saved to {}", path.display());
            }
            Err(err) => {
                review_error!("export failed: {}", err);
                eprintln!("Export failed: {err}");
            }
        }
    }
}

fn map_source(source: review_core::ModelSource) -> review_engine::ModelSource {
    match source {
        review_core::ModelSource::System => review_engine::ModelSource::System,
        review_core::ModelSource::Custom => review_engine::ModelSource::Custom,
    }
}

fn map_label(label: review_engine::Label) -> review_core::Label {
    match label {
        review_engine::Label::Nfr => review_core::Label::Nfr,
        review_engine::Label::Fir => review_core::Label::Fir,
        review_engine::Label::Komen => review_core::Label::Komen,
    }
}

fn map_row(row: &review_core::PredictionRow) -> review_engine::PredictionRow {
    review_engine::PredictionRow {
        issue_number: row.issue_number.clone(),
        author: row.author.clone(),
        comment: row.comment.clone(),
        prediction: match row.prediction {
            review_core::Label::Nfr => review_engine::Label::Nfr,
            review_core::Label::Fir => review_engine::Label::Fir,
            review_core::Label::Komen => review_engine::Label::Komen,
        },
        confidence: row.confidence,
    }
}

fn map_run_result(
    result: Result<review_engine::NormalizedRun, DispatchError>,
) -> Result<review_core::NormalizedRun, review_core::RunFailure> {
    match result {
        Ok(run) => Ok(review_core::NormalizedRun {
            issue_number: run.issue_number,
            issue_title: run.issue_title,
            rows: run
                .rows
                .into_iter()
                .map(|row| review_core::PredictionRow {
                    issue_number: row.issue_number,
                    author: row.author,
                    comment: row.comment,
                    prediction: map_label(row.prediction),
                    confidence: row.confidence,
                })
                .collect(),
        }),
        Err(err) => Err(match err.kind {
            DispatchFailureKind::Upstream => review_core::RunFailure::Upstream(err.message),
            DispatchFailureKind::Validation
            | DispatchFailureKind::Network
            | DispatchFailureKind::Timeout => review_core::RunFailure::Network(err.message),
        }),
    }
}

fn map_record(record: review_core::RunRecord) -> review_engine::RunRecord {
    review_engine::RunRecord {
        model_name: record.model_name,
        issue_url: record.issue_url,
        issue_title: record.issue_title,
        issue_number: record.issue_number,
        source_type: record.source.as_str().to_string(),
        result_json: record.rows.iter().map(map_row).collect(),
    }
}
