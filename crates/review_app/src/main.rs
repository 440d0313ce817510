mod effects;
mod logging;

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use review_core::{update, ModelSource, Msg, ReviewState, SessionPhase, SessionView};
use review_engine::{DispatchSettings, Endpoints};
use review_logging::review_info;

use crate::effects::EffectRunner;
use crate::logging::LogDestination;

/// Classify a GitHub issue thread and review the per-comment predictions.
#[derive(Debug, Parser)]
#[command(name = "review", version)]
struct Args {
    /// Which producer serves the model.
    #[arg(long, value_enum, default_value_t = SourceArg::System)]
    source: SourceArg,
    /// Model reference: a catalog identifier (system) or an externally
    /// hosted model id (custom).
    #[arg(long)]
    model: Option<String>,
    /// GitHub issue URL to classify.
    #[arg(long)]
    url: Option<String>,
    /// Auth token for the system path and history persistence.
    #[arg(long, env = "REVIEW_TOKEN", default_value = "", hide_env_values = true)]
    token: String,
    /// Base URL of the classification services.
    #[arg(long, default_value = "http://localhost:5000")]
    endpoint: String,
    /// Directory for the exported CSV artifact.
    #[arg(long, default_value = "output")]
    out_dir: PathBuf,
    /// List the available system models and exit.
    #[arg(long)]
    list_models: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SourceArg {
    System,
    Custom,
}

impl From<SourceArg> for ModelSource {
    fn from(source: SourceArg) -> Self {
        match source {
            SourceArg::System => ModelSource::System,
            SourceArg::Custom => ModelSource::Custom,
        }
    }
}

fn main() {
    let args = Args::parse();
    logging::initialize(LogDestination::Both);

    let settings = DispatchSettings {
        endpoints: Endpoints::same(args.endpoint.trim_end_matches('/')),
        ..DispatchSettings::default()
    };
    let runner = EffectRunner::new(settings, args.out_dir.clone());

    let mut state = ReviewState::new();
    state = apply(state, Msg::TokenProvided(args.token.clone()), &runner);
    state = apply(state, Msg::SourceSelected(args.source.into()), &runner);
    if let Some(model) = args.model.clone() {
        state = apply(
            state,
            match ModelSource::from(args.source) {
                ModelSource::System => Msg::ModelSelected(model),
                ModelSource::Custom => Msg::CustomModelChanged(model),
            },
            &runner,
        );
    }
    if let Some(url) = args.url.clone() {
        state = apply(state, Msg::IssueUrlChanged(url), &runner);
    }

    if args.list_models {
        list_models(state, &runner);
        return;
    }

    let state = apply(state, Msg::SubmitClicked, &runner);
    if let Some(hint) = state.view().validation_hint {
        eprintln!("{hint}");
        std::process::exit(2);
    }

    let state = pump_until_settled(state, &runner);
    match state.phase().clone() {
        SessionPhase::Ready => {
            print_run(&state.view());
            // Hand the artifact over as well; the effect writes the CSV.
            let _ = apply(state, Msg::ExportClicked, &runner);
            // Wait for the queued history post before exiting.
            runner.shutdown();
        }
        SessionPhase::Error(message) => {
            eprintln!("Classification failed: {message}");
            std::process::exit(1);
        }
        other => {
            eprintln!("session ended in unexpected phase {other:?}");
            std::process::exit(1);
        }
    }
}

/// One turn of the loop: update the state and execute resulting effects.
fn apply(state: ReviewState, msg: Msg, runner: &EffectRunner) -> ReviewState {
    let (state, effects) = update(state, msg);
    runner.run(effects);
    state
}

/// Polls engine events into the core until the run leaves `Loading`.
fn pump_until_settled(mut state: ReviewState, runner: &EffectRunner) -> ReviewState {
    while *state.phase() == SessionPhase::Loading {
        match runner.poll() {
            Some(msg) => state = apply(state, msg, runner),
            None => thread::sleep(Duration::from_millis(20)),
        }
    }
    state
}

fn list_models(state: ReviewState, runner: &EffectRunner) {
    let mut state = apply(state, Msg::ModelsRequested, runner);
    loop {
        match runner.poll() {
            Some(msg) => {
                state = apply(state, msg, runner);
                break;
            }
            None => thread::sleep(Duration::from_millis(20)),
        }
    }
    if state.models().is_empty() {
        println!("No system models available.");
        return;
    }
    for model in state.models() {
        println!("{model}");
    }
}

fn print_run(view: &SessionView) {
    review_info!(
        "run ready issue={} rows={}",
        view.issue_number,
        view.rows.len()
    );
    if view.issue_title.is_empty() {
        println!("Issue #{} ({})", view.issue_number, view.model_ref);
    } else {
        println!(
            "Issue #{} — {} ({})",
            view.issue_number, view.issue_title, view.model_ref
        );
    }
    if view.rows.is_empty() {
        println!("No comments were extracted from this issue.");
        return;
    }
    for row in &view.rows {
        println!(
            "{:>6}  {:<20}  {:<5}  {:>7.2}%  {}",
            row.issue_number,
            row.author,
            row.prediction.as_str(),
            row.confidence * 100.0,
            row.comment_preview
        );
    }
}
