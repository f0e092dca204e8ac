use std::path::Path;
use std::sync::Arc;

use kanal::AsyncSender;
use readedge_ai::AnalysisError;
use readedge_core::view::ANALYSIS_FAILED_MESSAGE;
use readedge_types::{ArticleAnalysis, Command, ViewState};

use crate::AppState;
use crate::events::AppEvent;
use crate::session::Session;

/// Editing the pending article; only on the input screen
pub async fn handle_input_command(session: &mut Session, command: Command) {
    if session.view.state() != ViewState::Input {
        session.notify("Go back to the input screen first");
        return;
    }

    match command {
        Command::AppendText(text) => session.input.append_text(&text),
        Command::LoadSample => session.input.load_sample(),
        Command::Link(url) => session.input.set_link(&url),
        Command::File(path) => {
            if let Err(e) = session.input.load_file(Path::new(&path)).await {
                tracing::warn!("File load failed: {}", e);
                session.notify(e.to_string());
            }
        }
        Command::Clear => session.input.clear(),
        _ => {}
    }
}

/// Input -> Analyzing, then run the analysis off the loop
pub fn handle_submit(state: &Arc<AppState>, session: &mut Session, events_tx: &AsyncSender<AppEvent>) {
    if session.view.state() != ViewState::Input {
        session.notify("Submit is only available on the input screen");
        return;
    }

    let text = match session.input.take_submission() {
        Ok(text) => text,
        Err(e) => {
            session.notify(e.to_string());
            return;
        }
    };

    if let Err(e) = session.view.submit() {
        tracing::warn!("Submit rejected: {}", e);
        return;
    }

    let assistant = state.assistant.clone();
    let tx = events_tx.clone();
    tokio::spawn(async move {
        let result = assistant.analyze(&text).await;
        if let Err(e) = tx.send(AppEvent::AnalysisFinished(result)).await {
            tracing::error!("Failed to deliver analysis result: {}", e);
        }
    });
}

pub fn handle_analysis_finished(
    session: &mut Session,
    result: Result<ArticleAnalysis, AnalysisError>,
) {
    let outcome = match result {
        Ok(analysis) => session.view.analysis_succeeded(analysis),
        Err(e) => {
            tracing::error!("Analysis failed: {}", e);
            session.view.analysis_failed(ANALYSIS_FAILED_MESSAGE)
        }
    };

    if let Err(e) = outcome {
        tracing::warn!("Analysis result arrived outside ANALYZING: {}", e);
    }
}
