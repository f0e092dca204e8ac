use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use readedge_ai::{AnalysisError, LookupError};
use readedge_speech::SpeechEvent;
use readedge_types::{ArticleAnalysis, Command, WordDetail};
use tokio_util::sync::CancellationToken;

use crate::session::Session;
use crate::state::AppState;

pub mod lookup_word;
pub mod speech;
pub mod submit_article;
pub mod word_book;

use lookup_word::{handle_lookup_finished, handle_select_token, handle_select_vocab};
use speech::{handle_play_segment, handle_say_word, handle_speech_event, handle_stop_speech};
use submit_article::{handle_analysis_finished, handle_input_command, handle_submit};
use word_book::{handle_open_saved, handle_open_word_book, handle_remove, handle_toggle_save};

#[derive(Debug)]
pub enum AppEvent {
    Command(Command),
    /// Unparseable terminal line
    InvalidCommand(String),
    AnalysisFinished(Result<ArticleAnalysis, AnalysisError>),
    LookupFinished {
        request_id: u64,
        result: Result<WordDetail, LookupError>,
    },
    Speech(SpeechEvent),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// App's main loop: owns the session and renders after every event
pub async fn event_loop(
    state: Arc<AppState>,
    events_rx: AsyncReceiver<AppEvent>,
    events_tx: AsyncSender<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let mut session = Session::new();
    crate::ui::present(&state, &mut session).await?;

    tracing::info!("[EVENT_LOOP] Starting main loop, waiting for events");
    loop {
        // Queued events are handled before cancellation is noticed
        let event = tokio::select! {
            biased;
            event = events_rx.recv() => event?,
            _ = cancel.cancelled() => break,
        };

        tracing::debug!(
            "[EVENT_LOOP] EVENT RECEIVED: {:?}",
            std::mem::discriminant(&event)
        );

        if handle_events(&state, &mut session, &events_tx, event).await? == Flow::Quit {
            tracing::info!("Quit requested");
            cancel.cancel();
            break;
        }

        crate::ui::present(&state, &mut session).await?;
    }

    if let Some(speaker) = &state.speaker {
        speaker.stop().await;
    }

    Ok(())
}

pub async fn handle_events(
    state: &Arc<AppState>,
    session: &mut Session,
    events_tx: &AsyncSender<AppEvent>,
    event: AppEvent,
) -> anyhow::Result<Flow> {
    match event {
        AppEvent::Command(command) => return handle_command(state, session, events_tx, command).await,
        AppEvent::InvalidCommand(line) => {
            session.notify(format!("Unknown command: {line} (type `help`)"));
        }
        AppEvent::AnalysisFinished(result) => {
            handle_analysis_finished(session, result);
        }
        AppEvent::LookupFinished { request_id, result } => {
            handle_lookup_finished(state, session, request_id, result).await;
        }
        AppEvent::Speech(event) => {
            handle_speech_event(session, event);
        }
    }

    Ok(Flow::Continue)
}

async fn handle_command(
    state: &Arc<AppState>,
    session: &mut Session,
    events_tx: &AsyncSender<AppEvent>,
    command: Command,
) -> anyhow::Result<Flow> {
    match command {
        Command::AppendText(_)
        | Command::LoadSample
        | Command::Link(_)
        | Command::File(_)
        | Command::Clear => {
            handle_input_command(session, command).await;
        }
        Command::Submit => {
            handle_submit(state, session, events_tx);
        }
        Command::OpenWordBook => {
            handle_open_word_book(state, session).await;
        }
        Command::Back => {
            if let Some(speaker) = &state.speaker
                && session.playing.is_some()
            {
                speaker.stop().await;
            }
            match session.view.back() {
                Ok(()) => {
                    session.saved_words.clear();
                    session.playing = None;
                }
                Err(e) => {
                    tracing::debug!("Back ignored: {}", e);
                    session.notify("Nothing to go back to");
                }
            }
        }
        Command::SelectToken { segment, token } => {
            handle_select_token(state, session, events_tx, segment, token).await;
        }
        Command::SelectVocab { segment, item } => {
            handle_select_vocab(state, session, events_tx, segment, item).await;
        }
        Command::OpenSaved(index) => {
            handle_open_saved(state, session, events_tx, index).await;
        }
        Command::ToggleSave => {
            handle_toggle_save(state, session).await;
        }
        Command::Remove(word) => {
            handle_remove(state, session, &word).await;
        }
        Command::CloseCard => {
            session.view.close_card();
        }
        Command::PlaySegment(index) => {
            handle_play_segment(state, session, index).await;
        }
        Command::SayWord => {
            handle_say_word(state, session).await;
        }
        Command::StopSpeech => {
            handle_stop_speech(state, session).await;
        }
        Command::Help => {
            session.notify(crate::ui::HELP);
        }
        Command::Quit => return Ok(Flow::Quit),
    }

    Ok(Flow::Continue)
}
