use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use readedge_speech::SpeechEvent;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::events::{AppEvent, event_loop};
use crate::io::spawn_stdin_reader;
use crate::state::AppState;

/// Channels shared by the app tasks
pub struct ChannelSet {
    pub events: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
}

impl ChannelSet {
    pub fn new() -> Self {
        Self {
            events: kanal::bounded_async(64),
        }
    }
}

impl Default for ChannelSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Owns the task set and its shutdown token
pub struct AppController {
    channels: ChannelSet,
    state: Arc<AppState>,
    cancel_token: CancellationToken,
}

impl AppController {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            channels: ChannelSet::new(),
            state,
            cancel_token: CancellationToken::new(),
        }
    }

    /// Cancelled once the event loop handles `Quit`
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    pub fn spawn_tasks(
        &self,
        speech_events: Option<AsyncReceiver<SpeechEvent>>,
    ) -> anyhow::Result<JoinSet<anyhow::Result<()>>> {
        let mut tasks = JoinSet::new();

        // Event loop
        tasks.spawn(event_loop(
            self.state.clone(),
            self.channels.events.1.clone(),
            self.channels.events.0.clone(),
            self.cancel_token.clone(),
        ));

        // Terminal input, on a plain thread that is left behind at exit
        spawn_stdin_reader(
            self.channels.events.0.clone(),
            self.cancel_token.child_token(),
        )?;

        // Speech progress
        if let Some(speech_events) = speech_events {
            tasks.spawn(forward_speech(
                speech_events,
                self.channels.events.0.clone(),
                self.cancel_token.child_token(),
            ));
        }

        Ok(tasks)
    }

    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}

async fn forward_speech(
    speech_rx: AsyncReceiver<SpeechEvent>,
    events_tx: AsyncSender<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => break,
            event = speech_rx.recv() => event?,
        };

        tracing::trace!("Speech event: {:?}", event);
        if events_tx.send(AppEvent::Speech(event)).await.is_err() {
            break;
        }
    }

    Ok(())
}
