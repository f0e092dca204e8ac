//! Single shared speech channel.
//!
//! At most one utterance plays at a time. Starting a new one cancels the
//! current one and waits for it to wind down before the new engine call
//! begins. Every token gets exactly one terminal event.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use kanal::{AsyncReceiver, AsyncSender};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::engine::{SpeechEngine, Utterance};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechEvent {
    Started(u64),
    Finished(u64),
    Failed(u64, String),
    Cancelled(u64),
}

impl SpeechEvent {
    pub fn token(&self) -> u64 {
        match self {
            SpeechEvent::Started(t)
            | SpeechEvent::Finished(t)
            | SpeechEvent::Failed(t, _)
            | SpeechEvent::Cancelled(t) => *t,
        }
    }

    /// Playback for this token is over
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SpeechEvent::Started(_))
    }
}

struct Active {
    token: u64,
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

pub struct Speaker {
    engine: Arc<dyn SpeechEngine>,
    /// `None` is idle
    active: Arc<Mutex<Option<Active>>>,
    /// Serializes speak/stop so cancel-then-start is atomic
    control: tokio::sync::Mutex<()>,
    next_token: AtomicU64,
    events: AsyncSender<SpeechEvent>,
}

impl Speaker {
    pub fn new(engine: Arc<dyn SpeechEngine>) -> (Self, AsyncReceiver<SpeechEvent>) {
        let (events, events_rx) = kanal::unbounded_async();
        let speaker = Self {
            engine,
            active: Arc::new(Mutex::new(None)),
            control: tokio::sync::Mutex::new(()),
            next_token: AtomicU64::new(1),
            events,
        };
        (speaker, events_rx)
    }

    /// Token of the utterance currently playing
    pub fn current(&self) -> Option<u64> {
        self.active
            .lock()
            .ok()
            .and_then(|active| active.as_ref().map(|a| a.token))
    }

    /// Cancel whatever is playing, then start `utterance`
    pub async fn speak(&self, utterance: Utterance) -> u64 {
        let _control = self.control.lock().await;
        self.cancel_active().await;

        let token = self.next_token.fetch_add(1, Ordering::SeqCst);
        let cancel = CancellationToken::new();
        let _ = self.events.try_send(SpeechEvent::Started(token));
        tracing::debug!("Speech #{} started ({} chars)", token, utterance.text.len());

        let Ok(mut active) = self.active.lock() else {
            tracing::error!("Speech state poisoned, dropping utterance #{}", token);
            return token;
        };

        let handle = tokio::spawn(run_utterance(
            self.engine.clone(),
            utterance,
            token,
            cancel.clone(),
            self.active.clone(),
            self.events.clone(),
        ));
        *active = Some(Active {
            token,
            cancel,
            handle,
        });

        token
    }

    /// Stop playback; returns the token that was cancelled, if any
    pub async fn stop(&self) -> Option<u64> {
        let _control = self.control.lock().await;
        self.cancel_active().await
    }

    async fn cancel_active(&self) -> Option<u64> {
        let previous = self.active.lock().ok().and_then(|mut active| active.take())?;

        previous.cancel.cancel();
        if let Err(e) = previous.handle.await {
            tracing::error!("Speech task #{} panicked: {}", previous.token, e);
        }

        tracing::debug!("Speech #{} cancelled", previous.token);
        let _ = self.events.try_send(SpeechEvent::Cancelled(previous.token));
        Some(previous.token)
    }
}

async fn run_utterance(
    engine: Arc<dyn SpeechEngine>,
    utterance: Utterance,
    token: u64,
    cancel: CancellationToken,
    active: Arc<Mutex<Option<Active>>>,
    events: AsyncSender<SpeechEvent>,
) {
    let result = tokio::select! {
        _ = cancel.cancelled() => return,
        result = engine.speak(&utterance) => result,
    };

    // Whoever takes the slot owns the terminal event: here, or cancel_active
    let still_current = active
        .lock()
        .ok()
        .map(|mut slot| match slot.as_ref() {
            Some(a) if a.token == token => {
                slot.take();
                true
            }
            _ => false,
        })
        .unwrap_or(false);

    if !still_current {
        return;
    }

    let event = match result {
        Ok(()) => SpeechEvent::Finished(token),
        Err(e) => {
            tracing::warn!("Speech #{} failed: {}", token, e);
            SpeechEvent::Failed(token, e.to_string())
        }
    };
    let _ = events.try_send(event);
}
