use std::sync::Arc;

use readedge_speech::{SpeechEvent, Utterance};
use readedge_types::ViewState;

use crate::AppState;
use crate::session::{Playback, PlaybackTarget, Session};

/// Play a segment's original text; playing the same segment again stops it
pub async fn handle_play_segment(state: &Arc<AppState>, session: &mut Session, index: usize) {
    let Some(speaker) = &state.speaker else {
        session.notify("Speech is disabled");
        return;
    };

    if session.view.state() != ViewState::Reading {
        session.notify("Open an article first");
        return;
    }

    let Some(zero_based) = index.checked_sub(1) else {
        session.notify(format!("No segment {index}"));
        return;
    };
    let Some(text) = session
        .view
        .analysis()
        .and_then(|a| a.segments.get(zero_based))
        .map(|s| s.original_text.clone())
    else {
        session.notify(format!("No segment {index}"));
        return;
    };

    let target = PlaybackTarget::Segment(zero_based);
    if session.is_playing(target) {
        speaker.stop().await;
        session.playing = None;
        return;
    }

    let utterance = {
        let config = state.config.read().await;
        Utterance {
            text,
            locale: config.speech.locale.clone(),
            rate: config.speech.segment_rate,
        }
    };

    let token = speaker.speak(utterance).await;
    session.playing = Some(Playback { target, token });
}

/// Pronounce the word on the open card
pub async fn handle_say_word(state: &Arc<AppState>, session: &mut Session) {
    let Some(speaker) = &state.speaker else {
        session.notify("Speech is disabled");
        return;
    };

    let Some(word) = session
        .view
        .card()
        .and_then(|card| card.detail())
        .map(|detail| detail.word.clone())
    else {
        session.notify("No word details to pronounce");
        return;
    };

    let utterance = {
        let config = state.config.read().await;
        Utterance {
            text: word,
            locale: config.speech.locale.clone(),
            rate: config.speech.word_rate,
        }
    };

    let token = speaker.speak(utterance).await;
    session.playing = Some(Playback {
        target: PlaybackTarget::Word,
        token,
    });
}

pub async fn handle_stop_speech(state: &Arc<AppState>, session: &mut Session) {
    if let Some(speaker) = &state.speaker {
        speaker.stop().await;
    }
    session.playing = None;
}

/// Reset the playing indicator once its utterance is over
pub fn handle_speech_event(session: &mut Session, event: SpeechEvent) {
    if let SpeechEvent::Failed(token, message) = &event {
        tracing::debug!("Speech #{} failed: {}", token, message);
    }

    if event.is_terminal() && session.playing.is_some_and(|p| p.token == event.token()) {
        session.playing = None;
    }
}
