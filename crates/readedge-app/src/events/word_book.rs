use std::sync::Arc;

use kanal::AsyncSender;
use readedge_types::ViewState;

use crate::AppState;
use crate::events::AppEvent;
use crate::events::lookup_word::open_word;
use crate::session::Session;

/// Re-read the book for the word book screen. Storage problems are logged
/// and show as an empty book.
pub async fn refresh_saved_words(state: &Arc<AppState>, session: &mut Session) {
    session.saved_words = match state.word_book.list().await {
        Ok(words) => words,
        Err(e) => {
            tracing::error!("Error reading word book: {}", e);
            Vec::new()
        }
    };
}

pub async fn handle_open_word_book(state: &Arc<AppState>, session: &mut Session) {
    if let Err(e) = session.view.open_word_book() {
        tracing::debug!("Word book not available: {}", e);
        session.notify("The word book opens from the input screen");
        return;
    }

    refresh_saved_words(state, session).await;
}

/// Saved entries are looked up fresh, using their example as context
pub async fn handle_open_saved(
    state: &Arc<AppState>,
    session: &mut Session,
    events_tx: &AsyncSender<AppEvent>,
    index: usize,
) {
    if session.view.state() != ViewState::WordBook {
        session.notify("Open the word book first");
        return;
    }

    let Some(saved) = index
        .checked_sub(1)
        .and_then(|i| session.saved_words.get(i))
        .cloned()
    else {
        session.notify(format!("No saved word {index}"));
        return;
    };

    open_word(
        state,
        session,
        events_tx,
        saved.detail.word,
        Some(saved.detail.example_sentence),
    )
    .await;
}

/// Save or unsave the word on the open card, following what the card shows
pub async fn handle_toggle_save(state: &Arc<AppState>, session: &mut Session) {
    let Some((request_id, shown_saved, detail)) = session
        .view
        .card()
        .map(|card| (card.request_id, card.saved, card.detail().cloned()))
    else {
        session.notify("No word card open");
        return;
    };
    let Some(detail) = detail else {
        session.notify("Wait for the word details to load");
        return;
    };

    let result = if shown_saved {
        state.word_book.remove(&detail.word).await.map(|_| false)
    } else {
        state.word_book.save(detail).await.map(|_| true)
    };

    match result {
        Ok(saved) => {
            session.view.set_saved(request_id, saved);
        }
        Err(e) => {
            tracing::error!("Error saving word: {}", e);
            return;
        }
    }

    if session.view.state() == ViewState::WordBook {
        refresh_saved_words(state, session).await;
    }
}

/// Recompute the open card's saved flag from the book. Once details are
/// loaded the returned headword decides, otherwise the selected token.
pub async fn sync_card_saved(state: &Arc<AppState>, session: &mut Session) {
    let Some((request_id, word)) = session.view.card().map(|card| {
        let word = card
            .detail()
            .map(|detail| detail.word.clone())
            .unwrap_or_else(|| card.word.clone());
        (card.request_id, word)
    }) else {
        return;
    };

    match state.word_book.is_saved(&word).await {
        Ok(saved) => {
            session.view.set_saved(request_id, saved);
        }
        Err(e) => tracing::error!("Error reading word book: {}", e),
    }
}

pub async fn handle_remove(state: &Arc<AppState>, session: &mut Session, word: &str) {
    match state.word_book.remove(word).await {
        Ok(true) => {}
        Ok(false) => {
            session.notify(format!("{word:?} is not in the word book"));
            return;
        }
        Err(e) => {
            tracing::error!("Error removing word: {}", e);
            return;
        }
    }

    sync_card_saved(state, session).await;

    if session.view.state() == ViewState::WordBook {
        refresh_saved_words(state, session).await;
    }
}
