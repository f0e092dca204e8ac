use std::sync::Arc;

use kanal::AsyncSender;
use readedge_ai::LookupError;
use readedge_core::text::selectable_tokens;
use readedge_core::view::{CardStatus, INVALID_WORD_MESSAGE, LOOKUP_FAILED_MESSAGE};
use readedge_types::{ArticleSegment, ViewState, WordDetail};

use crate::AppState;
use crate::events::AppEvent;
use crate::events::word_book::sync_card_saved;
use crate::session::Session;

fn segment(session: &mut Session, index: usize) -> Option<ArticleSegment> {
    if session.view.state() != ViewState::Reading {
        session.notify("Open an article first");
        return None;
    }

    let found = index
        .checked_sub(1)
        .and_then(|i| session.view.analysis()?.segments.get(i).cloned());
    if found.is_none() {
        session.notify(format!("No segment {index}"));
    }
    found
}

/// A word clicked in the article body; the whole segment is its context
pub async fn handle_select_token(
    state: &Arc<AppState>,
    session: &mut Session,
    events_tx: &AsyncSender<AppEvent>,
    segment_index: usize,
    token_index: usize,
) {
    let Some(segment) = segment(session, segment_index) else {
        return;
    };

    let token = token_index
        .checked_sub(1)
        .and_then(|i| selectable_tokens(&segment.original_text).get(i).map(|t| t.to_string()));

    match token {
        Some(word) => open_word(state, session, events_tx, word, Some(segment.original_text)).await,
        None => session.notify(format!("Segment {segment_index} has no word {token_index}")),
    }
}

/// A key vocabulary entry from the segment sidebar
pub async fn handle_select_vocab(
    state: &Arc<AppState>,
    session: &mut Session,
    events_tx: &AsyncSender<AppEvent>,
    segment_index: usize,
    item_index: usize,
) {
    let Some(segment) = segment(session, segment_index) else {
        return;
    };

    let word = item_index
        .checked_sub(1)
        .and_then(|i| segment.vocabulary.get(i))
        .map(|v| v.word.clone());

    match word {
        Some(word) => open_word(state, session, events_tx, word, Some(segment.original_text)).await,
        None => session.notify(format!("Segment {segment_index} has no vocabulary item {item_index}")),
    }
}

/// Open a card and start a fresh lookup for it
pub async fn open_word(
    state: &Arc<AppState>,
    session: &mut Session,
    events_tx: &AsyncSender<AppEvent>,
    word: String,
    context: Option<String>,
) {
    let Some(ticket) = session.view.open_card(word, context) else {
        session.notify("Words can only be opened while reading or in the word book");
        return;
    };

    sync_card_saved(state, session).await;

    let assistant = state.assistant.clone();
    let tx = events_tx.clone();
    tokio::spawn(async move {
        let result = assistant
            .lookup(&ticket.word, ticket.context.as_deref())
            .await;
        let event = AppEvent::LookupFinished {
            request_id: ticket.request_id,
            result,
        };
        if let Err(e) = tx.send(event).await {
            tracing::error!("Failed to deliver lookup result: {}", e);
        }
    });
}

pub async fn handle_lookup_finished(
    state: &Arc<AppState>,
    session: &mut Session,
    request_id: u64,
    result: Result<WordDetail, LookupError>,
) {
    let status = match result {
        Ok(detail) => CardStatus::Ready(detail),
        Err(LookupError::InvalidWord(word)) => {
            tracing::debug!("Invalid word selection: {:?}", word);
            CardStatus::Failed(INVALID_WORD_MESSAGE.to_string())
        }
        Err(e) => {
            tracing::error!("Word lookup failed: {}", e);
            CardStatus::Failed(LOOKUP_FAILED_MESSAGE.to_string())
        }
    };

    let loaded = matches!(status, CardStatus::Ready(_));
    if session.view.complete_lookup(request_id, status) && loaded {
        sync_card_saved(state, session).await;
    }
}
