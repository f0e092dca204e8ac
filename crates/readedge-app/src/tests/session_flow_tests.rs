use std::sync::Arc;
use std::time::Duration;

use readedge_ai::BackendError;
use readedge_core::view::{ANALYSIS_FAILED_MESSAGE, CardStatus, INVALID_WORD_MESSAGE};
use readedge_types::{Command, ViewState};
use readedge_wordbook::{MemoryStore, WORD_BOOK_KEY};
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use super::{CAT_ANALYSIS, CAT_DETAIL, Harness};
use crate::events::{AppEvent, Flow, event_loop};

#[tokio::test]
async fn test_submit_reaches_reading() {
    let mut h = Harness::new(None);
    h.read_cat_article().await;

    assert_eq!(h.session.view.state(), ViewState::Reading);
    let analysis = h.session.view.analysis().expect("analysis kept");
    assert_eq!(analysis.title, "Cats");
    assert_eq!(analysis.segments.len(), 1);
    assert_eq!(analysis.segments[0].vocabulary.len(), 1);

    let requests = h.backend.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].prompt.contains("Input Text:\nThe cat sat.\n"));
    assert!(h.session.input.text().is_empty());
}

#[tokio::test]
async fn test_failed_analysis_returns_to_input() {
    let mut h = Harness::new(None);
    h.backend.push_error(BackendError::RateLimitExceeded);

    h.command(Command::LoadSample).await;
    h.command(Command::Submit).await;
    assert_eq!(h.session.view.state(), ViewState::Analyzing);
    h.pump().await;

    assert_eq!(h.session.view.state(), ViewState::Input);
    assert_eq!(h.session.view.error(), Some(ANALYSIS_FAILED_MESSAGE));
}

#[tokio::test]
async fn test_malformed_analysis_is_a_failure() {
    let mut h = Harness::new(None);
    h.backend.push_text(r#"{"title": "Cats"}"#);

    h.command(Command::Link("https://example.com/cats".to_string()))
        .await;
    h.command(Command::Submit).await;
    h.pump().await;

    assert_eq!(h.session.view.state(), ViewState::Input);
    assert!(h.backend.requests()[0].prompt.contains("https://example.com/cats"));
}

#[tokio::test]
async fn test_empty_submit_is_rejected() {
    let mut h = Harness::new(None);
    h.command(Command::Submit).await;

    assert_eq!(h.session.view.state(), ViewState::Input);
    assert!(h.session.notice.is_some());
    assert!(h.backend.requests().is_empty());
}

#[tokio::test]
async fn test_word_lookup_fills_card() {
    let mut h = Harness::new(None);
    h.read_cat_article().await;

    h.backend.push_text(CAT_DETAIL);
    h.command(Command::SelectToken {
        segment: 1,
        token: 2,
    })
    .await;

    let card = h.session.view.card().expect("card open");
    assert_eq!(card.word, "cat");
    assert_eq!(card.status, CardStatus::Loading);
    assert_eq!(card.context.as_deref(), Some("The cat sat."));

    h.pump().await;
    let detail = h.session.view.card().and_then(|c| c.detail()).expect("detail");
    assert_eq!(detail.part_of_speech, "noun");

    let lookup = &h.backend.requests()[1];
    assert!(lookup.prompt.contains("\"cat\""));
    assert!(lookup.prompt.contains("The cat sat."));
}

#[tokio::test]
async fn test_invalid_word_never_reaches_backend() {
    let mut h = Harness::new(None);
    h.backend.push_text(
        &CAT_ANALYSIS.replace(r#""word": "cat""#, r#""word": "...""#),
    );
    h.command(Command::AppendText("The cat sat.".to_string()))
        .await;
    h.command(Command::Submit).await;
    h.pump().await;

    h.command(Command::SelectVocab { segment: 1, item: 1 }).await;
    h.pump().await;

    let card = h.session.view.card().expect("card open");
    assert_eq!(card.status, CardStatus::Failed(INVALID_WORD_MESSAGE.to_string()));
    assert_eq!(h.backend.requests().len(), 1);
}

#[tokio::test]
async fn test_stale_lookup_is_dropped() {
    let mut h = Harness::new(None);
    h.read_cat_article().await;

    h.command(Command::SelectToken {
        segment: 1,
        token: 1,
    })
    .await;
    let first = h.session.view.card().map(|c| c.request_id).expect("card");
    h.command(Command::SelectToken {
        segment: 1,
        token: 2,
    })
    .await;

    let detail = serde_json::from_str(CAT_DETAIL).expect("valid detail");
    h.send(AppEvent::LookupFinished {
        request_id: first,
        result: Ok(detail),
    })
    .await;

    let card = h.session.view.card().expect("card open");
    assert_eq!(card.word, "cat");
    assert_eq!(card.status, CardStatus::Loading);
}

#[tokio::test]
async fn test_toggle_save_and_word_book() {
    let mut h = Harness::new(None);
    h.read_cat_article().await;

    h.backend.push_text(CAT_DETAIL);
    h.command(Command::SelectVocab { segment: 1, item: 1 }).await;
    h.pump().await;

    h.command(Command::ToggleSave).await;
    assert!(h.session.view.card().expect("card").saved);
    let raw = h.store.raw(WORD_BOOK_KEY).expect("word book written");
    assert!(raw.contains("\"partOfSpeech\":\"noun\""));
    assert!(raw.contains("\"addedAt\""));

    h.command(Command::Back).await;
    assert_eq!(h.session.view.state(), ViewState::Input);
    assert!(h.session.view.card().is_none());

    h.command(Command::OpenWordBook).await;
    assert_eq!(h.session.view.state(), ViewState::WordBook);
    assert_eq!(h.session.saved_words.len(), 1);
    assert_eq!(h.session.saved_words[0].word(), "cat");

    h.command(Command::Remove("Cat".to_string())).await;
    assert!(h.session.saved_words.is_empty());
}

#[tokio::test]
async fn test_saved_word_reopens_with_saved_flag() {
    let mut h = Harness::new(None);
    let detail = serde_json::from_str(CAT_DETAIL).expect("valid detail");
    h.state.word_book.save(detail).await.expect("save");

    h.command(Command::OpenWordBook).await;
    h.backend.push_text(CAT_DETAIL);
    h.command(Command::OpenSaved(1)).await;

    let card = h.session.view.card().expect("card open");
    assert!(card.saved);
    assert_eq!(card.context.as_deref(), Some("The cat sat."));

    h.pump().await;
    h.command(Command::ToggleSave).await;
    assert!(!h.session.view.card().expect("card").saved);
    assert!(h.session.saved_words.is_empty());
}

#[tokio::test]
async fn test_corrupt_word_book_shows_empty() {
    let store = MemoryStore::with_value(WORD_BOOK_KEY, "{oops");
    let mut h = Harness::with_store(Arc::new(store), None);

    h.command(Command::OpenWordBook).await;
    assert_eq!(h.session.view.state(), ViewState::WordBook);
    assert!(h.session.saved_words.is_empty());
    assert_eq!(h.store.raw(WORD_BOOK_KEY).as_deref(), Some("{oops"));
}

#[tokio::test]
async fn test_input_edits_ignored_while_reading() {
    let mut h = Harness::new(None);
    h.read_cat_article().await;

    h.command(Command::AppendText("more".to_string())).await;
    assert!(h.session.input.text().is_empty());
    assert!(h.session.notice.is_some());
}

#[tokio::test]
async fn test_quit_and_invalid_line() {
    let mut h = Harness::new(None);
    assert_eq!(
        h.send(AppEvent::InvalidCommand("dance".to_string())).await,
        Flow::Continue
    );
    assert!(h.session.notice.as_deref().is_some_and(|n| n.contains("dance")));
    assert_eq!(h.command(Command::Quit).await, Flow::Quit);
}

#[tokio::test]
async fn test_card_saved_flag_follows_returned_headword() {
    let mut h = Harness::new(None);
    let detail = serde_json::from_str(CAT_DETAIL).expect("valid detail");
    h.state.word_book.save(detail).await.expect("save");
    h.read_cat_article().await;

    // Token 1 is "The"; the backend answers with the headword "cat"
    h.backend.push_text(CAT_DETAIL);
    h.command(Command::SelectToken {
        segment: 1,
        token: 1,
    })
    .await;
    assert!(!h.session.view.card().expect("card").saved);

    h.pump().await;
    assert!(h.session.view.card().expect("card").saved);

    h.command(Command::ToggleSave).await;
    assert!(!h.session.view.card().expect("card").saved);
    assert!(!h.state.word_book.is_saved("cat").await.expect("read"));

    h.command(Command::ToggleSave).await;
    assert!(h.session.view.card().expect("card").saved);
    assert!(h.state.word_book.is_saved("cat").await.expect("read"));
}

#[tokio::test]
async fn test_save_from_unsaved_card_never_removes() {
    let mut h = Harness::new(None);
    h.read_cat_article().await;

    h.backend.push_text(CAT_DETAIL);
    h.command(Command::SelectToken {
        segment: 1,
        token: 1,
    })
    .await;
    h.pump().await;
    assert!(!h.session.view.card().expect("card").saved);

    // Saved elsewhere while the card was open; the card still shows unsaved
    let detail = serde_json::from_str(CAT_DETAIL).expect("valid detail");
    h.state.word_book.save(detail).await.expect("save");

    h.command(Command::ToggleSave).await;
    assert!(h.session.view.card().expect("card").saved);
    assert_eq!(h.state.word_book.list().await.expect("list").len(), 1);
}

#[tokio::test]
async fn test_event_loop_handles_queued_commands_before_shutdown() {
    let h = Harness::new(None);
    let detail = serde_json::from_str(CAT_DETAIL).expect("valid detail");
    h.state.word_book.save(detail).await.expect("save");

    h.events_tx
        .send(AppEvent::Command(Command::Remove("cat".to_string())))
        .await
        .expect("send");
    h.events_tx
        .send(AppEvent::Command(Command::Quit))
        .await
        .expect("send");

    let cancel = CancellationToken::new();
    cancel.cancel();

    timeout(
        Duration::from_secs(2),
        event_loop(
            h.state.clone(),
            h.events_rx.clone(),
            h.events_tx.clone(),
            cancel,
        ),
    )
    .await
    .expect("event loop did not stop")
    .expect("event loop failed");

    assert!(!h.state.word_book.is_saved("cat").await.expect("read"));
}

#[tokio::test]
async fn test_quit_cancels_the_app() {
    let h = Harness::new(None);
    h.events_tx
        .send(AppEvent::Command(Command::Quit))
        .await
        .expect("send");

    let cancel = CancellationToken::new();
    timeout(
        Duration::from_secs(2),
        event_loop(
            h.state.clone(),
            h.events_rx.clone(),
            h.events_tx.clone(),
            cancel.clone(),
        ),
    )
    .await
    .expect("event loop did not stop")
    .expect("event loop failed");

    assert!(cancel.is_cancelled());
}
