use std::fmt::Write;
use std::sync::Arc;

use readedge_config::ui::UiConfig;
use readedge_core::text::selectable_tokens;
use readedge_core::view::{CardStatus, WordCard};
use readedge_types::{ArticleAnalysis, InputMode, SavedWord, ViewState};
use tokio::io::AsyncWriteExt;

use crate::AppState;
use crate::session::{PlaybackTarget, Session};

pub const HELP: &str = "\
input:    paste (lines until .end) | text <line> | sample | link <url> | file <path> | clear | submit | book
reading:  word <seg> <n> | vocab <seg> <n> | play <seg> | stop | back
book:     open <n> | remove <word> | back
card:     save | say | close
anywhere: help | quit";

/// Draw the current screen to stdout
pub async fn present(state: &Arc<AppState>, session: &mut Session) -> anyhow::Result<()> {
    let ui = state.config.read().await.ui.clone();
    let screen = render(session, &ui);

    let mut stdout = tokio::io::stdout();
    stdout.write_all(screen.as_bytes()).await?;
    stdout.flush().await?;
    Ok(())
}

/// Full screen text; consumes the pending notice
pub fn render(session: &mut Session, ui: &UiConfig) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = write_screen(&mut out, session, ui);

    if let Some(card) = session.view.card() {
        let _ = write_card(&mut out, card);
    }
    if let Some(notice) = session.take_notice() {
        let _ = writeln!(out, "\n{notice}");
    }
    out.push_str("> ");
    out
}

fn write_screen(out: &mut String, session: &Session, ui: &UiConfig) -> std::fmt::Result {
    let state = session.view.state();
    writeln!(out, "\n=== ReadEdge [{state}] ===")?;

    match state {
        ViewState::Input => write_input(out, session, ui),
        ViewState::Analyzing => writeln!(out, "Analyzing article..."),
        ViewState::Reading => match session.view.analysis() {
            Some(analysis) => write_article(out, session, analysis, ui),
            None => Ok(()),
        },
        ViewState::WordBook => write_word_book(out, &session.saved_words),
        ViewState::Error => writeln!(
            out,
            "{}\n(back to return)",
            session.view.error().unwrap_or_default()
        ),
    }
}

fn preview(text: &str, chars: usize) -> String {
    let mut shown: String = text.chars().take(chars).collect();
    if text.chars().count() > chars {
        shown.push_str("...");
    }
    shown.replace('\n', " ")
}

fn write_input(out: &mut String, session: &Session, ui: &UiConfig) -> std::fmt::Result {
    if let Some(error) = session.view.error() {
        writeln!(out, "! {error}")?;
    }

    let input = &session.input;
    match input.mode() {
        InputMode::Text if input.text().is_empty() => {
            writeln!(out, "Paste an article, or try `sample`.")?;
        }
        InputMode::Text => {
            writeln!(out, "Text ({} chars): {}", input.text().chars().count(), preview(input.text(), ui.preview_chars))?;
        }
        InputMode::Link => writeln!(out, "Link: {}", input.url())?,
        InputMode::File => {
            let name = input.file().map(|p| p.display().to_string()).unwrap_or_default();
            writeln!(out, "File: {name}")?;
            writeln!(out, "  {}", preview(input.text(), ui.preview_chars))?;
        }
    }

    if input.can_submit() {
        writeln!(out, "Ready: `submit` to analyze.")?;
    }
    Ok(())
}

fn write_article(
    out: &mut String,
    session: &Session,
    analysis: &ArticleAnalysis,
    ui: &UiConfig,
) -> std::fmt::Result {
    writeln!(out, "{}", analysis.title)?;
    writeln!(out, "{} segments", analysis.segments.len())?;

    for (i, segment) in analysis.segments.iter().enumerate() {
        let playing = if session.is_playing(PlaybackTarget::Segment(i)) {
            " (playing)"
        } else {
            ""
        };
        writeln!(out, "\n[{}]{playing} {}", i + 1, segment.original_text)?;

        let words: Vec<String> = selectable_tokens(&segment.original_text)
            .iter()
            .enumerate()
            .map(|(n, token)| format!("{}:{token}", n + 1))
            .collect();
        writeln!(out, "    words: {}", words.join(" "))?;

        if ui.show_translation {
            writeln!(out, "    translation: {}", segment.translated_text)?;
        }
        for (n, item) in segment.vocabulary.iter().enumerate() {
            let phonetic = item.phonetic.as_deref().map(|p| format!(" {p}")).unwrap_or_default();
            writeln!(
                out,
                "    vocab {}. {}{phonetic} ({}) {}",
                n + 1,
                item.word,
                item.importance,
                item.definition
            )?;
        }
    }
    Ok(())
}

fn write_word_book(out: &mut String, words: &[SavedWord]) -> std::fmt::Result {
    writeln!(out, "Word book ({} saved)", words.len())?;
    if words.is_empty() {
        return writeln!(out, "No saved words yet.");
    }

    for (i, saved) in words.iter().enumerate() {
        let detail = &saved.detail;
        writeln!(
            out,
            "{}. {} {} [{}] - {}",
            i + 1,
            detail.word,
            detail.phonetic,
            detail.part_of_speech,
            detail.definition
        )?;
    }
    Ok(())
}

fn write_card(out: &mut String, card: &WordCard) -> std::fmt::Result {
    let mark = if card.saved { "*" } else { " " };
    writeln!(out, "\n--- {mark} {} ---", card.word)?;

    match &card.status {
        CardStatus::Loading => writeln!(out, "Loading...")?,
        CardStatus::Failed(message) => writeln!(out, "{message}")?,
        CardStatus::Ready(detail) => {
            writeln!(out, "{} {} ({})", detail.word, detail.phonetic, detail.part_of_speech)?;
            writeln!(out, "{}", detail.definition)?;
            writeln!(out, "Example: {}", detail.example_sentence)?;
            writeln!(out, "Tip: {}", detail.usage_tips)?;
            let action = if card.saved { "unsave" } else { "save" };
            writeln!(out, "({action} with `save`, `say` to hear it, `close`)")?;
        }
    }
    Ok(())
}
