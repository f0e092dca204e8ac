use std::io::BufRead;

use kanal::AsyncSender;
use readedge_types::Command;
use tokio_util::sync::CancellationToken;

use crate::events::AppEvent;

/// Line that closes a `paste` block
pub const PASTE_END: &str = ".end";

#[derive(Debug, Clone, PartialEq)]
pub enum Parsed {
    Command(Command),
    /// Following lines are article text until `.end`
    BeginPaste,
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unknown command `{0}`")]
    Unknown(String),
    #[error("`{command}` expects {expected}")]
    Usage {
        command: String,
        expected: &'static str,
    },
}

fn index(command: &str, arg: Option<&str>, expected: &'static str) -> Result<usize, ParseError> {
    arg.and_then(|a| a.parse().ok()).ok_or_else(|| ParseError::Usage {
        command: command.to_string(),
        expected,
    })
}

fn rest(command: &str, line: &str, expected: &'static str) -> Result<String, ParseError> {
    let value = line[command.len()..].trim();
    if value.is_empty() {
        return Err(ParseError::Usage {
            command: command.to_string(),
            expected,
        });
    }
    Ok(value.to_string())
}

/// Map one terminal line onto a command
pub fn parse_command(line: &str) -> Result<Parsed, ParseError> {
    let line = line.trim();
    let mut parts = line.split_whitespace();
    let Some(name) = parts.next() else {
        return Ok(Parsed::Empty);
    };

    let command = match name {
        "paste" => return Ok(Parsed::BeginPaste),
        "text" => Command::AppendText(rest(name, line, "the text to add")?),
        "sample" => Command::LoadSample,
        "link" => Command::Link(rest(name, line, "a URL")?),
        "file" => Command::File(rest(name, line, "a .txt or .md path")?),
        "clear" => Command::Clear,
        "submit" => Command::Submit,
        "book" => Command::OpenWordBook,
        "back" => Command::Back,
        "word" => Command::SelectToken {
            segment: index(name, parts.next(), "<segment> <word>")?,
            token: index(name, parts.next(), "<segment> <word>")?,
        },
        "vocab" => Command::SelectVocab {
            segment: index(name, parts.next(), "<segment> <item>")?,
            item: index(name, parts.next(), "<segment> <item>")?,
        },
        "open" => Command::OpenSaved(index(name, parts.next(), "<entry>")?),
        "save" => Command::ToggleSave,
        "remove" => Command::Remove(rest(name, line, "a word")?),
        "close" => Command::CloseCard,
        "play" => Command::PlaySegment(index(name, parts.next(), "<segment>")?),
        "say" => Command::SayWord,
        "stop" => Command::StopSpeech,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(ParseError::Unknown(other.to_string())),
    };

    Ok(Parsed::Command(command))
}

/// Collects pasted lines until the terminator
#[derive(Debug, Default)]
pub struct LineReader {
    paste: Option<Vec<String>>,
}

impl LineReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_paste(&self) -> bool {
        self.paste.is_some()
    }

    /// Feed one raw line; returns an event once something is complete
    pub fn feed(&mut self, line: &str) -> Option<AppEvent> {
        if let Some(buffer) = &mut self.paste {
            if line.trim() == PASTE_END {
                let text = buffer.join("\n");
                self.paste = None;
                return Some(AppEvent::Command(Command::AppendText(text)));
            }
            buffer.push(line.to_string());
            return None;
        }

        match parse_command(line) {
            Ok(Parsed::Command(command)) => Some(AppEvent::Command(command)),
            Ok(Parsed::BeginPaste) => {
                self.paste = Some(Vec::new());
                None
            }
            Ok(Parsed::Empty) => None,
            Err(e) => {
                tracing::debug!("Rejected input line: {}", e);
                Some(AppEvent::InvalidCommand(line.trim().to_string()))
            }
        }
    }
}

/// Forward lines from `input` until EOF, cancellation or a closed channel.
/// EOF quits the app.
pub fn read_lines<R: BufRead>(
    input: R,
    events_tx: &kanal::Sender<AppEvent>,
    cancel: &CancellationToken,
) -> anyhow::Result<()> {
    let mut reader = LineReader::new();

    for line in input.lines() {
        if cancel.is_cancelled() {
            return Ok(());
        }

        if let Some(event) = reader.feed(&line?) {
            events_tx.send(event)?;
        }
    }

    tracing::info!("stdin closed");
    if reader.in_paste() {
        tracing::warn!("Unterminated paste block discarded");
    }
    if !cancel.is_cancelled() {
        events_tx.send(AppEvent::Command(Command::Quit))?;
    }
    Ok(())
}

/// Stdin is read on its own thread: a pending blocking read must not hold
/// up runtime shutdown.
pub fn spawn_stdin_reader(
    events_tx: AsyncSender<AppEvent>,
    cancel: CancellationToken,
) -> std::io::Result<std::thread::JoinHandle<()>> {
    let events_tx = events_tx.to_sync();
    std::thread::Builder::new()
        .name("stdin-reader".to_string())
        .spawn(move || {
            let stdin = std::io::stdin();
            if let Err(e) = read_lines(stdin.lock(), &events_tx, &cancel) {
                tracing::debug!("stdin reader stopped: {}", e);
            }
        })
}
