use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use readedge_ai::{GeminiClient, StudyAssistant};
use readedge_app::AppState;
use readedge_app::controller::AppController;
use readedge_config::Config;
use readedge_speech::{CommandEngine, Speaker};
use readedge_wordbook::{FileStore, WordBook};
use tokio::task::JoinSet;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

/// Read an article with a language tutor at your side
#[derive(Debug, Parser)]
#[command(name = "readedge", version)]
struct Args {
    /// JSON config file; missing means defaults
    #[arg(long, default_value = "readedge.json")]
    config: PathBuf,

    /// Where the word book is stored
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Gemini model name
    #[arg(long)]
    model: Option<String>,

    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    /// Turn off read-aloud
    #[arg(long)]
    no_speech: bool,
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Pretty => builder
            .with_ansi(atty::is(atty::Stream::Stderr))
            .init(),
        LogFormat::Json => builder.json().init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    dotenvy::dotenv().ok();
    init_tracing(args.log_format);

    let mut config = Config::load(&args.config)?;
    if let Some(data_dir) = args.data_dir {
        config.storage.data_dir = data_dir;
    }
    if let Some(model) = args.model {
        config.gemini.model = model;
    }
    if args.no_speech {
        config.speech.enabled = false;
    }
    config.validate()?;

    let backend = GeminiClient::new(&config.gemini).context("Failed to build Gemini client")?;
    let assistant = StudyAssistant::new(Arc::new(backend));
    tracing::info!(model = %config.gemini.model, "Study assistant ready");

    let data_dir = config.storage.data_dir.clone();
    tokio::fs::create_dir_all(&data_dir)
        .await
        .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;
    let word_book = WordBook::new(Arc::new(FileStore::new(&data_dir)));
    tracing::info!("Word book stored in {:?}", data_dir);

    let (speaker, speech_events) = if config.speech.enabled {
        let engine = CommandEngine::from_config(&config.speech);
        let (speaker, events) = Speaker::new(Arc::new(engine));
        (Some(speaker), Some(events))
    } else {
        (None, None)
    };

    let state = Arc::new(AppState::new(config, assistant, word_book, speaker));
    let controller = AppController::new(state);
    let quit = controller.cancel_token();
    let mut tasks = controller.spawn_tasks(speech_events)?;

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown requested");
        }
        _ = quit.cancelled() => {
            tracing::debug!("Event loop finished");
        }
        _ = watch_tasks(&mut tasks) => {}
    }

    controller.shutdown();
    while let Some(result) = tasks.join_next().await {
        if let Ok(Err(e)) = result {
            tracing::debug!("task exited with error during shutdown: {e}");
        }
    }

    Ok(())
}

/// Resolves when a task fails, or when every task is done
async fn watch_tasks(tasks: &mut JoinSet<anyhow::Result<()>>) {
    while let Some(result) = tasks.join_next().await {
        match result {
            Ok(Ok(())) => tracing::debug!("task finished"),
            Ok(Err(e)) => {
                tracing::error!("task failed: {e}");
                return;
            }
            Err(e) => {
                tracing::error!("task panicked: {e}");
                return;
            }
        }
    }
}
