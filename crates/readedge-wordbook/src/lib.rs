mod book;
mod store;

pub use book::{WORD_BOOK_KEY, WordBook};
pub use store::{FileStore, KeyValueStore, MemoryStore};

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Failed to read {key}: {source}")]
    Read {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// Data is present but unreadable; distinct from "nothing saved yet"
    #[error("Stored {key} is corrupt: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write {key}: {source}")]
    Write {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode word book: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Failed to create data directory {path}: {source}")]
    DataDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
