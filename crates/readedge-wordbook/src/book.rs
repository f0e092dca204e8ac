use std::collections::HashMap;
use std::sync::Arc;

use readedge_core::text::normalize_word;
use readedge_types::{SavedWord, WordDetail};
use tokio::sync::Mutex;

use crate::StorageError;
use crate::store::KeyValueStore;

pub const WORD_BOOK_KEY: &str = "wordBook";

/// Saved words keyed by lowercased word text.
///
/// Persisted as one JSON array under [`WORD_BOOK_KEY`]; every mutation
/// rewrites the whole array. All access goes through one lock, so concurrent
/// callers cannot interleave their read-modify-write cycles.
pub struct WordBook {
    store: Arc<dyn KeyValueStore>,
    lock: Mutex<()>,
}

type Entries = HashMap<String, SavedWord>;

impl WordBook {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            lock: Mutex::new(()),
        }
    }

    /// Newest first. A book that was never written is empty, not an error.
    pub async fn list(&self) -> Result<Vec<SavedWord>, StorageError> {
        let _guard = self.lock.lock().await;
        let entries = self.read_entries().await?;
        Ok(sorted(entries))
    }

    /// Case-insensitive membership check. The query matches either as typed
    /// or with punctuation stripped, so a clicked `"Cat,` finds `cat`.
    pub async fn is_saved(&self, word: &str) -> Result<bool, StorageError> {
        let exact = entry_key(word);
        let cleaned = normalize_word(word);

        let _guard = self.lock.lock().await;
        let entries = self.read_entries().await?;
        Ok(entries.contains_key(&exact) || (!cleaned.is_empty() && entries.contains_key(&cleaned)))
    }

    /// Insert or replace the entry for this word, stamped with the current
    /// time.
    pub async fn save(&self, detail: WordDetail) -> Result<SavedWord, StorageError> {
        let key = entry_key(&detail.word);

        let _guard = self.lock.lock().await;
        let mut entries = self.read_entries().await?;

        let saved = SavedWord::new(detail, chrono::Utc::now().timestamp_millis());
        if entries.insert(key, saved.clone()).is_some() {
            tracing::debug!("Replacing saved word {:?}", saved.word());
        }

        self.write_entries(&entries).await?;
        tracing::info!("Saved {:?} ({} words)", saved.word(), entries.len());
        Ok(saved)
    }

    /// Returns whether anything was removed. Absent words leave storage
    /// untouched.
    pub async fn remove(&self, word: &str) -> Result<bool, StorageError> {
        let key = entry_key(word);

        let _guard = self.lock.lock().await;
        let mut entries = self.read_entries().await?;

        if entries.remove(&key).is_none() {
            return Ok(false);
        }

        self.write_entries(&entries).await?;
        tracing::info!("Removed {:?} ({} words)", word, entries.len());
        Ok(true)
    }

    async fn read_entries(&self) -> Result<Entries, StorageError> {
        let Some(data) = self.store.get(WORD_BOOK_KEY).await? else {
            return Ok(Entries::new());
        };

        let list: Vec<SavedWord> =
            serde_json::from_str(&data).map_err(|source| StorageError::Corrupt {
                key: WORD_BOOK_KEY.to_string(),
                source,
            })?;

        let mut entries = Entries::with_capacity(list.len());
        for word in list {
            let key = entry_key(word.word());
            match entries.get(&key) {
                Some(existing) if existing.added_at >= word.added_at => {
                    tracing::warn!("Dropping duplicate saved word {:?}", word.word());
                }
                _ => {
                    entries.insert(key, word);
                }
            }
        }

        Ok(entries)
    }

    async fn write_entries(&self, entries: &Entries) -> Result<(), StorageError> {
        let list = sorted(entries.clone());
        let data = serde_json::to_string(&list).map_err(StorageError::Encode)?;
        self.store.set(WORD_BOOK_KEY, &data).await
    }
}

fn entry_key(word: &str) -> String {
    word.trim().to_lowercase()
}

fn sorted(entries: Entries) -> Vec<SavedWord> {
    let mut list: Vec<SavedWord> = entries.into_values().collect();
    list.sort_by(|a, b| {
        b.added_at
            .cmp(&a.added_at)
            .then_with(|| a.word().cmp(b.word()))
    });
    list
}
