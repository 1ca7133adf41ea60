//! Persistence abstraction over a single-table key-value backend.
//!
//! One item per character, partition key `character_id`. Queries by player id
//! are full-table scans with an equality filter; nothing is indexed. Two
//! backends: an in-memory map and a JSON file table.

use crate::model::Character;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;
use tokio::fs;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

/// Errors from store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported table version: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}

/// Key-value storage contract for character records.
///
/// `put` is an idempotent upsert keyed by `character_id`. The backend
/// guarantees per-item atomicity and nothing more; no transaction spans
/// operations, so concurrent writers to the same id race (last writer wins).
#[async_trait]
pub trait CharacterStore: Send + Sync {
    /// Insert or replace the record under this character's id.
    async fn put(&self, character: Character) -> Result<Character, StoreError>;

    /// Point lookup by partition key.
    async fn get_by_id(&self, character_id: &str) -> Result<Option<Character>, StoreError>;

    /// Full-table scan.
    async fn scan_all(&self) -> Result<Vec<Character>, StoreError>;

    /// Full-table scan filtered on `player_id` equality.
    async fn scan_by_player_id(&self, player_id: &str) -> Result<Vec<Character>, StoreError>;

    /// Delete by partition key. Deleting an absent id is not an error.
    async fn delete_by_id(&self, character_id: &str) -> Result<(), StoreError>;
}

/// In-memory table. The default backend, and the one tests run against.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<String, Character>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CharacterStore for MemoryStore {
    async fn put(&self, character: Character) -> Result<Character, StoreError> {
        let mut records = self.records.write().await;
        records.insert(character.character_id.clone(), character.clone());
        Ok(character)
    }

    async fn get_by_id(&self, character_id: &str) -> Result<Option<Character>, StoreError> {
        let records = self.records.read().await;
        Ok(records.get(character_id).cloned())
    }

    async fn scan_all(&self) -> Result<Vec<Character>, StoreError> {
        let records = self.records.read().await;
        Ok(records.values().cloned().collect())
    }

    async fn scan_by_player_id(&self, player_id: &str) -> Result<Vec<Character>, StoreError> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .filter(|character| character.player_id == player_id)
            .cloned()
            .collect())
    }

    async fn delete_by_id(&self, character_id: &str) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        records.remove(character_id);
        Ok(())
    }
}

/// Current table file version.
const TABLE_VERSION: u32 = 1;

/// On-disk layout: a versioned envelope around the whole table.
#[derive(Debug, Serialize, Deserialize)]
struct TableFile {
    /// Format version for compatibility checking.
    version: u32,
    characters: Vec<Character>,
}

/// Single-file JSON table.
///
/// Mutations are whole-table read/modify/write cycles serialized behind a
/// mutex, which provides the per-item atomicity the service layer assumes.
/// A missing file reads as an empty table.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    async fn load(&self) -> Result<Vec<Character>, StoreError> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let table: TableFile = serde_json::from_str(&content)?;
        if table.version != TABLE_VERSION {
            return Err(StoreError::VersionMismatch {
                expected: TABLE_VERSION,
                found: table.version,
            });
        }
        Ok(table.characters)
    }

    async fn save(&self, characters: Vec<Character>) -> Result<(), StoreError> {
        let table = TableFile {
            version: TABLE_VERSION,
            characters,
        };
        let content = serde_json::to_string_pretty(&table)?;
        fs::write(&self.path, content).await?;
        Ok(())
    }
}

#[async_trait]
impl CharacterStore for JsonFileStore {
    async fn put(&self, character: Character) -> Result<Character, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut characters = self.load().await?;

        match characters
            .iter_mut()
            .find(|existing| existing.character_id == character.character_id)
        {
            Some(existing) => *existing = character.clone(),
            None => characters.push(character.clone()),
        }

        debug!(character_id = %character.character_id, path = %self.path.display(), "wrote record");
        self.save(characters).await?;
        Ok(character)
    }

    async fn get_by_id(&self, character_id: &str) -> Result<Option<Character>, StoreError> {
        let characters = self.load().await?;
        Ok(characters
            .into_iter()
            .find(|character| character.character_id == character_id))
    }

    async fn scan_all(&self) -> Result<Vec<Character>, StoreError> {
        self.load().await
    }

    async fn scan_by_player_id(&self, player_id: &str) -> Result<Vec<Character>, StoreError> {
        let characters = self.load().await?;
        Ok(characters
            .into_iter()
            .filter(|character| character.player_id == player_id)
            .collect())
    }

    async fn delete_by_id(&self, character_id: &str) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut characters = self.load().await?;
        characters.retain(|character| character.character_id != character_id);
        self.save(characters).await
    }
}
