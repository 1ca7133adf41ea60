//! Character records for a tabletop-style game.
//!
//! This crate provides:
//! - The persisted character model (wire-compatible field layout)
//! - The experience/level threshold table
//! - A key-value store abstraction with in-memory and JSON file backends
//! - The character service: validation, creation defaults, progression
//!
//! # Quick Start
//!
//! ```ignore
//! use characters_core::{Character, CharacterService, ExperienceTable, MemoryStore};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let service =
//!         CharacterService::new(Arc::new(MemoryStore::new()), ExperienceTable::default());
//!
//!     let aria = service
//!         .create_character(Character::new("p1", "Aria").with_class("Wizard"))
//!         .await?;
//!     println!("{} starts at level {}", aria.name, aria.level);
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod experience;
pub mod model;
pub mod service;
pub mod store;

// Primary public API
pub use error::CharacterError;
pub use experience::{ExperienceTable, MAX_LEVEL};
pub use model::{starter_kit, Character, CurrentStatus, InventoryItem, Stats};
pub use service::{base_hp_for_class, CharacterService, ProgressionInfo};
pub use store::{CharacterStore, JsonFileStore, MemoryStore, StoreError};
