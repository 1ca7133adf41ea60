//! Character lifecycle: validation, creation defaults, experience and
//! progression.
//!
//! The service is stateless. Every operation is one store read followed by at
//! most one write, so concurrent calls against the same id race only at the
//! store, where the last writer wins.

use crate::error::{CharacterError, Result};
use crate::experience::{ExperienceTable, MAX_LEVEL};
use crate::model::{starter_kit, Character, CurrentStatus, Stats};
use crate::store::CharacterStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Level 1 hit points granted by each class, before the constitution
/// modifier.
const CLASS_BASE_HP: &[(&str, i32)] = &[
    ("Barbarian", 12),
    ("Fighter", 10),
    ("Paladin", 10),
    ("Ranger", 10),
    ("Bard", 8),
    ("Cleric", 8),
    ("Druid", 8),
    ("Monk", 8),
    ("Rogue", 8),
    ("Warlock", 8),
    ("Sorcerer", 6),
    ("Wizard", 6),
];

/// Base HP for classes not in the table, and for characters with no class.
const DEFAULT_BASE_HP: i32 = 8;

/// Level 1 hit points for a class, before modifiers.
pub fn base_hp_for_class(class: Option<&str>) -> i32 {
    class
        .and_then(|name| CLASS_BASE_HP.iter().find(|(entry, _)| *entry == name))
        .map(|(_, hp)| *hp)
        .unwrap_or(DEFAULT_BASE_HP)
}

/// Snapshot of a character's position on the experience curve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressionInfo {
    pub current_level: i32,
    pub current_experience: i32,
    /// Cumulative XP threshold of the current level.
    pub experience_for_current_level: i32,
    /// Cumulative XP threshold of the next level; 0 at max level.
    pub experience_for_next_level: i32,
    /// XP still needed to reach the next level; 0 at max level. Goes negative
    /// when the stored level lags the experience total, which can happen
    /// after a full-replace update rewrites experience without re-deriving
    /// level.
    pub experience_needed: i32,
}

/// Stateless domain logic over a character store.
pub struct CharacterService {
    store: Arc<dyn CharacterStore>,
    experience: ExperienceTable,
}

impl CharacterService {
    /// Build a service over a store and an experience table. Both are plain
    /// constructor parameters; there is no other wiring.
    pub fn new(store: Arc<dyn CharacterStore>, experience: ExperienceTable) -> Self {
        Self { store, experience }
    }

    /// Create a character, filling in defaults for anything the payload left
    /// unset, and persist it.
    pub async fn create_character(&self, mut character: Character) -> Result<Character> {
        if character.player_id.is_empty() {
            return Err(CharacterError::Validation("Player ID is required".into()));
        }
        if character.name.is_empty() {
            return Err(CharacterError::Validation(
                "Character name is required".into(),
            ));
        }

        if character.character_id.is_empty() {
            character.character_id = Uuid::new_v4().to_string();
        }

        self.apply_creation_defaults(&mut character);

        info!(
            character_id = %character.character_id,
            player_id = %character.player_id,
            "creating character"
        );
        Ok(self.store.put(character).await?)
    }

    /// Fill unset fields: level, baseline stats, derived status, starting
    /// inventory. Status derivation reads the already-resolved constitution
    /// score. An unset experience field deserializes to 0 and needs nothing.
    fn apply_creation_defaults(&self, character: &mut Character) {
        if character.level == 0 {
            character.level = 1;
        }

        let stats = *character.stats.get_or_insert_with(Stats::default);

        if character.current_status.is_none() {
            let max_hp = base_hp_for_class(character.character_class.as_deref())
                + stats.constitution_modifier();
            character.current_status = Some(CurrentStatus {
                hp: max_hp,
                max_hp,
                condition: "Normal".to_string(),
                buffs: Vec::new(),
            });
        }

        if character.inventory.is_empty() {
            character.inventory = starter_kit();
        }
    }

    /// Look up a character by id. A miss is an error here, unlike the
    /// update/experience paths which return `None`.
    pub async fn get_character(&self, character_id: &str) -> Result<Character> {
        if character_id.is_empty() {
            return Err(CharacterError::NotFound(character_id.to_string()));
        }
        self.store
            .get_by_id(character_id)
            .await?
            .ok_or_else(|| CharacterError::NotFound(character_id.to_string()))
    }

    /// All characters owned by a player. An empty result is an error, not an
    /// empty list; existing callers depend on that contract.
    pub async fn characters_by_player(&self, player_id: &str) -> Result<Vec<Character>> {
        if player_id.is_empty() {
            return Err(CharacterError::Validation("Player ID is required".into()));
        }

        let characters = self.store.scan_by_player_id(player_id).await?;
        if characters.is_empty() {
            return Err(CharacterError::NoCharactersForPlayer(player_id.to_string()));
        }
        Ok(characters)
    }

    /// Replace a character wholesale, keeping its id. Returns `None` when no
    /// record with this id exists; nothing is created in that case.
    pub async fn update_character(
        &self,
        character_id: &str,
        mut updated: Character,
    ) -> Result<Option<Character>> {
        if self.store.get_by_id(character_id).await?.is_none() {
            return Ok(None);
        }

        // The id is immutable; whatever the payload carried is discarded.
        updated.character_id = character_id.to_string();
        debug!(character_id, "replacing character record");
        Ok(Some(self.store.put(updated).await?))
    }

    /// Delete by id. Deleting an id with no record is a no-op.
    pub async fn delete_character(&self, character_id: &str) -> Result<()> {
        info!(character_id, "deleting character");
        Ok(self.store.delete_by_id(character_id).await?)
    }

    /// Add (or subtract) experience and re-derive the level. The level only
    /// ever moves up; dropping below a threshold never demotes a character.
    /// Returns `None` when the id has no record.
    pub async fn add_experience(
        &self,
        character_id: &str,
        amount: i32,
    ) -> Result<Option<Character>> {
        let mut character = match self.store.get_by_id(character_id).await? {
            Some(character) => character,
            None => return Ok(None),
        };

        // No clamping: negative amounts may push the total below zero.
        character.experience += amount;

        let new_level = self.experience.level_for_experience(character.experience);
        if new_level > character.level {
            info!(
                character_id,
                from = character.level,
                to = new_level,
                "level up"
            );
            character.level = new_level;
        }

        Ok(Some(self.store.put(character).await?))
    }

    /// Where a character sits on the experience curve. Returns `None` when
    /// the id has no record.
    pub async fn progression_info(&self, character_id: &str) -> Result<Option<ProgressionInfo>> {
        let character = match self.store.get_by_id(character_id).await? {
            Some(character) => character,
            None => return Ok(None),
        };

        let current_level = character.level;
        let current_experience = character.experience;

        let (experience_for_next_level, experience_needed) = if current_level < MAX_LEVEL {
            let next = self.experience.threshold_for_level(current_level + 1);
            (next, next - current_experience)
        } else {
            (0, 0)
        };

        Ok(Some(ProgressionInfo {
            current_level,
            current_experience,
            experience_for_current_level: self.experience.threshold_for_level(current_level),
            experience_for_next_level,
            experience_needed,
        }))
    }

    /// Full-table scan.
    pub async fn all_characters(&self) -> Result<Vec<Character>> {
        Ok(self.store.scan_all().await?)
    }
}
