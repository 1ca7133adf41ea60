//! The character operations, exposed as tools.
//!
//! Tool names and param names (`characterId`, `playerId`, `experienceToAdd`,
//! ...) are part of the published contract and must not change. Each tool is
//! a thin adapter: parse params, call the service, render the result.
//!
//! The miss behavior differs by operation, on purpose: `getCharacter` and
//! `getCharactersByPlayerId` raise, while `updateCharacter`, `addExperience`
//! and `getProgressionInfo` answer with an empty result.

use crate::error::ToolError;
use crate::tool::{Tool, ToolAnnotations, ToolOutput, ToolRegistry};
use async_trait::async_trait;
use characters_core::{Character, CharacterService};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

// =============================================================================
// Params and schemas
// =============================================================================

#[derive(Debug, Deserialize)]
struct CreateCharacterParams {
    character: Character,
}

#[derive(Debug, Deserialize)]
struct CharacterIdParams {
    #[serde(rename = "characterId")]
    character_id: String,
}

#[derive(Debug, Deserialize)]
struct PlayerIdParams {
    #[serde(rename = "playerId")]
    player_id: String,
}

#[derive(Debug, Deserialize)]
struct UpdateCharacterParams {
    #[serde(rename = "characterId")]
    character_id: String,
    #[serde(rename = "updatedCharacter")]
    updated_character: Character,
}

#[derive(Debug, Deserialize)]
struct AddExperienceParams {
    #[serde(rename = "characterId")]
    character_id: String,
    #[serde(rename = "experienceToAdd")]
    experience_to_add: i32,
}

/// Schema for the character payload, shared by create and update.
static CHARACTER_SCHEMA: Lazy<Value> = Lazy::new(|| {
    json!({
        "type": "object",
        "properties": {
            "character_id": { "type": "string" },
            "character_name": { "type": "string" },
            "player_id": { "type": "string" },
            "name": { "type": "string" },
            "class": { "type": "string" },
            "race": { "type": "string" },
            "gender": { "type": "string" },
            "level": { "type": "integer" },
            "experience": { "type": "integer" },
            "stats": {
                "type": "object",
                "properties": {
                    "strength": { "type": "integer" },
                    "dexterity": { "type": "integer" },
                    "constitution": { "type": "integer" },
                    "intelligence": { "type": "integer" },
                    "wisdom": { "type": "integer" },
                    "charisma": { "type": "integer" }
                }
            },
            "current_status": {
                "type": "object",
                "properties": {
                    "hp": { "type": "integer" },
                    "max_hp": { "type": "integer" },
                    "condition": { "type": "string" },
                    "buffs": { "type": "array", "items": { "type": "string" } }
                }
            },
            "inventory": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "item_name": { "type": "string" },
                        "quantity": { "type": "integer" }
                    },
                    "required": ["item_name", "quantity"]
                }
            }
        },
        "required": ["player_id", "name"]
    })
});

static CREATE_CHARACTER_SCHEMA: Lazy<Value> = Lazy::new(|| {
    json!({
        "type": "object",
        "properties": {
            "character": CHARACTER_SCHEMA.clone()
        },
        "required": ["character"]
    })
});

static CHARACTER_ID_SCHEMA: Lazy<Value> = Lazy::new(|| {
    json!({
        "type": "object",
        "properties": {
            "characterId": { "type": "string" }
        },
        "required": ["characterId"]
    })
});

static PLAYER_ID_SCHEMA: Lazy<Value> = Lazy::new(|| {
    json!({
        "type": "object",
        "properties": {
            "playerId": { "type": "string" }
        },
        "required": ["playerId"]
    })
});

static UPDATE_CHARACTER_SCHEMA: Lazy<Value> = Lazy::new(|| {
    json!({
        "type": "object",
        "properties": {
            "characterId": { "type": "string" },
            "updatedCharacter": CHARACTER_SCHEMA.clone()
        },
        "required": ["characterId", "updatedCharacter"]
    })
});

static ADD_EXPERIENCE_SCHEMA: Lazy<Value> = Lazy::new(|| {
    json!({
        "type": "object",
        "properties": {
            "characterId": { "type": "string" },
            "experienceToAdd": { "type": "integer" }
        },
        "required": ["characterId", "experienceToAdd"]
    })
});

static EMPTY_SCHEMA: Lazy<Value> = Lazy::new(|| {
    json!({
        "type": "object",
        "properties": {}
    })
});

fn parse_params<T: DeserializeOwned>(tool: &str, params: Value) -> Result<T, ToolError> {
    serde_json::from_value(params).map_err(|err| ToolError::InvalidParameters {
        tool: tool.to_string(),
        reason: err.to_string(),
    })
}

fn to_structured<T: Serialize>(value: &T) -> Result<Value, ToolError> {
    serde_json::to_value(value).map_err(|err| ToolError::Internal(err.to_string()))
}

// =============================================================================
// Tools
// =============================================================================

/// Create a new character, filling creation defaults.
pub struct CreateCharacterTool {
    service: Arc<CharacterService>,
}

impl CreateCharacterTool {
    pub fn new(service: Arc<CharacterService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for CreateCharacterTool {
    fn name(&self) -> &str {
        "createCharacter"
    }

    fn description(&self) -> &str {
        "Create a new character with the given details."
    }

    fn input_schema(&self) -> &Value {
        &CREATE_CHARACTER_SCHEMA
    }

    fn annotations(&self) -> ToolAnnotations {
        ToolAnnotations::write()
    }

    async fn execute(&self, params: Value) -> Result<ToolOutput, ToolError> {
        let params: CreateCharacterParams = parse_params(self.name(), params)?;
        let character = self.service.create_character(params.character).await?;
        let structured = to_structured(&character)?;
        Ok(ToolOutput::structured(
            format!(
                "Created character {} ({})",
                character.name, character.character_id
            ),
            structured,
        ))
    }
}

/// Retrieve a character by id. Raises on a miss.
pub struct GetCharacterTool {
    service: Arc<CharacterService>,
}

impl GetCharacterTool {
    pub fn new(service: Arc<CharacterService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for GetCharacterTool {
    fn name(&self) -> &str {
        "getCharacter"
    }

    fn description(&self) -> &str {
        "Retrieve a character by their ID."
    }

    fn input_schema(&self) -> &Value {
        &CHARACTER_ID_SCHEMA
    }

    fn annotations(&self) -> ToolAnnotations {
        ToolAnnotations::read_only()
    }

    async fn execute(&self, params: Value) -> Result<ToolOutput, ToolError> {
        let params: CharacterIdParams = parse_params(self.name(), params)?;
        let character = self.service.get_character(&params.character_id).await?;
        let structured = to_structured(&character)?;
        Ok(ToolOutput::structured(
            format!("Character {} ({})", character.name, character.character_id),
            structured,
        ))
    }
}

/// Retrieve all characters belonging to a player. Raises when the player has
/// none.
pub struct GetCharactersByPlayerIdTool {
    service: Arc<CharacterService>,
}

impl GetCharactersByPlayerIdTool {
    pub fn new(service: Arc<CharacterService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for GetCharactersByPlayerIdTool {
    fn name(&self) -> &str {
        "getCharactersByPlayerId"
    }

    fn description(&self) -> &str {
        "Retrieve all characters belonging to a specific player."
    }

    fn input_schema(&self) -> &Value {
        &PLAYER_ID_SCHEMA
    }

    fn annotations(&self) -> ToolAnnotations {
        ToolAnnotations::read_only()
    }

    async fn execute(&self, params: Value) -> Result<ToolOutput, ToolError> {
        let params: PlayerIdParams = parse_params(self.name(), params)?;
        let characters = self.service.characters_by_player(&params.player_id).await?;
        let structured = to_structured(&characters)?;
        Ok(ToolOutput::structured(
            format!(
                "Found {} character(s) for player {}",
                characters.len(),
                params.player_id
            ),
            structured,
        ))
    }
}

/// Replace an existing character's record. Empty result on a miss.
pub struct UpdateCharacterTool {
    service: Arc<CharacterService>,
}

impl UpdateCharacterTool {
    pub fn new(service: Arc<CharacterService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for UpdateCharacterTool {
    fn name(&self) -> &str {
        "updateCharacter"
    }

    fn description(&self) -> &str {
        "Update an existing character's details."
    }

    fn input_schema(&self) -> &Value {
        &UPDATE_CHARACTER_SCHEMA
    }

    fn annotations(&self) -> ToolAnnotations {
        ToolAnnotations::idempotent_write()
    }

    async fn execute(&self, params: Value) -> Result<ToolOutput, ToolError> {
        let params: UpdateCharacterParams = parse_params(self.name(), params)?;
        match self
            .service
            .update_character(&params.character_id, params.updated_character)
            .await?
        {
            Some(character) => {
                let structured = to_structured(&character)?;
                Ok(ToolOutput::structured(
                    format!("Updated character {}", character.character_id),
                    structured,
                ))
            }
            None => Ok(ToolOutput::missing(format!(
                "No character found with ID {}",
                params.character_id
            ))),
        }
    }
}

/// Add experience to a character and handle level progression. Empty result
/// on a miss.
pub struct AddExperienceTool {
    service: Arc<CharacterService>,
}

impl AddExperienceTool {
    pub fn new(service: Arc<CharacterService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for AddExperienceTool {
    fn name(&self) -> &str {
        "addExperience"
    }

    fn description(&self) -> &str {
        "Add experience to a character and handle level progression."
    }

    fn input_schema(&self) -> &Value {
        &ADD_EXPERIENCE_SCHEMA
    }

    fn annotations(&self) -> ToolAnnotations {
        ToolAnnotations::write()
    }

    async fn execute(&self, params: Value) -> Result<ToolOutput, ToolError> {
        let params: AddExperienceParams = parse_params(self.name(), params)?;
        match self
            .service
            .add_experience(&params.character_id, params.experience_to_add)
            .await?
        {
            Some(character) => {
                let structured = to_structured(&character)?;
                Ok(ToolOutput::structured(
                    format!(
                        "{} now has {} XP at level {}",
                        character.name, character.experience, character.level
                    ),
                    structured,
                ))
            }
            None => Ok(ToolOutput::missing(format!(
                "No character found with ID {}",
                params.character_id
            ))),
        }
    }
}

/// Report a character's progression through the experience curve. Empty
/// result on a miss.
pub struct GetProgressionInfoTool {
    service: Arc<CharacterService>,
}

impl GetProgressionInfoTool {
    pub fn new(service: Arc<CharacterService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for GetProgressionInfoTool {
    fn name(&self) -> &str {
        "getProgressionInfo"
    }

    fn description(&self) -> &str {
        "Get information about a character's progression during a game session."
    }

    fn input_schema(&self) -> &Value {
        &CHARACTER_ID_SCHEMA
    }

    fn annotations(&self) -> ToolAnnotations {
        ToolAnnotations::read_only()
    }

    async fn execute(&self, params: Value) -> Result<ToolOutput, ToolError> {
        let params: CharacterIdParams = parse_params(self.name(), params)?;
        match self.service.progression_info(&params.character_id).await? {
            Some(info) => {
                let structured = to_structured(&info)?;
                Ok(ToolOutput::structured(
                    format!(
                        "Level {} with {} XP",
                        info.current_level, info.current_experience
                    ),
                    structured,
                ))
            }
            None => Ok(ToolOutput::missing(format!(
                "No character found with ID {}",
                params.character_id
            ))),
        }
    }
}

/// Delete a character by id. Quiet even when the id has no record.
pub struct DeleteCharacterTool {
    service: Arc<CharacterService>,
}

impl DeleteCharacterTool {
    pub fn new(service: Arc<CharacterService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for DeleteCharacterTool {
    fn name(&self) -> &str {
        "deleteCharacter"
    }

    fn description(&self) -> &str {
        "Delete a character by their ID."
    }

    fn input_schema(&self) -> &Value {
        &CHARACTER_ID_SCHEMA
    }

    fn annotations(&self) -> ToolAnnotations {
        ToolAnnotations::destructive()
    }

    async fn execute(&self, params: Value) -> Result<ToolOutput, ToolError> {
        let params: CharacterIdParams = parse_params(self.name(), params)?;
        self.service.delete_character(&params.character_id).await?;
        Ok(ToolOutput::text(format!(
            "Deleted character {}",
            params.character_id
        )))
    }
}

/// List every character in the table.
pub struct GetAllCharactersTool {
    service: Arc<CharacterService>,
}

impl GetAllCharactersTool {
    pub fn new(service: Arc<CharacterService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for GetAllCharactersTool {
    fn name(&self) -> &str {
        "getAllCharacters"
    }

    fn description(&self) -> &str {
        "Retrieve all characters in the table."
    }

    fn input_schema(&self) -> &Value {
        &EMPTY_SCHEMA
    }

    fn annotations(&self) -> ToolAnnotations {
        ToolAnnotations::read_only()
    }

    async fn execute(&self, _params: Value) -> Result<ToolOutput, ToolError> {
        let characters = self.service.all_characters().await?;
        let structured = to_structured(&characters)?;
        Ok(ToolOutput::structured(
            format!("{} character(s)", characters.len()),
            structured,
        ))
    }
}

/// Build a registry exposing every character operation over one service.
pub fn character_tool_registry(service: Arc<CharacterService>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry
        .register(CreateCharacterTool::new(service.clone()))
        .register(GetCharacterTool::new(service.clone()))
        .register(GetCharactersByPlayerIdTool::new(service.clone()))
        .register(UpdateCharacterTool::new(service.clone()))
        .register(AddExperienceTool::new(service.clone()))
        .register(GetProgressionInfoTool::new(service.clone()))
        .register(DeleteCharacterTool::new(service.clone()))
        .register(GetAllCharactersTool::new(service));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use characters_core::{ExperienceTable, MemoryStore};

    fn registry() -> ToolRegistry {
        let service = Arc::new(CharacterService::new(
            Arc::new(MemoryStore::new()),
            ExperienceTable::default(),
        ));
        character_tool_registry(service)
    }

    #[test]
    fn registry_exposes_all_eight_operations() {
        let registry = registry();
        assert_eq!(registry.len(), 8);
        for name in [
            "createCharacter",
            "getCharacter",
            "getCharactersByPlayerId",
            "updateCharacter",
            "addExperience",
            "getProgressionInfo",
            "deleteCharacter",
            "getAllCharacters",
        ] {
            assert!(registry.contains(name), "missing tool {name}");
        }
    }

    #[tokio::test]
    async fn create_applies_defaults_and_returns_the_record() {
        let registry = registry();

        let output = registry
            .dispatch(
                "createCharacter",
                json!({ "character": { "player_id": "p1", "name": "Aria", "class": "Wizard" } }),
            )
            .await
            .unwrap();

        assert_eq!(output.structured["level"], 1);
        assert_eq!(output.structured["experience"], 0);
        assert_eq!(output.structured["stats"]["strength"], 10);
        assert_eq!(output.structured["current_status"]["max_hp"], 6);
        assert_eq!(output.structured["current_status"]["hp"], 6);
        assert_eq!(
            output.structured["inventory"].as_array().unwrap().len(),
            12
        );
    }

    #[tokio::test]
    async fn create_without_player_id_is_a_validation_error() {
        let registry = registry();

        let err = registry
            .dispatch("createCharacter", json!({ "character": { "name": "Aria" } }))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Validation(_)));
    }

    #[tokio::test]
    async fn get_unknown_character_raises_not_found() {
        let registry = registry();

        let err = registry
            .dispatch("getCharacter", json!({ "characterId": "no-such-id" }))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::NotFound(_)));
    }

    #[tokio::test]
    async fn player_with_no_characters_raises_not_found() {
        let registry = registry();

        let err = registry
            .dispatch("getCharactersByPlayerId", json!({ "playerId": "p9" }))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::NotFound(_)));
    }

    #[tokio::test]
    async fn update_miss_is_an_empty_result_not_an_error() {
        let registry = registry();

        let output = registry
            .dispatch(
                "updateCharacter",
                json!({
                    "characterId": "no-such-id",
                    "updatedCharacter": { "player_id": "p1", "name": "Ghost" }
                }),
            )
            .await
            .unwrap();
        assert!(output.is_missing());

        // And the miss did not create a record.
        let all = registry
            .dispatch("getAllCharacters", json!({}))
            .await
            .unwrap();
        assert_eq!(all.structured.as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn add_experience_levels_up_through_the_tool() {
        let registry = registry();

        let created = registry
            .dispatch(
                "createCharacter",
                json!({ "character": { "player_id": "p1", "name": "Aria" } }),
            )
            .await
            .unwrap();
        let id = created.structured["character_id"].as_str().unwrap().to_string();

        let output = registry
            .dispatch(
                "addExperience",
                json!({ "characterId": id, "experienceToAdd": 300 }),
            )
            .await
            .unwrap();

        assert_eq!(output.structured["level"], 2);
        assert_eq!(output.structured["experience"], 300);
    }

    #[tokio::test]
    async fn progression_info_for_a_fresh_character() {
        let registry = registry();

        let created = registry
            .dispatch(
                "createCharacter",
                json!({ "character": { "player_id": "p1", "name": "Aria" } }),
            )
            .await
            .unwrap();
        let id = created.structured["character_id"].as_str().unwrap().to_string();

        let output = registry
            .dispatch("getProgressionInfo", json!({ "characterId": id }))
            .await
            .unwrap();

        assert_eq!(output.structured["current_level"], 1);
        assert_eq!(output.structured["experience_for_current_level"], 0);
        assert_eq!(output.structured["experience_for_next_level"], 300);
        assert_eq!(output.structured["experience_needed"], 300);
    }

    #[tokio::test]
    async fn delete_then_get_round_trip() {
        let registry = registry();

        let created = registry
            .dispatch(
                "createCharacter",
                json!({ "character": { "player_id": "p1", "name": "Aria" } }),
            )
            .await
            .unwrap();
        let id = created.structured["character_id"].as_str().unwrap().to_string();

        registry
            .dispatch("deleteCharacter", json!({ "characterId": &id }))
            .await
            .unwrap();

        let err = registry
            .dispatch("getCharacter", json!({ "characterId": &id }))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::NotFound(_)));
    }

    #[tokio::test]
    async fn malformed_params_are_invalid_parameters() {
        let registry = registry();

        let err = registry
            .dispatch("addExperience", json!({ "characterId": "c-1" }))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidParameters { .. }));
    }
}
