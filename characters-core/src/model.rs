//! Character record model with the persisted wire layout.
//!
//! Field names here are load-bearing: the storage table and existing callers
//! use `character_id`, `player_id`, `class`, `current_status`, and the nested
//! `max_hp` / `item_name` shapes. A serde rename pins the one place the Rust
//! name differs from the wire name.

use serde::{Deserialize, Serialize};

/// A player-owned character record.
///
/// Creation payloads may leave most fields unset; the service fills in
/// defaults before the record is first persisted. A `level` of 0 in a payload
/// means "not set".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Character {
    /// Partition key. Generated at creation when the caller omits it.
    #[serde(default)]
    pub character_id: String,

    /// Optional display alias, stored as-is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character_name: Option<String>,

    /// Owning player. Required at creation.
    #[serde(default)]
    pub player_id: String,

    /// Character name. Required at creation.
    #[serde(default)]
    pub name: String,

    /// Class name ("Wizard", "Fighter", ...). Free text; unknown classes fall
    /// back to the default hit die.
    #[serde(rename = "class", default, skip_serializing_if = "Option::is_none")]
    pub character_class: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub race: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,

    /// 1..=20 once defaulted.
    #[serde(default)]
    pub level: i32,

    /// Cumulative XP. Experience adjustments are never clamped, so this can
    /// go negative.
    #[serde(default)]
    pub experience: i32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<Stats>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_status: Option<CurrentStatus>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inventory: Vec<InventoryItem>,
}

impl Character {
    /// A minimal creation payload. Everything else is filled in by
    /// [`CharacterService::create_character`](crate::service::CharacterService::create_character).
    pub fn new(player_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            player_id: player_id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the character class.
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.character_class = Some(class.into());
        self
    }

    /// Set the ability scores.
    pub fn with_stats(mut self, stats: Stats) -> Self {
        self.stats = Some(stats);
        self
    }

    /// Set an explicit id instead of having one generated.
    pub fn with_id(mut self, character_id: impl Into<String>) -> Self {
        self.character_id = character_id.into();
        self
    }
}

/// The six ability scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub strength: i32,
    pub dexterity: i32,
    pub constitution: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub charisma: i32,
}

impl Default for Stats {
    /// Straight 10s, the baseline array for characters created without
    /// scores.
    fn default() -> Self {
        Self {
            strength: 10,
            dexterity: 10,
            constitution: 10,
            intelligence: 10,
            wisdom: 10,
            charisma: 10,
        }
    }
}

impl Stats {
    /// Constitution modifier: `(constitution - 10) / 2`, rounded down, so
    /// scores below 10 produce a negative modifier.
    pub fn constitution_modifier(&self) -> i32 {
        (self.constitution - 10).div_euclid(2)
    }
}

/// Current hit points and condition.
///
/// `hp == max_hp` when the record is created. Full-replace updates may
/// overwrite both freely; nothing re-enforces the relation afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentStatus {
    pub hp: i32,
    pub max_hp: i32,
    /// Free text, not validated against any enum.
    pub condition: String,
    #[serde(default)]
    pub buffs: Vec<String>,
}

/// One stack of items in a character's inventory. Item names are not unique
/// across entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub item_name: String,
    pub quantity: i32,
}

impl InventoryItem {
    pub fn new(item_name: impl Into<String>, quantity: i32) -> Self {
        Self {
            item_name: item_name.into(),
            quantity,
        }
    }
}

/// The fixed starting loadout assigned to characters created without an
/// inventory.
const STARTER_KIT: &[(&str, i32)] = &[
    ("Shortsword", 1),
    ("Shortbow", 1),
    ("Arrows", 20),
    ("Leather Armor", 1),
    ("Torch", 2),
    ("Flint & Tinder", 1),
    ("Rations", 5),
    ("Waterskin", 1),
    ("Map or Blank Parchment", 1),
    ("Quill & Ink", 1),
    ("Health Potion", 1),
    ("Gold Pieces", 10),
];

/// Build the starter kit as inventory entries.
pub fn starter_kit() -> Vec<InventoryItem> {
    STARTER_KIT
        .iter()
        .map(|&(name, quantity)| InventoryItem::new(name, quantity))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_under_wire_names() {
        let character = Character {
            character_id: "c-1".to_string(),
            character_name: Some("The Grey".to_string()),
            player_id: "p-1".to_string(),
            name: "Gandalf".to_string(),
            character_class: Some("Wizard".to_string()),
            race: Some("Human".to_string()),
            gender: None,
            level: 3,
            experience: 900,
            stats: Some(Stats::default()),
            current_status: Some(CurrentStatus {
                hp: 6,
                max_hp: 6,
                condition: "Normal".to_string(),
                buffs: vec!["Mage Armor".to_string()],
            }),
            inventory: vec![InventoryItem::new("Staff", 1)],
        };

        let value = serde_json::to_value(&character).unwrap();
        assert_eq!(value["character_id"], "c-1");
        assert_eq!(value["character_name"], "The Grey");
        assert_eq!(value["player_id"], "p-1");
        assert_eq!(value["class"], "Wizard");
        assert_eq!(value["current_status"]["max_hp"], 6);
        assert_eq!(value["current_status"]["buffs"][0], "Mage Armor");
        assert_eq!(value["stats"]["charisma"], 10);
        assert_eq!(value["inventory"][0]["item_name"], "Staff");
        assert_eq!(value["inventory"][0]["quantity"], 1);
        // The Rust field name never leaks into the wire format.
        assert!(value.get("character_class").is_none());
    }

    #[test]
    fn deserializes_minimal_payload() {
        let character: Character =
            serde_json::from_value(json!({ "player_id": "p-1", "name": "Aria" })).unwrap();

        assert_eq!(character.player_id, "p-1");
        assert_eq!(character.name, "Aria");
        assert!(character.character_id.is_empty());
        assert_eq!(character.level, 0);
        assert_eq!(character.experience, 0);
        assert!(character.stats.is_none());
        assert!(character.current_status.is_none());
        assert!(character.inventory.is_empty());
    }

    #[test]
    fn roundtrips_through_json() {
        let character = Character::new("p-1", "Aria")
            .with_class("Rogue")
            .with_id("c-9");
        let encoded = serde_json::to_string(&character).unwrap();
        let decoded: Character = serde_json::from_str(&encoded).unwrap();
        assert_eq!(character, decoded);
    }

    #[test]
    fn constitution_modifier_rounds_down() {
        let mut stats = Stats::default();
        assert_eq!(stats.constitution_modifier(), 0);

        stats.constitution = 15;
        assert_eq!(stats.constitution_modifier(), 2);

        stats.constitution = 9;
        assert_eq!(stats.constitution_modifier(), -1);

        stats.constitution = 6;
        assert_eq!(stats.constitution_modifier(), -2);
    }

    #[test]
    fn starter_kit_is_twelve_stacks() {
        let kit = starter_kit();
        assert_eq!(kit.len(), 12);
        assert_eq!(kit[0], InventoryItem::new("Shortsword", 1));
        assert_eq!(kit[2], InventoryItem::new("Arrows", 20));
        assert_eq!(kit[11], InventoryItem::new("Gold Pieces", 10));
    }
}
