use serde::{Deserialize, Serialize};

use crate::errors::{APIError, Error, Result};

/// Envelope `status` value for successful calls.
pub const STATUS_OK: &str = "ok";

/// Envelope `status` value for failed calls.
pub const STATUS_ERROR: &str = "error";

/// Response envelope returned by the Game Character Generator API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameCharacterResponse {
    pub status: String,
    /// API-level error message; `None` on success.
    #[serde(default)]
    pub error: Option<String>,
    /// Generated character; may be `null` when `error` is set.
    #[serde(default)]
    pub data: Option<GameCharacterData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
}

impl GameCharacterResponse {
    /// Whether the envelope reports success and carries no error.
    pub fn is_ok(&self) -> bool {
        self.error.is_none() && self.status.eq_ignore_ascii_case(STATUS_OK)
    }

    /// Unwrap the generated character, turning an envelope-level error into
    /// [`Error::Api`] with the message left unaltered.
    pub fn into_data(self) -> Result<GameCharacterData> {
        if let Some(message) = self.error {
            return Err(Error::Api(APIError {
                status: 200,
                code: self.code,
                message,
                api_status: Some(self.status),
                request_id: None,
                raw_body: None,
            }));
        }
        self.data.ok_or_else(|| {
            Error::Api(APIError {
                status: 200,
                code: self.code,
                message: "response contained no data".to_string(),
                api_status: Some(self.status),
                request_id: None,
                raw_body: None,
            })
        })
    }
}

/// A generated character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameCharacterData {
    pub name: String,
    pub race: RaceInfo,
    pub class: ClassInfo,
    pub background: String,
    pub personality: String,
    pub motivation: String,
    pub stats: Stats,
    pub hp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceInfo {
    pub name: String,
    #[serde(default)]
    pub traits: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassInfo {
    pub name: String,
    pub description: String,
    pub primary_stat: String,
    pub hit_die: String,
}

/// The six ability scores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub strength: AbilityScore,
    pub dexterity: AbilityScore,
    pub constitution: AbilityScore,
    pub intelligence: AbilityScore,
    pub wisdom: AbilityScore,
    pub charisma: AbilityScore,
}

impl Stats {
    pub fn get(&self, ability: Ability) -> &AbilityScore {
        match ability {
            Ability::Strength => &self.strength,
            Ability::Dexterity => &self.dexterity,
            Ability::Constitution => &self.constitution,
            Ability::Intelligence => &self.intelligence,
            Ability::Wisdom => &self.wisdom,
            Ability::Charisma => &self.charisma,
        }
    }

    /// Scores in the conventional STR, DEX, CON, INT, WIS, CHA order.
    pub fn iter(&self) -> impl Iterator<Item = (Ability, &AbilityScore)> {
        Ability::ALL.into_iter().map(move |a| (a, self.get(a)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScore {
    pub value: i64,
    pub modifier: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ability {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

impl Ability {
    pub const ALL: [Ability; 6] = [
        Ability::Strength,
        Ability::Dexterity,
        Ability::Constitution,
        Ability::Intelligence,
        Ability::Wisdom,
        Ability::Charisma,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Ability::Strength => "strength",
            Ability::Dexterity => "dexterity",
            Ability::Constitution => "constitution",
            Ability::Intelligence => "intelligence",
            Ability::Wisdom => "wisdom",
            Ability::Charisma => "charisma",
        }
    }
}

impl std::fmt::Display for Ability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
