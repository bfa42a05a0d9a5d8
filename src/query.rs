//! Query options accepted by the character generator.
//!
//! Values pass through to the request untouched. [`Race`] and [`Class`] list
//! what the service documents, but any string is accepted; the server
//! decides what is valid.

use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::{Result, ValidationError};

const RACE_PARAM: &str = "race";
const CLASS_PARAM: &str = "class";

/// Optional inputs for a generation request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameCharacterQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub race: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    /// Additional query parameters forwarded as-is.
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl GameCharacterQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_race(mut self, race: impl Into<String>) -> Self {
        self.race = Some(race.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        for key in self.extra.keys() {
            if key.trim().is_empty() {
                return Err(ValidationError::new("query parameter name must not be blank").into());
            }
            if key == RACE_PARAM || key == CLASS_PARAM {
                return Err(ValidationError::new(format!(
                    "use the {key} field instead of an extra parameter"
                ))
                .with_field(key.clone())
                .into());
            }
        }
        Ok(())
    }

    /// Parameters as sent on the wire. Unset and empty values are left out.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let named = [(RACE_PARAM, &self.race), (CLASS_PARAM, &self.class)];
        named
            .into_iter()
            .filter_map(|(key, value)| {
                value
                    .as_deref()
                    .filter(|v| !v.is_empty())
                    .map(|v| (key.to_string(), v.to_string()))
            })
            .chain(
                self.extra
                    .iter()
                    .filter(|(_, v)| !v.is_empty())
                    .map(|(k, v)| (k.clone(), v.clone())),
            )
            .collect()
    }
}

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $wire:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $wire)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                let wanted = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| {
                        ValidationError::new(format!("unknown value {wanted:?}"))
                            .with_field(stringify!($name).to_lowercase())
                    })
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.as_str().to_string()
            }
        }
    };
}

wire_enum! {
    /// Character races documented by the service.
    Race {
        Human => "human",
        Elf => "elf",
        Dwarf => "dwarf",
        Halfling => "halfling",
        Orc => "orc",
        Gnome => "gnome",
        Tiefling => "tiefling",
        Dragonborn => "dragonborn",
        HalfElf => "half-elf",
        Goblin => "goblin",
    }
}

wire_enum! {
    /// Character classes documented by the service.
    Class {
        Warrior => "warrior",
        Mage => "mage",
        Rogue => "rogue",
        Cleric => "cleric",
        Ranger => "ranger",
        Paladin => "paladin",
        Barbarian => "barbarian",
        Bard => "bard",
        Druid => "druid",
        Monk => "monk",
        Warlock => "warlock",
        Necromancer => "necromancer",
    }
}
