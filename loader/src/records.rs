//! Upstream record shapes and the merged detail record

use serde::Deserialize;

/// Primary character record, as returned by `GET /people/{id}/`
///
/// Fields beyond these are ignored. Any of these missing is a parse failure.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Character {
    /// Display name
    pub name:       String,
    /// Birth year in the upstream's BBY/ABY notation
    pub birth_year: String,
    /// Gender
    pub gender:     String,
    /// Hair color
    pub hair_color: String,
    /// Eye color
    pub eye_color:  String,
    /// Mass in kilograms, kept as text (the upstream uses values like `"unknown"`)
    pub mass:       String,
    /// Skin color
    pub skin_color: String,
    /// Absolute URL of the homeworld resource
    pub homeworld:  String,
    /// Absolute URLs of the films the character appears in, in upstream order
    pub films:      Vec<String>,
}

/// Secondary homeworld record; only the name is consumed
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Homeworld {
    /// Planet name
    pub name: String,
}

/// A character together with its resolved homeworld name
///
/// Only built by merging a fetched [`Character`] with its fetched [`Homeworld`], so a
/// partially loaded detail record cannot exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterDetail {
    character:      Character,
    homeworld_name: String,
}

impl CharacterDetail {
    pub(crate) fn merge(character: Character, homeworld: Homeworld) -> Self {
        Self {
            character,
            homeworld_name: homeworld.name,
        }
    }

    /// The primary record this detail was built from
    pub const fn character(&self) -> &Character {
        &self.character
    }

    /// Character name
    pub fn name(&self) -> &str {
        &self.character.name
    }

    /// Resolved homeworld name
    pub fn homeworld_name(&self) -> &str {
        &self.homeworld_name
    }

    /// Film URLs in upstream order
    pub fn films(&self) -> &[String] {
        &self.character.films
    }
}
