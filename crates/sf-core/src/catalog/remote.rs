//! Sports and categories as the backend manages them.

use serde::{Deserialize, Deserializer, Serialize};

use crate::ids::SportId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SportRecord {
    pub id: SportId,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "active_by_default")]
    pub is_active: bool,
}

fn active_by_default() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewSport {
    pub name: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NewSport {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let slug = slugify(&name);
        Self {
            name,
            slug,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// `"Table Tennis"` → `"table-tennis"`.
pub fn slugify(name: &str) -> String {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenderAllowed {
    Male,
    Female,
    Mixed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SportCategoryRecord {
    pub id: String,
    pub sport_id: SportId,
    pub name: String,
    pub age_from: u8,
    pub age_to: u8,
    pub gender_allowed: GenderAllowed,
    /// Decimal fee as sent by the server, e.g. `"25.00"`.
    #[serde(deserialize_with = "decimal_text")]
    pub fee: String,
    #[serde(default)]
    pub max_participants: Option<u32>,
}

fn decimal_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    })
}
