use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SportType {
    Team,
    Individual,
}

impl SportType {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "team" => Some(Self::Team),
            "individual" => Some(Self::Individual),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryEntry {
    pub name: &'static str,
    pub age_from: u8,
    pub age_to: u8,
    pub subcategories: &'static [&'static str],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SportEntry {
    pub name: &'static str,
    pub sport_type: SportType,
    pub categories: &'static [CategoryEntry],
}

const fn category(
    name: &'static str,
    age_from: u8,
    age_to: u8,
    subcategories: &'static [&'static str],
) -> CategoryEntry {
    CategoryEntry {
        name,
        age_from,
        age_to,
        subcategories,
    }
}

static SPORTS: &[SportEntry] = &[
    SportEntry {
        name: "Football",
        sport_type: SportType::Team,
        categories: &[
            category("Under 18", 16, 18, &["Boys U-18", "Girls U-18"]),
            category("Under 21", 18, 21, &["Men U-21", "Women U-21"]),
        ],
    },
    SportEntry {
        name: "Basketball",
        sport_type: SportType::Team,
        categories: &[
            category("Under 17", 14, 17, &["Boys U-17", "Girls U-17"]),
            category("Senior", 18, 35, &["Men", "Women", "Mixed 3x3"]),
        ],
    },
    SportEntry {
        name: "Volleyball",
        sport_type: SportType::Team,
        categories: &[
            category("Under 19", 15, 19, &["Boys U-19", "Girls U-19"]),
            category("Senior", 19, 35, &["Men", "Women", "Beach Pairs"]),
        ],
    },
    SportEntry {
        name: "Cricket",
        sport_type: SportType::Team,
        categories: &[
            category("Under 16", 12, 16, &["Boys U-16"]),
            category("Under 19", 16, 19, &["Boys U-19", "Girls U-19"]),
        ],
    },
    SportEntry {
        name: "Kabaddi",
        sport_type: SportType::Team,
        categories: &[category("Open", 16, 30, &["Men", "Women"])],
    },
    SportEntry {
        name: "Tennis",
        sport_type: SportType::Individual,
        categories: &[category(
            "Open",
            16,
            50,
            &["Singles", "Doubles", "Mixed Doubles"],
        )],
    },
    SportEntry {
        name: "Badminton",
        sport_type: SportType::Individual,
        categories: &[
            category("Under 15", 11, 15, &["Boys Singles", "Girls Singles"]),
            category(
                "Under 19",
                15,
                19,
                &["Boys Singles", "Girls Singles", "Boys Doubles", "Girls Doubles"],
            ),
        ],
    },
    SportEntry {
        name: "Athletics",
        sport_type: SportType::Individual,
        categories: &[
            category("Under 14", 10, 14, &["60m", "100m", "Long Jump"]),
            category("Under 17", 14, 17, &["100m", "200m", "400m", "Long Jump", "Shot Put"]),
            category("Under 19", 17, 19, &["100m", "200m", "400m", "800m", "High Jump", "Javelin"]),
        ],
    },
    SportEntry {
        name: "Swimming",
        sport_type: SportType::Individual,
        categories: &[
            category("Under 14", 10, 14, &["50m Freestyle", "50m Backstroke"]),
            category("Under 19", 14, 19, &["100m Freestyle", "100m Butterfly", "200m Medley"]),
        ],
    },
    SportEntry {
        name: "Chess",
        sport_type: SportType::Individual,
        categories: &[category("Open", 8, 99, &["Rapid", "Blitz", "Classical"])],
    },
    SportEntry {
        name: "Table Tennis",
        sport_type: SportType::Individual,
        categories: &[category("Open", 12, 40, &["Singles", "Doubles"])],
    },
];

pub fn all_sports() -> &'static [SportEntry] {
    SPORTS
}

pub fn find_sport(name: &str) -> Option<&'static SportEntry> {
    SPORTS.iter().find(|sport| sport.name == name)
}

pub fn find_category(sport: &str, category: &str) -> Option<&'static CategoryEntry> {
    find_sport(sport)?
        .categories
        .iter()
        .find(|entry| entry.name == category)
}

pub fn sports_for_type(sport_type: SportType) -> Vec<&'static str> {
    SPORTS
        .iter()
        .filter(|sport| sport.sport_type == sport_type)
        .map(|sport| sport.name)
        .collect()
}

pub fn categories_for_sport(sport: &str) -> Vec<&'static str> {
    find_sport(sport)
        .map(|entry| entry.categories.iter().map(|c| c.name).collect())
        .unwrap_or_default()
}

pub fn subcategories_for(sport: &str, category: &str) -> Vec<&'static str> {
    find_category(sport, category)
        .map(|entry| entry.subcategories.to_vec())
        .unwrap_or_default()
}
