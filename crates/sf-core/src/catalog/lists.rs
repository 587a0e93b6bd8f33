use serde::{Deserialize, Serialize};

/// Sentinel institute entry that requires an explicit institution name.
pub const OTHER_INSTITUTE: &str = "Other";

static INSTITUTES: &[&str] = &[
    "Example University",
    "Sports Academy",
    "City Public School",
    "National Institute of Technology",
    "St. Xavier's College",
    "Government Higher Secondary School",
    OTHER_INSTITUTE,
];

static AGE_GROUPS: &[&str] = &["Under 14", "Under 17", "Under 19", "Under 21", "Senior", "Open"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

pub fn institutes() -> &'static [&'static str] {
    INSTITUTES
}

pub fn age_groups() -> &'static [&'static str] {
    AGE_GROUPS
}

pub fn genders() -> &'static [Gender] {
    &[Gender::Male, Gender::Female, Gender::Other]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn institutes_end_with_other() {
        assert_eq!(institutes().last(), Some(&OTHER_INSTITUTE));
    }

    #[test]
    fn gender_labels() {
        let labels: Vec<_> = genders().iter().map(Gender::label).collect();
        assert_eq!(labels, vec!["Male", "Female", "Other"]);
    }
}
