//! Static reference data: sports catalog, institutes and enumerations.
//!
//! Every lookup is a pure function of its key. Unknown keys yield an empty
//! collection, so callers read absence as "no options". Records the backend
//! manages (sports created by admins, priced categories) live in [`remote`].

mod lists;
pub mod remote;
mod sports;

pub use lists::{age_groups, genders, institutes, Gender, OTHER_INSTITUTE};
pub use remote::{NewSport, SportCategoryRecord, SportRecord};
pub use sports::{
    all_sports, categories_for_sport, find_category, find_sport, sports_for_type,
    subcategories_for, CategoryEntry, SportEntry, SportType,
};
