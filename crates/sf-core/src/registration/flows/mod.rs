//! Concrete flow variants.

mod institution;
mod payload;
mod quick;
mod student;

pub use institution::{InstitutionDraft, InstitutionFlow, InstitutionInput, InstitutionStep};
pub use payload::{InstitutionRegistrationPayload, StudentRegistrationPayload};
pub use quick::{QuickInput, QuickPersonal, QuickSportDraft, QuickSportFlow, QuickStep};
pub use student::{StudentDraft, StudentFlow, StudentInput, StudentStep};
