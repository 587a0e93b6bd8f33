//! Multi-step registration: step records, validation, fees and the
//! sequencing engine shared by every flow.

pub mod fees;
pub mod flows;
pub mod records;
mod step;
mod stepper;
pub mod validation;

pub use fees::{FeeBreakdown, FeeSchedule};
pub use step::{RegistrationFlow, StepRecord};
pub use stepper::{StepError, StepOutcome, Stepper};
pub use validation::{FieldError, FlowContext};
