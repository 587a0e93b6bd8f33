//! # sf-core
//!
//! Core domain models and business logic for the sports festival
//! registration client.
//!
//! This crate contains pure business logic without any infrastructure
//! dependencies. I/O happens behind the traits in [`ports`].

pub mod admin;
pub mod api;
pub mod catalog;
pub mod config;
pub mod export;
pub mod ids;
pub mod ports;
pub mod registration;
pub mod session;

// Re-export commonly used types at the crate root
pub use admin::{AdminDataStore, Institution, SponsorshipRequest};
pub use api::{ApiError, ApiResponse};
pub use config::AppConfig;
pub use ids::{InstitutionId, SponsorshipRequestId, SportId, UserId};
pub use registration::{FeeSchedule, FieldError, Stepper};
pub use session::{AdminSession, AuthIdentity};
