//! Admin-side records shared across dashboard screens.

mod model;
mod stats;
mod store;

pub use model::{
    Institution, PaymentStatus, RequestStatus, SponsorData, SponsorshipRequest, SponsorshipStatus,
    SponsorshipType,
};
pub use stats::DashboardStats;
pub use store::{AdminDataStore, AdminSnapshot, Listener, Subscription};
