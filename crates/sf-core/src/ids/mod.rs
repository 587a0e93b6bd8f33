mod id_macro;

use id_macro::{impl_numeric_id, impl_string_id};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstitutionId(u64);

/// Sponsorship requests live in their own id space and point at an
/// institution through [`InstitutionId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SponsorshipRequestId(u64);

impl_numeric_id!(InstitutionId, SponsorshipRequestId);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SportId(String);

impl_string_id!(UserId, SportId);
