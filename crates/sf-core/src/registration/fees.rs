//! Registration fee computation.
//!
//! Amounts are integer minor units (cents).

use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_FEE: u64 = 50_00;
pub const DEFAULT_PER_SPORT_FEE: u64 = 25_00;
pub const DEFAULT_CURRENCY: &str = "USD";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeSchedule {
    pub base_fee: u64,
    pub per_sport_fee: u64,
    pub currency: String,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            base_fee: DEFAULT_BASE_FEE,
            per_sport_fee: DEFAULT_PER_SPORT_FEE,
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeBreakdown {
    pub base: u64,
    pub sports_count: usize,
    pub per_sport: u64,
    pub sports_total: u64,
    pub total: u64,
    pub currency: String,
}

impl FeeSchedule {
    pub fn breakdown(&self, sports_count: usize) -> FeeBreakdown {
        let sports_total = self.per_sport_fee.saturating_mul(sports_count as u64);
        FeeBreakdown {
            base: self.base_fee,
            sports_count,
            per_sport: self.per_sport_fee,
            sports_total,
            total: self.base_fee.saturating_add(sports_total),
            currency: self.currency.clone(),
        }
    }
}

impl FeeBreakdown {
    pub fn display_total(&self) -> String {
        format_amount(self.total, &self.currency)
    }
}

/// `format_amount(10000, "USD") == "$100.00"`.
pub fn format_amount(minor_units: u64, currency: &str) -> String {
    let major = group_thousands(minor_units / 100);
    let minor = minor_units % 100;
    match currency {
        "USD" => format!("${major}.{minor:02}"),
        "INR" => format!("₹{major}.{minor:02}"),
        other => format!("{major}.{minor:02} {other}"),
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
