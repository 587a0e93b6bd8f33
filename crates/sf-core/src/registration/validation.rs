//! Step-local validation primitives.
//!
//! Rules are evaluated in declaration order and every failure is collected,
//! so a step reports all of its problems at once.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::fees::FeeSchedule;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}$").expect("valid email regex")
});

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9]{7,15}$").expect("valid phone regex"));

pub const MIN_PASSWORD_LEN: usize = 8;

/// A single violated rule, keyed by the form field it concerns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Values the rules need that do not come from the form itself.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowContext {
    pub today: NaiveDate,
    pub fees: FeeSchedule,
}

impl FlowContext {
    pub fn new(today: NaiveDate, fees: FeeSchedule) -> Self {
        Self { today, fees }
    }

    pub fn for_today(fees: FeeSchedule) -> Self {
        Self::new(chrono::Local::now().date_naive(), fees)
    }
}

/// Accumulates [`FieldError`]s for one step.
#[derive(Debug, Default)]
pub struct Rules {
    errors: Vec<FieldError>,
}

impl Rules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(&mut self, field: &'static str, ok: bool, message: impl Into<String>) -> &mut Self {
        if !ok {
            self.errors.push(FieldError::new(field, message));
        }
        self
    }

    pub fn require(&mut self, field: &'static str, value: &str, label: &str) -> &mut Self {
        self.check(field, !value.trim().is_empty(), format!("{label} is required"))
    }

    pub fn require_opt(
        &mut self,
        field: &'static str,
        value: Option<&str>,
        label: &str,
    ) -> &mut Self {
        self.require(field, value.unwrap_or(""), label)
    }

    pub fn require_some<T>(&mut self, field: &'static str, value: &Option<T>, label: &str) -> &mut Self {
        self.check(field, value.is_some(), format!("{label} is required"))
    }

    /// Required and well-formed. A missing value reports only the presence rule.
    pub fn email(&mut self, field: &'static str, value: &str, label: &str) -> &mut Self {
        if value.trim().is_empty() {
            return self.require(field, value, label);
        }
        self.check(
            field,
            is_valid_email(value),
            format!("{label} must be a valid email address"),
        )
    }

    /// Checked only when present.
    pub fn optional_email(&mut self, field: &'static str, value: Option<&str>, label: &str) -> &mut Self {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            Some(v) => self.check(
                field,
                is_valid_email(v),
                format!("{label} must be a valid email address"),
            ),
            None => self,
        }
    }

    pub fn phone(&mut self, field: &'static str, value: &str, label: &str) -> &mut Self {
        if value.trim().is_empty() {
            return self.require(field, value, label);
        }
        self.check(
            field,
            is_valid_phone(value),
            format!("{label} must be a valid phone number"),
        )
    }

    pub fn finish(&mut self) -> Vec<FieldError> {
        std::mem::take(&mut self.errors)
    }
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value.trim())
}

/// Spaces, dashes and parentheses are ignored; an optional leading `+` is allowed.
pub fn is_valid_phone(value: &str) -> bool {
    let compact: String = value
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect();
    PHONE_RE.is_match(&compact)
}

/// Whole years between `birth` and `today`.
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> i32 {
    use chrono::Datelike;
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age
}
