//! Field-level checks for the lead form.
//!
//! Every check returns `None` when the value is acceptable and `Some(message)` with the text shown
//! next to the field otherwise. Nothing here touches the display; see
//! [`crate::core::submission::apply_report`] for that.

use crate::domain::model::{FieldId, LeadSubmission, BUDGET_RANGES, PROPERTY_TYPES};
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::LazyLock;

pub const MIN_NAME_LENGTH: usize = 2;

pub const PROPERTY_TYPE_LABEL: &str = "property type";
pub const BUDGET_LABEL: &str = "budget range";
pub const LOCATION_LABEL: &str = "Location";

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+]?[(]?[0-9]{1,4}[)]?[-\s.]?[(]?[0-9]{1,4}[)]?[-\s.]?[0-9]{1,9}$").unwrap()
});

pub fn validate_full_name(value: &str) -> Option<String> {
    if value.trim().chars().count() < MIN_NAME_LENGTH {
        return Some("Please enter a valid full name".to_string());
    }
    None
}

pub fn validate_email(value: &str) -> Option<String> {
    if value.is_empty() || !EMAIL_RE.is_match(value) {
        return Some("Please enter a valid email address".to_string());
    }
    None
}

pub fn validate_phone(value: &str) -> Option<String> {
    if value.is_empty() || !PHONE_RE.is_match(value) {
        return Some("Please enter a valid phone number".to_string());
    }
    None
}

pub fn validate_select(value: &str, field_label: &str) -> Option<String> {
    if value.is_empty() {
        return Some(format!("Please select a {}", field_label));
    }
    None
}

/// Like [`validate_select`], and the value must also be one of `options`.
pub fn validate_choice(value: &str, field_label: &str, options: &[&str]) -> Option<String> {
    if let Some(error) = validate_select(value, field_label) {
        return Some(error);
    }
    if !options.contains(&value) {
        return Some(format!("Please select a valid {}", field_label));
    }
    None
}

pub fn validate_required(value: &str, field_label: &str) -> Option<String> {
    if value.trim().is_empty() {
        return Some(format!("{} is required", field_label));
    }
    None
}

/// Runs the check that belongs to `field`.
pub fn validate_field(field: FieldId, value: &str) -> Option<String> {
    match field {
        FieldId::FullName => validate_full_name(value),
        FieldId::Email => validate_email(value),
        FieldId::Phone => validate_phone(value),
        FieldId::PropertyType => validate_choice(value, PROPERTY_TYPE_LABEL, PROPERTY_TYPES),
        FieldId::Budget => validate_choice(value, BUDGET_LABEL, BUDGET_RANGES),
        FieldId::Location => validate_required(value, LOCATION_LABEL),
    }
}

/// Every field that failed, keyed by field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    errors: BTreeMap<FieldId, String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error(&self, field: FieldId) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn errors(&self) -> impl Iterator<Item = (FieldId, &str)> {
        self.errors.iter().map(|(field, msg)| (*field, msg.as_str()))
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// First failing field in form order.
    pub fn first_invalid(&self) -> Option<FieldId> {
        self.errors.keys().next().copied()
    }

    /// Errors keyed by the form's field ids, for JSON responses.
    pub fn to_field_map(&self) -> BTreeMap<&'static str, String> {
        self.errors
            .iter()
            .map(|(field, msg)| (field.as_str(), msg.clone()))
            .collect()
    }
}

impl Serialize for ValidationReport {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_field_map().serialize(serializer)
    }
}

pub fn validate_all(lead: &LeadSubmission) -> ValidationReport {
    let errors = FieldId::ALL
        .into_iter()
        .filter_map(|field| validate_field(field, lead.value(field)).map(|msg| (field, msg)))
        .collect();
    ValidationReport { errors }
}
