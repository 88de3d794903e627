use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Label attached to every submission built by this form.
pub const LEAD_SOURCE: &str = "Real Estate Lead Form";

/// Values offered by the property type select.
pub const PROPERTY_TYPES: &[&str] = &["house", "condo", "townhouse", "land", "commercial"];

/// Values offered by the budget select.
pub const BUDGET_RANGES: &[&str] = &[
    "under-100k",
    "100-200k",
    "200-400k",
    "400-700k",
    "700k-plus",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldId {
    FullName,
    Email,
    Phone,
    PropertyType,
    Budget,
    Location,
}

impl FieldId {
    /// Validated fields, in the order they appear on the form.
    pub const ALL: [FieldId; 6] = [
        FieldId::FullName,
        FieldId::Email,
        FieldId::Phone,
        FieldId::PropertyType,
        FieldId::Budget,
        FieldId::Location,
    ];

    /// Identifier used by the form markup and in JSON error maps.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldId::FullName => "fullName",
            FieldId::Email => "email",
            FieldId::Phone => "phone",
            FieldId::PropertyType => "propertyType",
            FieldId::Budget => "budget",
            FieldId::Location => "location",
        }
    }

    pub fn parse(id: &str) -> Option<FieldId> {
        FieldId::ALL.into_iter().find(|field| field.as_str() == id)
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw values as currently entered in the form controls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadForm {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub property_type: String,
    pub budget: String,
    pub location: String,
    pub message: String,
    pub newsletter: bool,
}

impl LeadForm {
    pub fn value(&self, field: FieldId) -> &str {
        match field {
            FieldId::FullName => &self.full_name,
            FieldId::Email => &self.email,
            FieldId::Phone => &self.phone,
            FieldId::PropertyType => &self.property_type,
            FieldId::Budget => &self.budget,
            FieldId::Location => &self.location,
        }
    }

    pub fn value_mut(&mut self, field: FieldId) -> &mut String {
        match field {
            FieldId::FullName => &mut self.full_name,
            FieldId::Email => &mut self.email,
            FieldId::Phone => &mut self.phone,
            FieldId::PropertyType => &mut self.property_type,
            FieldId::Budget => &mut self.budget,
            FieldId::Location => &mut self.location,
        }
    }
}

/// One submission attempt. Built fresh from the form each time and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadSubmission {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub property_type: String,
    pub budget: String,
    pub location: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub newsletter: bool,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub source: String,
}

impl LeadSubmission {
    /// Snapshot the form: text inputs are trimmed, selects are taken as-is.
    pub fn from_form(form: &LeadForm, submitted_at: DateTime<Utc>) -> Self {
        Self {
            full_name: form.full_name.trim().to_string(),
            email: form.email.trim().to_string(),
            phone: form.phone.trim().to_string(),
            property_type: form.property_type.clone(),
            budget: form.budget.clone(),
            location: form.location.trim().to_string(),
            message: form.message.trim().to_string(),
            newsletter: form.newsletter,
            timestamp: submitted_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            source: LEAD_SOURCE.to_string(),
        }
    }

    pub fn value(&self, field: FieldId) -> &str {
        match field {
            FieldId::FullName => &self.full_name,
            FieldId::Email => &self.email,
            FieldId::Phone => &self.phone,
            FieldId::PropertyType => &self.property_type,
            FieldId::Budget => &self.budget,
            FieldId::Location => &self.location,
        }
    }
}

/// Where submissions are sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookTarget {
    /// POST to this URL.
    Live(Url),
    /// Skip the network and report success. Only selected by an explicit flag.
    Demo,
}

impl WebhookTarget {
    pub fn is_demo(&self) -> bool {
        matches!(self, WebhookTarget::Demo)
    }
}

impl fmt::Display for WebhookTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WebhookTarget::Live(url) => write!(f, "{}", url),
            WebhookTarget::Demo => f.write_str("demo mode (no webhook)"),
        }
    }
}

/// Result of a successful delivery attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Delivered { status: u16 },
    Demo,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_from_form_trims_text_inputs() {
        let form = LeadForm {
            full_name: "  Jane Doe ".to_string(),
            email: " jane@example.com ".to_string(),
            phone: " (555) 123-4567 ".to_string(),
            property_type: "condo".to_string(),
            budget: "200-400k".to_string(),
            location: " Austin, TX ".to_string(),
            message: " Call after 5pm\n".to_string(),
            newsletter: true,
        };
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 12, 30, 0).unwrap();

        let lead = LeadSubmission::from_form(&form, at);

        assert_eq!(lead.full_name, "Jane Doe");
        assert_eq!(lead.email, "jane@example.com");
        assert_eq!(lead.phone, "(555) 123-4567");
        assert_eq!(lead.location, "Austin, TX");
        assert_eq!(lead.message, "Call after 5pm");
        assert!(lead.newsletter);
        assert_eq!(lead.timestamp, "2026-03-01T12:30:00.000Z");
        assert_eq!(lead.source, LEAD_SOURCE);
    }

    #[test]
    fn test_submission_uses_camel_case_json() {
        let lead = LeadSubmission::from_form(&LeadForm::default(), Utc::now());
        let json = serde_json::to_value(&lead).unwrap();

        for key in [
            "fullName",
            "email",
            "phone",
            "propertyType",
            "budget",
            "location",
            "message",
            "newsletter",
            "timestamp",
            "source",
        ] {
            assert!(json.get(key).is_some(), "missing key {}", key);
        }
    }

    #[test]
    fn test_field_id_round_trips_through_markup_id() {
        for field in FieldId::ALL {
            assert_eq!(FieldId::parse(field.as_str()), Some(field));
        }
        assert_eq!(FieldId::parse("message"), None);
    }
}
