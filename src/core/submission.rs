//! Client-side submission flow: validate, post, report.
//!
//! ```text
//! Idle -> Validating -> Submitting -> Success | Failed -> Idle
//!              \-> Idle (validation errors shown, nothing sent)
//! ```
//!
//! The pipeline owns its [`FormView`] and takes `&mut self` for the whole attempt, so a form
//! instance can never have two submissions in flight. Failures are never retried automatically.

use crate::core::phone::format_phone_input;
use crate::core::validator::{self, ValidationReport};
use crate::domain::model::{Delivery, FieldId, LeadSubmission};
use crate::domain::ports::{FormView, LeadTransport, StatusKind};
use chrono::Utc;

pub const SUCCESS_MESSAGE: &str =
    "Your inquiry has been submitted successfully! We'll contact you within 24 hours.";
pub const DEMO_MESSAGE: &str =
    "Form submitted successfully! (Demo mode - configure webhook to send data)";
pub const FAILURE_MESSAGE: &str = "Failed to submit form. Please try again later.";
pub const INVALID_MESSAGE: &str = "Please fix the errors above";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    Validating,
    Submitting,
    Success,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// Validation failed; nothing was sent.
    Rejected(ValidationReport),
    /// The target accepted the lead. `demo` is set when no network call was made.
    Succeeded { demo: bool },
    /// Transport or upstream failure. The form keeps its values.
    Failed { reason: String },
}

/// Clears every displayed error, then shows the ones in `report`.
pub fn apply_report<V: FormView + ?Sized>(view: &mut V, report: &ValidationReport) {
    view.clear_all_errors();
    for (field, message) in report.errors() {
        view.show_error(field, message);
    }
}

pub struct SubmissionPipeline<T: LeadTransport, V: FormView> {
    transport: T,
    view: V,
    state: SubmissionState,
    transitions: Vec<SubmissionState>,
}

impl<T: LeadTransport, V: FormView> SubmissionPipeline<T, V> {
    pub fn new(transport: T, view: V) -> Self {
        Self {
            transport,
            view,
            state: SubmissionState::Idle,
            transitions: vec![SubmissionState::Idle],
        }
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    /// Every state entered since construction, starting with `Idle`.
    pub fn transitions(&self) -> &[SubmissionState] {
        &self.transitions
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn into_view(self) -> V {
        self.view
    }

    fn transition(&mut self, next: SubmissionState) {
        tracing::debug!("Submission state {:?} -> {:?}", self.state, next);
        self.state = next;
        self.transitions.push(next);
    }

    /// Re-checks one field after it loses focus and updates its error display.
    pub fn blur(&mut self, field: FieldId) -> Option<String> {
        let form = self.view.read_form();
        let error = validator::validate_field(field, form.value(field));
        match &error {
            Some(message) => self.view.show_error(field, message),
            None => self.view.clear_error(field),
        }
        error
    }

    /// Called while the user types in `field`: clears the field's error and, for the phone
    /// field, returns the reformatted value the input should now show.
    pub fn input(&mut self, field: FieldId, value: &str) -> String {
        self.view.clear_error(field);
        match field {
            FieldId::Phone => format_phone_input(value),
            _ => value.to_string(),
        }
    }

    pub async fn submit(&mut self) -> SubmissionOutcome {
        self.transition(SubmissionState::Validating);

        let lead = LeadSubmission::from_form(&self.view.read_form(), Utc::now());
        let report = validator::validate_all(&lead);
        apply_report(&mut self.view, &report);

        if !report.is_valid() {
            tracing::debug!(
                "Submission blocked by {} invalid field(s), first: {:?}",
                report.len(),
                report.first_invalid()
            );
            self.view.show_status(INVALID_MESSAGE, StatusKind::Error);
            self.transition(SubmissionState::Idle);
            return SubmissionOutcome::Rejected(report);
        }

        self.transition(SubmissionState::Submitting);
        self.view.set_loading(true);

        let result = match serde_json::to_value(&lead) {
            Ok(payload) => self.transport.deliver(&payload).await,
            Err(e) => Err(e.into()),
        };

        let outcome = match result {
            Ok(delivery) => {
                let demo = matches!(delivery, Delivery::Demo);
                if demo {
                    tracing::warn!("Webhook not configured, lead was not sent anywhere");
                    tracing::info!("Form data that would be sent: {:?}", lead);
                    self.view.show_status(DEMO_MESSAGE, StatusKind::Success);
                } else {
                    tracing::info!("Lead submitted ({:?})", delivery);
                    self.view.show_status(SUCCESS_MESSAGE, StatusKind::Success);
                }
                self.view.reset();
                self.transition(SubmissionState::Success);
                SubmissionOutcome::Succeeded { demo }
            }
            Err(e) => {
                tracing::error!("Webhook error: {}", e);
                self.view.show_status(FAILURE_MESSAGE, StatusKind::Error);
                self.transition(SubmissionState::Failed);
                SubmissionOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        };

        self.view.set_loading(false);
        self.transition(SubmissionState::Idle);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::form::MemoryForm;
    use crate::domain::model::LeadForm;
    use crate::utils::error::{LeadError, Result};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    #[derive(Clone)]
    struct MockTransport {
        response: std::result::Result<Delivery, u16>,
        sent: Arc<Mutex<Vec<serde_json::Value>>>,
    }

    impl MockTransport {
        fn new(response: std::result::Result<Delivery, u16>) -> Self {
            Self {
                response,
                sent: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn sent(&self) -> Vec<serde_json::Value> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LeadTransport for MockTransport {
        async fn deliver(&self, payload: &serde_json::Value) -> Result<Delivery> {
            self.sent.lock().unwrap().push(payload.clone());
            self.response
                .map_err(|status| LeadError::UpstreamError { status })
        }
    }

    fn filled_form() -> MemoryForm {
        MemoryForm::with_values(LeadForm {
            full_name: "Al".to_string(),
            email: "a@b.com".to_string(),
            phone: "5551234567".to_string(),
            property_type: "house".to_string(),
            budget: "100-200k".to_string(),
            location: "Austin".to_string(),
            message: "Looking for a yard".to_string(),
            newsletter: true,
        })
    }

    #[tokio::test]
    async fn test_invalid_form_never_reaches_transport() {
        let transport = MockTransport::new(Ok(Delivery::Delivered { status: 200 }));
        let mut form = filled_form();
        form.set_value(FieldId::FullName, "A");
        let mut pipeline = SubmissionPipeline::new(transport.clone(), form);

        let outcome = pipeline.submit().await;

        assert!(matches!(outcome, SubmissionOutcome::Rejected(ref r) if r.len() == 1));
        assert!(transport.sent().is_empty());
        assert_eq!(
            pipeline.transitions(),
            &[
                SubmissionState::Idle,
                SubmissionState::Validating,
                SubmissionState::Idle
            ]
        );
        let view = pipeline.view();
        assert_eq!(
            view.error(FieldId::FullName),
            Some("Please enter a valid full name")
        );
        assert_eq!(view.status().map(|s| s.0.as_str()), Some(INVALID_MESSAGE));
        assert!(!view.is_loading());
    }

    #[tokio::test]
    async fn test_success_clears_form_and_reenables_submit() {
        let transport = MockTransport::new(Ok(Delivery::Delivered { status: 200 }));
        let mut pipeline = SubmissionPipeline::new(transport.clone(), filled_form());

        let outcome = pipeline.submit().await;

        assert_eq!(outcome, SubmissionOutcome::Succeeded { demo: false });
        assert_eq!(
            pipeline.transitions(),
            &[
                SubmissionState::Idle,
                SubmissionState::Validating,
                SubmissionState::Submitting,
                SubmissionState::Success,
                SubmissionState::Idle
            ]
        );
        let sent = transport.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0]["fullName"], "Al");
        assert_eq!(sent[0]["source"], "Real Estate Lead Form");

        let view = pipeline.view();
        assert_eq!(view.read_form(), LeadForm::default());
        assert!(!view.is_loading());
        assert_eq!(view.loading_changes(), 2);
        assert_eq!(
            view.status(),
            Some(&(SUCCESS_MESSAGE.to_string(), StatusKind::Success))
        );
    }

    #[tokio::test]
    async fn test_failure_keeps_form_values() {
        let transport = MockTransport::new(Err(500));
        let mut pipeline = SubmissionPipeline::new(transport.clone(), filled_form());

        let outcome = pipeline.submit().await;

        assert!(matches!(outcome, SubmissionOutcome::Failed { .. }));
        assert!(pipeline.transitions().contains(&SubmissionState::Failed));
        assert_eq!(pipeline.state(), SubmissionState::Idle);
        let view = pipeline.view();
        assert_eq!(view.read_form(), filled_form().read_form());
        assert!(!view.is_loading());
        assert_eq!(
            view.status(),
            Some(&(FAILURE_MESSAGE.to_string(), StatusKind::Error))
        );

        // Manual retry goes out again.
        pipeline.submit().await;
        assert_eq!(transport.sent().len(), 2);
    }

    #[tokio::test]
    async fn test_demo_delivery_reports_demo_message() {
        let transport = MockTransport::new(Ok(Delivery::Demo));
        let mut pipeline = SubmissionPipeline::new(transport, filled_form());

        let outcome = pipeline.submit().await;

        assert_eq!(outcome, SubmissionOutcome::Succeeded { demo: true });
        assert_eq!(
            pipeline.view().status().map(|s| s.0.as_str()),
            Some(DEMO_MESSAGE)
        );
    }

    #[tokio::test]
    async fn test_blur_and_input_toggle_field_error() {
        let transport = MockTransport::new(Ok(Delivery::Demo));
        let mut form = filled_form();
        form.set_value(FieldId::Email, "not-an-email");
        let mut pipeline = SubmissionPipeline::new(transport, form);

        assert!(pipeline.blur(FieldId::Email).is_some());
        assert!(pipeline.view().error(FieldId::Email).is_some());

        let shown = pipeline.input(FieldId::Phone, "5551234567");
        assert_eq!(shown, "(555) 123-4567");

        pipeline.input(FieldId::Email, "a@b.co");
        assert!(pipeline.view().error(FieldId::Email).is_none());

        pipeline.view_mut().set_value(FieldId::Email, "a@b.co");
        assert_eq!(pipeline.blur(FieldId::Email), None);
    }

    #[test]
    fn test_apply_report_replaces_previous_errors() {
        let mut view = filled_form();
        view.show_error(FieldId::Location, "stale");

        let lead = LeadSubmission::from_form(
            &LeadForm {
                email: "bad".to_string(),
                ..view.read_form()
            },
            Utc::now(),
        );
        apply_report(&mut view, &validator::validate_all(&lead));

        assert_eq!(view.error(FieldId::Location), None);
        assert_eq!(
            view.error(FieldId::Email),
            Some("Please enter a valid email address")
        );
    }
}
