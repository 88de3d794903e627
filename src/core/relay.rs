//! Server-side forwarding of lead submissions to the configured webhook.
//!
//! The relay checks the payload with the same validator the form uses, then forwards the
//! original JSON unchanged. Each call is independent; nothing is shared between requests
//! apart from the transport.

use crate::core::validator::{self, ValidationReport};
use crate::domain::model::{Delivery, LeadSubmission};
use crate::domain::ports::LeadTransport;
use crate::utils::error::LeadError;
use std::sync::Arc;

#[derive(Debug)]
pub enum RelayOutcome {
    Forwarded { status: u16 },
    /// Demo mode: accepted without forwarding.
    Accepted,
    /// The body is not a lead submission.
    Malformed { reason: String },
    Invalid(ValidationReport),
    /// The webhook answered with a non-2xx status.
    UpstreamFailed { status: u16 },
    /// Could not talk to the webhook at all.
    TransportFailed(LeadError),
    /// The forward did not finish before the server's deadline.
    TimedOut,
}

#[derive(Clone)]
pub struct LeadRelay {
    transport: Arc<dyn LeadTransport>,
}

impl LeadRelay {
    pub fn new(transport: Arc<dyn LeadTransport>) -> Self {
        Self { transport }
    }

    pub async fn relay(&self, payload: serde_json::Value) -> RelayOutcome {
        let lead: LeadSubmission = match serde_json::from_value(payload.clone()) {
            Ok(lead) => lead,
            Err(e) => {
                tracing::warn!("Rejected malformed submission: {}", e);
                return RelayOutcome::Malformed {
                    reason: e.to_string(),
                };
            }
        };

        tracing::info!(
            source = %lead.source,
            property_type = %lead.property_type,
            "Received form submission"
        );
        tracing::debug!("Submission body: {}", payload);

        let report = validator::validate_all(&lead);
        if !report.is_valid() {
            tracing::warn!(
                "Rejected submission with {} invalid field(s): {:?}",
                report.len(),
                report.to_field_map().keys().collect::<Vec<_>>()
            );
            return RelayOutcome::Invalid(report);
        }

        match self.transport.deliver(&payload).await {
            Ok(Delivery::Delivered { status }) => {
                tracing::info!("Forwarded submission to webhook (status {})", status);
                RelayOutcome::Forwarded { status }
            }
            Ok(Delivery::Demo) => {
                tracing::warn!("Demo mode: submission accepted but not forwarded");
                RelayOutcome::Accepted
            }
            Err(LeadError::UpstreamError { status }) => {
                tracing::error!("Webhook error: {}", status);
                RelayOutcome::UpstreamFailed { status }
            }
            Err(e) => {
                tracing::error!("Server error: {}", e);
                RelayOutcome::TransportFailed(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::Result;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct RecordingTransport {
        reply: fn() -> Result<Delivery>,
        seen: Mutex<Vec<serde_json::Value>>,
    }

    #[async_trait]
    impl LeadTransport for RecordingTransport {
        async fn deliver(&self, payload: &serde_json::Value) -> Result<Delivery> {
            self.seen.lock().unwrap().push(payload.clone());
            (self.reply)()
        }
    }

    fn relay_with(reply: fn() -> Result<Delivery>) -> (LeadRelay, Arc<RecordingTransport>) {
        let transport = Arc::new(RecordingTransport {
            reply,
            seen: Mutex::new(Vec::new()),
        });
        (LeadRelay::new(transport.clone()), transport)
    }

    fn valid_payload() -> serde_json::Value {
        serde_json::json!({
            "fullName": "Al",
            "email": "a@b.com",
            "phone": "5551234567",
            "propertyType": "house",
            "budget": "100-200k",
            "location": "Austin",
            "message": "",
            "newsletter": false,
            "timestamp": "2026-01-01T00:00:00.000Z",
            "source": "Real Estate Lead Form",
            "utmCampaign": "spring"
        })
    }

    #[tokio::test]
    async fn test_forwards_original_payload_unmodified() {
        let (relay, transport) = relay_with(|| Ok(Delivery::Delivered { status: 200 }));

        let outcome = relay.relay(valid_payload()).await;

        assert!(matches!(outcome, RelayOutcome::Forwarded { status: 200 }));
        let seen = transport.seen.lock().unwrap();
        assert_eq!(seen.as_slice(), &[valid_payload()]);
    }

    #[tokio::test]
    async fn test_invalid_payload_is_not_forwarded() {
        let (relay, transport) = relay_with(|| Ok(Delivery::Delivered { status: 200 }));
        let mut payload = valid_payload();
        payload["email"] = serde_json::json!("nope");

        let outcome = relay.relay(payload).await;

        match outcome {
            RelayOutcome::Invalid(report) => assert_eq!(report.len(), 1),
            other => panic!("expected Invalid, got {:?}", other),
        }
        assert!(transport.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_options_are_rejected_before_forwarding() {
        let (relay, transport) = relay_with(|| Ok(Delivery::Delivered { status: 200 }));
        let mut payload = valid_payload();
        payload["propertyType"] = serde_json::json!("spaceship");
        payload["budget"] = serde_json::json!("lots");

        let outcome = relay.relay(payload).await;

        match outcome {
            RelayOutcome::Invalid(report) => {
                let errors = report.to_field_map();
                assert_eq!(
                    errors.get("propertyType").map(String::as_str),
                    Some("Please select a valid property type")
                );
                assert_eq!(
                    errors.get("budget").map(String::as_str),
                    Some("Please select a valid budget range")
                );
            }
            other => panic!("expected Invalid, got {:?}", other),
        }
        assert!(transport.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_non_object_payload_is_malformed() {
        let (relay, _) = relay_with(|| Ok(Delivery::Demo));
        let outcome = relay.relay(serde_json::json!([1, 2, 3])).await;
        assert!(matches!(outcome, RelayOutcome::Malformed { .. }));
    }

    #[tokio::test]
    async fn test_upstream_and_transport_failures_are_distinguished() {
        let (relay, _) = relay_with(|| Err(LeadError::UpstreamError { status: 503 }));
        let outcome = relay.relay(valid_payload()).await;
        assert!(matches!(outcome, RelayOutcome::UpstreamFailed { status: 503 }));

        let (relay, _) = relay_with(|| {
            Err(LeadError::IoError(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "connection reset by peer",
            )))
        });
        let outcome = relay.relay(valid_payload()).await;
        assert!(matches!(outcome, RelayOutcome::TransportFailed(_)));
    }

    #[tokio::test]
    async fn test_demo_delivery_is_accepted() {
        let (relay, _) = relay_with(|| Ok(Delivery::Demo));
        let outcome = relay.relay(valid_payload()).await;
        assert!(matches!(outcome, RelayOutcome::Accepted));
    }
}
