use std::collections::BTreeMap;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::core::relay::RelayOutcome;
use crate::server::AppState;

/// Body of every `/api/submit` response.
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub message: String,
    /// Per-field messages when the lead failed validation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<&'static str, String>>,
}

impl SubmitResponse {
    fn new(success: bool, message: &str) -> Self {
        Self {
            success,
            message: message.to_string(),
            errors: None,
        }
    }
}

fn outcome_response(outcome: RelayOutcome) -> Response {
    let (status, body) = match outcome {
        RelayOutcome::Forwarded { .. } => (
            StatusCode::OK,
            SubmitResponse::new(true, "Forwarded to webhook successfully"),
        ),
        RelayOutcome::Accepted => (
            StatusCode::OK,
            SubmitResponse::new(true, "Accepted in demo mode (not forwarded)"),
        ),
        RelayOutcome::Malformed { .. } => (
            StatusCode::BAD_REQUEST,
            SubmitResponse::new(false, "Malformed submission"),
        ),
        RelayOutcome::Invalid(report) => (
            StatusCode::BAD_REQUEST,
            SubmitResponse {
                success: false,
                message: "Please fix the errors above".to_string(),
                errors: Some(report.to_field_map()),
            },
        ),
        RelayOutcome::UpstreamFailed { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            SubmitResponse::new(false, "Webhook error"),
        ),
        RelayOutcome::TransportFailed(_) | RelayOutcome::TimedOut => (
            StatusCode::INTERNAL_SERVER_ERROR,
            SubmitResponse::new(false, "Server error"),
        ),
    };
    (status, Json(body)).into_response()
}

/// `POST /api/submit`: validates the lead and relays it to the webhook.
///
/// Returns 200 when the webhook accepted it, 400 for a body that is not a valid lead,
/// and 500 when the webhook failed, could not be reached, or missed the deadline.
#[tracing::instrument(name = "submit_lead", skip(state, body), fields(content_length = body.len()))]
pub async fn submit_lead(State(state): State<AppState>, body: Bytes) -> Response {
    let payload: serde_json::Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Request body is not JSON: {}", e);
            return outcome_response(RelayOutcome::Malformed {
                reason: e.to_string(),
            });
        }
    };

    match tokio::time::timeout(state.submit_deadline, state.relay.relay(payload)).await {
        Ok(outcome) => outcome_response(outcome),
        Err(_) => {
            tracing::error!(
                "Server error: no answer from webhook within {:?}",
                state.submit_deadline
            );
            outcome_response(RelayOutcome::TimedOut)
        }
    }
}
