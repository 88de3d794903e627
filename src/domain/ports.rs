use crate::domain::model::{Delivery, FieldId, LeadForm, WebhookTarget};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait ConfigProvider: Send + Sync {
    fn webhook_target(&self) -> &WebhookTarget;
    fn request_timeout(&self) -> Duration;
}

/// Sends a JSON lead payload somewhere: the real webhook or the same-origin relay.
#[async_trait]
pub trait LeadTransport: Send + Sync {
    async fn deliver(&self, payload: &serde_json::Value) -> Result<Delivery>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Error,
}

/// The display side of the form. Validation never touches this directly;
/// reports are applied to it by the submission pipeline.
pub trait FormView {
    fn read_form(&self) -> LeadForm;
    fn show_error(&mut self, field: FieldId, message: &str);
    fn clear_error(&mut self, field: FieldId);
    fn clear_all_errors(&mut self);
    /// Disables the submit control while `true`.
    fn set_loading(&mut self, loading: bool);
    fn show_status(&mut self, message: &str, kind: StatusKind);
    /// Clears every input back to its initial value.
    fn reset(&mut self);
}
