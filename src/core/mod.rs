pub mod phone;
pub mod relay;
pub mod submission;
pub mod validator;

pub use crate::domain::model::{Delivery, FieldId, LeadForm, LeadSubmission, WebhookTarget};
pub use crate::domain::ports::{ConfigProvider, FormView, LeadTransport, StatusKind};
pub use crate::utils::error::Result;
