pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::RelayArgs;
pub use config::{Settings, SettingsOverrides, WebhookSettings};

pub use adapters::{MemoryForm, WebhookClient};
pub use crate::core::{relay::LeadRelay, submission::SubmissionPipeline};
pub use domain::model::{FieldId, LeadForm, LeadSubmission, WebhookTarget};
pub use utils::error::{LeadError, Result};
