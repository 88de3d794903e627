// Adapters layer: concrete implementations of the domain ports.

pub mod form;
pub mod http;

pub use form::MemoryForm;
pub use http::WebhookClient;
