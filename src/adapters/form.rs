use crate::domain::model::{FieldId, LeadForm};
use crate::domain::ports::{FormView, StatusKind};
use std::collections::BTreeMap;

/// Form state held in memory, for driving the submission pipeline without a browser.
#[derive(Debug, Clone, Default)]
pub struct MemoryForm {
    values: LeadForm,
    errors: BTreeMap<FieldId, String>,
    status: Option<(String, StatusKind)>,
    loading: bool,
    loading_changes: usize,
}

impl MemoryForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values(values: LeadForm) -> Self {
        Self {
            values,
            ..Self::default()
        }
    }

    pub fn set_value(&mut self, field: FieldId, value: &str) {
        *self.values.value_mut(field) = value.to_string();
    }

    pub fn set_message(&mut self, message: &str) {
        self.values.message = message.to_string();
    }

    pub fn set_newsletter(&mut self, opt_in: bool) {
        self.values.newsletter = opt_in;
    }

    pub fn error(&self, field: FieldId) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn status(&self) -> Option<&(String, StatusKind)> {
        self.status.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// How many times the submit control was disabled or re-enabled.
    pub fn loading_changes(&self) -> usize {
        self.loading_changes
    }
}

impl FormView for MemoryForm {
    fn read_form(&self) -> LeadForm {
        self.values.clone()
    }

    fn show_error(&mut self, field: FieldId, message: &str) {
        self.errors.insert(field, message.to_string());
    }

    fn clear_error(&mut self, field: FieldId) {
        self.errors.remove(&field);
    }

    fn clear_all_errors(&mut self) {
        self.errors.clear();
    }

    fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
        self.loading_changes += 1;
    }

    fn show_status(&mut self, message: &str, kind: StatusKind) {
        self.status = Some((message.to_string(), kind));
    }

    fn reset(&mut self) {
        self.values = LeadForm::default();
    }
}
