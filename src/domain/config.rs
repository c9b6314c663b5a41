use super::SelectOption;

pub const DEFAULT_PLACEHOLDER: &str = "--Select--";

/// Construction-time inputs for a dropdown field.
///
/// A configured `lookup_key` wins as the data source; the static `options`
/// list is consulted only when no key is present. `disabled` is the only
/// input that may change after initialization.
#[derive(Debug, Clone)]
pub struct DropdownConfig {
    pub lookup_key: Option<String>,
    pub options: Vec<SelectOption>,
    pub placeholder: String,
    pub description: Option<String>,
    pub required: bool,
    pub disabled: bool,
}

impl Default for DropdownConfig {
    fn default() -> Self {
        Self {
            lookup_key: None,
            options: Vec::new(),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            description: None,
            required: false,
            disabled: false,
        }
    }
}

impl DropdownConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lookup_key(mut self, key: impl Into<String>) -> Self {
        self.lookup_key = Some(key.into());
        self
    }

    pub fn with_static_options(mut self, options: Vec<SelectOption>) -> Self {
        self.options = options;
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}
