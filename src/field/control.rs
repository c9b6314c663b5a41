use indexmap::IndexMap;

use super::binding::{ValidationError, ValidatorFn};

/// One control of the internal sub-form: the current value, its attached
/// validators, and the validity computed from them.
pub struct FieldControl {
    value: Option<String>,
    validators: Vec<ValidatorFn>,
    enabled: bool,
    valid: bool,
}

impl FieldControl {
    pub fn new(value: Option<String>) -> Self {
        Self {
            value,
            validators: Vec::new(),
            enabled: true,
            valid: true,
        }
    }

    /// Silent assignment: validity is not recomputed and nothing is notified.
    pub fn set_value(&mut self, value: Option<String>) {
        self.value = value;
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn set_validators(&mut self, validators: Vec<ValidatorFn>) {
        self.validators = validators;
    }

    /// Re-run the validators against the current value. Disabled controls
    /// validate as clean.
    pub fn update_validity(&mut self) -> bool {
        self.valid = !self.enabled || self.first_error().is_none();
        self.valid
    }

    pub fn first_error(&self) -> Option<ValidationError> {
        if !self.enabled {
            return None;
        }
        self.validators
            .iter()
            .find_map(|validate| validate(self.value.as_deref()))
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.update_validity();
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

/// Named controls in insertion order; group validity is the conjunction of
/// child validity.
pub struct ControlGroup {
    controls: IndexMap<String, FieldControl>,
    valid: bool,
}

impl ControlGroup {
    pub fn new() -> Self {
        Self {
            controls: IndexMap::new(),
            valid: true,
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, control: FieldControl) {
        self.controls.insert(name.into(), control);
    }

    pub fn control(&self, name: &str) -> Option<&FieldControl> {
        self.controls.get(name)
    }

    pub fn control_mut(&mut self, name: &str) -> Option<&mut FieldControl> {
        self.controls.get_mut(name)
    }

    pub fn update_validity(&mut self) -> bool {
        let mut valid = true;
        for control in self.controls.values_mut() {
            valid &= control.update_validity();
        }
        self.valid = valid;
        self.valid
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        for control in self.controls.values_mut() {
            control.set_enabled(enabled);
        }
        self.update_validity();
    }
}

impl Default for ControlGroup {
    fn default() -> Self {
        Self::new()
    }
}
