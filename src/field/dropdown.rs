use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};

use crate::domain::{DropdownConfig, SelectOption};
use crate::lookup::{FetchOutcome, OptionLookup, PendingFetch, spawn_fetch};

use super::binding::{
    ChangeListener, TouchedListener, Validatable, ValidationError, ValidatorFn, ValueBinding,
    required_validator,
};
use super::control::{ControlGroup, FieldControl};

const SELECT_CONTROL: &str = "select";

/// A single-select dropdown whose option set is resolved from an external
/// lookup keyed by a configured identifier, falling back to a static list
/// when no key is present.
///
/// The field participates in a host form through [`ValueBinding`] and
/// [`Validatable`]. View code routes key events through [`handle_key`],
/// which fires the registered change/touched listeners on user selection.
///
/// [`handle_key`]: DropdownField::handle_key
pub struct DropdownField {
    config: DropdownConfig,
    lookup: Arc<dyn OptionLookup>,
    value: Option<String>,
    options: Vec<SelectOption>,
    form: ControlGroup,
    fetch: Option<PendingFetch>,
    validator: ValidatorFn,
    on_change: Option<ChangeListener>,
    on_touched: Option<TouchedListener>,
    touched: bool,
    disabled: bool,
    initialized: bool,
    pub dirty: bool,
    pub error: Option<String>,
}

impl DropdownField {
    pub fn new(config: DropdownConfig, lookup: Arc<dyn OptionLookup>) -> Self {
        let validator = required_validator(config.required);
        let disabled = config.disabled;
        Self {
            config,
            lookup,
            value: None,
            options: Vec::new(),
            form: ControlGroup::new(),
            fetch: None,
            validator,
            on_change: None,
            on_touched: None,
            touched: false,
            disabled,
            initialized: false,
            dirty: false,
            error: None,
        }
    }

    /// One-time initialization: issues the option fetch (or resolves the
    /// static list when no lookup key is configured) and builds the internal
    /// single-field sub-form with the required rule attached. Re-invocation
    /// is a no-op.
    pub fn init(&mut self) {
        if self.initialized {
            return;
        }
        self.initialized = true;

        match self.config.lookup_key.clone() {
            Some(key) => {
                self.fetch = Some(spawn_fetch(self.lookup.clone(), key));
            }
            None => {
                self.options = self.config.options.clone();
            }
        }

        let mut control = FieldControl::new(self.value.clone());
        if self.config.required {
            control.set_validators(vec![required_validator(true)]);
        }
        control.set_enabled(!self.disabled);
        self.form.insert(SELECT_CONTROL, control);
        if self.config.required {
            if let Some(control) = self.form.control_mut(SELECT_CONTROL) {
                control.update_validity();
            }
            self.form.update_validity();
        }
    }

    /// Non-blocking drain of the pending fetch. Applies the fetched options
    /// (or the empty list on failure) exactly once; returns whether the
    /// option set changed.
    pub fn poll_options(&mut self) -> bool {
        let Some(fetch) = self.fetch.as_mut() else {
            return false;
        };
        let Some(outcome) = fetch.poll() else {
            return false;
        };
        self.fetch = None;
        match outcome {
            FetchOutcome::Options(options) => {
                self.options = options;
            }
            FetchOutcome::Failed(err) => {
                tracing::warn!(
                    key = self.config.lookup_key.as_deref(),
                    error = %err,
                    "option fetch failed; rendering an empty list"
                );
                self.options = Vec::new();
            }
        }
        true
    }

    /// Explicit teardown: cancels the in-flight fetch so no background work
    /// outlives the field. A late worker result is discarded.
    pub fn dispose(&mut self) {
        self.fetch = None;
    }

    pub fn options_pending(&self) -> bool {
        self.fetch.is_some()
    }

    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    pub fn placeholder(&self) -> &str {
        &self.config.placeholder
    }

    pub fn description(&self) -> Option<&str> {
        self.config.description.as_deref()
    }

    pub fn is_required(&self) -> bool {
        self.config.required
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// No value selected yet.
    pub fn is_pristine(&self) -> bool {
        self.value.is_none()
    }

    pub fn is_touched(&self) -> bool {
        self.touched
    }

    /// Validity of the internal sub-form after its last recomputation.
    /// Disabled controls validate as clean.
    pub fn control_valid(&self) -> bool {
        self.form.is_valid()
    }

    /// Index of the current value in the rendered options, when both are
    /// present. A value written before the options arrive resolves once they
    /// do.
    pub fn selected_index(&self) -> Option<usize> {
        let value = self.value.as_deref()?;
        self.options.iter().position(|opt| opt.value == value)
    }

    pub fn selected_label(&self) -> Option<&str> {
        self.selected_index()
            .map(|index| self.options[index].label.as_str())
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// View-side key routing. Up/Left and Down/Right move the selection with
    /// wraparound, Backspace/Delete clears it. Disabled fields consume
    /// nothing. Any handled key counts as the first user interaction.
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        if self.disabled {
            return false;
        }
        let handled = match key.code {
            KeyCode::Up | KeyCode::Left => self.select_adjacent(-1),
            KeyCode::Down | KeyCode::Right => self.select_adjacent(1),
            KeyCode::Backspace | KeyCode::Delete => self.clear_selection(),
            _ => false,
        };
        if handled {
            self.mark_touched();
        }
        handled
    }

    fn select_adjacent(&mut self, delta: i32) -> bool {
        if self.options.is_empty() {
            return false;
        }
        let len = self.options.len() as i32;
        let next = match self.selected_index() {
            Some(current) => (((current as i32 + delta) % len) + len) % len,
            None if delta < 0 => len - 1,
            None => 0,
        };
        self.commit_selection(next as usize)
    }

    fn commit_selection(&mut self, index: usize) -> bool {
        let Some(option) = self.options.get(index) else {
            return false;
        };
        if self.value.as_deref() == Some(option.value.as_str()) {
            return true;
        }
        self.value = Some(option.value.clone());
        self.dirty = true;
        self.sync_control();
        self.notify_change();
        true
    }

    fn clear_selection(&mut self) -> bool {
        if self.value.is_none() {
            return false;
        }
        self.value = None;
        self.dirty = true;
        self.sync_control();
        self.notify_change();
        true
    }

    fn sync_control(&mut self) {
        if let Some(control) = self.form.control_mut(SELECT_CONTROL) {
            control.set_value(self.value.clone());
            control.update_validity();
        }
        self.form.update_validity();
    }

    fn notify_change(&mut self) {
        if let Some(listener) = self.on_change.as_mut() {
            listener(self.value.as_deref());
        }
    }

    fn mark_touched(&mut self) {
        if self.touched {
            return;
        }
        self.touched = true;
        if let Some(listener) = self.on_touched.as_mut() {
            listener();
        }
    }
}

impl ValueBinding for DropdownField {
    fn write_value(&mut self, value: Option<String>) {
        self.value = value;
        // one-way sync into the sub-form; the change listener stays quiet
        self.sync_control();
    }

    fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    fn register_on_change(&mut self, listener: ChangeListener) {
        self.on_change = Some(listener);
    }

    fn register_on_touched(&mut self, listener: TouchedListener) {
        self.on_touched = Some(listener);
    }

    fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
        self.form.set_enabled(!disabled);
    }
}

impl Validatable for DropdownField {
    fn validate(&self) -> Option<ValidationError> {
        (self.validator)(self.value.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::StaticCatalog;
    use crossterm::event::KeyModifiers;

    fn static_field(values: &[(&str, &str)]) -> DropdownField {
        let options = values
            .iter()
            .map(|(value, label)| SelectOption::new(*value, *label))
            .collect();
        let mut field = DropdownField::new(
            DropdownConfig::new().with_static_options(options),
            Arc::new(StaticCatalog::new()),
        );
        field.init();
        field
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn selection_wraps_in_both_directions() {
        let mut field = static_field(&[("a", "A"), ("b", "B")]);
        assert!(field.handle_key(&key(KeyCode::Up)));
        assert_eq!(field.value(), Some("b"));
        assert!(field.handle_key(&key(KeyCode::Down)));
        assert_eq!(field.value(), Some("a"));
        assert!(field.handle_key(&key(KeyCode::Up)));
        assert_eq!(field.value(), Some("b"));
    }

    #[test]
    fn first_downward_step_selects_the_first_option() {
        let mut field = static_field(&[("a", "A"), ("b", "B")]);
        assert!(field.is_pristine());
        assert!(field.handle_key(&key(KeyCode::Down)));
        assert_eq!(field.value(), Some("a"));
        assert_eq!(field.selected_label(), Some("A"));
    }

    #[test]
    fn clearing_returns_to_pristine() {
        let mut field = static_field(&[("a", "A")]);
        field.handle_key(&key(KeyCode::Down));
        assert!(field.handle_key(&key(KeyCode::Backspace)));
        assert!(field.is_pristine());
        // nothing selected, nothing to clear
        assert!(!field.handle_key(&key(KeyCode::Backspace)));
    }

    #[test]
    fn empty_option_list_consumes_no_keys() {
        let mut field = static_field(&[]);
        assert!(!field.handle_key(&key(KeyCode::Down)));
        assert!(!field.is_touched());
    }

    #[test]
    fn unrelated_keys_are_ignored() {
        let mut field = static_field(&[("a", "A")]);
        assert!(!field.handle_key(&key(KeyCode::Char('x'))));
        assert!(field.is_pristine());
    }
}
