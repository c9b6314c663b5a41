/// Host-supplied callback fired when the user changes the field value.
pub type ChangeListener = Box<dyn FnMut(Option<&str>)>;

/// Host-supplied callback fired on the first user interaction.
pub type TouchedListener = Box<dyn FnMut()>;

/// A single validation rule over the current control value.
pub type ValidatorFn = Box<dyn Fn(Option<&str>) -> Option<ValidationError>>;

/// The one user-visible validation failure this crate produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    Required,
}

impl ValidationError {
    /// Error-map key the host form files this failure under.
    pub fn key(&self) -> &'static str {
        match self {
            ValidationError::Required => "isRequired",
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Required => write!(f, "a selection is required"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Value side of the host-form contract: the host writes values in, the
/// field notifies value changes and first interaction back out.
pub trait ValueBinding {
    /// Inbound value assignment. Must not fire the change listener.
    fn write_value(&mut self, value: Option<String>);
    fn value(&self) -> Option<&str>;
    fn register_on_change(&mut self, listener: ChangeListener);
    fn register_on_touched(&mut self, listener: TouchedListener);
    fn set_disabled(&mut self, disabled: bool);
}

/// Validity side of the host-form contract.
pub trait Validatable {
    fn validate(&self) -> Option<ValidationError>;
}

/// The required-ness rule: absent or empty values fail when `required` is
/// set. Membership in the option list is deliberately not checked.
pub fn required_validator(required: bool) -> ValidatorFn {
    Box::new(move |value| {
        if required && value.is_none_or(str::is_empty) {
            Some(ValidationError::Required)
        } else {
            None
        }
    })
}
