mod binding;
mod control;
mod dropdown;

pub use binding::{
    ChangeListener, TouchedListener, Validatable, ValidationError, ValidatorFn, ValueBinding,
    required_validator,
};
pub use control::{ControlGroup, FieldControl};
pub use dropdown::DropdownField;
