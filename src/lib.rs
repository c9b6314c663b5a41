#![deny(rust_2018_idioms)]

mod domain;
mod field;
mod io;
mod lookup;
mod runtime;
mod ui;

pub use domain::{DEFAULT_PLACEHOLDER, DropdownConfig, SelectOption};
pub use field::{
    ChangeListener, ControlGroup, DropdownField, FieldControl, TouchedListener, Validatable,
    ValidationError, ValidatorFn, ValueBinding, required_validator,
};
pub use io::{DocumentFormat, OutputDestination, OutputOptions, emit, parse_document_str};
pub use lookup::{FetchOutcome, LookupError, OptionLookup, PendingFetch, StaticCatalog, spawn_fetch};
pub use runtime::{FormField, FormUI, UiOptions};

pub mod prelude {
    pub use super::{
        DropdownConfig, DropdownField, FormUI, OptionLookup, SelectOption, StaticCatalog,
        UiOptions, Validatable, ValueBinding,
    };
}
