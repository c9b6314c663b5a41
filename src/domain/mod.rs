mod config;
mod option;

pub use config::{DEFAULT_PLACEHOLDER, DropdownConfig};
pub use option::SelectOption;
