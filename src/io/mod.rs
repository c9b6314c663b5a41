mod format;
mod output;

pub use format::{DocumentFormat, parse_document_str};
pub use output::{OutputDestination, OutputOptions, emit};
