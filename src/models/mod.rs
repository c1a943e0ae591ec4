mod file_report;
mod output;

pub use file_report::{FileReport, Finding};
pub use output::{ExtraData, Header, OUTPUT_FORMAT_VERSION, Output, SystemEnvironment};
