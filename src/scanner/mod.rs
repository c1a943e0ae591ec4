mod count;
mod process;

use crate::models::FileReport;

pub struct ProcessResult {
    pub files: Vec<FileReport>,
    pub excluded_count: usize,
}

pub use self::count::count;
pub use self::process::{process, process_file};
