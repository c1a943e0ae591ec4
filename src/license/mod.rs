//! License recognition for comment blocks.
//!
//! Two independent tools work on a [`CommentSegment`](crate::segment::CommentSegment):
//! - [`classify`] fingerprints the text for copyright and license language
//!   and names well-known licenses.
//! - [`ReferenceLicense::compare`] checks a block line by line against a
//!   reference license text and reports every deviation.

mod classify;
mod reference;

pub use classify::{LicenseFamily, LicenseFlags, LicenseMatchResult, classify, classify_text};
pub use reference::{LicenseDeviation, ReferenceError, ReferenceLicense, compare_lines};
