//! Version parsing and ordering for update classification.
//!
//! Update servers hand out dotted version strings that are not always
//! strict semver. [`UpdateVersion`] parses them into a total order with
//! numeric per-segment comparison, so "1.10.0" sorts after "1.9.0".
//! Lexicographic string comparison would invert that pair.

mod version;

pub use version::{DottedVersion, DottedVersionError, UpdateVersion};
