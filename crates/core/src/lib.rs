//! Domain types for the campus issue reporter.
//!
//! Pure data and validation only -- no I/O. The storage and HTTP layers
//! build on the types defined here.

pub mod classification;
pub mod error;
pub mod issue;
pub mod status_check;

pub use classification::{Classification, Classify};
pub use error::CoreError;
pub use issue::{Category, CreateIssue, Issue, Priority, Status, UpdateIssueStatus};
pub use status_check::{CreateStatusCheck, StatusCheck};
