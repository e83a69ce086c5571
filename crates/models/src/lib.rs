//! Domain records for the weighbridge service backend.
//!
//! Every record kind implements [`document::Document`] so the service layer can
//! persist it in a generic document store and query it by secondary lookups.

pub mod errors;
pub mod document;
pub mod customer;
pub mod machine;
pub mod service_record;
pub mod admin;
pub mod report;

pub use admin::Admin;
pub use customer::{Customer, CustomerInput};
pub use document::{Document, Lookup};
pub use machine::{Machine, MachineInput};
pub use report::ReportRow;
pub use service_record::{ServiceRecord, ServiceRecordInput};

/// Trim surrounding whitespace and reject blank values.
pub(crate) fn required(field: &str, value: &str) -> Result<String, errors::ModelError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(errors::ModelError::Validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

/// Collapse blank optional references to `None`.
pub(crate) fn optional_ref(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
