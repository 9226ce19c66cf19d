mod violation_service;
mod violation_store;

pub use violation_service::{ProcessedViolation, ViolationService};
pub use violation_store::{PgViolationStore, ViolationStore};
